//! Encoding of archive entries
//!
//! Writers always emit the current format layout; there is no path that
//! writes an older revision.

mod edge;
mod mesh;
mod metadata;
mod values;

pub use edge::write_edge;
pub use mesh::write_mesh;
pub use metadata::write_metadata_xml;
pub use values::write_value;

use crate::binary::{BufferPool, write_len};
use crate::error::Result;
use crate::model::{Edge, Mesh, Value};

/// Encode a mesh geometry entry
pub fn write_meshes_entry(meshes: &[Mesh], pool: &BufferPool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_len(&mut out, meshes.len())?;
    for mesh in meshes {
        write_mesh(&mut out, mesh, pool)?;
    }
    Ok(out)
}

/// Encode an edge geometry entry
pub fn write_edges_entry(edges: &[Edge], pool: &BufferPool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_len(&mut out, edges.len())?;
    for edge in edges {
        write_edge(&mut out, edge, pool)?;
    }
    Ok(out)
}

/// Encode a value dataset entry
pub fn write_values_entry(values: &[Value], pool: &BufferPool) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    write_len(&mut out, values.len())?;
    for value in values {
        write_value(&mut out, value, pool)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vec3;
    use crate::parser::{DecodeContext, read_edges_entry, read_meshes_entry, read_values_entry};
    use crate::version::FileVersion;

    #[test]
    fn test_empty_entries_are_a_zero_count() {
        let pool = BufferPool::new();
        assert_eq!(write_meshes_entry(&[], &pool).unwrap(), vec![0, 0, 0, 0]);
        assert_eq!(write_edges_entry(&[], &pool).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_entries_roundtrip() {
        let pool = BufferPool::new();
        let ctx = DecodeContext::new(FileVersion::CURRENT, &pool);

        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            &[0, 1, 2],
        )
        .unwrap()
        .with_layers(["top"]);
        let edge = Edge::new(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)])
            .with_name("outline");
        let value = Value::new(vec![0.25, f32::NAN, -1.0]);

        let meshes = read_meshes_entry(&write_meshes_entry(&[mesh.clone()], &pool).unwrap(), &ctx)
            .unwrap();
        let edges =
            read_edges_entry(&write_edges_entry(&[edge.clone()], &pool).unwrap(), &ctx).unwrap();
        let values = read_values_entry(
            &write_values_entry(&[value.clone()], &pool).unwrap(),
            "deviation",
            &ctx,
        )
        .unwrap();

        assert_eq!(meshes, vec![mesh]);
        assert_eq!(edges, vec![edge]);
        assert_eq!(values, vec![value]);
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let pool = BufferPool::new();
        let ctx = DecodeContext::new(FileVersion::CURRENT, &pool);
        let mut bytes = write_edges_entry(&[], &pool).unwrap();
        bytes.push(0);
        let err = read_edges_entry(&bytes, &ctx).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Format);
    }
}

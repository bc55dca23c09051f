//! Decoding of archive entries
//!
//! The binary entries (`meshes.bin`, `edges.bin` and one entry per value
//! dataset) are decoded with the layout of the file version recorded in the
//! metadata document. The layout is looked up once per entry through
//! [`FormatFeatures`]; entity readers never compare versions themselves.

mod edge;
mod mesh;
mod metadata;
mod values;

pub use edge::read_edge;
pub use mesh::read_mesh;
pub use metadata::{MetadataDocument, parse_metadata_xml};
pub use values::read_value;

use crate::binary::{BufferPool, read_len};
use crate::error::{Error, Result};
use crate::model::{Edge, Mesh, Value};
use crate::version::{FileVersion, FormatFeatures};
use std::io::Cursor;
use tracing::debug;

/// Version-dependent state shared by the entity readers of one entry
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// Version recorded in the metadata document
    pub version: FileVersion,
    /// Layout of that version
    pub features: FormatFeatures,
    /// Buffer pool of the enclosing call
    pub pool: &'a BufferPool,
}

impl<'a> DecodeContext<'a> {
    /// Create a context for a file version
    pub fn new(version: FileVersion, pool: &'a BufferPool) -> Self {
        Self {
            version,
            features: FormatFeatures::for_version(version),
            pool,
        }
    }
}

/// Decode a mesh geometry entry
pub fn read_meshes_entry(bytes: &[u8], ctx: &DecodeContext<'_>) -> Result<Vec<Mesh>> {
    let mut cursor = Cursor::new(bytes);
    let count = read_len(&mut cursor, "mesh count")?;
    debug!(count, version = %ctx.version, "decoding meshes");

    let mut meshes = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        meshes.push(read_mesh(&mut cursor, ctx, index)?);
    }
    ensure_consumed(&cursor, "meshes")?;
    Ok(meshes)
}

/// Decode an edge geometry entry
pub fn read_edges_entry(bytes: &[u8], ctx: &DecodeContext<'_>) -> Result<Vec<Edge>> {
    let mut cursor = Cursor::new(bytes);
    let count = read_len(&mut cursor, "edge count")?;
    debug!(count, version = %ctx.version, "decoding edges");

    let mut edges = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        edges.push(read_edge(&mut cursor, ctx, index)?);
    }
    ensure_consumed(&cursor, "edges")?;
    Ok(edges)
}

/// Decode a value dataset entry
pub fn read_values_entry(
    bytes: &[u8],
    data_type: &str,
    ctx: &DecodeContext<'_>,
) -> Result<Vec<Value>> {
    let mut cursor = Cursor::new(bytes);
    let context = format!("value list '{}'", data_type);
    let count = read_len(&mut cursor, &context)?;
    debug!(count, data_type, "decoding values");

    let mut values = Vec::with_capacity(count.min(1024));
    for index in 0..count {
        values.push(read_value(&mut cursor, ctx, data_type, index)?);
    }
    ensure_consumed(&cursor, &context)?;
    Ok(values)
}

fn ensure_consumed(cursor: &Cursor<&[u8]>, context: &str) -> Result<()> {
    let remaining = cursor.get_ref().len() as u64 - cursor.position();
    if remaining != 0 {
        return Err(Error::invalid_format_context(
            context,
            &format!("{} trailing bytes after the last entity", remaining),
        ));
    }
    Ok(())
}

use super::DecodeContext;
use crate::binary::struct_array::LegacyPoint;
use crate::binary::{
    read_argb, read_bool, read_layers, read_name, read_optional_array, read_struct_array,
};
use crate::error::{Error, Result};
use crate::index::{IndexArray, IndexWidth};
use crate::model::{Color, Mesh, Vec2, Vec3};
use std::io::Read;
use tracing::trace;

/// Decode one mesh block
///
/// Blocks the file version does not carry are skipped. Indices from files
/// without adaptive widths are stored at 32 bits and narrowed after reading.
pub fn read_mesh<R: Read>(
    reader: &mut R,
    ctx: &DecodeContext<'_>,
    mesh_index: usize,
) -> Result<Mesh> {
    let context = format!("mesh {}", mesh_index);
    let features = ctx.features;

    let name = if features.names {
        read_name(reader, &context)?
    } else {
        None
    };

    let color = if read_bool(reader, &context)? {
        Some(read_argb(reader, &context)?)
    } else {
        None
    };

    let positions: Vec<Vec3> = if !read_bool(reader, &context)? {
        Vec::new()
    } else if features.double_precision_positions {
        read_struct_array::<_, LegacyPoint>(reader, ctx.pool, &context)?
            .into_iter()
            .map(LegacyPoint::to_vec3)
            .collect()
    } else {
        read_struct_array(reader, ctx.pool, &context)?
    };
    let vertex_count = positions.len();

    let normals: Vec<Vec3> = read_optional_array(reader, ctx.pool, &context)?;

    let indices = if read_bool(reader, &context)? {
        let width = if features.adaptive_indices {
            IndexWidth::for_vertex_count(vertex_count)
        } else {
            IndexWidth::U32
        };
        let indices = IndexArray::read(reader, width, ctx.pool, &context)?;
        check_indices(&indices, vertex_count, &context)?;
        indices.narrowed(vertex_count)?
    } else {
        IndexArray::from_indices(&[], vertex_count)?
    };

    let layers = read_layers(reader, &context)?;

    let tex_coords: Vec<Vec2> = if features.texture_coordinates {
        read_optional_array(reader, ctx.pool, &context)?
    } else {
        Vec::new()
    };
    check_per_vertex(tex_coords.len(), vertex_count, "texture coordinate", &context)?;

    let colors: Vec<Color> = if features.vertex_colors {
        read_optional_array(reader, ctx.pool, &context)?
    } else {
        Vec::new()
    };
    check_per_vertex(colors.len(), vertex_count, "vertex color", &context)?;

    trace!(
        mesh_index,
        vertices = vertex_count,
        indices = indices.len(),
        width = ?indices.width(),
        "decoded mesh"
    );

    Ok(Mesh::from_decoded(
        positions, normals, tex_coords, colors, indices, color, layers, name,
    ))
}

fn check_indices(indices: &IndexArray, vertex_count: usize, context: &str) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(Error::invalid_format_context(
            context,
            &format!("index count {} is not a multiple of 3", indices.len()),
        ));
    }
    if let Some(bad) = indices.iter().find(|&i| i as usize >= vertex_count) {
        return Err(Error::invalid_format_context(
            context,
            &format!("index {} out of range for {} vertices", bad, vertex_count),
        ));
    }
    Ok(())
}

fn check_per_vertex(len: usize, vertex_count: usize, what: &str, context: &str) -> Result<()> {
    if len != 0 && len != vertex_count {
        return Err(Error::invalid_format_context(
            context,
            &format!("{} {} entries for {} vertices", len, what, vertex_count),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{BufferPool, write_bool, write_len};
    use crate::error::ErrorKind;
    use crate::version::{FileVersion, FormatFeatures};
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Cursor;

    fn legacy_triangle(version: FileVersion) -> Vec<u8> {
        let mut out = Vec::new();
        if FormatFeatures::for_version(version).names {
            write_bool(&mut out, false).unwrap();
        }
        write_bool(&mut out, false).unwrap(); // color
        write_bool(&mut out, true).unwrap(); // positions
        write_len(&mut out, 3).unwrap();
        for p in [[0.0f64, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for c in p {
                if version.major < 2 {
                    out.write_f64::<LittleEndian>(c).unwrap();
                } else {
                    out.write_f32::<LittleEndian>(c as f32).unwrap();
                }
            }
        }
        write_bool(&mut out, false).unwrap(); // normals
        write_bool(&mut out, true).unwrap(); // indices
        write_len(&mut out, 3).unwrap();
        for i in [0u32, 1, 2] {
            out.write_u32::<LittleEndian>(i).unwrap();
        }
        write_bool(&mut out, false).unwrap(); // layers
        out
    }

    #[test]
    fn test_legacy_double_precision_mesh() {
        let pool = BufferPool::new();
        let version = FileVersion::new(1, 0, 0, 0);
        let ctx = DecodeContext::new(version, &pool);
        let bytes = legacy_triangle(version);
        let mesh = read_mesh(&mut Cursor::new(bytes), &ctx, 0).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.positions()[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.indices().width(), IndexWidth::U8);
        assert_eq!(mesh.normals().len(), 3);
    }

    #[test]
    fn test_pre_adaptive_indices_are_narrowed() {
        let pool = BufferPool::new();
        let version = FileVersion::new(2, 1, 0, 0);
        let ctx = DecodeContext::new(version, &pool);
        let mesh = read_mesh(&mut Cursor::new(legacy_triangle(version)), &ctx, 0).unwrap();
        assert_eq!(mesh.indices().to_u32_vec(), vec![0, 1, 2]);
        assert_eq!(mesh.indices().width(), IndexWidth::U8);
    }

    #[test]
    fn test_out_of_range_index_is_format_error() {
        let pool = BufferPool::new();
        let version = FileVersion::new(2, 1, 0, 0);
        let ctx = DecodeContext::new(version, &pool);
        let mut bytes = legacy_triangle(version);
        // last index sits right before the trailing layers marker
        let at = bytes.len() - 5;
        bytes[at..at + 4].copy_from_slice(&7u32.to_le_bytes());
        let err = read_mesh(&mut Cursor::new(bytes), &ctx, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_truncated_mesh_is_format_error() {
        let pool = BufferPool::new();
        let version = FileVersion::new(2, 1, 0, 0);
        let ctx = DecodeContext::new(version, &pool);
        let bytes = legacy_triangle(version);
        let err = read_mesh(&mut Cursor::new(&bytes[..bytes.len() - 3]), &ctx, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}

use super::DecodeContext;
use crate::binary::struct_array::LegacyPoint;
use crate::binary::{read_argb, read_bool, read_layers, read_name, read_struct_array};
use crate::error::Result;
use crate::model::{Edge, Vec3, dedup_consecutive};
use std::io::Read;
use tracing::{trace, warn};

/// Squared distance under which consecutive legacy points are duplicates
pub const LEGACY_DUPLICATE_DISTANCE_SQUARED: f32 = 1e-7;

/// Decode one edge block
///
/// Points stored in double precision (1.x files) are narrowed to `f32` and
/// consecutive duplicates are dropped.
pub fn read_edge<R: Read>(
    reader: &mut R,
    ctx: &DecodeContext<'_>,
    edge_index: usize,
) -> Result<Edge> {
    let context = format!("edge {}", edge_index);
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

    let points: Vec<Vec3> = if !read_bool(reader, &context)? {
        Vec::new()
    } else if features.double_precision_positions {
        let raw: Vec<Vec3> = read_struct_array::<_, LegacyPoint>(reader, ctx.pool, &context)?
            .into_iter()
            .map(LegacyPoint::to_vec3)
            .collect();
        let before = raw.len();
        let points = dedup_consecutive(raw, LEGACY_DUPLICATE_DISTANCE_SQUARED);
        if points.len() != before {
            warn!(
                edge_index,
                dropped = before - points.len(),
                "dropped duplicate points from legacy edge"
            );
        }
        points
    } else {
        read_struct_array(reader, ctx.pool, &context)?
    };

    let layers = read_layers(reader, &context)?;

    trace!(edge_index, points = points.len(), "decoded edge");
    Ok(Edge::from_decoded(points, color, layers, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{BufferPool, write_bool, write_len};
    use crate::error::ErrorKind;
    use crate::version::FileVersion;
    use byteorder::{LittleEndian, WriteBytesExt};
    use std::io::Cursor;

    fn legacy_edge(points: &[[f64; 3]]) -> Vec<u8> {
        let mut out = Vec::new();
        write_bool(&mut out, false).unwrap();
        write_bool(&mut out, true).unwrap();
        write_len(&mut out, points.len()).unwrap();
        for p in points {
            for &c in p {
                out.write_f64::<LittleEndian>(c).unwrap();
            }
        }
        write_bool(&mut out, false).unwrap();
        out
    }

    #[test]
    fn test_legacy_points_are_deduplicated() {
        let pool = BufferPool::new();
        let ctx = DecodeContext::new(FileVersion::new(1, 0, 0, 0), &pool);
        let bytes = legacy_edge(&[
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1e-5],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
        ]);
        let edge = read_edge(&mut Cursor::new(bytes), &ctx, 0).unwrap();
        assert_eq!(
            edge.points(),
            &[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_negative_point_count_is_format_error() {
        let pool = BufferPool::new();
        let ctx = DecodeContext::new(FileVersion::CURRENT, &pool);
        let mut bytes = Vec::new();
        write_bool(&mut bytes, false).unwrap(); // name
        write_bool(&mut bytes, false).unwrap(); // color
        write_bool(&mut bytes, true).unwrap(); // points
        bytes.write_i32::<LittleEndian>(-4).unwrap();
        let err = read_edge(&mut Cursor::new(bytes), &ctx, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}

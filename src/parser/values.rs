use super::DecodeContext;
use crate::binary::read_struct_array;
use crate::error::Result;
use crate::model::Value;
use std::io::Read;
use tracing::trace;

/// Decode the values of one mesh
pub fn read_value<R: Read>(
    reader: &mut R,
    ctx: &DecodeContext<'_>,
    data_type: &str,
    mesh_index: usize,
) -> Result<Value> {
    let context = format!("value list '{}' mesh {}", data_type, mesh_index);
    let data: Vec<f32> = read_struct_array(reader, ctx.pool, &context)?;
    trace!(data_type, mesh_index, len = data.len(), "decoded values");
    Ok(Value::new(data))
}

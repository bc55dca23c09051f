use crate::binary::{BufferPool, write_struct_array};
use crate::error::Result;
use crate::model::Value;
use std::io::Write;

/// Encode the values of one mesh
pub fn write_value<W: Write>(writer: &mut W, value: &Value, pool: &BufferPool) -> Result<()> {
    write_struct_array(writer, value.data(), pool)
}

use crate::binary::{
    BufferPool, write_argb, write_bool, write_layers, write_name, write_optional_array,
};
use crate::error::Result;
use crate::model::Edge;
use std::io::Write;

/// Encode one edge block in the current layout
pub fn write_edge<W: Write>(writer: &mut W, edge: &Edge, pool: &BufferPool) -> Result<()> {
    write_name(writer, edge.name())?;
    match edge.color() {
        Some(color) => {
            write_bool(writer, true)?;
            write_argb(writer, color)?;
        }
        None => write_bool(writer, false)?,
    }
    write_optional_array(writer, edge.points(), pool)?;
    write_layers(writer, edge.layers())
}

use crate::binary::{
    BufferPool, write_argb, write_bool, write_layers, write_name, write_optional_array,
};
use crate::error::Result;
use crate::model::Mesh;
use std::io::Write;

/// Encode one mesh block in the current layout
///
/// Index width follows the vertex count; the reader derives the same width
/// from the position count it has just decoded.
pub fn write_mesh<W: Write>(writer: &mut W, mesh: &Mesh, pool: &BufferPool) -> Result<()> {
    write_name(writer, mesh.name())?;

    match mesh.color() {
        Some(color) => {
            write_bool(writer, true)?;
            write_argb(writer, color)?;
        }
        None => write_bool(writer, false)?,
    }

    write_optional_array(writer, mesh.positions(), pool)?;
    write_optional_array(writer, mesh.normals(), pool)?;

    write_bool(writer, !mesh.indices().is_empty())?;
    if !mesh.indices().is_empty() {
        mesh.indices().write(writer, pool)?;
    }

    write_layers(writer, mesh.layers())?;
    write_optional_array(writer, mesh.tex_coords(), pool)?;
    write_optional_array(writer, mesh.vertex_colors(), pool)?;
    Ok(())
}

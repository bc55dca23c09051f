//! Triangulated surface meshes

use super::color::Color;
use super::geometry::{Bounds, Vec2, Vec3, same_elements, vertex_normals};
use crate::error::{Error, Result};
use crate::index::IndexArray;
use std::sync::OnceLock;

/// Triangulated surface mesh
///
/// Geometry is fixed at construction. Optional attributes are attached with
/// the `with_*` methods; an empty attribute array means "absent".
///
/// # Example
///
/// ```
/// use meshpart::{Mesh, Vec3};
///
/// # fn main() -> meshpart::Result<()> {
/// let mesh = Mesh::new(
///     vec![
///         Vec3::new(0.0, 0.0, 0.0),
///         Vec3::new(1.0, 0.0, 0.0),
///         Vec3::new(1.0, 1.0, 0.0),
///         Vec3::new(0.0, 1.0, 0.0),
///     ],
///     &[0, 1, 2, 0, 2, 3],
/// )?
/// .with_name("quad");
///
/// assert_eq!(mesh.triangle_count(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    colors: Vec<Color>,
    indices: IndexArray,
    color: Option<Color>,
    layers: Vec<String>,
    name: Option<String>,
    bounds: OnceLock<Option<Bounds>>,
}

impl Mesh {
    /// Create a mesh from positions and a flat triangle index list
    ///
    /// Normals are generated from the triangles. Fails with an argument
    /// error if an index is out of range or the index count is not a
    /// multiple of three.
    pub fn new(positions: Vec<Vec3>, indices: &[u32]) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidArgument(format!(
                "triangle index count {} is not a multiple of 3",
                indices.len()
            )));
        }
        let indices = IndexArray::from_indices(indices, positions.len())?;
        let normals = vertex_normals(&positions, indices.iter());
        Ok(Self {
            positions,
            normals,
            indices,
            ..Self::default()
        })
    }

    /// Assemble a decoded mesh
    ///
    /// Normals whose length does not match the positions are regenerated.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_decoded(
        positions: Vec<Vec3>,
        normals: Vec<Vec3>,
        tex_coords: Vec<Vec2>,
        colors: Vec<Color>,
        indices: IndexArray,
        color: Option<Color>,
        layers: Vec<String>,
        name: Option<String>,
    ) -> Self {
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            vertex_normals(&positions, indices.iter())
        };
        Self {
            positions,
            normals,
            tex_coords,
            colors,
            indices,
            color,
            layers,
            name,
            bounds: OnceLock::new(),
        }
    }

    /// Replace the generated normals
    ///
    /// Ignored (normals stay generated) when the length does not match the
    /// vertex count.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        if normals.len() == self.positions.len() {
            self.normals = normals;
        }
        self
    }

    /// Attach texture coordinates, one per vertex
    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> Result<Self> {
        self.check_per_vertex("texture coordinates", tex_coords.len())?;
        self.tex_coords = tex_coords;
        Ok(self)
    }

    /// Attach per-vertex colors
    pub fn with_vertex_colors(mut self, colors: Vec<Color>) -> Result<Self> {
        self.check_per_vertex("vertex colors", colors.len())?;
        self.colors = colors;
        Ok(self)
    }

    /// Set the default color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the layer tags
    pub fn with_layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = layers
            .into_iter()
            .map(Into::into)
            .filter(|l: &String| !l.is_empty())
            .collect();
        self
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    fn check_per_vertex(&self, what: &str, len: usize) -> Result<()> {
        if len != 0 && len != self.positions.len() {
            return Err(Error::InvalidArgument(format!(
                "{} count {} does not match vertex count {}",
                what,
                len,
                self.positions.len()
            )));
        }
        Ok(())
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Vertex normals, same length as the positions
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Texture coordinates, empty when absent
    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    /// Per-vertex colors, empty when absent
    pub fn vertex_colors(&self) -> &[Color] {
        &self.colors
    }

    /// Triangle indices
    pub fn indices(&self) -> &IndexArray {
        &self.indices
    }

    /// Default color
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Layer tags, empty when the mesh belongs to no layer
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounding box of the positions, computed on first access
    pub fn bounds(&self) -> Option<Bounds> {
        *self
            .bounds
            .get_or_init(|| Bounds::from_points(&self.positions))
    }
}

/// Float components compare bitwise, so NaN coordinates match themselves
impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        same_elements(&self.positions, &other.positions, Vec3::same_bits)
            && same_elements(&self.normals, &other.normals, Vec3::same_bits)
            && same_elements(&self.tex_coords, &other.tex_coords, Vec2::same_bits)
            && self.colors == other.colors
            && self.indices.iter().eq(other.indices.iter())
            && self.color == other.color
            && self.layers == other.layers
            && self.name == other.name
    }
}

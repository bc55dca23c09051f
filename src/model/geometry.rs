//! Small vector types and the geometry helpers the codec depends on

use crate::error::{Error, Result};
use nalgebra::Vector3;

/// Two-component single-precision vector (texture coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    /// U / X component
    pub x: f32,
    /// V / Y component
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub(crate) fn same_bits(&self, other: &Vec2) -> bool {
        same_f32(self.x, other.x) && same_f32(self.y, other.y)
    }
}

/// Three-component single-precision vector (positions, normals, points)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared euclidean distance to another point
    pub fn distance_squared(&self, other: &Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub(crate) fn same_bits(&self, other: &Vec3) -> bool {
        same_f32(self.x, other.x) && same_f32(self.y, other.y) && same_f32(self.z, other.z)
    }

    fn component_min(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    fn component_max(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }
}

/// Bitwise float equality under which any two NaNs match
pub(crate) fn same_f32(a: f32, b: f32) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

pub(crate) fn same_elements<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(x, y))
}

impl From<Vec3> for Vector3<f32> {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3<f32>> for Vec3 {
    fn from(v: Vector3<f32>) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    min: Vec3,
    max: Vec3,
}

impl Bounds {
    /// Create bounds from two corners
    ///
    /// Returns an argument error when any extent would be negative.
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        if max.x < min.x || max.y < min.y || max.z < min.z {
            return Err(Error::InvalidArgument(format!(
                "bounds have negative size: min {:?}, max {:?}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Smallest box containing every point, `None` for no points
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (min.component_min(p), max.component_max(p))
        });
        Some(Self { min, max })
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        Vec3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }
}

/// Area-weighted vertex normals for an indexed triangle list
///
/// Vertices referenced by no (or only degenerate) triangles get a zero
/// normal.
pub(crate) fn vertex_normals(positions: &[Vec3], indices: impl Iterator<Item = u32>) -> Vec<Vec3> {
    let mut accum = vec![Vector3::<f32>::zeros(); positions.len()];
    let indices: Vec<usize> = indices.map(|i| i as usize).collect();

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa: Vector3<f32> = positions[a].into();
        let pb: Vector3<f32> = positions[b].into();
        let pc: Vector3<f32> = positions[c].into();
        // Cross product length is twice the area, which weights the sum.
        let face = (pb - pa).cross(&(pc - pa));
        accum[a] += face;
        accum[b] += face;
        accum[c] += face;
    }

    accum
        .into_iter()
        .map(|n| {
            n.try_normalize(f32::EPSILON)
                .map(Vec3::from)
                .unwrap_or_default()
        })
        .collect()
}

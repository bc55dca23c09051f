//! Boundary polylines

use super::color::Color;
use super::geometry::{Bounds, Vec3, same_elements};
use std::sync::OnceLock;

/// Ordered point sequence describing a boundary or feature line
#[derive(Debug, Clone, Default)]
pub struct Edge {
    points: Vec<Vec3>,
    color: Option<Color>,
    layers: Vec<String>,
    name: Option<String>,
    bounds: OnceLock<Option<Bounds>>,
}

impl Edge {
    /// Create an edge from its points
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub(crate) fn from_decoded(
        points: Vec<Vec3>,
        color: Option<Color>,
        layers: Vec<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            points,
            color,
            layers,
            name,
            bounds: OnceLock::new(),
        }
    }

    /// Set the color
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

    /// Points in order
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Color
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Layer tags
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Bounding box of the points, computed on first access
    pub fn bounds(&self) -> Option<Bounds> {
        *self.bounds.get_or_init(|| Bounds::from_points(&self.points))
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        same_elements(&self.points, &other.points, Vec3::same_bits)
            && self.color == other.color
            && self.layers == other.layers
            && self.name == other.name
    }
}

/// Drop points closer than `sqrt(max_distance_squared)` to their predecessor
pub(crate) fn dedup_consecutive(points: Vec<Vec3>, max_distance_squared: f32) -> Vec<Vec3> {
    let mut out: Vec<Vec3> = Vec::with_capacity(points.len());
    for p in points {
        match out.last() {
            Some(last) if last.distance_squared(&p) <= max_distance_squared => {}
            _ => out.push(p),
        }
    }
    out
}

//! In-memory representation of stored models

mod assembly;
mod color;
mod edge;
mod geometry;
mod mesh;
mod metadata;
mod part;
mod values;

pub use assembly::Model;
pub use color::{Color, ColorScale, ColorStop};
pub use edge::Edge;
pub use geometry::{Bounds, Vec2, Vec3};
pub use mesh::Mesh;
pub use metadata::Metadata;
pub use part::{Part, PartBuilder};
pub use values::{Value, ValueDescriptor, ValueList};

pub(crate) use edge::dedup_consecutive;

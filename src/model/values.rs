//! Per-vertex scalar datasets

use super::color::ColorScale;
use super::geometry::{same_elements, same_f32};

/// Descriptor of a value dataset as recorded in the metadata document
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDescriptor {
    /// Dataset type tag, e.g. `"deviation"`
    pub data_type: String,
    /// Archive entry holding the data, e.g. `"deviation.bin"`
    pub file_name: String,
    /// Unit of the values
    pub unit: Option<String>,
    /// Color scale used to display the values
    pub color_scale: Option<ColorScale>,
}

impl ValueDescriptor {
    /// Create a descriptor storing `data_type` in `<data_type>.bin`
    pub fn new(data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            file_name: format!("{}.bin", data_type),
            data_type,
            unit: None,
            color_scale: None,
        }
    }

    /// Override the storage entry name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Set the unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Set the color scale
    pub fn with_color_scale(mut self, color_scale: ColorScale) -> Self {
        self.color_scale = Some(color_scale);
        self
    }
}

/// Values for one mesh, one entry per vertex; NaN marks "no value"
#[derive(Debug, Clone, Default)]
pub struct Value {
    data: Vec<f32>,
}

impl Value {
    /// Wrap per-vertex values
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Values in vertex order
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at a vertex, `None` when out of range or NaN
    pub fn get(&self, vertex: usize) -> Option<f32> {
        self.data.get(vertex).copied().filter(|v| !v.is_nan())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// NaN entries compare equal to each other
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        same_elements(&self.data, &other.data, |a, b| same_f32(*a, *b))
    }
}

impl From<Vec<f32>> for Value {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Named dataset holding one [`Value`] per mesh of the owning part
#[derive(Debug, Clone, PartialEq)]
pub struct ValueList {
    descriptor: ValueDescriptor,
    values: Vec<Value>,
}

impl ValueList {
    /// Create a value list
    pub fn new(descriptor: ValueDescriptor, values: Vec<Value>) -> Self {
        Self { descriptor, values }
    }

    /// Descriptor
    pub fn descriptor(&self) -> &ValueDescriptor {
        &self.descriptor
    }

    /// Dataset type tag
    pub fn data_type(&self) -> &str {
        &self.descriptor.data_type
    }

    /// Values, one per mesh
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the list holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

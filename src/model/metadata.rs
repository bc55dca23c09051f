//! Part and model metadata

use super::values::ValueDescriptor;
use crate::version::FileVersion;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Descriptive metadata recorded in an archive's `metadata.xml`
///
/// For legacy files that carry no model identifier, the reader derives one
/// from the archive contents. A nil [`Uuid`] only appears when metadata is
/// read on its own through [`crate::read_metadata`] and the document
/// records no identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Format revision the document was written with
    pub file_version: FileVersion,
    /// Tag of the format the geometry was imported from, e.g. `"stl"`
    pub source_format: Option<String>,
    /// Identifier of this model
    pub model_id: Uuid,
    /// Triangulation fingerprint
    pub triangulation_id: Uuid,
    /// Display name
    pub name: Option<String>,
    /// Number of parts; 1 for a single part
    pub part_count: usize,
    /// Every layer tag used by the geometry
    pub layers: BTreeSet<String>,
    /// Names of the models a combined model was assembled from
    pub source_models: Vec<String>,
    /// Value dataset descriptors, in dataset order
    pub values: Vec<ValueDescriptor>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            file_version: FileVersion::CURRENT,
            source_format: None,
            model_id: Uuid::nil(),
            triangulation_id: Uuid::nil(),
            name: None,
            part_count: 1,
            layers: BTreeSet::new(),
            source_models: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl Metadata {
    /// Descriptor for a dataset type
    pub fn value_descriptor(&self, data_type: &str) -> Option<&ValueDescriptor> {
        self.values.iter().find(|d| d.data_type == data_type)
    }
}

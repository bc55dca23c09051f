//! Parts: the unit a single archive (or one composite subfolder) stores

use super::edge::Edge;
use super::mesh::Mesh;
use super::metadata::Metadata;
use super::values::ValueList;
use crate::binary::BufferPool;
use crate::error::Result;
use crate::fingerprint::{DigestPolicy, triangulation_fingerprint};
use crate::validator;
use crate::version::FileVersion;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Meshes, edges and value datasets that share one triangulation fingerprint
///
/// A part is immutable once built except for its layer visibility, which is
/// process-local display state and never serialized. Visibility changes go
/// through `&self` so a part can be shared between threads.
#[derive(Debug)]
pub struct Part {
    meshes: Vec<Mesh>,
    edges: Vec<Edge>,
    value_lists: Vec<ValueList>,
    metadata: Metadata,
    thumbnail: Option<Vec<u8>>,
    disabled_layers: RwLock<BTreeSet<String>>,
}

impl Part {
    /// Start building a part
    pub fn builder() -> PartBuilder {
        PartBuilder::default()
    }

    /// Assemble a decoded part; `metadata` already carries the identifiers
    pub(crate) fn from_decoded(
        meshes: Vec<Mesh>,
        edges: Vec<Edge>,
        value_lists: Vec<ValueList>,
        metadata: Metadata,
        thumbnail: Option<Vec<u8>>,
    ) -> Result<Self> {
        validator::validate_value_lists(&meshes, &value_lists)?;
        validator::validate_value_lengths(&meshes, &value_lists)?;

        // The recorded layer list may predate tags carried by the geometry.
        let mut metadata = metadata;
        metadata.layers.extend(collect_layers(&meshes, &edges));
        Ok(Self {
            meshes,
            edges,
            value_lists,
            metadata,
            thumbnail,
            disabled_layers: RwLock::new(BTreeSet::new()),
        })
    }

    /// Copy of this part with its value datasets replaced
    ///
    /// Geometry, identifiers and layer visibility are kept.
    pub fn with_value_lists(&self, value_lists: Vec<ValueList>) -> Result<Self> {
        validator::validate_value_lists(&self.meshes, &value_lists)?;
        validator::validate_value_lengths(&self.meshes, &value_lists)?;
        let mut metadata = self.metadata.clone();
        metadata.values = value_lists.iter().map(|l| l.descriptor().clone()).collect();
        Ok(Self {
            meshes: self.meshes.clone(),
            edges: self.edges.clone(),
            value_lists,
            metadata,
            thumbnail: self.thumbnail.clone(),
            disabled_layers: RwLock::new(self.disabled_layers.read().clone()),
        })
    }

    pub(crate) fn set_name(&mut self, name: Option<String>) {
        self.metadata.name = name;
    }

    pub(crate) fn set_thumbnail(&mut self, thumbnail: Option<Vec<u8>>) {
        self.thumbnail = thumbnail;
    }

    /// Meshes in order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Edges in order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Value datasets in order
    pub fn value_lists(&self) -> &[ValueList] {
        &self.value_lists
    }

    /// Value dataset by type tag
    pub fn value_list(&self, data_type: &str) -> Option<&ValueList> {
        self.value_lists.iter().find(|l| l.data_type() == data_type)
    }

    /// Metadata
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Model identifier
    pub fn model_id(&self) -> Uuid {
        self.metadata.model_id
    }

    /// Triangulation fingerprint
    pub fn triangulation_id(&self) -> Uuid {
        self.metadata.triangulation_id
    }

    /// Name
    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    /// Preview image bytes (PNG)
    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    /// Every layer tag used by the part's geometry
    pub fn layers(&self) -> &BTreeSet<String> {
        &self.metadata.layers
    }

    /// Hide a layer
    pub fn disable_layer(&self, layer: impl Into<String>) {
        self.disabled_layers.write().insert(layer.into());
    }

    /// Show a previously hidden layer; returns whether it was hidden
    pub fn enable_layer(&self, layer: &str) -> bool {
        self.disabled_layers.write().remove(layer)
    }

    /// Whether a layer is shown
    pub fn is_layer_visible(&self, layer: &str) -> bool {
        !self.disabled_layers.read().contains(layer)
    }

    /// Snapshot of the hidden layers
    pub fn disabled_layers(&self) -> BTreeSet<String> {
        self.disabled_layers.read().clone()
    }

    /// Meshes that are shown under the current layer visibility
    ///
    /// A mesh without layer tags is always shown; a tagged mesh is hidden
    /// only when every one of its layers is disabled.
    pub fn visible_meshes(&self) -> Vec<&Mesh> {
        let disabled = self.disabled_layers.read();
        self.meshes
            .iter()
            .filter(|m| is_shown(m.layers(), &disabled))
            .collect()
    }

    /// Edges that are shown under the current layer visibility
    pub fn visible_edges(&self) -> Vec<&Edge> {
        let disabled = self.disabled_layers.read();
        self.edges
            .iter()
            .filter(|e| is_shown(e.layers(), &disabled))
            .collect()
    }
}

fn collect_layers(meshes: &[Mesh], edges: &[Edge]) -> BTreeSet<String> {
    meshes
        .iter()
        .flat_map(|m| m.layers())
        .chain(edges.iter().flat_map(|e| e.layers()))
        .cloned()
        .collect()
}

fn is_shown(layers: &[String], disabled: &BTreeSet<String>) -> bool {
    layers.is_empty() || layers.iter().any(|l| !disabled.contains(l))
}

impl Clone for Part {
    fn clone(&self) -> Self {
        Self {
            meshes: self.meshes.clone(),
            edges: self.edges.clone(),
            value_lists: self.value_lists.clone(),
            metadata: self.metadata.clone(),
            thumbnail: self.thumbnail.clone(),
            disabled_layers: RwLock::new(self.disabled_layers.read().clone()),
        }
    }
}

/// Layer visibility is display state and does not take part in equality
impl PartialEq for Part {
    fn eq(&self, other: &Self) -> bool {
        self.meshes == other.meshes
            && self.edges == other.edges
            && self.value_lists == other.value_lists
            && self.metadata == other.metadata
            && self.thumbnail == other.thumbnail
    }
}

/// Builder for [`Part`]
///
/// # Example
///
/// ```
/// use meshpart::{Mesh, Part, Value, ValueDescriptor, ValueList, Vec3};
///
/// # fn main() -> meshpart::Result<()> {
/// let mesh = Mesh::new(
///     vec![
///         Vec3::new(0.0, 0.0, 0.0),
///         Vec3::new(1.0, 0.0, 0.0),
///         Vec3::new(0.0, 1.0, 0.0),
///     ],
///     &[0, 1, 2],
/// )?;
/// let deviation = ValueList::new(
///     ValueDescriptor::new("deviation").with_unit("mm"),
///     vec![Value::new(vec![0.1, -0.2, f32::NAN])],
/// );
///
/// let part = Part::builder()
///     .with_name("bracket")
///     .with_mesh(mesh)
///     .with_value_list(deviation)
///     .build()?;
///
/// assert_eq!(part.meshes().len(), 1);
/// assert!(part.value_list("deviation").is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PartBuilder {
    meshes: Vec<Mesh>,
    edges: Vec<Edge>,
    value_lists: Vec<ValueList>,
    name: Option<String>,
    source_format: Option<String>,
    source_models: Vec<String>,
    thumbnail: Option<Vec<u8>>,
    model_id: Option<Uuid>,
    digest_policy: DigestPolicy,
}

impl PartBuilder {
    /// Add a mesh
    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.meshes.push(mesh);
        self
    }

    /// Add several meshes
    pub fn with_meshes(mut self, meshes: impl IntoIterator<Item = Mesh>) -> Self {
        self.meshes.extend(meshes);
        self
    }

    /// Add an edge
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Add several edges
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Add a value dataset
    pub fn with_value_list(mut self, list: ValueList) -> Self {
        self.value_lists.push(list);
        self
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    /// Set the source format tag
    pub fn with_source_format(mut self, format: impl Into<String>) -> Self {
        self.source_format = Some(format.into());
        self
    }

    /// Record the models this part was combined from
    pub fn with_source_models<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_models = names.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a preview image (PNG bytes)
    pub fn with_thumbnail(mut self, png: Vec<u8>) -> Self {
        self.thumbnail = Some(png);
        self
    }

    /// Use a fixed model identifier instead of a random one
    pub fn with_model_id(mut self, id: Uuid) -> Self {
        self.model_id = Some(id);
        self
    }

    /// Select the digest used for the triangulation fingerprint
    pub fn with_digest_policy(mut self, policy: DigestPolicy) -> Self {
        self.digest_policy = policy;
        self
    }

    /// Validate and build the part
    ///
    /// Fails with an integrity error when a value dataset does not hold one
    /// value per mesh or a value does not hold one entry per vertex, and with an argument error for conflicting dataset
    /// descriptors.
    pub fn build(self) -> Result<Part> {
        validator::validate_value_lists(&self.meshes, &self.value_lists)?;
        validator::validate_value_lengths(&self.meshes, &self.value_lists)?;

        let pool = BufferPool::new();
        let triangulation_id = triangulation_fingerprint(&self.meshes, self.digest_policy, &pool);
        let layers = collect_layers(&self.meshes, &self.edges);

        let metadata = Metadata {
            file_version: FileVersion::CURRENT,
            source_format: self.source_format,
            model_id: self.model_id.unwrap_or_else(Uuid::new_v4),
            triangulation_id,
            name: self.name,
            part_count: 1,
            layers,
            source_models: self.source_models,
            values: self
                .value_lists
                .iter()
                .map(|l| l.descriptor().clone())
                .collect(),
        };

        Ok(Part {
            meshes: self.meshes,
            edges: self.edges,
            value_lists: self.value_lists,
            metadata,
            thumbnail: self.thumbnail,
            disabled_layers: RwLock::new(BTreeSet::new()),
        })
    }
}

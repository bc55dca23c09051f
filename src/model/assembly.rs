//! Models: one part, or several parts combined into a composite

use super::metadata::Metadata;
use super::part::Part;
use crate::binary::BufferPool;
use crate::error::{Error, Result};
use crate::fingerprint::{DigestPolicy, triangulation_fingerprint};
use crate::version::FileVersion;
use uuid::Uuid;

/// A stored model
///
/// A model with one part is written flat at the archive root. A composite
/// model has its own root metadata and preview, with each part written to
/// a numbered subfolder.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    parts: Vec<Part>,
    root: Option<CompositeRoot>,
}

#[derive(Debug, Clone, PartialEq)]
struct CompositeRoot {
    metadata: Metadata,
    thumbnail: Option<Vec<u8>>,
}

impl Model {
    /// Wrap a single part
    pub fn single(part: Part) -> Self {
        Self {
            parts: vec![part],
            root: None,
        }
    }

    /// Combine several parts
    ///
    /// The root metadata records the part count, the union of all layers,
    /// the part names as source models, and a fingerprint over every part's
    /// meshes in part order. Fewer than two parts is an argument error; use
    /// [`Model::single`] for one part.
    pub fn composite(parts: Vec<Part>) -> Result<Self> {
        Self::composite_with_policy(parts, DigestPolicy::default())
    }

    /// [`Model::composite`] with an explicit digest policy
    pub fn composite_with_policy(parts: Vec<Part>, policy: DigestPolicy) -> Result<Self> {
        if parts.len() < 2 {
            return Err(Error::InvalidArgument(format!(
                "a composite model needs at least two parts, got {}",
                parts.len()
            )));
        }

        let pool = BufferPool::new();
        let metadata = Metadata {
            file_version: FileVersion::CURRENT,
            source_format: None,
            model_id: Uuid::new_v4(),
            triangulation_id: triangulation_fingerprint(
                parts.iter().flat_map(|p| p.meshes()),
                policy,
                &pool,
            ),
            name: None,
            part_count: parts.len(),
            layers: parts.iter().flat_map(|p| p.layers()).cloned().collect(),
            source_models: parts.iter().filter_map(|p| p.name()).map(String::from).collect(),
            values: Vec::new(),
        };

        Ok(Self {
            parts,
            root: Some(CompositeRoot {
                metadata,
                thumbnail: None,
            }),
        })
    }

    /// Assemble a decoded composite model
    pub(crate) fn from_decoded_composite(
        parts: Vec<Part>,
        metadata: Metadata,
        thumbnail: Option<Vec<u8>>,
    ) -> Self {
        Self {
            parts,
            root: Some(CompositeRoot {
                metadata,
                thumbnail,
            }),
        }
    }

    /// Set the model name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = Some(name.into()).filter(|n| !n.is_empty());
        match &mut self.root {
            Some(root) => root.metadata.name = name,
            None => {
                if let Some(part) = self.parts.first_mut() {
                    part.set_name(name);
                }
            }
        }
        self
    }

    /// Set the model preview image (PNG bytes)
    pub fn with_thumbnail(mut self, png: Vec<u8>) -> Self {
        match &mut self.root {
            Some(root) => root.thumbnail = Some(png),
            None => {
                if let Some(part) = self.parts.first_mut() {
                    part.set_thumbnail(Some(png));
                }
            }
        }
        self
    }

    /// Replace the recorded source model names of a composite model
    pub fn with_source_models<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Some(root) = &mut self.root {
            root.metadata.source_models = names.into_iter().map(Into::into).collect();
        }
        self
    }

    /// Whether the model is stored as a composite
    pub fn is_composite(&self) -> bool {
        self.root.is_some()
    }

    /// Parts in order
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Part by position
    pub fn part(&self, index: usize) -> Result<&Part> {
        self.parts.get(index).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "part index {} out of range for a model with {} parts",
                index,
                self.parts.len()
            ))
        })
    }

    /// Root metadata; for a single part this is the part's metadata
    pub fn metadata(&self) -> &Metadata {
        match &self.root {
            Some(root) => &root.metadata,
            None => self.parts[0].metadata(),
        }
    }

    /// Root preview image
    pub fn thumbnail(&self) -> Option<&[u8]> {
        match &self.root {
            Some(root) => root.thumbnail.as_deref(),
            None => self.parts[0].thumbnail(),
        }
    }

    /// Model identifier
    pub fn model_id(&self) -> Uuid {
        self.metadata().model_id
    }

    /// Triangulation fingerprint recorded at the root
    pub fn triangulation_id(&self) -> Uuid {
        self.metadata().triangulation_id
    }

    pub(crate) fn with_parts(&self, parts: Vec<Part>) -> Self {
        Self {
            parts,
            root: self.root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{Mesh, Vec3};

    fn part(name: &str, indices: &[u32]) -> Part {
        let mesh = Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            indices,
        )
        .unwrap()
        .with_layers([name]);
        Part::builder().with_name(name).with_mesh(mesh).build().unwrap()
    }

    #[test]
    fn test_composite_needs_two_parts() {
        let err = Model::composite(vec![part("a", &[0, 1, 2])]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_composite_root_metadata() {
        let model = Model::composite(vec![part("a", &[0, 1, 2]), part("b", &[0, 2, 3])])
            .unwrap()
            .with_name("assembly");
        let meta = model.metadata();
        assert_eq!(meta.part_count, 2);
        assert_eq!(meta.name.as_deref(), Some("assembly"));
        assert_eq!(meta.source_models, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(meta.layers.len(), 2);
        assert_ne!(meta.triangulation_id, model.parts()[0].triangulation_id());
    }

    #[test]
    fn test_part_lookup_out_of_range() {
        let model = Model::single(part("a", &[0, 1, 2]));
        assert!(model.part(0).is_ok());
        assert_eq!(model.part(1).unwrap_err().kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_single_forwards_to_part() {
        let model = Model::single(part("a", &[0, 1, 2]))
            .with_name("renamed")
            .with_thumbnail(vec![1, 2, 3]);
        assert_eq!(model.parts()[0].name(), Some("renamed"));
        assert_eq!(model.thumbnail(), Some(&[1u8, 2, 3][..]));
        assert_eq!(model.metadata().part_count, 1);
    }
}

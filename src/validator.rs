//! Consistency checks for parts and models
//!
//! Validation ensures that:
//! - Every value dataset holds exactly one value per mesh
//! - Every value holds one entry per vertex of its mesh
//! - Dataset type tags and storage entries are unique within a part
//! - Dataset storage entries do not collide with the fixed entries
//! - A model's recorded part count equals its actual part count

use crate::error::{Error, Result};
use crate::model::{Mesh, Model, Part, ValueList};
use crate::package::RESERVED_ENTRIES;
use std::collections::HashSet;

/// Validate a model before it is written
pub fn validate_model(model: &Model) -> Result<()> {
    let recorded = model.metadata().part_count;
    if recorded != model.parts().len() {
        return Err(Error::Integrity(format!(
            "metadata records {} parts but the model has {}",
            recorded,
            model.parts().len()
        )));
    }
    for (index, part) in model.parts().iter().enumerate() {
        validate_part(part).map_err(|e| match e {
            Error::Integrity(msg) => Error::Integrity(format!("part {}: {}", index, msg)),
            other => other,
        })?;
    }
    Ok(())
}

/// Validate a single part
pub fn validate_part(part: &Part) -> Result<()> {
    validate_value_lists(part.meshes(), part.value_lists())?;
    validate_value_lengths(part.meshes(), part.value_lists())
}

/// Check dataset counts and descriptors against the meshes they annotate
///
/// An empty mesh list or an empty dataset is accepted; otherwise the dataset
/// length must equal the mesh count.
pub(crate) fn validate_value_lists(meshes: &[Mesh], lists: &[ValueList]) -> Result<()> {
    let mut types = HashSet::new();
    let mut files = HashSet::new();

    for list in lists {
        if !meshes.is_empty() && !list.is_empty() && list.len() != meshes.len() {
            return Err(Error::Integrity(format!(
                "value list '{}' holds {} values for {} meshes",
                list.data_type(),
                list.len(),
                meshes.len()
            )));
        }

        let descriptor = list.descriptor();
        if descriptor.data_type.is_empty() {
            return Err(Error::InvalidArgument(
                "value list type tag must not be empty".to_string(),
            ));
        }
        validate_entry_name(&descriptor.file_name)?;

        if !types.insert(descriptor.data_type.as_str()) {
            return Err(Error::InvalidArgument(format!(
                "duplicate value list type '{}'",
                descriptor.data_type
            )));
        }
        if !files.insert(descriptor.file_name.as_str()) {
            return Err(Error::InvalidArgument(format!(
                "value lists share the storage entry '{}'",
                descriptor.file_name
            )));
        }
    }
    Ok(())
}

/// Check every non-empty value against its mesh's vertex count
pub(crate) fn validate_value_lengths(meshes: &[Mesh], lists: &[ValueList]) -> Result<()> {
    for list in lists {
        for (index, (value, mesh)) in list.values().iter().zip(meshes).enumerate() {
            if !value.is_empty() && value.len() != mesh.vertex_count() {
                return Err(Error::Integrity(format!(
                    "value list '{}' entry {} holds {} values for {} vertices",
                    list.data_type(),
                    index,
                    value.len(),
                    mesh.vertex_count()
                )));
            }
        }
    }
    Ok(())
}

fn validate_entry_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidArgument(format!(
            "invalid value storage entry name '{}'",
            name
        )));
    }
    if RESERVED_ENTRIES.contains(&name) {
        return Err(Error::InvalidArgument(format!(
            "value storage entry '{}' collides with a fixed entry",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::{Value, ValueDescriptor, Vec3};

    fn mesh() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            &[0, 1, 2],
        )
        .unwrap()
    }

    fn list(data_type: &str, values: usize) -> ValueList {
        ValueList::new(
            ValueDescriptor::new(data_type),
            vec![Value::new(vec![0.0; 3]); values],
        )
    }

    #[test]
    fn test_matching_counts_pass() {
        validate_value_lists(&[mesh(), mesh()], &[list("deviation", 2)]).unwrap();
    }

    #[test]
    fn test_empty_sides_are_accepted() {
        validate_value_lists(&[], &[list("deviation", 3)]).unwrap();
        validate_value_lists(&[mesh()], &[list("deviation", 0)]).unwrap();
    }

    #[test]
    fn test_count_mismatch_is_integrity_error() {
        let err = validate_value_lists(&[mesh()], &[list("deviation", 2)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn test_duplicate_type_is_argument_error() {
        let err = validate_value_lists(
            &[mesh()],
            &[list("deviation", 1), list("deviation", 1)],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_reserved_entry_name_is_rejected() {
        let list = ValueList::new(
            ValueDescriptor::new("mesh").with_file_name("meshes.bin"),
            vec![Value::default()],
        );
        let err = validate_value_lists(&[mesh()], &[list]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_value_length_must_match_vertices() {
        let list = ValueList::new(
            ValueDescriptor::new("deviation"),
            vec![Value::new(vec![1.0])],
        );
        let err = validate_value_lengths(&[mesh()], &[list]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }
}

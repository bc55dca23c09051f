//! Values-only updates guarded by the triangulation fingerprint

mod common;

use common::{Bytes, archive, deviation, metadata_xml, sample_part, square};
use meshpart::{ErrorKind, Mesh, Model, Part, Value, ValueDescriptor, ValueList, Vec3};
use std::io::Cursor;

fn values_archive(part: Part) -> Cursor<Vec<u8>> {
    Cursor::new(Model::single(part).to_bytes().unwrap())
}

#[test]
fn test_splice_replaces_values_and_keeps_geometry() {
    let base = Model::single(sample_part());
    let update = Part::builder()
        .with_mesh(common::decorated_square())
        .with_value_list(deviation(5.0))
        .with_value_list(ValueList::new(
            ValueDescriptor::new("thickness"),
            vec![Value::new(vec![1.0, 2.0, 3.0, 4.0])],
        ))
        .build()
        .unwrap();

    let spliced = base.with_values_from(values_archive(update)).unwrap();
    let part = &spliced.parts()[0];

    assert_eq!(part.value_lists().len(), 2);
    assert_eq!(part.value_list("deviation"), Some(&deviation(5.0)));
    assert_eq!(part.metadata().values.len(), 2);
    assert_eq!(part.meshes(), base.parts()[0].meshes());
    assert_eq!(part.name(), Some("bracket"));
    assert_eq!(spliced.model_id(), base.model_id());

    // the base model is not modified
    assert_eq!(base.parts()[0].value_list("deviation"), Some(&deviation(0.0)));
    assert!(base.parts()[0].value_list("thickness").is_none());
}

#[test]
fn test_splice_ignores_attribute_only_differences() {
    let base = Model::single(Part::builder().with_mesh(square()).build().unwrap());
    let moved = Mesh::new(
        vec![
            Vec3::new(9.0, 9.0, 9.0),
            Vec3::new(8.0, 9.0, 9.0),
            Vec3::new(8.0, 8.0, 9.0),
            Vec3::new(9.0, 8.0, 9.0),
        ],
        &[0, 1, 2, 0, 2, 3],
    )
    .unwrap();
    let update = Part::builder()
        .with_mesh(moved)
        .with_value_list(deviation(1.0))
        .build()
        .unwrap();

    let spliced = base.with_values_from(values_archive(update)).unwrap();
    assert_eq!(spliced.parts()[0].meshes()[0].positions(), square().positions());
    assert_eq!(spliced.parts()[0].value_lists().len(), 1);
}

#[test]
fn test_fingerprint_mismatch_is_integrity_error() {
    let base = Model::single(sample_part());
    let retriangulated = Mesh::new(square().positions().to_vec(), &[0, 1, 3, 1, 2, 3]).unwrap();
    let update = Part::builder()
        .with_mesh(retriangulated)
        .with_value_list(deviation(5.0))
        .build()
        .unwrap();

    let err = base.with_values_from(values_archive(update)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
    assert_eq!(base.parts()[0].value_list("deviation"), Some(&deviation(0.0)));
}

#[test]
fn test_part_count_mismatch_is_integrity_error() {
    let base = Model::single(sample_part());
    let composite = Model::composite(vec![sample_part(), sample_part()]).unwrap();
    let err = base
        .with_values_from(Cursor::new(composite.to_bytes().unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn test_composite_splice_checks_every_part() {
    let plain = || Part::builder().with_mesh(square()).build().unwrap();
    let base = Model::composite(vec![plain(), plain()]).unwrap();

    let with_values = || {
        Part::builder()
            .with_mesh(square())
            .with_value_list(deviation(2.0))
            .build()
            .unwrap()
    };
    let update = Model::composite(vec![with_values(), with_values()]).unwrap();
    let spliced = base
        .with_values_from(Cursor::new(update.to_bytes().unwrap()))
        .unwrap();
    assert!(spliced.is_composite());
    assert!(spliced.parts().iter().all(|p| p.value_lists().len() == 1));

    let other = Part::builder()
        .with_mesh(Mesh::new(square().positions().to_vec(), &[0, 1, 2]).unwrap())
        .build()
        .unwrap();
    let mismatched = Model::composite(vec![with_values(), other]).unwrap();
    let err = base
        .with_values_from(Cursor::new(mismatched.to_bytes().unwrap()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn test_archive_without_fingerprint_is_integrity_error() {
    let base = Model::single(Part::builder().with_mesh(square()).build().unwrap());
    let bytes = archive(&[("metadata.xml", &metadata_xml("3.3.0.0", ""))]);
    let err = base.with_values_from(Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn test_value_length_mismatch_is_rejected() {
    let base = Model::single(Part::builder().with_mesh(square()).build().unwrap());
    let fingerprint = base.triangulation_id();
    let extra = format!(
        "<triangulationId value=\"{}\"/><values><value type=\"deviation\" file=\"deviation.bin\"/></values>",
        fingerprint
    );
    // three values for a four-vertex mesh
    let mut values = Vec::new();
    values.extend_from_slice(&1i32.to_le_bytes());
    values.extend_from_slice(&3i32.to_le_bytes());
    for v in [0.0f32, 1.0, 2.0] {
        values.extend_from_slice(&v.to_le_bytes());
    }
    let bytes = archive(&[
        ("metadata.xml", &metadata_xml("3.3.0.0", &extra)),
        ("deviation.bin", &values),
    ]);
    let err = base.with_values_from(Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn test_decoded_value_length_mismatch_is_integrity_error() {
    let meshes = Bytes::default()
        .i32(1)
        .flag(false)
        .flag(false)
        .flag(true)
        .i32(3)
        .f32s(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
        .flag(false)
        .flag(true)
        .i32(3)
        .u8s(&[0, 1, 2])
        .flag(false)
        .flag(false)
        .flag(false)
        .0;
    // two values for a three-vertex mesh
    let values = Bytes::default().i32(1).i32(2).f32s(&[0.5, 1.5]).0;
    let extra = "<values><value type=\"deviation\" file=\"deviation.bin\"/></values>";
    let bytes = archive(&[
        ("metadata.xml", &metadata_xml("3.3.0.0", extra)),
        ("meshes.bin", &meshes),
        ("deviation.bin", &values),
    ]);
    let err = Model::from_reader(Cursor::new(bytes)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

//! Shared fixtures for the integration tests

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use meshpart::{Color, Edge, Mesh, Part, Value, ValueDescriptor, ValueList, Vec2, Vec3};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Unit square split into two triangles
pub fn square() -> Mesh {
    Mesh::new(
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        &[0, 1, 2, 0, 2, 3],
    )
    .unwrap()
}

/// Square with every optional attribute populated
pub fn decorated_square() -> Mesh {
    square()
        .with_tex_coords(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ])
        .unwrap()
        .with_vertex_colors(vec![Color::rgb(255, 0, 0); 4])
        .unwrap()
        .with_color(Color::argb(0x80, 10, 20, 30))
        .with_layers(["faces", "top"])
        .with_name("face 1")
}

/// Polyline along the square's border
pub fn border() -> Edge {
    Edge::new(vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
    ])
    .with_layers(["edges"])
    .with_name("border")
}

/// One value per vertex of [`square`]
pub fn deviation(offset: f32) -> ValueList {
    ValueList::new(
        ValueDescriptor::new("deviation").with_unit("mm"),
        vec![Value::new(vec![offset, offset + 0.1, f32::NAN, offset + 0.3])],
    )
}

/// Part holding a decorated square, a border edge and a deviation dataset
pub fn sample_part() -> Part {
    Part::builder()
        .with_name("bracket")
        .with_source_format("stl")
        .with_mesh(decorated_square())
        .with_edge(border())
        .with_value_list(deviation(0.0))
        .with_thumbnail(vec![0x89, b'P', b'N', b'G', 1, 2, 3])
        .build()
        .unwrap()
}

/// Build an archive from raw entries, in order
pub fn archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// Minimal metadata document for a file version
pub fn metadata_xml(version: &str, extra: &str) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata>\
         <fileVersion value=\"{}\"/>{}</metadata>",
        version, extra
    )
    .into_bytes()
}

/// Little-endian builder for hand-encoded entries
#[derive(Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn flag(mut self, value: bool) -> Self {
        self.0.push(value as u8);
        self
    }

    pub fn i32(mut self, value: i32) -> Self {
        self.0.write_i32::<LittleEndian>(value).unwrap();
        self
    }

    pub fn u8s(mut self, values: &[u8]) -> Self {
        self.0.extend_from_slice(values);
        self
    }

    pub fn u32s(mut self, values: &[u32]) -> Self {
        for v in values {
            self.0.write_u32::<LittleEndian>(*v).unwrap();
        }
        self
    }

    pub fn f32s(mut self, values: &[f32]) -> Self {
        for v in values {
            self.0.write_f32::<LittleEndian>(*v).unwrap();
        }
        self
    }

    pub fn f64s(mut self, values: &[f64]) -> Self {
        for v in values {
            self.0.write_f64::<LittleEndian>(*v).unwrap();
        }
        self
    }

    pub fn string(mut self, value: &str) -> Self {
        self = self.i32(value.len() as i32);
        self.0.extend_from_slice(value.as_bytes());
        self
    }
}

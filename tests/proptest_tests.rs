//! Property-based tests for meshpart
//!
//! Random meshes and value datasets are encoded and decoded to check that
//! persisted fields survive and that the fingerprint ignores attributes.

use meshpart::{
    Color, IndexArray, IndexWidth, Mesh, Model, Part, Value, ValueDescriptor, ValueList, Vec3,
};
use proptest::prelude::*;
use std::io::Cursor;

// ============================================================================
// Generators
// ============================================================================

fn vec3_strategy() -> impl Strategy<Value = Vec3> {
    (-1.0e4f32..1.0e4, -1.0e4f32..1.0e4, -1.0e4f32..1.0e4)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

/// Vertex count and triangle indices that stay in range
fn topology_strategy(max_vertices: usize) -> impl Strategy<Value = (usize, Vec<u32>)> {
    (3..max_vertices).prop_flat_map(|n| {
        let index = 0..n as u32;
        (
            Just(n),
            prop::collection::vec((index.clone(), index.clone(), index), 0..40)
                .prop_map(|tris| tris.into_iter().flat_map(|(a, b, c)| [a, b, c]).collect()),
        )
    })
}

fn mesh_strategy() -> impl Strategy<Value = Mesh> {
    (topology_strategy(400), any::<u32>(), prop::option::of("[a-z]{1,8}")).prop_flat_map(
        |((n, indices), color, name)| {
            prop::collection::vec(vec3_strategy(), n).prop_map(move |positions| {
                let mut mesh = Mesh::new(positions, &indices)
                    .unwrap()
                    .with_color(Color::from_argb(color));
                if let Some(name) = &name {
                    mesh = mesh.with_name(name.clone()).with_layers([name.clone()]);
                }
                mesh
            })
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Encoding then decoding reproduces every persisted mesh field
    #[test]
    fn prop_part_roundtrip(meshes in prop::collection::vec(mesh_strategy(), 0..4)) {
        let values = ValueList::new(
            ValueDescriptor::new("index"),
            meshes
                .iter()
                .map(|m| Value::new((0..m.vertex_count()).map(|i| i as f32).collect()))
                .collect(),
        );
        let mut builder = Part::builder().with_meshes(meshes);
        if !values.is_empty() {
            builder = builder.with_value_list(values);
        }
        let model = Model::single(builder.build().unwrap());

        let bytes = model.to_bytes().unwrap();
        let decoded = Model::from_reader(Cursor::new(bytes.clone())).unwrap();
        prop_assert_eq!(&decoded, &model);
        prop_assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }

    /// Moving vertices never changes the fingerprint
    #[test]
    fn prop_fingerprint_ignores_positions(
        (n, indices) in topology_strategy(300),
        offset in vec3_strategy(),
    ) {
        let grid: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let moved: Vec<Vec3> = grid
            .iter()
            .map(|p| Vec3::new(p.x + offset.x, p.y + offset.y, p.z + offset.z))
            .collect();

        let a = Part::builder().with_mesh(Mesh::new(grid, &indices).unwrap()).build().unwrap();
        let b = Part::builder().with_mesh(Mesh::new(moved, &indices).unwrap()).build().unwrap();
        prop_assert_eq!(a.triangulation_id(), b.triangulation_id());
    }

    /// Width is the narrowest that can address every vertex
    #[test]
    fn prop_index_width_follows_vertex_count(vertex_count in 1usize..100_000) {
        let width = IndexWidth::for_vertex_count(vertex_count);
        let expected = if vertex_count <= 255 {
            IndexWidth::U8
        } else if vertex_count <= 32_767 {
            IndexWidth::U16
        } else {
            IndexWidth::U32
        };
        prop_assert_eq!(width, expected);

        let last = vertex_count as u32 - 1;
        let array = IndexArray::from_indices(&[0, last, last / 2], vertex_count).unwrap();
        prop_assert_eq!(array.width(), expected);
        prop_assert_eq!(array.get(1).unwrap(), last);
        prop_assert!(array.get(3).is_err());
    }
}

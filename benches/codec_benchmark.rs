use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use meshpart::{DigestPolicy, Mesh, Model, Part, Value, ValueDescriptor, ValueList, Vec3};
use std::hint::black_box;
use std::io::Cursor;

/// Grid of `side * side` vertices triangulated into `2 * (side - 1)^2` triangles
fn grid_mesh(side: usize) -> Mesh {
    let positions = (0..side * side)
        .map(|i| Vec3::new((i % side) as f32, (i / side) as f32, 0.0))
        .collect();
    let mut indices = Vec::with_capacity(6 * (side - 1) * (side - 1));
    for y in 0..side - 1 {
        for x in 0..side - 1 {
            let i = (y * side + x) as u32;
            let s = side as u32;
            indices.extend_from_slice(&[i, i + 1, i + s + 1, i, i + s + 1, i + s]);
        }
    }
    Mesh::new(positions, &indices).unwrap()
}

fn grid_model(side: usize, policy: DigestPolicy) -> Model {
    let mesh = grid_mesh(side);
    let values = ValueList::new(
        ValueDescriptor::new("height"),
        vec![Value::new(
            mesh.positions().iter().map(|p| p.x * 0.01).collect(),
        )],
    );
    Model::single(
        Part::builder()
            .with_mesh(mesh)
            .with_value_list(values)
            .with_digest_policy(policy)
            .build()
            .unwrap(),
    )
}

// 10 -> 8-bit, 100 -> 16-bit, 300 -> 32-bit indices
const SIDES: [usize; 3] = [10, 100, 300];

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    for side in SIDES {
        let model = grid_model(side, DigestPolicy::Accelerated);
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &model, |b, model| {
            b.iter(|| black_box(model.to_bytes().unwrap()));
        });
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    for side in SIDES {
        let bytes = grid_model(side, DigestPolicy::Accelerated).to_bytes().unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(side), &bytes, |b, bytes| {
            b.iter(|| black_box(Model::from_reader(Cursor::new(bytes.as_slice())).unwrap()));
        });
    }
    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");
    group.sample_size(20);
    let mesh = grid_mesh(300);
    for policy in [DigestPolicy::Accelerated, DigestPolicy::Portable] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", policy)),
            &policy,
            |b, &policy| {
                b.iter(|| {
                    let part = Part::builder()
                        .with_mesh(mesh.clone())
                        .with_digest_policy(policy)
                        .build()
                        .unwrap();
                    black_box(part.triangulation_id())
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_write, bench_read, bench_fingerprint);
criterion_main!(benches);

//! Benchmarks for the string solver, the jelly update and the grid transform.

#![expect(missing_docs)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use jelly_sim::{Constraints, HardnessParam, Jelly, JellyGrid, JellyShape, Point3D, String3D};
use rand::prelude::*;

fn string_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("string-update");
    for num_segments in [8, 64, 512] {
        let mut s = String3D::new(num_segments, 2.0, 1.0, 1.0).unwrap_or_else(|e| unreachable!("{e}"));
        let target = Point3D::new(0.1, 0.0, 0.0);
        group.bench_function(BenchmarkId::from_parameter(num_segments), |b| {
            b.iter(|| {
                s.add_hardness_force(4.0, 0.5);
                s.add_force(-9.8, 0.5);
                s.update(0.01, &Constraints::pinned(target))
            });
        });
    }
    group.finish();
}

fn jelly_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("jelly-update");
    let mut jelly = Jelly::new(JellyShape::default().with_rings(8, 24), &HardnessParam::default())
        .unwrap_or_else(|e| unreachable!("{e}"));
    jelly
        .attach_tentacles(32, 2.0, 10.0)
        .unwrap_or_else(|e| unreachable!("{e}"));

    let mut seq = jelly.clone();
    group.bench_function("sequential", |b| b.iter(|| seq.update(0.01, 0.5)));
    group.bench_function("parallel", |b| b.iter(|| jelly.par_update(0.01, 0.5)));
    group.finish();
}

fn grid_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid-transform");
    let grid = JellyGrid::new(8).unwrap_or_else(|e| unreachable!("{e}"));
    let mut rng = StdRng::seed_from_u64(42);
    let locals = (0..10_000)
        .map(|_| {
            Point3D::new(
                rng.random_range(-1.0..=1.0),
                rng.random_range(-1.0..=1.0),
                rng.random_range(0.0..=1.0),
            )
        })
        .collect::<Vec<_>>();

    group.bench_function("sequential", |b| {
        b.iter_with_large_drop(|| locals.iter().map(|&p| grid.transform_grid_point(p)).collect::<Vec<_>>());
    });
    group.bench_function("parallel", |b| b.iter_with_large_drop(|| grid.par_transform_grid_points(&locals)));
    group.finish();
}

criterion_group!(benches, string_update, jelly_update, grid_transform);
criterion_main!(benches);

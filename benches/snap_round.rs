use criterion::{black_box, criterion_group, criterion_main, Criterion};

use snapround::{
    chain::{ChainVec, NodedChain},
    generators::{crossing_grid, near_misses, star},
    snap_round::find_interior_intersections,
    Noder, Point, PrecisionModel, SnapRounder,
};

fn intersections_only(c: &mut Criterion) {
    let chains = crossing_grid(30, 10.0, 0.7);

    c.bench_function("intersections of a 30x30 grid", |b| {
        b.iter(|| {
            let mut noded: ChainVec<_> = chains.iter().map(NodedChain::from_chain).collect();
            black_box(find_interior_intersections(&mut noded))
        })
    });
}

fn snap_round_grid(c: &mut Criterion) {
    let chains = crossing_grid(30, 10.0, 0.7);
    let precision = PrecisionModel::from_scale(1.0).unwrap();

    c.bench_function("snap round a 30x30 grid", |b| {
        b.iter(|| {
            let mut rounder = SnapRounder::new(precision);
            rounder.compute_nodes(&chains);
            black_box(rounder.noded_substrings())
        })
    });
}

fn snap_round_star(c: &mut Criterion) {
    let chains = star(50, Point::new(0.0, 0.0), 100.0);
    let precision = PrecisionModel::from_scale(1.0).unwrap();

    c.bench_function("snap round a star", |b| {
        b.iter(|| black_box(snapround::snap_round(&chains, precision).unwrap()))
    });
}

fn snap_round_near_misses(c: &mut Criterion) {
    let chains = near_misses(20, 50, 0.05);
    let precision = PrecisionModel::from_scale(10.0).unwrap();

    c.bench_function("snap round near misses", |b| {
        b.iter(|| black_box(snapround::snap_round(&chains, precision).unwrap()))
    });
}

criterion_group!(
    benches,
    intersections_only,
    snap_round_grid,
    snap_round_star,
    snap_round_near_misses
);
criterion_main!(benches);

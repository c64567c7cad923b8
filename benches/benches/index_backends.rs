// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tenon_index::{Aabb2D, Index, IndexGeneric, Key};

fn grid(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Aabb2D::from_xywh(x as f64 * cell, y as f64 * cell, cell, cell));
        }
    }
    out
}

/// Overlapping widgets: each box spans `scale` cells.
fn stacked(n: usize, cell: f64, scale: f64) -> Vec<Aabb2D<f64>> {
    grid(n, cell)
        .into_iter()
        .map(|r| Aabb2D::from_xywh(r.min_x, r.min_y, cell * scale, cell * scale))
        .collect()
}

struct Rng(u64);

impl Rng {
    fn next_f64(&mut self) -> f64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x >> 11) as f64 / (1_u64 << 53) as f64
    }
}

fn probes(count: usize, extent: f64) -> Vec<(f64, f64)> {
    let mut rng = Rng(0x7E40_5CE4_E000_0001);
    (0..count)
        .map(|_| (rng.next_f64() * extent, rng.next_f64() * extent))
        .collect()
}

fn fill<B>(idx: &mut IndexGeneric<f64, u32, B>, rects: &[Aabb2D<f64>]) -> Vec<Key>
where
    B: tenon_index::Backend<f64>,
{
    let keys = rects
        .iter()
        .enumerate()
        .map(|(i, &r)| idx.insert(r, i as u32))
        .collect();
    let _ = idx.commit();
    keys
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_commit");
    for &n in &[32_usize, 64, 128] {
        let rects = grid(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("flatvec_n{n}"), |b| {
            b.iter_batched(
                Index::<f64, u32>::new,
                |mut idx| black_box(fill(&mut idx, &rects).len()),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("rtree_8_n{n}"), |b| {
            b.iter_batched(
                Index::<f64, u32>::with_rtree,
                |mut idx| black_box(fill(&mut idx, &rects).len()),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("rtree_50_n{n}"), |b| {
            b.iter_batched(
                || Index::<f64, u32>::with_rtree_fanout(25, 50),
                |mut idx| black_box(fill(&mut idx, &rects).len()),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_point_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_queries");
    let rects = stacked(128, 8.0, 3.0);
    let points = probes(1024, 1024.0);
    group.throughput(Throughput::Elements(points.len() as u64));

    let mut flat = Index::<f64, u32>::new();
    fill(&mut flat, &rects);
    group.bench_function("flatvec", |b| {
        b.iter(|| {
            let hits: usize = points.iter().map(|&(x, y)| flat.query_point(x, y).count()).sum();
            black_box(hits)
        });
    });

    for (min, max) in [(4, 8), (25, 50)] {
        let mut rtree = Index::<f64, u32>::with_rtree_fanout(min, max);
        fill(&mut rtree, &rects);
        group.bench_function(format!("rtree_{min}_{max}"), |b| {
            b.iter(|| {
                let hits: usize =
                    points.iter().map(|&(x, y)| rtree.query_point(x, y).count()).sum();
                black_box(hits)
            });
        });
    }
    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh_then_commit");
    let rects = grid(64, 10.0);
    group.bench_function("rtree_move_all", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<f64, u32>::with_rtree_fanout(25, 50);
                let keys = fill(&mut idx, &rects);
                (idx, keys)
            },
            |(mut idx, keys)| {
                for (k, r) in keys.into_iter().zip(&rects) {
                    idx.update(k, Aabb2D::from_xywh(r.min_x + 3.0, r.min_y, 10.0, 10.0));
                }
                black_box(idx.commit().moved.len())
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("rtree_remove_half", |b| {
        b.iter_batched(
            || {
                let mut idx = Index::<f64, u32>::with_rtree_fanout(25, 50);
                let keys = fill(&mut idx, &rects);
                (idx, keys)
            },
            |(mut idx, keys)| {
                for k in keys.into_iter().step_by(2) {
                    idx.remove(k);
                }
                black_box(idx.commit().removed.len())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_point_queries, bench_refresh);
criterion_main!(benches);

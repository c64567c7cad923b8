// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tenon_index::{Aabb2D, Index};

use rstar::primitives::Rectangle;
use rstar::{AABB, RTree};

fn grid(n: usize, cell: f64) -> Vec<Aabb2D<f64>> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            out.push(Aabb2D::from_xywh(x as f64 * cell, y as f64 * cell, cell, cell));
        }
    }
    out
}

fn bench_incremental_build_and_probe(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare");
    for &n in &[64_usize, 128] {
        let rects = grid(n, 10.0);
        let probes: Vec<(f64, f64)> = (0..256)
            .map(|i| (f64::from(i % 16) * 37.0 + 5.0, f64::from(i / 16) * 37.0 + 5.0))
            .collect();
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("tenon_25_50_n{n}"), |b| {
            b.iter_batched(
                || Index::<f64, u32>::with_rtree_fanout(25, 50),
                |mut idx| {
                    for (i, r) in rects.iter().copied().enumerate() {
                        let _ = idx.insert(r, i as u32);
                    }
                    let _ = idx.commit();
                    let hits: usize = probes.iter().map(|&(x, y)| idx.query_point(x, y).count()).sum();
                    black_box(hits)
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_n{n}"), |b| {
            b.iter_batched(
                RTree::<Rectangle<[f64; 2]>>::new,
                |mut tree| {
                    for r in &rects {
                        tree.insert(Rectangle::from_corners([r.min_x, r.min_y], [r.max_x, r.max_y]));
                    }
                    let hits: usize = probes
                        .iter()
                        .map(|&(x, y)| {
                            tree.locate_in_envelope_intersecting(&AABB::from_point([x, y]))
                                .count()
                        })
                        .sum();
                    black_box(hits)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_incremental_build_and_probe);
criterion_main!(benches);

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tenon_scene::{Context, FlexWrap, Length, NodeId, NullRenderer, ViewStyle};

/// A wrapping grid of `n * n` clickable tiles.
fn tiles(n: usize) -> (Context, Vec<NodeId>) {
    let mut cx = Context::new().expect("context");
    cx.set_viewport(1600.0, 1600.0);
    let ids = cx
        .view(|ui, root| {
            ui.style(root, |t, l| t.set_flex_wrap(l, FlexWrap::Wrap))?;
            let mut ids = Vec::with_capacity(n * n);
            for _ in 0..n * n {
                let tile = ui.view(ViewStyle::default())?;
                ui.style(tile, |t, l| {
                    t.set_width(l, Length::Px(20.0));
                    t.set_height(l, Length::Px(20.0));
                })?;
                ui.on_click(tile, |_, _| {});
                ids.push(tile);
            }
            ui.add_child(root, &ids)?;
            Ok(ids)
        })
        .expect("build");
    cx.update().expect("layout");
    cx.draw(&mut NullRenderer);
    (cx, ids)
}

fn bench_steady_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_steady_frame");
    for n in [16_usize, 48] {
        let (mut cx, _) = tiles(n);
        group.bench_function(format!("tiles_{}", n * n), |b| {
            b.iter(|| {
                cx.update().expect("layout");
                black_box(cx.draw(&mut NullRenderer).is_empty())
            });
        });
    }
    group.finish();
}

fn bench_reflow(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene_reflow");
    let (mut cx, ids) = tiles(48);
    let mut wide = false;
    group.bench_function("resize_first_tile", |b| {
        b.iter(|| {
            wide = !wide;
            let w = if wide { 40.0 } else { 20.0 };
            cx.with_layout(ids[0], |t, l| t.set_width(l, Length::Px(w)))
                .expect("alive");
            cx.update().expect("layout");
            black_box(cx.draw(&mut NullRenderer).dirty_rects.len())
        });
    });
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let (mut cx, _) = tiles(48);
    c.bench_function("scene_dispatch_1024_samples", |b| {
        b.iter(|| {
            let mut invoked = 0;
            for i in 0..1024_u32 {
                let x = f64::from(i % 32) * 30.0 + 3.0;
                let y = f64::from(i / 32) * 30.0 + 3.0;
                invoked += cx.listen_pointer(x, y, i % 2 == 0).invoked;
            }
            black_box(invoked)
        });
    });
}

criterion_group!(benches, bench_steady_frame, bench_reflow, bench_dispatch);
criterion_main!(benches);

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tenon Index on its own: insert, move, remove, commit damage, and query.
//!
//! Run:
//! - `cargo run -p tenon_demos --example index_basics`

use tenon_index::{Aabb2D, Index};

fn main() {
    let mut idx = Index::<i64, &str>::with_rtree_fanout(2, 4);
    let keys: Vec<_> = (0..12)
        .map(|i| idx.insert(Aabb2D::from_xywh(i * 10, 0, 10, 10), "tile"))
        .collect();
    let slider = idx.insert(Aabb2D::new(0, 20, 100, 30), "slider");
    let dmg = idx.commit();
    println!("first commit added {} boxes", dmg.added.len());

    // Drag the slider down and drop every other tile.
    idx.update(slider, Aabb2D::new(0, 40, 100, 50));
    for &k in keys.iter().step_by(2) {
        idx.remove(k);
    }
    let dmg = idx.commit();
    println!(
        "second commit: moved={:?} removed={} union={:?}",
        dmg.moved,
        dmg.removed.len(),
        dmg.union()
    );
    println!("rtree height: {}", idx.backend().height());

    let at = |x, y| idx.query_point(x, y).map(|(_, p)| p).collect::<Vec<_>>();
    println!("hits at (15, 5): {:?}", at(15, 5));
    println!("hits at (5, 5): {:?}", at(5, 5));
    println!("hits at (50, 45): {:?}", at(50, 45));

    assert_eq!(at(15, 5), ["tile"]);
    assert!(at(5, 5).is_empty());
    assert_eq!(at(50, 45), ["slider"]);
    assert_eq!(idx.len(), 7);
}

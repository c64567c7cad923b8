// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dynamic R-tree backend generic over `T: Scalar`.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Axis, Scalar, cmp_t};

/// Height-balanced R-tree with configurable fanout.
///
/// Every node except the root holds between `min_children` and `max_children`
/// entries, and all leaves sit at the same depth. Inserts descend by least
/// enlargement; overflowing nodes split with the sweep heuristic described in
/// [`backends`](crate::backends). Removal condenses underfull nodes and reinserts
/// the entries they held, so the tree stays balanced under churn.
#[derive(Clone)]
pub struct RTree<T> {
    min_children: usize,
    max_children: usize,
    root: Option<usize>,
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    slots: Vec<Option<Aabb2D<T>>>,
}

#[derive(Clone)]
struct Node<T> {
    bbox: Aabb2D<T>,
    children: Children<T>,
}

#[derive(Clone)]
enum Children<T> {
    Leaf(Vec<(usize, Aabb2D<T>)>),
    Inner(Vec<usize>),
}

impl<T> Children<T> {
    fn len(&self) -> usize {
        match self {
            Self::Leaf(items) => items.len(),
            Self::Inner(kids) => kids.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Scalar> Default for RTree<T> {
    fn default() -> Self {
        Self::with_fanout(4, 8)
    }
}

impl<T: Scalar> RTree<T> {
    /// Create an empty tree with the given node capacity range.
    ///
    /// Values are clamped so that `max_children >= 3` and
    /// `2 <= min_children <= (max_children + 1) / 2`; a split must always be able
    /// to leave both halves at least `min_children` full.
    pub fn with_fanout(min_children: usize, max_children: usize) -> Self {
        let max_children = max_children.max(3);
        let min_children = min_children.clamp(2, max_children.div_ceil(2));
        Self {
            min_children,
            max_children,
            root: None,
            nodes: Vec::new(),
            free: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Minimum number of entries in a non-root node.
    pub fn min_children(&self) -> usize {
        self.min_children
    }

    /// Maximum number of entries in any node.
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// Number of levels; `0` when empty.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut cur = self.root;
        while let Some(n) = cur {
            height += 1;
            cur = match &self.nodes[n].children {
                Children::Inner(kids) => kids.first().copied(),
                Children::Leaf(_) => None,
            };
        }
        height
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        if let Some(i) = self.free.pop() {
            self.nodes[i] = node;
            i
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, n: usize) {
        self.nodes[n].children = Children::Leaf(Vec::new());
        self.free.push(n);
    }

    fn bounds_of(&self, children: &Children<T>) -> Option<Aabb2D<T>> {
        match children {
            Children::Leaf(items) => union_all(items.iter().map(|&(_, b)| b)),
            Children::Inner(kids) => union_all(kids.iter().map(|&k| self.nodes[k].bbox)),
        }
    }

    fn refit(&mut self, n: usize) {
        if let Some(bbox) = self.bounds_of(&self.nodes[n].children) {
            self.nodes[n].bbox = bbox;
        }
    }

    /// Child position and id with the least enlargement; ties go to the smaller box.
    fn choose_subtree(&self, kids: &[usize], bbox: &Aabb2D<T>) -> Option<(usize, usize)> {
        let mut best: Option<(T::Acc, T::Acc, usize, usize)> = None;
        for (pos, &kid) in kids.iter().enumerate() {
            let kb = &self.nodes[kid].bbox;
            let grow = kb.enlargement(bbox);
            let area = kb.area();
            let better = match best {
                None => true,
                Some((bg, ba, _, _)) => grow < bg || (grow == bg && area < ba),
            };
            if better {
                best = Some((grow, area, pos, kid));
            }
        }
        best.map(|(_, _, pos, kid)| (pos, kid))
    }

    /// Insert below `n`. Returns a new sibling of `n` if `n` had to split.
    fn insert_into(&mut self, n: usize, slot: usize, bbox: Aabb2D<T>) -> Option<usize> {
        let target = match &self.nodes[n].children {
            Children::Leaf(_) => None,
            Children::Inner(kids) => self.choose_subtree(kids, &bbox),
        };
        self.nodes[n].bbox = self.nodes[n].bbox.union(&bbox);
        match target {
            None => {
                if let Children::Leaf(items) = &mut self.nodes[n].children {
                    items.push((slot, bbox));
                }
            }
            Some((pos, kid)) => {
                if let Some(sibling) = self.insert_into(kid, slot, bbox)
                    && let Children::Inner(kids) = &mut self.nodes[n].children
                {
                    kids.insert(pos + 1, sibling);
                }
            }
        }
        (self.nodes[n].children.len() > self.max_children).then(|| self.split(n))
    }

    /// Split an overflowing node in place; the upper half moves to a new node.
    fn split(&mut self, n: usize) -> usize {
        let min = self.min_children;
        let children =
            core::mem::replace(&mut self.nodes[n].children, Children::Inner(Vec::new()));
        let (left, right) = match children {
            Children::Leaf(mut items) => {
                let k = sweep_split(&mut items, min, |&(_, b)| b);
                let right = items.split_off(k);
                (Children::Leaf(items), Children::Leaf(right))
            }
            Children::Inner(mut kids) => {
                let nodes = &self.nodes;
                let k = sweep_split(&mut kids, min, |&kid| nodes[kid].bbox);
                let right = kids.split_off(k);
                (Children::Inner(kids), Children::Inner(right))
            }
        };
        let right_bbox = self.bounds_of(&right).unwrap_or(self.nodes[n].bbox);
        self.nodes[n].children = left;
        self.refit(n);
        self.alloc(Node {
            bbox: right_bbox,
            children: right,
        })
    }

    fn insert_entry(&mut self, slot: usize, bbox: Aabb2D<T>) {
        let Some(root) = self.root else {
            let root = self.alloc(Node {
                bbox,
                children: Children::Leaf(vec![(slot, bbox)]),
            });
            self.root = Some(root);
            return;
        };
        if let Some(sibling) = self.insert_into(root, slot, bbox) {
            let bbox = self.nodes[root].bbox.union(&self.nodes[sibling].bbox);
            let grown = self.alloc(Node {
                bbox,
                children: Children::Inner(vec![root, sibling]),
            });
            self.root = Some(grown);
        }
    }

    /// Depth-first search for the leaf holding `slot`, recording `(parent, position)` steps.
    fn find_leaf(
        &self,
        n: usize,
        slot: usize,
        bbox: &Aabb2D<T>,
        path: &mut Vec<(usize, usize)>,
    ) -> Option<usize> {
        if !self.nodes[n].bbox.overlaps(bbox) {
            return None;
        }
        match &self.nodes[n].children {
            Children::Leaf(items) => items.iter().any(|&(s, _)| s == slot).then_some(n),
            Children::Inner(kids) => {
                for (pos, &kid) in kids.iter().enumerate() {
                    path.push((n, pos));
                    if let Some(leaf) = self.find_leaf(kid, slot, bbox, path) {
                        return Some(leaf);
                    }
                    path.pop();
                }
                None
            }
        }
    }

    /// Free the subtree at `n`, moving its leaf entries into `out`.
    fn drain_subtree(&mut self, n: usize, out: &mut Vec<(usize, Aabb2D<T>)>) {
        match core::mem::replace(&mut self.nodes[n].children, Children::Leaf(Vec::new())) {
            Children::Leaf(items) => out.extend(items),
            Children::Inner(kids) => {
                for kid in kids {
                    self.drain_subtree(kid, out);
                }
            }
        }
        self.release(n);
    }

    fn remove_entry(&mut self, slot: usize, bbox: &Aabb2D<T>) {
        let Some(root) = self.root else {
            return;
        };
        let mut path = Vec::new();
        let Some(leaf) = self.find_leaf(root, slot, bbox, &mut path) else {
            return;
        };
        if let Children::Leaf(items) = &mut self.nodes[leaf].children {
            items.retain(|&(s, _)| s != slot);
        }

        // Condense: detach underfull nodes on the way up and keep their entries.
        let mut orphans = Vec::new();
        let mut n = leaf;
        while let Some((parent, pos)) = path.pop() {
            if self.nodes[n].children.len() < self.min_children {
                if let Children::Inner(kids) = &mut self.nodes[parent].children {
                    kids.remove(pos);
                }
                self.drain_subtree(n, &mut orphans);
            } else {
                self.refit(n);
            }
            n = parent;
        }
        self.refit(root);

        // Shrink the root while it is a single-child inner node.
        loop {
            let Some(r) = self.root else { break };
            match &self.nodes[r].children {
                Children::Inner(kids) if kids.len() == 1 => {
                    self.root = Some(kids[0]);
                    self.release(r);
                }
                c if c.is_empty() => {
                    self.root = None;
                    self.release(r);
                }
                _ => break,
            }
        }

        for (s, b) in orphans {
            self.insert_entry(s, b);
        }
    }

    fn search(&self, mut visit: impl FnMut(&Aabb2D<T>) -> bool, out: &mut Vec<usize>) {
        let Some(root) = self.root else {
            return;
        };
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            let node = &self.nodes[n];
            if !visit(&node.bbox) {
                continue;
            }
            match &node.children {
                Children::Leaf(items) => {
                    out.extend(items.iter().filter(|(_, b)| visit(b)).map(|&(s, _)| s));
                }
                Children::Inner(kids) => stack.extend_from_slice(kids),
            }
        }
    }

    /// Walk the tree and assert structural invariants.
    #[cfg(test)]
    fn check(&self) {
        fn walk<T: Scalar>(
            t: &RTree<T>,
            n: usize,
            depth: usize,
            leaf_depth: &mut Option<usize>,
        ) -> usize {
            let node = &t.nodes[n];
            let len = node.children.len();
            if Some(n) != t.root {
                assert!(len >= t.min_children, "node {n} underfull: {len}");
            }
            assert!(len <= t.max_children, "node {n} overfull: {len}");
            assert_eq!(t.bounds_of(&node.children), Some(node.bbox), "loose bbox at {n}");
            match &node.children {
                Children::Leaf(items) => {
                    assert_eq!(*leaf_depth.get_or_insert(depth), depth, "unbalanced leaves");
                    items.len()
                }
                Children::Inner(kids) => kids
                    .iter()
                    .map(|&k| walk(t, k, depth + 1, leaf_depth))
                    .sum(),
            }
        }
        let live = self.slots.iter().flatten().count();
        let stored = self.root.map_or(0, |r| walk(self, r, 0, &mut None));
        assert_eq!(live, stored, "slot table and tree disagree");
    }
}

impl<T: Scalar> Backend<T> for RTree<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.slots.len() <= slot {
            self.slots.resize(slot + 1, None);
        }
        if let Some(old) = self.slots[slot].replace(aabb) {
            self.remove_entry(slot, &old);
        }
        self.insert_entry(slot, aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.slots.get(slot).is_some_and(Option::is_some) {
            self.insert(slot, aabb);
        }
    }

    fn remove(&mut self, slot: usize) {
        if let Some(old) = self.slots.get_mut(slot).and_then(Option::take) {
            self.remove_entry(slot, &old);
        }
    }

    fn clear(&mut self) {
        self.root = None;
        self.nodes.clear();
        self.free.clear();
        self.slots.clear();
    }

    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>) {
        self.search(|b| b.contains_point(x, y), out);
    }

    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>) {
        self.search(|b| b.overlaps(&rect), out);
    }
}

impl<T> Debug for RTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("min_children", &self.min_children)
            .field("max_children", &self.max_children)
            .field("nodes", &(self.nodes.len() - self.free.len()))
            .field("live", &self.slots.iter().flatten().count())
            .finish_non_exhaustive()
    }
}

fn union_all<T: Scalar>(mut boxes: impl Iterator<Item = Aabb2D<T>>) -> Option<Aabb2D<T>> {
    let first = boxes.next()?;
    Some(boxes.fold(first, |acc, b| acc.union(&b)))
}

/// Order `entries` along the better axis and return the split point `k`.
///
/// For each axis the entries are sorted by centroid and every `k` in
/// `[min, n - min]` is scored as `area(L) * k + area(R) * (n - k)` using
/// prefix/suffix unions, so each axis costs one sort plus a linear scan.
fn sweep_split<E, T: Scalar>(
    entries: &mut [E],
    min: usize,
    bbox_of: impl Fn(&E) -> Aabb2D<T>,
) -> usize {
    let n = entries.len();
    let min = min.clamp(1, (n / 2).max(1));
    let sort = |entries: &mut [E], axis: Axis| {
        entries.sort_by(|a, b| cmp_t(&bbox_of(a).centroid(axis), &bbox_of(b).centroid(axis)));
    };

    let mut best: Option<(T::Acc, Axis, usize)> = None;
    for axis in [Axis::X, Axis::Y] {
        sort(entries, axis);
        let mut prefix = Vec::with_capacity(n);
        let mut acc: Option<Aabb2D<T>> = None;
        for e in entries.iter() {
            let b = bbox_of(e);
            let u = acc.map_or(b, |a| a.union(&b));
            acc = Some(u);
            prefix.push(u);
        }
        let mut suffix = Vec::with_capacity(n);
        acc = None;
        for e in entries.iter().rev() {
            let b = bbox_of(e);
            let u = acc.map_or(b, |a| a.union(&b));
            acc = Some(u);
            suffix.push(u);
        }
        suffix.reverse();

        for k in min..=n.saturating_sub(min) {
            let cost = prefix[k - 1].area() * T::weight(k) + suffix[k].area() * T::weight(n - k);
            if best.is_none_or(|(c, _, _)| cost < c) {
                best = Some((cost, axis, k));
            }
        }
    }

    match best {
        Some((_, axis, k)) => {
            if axis != Axis::Y {
                sort(entries, axis);
            }
            k
        }
        None => n / 2,
    }
}

/// R-tree with `f32` coordinates and `f64` metrics.
pub type RTreeF32 = RTree<f32>;

/// R-tree with `f64` coordinates and metrics.
pub type RTreeF64 = RTree<f64>;

/// R-tree with `i64` coordinates and `i128` metrics.
pub type RTreeI64 = RTree<i64>;

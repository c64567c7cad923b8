// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::flatvec::FlatVec;
use crate::backends::rtree::RTree;
use crate::damage::Damage;
use crate::types::{Aabb2D, Scalar};

/// Generational handle for entries.
///
/// A key goes stale once its entry is removed and that removal is committed;
/// stale keys are ignored by every operation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key(u32, u32);

impl Key {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Index keys are intentionally 32-bit; higher bits are truncated by design."
    )]
    const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

struct Entry<T, P> {
    aabb: Aabb2D<T>,
    payload: P,
    /// Box currently held by the backend, if any.
    committed: Option<Aabb2D<T>>,
    removed: bool,
    queued: bool,
}

struct Slot<T, P> {
    generation: u32,
    entry: Option<Entry<T, P>>,
}

/// An AABB index whose mutations are staged and applied in batches.
///
/// `insert`, `update` and `remove` only record intent. [`commit`](Self::commit)
/// pushes the batch into the backend and reports what changed. Queries always
/// answer from the committed state, so a reader never sees half a batch.
pub struct IndexGeneric<T, P, B> {
    slots: Vec<Slot<T, P>>,
    free_list: Vec<usize>,
    queue: Vec<usize>,
    live: usize,
    backend: B,
}

impl<T, P, B: Debug> Debug for IndexGeneric<T, P, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexGeneric")
            .field("live", &self.live)
            .field("queued", &self.queue.len())
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Scalar,
    P: Copy,
    B: Backend<T> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, P, B> Default for IndexGeneric<T, P, B>
where
    T: Scalar,
    P: Copy,
    B: Backend<T> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Scalar,
    P: Copy,
    B: Backend<T>,
{
    /// Create an empty index over an already configured backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            queue: Vec::new(),
            live: 0,
            backend,
        }
    }

    /// The backend, for inspection.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Reserve space for at least `n` more entries.
    pub fn reserve(&mut self, n: usize) {
        self.slots.reserve(n);
    }

    /// Number of entries, counting staged inserts and excluding staged removals.
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if [`len`](Self::len) is zero.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Stage a new box with its payload.
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> Key {
        let entry = Entry {
            aabb,
            payload,
            committed: None,
            removed: false,
            queued: true,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx].entry = Some(entry);
            idx
        } else {
            self.slots.push(Slot {
                generation: 1,
                entry: Some(entry),
            });
            self.slots.len() - 1
        };
        self.queue.push(idx);
        self.live += 1;
        Key::new(idx, self.slots[idx].generation)
    }

    /// Stage a new box for an existing entry.
    pub fn update(&mut self, key: Key, aabb: Aabb2D<T>) {
        if let Some(e) = self.entry_mut(key) {
            e.aabb = aabb;
            if !core::mem::replace(&mut e.queued, true) {
                self.queue.push(key.idx());
            }
        }
    }

    /// Stage removal of an entry. Stale or already removed keys are ignored.
    pub fn remove(&mut self, key: Key) {
        if let Some(e) = self.entry_mut(key) {
            e.removed = true;
            if !core::mem::replace(&mut e.queued, true) {
                self.queue.push(key.idx());
            }
            self.live -= 1;
        }
    }

    /// Current box and payload of a live entry.
    pub fn get(&self, key: Key) -> Option<(Aabb2D<T>, P)> {
        let slot = self.slots.get(key.idx())?;
        let e = slot.entry.as_ref()?;
        (slot.generation == key.1 && !e.removed).then_some((e.aabb, e.payload))
    }

    /// Drop every entry without reporting damage. Outstanding keys become stale.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free_list = (0..self.slots.len()).rev().collect();
        self.queue.clear();
        self.live = 0;
        self.backend.clear();
    }

    /// Apply staged changes to the backend and report what moved.
    ///
    /// Cost is proportional to the number of staged changes, not the index size.
    pub fn commit(&mut self) -> Damage<T> {
        let mut dmg = Damage::default();
        for idx in core::mem::take(&mut self.queue) {
            let Some(slot) = self.slots.get_mut(idx) else {
                continue;
            };
            let Some(e) = slot.entry.as_mut() else {
                continue;
            };
            e.queued = false;
            if e.removed {
                if let Some(old) = e.committed {
                    self.backend.remove(idx);
                    dmg.removed.push(old);
                }
                slot.entry = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(idx);
                continue;
            }
            match e.committed.replace(e.aabb) {
                None => {
                    self.backend.insert(idx, e.aabb);
                    dmg.added.push(e.aabb);
                }
                Some(old) if old != e.aabb => {
                    self.backend.update(idx, e.aabb);
                    dmg.moved.push((old, e.aabb));
                }
                Some(_) => {}
            }
        }
        dmg
    }

    /// Committed entries whose box contains the point.
    pub fn query_point(&self, x: T, y: T) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut hits = Vec::new();
        self.backend.query_point(x, y, &mut hits);
        self.resolve(hits)
    }

    /// Committed entries whose box overlaps `rect`.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = (Key, P)> + '_ {
        let mut hits = Vec::new();
        self.backend.query_rect(rect, &mut hits);
        self.resolve(hits)
    }

    fn resolve(&self, hits: Vec<usize>) -> impl Iterator<Item = (Key, P)> + '_ {
        hits.into_iter().filter_map(|idx| {
            let slot = self.slots.get(idx)?;
            let e = slot.entry.as_ref()?;
            Some((Key::new(idx, slot.generation), e.payload))
        })
    }

    fn entry_mut(&mut self, key: Key) -> Option<&mut Entry<T, P>> {
        let slot = self.slots.get_mut(key.idx())?;
        if slot.generation != key.1 {
            return None;
        }
        slot.entry.as_mut().filter(|e| !e.removed)
    }
}

/// Default index using a flat vector backend.
pub type Index<T, P> = IndexGeneric<T, P, FlatVec<T>>;

/// Index backed by an [`RTree`].
pub type RTreeIndex<T, P> = IndexGeneric<T, P, RTree<T>>;

impl<T: Scalar, P: Copy> Index<T, P> {
    /// Create an R-tree-backed index with the default fanout.
    pub fn with_rtree() -> RTreeIndex<T, P> {
        IndexGeneric::with_backend(RTree::default())
    }

    /// Create an R-tree-backed index with an explicit fanout range.
    ///
    /// See [`RTree::with_fanout`] for how out-of-range values are clamped.
    pub fn with_rtree_fanout(min_children: usize, max_children: usize) -> RTreeIndex<T, P> {
        IndexGeneric::with_backend(RTree::with_fanout(min_children, max_children))
    }
}

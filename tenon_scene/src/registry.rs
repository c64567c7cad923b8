// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial registry of interactive nodes.
//!
//! [`InteractiveRegistry`] keeps exactly one rectangle per indexed node in an
//! R-tree and answers point queries. It is owned by the
//! [`Context`](crate::Context) and passed down explicitly to the draw traversal
//! and the dispatcher; there is no process-wide instance.
//!
//! Refreshes and removals are staged and become visible to [`query`] after
//! [`commit`]. The draw pass commits once when it finishes, so queries issued
//! between frames always see the geometry of the last frame.
//!
//! [`query`]: InteractiveRegistry::query
//! [`commit`]: InteractiveRegistry::commit

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use tenon_index::{Aabb2D, Index, Key, RTreeIndex};
use tenon_responder::{PaintOrder, ResolvedHit};
use tracing::trace;

use crate::config::RegistryConfig;
use crate::scene::NodeId;

#[derive(Copy, Clone, Debug)]
struct Entry {
    key: Key,
    rect: Rect,
    order: PaintOrder,
}

/// Regions that changed in one [`commit`](InteractiveRegistry::commit), for partial repaint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Damage {
    /// Old and new boxes of every added, removed, or moved entry.
    pub dirty_rects: Vec<Rect>,
}

impl Damage {
    /// True if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.dirty_rects.is_empty()
    }

    /// Bounding box of all dirty rects.
    pub fn union(&self) -> Option<Rect> {
        self.dirty_rects.iter().copied().reduce(|a, b| a.union(b))
    }
}

/// R-tree of interactive node rectangles keyed by [`NodeId`].
pub struct InteractiveRegistry {
    index: RTreeIndex<f64, NodeId>,
    entries: HashMap<NodeId, Entry>,
}

impl core::fmt::Debug for InteractiveRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractiveRegistry")
            .field("entries", &self.entries.len())
            .field("height", &self.index.backend().height())
            .finish_non_exhaustive()
    }
}

impl Default for InteractiveRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl InteractiveRegistry {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        let RegistryConfig {
            min_children,
            max_children,
        } = config.normalized();
        Self {
            index: Index::with_rtree_fanout(min_children, max_children),
            entries: HashMap::new(),
        }
    }

    /// Store `rect` as the box of `id`, replacing any previous box.
    ///
    /// Calling this again with the same arguments leaves a single, unchanged entry.
    pub fn refresh(&mut self, id: NodeId, rect: Rect, order: PaintOrder) {
        let aabb = to_aabb(rect);
        match self.entries.get_mut(&id) {
            Some(e) => {
                // The stale box is replaced under the same key, never duplicated.
                self.index.update(e.key, aabb);
                e.rect = rect;
                e.order = order;
            }
            None => {
                let key = self.index.insert(aabb, id);
                self.entries.insert(id, Entry { key, rect, order });
            }
        }
        trace!(?id, ?rect, order = order.0, "registry refresh");
    }

    /// Remove the entry of `id`. Returns whether one existed; absent ids are a no-op.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(e) = self.entries.remove(&id) else {
            return false;
        };
        self.index.remove(e.key);
        trace!(?id, rect = ?e.rect, "registry remove");
        true
    }

    /// Update the paint stamp of an indexed node without touching its box.
    pub fn set_paint_order(&mut self, id: NodeId, order: PaintOrder) {
        if let Some(e) = self.entries.get_mut(&id) {
            e.order = order;
        }
    }

    /// The stored box of `id`.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.entries.get(&id).map(|e| e.rect)
    }

    /// Whether `id` has an entry.
    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids with an entry, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.keys().copied()
    }

    /// Every committed entry whose box contains `point`, unordered.
    ///
    /// Containment is half-open (`x0 <= x < x1`), so a zero-size box never
    /// matches and two boxes sharing an edge do not both claim it.
    pub fn query(&self, point: Point) -> Vec<ResolvedHit<NodeId, Rect>> {
        self.index
            .query_point(point.x, point.y)
            .filter_map(|(key, id)| {
                let e = self.entries.get(&id).filter(|e| e.key == key)?;
                e.rect.contains(point).then_some(ResolvedHit {
                    node: id,
                    order: e.order,
                    meta: e.rect,
                })
            })
            .collect()
    }

    /// Make staged changes visible to queries and report the affected regions.
    pub fn commit(&mut self) -> Damage {
        let dmg = self.index.commit();
        Damage {
            dirty_rects: dmg.boxes().map(to_rect).collect(),
        }
    }
}

fn to_aabb(r: Rect) -> Aabb2D<f64> {
    let r = r.abs();
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

fn to_rect(b: Aabb2D<f64>) -> Rect {
    Rect::new(b.min_x, b.min_y, b.max_x, b.max_y)
}

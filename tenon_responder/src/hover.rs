// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover state helper: compute enter/leave transitions between hit sets.
//!
//! Hit testing yields every interactive node under the pointer, not a single
//! root→target path, so hover is tracked as a set. Feeding each sample's hits to
//! [`HoverState::update`] yields the nodes the pointer left and the nodes it entered.
//!
//! ```
//! use tenon_responder::hover::{HoverEvent, HoverState};
//!
//! let mut h: HoverState<u32> = HoverState::new();
//! assert_eq!(h.update(&[1, 2]), vec![HoverEvent::Enter(1), HoverEvent::Enter(2)]);
//! assert_eq!(h.update(&[2, 3]), vec![HoverEvent::Leave(1), HoverEvent::Enter(3)]);
//! assert!(h.update(&[3, 2]).is_empty());
//! ```

use alloc::vec::Vec;

/// The set of nodes currently under the pointer.
///
/// Ordering semantics:
/// - Leave events come first, in reverse of the previous sample's order.
/// - Enter events follow, in the order of the new sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverState<K> {
    current: Vec<K>,
}

/// A hover transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HoverEvent<K> {
    /// The pointer moved onto the node.
    Enter(K),
    /// The pointer moved off the node.
    Leave(K),
}

impl<K> Default for HoverState<K> {
    fn default() -> Self {
        Self {
            current: Vec::new(),
        }
    }
}

impl<K: Copy + Eq> HoverState<K> {
    /// Create an empty hover state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes currently hovered, in the order of the sample that last changed them.
    pub fn current(&self) -> &[K] {
        &self.current
    }

    /// Whether `node` is currently hovered.
    pub fn is_hovered(&self, node: &K) -> bool {
        self.current.contains(node)
    }

    /// Replace the hovered set with `hits` and return the transitions.
    ///
    /// Duplicates in `hits` are ignored.
    pub fn update(&mut self, hits: &[K]) -> Vec<HoverEvent<K>> {
        let mut next: Vec<K> = Vec::with_capacity(hits.len());
        for &k in hits {
            if !next.contains(&k) {
                next.push(k);
            }
        }
        let mut out: Vec<_> = self
            .current
            .iter()
            .rev()
            .filter(|k| !next.contains(k))
            .map(|&k| HoverEvent::Leave(k))
            .collect();
        out.extend(
            next.iter()
                .filter(|k| !self.current.contains(k))
                .map(|&k| HoverEvent::Enter(k)),
        );
        self.current = next;
        out
    }

    /// Leave everything, returning the leave events.
    pub fn clear(&mut self) -> Vec<HoverEvent<K>> {
        self.current
            .drain(..)
            .rev()
            .map(HoverEvent::Leave)
            .collect()
    }

    /// Drop a node that no longer exists, without producing an event.
    ///
    /// Returns whether it was hovered.
    pub fn forget(&mut self, node: &K) -> bool {
        let before = self.current.len();
        self.current.retain(|k| k != node);
        before != self.current.len()
    }
}

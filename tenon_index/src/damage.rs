// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Change summary produced by [`IndexGeneric::commit`](crate::IndexGeneric::commit).

use alloc::vec::Vec;

use crate::types::{Aabb2D, Scalar};

/// Boxes affected by one commit.
///
/// An entry inserted and removed within the same batch contributes nothing, and
/// an update that ends where it started is not reported as a move.
#[derive(Clone, Debug, PartialEq)]
pub struct Damage<T> {
    /// Boxes that entered the index.
    pub added: Vec<Aabb2D<T>>,
    /// Boxes that left the index.
    pub removed: Vec<Aabb2D<T>>,
    /// Boxes that changed, as `(old, new)`.
    pub moved: Vec<(Aabb2D<T>, Aabb2D<T>)>,
}

impl<T> Default for Damage<T> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            moved: Vec::new(),
        }
    }
}

impl<T: Scalar> Damage<T> {
    /// True if the commit changed nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.moved.is_empty()
    }

    /// Every affected box; a move yields both its old and new box.
    pub fn boxes(&self) -> impl Iterator<Item = Aabb2D<T>> + '_ {
        self.added
            .iter()
            .chain(&self.removed)
            .copied()
            .chain(self.moved.iter().flat_map(|&(old, new)| [old, new]))
    }

    /// Bounding box of everything affected, or `None` when empty.
    pub fn union(&self) -> Option<Aabb2D<T>> {
        self.boxes().reduce(|acc, b| acc.union(&b))
    }
}

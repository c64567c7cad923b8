// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::vec::Vec;

use crate::types::{Aabb2D, Scalar};

/// Spatial structure behind an [`IndexGeneric`](crate::IndexGeneric).
///
/// Backends only see slot numbers and boxes; payloads and generations stay in the index.
/// Queries append matching slots to `out` in no particular order.
pub trait Backend<T: Scalar> {
    /// Insert a box for a slot that is not currently present.
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Replace the box of a present slot.
    fn update(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Remove a slot. Removing an absent slot does nothing.
    fn remove(&mut self, slot: usize);

    /// Drop everything.
    fn clear(&mut self);

    /// Slots whose box contains the point.
    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>);

    /// Slots whose box overlaps `rect`.
    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>);
}

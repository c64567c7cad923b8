// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar};

/// Slot-addressed vector of boxes, scanned linearly on every query.
///
/// Useful for tiny sets and as an oracle when testing other backends.
#[derive(Clone)]
pub struct FlatVec<T> {
    boxes: Vec<Option<Aabb2D<T>>>,
}

impl<T> Default for FlatVec<T> {
    fn default() -> Self {
        Self { boxes: Vec::new() }
    }
}

impl<T> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("slots", &self.boxes.len())
            .field("live", &self.boxes.iter().flatten().count())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> FlatVec<T> {
    fn scan(&self, out: &mut Vec<usize>, mut hit: impl FnMut(&Aabb2D<T>) -> bool) {
        out.extend(
            self.boxes
                .iter()
                .enumerate()
                .filter_map(|(slot, b)| b.as_ref().filter(|b| hit(b)).map(|_| slot)),
        );
    }
}

impl<T: Scalar> Backend<T> for FlatVec<T> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.boxes.len() <= slot {
            self.boxes.resize(slot + 1, None);
        }
        self.boxes[slot] = Some(aabb);
    }

    fn update(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if let Some(b @ Some(_)) = self.boxes.get_mut(slot) {
            *b = Some(aabb);
        }
    }

    fn remove(&mut self, slot: usize) {
        if let Some(b) = self.boxes.get_mut(slot) {
            *b = None;
        }
    }

    fn clear(&mut self) {
        self.boxes.clear();
    }

    fn query_point(&self, x: T, y: T, out: &mut Vec<usize>) {
        self.scan(out, |b| b.contains_point(x, y));
    }

    fn query_rect(&self, rect: Aabb2D<T>, out: &mut Vec<usize>) {
        self.scan(out, |b| b.overlaps(&rect));
    }
}

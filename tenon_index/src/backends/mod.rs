// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial strategies behind [`IndexGeneric`](crate::IndexGeneric).
//!
//! - `flatvec`: every query scans every slot. Tiny, and the reference the others are
//!   tested against.
//! - `rtree`: dynamic R-tree (`T: Scalar`) with configurable fanout.
//!
//! Split heuristic
//! ---------------
//! When an R-tree node overflows, its entries are sorted by centroid along x and
//! along y. For a split point `k` on a sorted axis the cost is
//!
//! `cost(k) = area(L_k) * k + area(R_k) * (n - k)`
//!
//! where `L_k` and `R_k` bound the first `k` and the remaining `n - k` entries.
//! Only `k` in `[min_children, n - min_children]` is considered, so both halves
//! are legal nodes. Prefix and suffix unions make each axis a linear scan after
//! the sort. Areas use the widened accumulator of [`Scalar`](crate::Scalar).

pub mod flatvec;
pub mod rtree;

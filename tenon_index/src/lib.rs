// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tenon Index: a 2D AABB index for hit testing.
//!
//! - Insert, update, and remove axis-aligned bounding boxes (AABBs) with user payloads.
//! - Query by point or by overlapping rectangle.
//! - Stage changes and apply them with [`IndexGeneric::commit`], which reports coarse
//!   damage (added/removed/moved boxes).
//!
//! The index is generic over the scalar type `T` and does not depend on any geometry crate.
//! The scene layer computes absolute boxes and feeds them here.
//!
//! Backends are pluggable through [`Backend`]. [`FlatVec`] scans linearly and is the
//! default; [`RTree`] is a dynamic R-tree with configurable fanout and is what the
//! interactive registry uses.
//!
//! # Example
//!
//! ```rust
//! use tenon_index::{Aabb2D, Index};
//!
//! // An R-tree index with wide nodes.
//! let mut idx = Index::<f64, u32>::with_rtree_fanout(25, 50);
//! let a = idx.insert(Aabb2D::from_xywh(50.0, 50.0, 100.0, 100.0), 1);
//! let _b = idx.insert(Aabb2D::from_xywh(0.0, 0.0, 20.0, 20.0), 2);
//! let damage = idx.commit();
//! assert_eq!(damage.added.len(), 2);
//!
//! let hits: Vec<_> = idx.query_point(75.0, 75.0).map(|(_, p)| p).collect();
//! assert_eq!(hits, [1]);
//!
//! // Grow the first box; the move is visible after the next commit.
//! idx.update(a, Aabb2D::from_xywh(50.0, 50.0, 200.0, 200.0));
//! assert_eq!(idx.query_point(200.0, 200.0).count(), 0);
//! let damage = idx.commit();
//! assert_eq!(damage.moved.len(), 1);
//! assert_eq!(idx.query_point(200.0, 200.0).count(), 1);
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): smallest, linear scans. Fine for a handful of boxes or when
//!   updates vastly outnumber queries.
//! - `RTree`: height-balanced, sub-linear queries, stays balanced under removal. Tune
//!   the fanout with [`Index::with_rtree_fanout`]; the scene uses `[25, 50]`.
//!
//! ### Float semantics
//!
//! NaN coordinates are not supported. Comparisons involving NaN are treated as
//! "not inside" and sort as equal, which keeps the structures consistent but
//! makes such boxes unreachable.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod damage;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::rtree::{RTree, RTreeF32, RTreeF64, RTreeI64};
pub use damage::Damage;
pub use index::{Index, IndexGeneric, Key, RTreeIndex};
pub use types::{Aabb2D, Scalar};

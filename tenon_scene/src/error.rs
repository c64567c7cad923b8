// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the few operations that can fail.
//!
//! Hit testing, dirty tracking and dispatch are total. Failures come from the
//! layout engine rejecting a node or index, or from addressing a removed node.

use crate::layout::LayoutId;
use crate::scene::NodeId;

/// Errors reported by scene and layout operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The layout engine rejected the request.
    #[error("layout engine error: {0}")]
    Layout(#[from] taffy::TaffyError),
    /// The node was removed from the scene.
    #[error("scene node {0:?} is no longer alive")]
    StaleNode(NodeId),
    /// The layout node was removed from the layout tree.
    #[error("layout node {0:?} is no longer alive")]
    StaleLayout(LayoutId),
    /// An explicit insertion index was past the end of the child list.
    #[error("child index {index} is out of range for {parent:?}, which has {len} children")]
    ChildIndex {
        /// Node whose child list was addressed.
        parent: NodeId,
        /// Requested position.
        index: usize,
        /// Current number of children.
        len: usize,
    },
}

/// Result alias defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node index bookkeeping.
//!
//! A [`DirtyTracker`] moves through [`IndexState`]:
//!
//! ```text
//! NotInteractive --mark_interactive--> AwaitingFirstIndex --first draw--> Indexed
//!        ^                                     ^                            |
//!        |                                     +------- zero-size box ------+
//!        +---------------------- mark_inert --------------------------------+
//! ```
//!
//! Subscribing to the layout engine's dirtied notification means recording the
//! node's layout generation when it is first indexed. Every later draw compares
//! the current generation and the freshly accumulated absolute box against what
//! was recorded, and refreshes the registry when either moved.

use bitflags::bitflags;
use kurbo::Rect;
use tenon_responder::PaintOrder;

use crate::registry::InteractiveRegistry;
use crate::scene::NodeId;

/// Whether and how a node is represented in the registry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum IndexState {
    /// Never queried by hit testing.
    #[default]
    NotInteractive,
    /// Interactive, waiting for a draw pass with a non-empty box.
    AwaitingFirstIndex,
    /// Has exactly one registry entry matching its last drawn box.
    Indexed,
}

bitflags! {
    /// Why the last sync refreshed the registry.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Dirty: u8 {
        /// First insertion after becoming interactive.
        const FIRST_INDEX = 1 << 0;
        /// The layout engine reported a style change on the node or a descendant.
        const DIRTIED = 1 << 1;
        /// The absolute box changed, for instance because an ancestor moved.
        const MOVED = 1 << 2;
    }
}

/// Index state machine of one scene node.
#[derive(Clone, Debug, Default)]
pub struct DirtyTracker {
    state: IndexState,
    subscribed: Option<u64>,
    last: Dirty,
    refreshes: u32,
}

impl DirtyTracker {
    /// Current state.
    pub fn state(&self) -> IndexState {
        self.state
    }

    /// Reasons for the most recent sync; empty if it changed nothing.
    pub fn last(&self) -> Dirty {
        self.last
    }

    /// Number of registry refreshes performed so far.
    pub fn refreshes(&self) -> u32 {
        self.refreshes
    }

    /// Layout generation recorded at the last refresh.
    pub fn subscribed_generation(&self) -> Option<u64> {
        self.subscribed
    }

    /// Flag the node for indexing on the next draw. Already interactive nodes are unaffected.
    pub fn mark_interactive(&mut self) {
        if self.state == IndexState::NotInteractive {
            self.state = IndexState::AwaitingFirstIndex;
        }
    }

    /// Stop hit testing the node and drop its entry.
    pub fn mark_inert(&mut self, id: NodeId, registry: &mut InteractiveRegistry) {
        registry.remove(id);
        *self = Self::default();
    }

    /// Bring the registry in line with the node's drawn box. Returns what triggered a refresh.
    pub(crate) fn sync(
        &mut self,
        id: NodeId,
        generation: u64,
        rect: Rect,
        order: PaintOrder,
        registry: &mut InteractiveRegistry,
    ) -> Dirty {
        let empty = rect.width() <= 0.0 || rect.height() <= 0.0;
        let dirty = match self.state {
            IndexState::NotInteractive => Dirty::empty(),
            IndexState::AwaitingFirstIndex => {
                if empty {
                    Dirty::empty()
                } else {
                    self.subscribed = Some(generation);
                    self.state = IndexState::Indexed;
                    registry.refresh(id, rect, order);
                    self.refreshes += 1;
                    Dirty::FIRST_INDEX
                }
            }
            IndexState::Indexed => {
                let mut dirty = Dirty::empty();
                dirty.set(Dirty::DIRTIED, self.subscribed != Some(generation));
                dirty.set(Dirty::MOVED, registry.rect(id) != Some(rect));
                self.subscribed = Some(generation);
                if empty {
                    registry.remove(id);
                    self.state = IndexState::AwaitingFirstIndex;
                } else if dirty.is_empty() {
                    registry.set_paint_order(id, order);
                } else {
                    registry.refresh(id, rect, order);
                    self.refreshes += 1;
                }
                dirty
            }
        };
        self.last = dirty;
        dirty
    }
}

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node pointer handlers and their priority ordering.
//!
//! A node owns a [`Handlers`] list. Each [`EventHandler`] has a [`HandlerKind`]
//! and an integer priority; lower priorities run first, and handlers with equal
//! priority run in the order they were added.
//!
//! Callbacks take the event by reference and a mutable state `S` chosen by the
//! caller (the scene passes its layout tree, so a click can restyle nodes).
//!
//! ```
//! use tenon_responder::handler::{EventHandler, HandlerKind, Handlers};
//!
//! let mut list: Handlers<u32, Vec<&'static str>> = Handlers::new();
//! list.push(EventHandler::new(HandlerKind::Click, |_, log: &mut Vec<_>| log.push("click")));
//! list.push(EventHandler::new(HandlerKind::Hover, |_, log: &mut Vec<_>| log.push("hover")));
//!
//! let mut log = Vec::new();
//! let ran = list.invoke(|_| true, &0, &mut log);
//! assert_eq!(ran, 2);
//! assert_eq!(log, ["hover", "click"]);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// What a handler reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// The pointer is over the node. Fires on every sample that hits the node.
    Hover,
    /// The primary button is held while over the node. Level-triggered, not an edge.
    Click,
    /// The pointer has just moved onto the node.
    MouseOver,
}

impl HandlerKind {
    /// Priority used by [`EventHandler::new`]: hover before click before mouse-over.
    pub const fn default_priority(self) -> i32 {
        match self {
            Self::Hover => 1,
            Self::Click => 2,
            Self::MouseOver => 3,
        }
    }
}

/// A prioritized callback.
pub struct EventHandler<E, S> {
    kind: HandlerKind,
    priority: i32,
    callback: Box<dyn FnMut(&E, &mut S)>,
}

impl<E, S> EventHandler<E, S> {
    /// Create a handler with its kind's default priority.
    pub fn new(kind: HandlerKind, f: impl FnMut(&E, &mut S) + 'static) -> Self {
        Self::with_priority(kind, kind.default_priority(), f)
    }

    /// Create a handler with an explicit priority.
    pub fn with_priority(
        kind: HandlerKind,
        priority: i32,
        f: impl FnMut(&E, &mut S) + 'static,
    ) -> Self {
        Self {
            kind,
            priority,
            callback: Box::new(f),
        }
    }

    /// The handler's kind.
    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// The handler's priority; lower runs first.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Run the callback.
    pub fn call(&mut self, event: &E, state: &mut S) {
        (self.callback)(event, state);
    }
}

impl<E, S> fmt::Debug for EventHandler<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandler")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Handlers of one node, kept sorted by ascending priority.
pub struct Handlers<E, S> {
    list: Vec<EventHandler<E, S>>,
}

impl<E, S> Default for Handlers<E, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S> fmt::Debug for Handlers<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.list.iter().map(|h| (h.kind, h.priority)))
            .finish()
    }
}

impl<E, S> Handlers<E, S> {
    /// An empty list.
    pub const fn new() -> Self {
        Self { list: Vec::new() }
    }

    /// Add a handler after every handler of lower or equal priority.
    pub fn push(&mut self, handler: EventHandler<E, S>) {
        let at = self.list.partition_point(|h| h.priority <= handler.priority);
        self.list.insert(at, handler);
    }

    /// Whether any handler of `kind` is present.
    pub fn has(&self, kind: HandlerKind) -> bool {
        self.list.iter().any(|h| h.kind == kind)
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// True if there are no handlers.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Kinds and priorities in invocation order.
    pub fn iter(&self) -> impl Iterator<Item = (HandlerKind, i32)> + '_ {
        self.list.iter().map(|h| (h.kind, h.priority))
    }

    /// Handlers accepted by `filter`, in invocation order.
    pub fn iter_mut_matching<'a>(
        &'a mut self,
        mut filter: impl FnMut(HandlerKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a mut EventHandler<E, S>> + 'a {
        self.list.iter_mut().filter(move |h| filter(h.kind))
    }

    /// Call every handler accepted by `filter` in priority order. Returns how many ran.
    pub fn invoke(
        &mut self,
        mut filter: impl FnMut(HandlerKind) -> bool,
        event: &E,
        state: &mut S,
    ) -> usize {
        let mut ran = 0;
        for h in self.list.iter_mut().filter(|h| filter(h.kind)) {
            h.call(event, state);
            ran += 1;
        }
        ran
    }

    /// Remove every handler of `kind`. Returns how many were removed.
    pub fn remove_kind(&mut self, kind: HandlerKind) -> usize {
        let before = self.list.len();
        self.list.retain(|h| h.kind != kind);
        before - self.list.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    type Log = Vec<(HandlerKind, i32)>;

    fn recorder(kind: HandlerKind, tag: i32) -> EventHandler<(), Log> {
        EventHandler::with_priority(kind, tag, move |_, log: &mut Log| log.push((kind, tag)))
    }

    #[test]
    fn default_priorities_follow_kind() {
        assert!(HandlerKind::Hover.default_priority() < HandlerKind::Click.default_priority());
        assert!(
            HandlerKind::Click.default_priority() < HandlerKind::MouseOver.default_priority()
        );
    }

    #[test]
    fn ascending_priority_with_stable_ties() {
        let mut hs = Handlers::new();
        hs.push(recorder(HandlerKind::MouseOver, 3));
        hs.push(recorder(HandlerKind::Click, 2));
        hs.push(recorder(HandlerKind::Hover, 2));
        hs.push(recorder(HandlerKind::Hover, -5));
        let mut log = Log::new();
        assert_eq!(hs.invoke(|_| true, &(), &mut log), 4);
        assert_eq!(
            log,
            vec![
                (HandlerKind::Hover, -5),
                (HandlerKind::Click, 2),
                (HandlerKind::Hover, 2),
                (HandlerKind::MouseOver, 3),
            ]
        );
    }

    #[test]
    fn filter_skips_kinds() {
        let mut hs = Handlers::new();
        hs.push(recorder(HandlerKind::Hover, 1));
        hs.push(recorder(HandlerKind::Click, 2));
        let mut log = Log::new();
        let ran = hs.invoke(|k| k != HandlerKind::Click, &(), &mut log);
        assert_eq!(ran, 1);
        assert_eq!(log, vec![(HandlerKind::Hover, 1)]);
        assert!(hs.has(HandlerKind::Click));
        assert!(!hs.has(HandlerKind::MouseOver));
    }

    #[test]
    fn remove_kind_keeps_others() {
        let mut hs = Handlers::new();
        hs.push(recorder(HandlerKind::Click, 2));
        hs.push(recorder(HandlerKind::Click, 4));
        hs.push(recorder(HandlerKind::Hover, 1));
        assert_eq!(hs.remove_kind(HandlerKind::Click), 2);
        assert_eq!(hs.iter().collect::<Vec<_>>(), vec![(HandlerKind::Hover, 1)]);
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let mut hs: Handlers<(), Log> = Handlers::default();
        let mut log = Log::new();
        assert!(hs.is_empty());
        assert_eq!(hs.invoke(|_| true, &(), &mut log), 0);
    }
}

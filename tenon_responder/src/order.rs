// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordering of overlapping hits.
//!
//! The spatial index returns matches in no particular order. Each scene node is
//! stamped with a [`PaintOrder`] while it is drawn (pre-order, so a later stamp
//! paints on top), and [`rank`] sorts matches by that stamp according to an
//! [`OrderPolicy`].

/// Position of a node in the last draw traversal; larger paints later.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaintOrder(pub u32);

/// How matches that overlap the same point are ordered for dispatch.
///
/// Every match still receives its handlers; the policy only decides who goes first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OrderPolicy {
    /// Reverse paint order: the node drawn on top is served first.
    #[default]
    TopmostFirst,
    /// Paint order: the node drawn first (usually an ancestor) is served first.
    PaintOrder,
}

/// A match ready for dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedHit<K, M = ()> {
    /// Node that was hit.
    pub node: K,
    /// The node's stamp from the last draw.
    pub order: PaintOrder,
    /// Extra data carried with the hit (the scene uses the node's bounds).
    pub meta: M,
}

/// Sort `hits` in place according to `policy`.
///
/// The sort is stable, so equal stamps keep their input order.
pub fn rank<K, M>(hits: &mut [ResolvedHit<K, M>], policy: OrderPolicy) {
    match policy {
        OrderPolicy::TopmostFirst => hits.sort_by(|a, b| b.order.cmp(&a.order)),
        OrderPolicy::PaintOrder => hits.sort_by_key(|h| h.order),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn hit(node: char, order: u32) -> ResolvedHit<char> {
        ResolvedHit {
            node,
            order: PaintOrder(order),
            meta: (),
        }
    }

    fn nodes(hits: &[ResolvedHit<char>]) -> Vec<char> {
        hits.iter().map(|h| h.node).collect()
    }

    #[test]
    fn topmost_first_is_reverse_paint() {
        let mut hits = [hit('a', 0), hit('c', 7), hit('b', 3)];
        rank(&mut hits, OrderPolicy::default());
        assert_eq!(nodes(&hits), ['c', 'b', 'a']);
    }

    #[test]
    fn paint_order_is_ascending() {
        let mut hits = [hit('c', 7), hit('a', 0), hit('b', 3)];
        rank(&mut hits, OrderPolicy::PaintOrder);
        assert_eq!(nodes(&hits), ['a', 'b', 'c']);
    }

    #[test]
    fn equal_stamps_stay_in_input_order() {
        let mut hits = [hit('x', 2), hit('y', 2), hit('z', 9)];
        rank(&mut hits, OrderPolicy::TopmostFirst);
        assert_eq!(nodes(&hits), ['z', 'x', 'y']);
    }
}

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer dispatch.
//!
//! One pointer sample is resolved against the committed registry, the matches
//! are ordered by the configured [`OrderPolicy`], and each matched node runs its
//! handlers in ascending priority:
//!
//! - `Hover` handlers run on every sample that hits the node.
//! - `Click` handlers run while the primary button is held (level, not edge).
//! - `MouseOver` handlers run only on the sample where the node is newly entered.
//!
//! Every match receives its handlers; there is no stop-propagation. A match
//! without handlers, or a sample that hits nothing, is a silent no-op.

use kurbo::{Point, Rect};
use tenon_responder::{EventHandler, HandlerKind, HoverEvent, HoverState, OrderPolicy, rank};
use tracing::{debug, warn};

use crate::layout::{LayoutId, LayoutTree};
use crate::registry::InteractiveRegistry;
use crate::scene::{NodeId, Scene};

/// What a handler sees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerEvent {
    /// Node whose handler is running.
    pub node: NodeId,
    /// The node's layout handle, for restyling it from the handler.
    pub layout_node: LayoutId,
    /// Pointer position.
    pub point: Point,
    /// Whether the primary button is held.
    pub pressed: bool,
    /// The node's indexed box.
    pub bounds: Rect,
    /// Whether the pointer entered the node on this sample.
    pub entered: bool,
}

/// Handler type stored on scene nodes. Handlers may restyle nodes through the
/// layout tree; the change is picked up by the next draw.
pub type Handler = EventHandler<PointerEvent, LayoutTree>;

/// Outcome of one [`EventDispatcher::dispatch`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Matched nodes in dispatch order.
    pub hits: Vec<NodeId>,
    /// Handlers run.
    pub invoked: usize,
    /// Nodes the pointer moved onto.
    pub entered: Vec<NodeId>,
    /// Nodes the pointer moved off.
    pub left: Vec<NodeId>,
}

/// Resolves pointer samples to handler invocations and tracks hover.
#[derive(Clone, Debug, Default)]
pub struct EventDispatcher {
    policy: OrderPolicy,
    hover: HoverState<NodeId>,
}

impl EventDispatcher {
    /// Create a dispatcher with the given overlap policy.
    pub fn new(policy: OrderPolicy) -> Self {
        Self {
            policy,
            hover: HoverState::new(),
        }
    }

    /// Overlap policy in use.
    pub fn policy(&self) -> OrderPolicy {
        self.policy
    }

    /// Change the overlap policy.
    pub fn set_policy(&mut self, policy: OrderPolicy) {
        self.policy = policy;
    }

    /// Nodes under the pointer as of the last sample.
    pub fn hovered(&self) -> &[NodeId] {
        self.hover.current()
    }

    /// Drop removed nodes from the hover set without producing leave transitions.
    pub fn forget(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.hover.forget(id);
        }
    }

    /// Dispatch one pointer sample.
    pub fn dispatch(
        &mut self,
        point: Point,
        pressed: bool,
        scene: &mut Scene,
        layout: &mut LayoutTree,
        registry: &InteractiveRegistry,
    ) -> DispatchReport {
        let mut hits = registry.query(point);
        rank(&mut hits, self.policy);

        let mut report = DispatchReport {
            hits: hits.iter().map(|h| h.node).collect(),
            ..DispatchReport::default()
        };
        for t in self.hover.update(&report.hits) {
            match t {
                HoverEvent::Enter(id) => report.entered.push(id),
                HoverEvent::Leave(id) => report.left.push(id),
            }
        }

        for hit in &hits {
            let Some(node) = scene.get_mut(hit.node) else {
                warn!(id = ?hit.node, "registry hit on stale node");
                continue;
            };
            let entered = report.entered.contains(&hit.node);
            let event = PointerEvent {
                node: hit.node,
                layout_node: node.layout_id(),
                point,
                pressed,
                bounds: hit.meta,
                entered,
            };
            report.invoked += node.handlers_mut().invoke(
                |kind| match kind {
                    HandlerKind::Hover => true,
                    HandlerKind::Click => pressed,
                    HandlerKind::MouseOver => entered,
                },
                &event,
                layout,
            );
        }

        debug!(
            x = point.x,
            y = point.y,
            pressed,
            hits = report.hits.len(),
            invoked = report.invoked,
            "dispatch"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Length;
    use crate::render::ViewStyle;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tenon_responder::PaintOrder;

    type Log = Rc<RefCell<Vec<(NodeId, HandlerKind)>>>;

    struct Fixture {
        scene: Scene,
        layout: LayoutTree,
        registry: InteractiveRegistry,
        log: Log,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scene: Scene::new(),
                layout: LayoutTree::new(),
                registry: InteractiveRegistry::default(),
                log: Log::default(),
            }
        }

        /// A node indexed directly at `rect` with recording handlers of `kinds`.
        fn node(&mut self, rect: Rect, order: u32, kinds: &[HandlerKind]) -> NodeId {
            let id = self.scene.create_view(&mut self.layout, ViewStyle::default()).unwrap();
            for &kind in kinds {
                let log = self.log.clone();
                self.scene
                    .add_handler(id, EventHandler::new(kind, move |e: &PointerEvent, _: &mut LayoutTree| {
                        log.borrow_mut().push((e.node, kind));
                    }));
            }
            self.registry.refresh(id, rect, PaintOrder(order));
            id
        }

        fn sample(&mut self, dispatcher: &mut EventDispatcher, x: f64, y: f64, pressed: bool) -> DispatchReport {
            self.log.borrow_mut().clear();
            dispatcher.dispatch(Point::new(x, y), pressed, &mut self.scene, &mut self.layout, &self.registry)
        }

        fn log(&self) -> Vec<(NodeId, HandlerKind)> {
            self.log.borrow().clone()
        }
    }

    const ALL: &[HandlerKind] = &[HandlerKind::MouseOver, HandlerKind::Click, HandlerKind::Hover];

    #[test]
    fn click_requires_press() {
        let mut f = Fixture::new();
        let n = f.node(Rect::new(50.0, 50.0, 150.0, 150.0), 0, &[HandlerKind::Click]);
        f.registry.commit();
        let mut d = EventDispatcher::default();

        let r = f.sample(&mut d, 75.0, 75.0, true);
        assert_eq!(r.invoked, 1);
        assert_eq!(f.log(), [(n, HandlerKind::Click)]);

        let r = f.sample(&mut d, 75.0, 75.0, false);
        assert_eq!(r.invoked, 0, "released button never clicks");

        let r = f.sample(&mut d, 200.0, 200.0, true);
        assert!(r.hits.is_empty());
        assert_eq!(r.invoked, 0);
    }

    #[test]
    fn handlers_run_in_priority_order() {
        let mut f = Fixture::new();
        let n = f.node(Rect::new(0.0, 0.0, 10.0, 10.0), 0, ALL);
        f.registry.commit();
        let mut d = EventDispatcher::default();

        f.sample(&mut d, 5.0, 5.0, true);
        assert_eq!(
            f.log(),
            [(n, HandlerKind::Hover), (n, HandlerKind::Click), (n, HandlerKind::MouseOver)]
        );

        // Still inside: no second mouse-over.
        f.sample(&mut d, 6.0, 6.0, false);
        assert_eq!(f.log(), [(n, HandlerKind::Hover)]);
    }

    #[test]
    fn overlap_policy_orders_nodes() {
        let mut f = Fixture::new();
        let below = f.node(Rect::new(0.0, 0.0, 100.0, 100.0), 1, &[HandlerKind::Hover]);
        let above = f.node(Rect::new(0.0, 0.0, 50.0, 50.0), 2, &[HandlerKind::Hover]);
        f.registry.commit();

        let mut d = EventDispatcher::default();
        let r = f.sample(&mut d, 10.0, 10.0, false);
        assert_eq!(r.hits, [above, below]);
        assert_eq!(f.log(), [(above, HandlerKind::Hover), (below, HandlerKind::Hover)]);

        d.set_policy(OrderPolicy::PaintOrder);
        let r = f.sample(&mut d, 10.0, 10.0, false);
        assert_eq!(r.hits, [below, above]);
    }

    #[test]
    fn enter_and_leave_are_reported() {
        let mut f = Fixture::new();
        let a = f.node(Rect::new(0.0, 0.0, 10.0, 10.0), 0, &[]);
        let b = f.node(Rect::new(20.0, 0.0, 30.0, 10.0), 1, &[]);
        f.registry.commit();
        let mut d = EventDispatcher::default();

        let r = f.sample(&mut d, 5.0, 5.0, false);
        assert_eq!(r.entered, [a]);
        assert_eq!(r.invoked, 0, "nodes without handlers are silent");

        let r = f.sample(&mut d, 25.0, 5.0, false);
        assert_eq!((r.left, r.entered), (vec![a], vec![b]));

        d.forget(&[b]);
        assert!(d.hovered().is_empty());
    }

    #[test]
    fn handlers_can_restyle() {
        let mut f = Fixture::new();
        let n = f.node(Rect::new(0.0, 0.0, 10.0, 10.0), 0, &[]);
        f.scene.on_click(n, |e, layout| layout.set_width(e.layout_node, Length::Px(42.0)));
        f.registry.commit();
        let mut d = EventDispatcher::default();
        f.sample(&mut d, 1.0, 1.0, true);
        let l = f.scene.get(n).unwrap().layout_id();
        assert_eq!(f.layout.style_width(l), 42.0);
    }
}

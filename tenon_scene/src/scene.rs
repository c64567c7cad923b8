// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene node arena and the measure / draw traversals.
//!
//! Nodes live in generational slots and own their children through ordered id
//! lists. There is no parent back-reference: absolute positions are threaded
//! top-down during [`Scene::draw`], each child landing at its parent's absolute
//! position plus the offset the layout engine reports for it.
//!
//! A node id appears in at most one child list. Removing a child tears down its
//! whole subtree: registry entries, layout nodes and slots are all released, and
//! the ids go stale.

use kurbo::{Point, Rect};
use tenon_responder::{EventHandler, HandlerKind, Handlers, PaintOrder};
use tracing::{debug, warn};

use crate::dispatch::{Handler, PointerEvent};
use crate::error::{Error, Result};
use crate::layout::{LayoutId, LayoutTree, Length};
use crate::registry::InteractiveRegistry;
use crate::render::{ImageSource, Renderer, ViewStyle, clamp_radii};
use crate::tracker::{DirtyTracker, IndexState};

/// Generational handle of a scene node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a node paints.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A box with a background and optional border.
    View(ViewStyle),
    /// A bitmap that sizes itself from its source when left unsized.
    Image(ImageSource),
}

/// One node of the scene.
pub struct SceneNode {
    layout: LayoutId,
    children: Vec<NodeId>,
    attached: bool,
    position: Point,
    bounds: Rect,
    paint_order: PaintOrder,
    tracker: DirtyTracker,
    handlers: Handlers<PointerEvent, LayoutTree>,
    kind: NodeKind,
}

impl core::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneNode")
            .field("children", &self.children)
            .field("position", &self.position)
            .field("bounds", &self.bounds)
            .field("state", &self.tracker.state())
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

impl SceneNode {
    fn new(layout: LayoutId, kind: NodeKind) -> Self {
        Self {
            layout,
            children: Vec::new(),
            attached: false,
            position: Point::ZERO,
            bounds: Rect::ZERO,
            paint_order: PaintOrder::default(),
            tracker: DirtyTracker::default(),
            handlers: Handlers::new(),
            kind,
        }
    }

    /// The node's layout engine handle.
    pub fn layout_id(&self) -> LayoutId {
        self.layout
    }

    /// Children in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node is in some parent's child list.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Absolute position from the last draw.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Absolute box from the last draw.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Stamp from the last draw; larger paints later.
    pub fn paint_order(&self) -> PaintOrder {
        self.paint_order
    }

    /// Index bookkeeping.
    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    /// Shorthand for `tracker().state()`.
    pub fn index_state(&self) -> IndexState {
        self.tracker.state()
    }

    /// Registered handlers.
    pub fn handlers(&self) -> &Handlers<PointerEvent, LayoutTree> {
        &self.handlers
    }

    pub(crate) fn handlers_mut(&mut self) -> &mut Handlers<PointerEvent, LayoutTree> {
        &mut self.handlers
    }

    /// Paint data.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable paint data. Paint changes do not affect layout or the registry.
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }
}

struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Counters from one [`Scene::draw`] pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Nodes visited.
    pub visited: usize,
    /// Primitives handed to the renderer.
    pub painted: usize,
    /// Nodes in [`IndexState::Indexed`] after the pass.
    pub indexed: usize,
    /// Registry refreshes performed.
    pub refreshed: usize,
}

struct DrawPass<'a, R: ?Sized> {
    layout: &'a LayoutTree,
    registry: &'a mut InteractiveRegistry,
    renderer: &'a mut R,
    next_order: u32,
    stats: DrawStats,
}

/// Arena of scene nodes.
#[derive(Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free_list: Vec<usize>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scene")
            .field("nodes_total", &self.slots.len())
            .field("nodes_alive", &self.len())
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: SceneNode) -> NodeId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                self.slots[idx].node = Some(node);
                idx
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let raw = idx as u32;
        NodeId::new(raw, self.slots[idx].generation)
    }

    fn free(&mut self, id: NodeId) -> Option<SceneNode> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.idx());
        Some(node)
    }

    /// Create a detached view with its own layout node.
    pub fn create_view(&mut self, layout: &mut LayoutTree, style: ViewStyle) -> Result<NodeId> {
        let l = layout.new_node()?;
        Ok(self.alloc(SceneNode::new(l, NodeKind::View(style))))
    }

    /// Create a detached image node.
    pub fn create_image(&mut self, layout: &mut LayoutTree, source: ImageSource) -> Result<NodeId> {
        let l = layout.new_node()?;
        Ok(self.alloc(SceneNode::new(l, NodeKind::Image(source))))
    }

    /// The node behind `id`, if it is still alive.
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        let slot = self.slots.get(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_ref()
    }

    /// Mutable access to the node behind `id`.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let slot = self.slots.get_mut(id.idx())?;
        if slot.generation != id.1 {
            return None;
        }
        slot.node.as_mut()
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// True if the scene holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children of `id`; empty for a stale id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    fn node_or_stale(&self, id: NodeId) -> Result<&SceneNode> {
        self.get(id).ok_or(Error::StaleNode(id))
    }

    /// Whether `target` is `root` or one of its descendants.
    pub fn subtree_contains(&self, root: NodeId, target: NodeId) -> bool {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            stack.extend_from_slice(self.children(id));
        }
        false
    }

    fn can_adopt(&self, parent: NodeId, child: NodeId) -> bool {
        let Some(node) = self.get(child) else {
            warn!(?parent, ?child, "skipping stale child");
            return false;
        };
        if node.attached {
            warn!(?parent, ?child, "skipping child that already has a parent");
            return false;
        }
        if self.subtree_contains(child, parent) {
            warn!(?parent, ?child, "skipping child that would create a cycle");
            return false;
        }
        true
    }

    fn attach(
        &mut self,
        parent: NodeId,
        child: NodeId,
        index: usize,
        layout: &mut LayoutTree,
    ) -> Result<()> {
        let parent_layout = self.node_or_stale(parent)?.layout;
        let child_layout = self.node_or_stale(child)?.layout;
        layout.insert_child(parent_layout, child_layout, index)?;
        if let Some(p) = self.get_mut(parent) {
            p.children.insert(index, child);
        }
        if let Some(c) = self.get_mut(child) {
            c.attached = true;
        }
        Ok(())
    }

    /// Append `children` to `parent` and insert them into the layout tree at matching indices.
    ///
    /// Children that are stale, already attached, or ancestors of `parent` are
    /// skipped with a warning. Returns how many were added.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        children: &[NodeId],
        layout: &mut LayoutTree,
    ) -> Result<usize> {
        let base = self.node_or_stale(parent)?.children.len();
        let mut added = 0;
        for &child in children {
            if !self.can_adopt(parent, child) {
                continue;
            }
            self.attach(parent, child, base + added, layout)?;
            added += 1;
        }
        Ok(added)
    }

    /// Insert one child at `index` in `parent`'s child list.
    ///
    /// Returns `Ok(false)` if the child was rejected for the reasons listed on
    /// [`add_child`](Self::add_child).
    pub fn insert_child_at(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
        layout: &mut LayoutTree,
    ) -> Result<bool> {
        let len = self.node_or_stale(parent)?.children.len();
        if index > len {
            return Err(Error::ChildIndex { parent, index, len });
        }
        if !self.can_adopt(parent, child) {
            return Ok(false);
        }
        self.attach(parent, child, index, layout)?;
        Ok(true)
    }

    /// Detach `child` from `parent` and tear down its subtree.
    ///
    /// Every node of the subtree loses its registry entry, its layout node and
    /// its slot. Returns the removed ids in pre-order; empty if `child` is not a
    /// child of `parent`.
    pub fn remove_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        layout: &mut LayoutTree,
        registry: &mut InteractiveRegistry,
    ) -> Vec<NodeId> {
        let Some(p) = self.get_mut(parent) else {
            return Vec::new();
        };
        let Some(at) = p.children.iter().position(|&c| c == child) else {
            return Vec::new();
        };
        p.children.remove(at);
        let parent_layout = p.layout;
        if let Some(c) = self.get(child) {
            if let Err(err) = layout.remove_child(parent_layout, c.layout) {
                warn!(?parent, ?child, %err, "layout detach failed");
            }
        }
        self.teardown(child, layout, registry)
    }

    /// Tear down a node that has no parent, such as a builder node never attached.
    ///
    /// Attached nodes must go through [`remove_child`](Self::remove_child) and are left alone.
    pub fn destroy(
        &mut self,
        id: NodeId,
        layout: &mut LayoutTree,
        registry: &mut InteractiveRegistry,
    ) -> Vec<NodeId> {
        match self.get(id) {
            Some(n) if !n.attached => self.teardown(id, layout, registry),
            Some(_) => {
                warn!(?id, "refusing to destroy an attached node");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn teardown(
        &mut self,
        root: NodeId,
        layout: &mut LayoutTree,
        registry: &mut InteractiveRegistry,
    ) -> Vec<NodeId> {
        let mut removed = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.free(id) else {
                continue;
            };
            registry.remove(id);
            if let Err(err) = layout.remove(node.layout) {
                warn!(?id, %err, "layout node removal failed");
            }
            stack.extend(node.children.iter().rev());
            removed.push(id);
        }
        debug!(?root, removed = removed.len(), "subtree torn down");
        removed
    }

    /// Register a handler and flag the node interactive. Returns `false` for a stale id.
    pub fn add_handler(&mut self, id: NodeId, handler: Handler) -> bool {
        let Some(node) = self.get_mut(id) else {
            warn!(?id, "handler added to stale node");
            return false;
        };
        node.handlers.push(handler);
        node.tracker.mark_interactive();
        true
    }

    /// Run `f` while the primary button is held over the node.
    pub fn on_click(
        &mut self,
        id: NodeId,
        f: impl FnMut(&PointerEvent, &mut LayoutTree) + 'static,
    ) -> bool {
        self.add_handler(id, EventHandler::new(HandlerKind::Click, f))
    }

    /// Run `f` on every pointer sample over the node.
    pub fn on_hover(
        &mut self,
        id: NodeId,
        f: impl FnMut(&PointerEvent, &mut LayoutTree) + 'static,
    ) -> bool {
        self.add_handler(id, EventHandler::new(HandlerKind::Hover, f))
    }

    /// Run `f` when the pointer moves onto the node.
    pub fn on_mouse_over(
        &mut self,
        id: NodeId,
        f: impl FnMut(&PointerEvent, &mut LayoutTree) + 'static,
    ) -> bool {
        self.add_handler(id, EventHandler::new(HandlerKind::MouseOver, f))
    }

    /// Turn hit testing of a node on or off without touching its handlers.
    pub fn set_interactive(&mut self, id: NodeId, on: bool, registry: &mut InteractiveRegistry) {
        let Some(node) = self.get_mut(id) else {
            warn!(?id, "set_interactive on stale node");
            return;
        };
        if on {
            node.tracker.mark_interactive();
        } else {
            node.tracker.mark_inert(id, registry);
        }
    }

    /// Give unsized images their intrinsic size. Returns the number of nodes visited.
    ///
    /// With neither dimension set the source size is used; with one set, the
    /// other follows the source aspect ratio.
    pub fn measure(&self, root: NodeId, layout: &mut LayoutTree) -> usize {
        let mut visited = 0;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            visited += 1;
            if let NodeKind::Image(src) = &node.kind {
                measure_image(node.layout, src, layout);
            }
            stack.extend(node.children.iter().rev());
        }
        visited
    }

    /// Draw the subtree at `root`, placing it at `origin`, and bring the registry up to date.
    ///
    /// Paint is pre-order, so children paint over their parents and later
    /// siblings over earlier ones. Index maintenance is post-order. The registry
    /// is not committed here.
    pub fn draw<R: Renderer + ?Sized>(
        &mut self,
        root: NodeId,
        origin: Point,
        layout: &LayoutTree,
        registry: &mut InteractiveRegistry,
        renderer: &mut R,
    ) -> DrawStats {
        let mut pass = DrawPass {
            layout,
            registry,
            renderer,
            next_order: 0,
            stats: DrawStats::default(),
        };
        self.draw_node(root, origin, &mut pass);
        pass.stats
    }

    fn draw_node<R: Renderer + ?Sized>(
        &mut self,
        id: NodeId,
        position: Point,
        pass: &mut DrawPass<'_, R>,
    ) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        node.position = position;
        node.bounds = Rect::from_origin_size(position, pass.layout.layout_size(node.layout));
        node.paint_order = PaintOrder(pass.next_order);
        pass.next_order = pass.next_order.wrapping_add(1);
        pass.stats.visited += 1;
        pass.stats.painted += paint(node, pass.layout, &mut *pass.renderer);

        let mut i = 0;
        while let Some(&child) = self.children(id).get(i) {
            i += 1;
            let Some(c) = self.get(child) else {
                continue;
            };
            let offset = pass.layout.layout_offset(c.layout);
            self.draw_node(child, position + offset, pass);
        }

        let Some(node) = self.get_mut(id) else {
            return;
        };
        let generation = pass.layout.generation(node.layout);
        let dirty = node
            .tracker
            .sync(id, generation, node.bounds, node.paint_order, pass.registry);
        if !dirty.is_empty() {
            pass.stats.refreshed += 1;
        }
        if node.tracker.state() == IndexState::Indexed {
            pass.stats.indexed += 1;
        }
    }
}

fn paint<R: Renderer + ?Sized>(node: &SceneNode, layout: &LayoutTree, renderer: &mut R) -> usize {
    let rect = node.bounds;
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return 0;
    }
    match &node.kind {
        NodeKind::View(style) => {
            let radii = clamp_radii(style.radius, rect.size());
            renderer.draw_rectangle(rect, radii, style.background);
            let widths = layout.border_widths(node.layout);
            match style.border_color {
                Some(color) if widths != kurbo::Insets::ZERO => {
                    renderer.draw_border(rect, widths, radii, color);
                    2
                }
                _ => 1,
            }
        }
        NodeKind::Image(src) => {
            renderer.draw_image(rect, src);
            1
        }
    }
}

fn measure_image(node: LayoutId, src: &ImageSource, layout: &mut LayoutTree) {
    let (w, h) = (layout.style_width(node), layout.style_height(node));
    let Some(ratio) = src.aspect_ratio() else {
        return;
    };
    // Zero is the unset marker: `style_width` reads non-pixel lengths as zero.
    match (w == 0.0, h == 0.0) {
        (true, true) => {
            layout.set_width(node, Length::Px(src.width as f32));
            layout.set_height(node, Length::Px(src.height as f32));
        }
        (true, false) => layout.set_width(node, Length::Px(h * ratio)),
        (false, true) => layout.set_height(node, Length::Px(w / ratio)),
        (false, false) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Available, Direction, Edge, Position};
    use crate::render::{Color, NullRenderer};
    use kurbo::Vec2;

    struct Fixture {
        scene: Scene,
        layout: LayoutTree,
        registry: InteractiveRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                scene: Scene::new(),
                layout: LayoutTree::new(),
                registry: InteractiveRegistry::default(),
            }
        }

        fn view(&mut self, w: f32, h: f32) -> NodeId {
            let id = self.scene.create_view(&mut self.layout, ViewStyle::default()).unwrap();
            let l = self.scene.get(id).unwrap().layout_id();
            self.layout.set_width(l, Length::Px(w));
            self.layout.set_height(l, Length::Px(h));
            id
        }

        fn place(&mut self, id: NodeId, x: f32, y: f32) {
            let l = self.scene.get(id).unwrap().layout_id();
            self.layout.set_position_type(l, Position::Absolute);
            self.layout.set_inset(l, Edge::Left, Length::Px(x));
            self.layout.set_inset(l, Edge::Top, Length::Px(y));
        }

        fn frame(&mut self, root: NodeId) -> DrawStats {
            let l = self.scene.get(root).unwrap().layout_id();
            self.scene.measure(root, &mut self.layout);
            self.layout
                .calculate_layout(l, Available::Unconstrained, Available::Unconstrained, Direction::Ltr)
                .unwrap();
            let stats = self.scene.draw(
                root,
                Point::ZERO,
                &self.layout,
                &mut self.registry,
                &mut NullRenderer,
            );
            self.registry.commit();
            stats
        }
    }

    #[test]
    fn offsets_accumulate() {
        let mut f = Fixture::new();
        let root = f.view(300.0, 300.0);
        let child = f.view(100.0, 100.0);
        let grandchild = f.view(10.0, 10.0);
        f.place(child, 10.0, 20.0);
        f.place(grandchild, 5.0, 5.0);
        f.scene.add_child(root, &[child], &mut f.layout).unwrap();
        f.scene.add_child(child, &[grandchild], &mut f.layout).unwrap();
        f.frame(root);
        assert_eq!(f.scene.get(grandchild).unwrap().position(), Point::new(15.0, 25.0));
        assert_eq!(
            f.scene.get(child).unwrap().bounds(),
            Rect::new(10.0, 20.0, 110.0, 120.0)
        );
    }

    #[test]
    fn add_child_rejects_bad_children() {
        let mut f = Fixture::new();
        let a = f.view(1.0, 1.0);
        let b = f.view(1.0, 1.0);
        let c = f.view(1.0, 1.0);
        assert_eq!(f.scene.add_child(a, &[b, b, a], &mut f.layout).unwrap(), 1);
        assert_eq!(f.scene.add_child(c, &[b], &mut f.layout).unwrap(), 0, "b already has a parent");
        assert_eq!(f.scene.add_child(b, &[c], &mut f.layout).unwrap(), 1);
        assert_eq!(f.scene.add_child(c, &[a], &mut f.layout).unwrap(), 0, "a is an ancestor of c");
        assert_eq!(f.scene.children(a), &[b]);
    }

    #[test]
    fn insert_child_at_checks_index() {
        let mut f = Fixture::new();
        let p = f.view(10.0, 10.0);
        let a = f.view(1.0, 1.0);
        let b = f.view(1.0, 1.0);
        f.scene.add_child(p, &[a], &mut f.layout).unwrap();
        assert!(matches!(
            f.scene.insert_child_at(p, 5, b, &mut f.layout),
            Err(Error::ChildIndex { index: 5, len: 1, .. })
        ));
        assert!(f.scene.insert_child_at(p, 0, b, &mut f.layout).unwrap());
        assert_eq!(f.scene.children(p), &[b, a]);
        assert_eq!(f.layout.child_count(f.scene.get(p).unwrap().layout_id()), 2);
    }

    #[test]
    fn remove_child_tears_down_subtree() {
        let mut f = Fixture::new();
        let root = f.view(200.0, 200.0);
        let mid = f.view(100.0, 100.0);
        let leaf = f.view(50.0, 50.0);
        f.scene.add_child(root, &[mid], &mut f.layout).unwrap();
        f.scene.add_child(mid, &[leaf], &mut f.layout).unwrap();
        f.scene.on_click(mid, |_, _| {});
        f.scene.on_click(leaf, |_, _| {});
        f.frame(root);
        assert_eq!(f.registry.len(), 2);

        let removed = f.scene.remove_child(root, mid, &mut f.layout, &mut f.registry);
        assert_eq!(removed, [mid, leaf]);
        assert!(f.registry.is_empty());
        assert!(!f.scene.is_alive(leaf));
        assert_eq!(f.scene.len(), 1);
        assert!(f.scene.remove_child(root, mid, &mut f.layout, &mut f.registry).is_empty());

        // The freed slot is reused under a new generation.
        let again = f.view(1.0, 1.0);
        assert_ne!(again, mid);
        assert_ne!(again, leaf);
    }

    #[test]
    fn images_take_intrinsic_size() {
        let mut f = Fixture::new();
        let src = ImageSource {
            id: 9,
            width: 64,
            height: 32,
        };
        let root = f.view(500.0, 500.0);
        let free = f.scene.create_image(&mut f.layout, src).unwrap();
        let wide = f.scene.create_image(&mut f.layout, src).unwrap();
        let wide_l = f.scene.get(wide).unwrap().layout_id();
        f.layout.set_width(wide_l, Length::Px(128.0));
        f.scene.add_child(root, &[free, wide], &mut f.layout).unwrap();
        assert_eq!(f.scene.measure(root, &mut f.layout), 3);

        let free_l = f.scene.get(free).unwrap().layout_id();
        assert_eq!(f.layout.style_width(free_l), 64.0);
        assert_eq!(f.layout.style_height(free_l), 32.0);
        assert_eq!(f.layout.style_height(wide_l), 64.0);
    }

    #[test]
    fn paint_order_is_preorder() {
        let mut f = Fixture::new();
        let root = f.view(100.0, 100.0);
        let a = f.view(10.0, 10.0);
        let b = f.view(10.0, 10.0);
        let a1 = f.view(5.0, 5.0);
        f.scene.add_child(root, &[a, b], &mut f.layout).unwrap();
        f.scene.add_child(a, &[a1], &mut f.layout).unwrap();
        let stats = f.frame(root);
        let order = |id| f.scene.get(id).unwrap().paint_order().0;
        assert_eq!([order(root), order(a), order(a1), order(b)], [0, 1, 2, 3]);
        assert_eq!(stats.visited, 4);
        assert_eq!(stats.indexed, 0);
    }

    #[test]
    fn zero_sized_nodes_are_not_indexed() {
        let mut f = Fixture::new();
        let root = f.view(100.0, 100.0);
        let flat = f.view(0.0, 10.0);
        f.scene.add_child(root, &[flat], &mut f.layout).unwrap();
        f.scene.on_click(flat, |_, _| {});
        let stats = f.frame(root);
        assert!(f.registry.is_empty());
        assert_eq!(f.scene.get(flat).unwrap().index_state(), IndexState::AwaitingFirstIndex);
        assert_eq!(stats.visited, 2, "zero-sized nodes are still traversed");
    }

    #[test]
    fn ancestor_move_refreshes_descendants() {
        let mut f = Fixture::new();
        let root = f.view(300.0, 300.0);
        let parent = f.view(100.0, 100.0);
        let child = f.view(20.0, 20.0);
        f.place(parent, 10.0, 10.0);
        f.scene.add_child(root, &[parent], &mut f.layout).unwrap();
        f.scene.add_child(parent, &[child], &mut f.layout).unwrap();
        f.scene.on_click(child, |_, _| {});
        f.frame(root);
        assert_eq!(f.registry.rect(child), Some(Rect::new(10.0, 10.0, 30.0, 30.0)));

        f.place(parent, 50.0, 10.0);
        let stats = f.frame(root);
        assert_eq!(stats.refreshed, 1);
        assert_eq!(
            f.registry.rect(child),
            Some(Rect::new(10.0, 10.0, 30.0, 30.0) + Vec2::new(40.0, 0.0))
        );
    }

    #[test]
    fn views_paint_fill_and_border() {
        #[derive(Default)]
        struct Count(usize, usize);
        impl Renderer for Count {
            fn draw_rectangle(&mut self, _: Rect, _: kurbo::RoundedRectRadii, _: Color) {
                self.0 += 1;
            }
            fn draw_image(&mut self, _: Rect, _: &ImageSource) {}
            fn draw_border(&mut self, _: Rect, _: kurbo::Insets, _: kurbo::RoundedRectRadii, _: Color) {
                self.1 += 1;
            }
        }

        let mut f = Fixture::new();
        let root = f.view(100.0, 100.0);
        if let Some(NodeKind::View(style)) = f.scene.get_mut(root).map(SceneNode::kind_mut) {
            style.border_color = Some(Color::from_rgba8(0, 0, 0, 255));
        }
        let l = f.scene.get(root).unwrap().layout_id();
        f.layout.set_border(l, Edge::All, 2.0);
        f.layout
            .calculate_layout(l, Available::Unconstrained, Available::Unconstrained, Direction::Ltr)
            .unwrap();
        let mut count = Count::default();
        let stats = f.scene.draw(root, Point::ZERO, &f.layout, &mut f.registry, &mut count);
        assert_eq!((count.0, count.1), (1, 1));
        assert_eq!(stats.painted, 2);
    }
}

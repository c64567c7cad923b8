// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame orchestration.
//!
//! A [`Context`] owns the scene, the layout tree, the registry and the
//! dispatcher, and sequences one frame:
//!
//! ```text
//! measure -> layout -> draw (+ registry commit) -> dispatch
//! ```
//!
//! Everything runs on the calling thread. The registry has one writer (draw)
//! and dispatch only runs after draw has committed, so queries never observe a
//! half-updated index.

use kurbo::{Point, Size};
use tracing::debug;

use crate::config::{ContextConfig, RootSizing};
use crate::dispatch::{DispatchReport, EventDispatcher, Handler, PointerEvent};
use crate::error::{Error, Result};
use crate::layout::{Available, LayoutId, LayoutTree, Length};
use crate::pointer::PointerSource;
use crate::registry::{Damage, InteractiveRegistry};
use crate::render::{ImageSource, Renderer, ViewStyle};
use crate::scene::{NodeId, Scene, SceneNode};

/// Results of one [`Context::frame`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Registry changes committed by the draw.
    pub damage: Damage,
    /// Handlers run for the frame's pointer sample.
    pub dispatch: DispatchReport,
}

/// Owner of one UI: scene, layout, hit-test registry and dispatcher.
pub struct Context {
    config: ContextConfig,
    scene: Scene,
    layout: LayoutTree,
    registry: InteractiveRegistry,
    dispatcher: EventDispatcher,
    root: NodeId,
    viewport: Size,
    frame: u64,
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("root", &self.root)
            .field("viewport", &self.viewport)
            .field("frame", &self.frame)
            .field("scene", &self.scene)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Create a context with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ContextConfig::default())
    }

    /// Create a context with an explicit configuration.
    pub fn with_config(config: ContextConfig) -> Result<Self> {
        let mut scene = Scene::new();
        let mut layout = LayoutTree::new();
        let root = scene.create_view(&mut layout, ViewStyle::default())?;
        Ok(Self {
            config,
            scene,
            layout,
            registry: InteractiveRegistry::new(config.registry),
            dispatcher: EventDispatcher::new(config.order),
            root,
            viewport: Size::ZERO,
            frame: 0,
        })
    }

    /// The root view. It is transparent and lives as long as the context.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Active configuration.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// The scene, for inspection.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Shorthand for `scene().get(id)`.
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.scene.get(id)
    }

    /// The layout tree, for reading computed geometry.
    pub fn layout_tree(&self) -> &LayoutTree {
        &self.layout
    }

    /// The layout tree, for restyling outside of [`view`](Self::view).
    pub fn layout_tree_mut(&mut self) -> &mut LayoutTree {
        &mut self.layout
    }

    /// The hit-test registry.
    pub fn registry(&self) -> &InteractiveRegistry {
        &self.registry
    }

    /// Nodes under the pointer as of the last dispatch.
    pub fn hovered(&self) -> &[NodeId] {
        self.dispatcher.hovered()
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Number of completed draws.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Build or extend the UI. `build` receives a builder and the root id.
    pub fn view<R>(&mut self, build: impl FnOnce(&mut Ui<'_>, NodeId) -> Result<R>) -> Result<R> {
        let root = self.root;
        let mut ui = Ui {
            scene: &mut self.scene,
            layout: &mut self.layout,
            registry: &mut self.registry,
        };
        build(&mut ui, root)
    }

    /// Restyle a node. The change is picked up by the next frame.
    pub fn with_layout<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut LayoutTree, LayoutId) -> R,
    ) -> Result<R> {
        let l = self.scene.get(id).ok_or(Error::StaleNode(id))?.layout_id();
        Ok(f(&mut self.layout, l))
    }

    /// Set the size offered to the root.
    ///
    /// With [`RootSizing::Viewport`] the root is also fixed to this size.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
        if self.config.sizing == RootSizing::Viewport {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "layout works in f32 pixels"
            )]
            let (w, h) = (width as f32, height as f32);
            if let Some(root) = self.scene.get(self.root) {
                let l = root.layout_id();
                self.layout.set_width(l, Length::Px(w));
                self.layout.set_height(l, Length::Px(h));
            }
        }
    }

    /// Give unsized images their intrinsic size. Must run before [`layout`](Self::layout).
    pub fn measure(&mut self) -> usize {
        let visited = self.scene.measure(self.root, &mut self.layout);
        debug!(nodes = visited, "measure");
        visited
    }

    /// Solve layout for the whole tree.
    pub fn layout(&mut self) -> Result<()> {
        let l = self.scene.get(self.root).ok_or(Error::StaleNode(self.root))?.layout_id();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "layout works in f32 pixels"
        )]
        let (width, height) = match self.config.sizing {
            RootSizing::Viewport => (
                Available::Definite(self.viewport.width as f32),
                Available::Definite(self.viewport.height as f32),
            ),
            RootSizing::Auto => (Available::Unconstrained, Available::Unconstrained),
        };
        self.layout.calculate_layout(l, width, height, self.config.direction)
    }

    /// Measure, then layout.
    pub fn update(&mut self) -> Result<()> {
        self.measure();
        self.layout()
    }

    /// Draw the tree, refresh the registry, and commit it.
    ///
    /// After this returns, every indexed node's registry box equals its drawn box.
    pub fn draw<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Damage {
        let stats = self.scene.draw(
            self.root,
            Point::ZERO,
            &self.layout,
            &mut self.registry,
            renderer,
        );
        let damage = self.registry.commit();
        self.frame += 1;
        debug!(
            frame = self.frame,
            visited = stats.visited,
            painted = stats.painted,
            indexed = stats.indexed,
            refreshed = stats.refreshed,
            damage = damage.dirty_rects.len(),
            "draw"
        );
        damage
    }

    /// Hit test one pointer sample and run the matching handlers.
    pub fn listen_pointer(&mut self, x: f64, y: f64, pressed: bool) -> DispatchReport {
        self.dispatcher.dispatch(
            Point::new(x, y),
            pressed,
            &mut self.scene,
            &mut self.layout,
            &self.registry,
        )
    }

    /// [`listen_pointer`](Self::listen_pointer) with a sample read from `pointer`.
    pub fn poll(&mut self, pointer: &impl PointerSource) -> DispatchReport {
        let p = pointer.position();
        self.listen_pointer(p.x, p.y, pointer.primary_pressed())
    }

    /// Run a whole frame: update, draw, then dispatch the pointer sample.
    pub fn frame<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        pointer: &impl PointerSource,
    ) -> Result<FrameReport> {
        self.update()?;
        let damage = self.draw(renderer);
        let dispatch = self.poll(pointer);
        Ok(FrameReport { damage, dispatch })
    }

    /// Remove `child` and its subtree from `parent`, including registry entries and hover state.
    pub fn discard(&mut self, parent: NodeId, child: NodeId) -> Vec<NodeId> {
        let removed =
            self.scene
                .remove_child(parent, child, &mut self.layout, &mut self.registry);
        self.dispatcher.forget(&removed);
        removed
    }

    /// Turn hit testing of a node on or off.
    pub fn set_interactive(&mut self, id: NodeId, on: bool) {
        self.scene.set_interactive(id, on, &mut self.registry);
    }
}

/// Builder handed to [`Context::view`].
pub struct Ui<'a> {
    scene: &'a mut Scene,
    layout: &'a mut LayoutTree,
    registry: &'a mut InteractiveRegistry,
}

impl core::fmt::Debug for Ui<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ui").field("scene", &self.scene).finish_non_exhaustive()
    }
}

impl Ui<'_> {
    /// Create a detached view.
    pub fn view(&mut self, style: ViewStyle) -> Result<NodeId> {
        self.scene.create_view(self.layout, style)
    }

    /// Create a detached image.
    pub fn image(&mut self, source: ImageSource) -> Result<NodeId> {
        self.scene.create_image(self.layout, source)
    }

    /// Append children to `parent`. See [`Scene::add_child`].
    pub fn add_child(&mut self, parent: NodeId, children: &[NodeId]) -> Result<usize> {
        self.scene.add_child(parent, children, self.layout)
    }

    /// Insert one child at `index`. See [`Scene::insert_child_at`].
    pub fn insert_child_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<bool> {
        self.scene.insert_child_at(parent, index, child, self.layout)
    }

    /// Layout handle of `id`.
    pub fn layout_id(&self, id: NodeId) -> Result<LayoutId> {
        Ok(self.scene.get(id).ok_or(Error::StaleNode(id))?.layout_id())
    }

    /// Edit the layout style of `id`.
    pub fn style(&mut self, id: NodeId, f: impl FnOnce(&mut LayoutTree, LayoutId)) -> Result<()> {
        let l = self.layout_id(id)?;
        f(self.layout, l);
        Ok(())
    }

    /// Register a handler. See [`Scene::add_handler`].
    pub fn add_handler(&mut self, id: NodeId, handler: Handler) -> bool {
        self.scene.add_handler(id, handler)
    }

    /// See [`Scene::on_click`].
    pub fn on_click(
        &mut self,
        id: NodeId,
        f: impl FnMut(&PointerEvent, &mut LayoutTree) + 'static,
    ) -> bool {
        self.scene.on_click(id, f)
    }

    /// See [`Scene::on_hover`].
    pub fn on_hover(
        &mut self,
        id: NodeId,
        f: impl FnMut(&PointerEvent, &mut LayoutTree) + 'static,
    ) -> bool {
        self.scene.on_hover(id, f)
    }

    /// See [`Scene::on_mouse_over`].
    pub fn on_mouse_over(
        &mut self,
        id: NodeId,
        f: impl FnMut(&PointerEvent, &mut LayoutTree) + 'static,
    ) -> bool {
        self.scene.on_mouse_over(id, f)
    }

    /// Turn hit testing of a node on or off.
    pub fn set_interactive(&mut self, id: NodeId, on: bool) {
        self.scene.set_interactive(id, on, self.registry);
    }

    /// Read access to the scene being built.
    pub fn scene(&self) -> &Scene {
        self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Edge;
    use crate::pointer::PointerState;
    use crate::render::NullRenderer;

    #[test]
    fn viewport_sizes_root() {
        let mut cx = Context::new().unwrap();
        cx.set_viewport(800.0, 600.0);
        cx.update().unwrap();
        let l = cx.node(cx.root()).unwrap().layout_id();
        assert_eq!(cx.layout_tree().layout_size(l), Size::new(800.0, 600.0));
    }

    #[test]
    fn auto_root_takes_content_size() {
        let mut cx = Context::with_config(ContextConfig {
            sizing: RootSizing::Auto,
            ..ContextConfig::default()
        })
        .unwrap();
        cx.set_viewport(800.0, 600.0);
        cx.view(|ui, root| {
            let child = ui.view(ViewStyle::default())?;
            ui.style(child, |t, l| {
                t.set_width(l, Length::Px(120.0));
                t.set_height(l, Length::Px(30.0));
            })?;
            ui.style(root, |t, l| t.set_padding(l, Edge::All, Length::Px(5.0)))?;
            ui.add_child(root, &[child])
        })
        .unwrap();
        cx.update().unwrap();
        let l = cx.node(cx.root()).unwrap().layout_id();
        assert_eq!(cx.layout_tree().layout_size(l), Size::new(130.0, 40.0));
    }

    #[test]
    fn frame_runs_every_stage() {
        let mut cx = Context::new().unwrap();
        cx.set_viewport(200.0, 200.0);
        let button = cx
            .view(|ui, root| {
                let b = ui.view(ViewStyle::default())?;
                ui.style(b, |t, l| {
                    t.set_width(l, Length::Px(50.0));
                    t.set_height(l, Length::Px(50.0));
                })?;
                ui.on_hover(b, |_, _| {});
                ui.add_child(root, &[b])?;
                Ok(b)
            })
            .unwrap();

        let report = cx
            .frame(&mut NullRenderer, &PointerState::new(10.0, 10.0, false))
            .unwrap();
        assert_eq!(report.damage.union(), Some(kurbo::Rect::new(0.0, 0.0, 50.0, 50.0)));
        assert_eq!(report.dispatch.hits, [button]);
        assert_eq!(report.dispatch.invoked, 1);
        assert_eq!(cx.frame_count(), 1);
        assert_eq!(cx.hovered(), &[button]);
    }

    #[test]
    fn stale_ids_are_errors() {
        let mut cx = Context::new().unwrap();
        let root = cx.root();
        let child = cx.view(|ui, root| {
            let c = ui.view(ViewStyle::default())?;
            ui.add_child(root, &[c])?;
            Ok(c)
        })
        .unwrap();
        assert_eq!(cx.discard(root, child), [child]);
        assert!(matches!(
            cx.with_layout(child, |_, _| ()),
            Err(Error::StaleNode(id)) if id == child
        ));
    }
}

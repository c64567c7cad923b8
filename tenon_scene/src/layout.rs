// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout node adapter over the [`taffy`] flexbox engine.
//!
//! [`LayoutTree`] owns a `TaffyTree` and exposes the narrow surface the scene
//! needs: style setters and getters, child insertion, a solve entry point, and
//! computed-box getters.
//!
//! ## Dirtied notification
//!
//! Every style mutation that actually changes a node's style bumps a per-node
//! generation counter on that node and on each of its ancestors, mirroring how
//! the engine propagates dirtiness. Scene nodes record the generation when they
//! are first indexed and compare it lazily during the next draw. No callbacks
//! are stored, so there is nothing to unregister when a node goes away.
//!
//! Computed getters are total: before any solve, or for a removed node, they
//! report a zero-sized box. The engine panics on removed handles, so every
//! entry point checks liveness against the generation map first.

use hashbrown::HashMap;
use kurbo::{Insets, Size, Vec2};
use taffy::{
    AvailableSpace, Dimension, LengthPercentage, LengthPercentageAuto, NodeId as TaffyNode,
    Style, TaffyTree, TraversePartialTree,
};
use tracing::{debug, warn};

pub use taffy::{AlignContent, AlignItems, AlignSelf, Display, FlexDirection, FlexWrap, JustifyContent, Position};

use crate::error::{Error, Result};

/// Handle of a node in the [`LayoutTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayoutId(TaffyNode);

/// A style length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels.
    Px(f32),
    /// Percentage of the parent, `0.0..=100.0`.
    Percent(f32),
    /// Let the engine decide.
    Auto,
}

impl Length {
    fn dimension(self) -> Dimension {
        match self {
            Self::Px(v) => Dimension::Length(v),
            Self::Percent(p) => Dimension::Percent(p / 100.0),
            Self::Auto => Dimension::Auto,
        }
    }

    fn length_percentage_auto(self) -> LengthPercentageAuto {
        match self {
            Self::Px(v) => LengthPercentageAuto::Length(v),
            Self::Percent(p) => LengthPercentageAuto::Percent(p / 100.0),
            Self::Auto => LengthPercentageAuto::Auto,
        }
    }

    /// Padding and borders have no `auto`; it resolves to zero.
    fn length_percentage(self) -> LengthPercentage {
        match self {
            Self::Px(v) => LengthPercentage::Length(v),
            Self::Percent(p) => LengthPercentage::Percent(p / 100.0),
            Self::Auto => LengthPercentage::Length(0.0),
        }
    }
}

/// Which sides of a box-model property to set.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Left side.
    Left,
    /// Top side.
    Top,
    /// Right side.
    Right,
    /// Bottom side.
    Bottom,
    /// Left and right.
    Horizontal,
    /// Top and bottom.
    Vertical,
    /// All four sides.
    All,
}

impl Edge {
    fn apply<T: Copy>(self, rect: &mut taffy::Rect<T>, value: T) {
        let (l, t, r, b) = match self {
            Self::Left => (true, false, false, false),
            Self::Top => (false, true, false, false),
            Self::Right => (false, false, true, false),
            Self::Bottom => (false, false, false, true),
            Self::Horizontal => (true, false, true, false),
            Self::Vertical => (false, true, false, true),
            Self::All => (true, true, true, true),
        };
        if l {
            rect.left = value;
        }
        if t {
            rect.top = value;
        }
        if r {
            rect.right = value;
        }
        if b {
            rect.bottom = value;
        }
    }
}

/// Horizontal layout direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left. Horizontal offsets are mirrored inside each parent.
    Rtl,
}

/// Space offered to the root along one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Available {
    /// A fixed number of pixels.
    Definite(f32),
    /// No constraint; the root takes its content size.
    Unconstrained,
}

impl From<Available> for AvailableSpace {
    fn from(a: Available) -> Self {
        match a {
            Available::Definite(v) => Self::Definite(v),
            Available::Unconstrained => Self::MaxContent,
        }
    }
}

/// Flexbox layout tree with per-node dirtied generations.
pub struct LayoutTree {
    taffy: TaffyTree<()>,
    generations: HashMap<TaffyNode, u64>,
    direction: Direction,
}

impl core::fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutTree")
            .field("nodes", &self.taffy.total_node_count())
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            generations: HashMap::new(),
            direction: Direction::Ltr,
        }
    }

    /// Create a node with the default (flex row, auto-sized) style.
    pub fn new_node(&mut self) -> Result<LayoutId> {
        let node = self.taffy.new_leaf(Style::default())?;
        self.generations.insert(node, 0);
        Ok(LayoutId(node))
    }

    /// Whether `node` is allocated in this tree.
    pub fn contains(&self, node: LayoutId) -> bool {
        self.generations.contains_key(&node.0)
    }

    fn live(&self, node: LayoutId) -> Result<TaffyNode> {
        if self.contains(node) {
            Ok(node.0)
        } else {
            Err(Error::StaleLayout(node))
        }
    }

    /// Insert `child` into `parent` at `index`.
    pub fn insert_child(&mut self, parent: LayoutId, child: LayoutId, index: usize) -> Result<()> {
        self.live(parent)?;
        self.live(child)?;
        self.taffy.insert_child_at_index(parent.0, index, child.0)?;
        self.touch(parent.0);
        Ok(())
    }

    /// Detach `child` from `parent`. The child node stays allocated.
    pub fn remove_child(&mut self, parent: LayoutId, child: LayoutId) -> Result<()> {
        self.live(parent)?;
        self.live(child)?;
        self.taffy.remove_child(parent.0, child.0)?;
        self.touch(parent.0);
        Ok(())
    }

    /// Free a node. Its children, if any, are detached but not freed.
    ///
    /// Removing an already removed node is a no-op.
    pub fn remove(&mut self, node: LayoutId) -> Result<()> {
        if !self.contains(node) {
            warn!(?node, "removing unknown layout node");
            return Ok(());
        }
        if let Some(parent) = self.taffy.parent(node.0) {
            self.touch(parent);
        }
        self.taffy.remove(node.0)?;
        self.generations.remove(&node.0);
        Ok(())
    }

    /// Number of children of `node`.
    pub fn child_count(&self, node: LayoutId) -> usize {
        if !self.contains(node) {
            return 0;
        }
        self.taffy.child_count(node.0)
    }

    /// Dirtied generation of `node`; changes whenever the node or a descendant is restyled.
    pub fn generation(&self, node: LayoutId) -> u64 {
        self.generations.get(&node.0).copied().unwrap_or(0)
    }

    fn touch(&mut self, node: TaffyNode) {
        let mut cur = Some(node);
        while let Some(n) = cur {
            let Some(generation) = self.generations.get_mut(&n) else {
                break;
            };
            *generation += 1;
            cur = self.taffy.parent(n);
        }
    }

    /// Edit the style of `node`. Returns whether the style changed.
    ///
    /// Unchanged styles do not mark the node dirty and do not bump its generation.
    pub fn update_style(&mut self, node: LayoutId, f: impl FnOnce(&mut Style)) -> bool {
        if !self.contains(node) {
            warn!(?node, "style update on unknown layout node");
            return false;
        }
        let mut next = match self.taffy.style(node.0) {
            Ok(style) => style.clone(),
            Err(err) => {
                warn!(?node, %err, "style update on unknown layout node");
                return false;
            }
        };
        f(&mut next);
        if self.taffy.style(node.0).is_ok_and(|s| *s == next) {
            return false;
        }
        if let Err(err) = self.taffy.set_style(node.0, next) {
            warn!(?node, %err, "layout engine rejected style");
            return false;
        }
        self.touch(node.0);
        true
    }

    /// Set the preferred width.
    pub fn set_width(&mut self, node: LayoutId, width: Length) {
        self.update_style(node, |s| s.size.width = width.dimension());
    }

    /// Set the preferred height.
    pub fn set_height(&mut self, node: LayoutId, height: Length) {
        self.update_style(node, |s| s.size.height = height.dimension());
    }

    /// Set the minimum width.
    pub fn set_min_width(&mut self, node: LayoutId, width: Length) {
        self.update_style(node, |s| s.min_size.width = width.dimension());
    }

    /// Set the minimum height.
    pub fn set_min_height(&mut self, node: LayoutId, height: Length) {
        self.update_style(node, |s| s.min_size.height = height.dimension());
    }

    /// Set the maximum width.
    pub fn set_max_width(&mut self, node: LayoutId, width: Length) {
        self.update_style(node, |s| s.max_size.width = width.dimension());
    }

    /// Set the maximum height.
    pub fn set_max_height(&mut self, node: LayoutId, height: Length) {
        self.update_style(node, |s| s.max_size.height = height.dimension());
    }

    /// Set padding on `edge`. `Length::Auto` counts as zero.
    pub fn set_padding(&mut self, node: LayoutId, edge: Edge, value: Length) {
        self.update_style(node, |s| edge.apply(&mut s.padding, value.length_percentage()));
    }

    /// Set margin on `edge`.
    pub fn set_margin(&mut self, node: LayoutId, edge: Edge, value: Length) {
        self.update_style(node, |s| {
            edge.apply(&mut s.margin, value.length_percentage_auto());
        });
    }

    /// Set an automatic margin on `edge` (used for centering).
    pub fn set_margin_auto(&mut self, node: LayoutId, edge: Edge) {
        self.set_margin(node, edge, Length::Auto);
    }

    /// Set the border width on `edge`, in pixels.
    pub fn set_border(&mut self, node: LayoutId, edge: Edge, width: f32) {
        self.update_style(node, |s| {
            edge.apply(&mut s.border, LengthPercentage::Length(width));
        });
    }

    /// Set an inset on `edge`; meaningful with [`Position::Absolute`] or as a relative offset.
    pub fn set_inset(&mut self, node: LayoutId, edge: Edge, value: Length) {
        self.update_style(node, |s| {
            edge.apply(&mut s.inset, value.length_percentage_auto());
        });
    }

    /// Set the main axis.
    pub fn set_flex_direction(&mut self, node: LayoutId, direction: FlexDirection) {
        self.update_style(node, |s| s.flex_direction = direction);
    }

    /// Set line wrapping.
    pub fn set_flex_wrap(&mut self, node: LayoutId, wrap: FlexWrap) {
        self.update_style(node, |s| s.flex_wrap = wrap);
    }

    /// Set main-axis distribution.
    pub fn set_justify_content(&mut self, node: LayoutId, justify: JustifyContent) {
        self.update_style(node, |s| s.justify_content = Some(justify));
    }

    /// Set cross-axis alignment of children.
    pub fn set_align_items(&mut self, node: LayoutId, align: AlignItems) {
        self.update_style(node, |s| s.align_items = Some(align));
    }

    /// Override cross-axis alignment of this node within its parent.
    pub fn set_align_self(&mut self, node: LayoutId, align: AlignSelf) {
        self.update_style(node, |s| s.align_self = Some(align));
    }

    /// Set distribution of wrapped lines.
    pub fn set_align_content(&mut self, node: LayoutId, align: AlignContent) {
        self.update_style(node, |s| s.align_content = Some(align));
    }

    /// Set the gap between children on both axes, in pixels.
    pub fn set_gap(&mut self, node: LayoutId, gap: f32) {
        self.update_style(node, |s| {
            s.gap.width = LengthPercentage::Length(gap);
            s.gap.height = LengthPercentage::Length(gap);
        });
    }

    /// Set the grow factor.
    pub fn set_flex_grow(&mut self, node: LayoutId, grow: f32) {
        self.update_style(node, |s| s.flex_grow = grow);
    }

    /// Set the shrink factor.
    pub fn set_flex_shrink(&mut self, node: LayoutId, shrink: f32) {
        self.update_style(node, |s| s.flex_shrink = shrink);
    }

    /// Set the flex basis.
    pub fn set_flex_basis(&mut self, node: LayoutId, basis: Length) {
        self.update_style(node, |s| s.flex_basis = basis.dimension());
    }

    /// Set relative or absolute positioning.
    pub fn set_position_type(&mut self, node: LayoutId, position: Position) {
        self.update_style(node, |s| s.position = position);
    }

    /// Set the display mode; `Display::None` removes the node from layout.
    pub fn set_display(&mut self, node: LayoutId, display: Display) {
        self.update_style(node, |s| s.display = display);
    }

    /// Preferred width in pixels, or `0.0` when it is not a pixel length.
    pub fn style_width(&self, node: LayoutId) -> f32 {
        self.style_px(node, |s| s.size.width)
    }

    /// Preferred height in pixels, or `0.0` when it is not a pixel length.
    pub fn style_height(&self, node: LayoutId) -> f32 {
        self.style_px(node, |s| s.size.height)
    }

    fn style_px(&self, node: LayoutId, pick: impl FnOnce(&Style) -> Dimension) -> f32 {
        if !self.contains(node) {
            warn!(?node, "style read on unknown layout node");
            return 0.0;
        }
        match self.taffy.style(node.0).map(pick) {
            Ok(Dimension::Length(v)) => v,
            Ok(_) => 0.0,
            Err(err) => {
                warn!(?node, %err, "style read on unknown layout node");
                0.0
            }
        }
    }

    /// Pixel border widths. Percentage borders read as zero.
    pub fn border_widths(&self, node: LayoutId) -> Insets {
        let px = |lp: LengthPercentage| match lp {
            LengthPercentage::Length(v) => f64::from(v),
            LengthPercentage::Percent(_) => 0.0,
        };
        if !self.contains(node) {
            return Insets::ZERO;
        }
        match self.taffy.style(node.0) {
            Ok(s) => Insets::new(
                px(s.border.left),
                px(s.border.top),
                px(s.border.right),
                px(s.border.bottom),
            ),
            Err(_) => Insets::ZERO,
        }
    }

    /// Solve layout for the subtree rooted at `root`.
    pub fn calculate_layout(
        &mut self,
        root: LayoutId,
        width: Available,
        height: Available,
        direction: Direction,
    ) -> Result<()> {
        let root = self.live(root)?;
        debug!(?width, ?height, ?direction, "calculate layout");
        self.direction = direction;
        self.taffy.compute_layout(
            root,
            taffy::Size {
                width: width.into(),
                height: height.into(),
            },
        )?;
        Ok(())
    }

    /// Direction used by the last solve.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn computed(&self, node: LayoutId) -> Option<&taffy::Layout> {
        if !self.contains(node) {
            warn!(?node, "layout read on unknown layout node");
            return None;
        }
        match self.taffy.layout(node.0) {
            Ok(layout) => Some(layout),
            Err(err) => {
                warn!(?node, %err, "layout read on unknown layout node");
                None
            }
        }
    }

    /// Offset of the node's left edge from its parent's left edge.
    pub fn layout_left(&self, node: LayoutId) -> f32 {
        let Some(l) = self.computed(node) else {
            return 0.0;
        };
        match (self.direction, self.taffy.parent(node.0)) {
            (Direction::Rtl, Some(parent)) => {
                let parent_width = self.taffy.layout(parent).map_or(0.0, |p| p.size.width);
                parent_width - l.location.x - l.size.width
            }
            _ => l.location.x,
        }
    }

    /// Offset of the node's top edge from its parent's top edge.
    pub fn layout_top(&self, node: LayoutId) -> f32 {
        self.computed(node).map_or(0.0, |l| l.location.y)
    }

    /// Computed width.
    pub fn layout_width(&self, node: LayoutId) -> f32 {
        self.computed(node).map_or(0.0, |l| l.size.width)
    }

    /// Computed height.
    pub fn layout_height(&self, node: LayoutId) -> f32 {
        self.computed(node).map_or(0.0, |l| l.size.height)
    }

    /// Parent-relative offset as a vector.
    pub fn layout_offset(&self, node: LayoutId) -> Vec2 {
        Vec2::new(
            f64::from(self.layout_left(node)),
            f64::from(self.layout_top(node)),
        )
    }

    /// Computed size.
    pub fn layout_size(&self, node: LayoutId) -> Size {
        Size::new(
            f64::from(self.layout_width(node)),
            f64::from(self.layout_height(node)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(tree: &mut LayoutTree, w: f32, h: f32) -> LayoutId {
        let n = tree.new_node().unwrap();
        tree.set_width(n, Length::Px(w));
        tree.set_height(n, Length::Px(h));
        n
    }

    #[test]
    fn zero_box_before_layout() {
        let mut tree = LayoutTree::new();
        let n = fixed(&mut tree, 100.0, 50.0);
        assert_eq!(tree.layout_size(n), Size::ZERO);
        assert_eq!(tree.style_width(n), 100.0);
    }

    #[test]
    fn solve_places_children() {
        let mut tree = LayoutTree::new();
        let root = fixed(&mut tree, 300.0, 100.0);
        let a = fixed(&mut tree, 40.0, 20.0);
        let b = fixed(&mut tree, 60.0, 20.0);
        tree.insert_child(root, a, 0).unwrap();
        tree.insert_child(root, b, 1).unwrap();
        tree.set_padding(root, Edge::All, Length::Px(10.0));
        tree.calculate_layout(root, Available::Unconstrained, Available::Unconstrained, Direction::Ltr)
            .unwrap();
        assert_eq!(tree.layout_offset(a), Vec2::new(10.0, 10.0));
        assert_eq!(tree.layout_offset(b), Vec2::new(50.0, 10.0));
        assert_eq!(tree.layout_size(root), Size::new(300.0, 100.0));
    }

    #[test]
    fn rtl_mirrors_offsets() {
        let mut tree = LayoutTree::new();
        let root = fixed(&mut tree, 200.0, 100.0);
        let a = fixed(&mut tree, 50.0, 20.0);
        tree.insert_child(root, a, 0).unwrap();
        tree.calculate_layout(root, Available::Definite(200.0), Available::Definite(100.0), Direction::Rtl)
            .unwrap();
        assert_eq!(tree.layout_left(a), 150.0);
        assert_eq!(tree.layout_left(root), 0.0, "roots are not mirrored");
    }

    #[test]
    fn generation_bumps_on_change_only() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node().unwrap();
        let child = tree.new_node().unwrap();
        tree.insert_child(root, child, 0).unwrap();
        let (g_root, g_child) = (tree.generation(root), tree.generation(child));

        tree.set_width(child, Length::Px(10.0));
        assert_eq!(tree.generation(child), g_child + 1);
        assert_eq!(tree.generation(root), g_root + 1, "ancestors see descendant changes");

        tree.set_width(child, Length::Px(10.0));
        assert_eq!(tree.generation(child), g_child + 1, "same style is not a change");
    }

    #[test]
    fn percent_and_non_px_read_as_zero() {
        let mut tree = LayoutTree::new();
        let n = tree.new_node().unwrap();
        tree.set_width(n, Length::Percent(50.0));
        assert_eq!(tree.style_width(n), 0.0);
        assert_eq!(tree.style_height(n), 0.0);
    }

    #[test]
    fn border_widths_read_back() {
        let mut tree = LayoutTree::new();
        let n = tree.new_node().unwrap();
        tree.set_border(n, Edge::Horizontal, 2.0);
        tree.set_border(n, Edge::Top, 1.0);
        assert_eq!(tree.border_widths(n), Insets::new(2.0, 1.0, 2.0, 0.0));
    }

    #[test]
    fn removed_node_reads_zero() {
        let mut tree = LayoutTree::new();
        let root = fixed(&mut tree, 100.0, 100.0);
        let n = fixed(&mut tree, 10.0, 10.0);
        tree.insert_child(root, n, 0).unwrap();
        tree.calculate_layout(root, Available::Unconstrained, Available::Unconstrained, Direction::Rtl)
            .unwrap();
        tree.remove(n).unwrap();
        assert!(!tree.contains(n));

        assert_eq!(tree.layout_width(n), 0.0);
        assert_eq!(tree.layout_left(n), 0.0);
        assert_eq!(tree.layout_size(n), Size::ZERO);
        assert_eq!(tree.style_width(n), 0.0);
        assert_eq!(tree.border_widths(n), Insets::ZERO);
        assert_eq!(tree.child_count(n), 0);
        assert_eq!(tree.generation(n), 0);
        assert!(!tree.update_style(n, |s| s.flex_grow = 1.0));
        tree.set_width(n, Length::Px(5.0));
        tree.remove(n).unwrap();
    }

    #[test]
    fn removed_node_is_rejected_by_structural_edits() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node().unwrap();
        let gone = tree.new_node().unwrap();
        tree.remove(gone).unwrap();

        assert!(matches!(tree.insert_child(root, gone, 0), Err(Error::StaleLayout(id)) if id == gone));
        assert!(matches!(tree.remove_child(gone, root), Err(Error::StaleLayout(id)) if id == gone));
        assert!(matches!(
            tree.calculate_layout(gone, Available::Unconstrained, Available::Unconstrained, Direction::Ltr),
            Err(Error::StaleLayout(_))
        ));
        assert_eq!(tree.child_count(root), 0);
    }
}

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer seam and the paint data carried by scene nodes.

use kurbo::{Insets, Rect, RoundedRectRadii, Size};
pub use peniko::Color;

/// Decoded pixel data is owned by the host; the scene only carries its identity and size.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageSource {
    /// Host-defined handle.
    pub id: u64,
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
}

impl ImageSource {
    /// Width over height, or `None` for a degenerate source.
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }
}

/// Paint properties of a view.
#[derive(Clone, Debug)]
pub struct ViewStyle {
    /// Fill color.
    pub background: Color,
    /// Border stroke color; borders are only drawn when this is set and the node has border widths.
    pub border_color: Option<Color>,
    /// Corner radii, clamped to the node's size when drawn.
    pub radius: RoundedRectRadii,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            background: Color::TRANSPARENT,
            border_color: None,
            radius: RoundedRectRadii::from_single_radius(0.0),
        }
    }
}

impl ViewStyle {
    /// A style with the given fill.
    pub fn filled(background: Color) -> Self {
        Self {
            background,
            ..Self::default()
        }
    }
}

/// Shrink every corner so that none exceeds half the shorter side of `size`.
pub fn clamp_radii(radii: RoundedRectRadii, size: Size) -> RoundedRectRadii {
    let limit = (size.width.min(size.height) * 0.5).max(0.0);
    let c = |r: f64| r.clamp(0.0, limit);
    RoundedRectRadii::new(
        c(radii.top_left),
        c(radii.top_right),
        c(radii.bottom_right),
        c(radii.bottom_left),
    )
}

/// Draws primitives at absolute coordinates.
///
/// Calls are synchronous and only affect the current frame.
pub trait Renderer {
    /// Fill a rounded rectangle.
    fn draw_rectangle(&mut self, rect: Rect, radii: RoundedRectRadii, color: Color);

    /// Draw an image scaled into `rect`.
    fn draw_image(&mut self, rect: Rect, image: &ImageSource);

    /// Stroke a border inside `rect` with per-side `widths`.
    fn draw_border(&mut self, rect: Rect, widths: Insets, radii: RoundedRectRadii, color: Color) {
        let _ = (rect, widths, radii, color);
    }
}

/// A renderer that draws nothing, for headless frames.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_rectangle(&mut self, _: Rect, _: RoundedRectRadii, _: Color) {}

    fn draw_image(&mut self, _: Rect, _: &ImageSource) {}
}

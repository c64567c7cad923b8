// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer sampling.
//!
//! The host polls its windowing layer once per frame and hands the sample to
//! [`Context::poll`](crate::Context::poll). Positions are in layout coordinates.

use kurbo::Point;

/// Something that can report the current pointer state.
pub trait PointerSource {
    /// Cursor position.
    fn position(&self) -> Point;

    /// Whether the primary button is held right now.
    fn primary_pressed(&self) -> bool;
}

/// A plain pointer sample.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Cursor position.
    pub position: Point,
    /// Primary button held.
    pub pressed: bool,
}

impl PointerState {
    /// A sample at `(x, y)`.
    pub fn new(x: f64, y: f64, pressed: bool) -> Self {
        Self {
            position: Point::new(x, y),
            pressed,
        }
    }
}

impl PointerSource for PointerState {
    fn position(&self) -> Point {
        self.position
    }

    fn primary_pressed(&self) -> bool {
        self.pressed
    }
}

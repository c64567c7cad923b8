// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A row of buttons driven through full frames.
//!
//! Each button counts clicks and grows a little on every click. The renderer
//! just logs what it would draw.
//!
//! Run:
//! - `cargo run -p tenon_demos --example click_counter`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Insets, Rect, RoundedRectRadii};
use tenon_scene::{
    AlignItems, Color, Context, Edge, ImageSource, JustifyContent, Length, PointerState, Renderer,
    ViewStyle,
};
use tracing::info;

struct LogRenderer {
    primitives: usize,
}

impl Renderer for LogRenderer {
    fn draw_rectangle(&mut self, rect: Rect, radii: RoundedRectRadii, _: Color) {
        self.primitives += 1;
        info!(?rect, radius = radii.top_left, "rectangle");
    }

    fn draw_image(&mut self, rect: Rect, image: &ImageSource) {
        self.primitives += 1;
        info!(?rect, image = image.id, "image");
    }

    fn draw_border(&mut self, rect: Rect, widths: Insets, _: RoundedRectRadii, _: Color) {
        self.primitives += 1;
        info!(?rect, left = widths.x0, "border");
    }
}

fn main() -> Result<(), tenon_scene::Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut cx = Context::new()?;
    cx.set_viewport(640.0, 200.0);

    let counts: Vec<Rc<Cell<u32>>> = (0..3).map(|_| Rc::default()).collect();
    let buttons = cx.view(|ui, root| {
        ui.style(root, |t, l| {
            t.set_justify_content(l, JustifyContent::SpaceEvenly);
            t.set_align_items(l, AlignItems::Center);
        })?;
        let mut buttons = Vec::new();
        for count in &counts {
            let style = ViewStyle {
                background: Color::from_rgba8(0x33, 0x66, 0xcc, 0xff),
                border_color: Some(Color::from_rgba8(0x11, 0x22, 0x44, 0xff)),
                radius: RoundedRectRadii::from_single_radius(8.0),
            };
            let b = ui.view(style)?;
            ui.style(b, |t, l| {
                t.set_width(l, Length::Px(120.0));
                t.set_height(l, Length::Px(60.0));
                t.set_border(l, Edge::All, 2.0);
            })?;
            let count = count.clone();
            ui.on_click(b, move |e, layout| {
                count.set(count.get() + 1);
                let grown = e.bounds.width() as f32 + 4.0;
                layout.set_width(e.layout_node, Length::Px(grown));
            });
            buttons.push(b);
        }
        ui.add_child(root, &buttons)?;
        Ok(buttons)
    })?;

    let mut renderer = LogRenderer { primitives: 0 };

    // Frame 1: nothing under the pointer.
    cx.frame(&mut renderer, &PointerState::new(5.0, 5.0, false))?;

    // Frames 2 and 3: press over the middle button; it grows after each frame.
    let middle = cx.registry().rect(buttons[1]).unwrap_or(Rect::ZERO).center();
    for _ in 0..2 {
        let report = cx.frame(&mut renderer, &PointerState::new(middle.x, middle.y, true))?;
        info!(hits = report.dispatch.hits.len(), invoked = report.dispatch.invoked, "frame");
    }

    // Frame 4: the growth from the last click is now indexed.
    let report = cx.frame(&mut renderer, &PointerState::new(middle.x, middle.y, false))?;
    info!(dirty = ?report.damage.union(), "after release");

    let clicks: Vec<u32> = counts.iter().map(|c| c.get()).collect();
    println!("clicks per button: {clicks:?}");
    println!("primitives drawn: {}", renderer.primitives);
    assert_eq!(clicks, [0, 2, 0]);
    assert_eq!(
        cx.registry().rect(buttons[1]).map(|r| r.width()),
        Some(128.0),
        "two clicks grew the button by 8px"
    );
    Ok(())
}

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover enter/leave and overlap ordering.
//!
//! A card sits partly over a panel. Moving the pointer across both shows the
//! enter/leave transitions and which node is served first under each policy.
//!
//! Run:
//! - `cargo run -p tenon_demos --example hover_tracking`

use tenon_scene::{
    Context, ContextConfig, Edge, Length, NodeId, NullRenderer, OrderPolicy, Position, Ui,
    ViewStyle,
};

fn boxed(ui: &mut Ui<'_>, x: f32, y: f32, w: f32, h: f32) -> tenon_scene::Result<NodeId> {
    let id = ui.view(ViewStyle::default())?;
    ui.style(id, |t, l| {
        t.set_position_type(l, Position::Absolute);
        t.set_inset(l, Edge::Left, Length::Px(x));
        t.set_inset(l, Edge::Top, Length::Px(y));
        t.set_width(l, Length::Px(w));
        t.set_height(l, Length::Px(h));
    })?;
    ui.on_mouse_over(id, |e, _| println!("  mouse over {:?} at {:?}", e.node, e.point));
    Ok(id)
}

fn run(policy: OrderPolicy) -> tenon_scene::Result<()> {
    let mut cx = Context::with_config(ContextConfig {
        order: policy,
        ..ContextConfig::default()
    })?;
    cx.set_viewport(300.0, 300.0);
    let (panel, card) = cx.view(|ui, root| {
        let panel = boxed(ui, 0.0, 0.0, 200.0, 200.0)?;
        let card = boxed(ui, 150.0, 150.0, 100.0, 100.0)?;
        ui.add_child(root, &[panel, card])?;
        Ok((panel, card))
    })?;
    cx.update()?;
    cx.draw(&mut NullRenderer);

    println!("== {policy:?} ==");
    let mut served_first = Vec::new();
    for (x, y) in [(50.0, 50.0), (175.0, 175.0), (225.0, 225.0), (280.0, 20.0)] {
        let r = cx.listen_pointer(x, y, false);
        println!(
            "({x}, {y}) hits={:?} entered={:?} left={:?}",
            r.hits, r.entered, r.left
        );
        served_first.push(r.hits.first().copied());
    }

    let expected_overlap = match policy {
        OrderPolicy::TopmostFirst => card,
        OrderPolicy::PaintOrder => panel,
    };
    assert_eq!(
        served_first,
        [Some(panel), Some(expected_overlap), Some(card), None]
    );
    assert!(cx.hovered().is_empty());
    Ok(())
}

fn main() -> tenon_scene::Result<()> {
    run(OrderPolicy::TopmostFirst)?;
    run(OrderPolicy::PaintOrder)
}

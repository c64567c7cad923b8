// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responder building blocks without a scene.
//!
//! Ranks overlapping hits, tracks hover transitions, and runs prioritized
//! handlers against a plain state value.
//!
//! Run:
//! - `cargo run -p tenon_demos --example responder_basics`

use tenon_responder::{
    EventHandler, HandlerKind, Handlers, HoverEvent, HoverState, OrderPolicy, PaintOrder,
    ResolvedHit, rank,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Widget {
    Window,
    Toolbar,
    Button,
}

fn main() {
    let hit = |node, order| ResolvedHit {
        node,
        order: PaintOrder(order),
        meta: (),
    };
    let mut hits = vec![
        hit(Widget::Toolbar, 1),
        hit(Widget::Button, 2),
        hit(Widget::Window, 0),
    ];
    rank(&mut hits, OrderPolicy::TopmostFirst);
    let order: Vec<_> = hits.iter().map(|h| h.node).collect();
    println!("topmost first: {order:?}");
    assert_eq!(order, [Widget::Button, Widget::Toolbar, Widget::Window]);

    let mut hover = HoverState::new();
    let first = hover.update(&order);
    let second = hover.update(&[Widget::Toolbar, Widget::Window]);
    println!("hover: {first:?} then {second:?}");
    assert_eq!(second, [HoverEvent::Leave(Widget::Button)]);

    // Handlers share a log; the lowest priority runs first regardless of push order.
    let mut handlers: Handlers<Widget, Vec<String>> = Handlers::new();
    handlers.push(EventHandler::new(HandlerKind::MouseOver, |w, log: &mut Vec<String>| {
        log.push(format!("mouse over {w:?}"));
    }));
    handlers.push(EventHandler::new(HandlerKind::Hover, |w, log: &mut Vec<String>| {
        log.push(format!("hover {w:?}"));
    }));
    handlers.push(EventHandler::with_priority(HandlerKind::Click, 0, |w, log: &mut Vec<String>| {
        log.push(format!("urgent click {w:?}"));
    }));

    let pressed = true;
    let mut log = Vec::new();
    let ran = handlers.invoke(
        |kind| kind != HandlerKind::Click || pressed,
        &Widget::Button,
        &mut log,
    );
    println!("ran {ran}: {log:?}");
    assert_eq!(
        log,
        ["urgent click Button", "hover Button", "mouse over Button"]
    );
}

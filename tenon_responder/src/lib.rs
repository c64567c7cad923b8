// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tenon Responder: the input-side vocabulary of the Tenon scene graph.
//!
//! ## Overview
//!
//! This crate does no hit testing and knows nothing about layout. It supplies
//! the pieces a dispatcher combines after a spatial query:
//!
//! - [`handler`]: [`HandlerKind`](handler::HandlerKind) (`Hover`, `Click`, `MouseOver`),
//!   [`EventHandler`](handler::EventHandler) callbacks with integer priorities, and the
//!   per-node [`Handlers`](handler::Handlers) list that runs them in ascending priority.
//! - [`order`]: [`PaintOrder`](order::PaintOrder) stamps, the
//!   [`OrderPolicy`](order::OrderPolicy) used when several nodes overlap a point, and
//!   [`rank`](order::rank).
//! - [`hover`]: [`HoverState`](hover::HoverState), which turns successive hit sets into
//!   enter/leave transitions.
//!
//! ## Dispatch sketch
//!
//! ```
//! use tenon_responder::handler::{EventHandler, HandlerKind, Handlers};
//! use tenon_responder::hover::{HoverEvent, HoverState};
//! use tenon_responder::order::{OrderPolicy, PaintOrder, ResolvedHit, rank};
//!
//! // Two overlapping nodes; node 1 was painted after node 0.
//! let mut handlers: Vec<Handlers<(), Vec<usize>>> = vec![Handlers::new(), Handlers::new()];
//! for (i, h) in handlers.iter_mut().enumerate() {
//!     h.push(EventHandler::new(HandlerKind::Click, move |_, log: &mut Vec<usize>| log.push(i)));
//! }
//! let mut hits = vec![
//!     ResolvedHit { node: 0_usize, order: PaintOrder(0), meta: () },
//!     ResolvedHit { node: 1_usize, order: PaintOrder(1), meta: () },
//! ];
//! rank(&mut hits, OrderPolicy::TopmostFirst);
//!
//! let pressed = true;
//! let mut log = Vec::new();
//! for hit in &hits {
//!     handlers[hit.node].invoke(|k| k != HandlerKind::Click || pressed, &(), &mut log);
//! }
//! assert_eq!(log, [1, 0]);
//!
//! let mut hover = HoverState::new();
//! let ids: Vec<_> = hits.iter().map(|h| h.node).collect();
//! assert_eq!(hover.update(&ids), [HoverEvent::Enter(1), HoverEvent::Enter(0)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod handler;
pub mod hover;
pub mod order;

pub use handler::{EventHandler, HandlerKind, Handlers};
pub use hover::{HoverEvent, HoverState};
pub use order::{OrderPolicy, PaintOrder, ResolvedHit, rank};

// Copyright 2025 the Tenon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tenon Scene: a retained-mode scene graph with flexbox layout and R-tree hit testing.
//!
//! The UI is a tree of [`SceneNode`]s whose sizes and offsets come from a
//! flexbox engine ([`LayoutTree`], backed by `taffy`). Each frame:
//!
//! - **Measure** gives unsized images their intrinsic size.
//! - **Layout** solves the tree for the viewport.
//! - **Draw** threads absolute positions top-down, paints through a [`Renderer`],
//!   and refreshes the [`InteractiveRegistry`] for nodes whose box changed.
//! - **Dispatch** resolves a pointer sample against the registry and runs the
//!   matched nodes' handlers.
//!
//! Only interactive nodes (those with a handler, or flagged with
//! [`Context::set_interactive`]) are indexed. Their state is tracked by a
//! [`DirtyTracker`]; after every draw, an indexed node's registry box equals its
//! absolute position plus its computed size.
//!
//! Overlapping matches are ordered by [`OrderPolicy`]; the default serves the
//! node painted on top first, and every match still receives its handlers.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tenon_scene::{Context, Edge, Length, NullRenderer, Position, ViewStyle};
//!
//! let mut cx = Context::new()?;
//! cx.set_viewport(400.0, 300.0);
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = clicks.clone();
//! cx.view(|ui, root| {
//!     let button = ui.view(ViewStyle::default())?;
//!     ui.style(button, |t, l| {
//!         t.set_position_type(l, Position::Absolute);
//!         t.set_inset(l, Edge::Left, Length::Px(50.0));
//!         t.set_inset(l, Edge::Top, Length::Px(50.0));
//!         t.set_width(l, Length::Px(100.0));
//!         t.set_height(l, Length::Px(100.0));
//!     })?;
//!     ui.on_click(button, move |_, _| counter.set(counter.get() + 1));
//!     ui.add_child(root, &[button])
//! })?;
//!
//! cx.update()?;
//! cx.draw(&mut NullRenderer);
//!
//! cx.listen_pointer(75.0, 75.0, true);
//! cx.listen_pointer(75.0, 75.0, false);
//! cx.listen_pointer(200.0, 200.0, true);
//! assert_eq!(clicks.get(), 1);
//! # Ok::<(), tenon_scene::Error>(())
//! ```
//!
//! # Threading
//!
//! Everything is single-threaded and synchronous. Handlers are plain `FnMut`
//! closures and need not be `Send`.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod layout;
pub mod pointer;
pub mod registry;
pub mod render;
pub mod scene;
pub mod tracker;

pub use config::{ContextConfig, RegistryConfig, RootSizing};
pub use context::{Context, FrameReport, Ui};
pub use dispatch::{DispatchReport, EventDispatcher, Handler, PointerEvent};
pub use error::{Error, Result};
pub use layout::{
    AlignContent, AlignItems, AlignSelf, Available, Direction, Display, Edge, FlexDirection,
    FlexWrap, JustifyContent, LayoutId, LayoutTree, Length, Position,
};
pub use pointer::{PointerSource, PointerState};
pub use registry::{Damage, InteractiveRegistry};
pub use render::{Color, ImageSource, NullRenderer, Renderer, ViewStyle, clamp_radii};
pub use scene::{DrawStats, NodeId, NodeKind, Scene, SceneNode};
pub use tracker::{Dirty, DirtyTracker, IndexState};

pub use tenon_responder::{EventHandler, HandlerKind, OrderPolicy, PaintOrder};

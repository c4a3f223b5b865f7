// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zooy DOM: a headless document model for the Zooy component framework.
//!
//! The component, drag and split crates are written against this model rather than a
//! browser binding. It stores exactly the state those crates read and write:
//!
//! - An element tree with generational [`ElementId`] handles. Stale handles are ignored.
//! - CSS classes and inline styles (`flex-basis`, `left`, `top`, ...).
//! - Bounding client rectangles, written by whatever host performs layout.
//! - Event listeners on elements or on the document, dispatched capture → target → bubble.
//! - Virtual timers (`set_timeout`) driven by [`Dom::advance`].
//! - Running CSS transitions, completed by [`Dom::finish_transitions`].
//!
//! ## Handles and re-entrancy
//!
//! [`Dom`] is a cheap-clone handle. No internal borrow is held while a listener or timer
//! callback runs, so callbacks may create elements, add or remove listeners, or dispatch
//! nested events.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::Point;
//! use zooy_dom::{Dom, DomEvent, DomTarget, EventKind, ListenOptions};
//!
//! let dom = Dom::new();
//! let button = dom.create_element("button");
//! dom.append_child(dom.body(), button);
//!
//! let clicks = Rc::new(Cell::new(0));
//! let seen = clicks.clone();
//! dom.add_listener(
//!     DomTarget::Element(button),
//!     EventKind::Click,
//!     ListenOptions::default(),
//!     move |_ev| seen.set(seen.get() + 1),
//! );
//!
//! dom.dispatch(
//!     DomTarget::Element(button),
//!     DomEvent::mouse(EventKind::Click, Point::new(4.0, 4.0)),
//! );
//! assert_eq!(clicks.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod event;
mod types;
mod util;

pub use document::{Dom, WeakDom};
pub use event::DomEvent;
pub use types::{
    DomTarget, ElementId, EventKind, Fragment, ListenOptions, ListenerKey, Phase, TimerId,
};
pub use util::{format_px, parse_px};

// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zooy Drag: turns raw pointer and touch input into a start/move/end event triad.
//!
//! A [`Dragger`] is a component whose element can be dragged by a handle (its own element
//! unless [`Dragger::set_handle`] says otherwise). While unlocked it listens for
//! `mousedown`/`touchstart` on the handle. A press installs capture-phase
//! move/up listeners on the document for the duration of the drag only.
//!
//! Positions are computed from the pointer's offset to the element's top-left corner at
//! drag start (`x_org`, `y_org`), so every move derives the new `left`/`top` directly from
//! the current pointer position without accumulating drift. The [`Axis`] decides which of
//! `left`/`top` is written.
//!
//! Every phase dispatches a bus event ([`drag_event::START`], [`drag_event::MOVE`],
//! [`drag_event::END`]) whose envelope payload is a [`DragInfo`].
//!
//! ```
//! use kurbo::Point;
//! use zooy_component::Runtime;
//! use zooy_dom::{DomEvent, DomTarget, EventKind};
//! use zooy_drag::{Axis, Dragger};
//!
//! let rt = Runtime::new();
//! let dragger = Dragger::new(&rt, Axis::X);
//! dragger.component().render(None).unwrap();
//! assert!(!dragger.is_locked());
//!
//! let handle = dragger.component().element().unwrap();
//! let dom = rt.dom();
//! let press = DomEvent::mouse(EventKind::MouseDown, Point::new(10.0, 10.0));
//! dom.dispatch(DomTarget::Element(handle), press);
//! let drag = DomEvent::mouse(EventKind::MouseMove, Point::new(35.0, 90.0));
//! dom.dispatch(DomTarget::Document, drag);
//!
//! // x-only: `left` follows the pointer, `top` is untouched.
//! assert_eq!(dom.style(handle, "left").as_deref(), Some("25px"));
//! assert_eq!(dom.style(handle, "top"), None);
//!
//! dom.dispatch(DomTarget::Document, DomEvent::mouse(EventKind::MouseUp, Point::new(35.0, 90.0)));
//! assert!(!dragger.is_dragging());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod dragger;
mod gesture;

pub use dragger::{Dragger, LOCKED_CLASS};
pub use gesture::{Axis, DragInfo};

/// Bus event types dispatched by a [`Dragger`].
pub mod drag_event {
    /// A drag started. Envelope value `"start"`.
    pub const START: &str = "zooy-drag-start";
    /// The pointer moved during a drag. Envelope value `"move"`.
    pub const MOVE: &str = "zooy-drag-move";
    /// The drag ended. Envelope value `"end"`.
    pub const END: &str = "zooy-drag-end";
}

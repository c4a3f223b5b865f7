// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zooy Split: nested, drag-resizable layouts.
//!
//! A [`Split`] owns a container element and divides it, recursively, into named regions
//! called nests. Each [`Split::add_split`] turns one container into three nests:
//!
//! ```text
//! ┌───────┬─┬──────────────┬─┬───────┐
//! │   A   │┃│      B       │┃│   C   │
//! └───────┴─┴──────────────┴─┴───────┘
//! ```
//!
//! `A` and `C` have a size (`flex-basis`) controlled by the divider next to them; `B`
//! takes what is left. Names are the container's name followed by the side letter, so
//! splitting nest `"C"` yields `"CA"`, `"CB"` and `"CC"`.
//!
//! ## Sizes
//!
//! A nest's size changes in one place. Dragging a divider writes the new size straight to
//! the nest record and its `flex-basis`, clamped to `[0, max]` where `max` is the combined
//! extent of the nest and `B` measured when the drag started. Programmatic changes
//! ([`Split::resize_with`], [`Split::open`], [`Split::close`], ...) animate: the nest gets
//! the [`ANIMATED_CLASS`] and the continuation runs when its `transitionend` arrives, or
//! after [`SplitConfig::transition_fallback_ms`].
//!
//! ## Divider state
//!
//! Each resizable nest carries a [`DividerState`]. `COLLAPSED` and `CLOSED` are mirrored as
//! classes on the divider; `LOCKED` locks the divider's [`Dragger`](zooy_drag::Dragger).
//!
//! ```
//! use zooy_component::Runtime;
//! use zooy_split::{Orientation, Split};
//!
//! let rt = Runtime::new();
//! let split = Split::new(&rt);
//! split.component().render(None).unwrap();
//!
//! let names = split.add_split(None, Orientation::EW, 200.0, 150.0, &[]).unwrap();
//! assert_eq!(names, ["A", "B", "C"]);
//! split.add_split(Some("C"), Orientation::NS, 80.0, 80.0, &[]).unwrap();
//! assert_eq!(split.nest_names(), ["A", "B", "CA", "CB", "CC"]);
//!
//! split.toggle("A").unwrap();
//! assert_eq!(split.nest("A").unwrap().current_size, 0.0);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod nest;
mod split;

pub use config::SplitConfig;
pub use error::SplitError;
pub use nest::{DividerState, Nest, Orientation, Side};
pub use split::{ANIMATED_CLASS, DIVIDER_CLASS, GRABBER_CLASS, NEST_CLASS, SPLIT_CLASS, Split};

/// Bus event types dispatched by a [`Split`].
pub mod split_event {
    /// Nest state transitions. The envelope value is one of [`values`](crate::values).
    pub const SPLIT: &str = "zooy-split-event";
}

/// Envelope values of [`split_event::SPLIT`] events.
pub mod values {
    /// A nest is about to open.
    pub const WILL_OPEN: &str = "will-open";
    /// A nest finished opening.
    pub const DID_OPEN: &str = "did-open";
    /// A nest is about to close.
    pub const WILL_CLOSE: &str = "will-close";
    /// A nest finished closing.
    pub const DID_CLOSE: &str = "did-close";
    /// A divider drag ended.
    pub const DRAG_END: &str = "drag-end";
}

// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zooy Component: a tree of DOM-backed objects with an explicit lifecycle.
//!
//! ## Lifecycle
//!
//! A [`Component`] moves through:
//!
//! 1. created, optionally configured with a DOM factory ([`Component::set_dom_factory`] or
//!    [`Component::set_fragment`]);
//! 2. [`render`](Component::render): the element is created and attached, and the node
//!    enters the document if its parent already has (or it has no parent);
//! 3. [`exit_document`](Component::exit_document) / [`enter_document`](Component::enter_document),
//!    any number of times as the node is detached and reattached;
//! 4. [`dispose`](Component::dispose): permanent teardown.
//!
//! Entering recurses into children that have DOM but are not yet in the document, then runs
//! [`ComponentHooks::before_ready`], then dispatches a [`READY`](zooy_events::values::READY)
//! component event. A parent's READY therefore always follows the READY of every attached
//! descendant.
//!
//! Exiting runs children first, then drops every listener relationship of the node in both
//! directions. Disposal additionally disposes the children, releases the element and clears
//! the model.
//!
//! ## Ownership
//!
//! A parent owns its children (keyed by string); a child refers back to its parent weakly.
//! [`Component`] itself is a cheap-clone handle.
//!
//! ```
//! use zooy_component::{Component, Runtime};
//!
//! let rt = Runtime::new();
//! let root = Component::new(&rt);
//! let child = Component::new(&rt);
//! root.add_child("child", child.clone());
//!
//! child.render(None).unwrap(); // deferred: parent not in the document yet
//! assert!(!child.is_in_document());
//!
//! root.render(None).unwrap();
//! assert!(child.is_in_document());
//!
//! root.dispose();
//! assert!(child.is_disposed());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod component;
mod error;
mod runtime;

pub use component::{Component, ComponentHooks, WeakComponent};
pub use error::ComponentError;
pub use runtime::Runtime;

// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zooy Events: envelopes, event buses and listener bookkeeping.
//!
//! ## Overview
//!
//! Every lifecycle object in Zooy embeds an [`Evt`]. It gives the object:
//!
//! - An identity in a shared [`Registry`] ([`ParticipantId`]).
//! - Its own [`EventBus`] that other objects subscribe to.
//! - `listen`/`stop_listening_to` operations that record every subscription so it can be
//!   reversed individually or in bulk.
//!
//! ## The registry
//!
//! The [`Registry`] keeps two indexes per participant:
//!
//! - *listening to*: target → event name → unsubscribe actions.
//! - *observed by*: the set of participants currently listening to this one.
//!
//! Both sides are updated by the same call, so for any observer/target pair the target's
//! *observed by* set contains the observer exactly when the observer holds at least one
//! live subscription to the target. That is what makes mass unsubscription safe:
//! [`Evt::stop_being_listened_to`] can tear down every inbound subscription without the
//! observers' cooperation.
//!
//! Anything that wants to be listened to implements [`Observable`] by handing out its
//! [`Evt`]. DOM targets are listened to through [`Evt::listen_dom`]; they are recorded on
//! the *listening to* side only.
//!
//! ## Envelopes
//!
//! Component-level events carry a [`CompEventData`]: an immutable `(value, payload)` pair.
//!
//! ```
//! use zooy_dom::Dom;
//! use zooy_events::{Evt, Registry, event_type};
//!
//! let dom = Dom::new();
//! let registry = Registry::new();
//! let panel = Evt::new(&registry, &dom);
//! let view = Evt::new(&registry, &dom);
//!
//! view.listen(&panel, event_type::COMP, |ev| {
//!     if ev.data().value() == "save" {
//!         ev.prevent_default();
//!     }
//! });
//! assert!(registry.is_observed_by(panel.id(), view.id()));
//!
//! // `true`: a handler prevented the default.
//! assert!(panel.dispatch_comp_event("save", None));
//!
//! panel.stop_being_listened_to();
//! assert!(registry.is_clean(view.id()));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bus;
mod envelope;
mod evt;
mod registry;

pub use bus::{BusEvent, EventBus, EventName, HandlerKey};
pub use envelope::{CompEventData, Payload, values};
pub use evt::{Evt, Observable};
pub use registry::{ParticipantId, Registry, TargetKey};

/// Well-known bus event types.
pub mod event_type {
    /// Framework-level component event; carries a [`CompEventData`](crate::CompEventData).
    pub const COMP: &str = "zooy-comp-event";
}

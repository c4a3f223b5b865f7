// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object event bus.

use alloc::borrow::Cow;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::envelope::CompEventData;
use crate::registry::ParticipantId;

/// Name of a bus event type or a subscription slot.
pub type EventName = Cow<'static, str>;

type BusHandler = Rc<dyn Fn(&mut BusEvent)>;

/// An event travelling over an [`EventBus`].
#[derive(Clone, Debug)]
pub struct BusEvent {
    event_type: EventName,
    data: CompEventData,
    source: ParticipantId,
    default_prevented: bool,
}

impl BusEvent {
    /// Build an event of `event_type` sent by `source`.
    pub fn new(
        event_type: impl Into<EventName>,
        data: CompEventData,
        source: ParticipantId,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            source,
            default_prevented: false,
        }
    }

    /// The event type.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The envelope.
    pub fn data(&self) -> &CompEventData {
        &self.data
    }

    /// The participant that dispatched the event.
    pub fn source(&self) -> ParticipantId {
        self.source
    }

    /// Mark the event as handled; the dispatcher reports this back to its caller.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler prevented the default.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handle for a bus subscription.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct HandlerKey(u64);

#[derive(Default)]
struct BusInner {
    handlers: Vec<(HandlerKey, EventName, BusHandler)>,
    next: u64,
}

/// Handlers keyed by event type, invoked in subscription order.
#[derive(Clone, Default)]
pub struct EventBus(Rc<RefCell<BusInner>>);

#[derive(Clone, Default)]
pub(crate) struct WeakBus(Weak<RefCell<BusInner>>);

impl WeakBus {
    pub(crate) fn upgrade(&self) -> Option<EventBus> {
        self.0.upgrade().map(EventBus)
    }
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.0.borrow().handlers.len())
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn downgrade(&self) -> WeakBus {
        WeakBus(Rc::downgrade(&self.0))
    }

    /// Subscribe `handler` to events of `event_type`.
    pub fn subscribe(
        &self,
        event_type: impl Into<EventName>,
        handler: impl Fn(&mut BusEvent) + 'static,
    ) -> HandlerKey {
        let mut inner = self.0.borrow_mut();
        inner.next += 1;
        let key = HandlerKey(inner.next);
        inner
            .handlers
            .push((key, event_type.into(), Rc::new(handler)));
        key
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, key: HandlerKey) -> bool {
        let mut inner = self.0.borrow_mut();
        let before = inner.handlers.len();
        inner.handlers.retain(|(k, _, _)| *k != key);
        inner.handlers.len() != before
    }

    /// Number of live subscriptions.
    pub fn handler_count(&self) -> usize {
        self.0.borrow().handlers.len()
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.0.borrow_mut().handlers.clear();
    }

    /// Run every handler subscribed to the event's type.
    ///
    /// Handlers may subscribe or unsubscribe while the event is in flight; a handler
    /// removed before its turn is skipped.
    pub fn dispatch(&self, event: &mut BusEvent) {
        let keys: Vec<HandlerKey> = self
            .0
            .borrow()
            .handlers
            .iter()
            .filter(|(_, t, _)| *t == event.event_type)
            .map(|(k, _, _)| *k)
            .collect();
        for key in keys {
            let handler = self
                .0
                .borrow()
                .handlers
                .iter()
                .find(|(k, _, _)| *k == key)
                .map(|(_, _, h)| h.clone());
            if let Some(handler) = handler {
                handler(event);
            }
        }
    }
}

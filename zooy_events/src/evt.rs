// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The listener base embedded in every lifecycle object.

use alloc::boxed::Box;
use alloc::borrow::Cow;

use zooy_dom::{Dom, DomEvent, DomTarget, EventKind, ListenOptions};

use crate::bus::{BusEvent, EventBus, EventName};
use crate::envelope::{CompEventData, Payload};
use crate::event_type;
use crate::registry::{ParticipantId, Registry, TargetKey};

/// Types that other participants can listen to.
///
/// Implementors expose their embedded [`Evt`]; listening goes through its bus and the
/// registry records the relationship on both sides.
pub trait Observable {
    /// The embedded listener base.
    fn evt(&self) -> &Evt;
}

/// Listener bookkeeping and an event bus for one participant.
pub struct Evt {
    id: ParticipantId,
    registry: Registry,
    bus: EventBus,
    dom: Dom,
}

impl core::fmt::Debug for Evt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Evt")
            .field("id", &self.id)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

impl Observable for Evt {
    fn evt(&self) -> &Evt {
        self
    }
}

impl Evt {
    /// Register a new participant in `registry`, listening to DOM targets of `dom`.
    pub fn new(registry: &Registry, dom: &Dom) -> Self {
        Self {
            id: registry.register(),
            registry: registry.clone(),
            bus: EventBus::new(),
            dom: dom.clone(),
        }
    }

    /// This participant's identity.
    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// The shared registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// This participant's own bus.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The document DOM listeners are attached to.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Subscribe `handler` to `event_type` events on `target`'s bus.
    ///
    /// The subscription is recorded under `(target, event_type)` and the target's reverse
    /// index is updated in the same step.
    pub fn listen<T: Observable + ?Sized>(
        &self,
        target: &T,
        event_type: impl Into<EventName>,
        handler: impl Fn(&mut BusEvent) + 'static,
    ) {
        let target = target.evt();
        let event_type = event_type.into();
        let key = target.bus.subscribe(event_type.clone(), handler);
        let bus = target.bus.downgrade();
        self.registry.subscribe(
            self.id,
            TargetKey::Participant(target.id),
            event_type,
            Box::new(move || {
                if let Some(bus) = bus.upgrade() {
                    bus.unsubscribe(key);
                }
            }),
        );
    }

    /// Subscribe `handler` to native `kind` events on a DOM target.
    pub fn listen_dom(
        &self,
        target: impl Into<DomTarget>,
        kind: EventKind,
        options: ListenOptions,
        handler: impl Fn(&mut DomEvent) + 'static,
    ) {
        let target = target.into();
        let key = self.dom.add_listener(target, kind, options, handler);
        let dom = self.dom.downgrade();
        self.registry.subscribe(
            self.id,
            TargetKey::Dom(target),
            Cow::Borrowed(kind.as_str()),
            Box::new(move || {
                if let Some(dom) = dom.upgrade() {
                    dom.remove_listener(key);
                }
            }),
        );
    }

    /// Drop subscriptions to `target`: those for `event_type` if given, otherwise all.
    pub fn stop_listening_to<T: Observable + ?Sized>(
        &self,
        target: &T,
        event_type: Option<&str>,
    ) -> usize {
        self.registry
            .unsubscribe(self.id, TargetKey::Participant(target.evt().id), event_type)
    }

    /// Drop subscriptions to a DOM target: those for `kind` if given, otherwise all.
    pub fn stop_listening_to_dom(
        &self,
        target: impl Into<DomTarget>,
        kind: Option<EventKind>,
    ) -> usize {
        self.registry
            .unsubscribe(self.id, TargetKey::Dom(target.into()), kind.map(EventKind::as_str))
    }

    /// Drop every subscription this participant holds.
    pub fn stop_listening_to_all(&self) -> usize {
        self.registry.unsubscribe_all(self.id)
    }

    /// Make every participant listening to this one drop its subscriptions.
    pub fn stop_being_listened_to(&self) -> usize {
        self.registry.stop_being_listened_to(self.id)
    }

    /// Whether anyone is listening to this participant.
    pub fn is_observed(&self) -> bool {
        !self.registry.observers_of(self.id).is_empty()
    }

    /// Dispatch an event of `event_type` on this participant's bus.
    ///
    /// Returns `true` if any handler prevented the default.
    pub fn dispatch(&self, event_type: impl Into<EventName>, data: CompEventData) -> bool {
        let mut event = BusEvent::new(event_type, data, self.id);
        self.bus.dispatch(&mut event);
        event.is_default_prevented()
    }

    /// Wrap `(value, payload)` in a [`CompEventData`] and dispatch it as a
    /// [`COMP`](event_type::COMP) event.
    ///
    /// Returns `true` if any handler prevented the default.
    pub fn dispatch_comp_event(
        &self,
        value: impl Into<Cow<'static, str>>,
        payload: Option<Payload>,
    ) -> bool {
        self.dispatch(event_type::COMP, CompEventData::new(value, payload))
    }

    /// Remove every relationship in both directions and drop the bus's handlers.
    pub fn dispose(&self) {
        let dropped = self.registry.forget(self.id);
        self.bus.clear();
        tracing::trace!(participant = ?self.id, dropped, "listener base disposed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use alloc::string::String;
    use core::cell::{Cell, RefCell};

    fn click() -> DomEvent {
        DomEvent::new(EventKind::Click)
    }

    fn setup() -> (Dom, Registry) {
        (Dom::new(), Registry::new())
    }

    #[test]
    fn listen_and_dispatch_roundtrip() {
        let (dom, reg) = setup();
        let source = Evt::new(&reg, &dom);
        let sink = Evt::new(&reg, &dom);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();
        sink.listen(&source, event_type::COMP, move |ev| {
            log.borrow_mut().push(String::from(ev.data().value()));
        });
        assert!(!source.dispatch_comp_event("a", None));
        assert_eq!(*seen.borrow(), ["a"]);
        assert!(source.is_observed());
    }

    #[test]
    fn stop_listening_to_one_event_keeps_others() {
        let (dom, reg) = setup();
        let source = Evt::new(&reg, &dom);
        let sink = Evt::new(&reg, &dom);
        let hits = Rc::new(Cell::new(0));
        let (h1, h2) = (hits.clone(), hits.clone());
        sink.listen(&source, "one", move |_| h1.set(h1.get() + 1));
        sink.listen(&source, "two", move |_| h2.set(h2.get() + 10));

        assert_eq!(sink.stop_listening_to(&source, Some("one")), 1);
        source.dispatch("one", CompEventData::new("x", None));
        source.dispatch("two", CompEventData::new("x", None));
        assert_eq!(hits.get(), 10);
        assert!(reg.is_observed_by(source.id(), sink.id()));

        assert_eq!(sink.stop_listening_to(&source, None), 1);
        assert!(!reg.is_observed_by(source.id(), sink.id()));
        assert_eq!(source.bus().handler_count(), 0);
    }

    #[test]
    fn dom_listeners_are_removed_in_bulk() {
        let (dom, reg) = setup();
        let evt = Evt::new(&reg, &dom);
        let el = dom.create_element("div");
        dom.append_child(dom.body(), el);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        evt.listen_dom(el, EventKind::Click, ListenOptions::default(), move |_| h.set(h.get() + 1));
        evt.listen_dom(DomTarget::Document, EventKind::MouseMove, ListenOptions::capture(), |_| {});

        dom.dispatch(DomTarget::Element(el), click());
        assert_eq!(hits.get(), 1);

        assert_eq!(evt.stop_listening_to_all(), 2);
        assert_eq!(dom.listener_count(DomTarget::Element(el)), 0);
        assert_eq!(dom.listener_count(DomTarget::Document), 0);
        dom.dispatch(DomTarget::Element(el), click());
        assert_eq!(hits.get(), 1);
        assert!(reg.is_clean(evt.id()));
    }

    #[test]
    fn dispose_clears_both_directions() {
        let (dom, reg) = setup();
        let a = Evt::new(&reg, &dom);
        let b = Evt::new(&reg, &dom);
        a.listen(&b, "x", |_| {});
        b.listen(&a, "y", |_| {});
        a.dispose();
        assert!(reg.is_clean(a.id()));
        assert!(reg.is_clean(b.id()));
        assert_eq!(b.bus().handler_count(), 0);
        assert_eq!(a.bus().handler_count(), 0);
    }

    #[test]
    fn self_listening_is_tracked() {
        let (dom, reg) = setup();
        let a = Evt::new(&reg, &dom);
        a.listen(&a, "x", |_| {});
        assert!(reg.is_observed_by(a.id(), a.id()));
        a.stop_being_listened_to();
        assert!(reg.is_clean(a.id()));
    }
}

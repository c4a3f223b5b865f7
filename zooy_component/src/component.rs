// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle node.

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use zooy_dom::{Dom, DomEvent, DomTarget, ElementId, EventKind, Fragment, ListenOptions};
use zooy_events::{
    BusEvent, EventName, Evt, Observable, ParticipantId, Payload, Registry, TargetKey, values,
};

use crate::error::ComponentError;
use crate::runtime::Runtime;

/// Extension points run at fixed lifecycle steps.
///
/// Both methods default to doing nothing. They are called with no internal borrow held,
/// so they may listen, dispatch, add children or touch the DOM.
pub trait ComponentHooks {
    /// Runs inside [`Component::enter_document`], after the children have entered and
    /// before READY is dispatched.
    fn before_ready(&self, _component: &Component) {}

    /// Runs at the end of [`Component::exit_document`], after every listener relationship
    /// has been dropped.
    fn after_exit(&self, _component: &Component) {}
}

type DomFactory = Rc<dyn Fn(&Dom) -> ElementId>;

#[derive(Default)]
struct State {
    element: Option<ElementId>,
    target: Option<ElementId>,
    in_document: bool,
    disposed: bool,
    parent: Weak<Inner>,
    children: BTreeMap<String, Component>,
    model: Option<Payload>,
}

struct Inner {
    evt: Evt,
    state: RefCell<State>,
    factory: RefCell<Option<DomFactory>>,
    hooks: RefCell<Option<Rc<dyn ComponentHooks>>>,
}

/// A node in a tree of DOM-backed objects.
///
/// Cheap to clone; clones refer to the same node. See the [crate docs](crate) for the
/// lifecycle.
#[derive(Clone)]
pub struct Component(Rc<Inner>);

/// Non-owning reference to a [`Component`].
#[derive(Clone, Default)]
pub struct WeakComponent(Weak<Inner>);

impl WeakComponent {
    /// The component, if it is still alive.
    pub fn upgrade(&self) -> Option<Component> {
        self.0.upgrade().map(Component)
    }
}

impl core::fmt::Debug for WeakComponent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("WeakComponent")
    }
}

impl core::fmt::Debug for Component {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.0.state.borrow();
        f.debug_struct("Component")
            .field("id", &self.0.evt.id())
            .field("element", &state.element)
            .field("in_document", &state.in_document)
            .field("disposed", &state.disposed)
            .field("children", &state.children.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl Observable for Component {
    fn evt(&self) -> &Evt {
        &self.0.evt
    }
}

impl Component {
    /// A fresh, unrendered node in `runtime`'s document.
    pub fn new(runtime: &Runtime) -> Self {
        Self(Rc::new(Inner {
            evt: Evt::new(runtime.registry(), runtime.dom()),
            state: RefCell::new(State::default()),
            factory: RefCell::new(None),
            hooks: RefCell::new(None),
        }))
    }

    /// A fresh node with lifecycle hooks installed.
    pub fn with_hooks(runtime: &Runtime, hooks: Rc<dyn ComponentHooks>) -> Self {
        let component = Self::new(runtime);
        component.set_hooks(hooks);
        component
    }

    /// Replace the lifecycle hooks.
    pub fn set_hooks(&self, hooks: Rc<dyn ComponentHooks>) {
        *self.0.hooks.borrow_mut() = Some(hooks);
    }

    /// A weak reference to this node.
    pub fn downgrade(&self) -> WeakComponent {
        WeakComponent(Rc::downgrade(&self.0))
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// This node's identity in the listener registry.
    pub fn id(&self) -> ParticipantId {
        self.0.evt.id()
    }

    /// The document this node lives in.
    pub fn dom(&self) -> &Dom {
        self.0.evt.dom()
    }

    /// The shared listener registry.
    pub fn registry(&self) -> &Registry {
        self.0.evt.registry()
    }

    /// The runtime this node belongs to, for creating siblings and children.
    pub fn runtime(&self) -> Runtime {
        Runtime::from_parts(self.dom().clone(), self.registry().clone())
    }

    // --- DOM ---

    /// Install the function that produces this node's root element.
    ///
    /// Only consulted when the element is created, so it has no effect once
    /// [`element`](Self::element) is `Some`.
    pub fn set_dom_factory(&self, factory: impl Fn(&Dom) -> ElementId + 'static) {
        *self.0.factory.borrow_mut() = Some(Rc::new(factory));
    }

    /// Use a parsed fragment's root as this node's element.
    pub fn set_fragment(&self, fragment: Fragment) {
        let html = fragment.html;
        self.set_dom_factory(move |_| html);
    }

    /// Where [`render`](Self::render) attaches the element when it is given no target.
    pub fn set_target(&self, target: ElementId) {
        self.0.state.borrow_mut().target = Some(target);
    }

    /// The root element, or `None` before it has been created.
    pub fn element(&self) -> Option<ElementId> {
        self.0.state.borrow().element
    }

    /// The root element, creating it through the factory if needed.
    pub fn create_dom(&self) -> ElementId {
        if let Some(el) = self.element() {
            return el;
        }
        let factory = self.0.factory.borrow().clone();
        let dom = self.dom();
        let el = match factory {
            Some(factory) => factory(dom),
            None => dom.create_element("div"),
        };
        self.0.state.borrow_mut().element = Some(el);
        el
    }

    // --- lifecycle ---

    /// Whether this node has entered the document.
    pub fn is_in_document(&self) -> bool {
        self.0.state.borrow().in_document
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.0.state.borrow().disposed
    }

    /// Create and attach the element, then enter the document if the parent chain allows.
    ///
    /// The element is attached to `target` if given, else to the target set with
    /// [`set_target`](Self::set_target), else to the document body, and only if it is not
    /// already attached somewhere. If this node has a parent that is not yet in the
    /// document, entering is deferred until the parent enters.
    pub fn render(&self, target: Option<ElementId>) -> Result<(), ComponentError> {
        {
            let state = self.0.state.borrow();
            if state.disposed {
                return Err(ComponentError::Disposed);
            }
            if state.in_document {
                return Err(ComponentError::AlreadyRendered);
            }
        }
        let el = self.create_dom();
        let dom = self.dom();
        if dom.parent_of(el).is_none() {
            let configured = self.0.state.borrow().target;
            let host = target.or(configured).unwrap_or_else(|| dom.body());
            dom.append_child(host, el);
        }
        match self.parent() {
            Some(parent) if !parent.is_in_document() => {
                tracing::trace!(component = ?self.id(), "render deferred until parent enters");
            }
            _ => self.enter_document(),
        }
        Ok(())
    }

    /// Mark this node as in the document, enter eligible children, run
    /// [`ComponentHooks::before_ready`] and dispatch READY.
    ///
    /// Children enter only if they have an element and are not already in the document.
    /// Calling this on a node that is already in the document runs the hook and dispatches
    /// READY again.
    pub fn enter_document(&self) {
        self.0.state.borrow_mut().in_document = true;
        for child in self.children() {
            if child.element().is_some() && !child.is_in_document() {
                child.enter_document();
            }
        }
        if let Some(hooks) = self.hooks() {
            hooks.before_ready(self);
        }
        tracing::trace!(component = ?self.id(), "entered document");
        self.dispatch_comp_event(values::READY, None);
    }

    /// Exit children first, then drop every listener relationship in both directions and
    /// clear the in-document flag.
    pub fn exit_document(&self) {
        for child in self.children() {
            if child.is_in_document() {
                child.exit_document();
            }
        }
        self.0.evt.stop_listening_to_all();
        self.0.evt.stop_being_listened_to();
        self.0.state.borrow_mut().in_document = false;
        if let Some(hooks) = self.hooks() {
            hooks.after_exit(self);
        }
        tracing::trace!(component = ?self.id(), "exited document");
    }

    /// Tear this node down permanently.
    ///
    /// Exits the document if needed, drops every listener relationship, disposes the
    /// children, releases the element and clears the model and the parent link. Disposing
    /// twice is a usage error; the second call logs a warning and returns.
    pub fn dispose(&self) {
        if self.is_disposed() {
            tracing::warn!(component = ?self.id(), "dispose called on a disposed component");
            return;
        }
        if self.is_in_document() {
            self.exit_document();
        }
        self.0.state.borrow_mut().disposed = true;
        self.0.evt.dispose();

        let children = core::mem::take(&mut self.0.state.borrow_mut().children);
        for child in children.into_values() {
            child.0.state.borrow_mut().parent = Weak::new();
            child.dispose();
        }

        let (element, parent) = {
            let mut state = self.0.state.borrow_mut();
            state.model = None;
            (
                state.element.take(),
                core::mem::take(&mut state.parent).upgrade(),
            )
        };
        if let Some(el) = element {
            // Other participants may still hold DOM subscriptions to the freed subtree.
            for freed in self.dom().release(el) {
                self.registry()
                    .drop_target(TargetKey::Dom(DomTarget::Element(freed)));
            }
        }
        if let Some(parent) = parent {
            parent.state.borrow_mut().children.retain(|_, c| !c.ptr_eq(self));
        }
        self.0.factory.borrow_mut().take();
        self.0.hooks.borrow_mut().take();
        tracing::debug!(component = ?self.id(), "disposed");
    }

    fn hooks(&self) -> Option<Rc<dyn ComponentHooks>> {
        self.0.hooks.borrow().clone()
    }

    // --- tree ---

    /// Adopt `child` under `key`, detaching it from any previous parent.
    ///
    /// Returns the child previously stored under `key`, now orphaned. Adopting a node
    /// into itself is ignored. A child in the document exits it when its new parent is not
    /// in the document.
    pub fn add_child(&self, key: impl Into<String>, child: Self) -> Option<Self> {
        if child.ptr_eq(self) {
            return None;
        }
        if let Some(previous) = child.parent() {
            previous.0.state.borrow_mut().children.retain(|_, c| !c.ptr_eq(&child));
        }
        child.0.state.borrow_mut().parent = Rc::downgrade(&self.0);
        let leaves_document = child.is_in_document() && !self.is_in_document();
        let replaced = self
            .0
            .state
            .borrow_mut()
            .children
            .insert(key.into(), child.clone());
        if let Some(old) = &replaced {
            old.0.state.borrow_mut().parent = Weak::new();
        }
        // A node is only in the document while its parent is.
        if leaves_document {
            child.exit_document();
        }
        replaced
    }

    /// Detach the child stored under `key` without disposing it.
    pub fn remove_child(&self, key: &str) -> Option<Self> {
        let child = self.0.state.borrow_mut().children.remove(key)?;
        child.0.state.borrow_mut().parent = Weak::new();
        Some(child)
    }

    /// The child stored under `key`.
    pub fn child(&self, key: &str) -> Option<Self> {
        self.0.state.borrow().children.get(key).cloned()
    }

    /// Child keys, in order.
    pub fn child_keys(&self) -> Vec<String> {
        self.0.state.borrow().children.keys().cloned().collect()
    }

    /// The children, in key order.
    pub fn children(&self) -> Vec<Self> {
        self.0.state.borrow().children.values().cloned().collect()
    }

    /// The parent, if any.
    pub fn parent(&self) -> Option<Self> {
        self.0.state.borrow().parent.upgrade().map(Self)
    }

    // --- model ---

    /// Attach an opaque user payload.
    pub fn set_model(&self, model: Payload) {
        self.0.state.borrow_mut().model = Some(model);
    }

    /// The user payload, if any.
    pub fn model(&self) -> Option<Payload> {
        self.0.state.borrow().model.clone()
    }

    // --- listening ---

    /// Subscribe `handler` to `event_type` events of `target`.
    pub fn listen<T: Observable + ?Sized>(
        &self,
        target: &T,
        event_type: impl Into<EventName>,
        handler: impl Fn(&mut BusEvent) + 'static,
    ) {
        self.0.evt.listen(target, event_type, handler);
    }

    /// Subscribe `handler` to native `kind` events on a DOM target.
    pub fn listen_dom(
        &self,
        target: impl Into<DomTarget>,
        kind: EventKind,
        options: ListenOptions,
        handler: impl Fn(&mut DomEvent) + 'static,
    ) {
        self.0.evt.listen_dom(target, kind, options, handler);
    }

    /// Drop subscriptions to `target`: those for `event_type` if given, otherwise all.
    pub fn stop_listening_to<T: Observable + ?Sized>(
        &self,
        target: &T,
        event_type: Option<&str>,
    ) -> usize {
        self.0.evt.stop_listening_to(target, event_type)
    }

    /// Drop subscriptions to a DOM target: those for `kind` if given, otherwise all.
    pub fn stop_listening_to_dom(
        &self,
        target: impl Into<DomTarget>,
        kind: Option<EventKind>,
    ) -> usize {
        self.0.evt.stop_listening_to_dom(target, kind)
    }

    /// Drop every subscription this node holds.
    pub fn stop_listening_to_all(&self) -> usize {
        self.0.evt.stop_listening_to_all()
    }

    /// Make every observer of this node drop its subscriptions to it.
    pub fn stop_being_listened_to(&self) -> usize {
        self.0.evt.stop_being_listened_to()
    }

    /// Dispatch a component event carrying `(value, payload)`.
    ///
    /// Returns `true` if a handler prevented the default.
    pub fn dispatch_comp_event(
        &self,
        value: impl Into<Cow<'static, str>>,
        payload: Option<Payload>,
    ) -> bool {
        self.0.evt.dispatch_comp_event(value, payload)
    }

    /// Dispatch an arbitrary bus event type carrying `(value, payload)`.
    pub fn dispatch(
        &self,
        event_type: impl Into<EventName>,
        value: impl Into<Cow<'static, str>>,
        payload: Option<Payload>,
    ) -> bool {
        self.0
            .evt
            .dispatch(event_type, zooy_events::CompEventData::new(value, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use zooy_events::event_type;

    #[test]
    fn render_twice_is_an_error() {
        let rt = Runtime::new();
        let c = Component::new(&rt);
        assert_eq!(c.render(None), Ok(()));
        assert_eq!(c.render(None), Err(ComponentError::AlreadyRendered));
    }

    #[test]
    fn render_attaches_to_configured_target_once() {
        let rt = Runtime::new();
        let dom = rt.dom().clone();
        let host = dom.create_element("section");
        dom.append_child(dom.body(), host);

        let c = Component::new(&rt);
        c.set_target(host);
        c.render(None).unwrap();
        let el = c.element().unwrap();
        assert_eq!(dom.parent_of(el), Some(host));

        // Already attached: a later render elsewhere leaves it in place.
        c.exit_document();
        c.render(Some(dom.body())).unwrap();
        assert_eq!(dom.parent_of(el), Some(host));
    }

    #[test]
    fn fragment_root_becomes_the_element() {
        let rt = Runtime::new();
        let html = rt.dom().create_element("article");
        let c = Component::new(&rt);
        c.set_fragment(Fragment { html });
        assert_eq!(c.create_dom(), html);
        // Factory is no longer consulted once the element exists.
        c.set_dom_factory(|dom| dom.create_element("p"));
        assert_eq!(c.create_dom(), html);
    }

    #[test]
    fn hooks_run_around_ready() {
        struct Log(Rc<RefCell<Vec<&'static str>>>);
        impl ComponentHooks for Log {
            fn before_ready(&self, _: &Component) {
                self.0.borrow_mut().push("before_ready");
            }
            fn after_exit(&self, _: &Component) {
                self.0.borrow_mut().push("after_exit");
            }
        }

        let rt = Runtime::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let c = Component::with_hooks(&rt, Rc::new(Log(log.clone())));
        let observer = Component::new(&rt);
        let l = log.clone();
        observer.listen(&c, event_type::COMP, move |ev| {
            if ev.data().value() == values::READY {
                l.borrow_mut().push("ready");
            }
        });
        c.render(None).unwrap();
        c.exit_document();
        assert_eq!(*log.borrow(), ["before_ready", "ready", "after_exit"]);
    }

    #[test]
    fn add_child_reparents() {
        let rt = Runtime::new();
        let a = Component::new(&rt);
        let b = Component::new(&rt);
        let child = Component::new(&rt);
        a.add_child("x", child.clone());
        b.add_child("y", child.clone());
        assert!(a.child("x").is_none());
        assert!(child.parent().unwrap().ptr_eq(&b));
        assert!(a.add_child("self", a.clone()).is_none());
        assert!(a.child_keys().is_empty());
    }

    #[test]
    fn second_dispose_is_ignored() {
        let rt = Runtime::new();
        let c = Component::new(&rt);
        c.render(None).unwrap();
        c.dispose();
        c.dispose();
        assert!(c.is_disposed());
        assert_eq!(c.render(None), Err(ComponentError::Disposed));
    }

    #[test]
    fn prevent_default_is_reported() {
        let rt = Runtime::new();
        let c = Component::new(&rt);
        let o = Component::new(&rt);
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        o.listen(&c, event_type::COMP, move |ev| {
            seen.set(seen.get() + 1);
            if ev.data().value() == "veto" {
                ev.prevent_default();
            }
        });
        assert!(c.dispatch_comp_event("veto", None));
        assert!(!c.dispatch_comp_event("fine", None));
        assert_eq!(calls.get(), 2);
    }
}

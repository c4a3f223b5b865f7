// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use kurbo::Point;
use zooy_component::{Component, ComponentHooks, Runtime, WeakComponent};
use zooy_dom::{DomEvent, DomTarget, ElementId, EventKind, ListenOptions, format_px};
use zooy_events::{Evt, Observable, Payload};

use crate::drag_event;
use crate::gesture::{Axis, DragInfo, Grip};

/// Class present on a dragger's element while it is locked.
pub const LOCKED_CLASS: &str = "locked";

const START_KINDS: [EventKind; 2] = [EventKind::MouseDown, EventKind::TouchStart];
const DOCUMENT_KINDS: [EventKind; 4] = [
    EventKind::MouseMove,
    EventKind::TouchMove,
    EventKind::MouseUp,
    EventKind::TouchEnd,
];

#[derive(Debug)]
struct Active {
    grip: Grip,
    last_client: Point,
}

#[derive(Debug)]
struct DragState {
    axis: Axis,
    handle: Option<ElementId>,
    locked: bool,
    entered: bool,
    /// Unlocked when the last exit happened; re-entry unlocks again.
    resume_unlocked: bool,
    active: Option<Active>,
}

/// A component that can be dragged by a handle.
///
/// Constructed locked. The first time it enters the document it unlocks itself; exiting
/// the document drops its listeners, and entering again restores the unlocked state.
#[derive(Clone, Debug)]
pub struct Dragger {
    component: Component,
    state: Rc<RefCell<DragState>>,
}

struct DraggerHooks(Weak<RefCell<DragState>>);

impl ComponentHooks for DraggerHooks {
    fn before_ready(&self, component: &Component) {
        let Some(state) = self.0.upgrade() else {
            return;
        };
        let unlock = {
            let mut s = state.borrow_mut();
            let first = !s.entered;
            s.entered = true;
            first || s.resume_unlocked
        };
        if unlock {
            Dragger::from_parts(component.clone(), state).unlock();
        }
    }

    fn after_exit(&self, component: &Component) {
        // Exiting already dropped every listener; record that.
        let Some(state) = self.0.upgrade() else {
            return;
        };
        {
            let mut s = state.borrow_mut();
            s.resume_unlocked = !s.locked;
            s.locked = true;
            s.active = None;
        }
        if let Some(el) = component.element() {
            component.dom().add_class(el, LOCKED_CLASS);
        }
    }
}

impl Observable for Dragger {
    fn evt(&self) -> &Evt {
        self.component.evt()
    }
}

impl Dragger {
    /// A locked dragger constrained to `axis`.
    pub fn new(runtime: &Runtime, axis: impl Into<Axis>) -> Self {
        let state = Rc::new(RefCell::new(DragState {
            axis: axis.into(),
            handle: None,
            locked: true,
            entered: false,
            resume_unlocked: false,
            active: None,
        }));
        let hooks = Rc::new(DraggerHooks(Rc::downgrade(&state)));
        let component = Component::with_hooks(runtime, hooks);
        Self { component, state }
    }

    fn from_parts(component: Component, state: Rc<RefCell<DragState>>) -> Self {
        Self { component, state }
    }

    /// The underlying component, for rendering and parenting.
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// The axis constraint.
    pub fn axis(&self) -> Axis {
        self.state.borrow().axis
    }

    /// Change the axis constraint, rebinding listeners if unlocked.
    pub fn set_axis(&self, axis: impl Into<Axis>) {
        let axis = axis.into();
        self.rebind(|s| s.axis = axis);
    }

    /// Drag by `handle` instead of the dragger's own element.
    pub fn set_handle(&self, handle: ElementId) {
        self.rebind(|s| s.handle = Some(handle));
    }

    fn rebind(&self, change: impl FnOnce(&mut DragState)) {
        let was_unlocked = !self.is_locked();
        if was_unlocked {
            self.lock();
        }
        change(&mut self.state.borrow_mut());
        if was_unlocked {
            self.unlock();
        }
    }

    /// The element presses are listened for on.
    pub fn handle(&self) -> Option<ElementId> {
        self.state.borrow().handle.or_else(|| self.component.element())
    }

    /// Whether presses on the handle are ignored.
    pub fn is_locked(&self) -> bool {
        self.state.borrow().locked
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state.borrow().active.is_some()
    }

    /// Start listening for presses on the handle. No-op if already unlocked or if there is
    /// no element yet.
    pub fn unlock(&self) {
        if !self.is_locked() {
            return;
        }
        let Some(handle) = self.handle() else {
            return;
        };
        for kind in START_KINDS {
            let this = self.downgrade();
            self.component
                .listen_dom(handle, kind, ListenOptions::default(), move |ev| {
                    if let Some(this) = this.upgrade() {
                        this.on_start(ev);
                    }
                });
        }
        self.state.borrow_mut().locked = false;
        if let Some(el) = self.component.element() {
            self.component.dom().remove_class(el, LOCKED_CLASS);
        }
        tracing::trace!(dragger = ?self.component.id(), "unlocked");
    }

    /// Stop listening for presses, abandoning any drag in progress. No-op if already
    /// locked.
    pub fn lock(&self) {
        if self.is_locked() {
            return;
        }
        if let Some(handle) = self.handle() {
            for kind in START_KINDS {
                self.component.stop_listening_to_dom(handle, Some(kind));
            }
        }
        self.remove_document_listeners();
        {
            let mut s = self.state.borrow_mut();
            s.locked = true;
            s.active = None;
        }
        if let Some(el) = self.component.element() {
            self.component.dom().add_class(el, LOCKED_CLASS);
        }
        tracing::trace!(dragger = ?self.component.id(), "locked");
    }

    fn downgrade(&self) -> WeakDragger {
        WeakDragger {
            component: self.component.downgrade(),
            state: Rc::downgrade(&self.state),
        }
    }

    fn remove_document_listeners(&self) {
        for kind in DOCUMENT_KINDS {
            self.component
                .stop_listening_to_dom(DomTarget::Document, Some(kind));
        }
    }

    /// Touch events report their position through the first touch point; copy it onto
    /// `client` so every phase reads one field.
    fn normalize(ev: &mut DomEvent) {
        if ev.kind.is_touch()
            && let Some(touch) = ev.first_touch()
        {
            ev.client = touch;
        }
    }

    fn on_start(&self, ev: &mut DomEvent) {
        ev.prevent_default();
        Self::normalize(ev);
        if self.is_dragging() {
            return;
        }
        let Some(target) = self.component.element() else {
            return;
        };
        let dom = self.component.dom();
        let left = dom.style_px(target, "left").unwrap_or(0.0);
        let top = dom.style_px(target, "top").unwrap_or(0.0);
        let grip = Grip::new(target, ev.client, left, top);
        self.state.borrow_mut().active = Some(Active {
            grip,
            last_client: ev.client,
        });

        for kind in DOCUMENT_KINDS {
            let this = self.downgrade();
            let is_end = matches!(kind, EventKind::MouseUp | EventKind::TouchEnd);
            self.component
                .listen_dom(DomTarget::Document, kind, ListenOptions::capture(), move |ev| {
                    if let Some(this) = this.upgrade() {
                        if is_end {
                            this.on_end(ev);
                        } else {
                            this.on_move(ev);
                        }
                    }
                });
        }
        tracing::trace!(
            dragger = ?self.component.id(),
            x = ev.client.x,
            y = ev.client.y,
            "drag start"
        );
        self.emit(drag_event::START, "start", grip.info(ev.client));
    }

    fn on_move(&self, ev: &mut DomEvent) {
        Self::normalize(ev);
        let (grip, axis, client) = {
            let mut s = self.state.borrow_mut();
            let axis = s.axis;
            let Some(active) = s.active.as_mut() else {
                return;
            };
            if !ev.kind.is_touch() || ev.first_touch().is_some() {
                active.last_client = ev.client;
            }
            (active.grip, axis, active.last_client)
        };
        let dom = self.component.dom();
        let (left, top) = grip.position(axis, client);
        if let Some(left) = left {
            dom.set_style(grip.target, "left", &format_px(left));
        }
        if let Some(top) = top {
            dom.set_style(grip.target, "top", &format_px(top));
        }
        self.emit(drag_event::MOVE, "move", grip.info(client));
    }

    fn on_end(&self, ev: &mut DomEvent) {
        Self::normalize(ev);
        self.remove_document_listeners();
        let Some(active) = self.state.borrow_mut().active.take() else {
            return;
        };
        // A touchend has no active touches left; fall back to the last known position.
        let client = if ev.kind.is_touch() && ev.first_touch().is_none() {
            active.last_client
        } else {
            ev.client
        };
        tracing::trace!(dragger = ?self.component.id(), "drag end");
        self.emit(drag_event::END, "end", active.grip.info(client));
    }

    fn emit(&self, event_type: &'static str, value: &'static str, info: DragInfo) {
        let payload: Payload = Rc::new(info);
        self.component.dispatch(event_type, value, Some(payload));
    }
}

struct WeakDragger {
    component: WeakComponent,
    state: Weak<RefCell<DragState>>,
}

impl WeakDragger {
    fn upgrade(&self) -> Option<Dragger> {
        Some(Dragger {
            component: self.component.upgrade()?,
            state: self.state.upgrade()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::Vec2;

    fn pressed(dragger: &Dragger, at: Point) {
        let handle = dragger.handle().unwrap();
        dragger.component().dom().dispatch(
            DomTarget::Element(handle),
            DomEvent::mouse(EventKind::MouseDown, at),
        );
    }

    #[test]
    fn constructed_locked_and_unlocks_on_first_entry() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, "x");
        assert!(d.is_locked());
        d.component().render(None).unwrap();
        assert!(!d.is_locked());
        let el = d.component().element().unwrap();
        assert!(!rt.dom().has_class(el, LOCKED_CLASS));
        assert_eq!(rt.dom().listener_count(DomTarget::Element(el)), 2);
    }

    #[test]
    fn lock_and_unlock_are_idempotent() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, Axis::Free);
        d.component().render(None).unwrap();
        let el = d.component().element().unwrap();
        d.lock();
        d.lock();
        assert!(rt.dom().has_class(el, LOCKED_CLASS));
        assert_eq!(rt.dom().listener_count(DomTarget::Element(el)), 0);
        d.unlock();
        d.unlock();
        assert_eq!(rt.dom().listener_count(DomTarget::Element(el)), 2);
    }

    #[test]
    fn document_listeners_only_during_drag() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, Axis::Free);
        d.component().render(None).unwrap();
        assert_eq!(rt.dom().listener_count(DomTarget::Document), 0);

        pressed(&d, Point::new(5.0, 5.0));
        assert!(d.is_dragging());
        assert_eq!(rt.dom().listener_count(DomTarget::Document), 4);

        rt.dom().dispatch(
            DomTarget::Document,
            DomEvent::mouse(EventKind::MouseUp, Point::new(6.0, 6.0)),
        );
        assert!(!d.is_dragging());
        assert_eq!(rt.dom().listener_count(DomTarget::Document), 0);
    }

    #[test]
    fn start_prevents_default() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, Axis::Free);
        d.component().render(None).unwrap();
        let el = d.component().element().unwrap();
        let ev = rt.dom().dispatch(
            DomTarget::Element(el),
            DomEvent::mouse(EventKind::MouseDown, Point::ZERO),
        );
        assert!(ev.is_default_prevented());
    }

    #[test]
    fn touch_uses_first_touch_point() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, Axis::Y);
        d.component().render(None).unwrap();
        let el = d.component().element().unwrap();
        rt.dom().set_style(el, "top", "20px");

        let infos = Rc::new(RefCell::new(Vec::new()));
        let observer = Component::new(&rt);
        for ty in [drag_event::START, drag_event::MOVE, drag_event::END] {
            let infos = infos.clone();
            observer.listen(&d, ty, move |ev| {
                infos.borrow_mut().push(*ev.data().downcast::<DragInfo>().unwrap());
            });
        }

        rt.dom().dispatch(
            DomTarget::Element(el),
            DomEvent::touch(
                EventKind::TouchStart,
                &[Point::new(3.0, 30.0), Point::new(90.0, 90.0)],
            ),
        );
        rt.dom().dispatch(
            DomTarget::Document,
            DomEvent::touch(EventKind::TouchMove, &[Point::new(3.0, 55.0)]),
        );
        rt.dom().dispatch(DomTarget::Document, DomEvent::touch(EventKind::TouchEnd, &[]));

        assert_eq!(rt.dom().style(el, "top").as_deref(), Some("45px"));
        assert_eq!(rt.dom().style(el, "left"), None);
        let infos = infos.borrow();
        assert_eq!(infos.len(), 3);
        assert_eq!(infos[0].y_org, 10.0);
        assert_eq!(infos[1].delta, Vec2::new(0.0, 25.0));
        // touchend has no touches: the last move position is reported.
        assert_eq!(infos[2].client, Point::new(3.0, 55.0));
    }

    #[test]
    fn reentry_restores_unlocked_state() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, Axis::X);
        d.component().render(None).unwrap();
        d.component().exit_document();
        assert!(d.is_locked());
        d.component().enter_document();
        assert!(!d.is_locked());

        // Locked explicitly before exit: stays locked on re-entry.
        d.lock();
        d.component().exit_document();
        d.component().enter_document();
        assert!(d.is_locked());
    }

    #[test]
    fn set_axis_rebinds_while_unlocked() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, Axis::X);
        d.component().render(None).unwrap();
        d.set_axis("y");
        assert_eq!(d.axis(), Axis::Y);
        assert!(!d.is_locked());
        let el = d.component().element().unwrap();
        pressed(&d, Point::new(0.0, 0.0));
        rt.dom().dispatch(
            DomTarget::Document,
            DomEvent::mouse(EventKind::MouseMove, Point::new(10.0, 10.0)),
        );
        assert_eq!(rt.dom().style(el, "top").as_deref(), Some("10px"));
        assert_eq!(rt.dom().style(el, "left"), None);
    }

    #[test]
    fn separate_handle() {
        let rt = Runtime::new();
        let d = Dragger::new(&rt, Axis::Free);
        let el = d.component().create_dom();
        let grip = rt.dom().create_element("span");
        rt.dom().append_child(el, grip);
        d.set_handle(grip);
        d.component().render(None).unwrap();
        assert_eq!(rt.dom().listener_count(DomTarget::Element(grip)), 2);
        assert_eq!(rt.dom().listener_count(DomTarget::Element(el)), 0);
        pressed(&d, Point::new(1.0, 1.0));
        assert!(d.is_dragging());
    }
}

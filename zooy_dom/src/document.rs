// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document implementation: element arena, listeners, timers and transitions.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::event::DomEvent;
use crate::types::{DomTarget, ElementId, EventKind, ListenOptions, ListenerKey, Phase, TimerId};
use crate::util::parse_px;

type Handler = Rc<dyn Fn(&mut DomEvent)>;

struct Element {
    generation: u32,
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    rect: Rect,
}

impl Element {
    fn new(generation: u32, tag: &str) -> Self {
        Self {
            generation,
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            classes: Vec::new(),
            styles: BTreeMap::new(),
            rect: Rect::ZERO,
        }
    }
}

struct Listener {
    key: ListenerKey,
    target: DomTarget,
    kind: EventKind,
    capture: bool,
    handler: Handler,
}

struct Timer {
    id: TimerId,
    due: u64,
    callback: Box<dyn FnOnce()>,
}

struct Document {
    /// slots
    elements: Vec<Option<Element>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    body: ElementId,
    /// registration order
    listeners: Vec<Listener>,
    next_listener: u64,
    now: u64,
    timers: Vec<Timer>,
    next_timer: u64,
    transitions: Vec<(ElementId, String)>,
}

impl Document {
    fn new() -> Self {
        let mut doc = Self {
            elements: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            body: ElementId::new(0, 1),
            listeners: Vec::new(),
            next_listener: 0,
            now: 0,
            timers: Vec::new(),
            next_timer: 0,
            transitions: Vec::new(),
        };
        doc.body = doc.alloc("body");
        doc
    }

    fn alloc(&mut self, tag: &str) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.elements[idx] = Some(Element::new(generation, tag));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.elements.push(Some(Element::new(generation, tag)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ElementId uses 32-bit indices by design."
            )]
            ((self.elements.len() - 1) as u32, generation)
        };
        ElementId::new(idx, generation)
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements
            .get(id.idx())
            .and_then(|slot| slot.as_ref())
            .filter(|el| el.generation == id.1)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements
            .get_mut(id.idx())
            .and_then(|slot| slot.as_mut())
            .filter(|el| el.generation == id.1)
    }

    fn unlink(&mut self, child: ElementId) {
        let Some(parent) = self.get(child).and_then(|el| el.parent) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = None;
        }
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    fn is_inclusive_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.get(c).and_then(|el| el.parent);
        }
        false
    }

    /// Root → target path, with the document prepended when the target is connected.
    fn propagation_path(&self, target: DomTarget) -> Vec<DomTarget> {
        let DomTarget::Element(id) = target else {
            return alloc::vec![DomTarget::Document];
        };
        let mut path = alloc::vec![DomTarget::Element(id)];
        let mut top = id;
        while let Some(parent) = self.get(top).and_then(|el| el.parent) {
            path.push(DomTarget::Element(parent));
            top = parent;
        }
        if top == self.body {
            path.push(DomTarget::Document);
        }
        path.reverse();
        path
    }

    fn matching_listeners(
        &self,
        current: DomTarget,
        kind: EventKind,
        phase: Phase,
    ) -> Vec<ListenerKey> {
        self.listeners
            .iter()
            .filter(|l| l.target == current && l.kind == kind)
            .filter(|l| match phase {
                Phase::Capture => l.capture,
                Phase::Target => true,
                Phase::Bubble => !l.capture,
            })
            .map(|l| l.key)
            .collect()
    }

    fn handler(&self, key: ListenerKey) -> Option<Handler> {
        self.listeners
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.handler.clone())
    }
}

/// Shared handle to a document.
///
/// Cloning is cheap; all clones refer to the same document.
#[derive(Clone)]
pub struct Dom(Rc<RefCell<Document>>);

/// Non-owning handle to a document, for use inside listeners and timers.
#[derive(Clone, Default)]
pub struct WeakDom(Weak<RefCell<Document>>);

impl core::fmt::Debug for Dom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let doc = self.0.borrow();
        let alive = doc.elements.iter().filter(|e| e.is_some()).count();
        f.debug_struct("Dom")
            .field("elements_alive", &alive)
            .field("listeners", &doc.listeners.len())
            .field("timers", &doc.timers.len())
            .field("now", &doc.now)
            .finish_non_exhaustive()
    }
}

impl core::fmt::Debug for WeakDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("WeakDom")
            .field(&(self.0.strong_count() > 0))
            .finish()
    }
}

impl WeakDom {
    /// Upgrade to a strong handle if the document is still alive.
    pub fn upgrade(&self) -> Option<Dom> {
        self.0.upgrade().map(Dom)
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create an empty document with a `body` element.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Document::new())))
    }

    /// A non-owning handle to this document.
    pub fn downgrade(&self) -> WeakDom {
        WeakDom(Rc::downgrade(&self.0))
    }

    /// True if both handles refer to the same document.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // --- elements ---

    /// The document body. It can never be released.
    pub fn body(&self) -> ElementId {
        self.0.borrow().body
    }

    /// Create a detached element.
    pub fn create_element(&self, tag: &str) -> ElementId {
        self.0.borrow_mut().alloc(tag)
    }

    /// Returns true if `id` refers to a live element.
    pub fn is_alive(&self, id: ElementId) -> bool {
        self.0.borrow().get(id).is_some()
    }

    /// Tag name of a live element.
    pub fn tag(&self, id: ElementId) -> Option<String> {
        self.0.borrow().get(id).map(|el| el.tag.clone())
    }

    /// Parent of a live element, or `None` for detached elements and stale ids.
    pub fn parent_of(&self, id: ElementId) -> Option<ElementId> {
        self.0.borrow().get(id).and_then(|el| el.parent)
    }

    /// Children of a live element, in document order.
    pub fn children_of(&self, id: ElementId) -> Vec<ElementId> {
        self.0
            .borrow()
            .get(id)
            .map(|el| el.children.clone())
            .unwrap_or_default()
    }

    /// True if the element's ancestor chain reaches the body.
    pub fn is_connected(&self, id: ElementId) -> bool {
        let doc = self.0.borrow();
        doc.get(id).is_some() && doc.is_inclusive_ancestor(doc.body, id)
    }

    /// Append `child` as the last child of `parent`, moving it if it is attached elsewhere.
    ///
    /// Returns `false` (and does nothing) for stale ids or if the move would create a cycle.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> bool {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or last when `reference` is `None`
    /// or not a child of `parent`.
    pub fn insert_before(
        &self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) -> bool {
        let mut doc = self.0.borrow_mut();
        if doc.get(parent).is_none() || doc.get(child).is_none() {
            return false;
        }
        if doc.is_inclusive_ancestor(child, parent) {
            return false;
        }
        doc.unlink(child);
        if let Some(p) = doc.get_mut(parent) {
            let at = reference
                .and_then(|r| p.children.iter().position(|c| *c == r))
                .unwrap_or(p.children.len());
            p.children.insert(at, child);
        }
        if let Some(c) = doc.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Detach an element from its parent. The element stays alive.
    pub fn detach(&self, id: ElementId) -> bool {
        let mut doc = self.0.borrow_mut();
        let attached = doc.get(id).is_some_and(|el| el.parent.is_some());
        doc.unlink(id);
        attached
    }

    /// Detach and free an element and its subtree.
    ///
    /// Listeners and running transitions on freed elements are dropped. Returns the freed
    /// ids, root first. Releasing the body or a stale id is a no-op.
    pub fn release(&self, id: ElementId) -> Vec<ElementId> {
        let mut doc = self.0.borrow_mut();
        if id == doc.body || doc.get(id).is_none() {
            return Vec::new();
        }
        doc.unlink(id);
        let mut stack = alloc::vec![id];
        let mut freed = Vec::new();
        while let Some(current) = stack.pop() {
            if let Some(el) = doc.elements[current.idx()].take() {
                stack.extend(el.children);
                doc.free_list.push(current.idx());
                freed.push(current);
            }
        }
        doc.listeners
            .retain(|l| !matches!(l.target, DomTarget::Element(e) if freed.contains(&e)));
        doc.transitions.retain(|(e, _)| !freed.contains(e));
        tracing::trace!(element = ?id, freed = freed.len(), "released element subtree");
        freed
    }

    // --- classes ---

    /// Add a class. Duplicate classes are ignored.
    pub fn add_class(&self, id: ElementId, class: &str) {
        if let Some(el) = self.0.borrow_mut().get_mut(id)
            && !el.classes.iter().any(|c| c == class)
        {
            el.classes.push(class.to_string());
        }
    }

    /// Remove a class.
    pub fn remove_class(&self, id: ElementId, class: &str) {
        if let Some(el) = self.0.borrow_mut().get_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    /// Add or remove a class depending on `on`.
    pub fn set_class(&self, id: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Whether a live element carries `class`.
    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.0
            .borrow()
            .get(id)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    /// All classes of a live element, in insertion order.
    pub fn classes(&self, id: ElementId) -> Vec<String> {
        self.0
            .borrow()
            .get(id)
            .map(|el| el.classes.clone())
            .unwrap_or_default()
    }

    // --- inline style ---

    /// Set an inline style property.
    pub fn set_style(&self, id: ElementId, property: &str, value: &str) {
        if let Some(el) = self.0.borrow_mut().get_mut(id) {
            el.styles.insert(property.to_string(), value.to_string());
        }
    }

    /// Read an inline style property.
    pub fn style(&self, id: ElementId, property: &str) -> Option<String> {
        self.0
            .borrow()
            .get(id)
            .and_then(|el| el.styles.get(property).cloned())
    }

    /// Read an inline style property as pixels.
    pub fn style_px(&self, id: ElementId, property: &str) -> Option<f64> {
        self.style(id, property).as_deref().and_then(parse_px)
    }

    /// Remove an inline style property.
    pub fn remove_style(&self, id: ElementId, property: &str) {
        if let Some(el) = self.0.borrow_mut().get_mut(id) {
            el.styles.remove(property);
        }
    }

    // --- geometry ---

    /// Set the bounding client rectangle, as computed by the host's layout.
    pub fn set_rect(&self, id: ElementId, rect: Rect) {
        if let Some(el) = self.0.borrow_mut().get_mut(id) {
            el.rect = rect;
        }
    }

    /// Bounding client rectangle of a live element.
    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.0.borrow().get(id).map(|el| el.rect)
    }

    // --- listeners ---

    /// Register a listener on `target` for events of `kind`.
    ///
    /// Listeners on a stale element are still registered but can never fire.
    pub fn add_listener(
        &self,
        target: DomTarget,
        kind: EventKind,
        options: ListenOptions,
        handler: impl Fn(&mut DomEvent) + 'static,
    ) -> ListenerKey {
        let mut doc = self.0.borrow_mut();
        doc.next_listener += 1;
        let key = ListenerKey(doc.next_listener);
        doc.listeners.push(Listener {
            key,
            target,
            kind,
            capture: options.capture,
            handler: Rc::new(handler),
        });
        key
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn remove_listener(&self, key: ListenerKey) -> bool {
        let mut doc = self.0.borrow_mut();
        let before = doc.listeners.len();
        doc.listeners.retain(|l| l.key != key);
        doc.listeners.len() != before
    }

    /// Number of listeners registered on `target`.
    pub fn listener_count(&self, target: DomTarget) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target == target)
            .count()
    }

    /// Number of listeners registered on `target` for `kind`.
    pub fn listener_count_for(&self, target: DomTarget, kind: EventKind) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .count()
    }

    /// Dispatch `event` to `target` and return it after propagation.
    ///
    /// The propagation path runs from the document (only when the target is connected)
    /// down through the target's ancestors. Capture listeners run top-down, then every
    /// listener on the target, then bubble listeners bottom-up. A listener removed during
    /// dispatch does not run if it has not run yet.
    pub fn dispatch(&self, target: DomTarget, mut event: DomEvent) -> DomEvent {
        event.target = target;
        let path = self.0.borrow().propagation_path(target);
        let Some((last, ancestors)) = path.split_last() else {
            return event;
        };
        for current in ancestors {
            if self.invoke(*current, Phase::Capture, &mut event) {
                return event;
            }
        }
        if self.invoke(*last, Phase::Target, &mut event) {
            return event;
        }
        for current in ancestors.iter().rev() {
            if self.invoke(*current, Phase::Bubble, &mut event) {
                return event;
            }
        }
        event
    }

    /// Run the listeners of one propagation step. Returns true if propagation stopped.
    fn invoke(&self, current: DomTarget, phase: Phase, event: &mut DomEvent) -> bool {
        let keys = self
            .0
            .borrow()
            .matching_listeners(current, event.kind, phase);
        event.phase = phase;
        event.current_target = current;
        for key in keys {
            let handler = self.0.borrow().handler(key);
            if let Some(handler) = handler {
                handler(event);
            }
        }
        event.propagation_stopped
    }

    // --- timers ---

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.0.borrow().now
    }

    /// Run `callback` once, `delay_ms` after the current virtual time.
    pub fn set_timeout(&self, delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerId {
        let mut doc = self.0.borrow_mut();
        doc.next_timer += 1;
        let id = TimerId(doc.next_timer);
        let due = doc.now.saturating_add(delay_ms);
        doc.timers.push(Timer {
            id,
            due,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a pending timer. Returns `false` if it already ran or was cancelled.
    pub fn clear_timeout(&self, id: TimerId) -> bool {
        let mut doc = self.0.borrow_mut();
        let before = doc.timers.len();
        doc.timers.retain(|t| t.id != id);
        doc.timers.len() != before
    }

    /// Number of timers waiting to run.
    pub fn pending_timers(&self) -> usize {
        self.0.borrow().timers.len()
    }

    /// Advance virtual time by `ms`, running every timer that falls due, in due order.
    ///
    /// Timers scheduled by a running callback also run if they fall due within the window.
    pub fn advance(&self, ms: u64) {
        let until = self.0.borrow().now.saturating_add(ms);
        loop {
            let next = {
                let mut doc = self.0.borrow_mut();
                let pos = doc
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= until)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                pos.map(|i| {
                    let timer = doc.timers.remove(i);
                    doc.now = timer.due;
                    timer
                })
            };
            match next {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.0.borrow_mut().now = until;
    }

    // --- transitions ---

    /// Record that `property` started transitioning on `id`.
    ///
    /// A transition already running for the same element and property is replaced.
    pub fn start_transition(&self, id: ElementId, property: &str) {
        let mut doc = self.0.borrow_mut();
        if doc.get(id).is_none() {
            return;
        }
        doc.transitions
            .retain(|(e, p)| !(*e == id && p == property));
        doc.transitions.push((id, property.to_string()));
    }

    /// Running transitions, oldest first.
    pub fn pending_transitions(&self) -> Vec<(ElementId, String)> {
        self.0.borrow().transitions.clone()
    }

    /// Drop the running transitions of `id` without firing `transitionend`.
    pub fn cancel_transitions(&self, id: ElementId) {
        self.0.borrow_mut().transitions.retain(|(e, _)| *e != id);
    }

    /// Complete every running transition by dispatching `transitionend` to its element.
    ///
    /// Returns the number of events fired.
    pub fn finish_transitions(&self) -> usize {
        let finished = core::mem::take(&mut self.0.borrow_mut().transitions);
        let mut fired = 0;
        for (id, property) in finished {
            if self.is_alive(id) {
                self.dispatch(DomTarget::Element(id), DomEvent::transition_end(property));
                fired += 1;
            }
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::Cell;
    use kurbo::Point;

    fn log_listener(
        dom: &Dom,
        log: &Rc<RefCell<Vec<(&'static str, Phase)>>>,
        target: DomTarget,
        name: &'static str,
        capture: bool,
    ) {
        let log = log.clone();
        dom.add_listener(
            target,
            EventKind::Click,
            ListenOptions { capture },
            move |ev| log.borrow_mut().push((name, ev.phase())),
        );
    }

    #[test]
    fn insert_release_reuse() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        assert!(dom.is_alive(a));
        dom.release(a);
        assert!(!dom.is_alive(a));
        let b = dom.create_element("div");
        // Slot reused with a newer generation.
        assert_eq!(a.0, b.0);
        assert_ne!(a, b);
        assert!(!dom.is_alive(a));
        assert!(dom.is_alive(b));
    }

    #[test]
    fn release_reports_the_freed_subtree() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        let child = dom.create_element("span");
        dom.append_child(a, child);
        assert_eq!(dom.release(a), [a, child]);
        assert!(!dom.is_alive(child));
        assert!(dom.release(a).is_empty());
        assert!(dom.release(dom.body()).is_empty());
    }

    #[test]
    fn append_moves_and_rejects_cycles() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        assert!(dom.append_child(dom.body(), a));
        assert!(dom.append_child(a, b));
        assert!(!dom.append_child(b, a), "cycle must be rejected");
        assert!(dom.append_child(dom.body(), b));
        assert_eq!(dom.children_of(dom.body()), vec![a, b]);
        assert!(dom.children_of(a).is_empty());
        assert!(dom.is_connected(b));
        dom.detach(a);
        assert!(!dom.is_connected(a));
    }

    #[test]
    fn insert_before_keeps_order() {
        let dom = Dom::new();
        let p = dom.create_element("div");
        let a = dom.create_element("a");
        let c = dom.create_element("c");
        let b = dom.create_element("b");
        dom.append_child(p, a);
        dom.append_child(p, c);
        dom.insert_before(p, b, Some(c));
        assert_eq!(dom.children_of(p), vec![a, b, c]);
    }

    #[test]
    fn release_drops_subtree_and_listeners() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        dom.append_child(dom.body(), a);
        dom.append_child(a, b);
        dom.add_listener(DomTarget::Element(b), EventKind::Click, ListenOptions::default(), |_| {});
        dom.start_transition(b, "flex-basis");
        dom.release(a);
        assert!(!dom.is_alive(b));
        assert_eq!(dom.listener_count(DomTarget::Element(b)), 0);
        assert!(dom.pending_transitions().is_empty());
        assert!(dom.children_of(dom.body()).is_empty());
    }

    #[test]
    fn capture_target_bubble_order() {
        let dom = Dom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("div");
        dom.append_child(dom.body(), outer);
        dom.append_child(outer, inner);

        let log = Rc::new(RefCell::new(Vec::new()));
        log_listener(&dom, &log, DomTarget::Document, "doc-bubble", false);
        log_listener(&dom, &log, DomTarget::Document, "doc-capture", true);
        log_listener(&dom, &log, DomTarget::Element(outer), "outer-bubble", false);
        log_listener(&dom, &log, DomTarget::Element(outer), "outer-capture", true);
        log_listener(&dom, &log, DomTarget::Element(inner), "inner", false);

        dom.dispatch(DomTarget::Element(inner), DomEvent::new(EventKind::Click));
        assert_eq!(
            *log.borrow(),
            vec![
                ("doc-capture", Phase::Capture),
                ("outer-capture", Phase::Capture),
                ("inner", Phase::Target),
                ("outer-bubble", Phase::Bubble),
                ("doc-bubble", Phase::Bubble),
            ]
        );
    }

    #[test]
    fn detached_targets_skip_document() {
        let dom = Dom::new();
        let lone = dom.create_element("div");
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        dom.add_listener(DomTarget::Document, EventKind::Click, ListenOptions::capture(), move |_| {
            seen.set(seen.get() + 1);
        });
        dom.dispatch(DomTarget::Element(lone), DomEvent::new(EventKind::Click));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn stop_propagation_and_prevent_default() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        dom.append_child(dom.body(), a);
        let bubbled = Rc::new(Cell::new(false));
        let seen = bubbled.clone();
        dom.add_listener(
            DomTarget::Element(a),
            EventKind::MouseDown,
            ListenOptions::default(),
            |ev| {
                ev.prevent_default();
                ev.stop_propagation();
            },
        );
        dom.add_listener(
            DomTarget::Document,
            EventKind::MouseDown,
            ListenOptions::default(),
            move |_| seen.set(true),
        );
        let ev = dom.dispatch(
            DomTarget::Element(a),
            DomEvent::mouse(EventKind::MouseDown, Point::new(1.0, 1.0)),
        );
        assert!(ev.is_default_prevented());
        assert!(!bubbled.get());
    }

    #[test]
    fn listener_removed_mid_dispatch_does_not_run() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        let ran = Rc::new(Cell::new(false));
        let second_key = Rc::new(Cell::new(None));
        let dom2 = dom.clone();
        let key_slot = second_key.clone();
        dom.add_listener(
            DomTarget::Element(a),
            EventKind::Click,
            ListenOptions::default(),
            move |_| {
                if let Some(k) = key_slot.get() {
                    dom2.remove_listener(k);
                }
            },
        );
        let seen = ran.clone();
        let k = dom.add_listener(
            DomTarget::Element(a),
            EventKind::Click,
            ListenOptions::default(),
            move |_| seen.set(true),
        );
        second_key.set(Some(k));
        dom.dispatch(DomTarget::Element(a), DomEvent::new(EventKind::Click));
        assert!(!ran.get());
    }

    #[test]
    fn timers_run_in_due_order() {
        let dom = Dom::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        dom.set_timeout(50, move || l1.borrow_mut().push(50));
        dom.set_timeout(10, move || l2.borrow_mut().push(10));
        let cancelled = dom.set_timeout(20, move || l3.borrow_mut().push(20));
        assert!(dom.clear_timeout(cancelled));
        dom.advance(30);
        assert_eq!(*log.borrow(), vec![10]);
        assert_eq!(dom.now(), 30);
        dom.advance(30);
        assert_eq!(*log.borrow(), vec![10, 50]);
        assert_eq!(dom.pending_timers(), 0);
    }

    #[test]
    fn nested_timers_within_window_run() {
        let dom = Dom::new();
        let hits = Rc::new(Cell::new(0));
        let dom2 = dom.clone();
        let seen = hits.clone();
        dom.set_timeout(5, move || {
            let seen = seen.clone();
            dom2.set_timeout(5, move || seen.set(seen.get() + 1));
        });
        dom.advance(10);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn finish_transitions_fires_transitionend() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        dom.append_child(dom.body(), a);
        let prop = Rc::new(RefCell::new(None));
        let seen = prop.clone();
        dom.add_listener(
            DomTarget::Element(a),
            EventKind::TransitionEnd,
            ListenOptions::default(),
            move |ev| *seen.borrow_mut() = ev.property_name.clone(),
        );
        dom.start_transition(a, "flex-basis");
        dom.start_transition(a, "flex-basis");
        assert_eq!(dom.pending_transitions().len(), 1);
        assert_eq!(dom.finish_transitions(), 1);
        assert_eq!(prop.borrow().as_deref(), Some("flex-basis"));
        assert_eq!(dom.finish_transitions(), 0);
    }

    #[test]
    fn styles_and_classes() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        dom.add_class(a, "nest");
        dom.add_class(a, "nest");
        dom.set_class(a, "locked", true);
        assert_eq!(dom.classes(a), vec!["nest".to_string(), "locked".to_string()]);
        dom.set_class(a, "locked", false);
        assert!(!dom.has_class(a, "locked"));
        dom.set_style(a, "left", "12px");
        assert_eq!(dom.style_px(a, "left"), Some(12.0));
        dom.remove_style(a, "left");
        assert_eq!(dom.style(a, "left"), None);
    }
}

// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::rc::{Rc, Weak};
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use zooy_component::{Component, ComponentHooks, Runtime, WeakComponent};
use zooy_dom::{DomTarget, ElementId, EventKind, ListenOptions, TimerId, format_px};
use zooy_drag::{DragInfo, Dragger, drag_event};
use zooy_events::{Evt, Observable, Payload};

use crate::config::SplitConfig;
use crate::error::SplitError;
use crate::nest::{DividerState, Nest, Orientation, Side};
use crate::{split_event, values};

/// Class of every split container.
pub const SPLIT_CLASS: &str = "zsplit";
/// Class of every nest element.
pub const NEST_CLASS: &str = "nest";
/// Class of every divider element.
pub const DIVIDER_CLASS: &str = "divider";
/// Class of the click target inside a divider.
pub const GRABBER_CLASS: &str = "grabber";
/// Class present on a nest while an animated resize runs.
pub const ANIMATED_CLASS: &str = "animated";

const BASIS: &str = "flex-basis";

/// Make `dragger` follow the `LOCKED` bit. Dividers outside the document are left alone
/// and synced when the split enters.
fn apply_lock(dragger: &Dragger, state: DividerState) {
    if !dragger.component().is_in_document() {
        return;
    }
    if state.contains(DividerState::LOCKED) {
        dragger.lock();
    } else {
        dragger.unlock();
    }
}

type Callback = Box<dyn FnOnce()>;

struct Entry {
    nest: Nest,
    orientation: Orientation,
    dragger: Option<Dragger>,
    grabber: Option<ElementId>,
    /// The B sibling; its extent is part of the drag range.
    flank: Option<String>,
    /// The other resizable sibling.
    other: Option<String>,
}

struct DragSession {
    name: String,
    start: f64,
    max: f64,
}

struct Pending {
    token: u64,
    timer: Option<TimerId>,
    callback: Callback,
}

struct SplitState {
    config: SplitConfig,
    nests: BTreeMap<String, Entry>,
    split_elements: BTreeSet<ElementId>,
    pending: BTreeMap<String, Pending>,
    delayed: BTreeMap<String, TimerId>,
    drag: Option<DragSession>,
    next_token: u64,
}

/// Recursively partitions a container into resizable named regions.
///
/// Every [`add_split`](Self::add_split) turns one container (the split's own element, or an
/// existing nest) into three nests `A`, `B`, `C` separated by two [`Dragger`] dividers.
/// Dragging a divider resizes the outer nest it belongs to; `B` takes the rest.
///
/// Nest operations (`open`, `close`, `toggle`, `resize`, ...) address nests by name and
/// report unknown names as [`SplitError::UnknownNest`]. On a `B` nest they succeed without
/// doing anything.
///
/// State transitions are announced as [`split_event::SPLIT`] events whose envelope value is
/// one of [`values`] and whose payload is the affected [`Nest`].
#[derive(Clone)]
pub struct Split {
    component: Component,
    state: Rc<RefCell<SplitState>>,
}

impl core::fmt::Debug for Split {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Split")
            .field("component", &self.component)
            .field("nests", &state.nests.keys().collect::<Vec<_>>())
            .field("pending", &state.pending.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

struct WeakSplit {
    component: WeakComponent,
    state: Weak<RefCell<SplitState>>,
}

impl WeakSplit {
    fn upgrade(&self) -> Option<Split> {
        Some(Split {
            component: self.component.upgrade()?,
            state: self.state.upgrade()?,
        })
    }
}

struct SplitHooks(Weak<RefCell<SplitState>>);

impl ComponentHooks for SplitHooks {
    fn before_ready(&self, component: &Component) {
        // Exiting dropped the divider wiring; rebuild it. The dividers entered first and
        // picked their own lock state, which the nest record overrides.
        if let Some(state) = self.0.upgrade() {
            let split = Split {
                component: component.clone(),
                state,
            };
            for name in split.resizable_names() {
                split.wire(&name);
                split.sync_lock(&name);
            }
        }
    }
}

impl Observable for Split {
    fn evt(&self) -> &Evt {
        self.component.evt()
    }
}

impl Split {
    /// An empty split with default timing.
    pub fn new(runtime: &Runtime) -> Self {
        Self::with_config(runtime, SplitConfig::default())
    }

    /// An empty split with the given timing.
    pub fn with_config(runtime: &Runtime, config: SplitConfig) -> Self {
        let state = Rc::new(RefCell::new(SplitState {
            config,
            nests: BTreeMap::new(),
            split_elements: BTreeSet::new(),
            pending: BTreeMap::new(),
            delayed: BTreeMap::new(),
            drag: None,
            next_token: 0,
        }));
        let component =
            Component::with_hooks(runtime, Rc::new(SplitHooks(Rc::downgrade(&state))));
        Self { component, state }
    }

    /// The root component. Render it to put the split in the document.
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// Timing configuration.
    pub fn config(&self) -> SplitConfig {
        self.state.borrow().config
    }

    fn downgrade(&self) -> WeakSplit {
        WeakSplit {
            component: self.component.downgrade(),
            state: Rc::downgrade(&self.state),
        }
    }

    // --- queries ---

    /// A snapshot of the nest called `name`.
    pub fn nest(&self, name: &str) -> Option<Nest> {
        self.state.borrow().nests.get(name).map(|e| e.nest.clone())
    }

    fn require(&self, name: &str) -> Result<Nest, SplitError> {
        self.nest(name)
            .ok_or_else(|| SplitError::UnknownNest(String::from(name)))
    }

    /// Names of the nests that have not been split further, in order.
    pub fn nest_names(&self) -> Vec<String> {
        let s = self.state.borrow();
        s.nests
            .iter()
            .filter(|(_, e)| !s.split_elements.contains(&e.nest.element))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names of every nest, split or not, in order.
    pub fn all_nest_names(&self) -> Vec<String> {
        self.state.borrow().nests.keys().cloned().collect()
    }

    /// Nests with an animated resize waiting for completion.
    pub fn pending_resizes(&self) -> Vec<String> {
        self.state.borrow().pending.keys().cloned().collect()
    }

    /// The divider component of `name`, if it has one.
    pub fn dragger(&self, name: &str) -> Option<Dragger> {
        self.state
            .borrow()
            .nests
            .get(name)
            .and_then(|e| e.dragger.clone())
    }

    fn resizable_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .nests
            .iter()
            .filter(|(_, e)| e.nest.can_resize)
            .map(|(name, _)| name.clone())
            .collect()
    }

    // --- building ---

    /// Split `container` (the split's own element when `None`) into three nests.
    ///
    /// Children are inserted in the order A, divider, B, divider, C. A and C start at
    /// `size_a` and `size_c`; B takes the remaining space. `extra_classes` are added to each
    /// new nest element. Returns the three new names, which are `container`'s name followed
    /// by `A`, `B` and `C`.
    ///
    /// Fails without changing anything if the container was already split or is not one
    /// of this split's nests.
    pub fn add_split(
        &self,
        container: Option<&str>,
        orientation: Orientation,
        size_a: f64,
        size_c: f64,
        extra_classes: &[&str],
    ) -> Result<[String; 3], SplitError> {
        let (host, prefix) = match container {
            None => (self.component.create_dom(), String::new()),
            Some(name) => (self.require(name)?.element, String::from(name)),
        };
        if self.state.borrow().split_elements.contains(&host) {
            return Err(SplitError::AlreadySplit);
        }

        let dom = self.component.dom();
        let runtime = self.component.runtime();
        dom.add_class(host, SPLIT_CLASS);
        dom.add_class(host, orientation.class());

        let names = [Side::A, Side::B, Side::C].map(|side| format!("{prefix}{}", side.letter()));
        let region = |side: Side| {
            let el = dom.create_element("div");
            dom.add_class(el, NEST_CLASS);
            dom.add_class(el, &format!("{NEST_CLASS}-{}", side.letter()));
            for class in extra_classes {
                dom.add_class(el, class);
            }
            el
        };
        let (a, b, c) = (region(Side::A), region(Side::B), region(Side::C));
        let divider_ab = Dragger::new(&runtime, orientation.axis());
        let divider_bc = Dragger::new(&runtime, orientation.axis());
        let (ab, grabber_ab) = self.build_divider(&divider_ab, orientation);
        let (bc, grabber_bc) = self.build_divider(&divider_bc, orientation);
        for el in [a, ab, b, bc, c] {
            dom.append_child(host, el);
        }
        dom.set_style(a, BASIS, &format_px(size_a));
        dom.set_style(c, BASIS, &format_px(size_c));

        let outer = |side: Side, element, divider, size, dragger, grabber, other: &String| Entry {
            nest: Nest {
                name: names[side as usize].clone(),
                side,
                element,
                divider: Some(divider),
                default_size: size,
                current_size: size,
                last_size: None,
                can_resize: true,
                state: DividerState::empty(),
            },
            orientation,
            dragger: Some(dragger),
            grabber: Some(grabber),
            flank: Some(names[1].clone()),
            other: Some(other.clone()),
        };
        let middle = Entry {
            nest: Nest {
                name: names[1].clone(),
                side: Side::B,
                element: b,
                divider: None,
                default_size: 0.0,
                current_size: 0.0,
                last_size: None,
                can_resize: false,
                state: DividerState::empty(),
            },
            orientation,
            dragger: None,
            grabber: None,
            flank: None,
            other: None,
        };
        {
            let mut s = self.state.borrow_mut();
            s.split_elements.insert(host);
            let entry_a = outer(Side::A, a, ab, size_a, divider_ab.clone(), grabber_ab, &names[2]);
            let entry_c = outer(Side::C, c, bc, size_c, divider_bc.clone(), grabber_bc, &names[0]);
            s.nests.insert(names[0].clone(), entry_a);
            s.nests.insert(names[1].clone(), middle);
            s.nests.insert(names[2].clone(), entry_c);
        }

        for (name, dragger) in [(&names[0], &divider_ab), (&names[2], &divider_bc)] {
            self.component
                .add_child(format!("divider-{name}"), dragger.component().clone());
            // Already attached; enters now or together with the split.
            dragger.component().render(None)?;
        }
        if self.component.is_in_document() {
            self.wire(&names[0]);
            self.wire(&names[2]);
        }
        tracing::debug!(container = %prefix, ?orientation, size_a, size_c, "split added");
        Ok(names)
    }

    fn build_divider(&self, dragger: &Dragger, orientation: Orientation) -> (ElementId, ElementId) {
        let dom = self.component.dom();
        let el = dragger.component().create_dom();
        dom.add_class(el, DIVIDER_CLASS);
        dom.add_class(
            el,
            match orientation {
                Orientation::EW => "divider-ew",
                Orientation::NS => "divider-ns",
            },
        );
        let grabber = dom.create_element("div");
        dom.add_class(grabber, GRABBER_CLASS);
        dom.append_child(el, grabber);
        (el, grabber)
    }

    /// Connect a resizable nest's divider, grabber and transition listeners.
    fn wire(&self, name: &str) {
        let (dragger, divider, grabber, element) = {
            let s = self.state.borrow();
            let Some(entry) = s.nests.get(name) else {
                return;
            };
            let (Some(dragger), Some(divider), Some(grabber)) =
                (entry.dragger.clone(), entry.nest.divider, entry.grabber)
            else {
                return;
            };
            (dragger, divider, grabber, entry.nest.element)
        };
        let c = &self.component;
        c.stop_listening_to(&dragger, None);
        c.stop_listening_to_dom(divider, Some(EventKind::DblClick));
        c.stop_listening_to_dom(grabber, Some(EventKind::Click));
        c.stop_listening_to_dom(element, Some(EventKind::TransitionEnd));

        let on_drag = |event_type: &'static str, handler: fn(&Self, &str, &DragInfo)| {
            let this = self.downgrade();
            let name = String::from(name);
            c.listen(&dragger, event_type, move |ev| {
                if let (Some(this), Some(info)) = (this.upgrade(), ev.data().downcast::<DragInfo>())
                {
                    handler(&this, &name, info);
                }
            });
        };
        on_drag(drag_event::START, Self::on_drag_start);
        on_drag(drag_event::MOVE, Self::on_drag_move);
        on_drag(drag_event::END, Self::on_drag_end);

        for (target, kind) in [(divider, EventKind::DblClick), (grabber, EventKind::Click)] {
            let this = self.downgrade();
            let name = String::from(name);
            c.listen_dom(target, kind, ListenOptions::default(), move |_| {
                if let Some(this) = this.upgrade()
                    && let Err(err) = this.toggle(&name)
                {
                    tracing::warn!(%err, "toggle from divider failed");
                }
            });
        }

        let this = self.downgrade();
        let owned = String::from(name);
        c.listen_dom(
            element,
            EventKind::TransitionEnd,
            ListenOptions::default(),
            move |ev| {
                // Nested nests bubble their own transitions through this element.
                if ev.target() != DomTarget::Element(element)
                    || ev.property_name.as_deref() != Some(BASIS)
                {
                    return;
                }
                if let Some(this) = this.upgrade() {
                    this.complete(&owned, None);
                }
            },
        );
    }

    // --- dragging ---

    fn on_drag_start(&self, name: &str, _info: &DragInfo) {
        let dom = self.component.dom();
        let (start, max, other) = {
            let s = self.state.borrow();
            let Some(entry) = s.nests.get(name) else {
                return;
            };
            let extent = |el: ElementId| dom.rect(el).map(|r| entry.orientation.extent(r));
            let flank = entry
                .flank
                .as_ref()
                .and_then(|f| s.nests.get(f))
                .and_then(|f| extent(f.nest.element));
            let max = match (extent(entry.nest.element), flank) {
                // No layout information: leave the drag unbounded above.
                (None, None) => f64::INFINITY,
                (own, flank) => own.unwrap_or(0.0) + flank.unwrap_or(0.0),
            };
            (entry.nest.current_size, max, entry.other.clone())
        };
        self.state.borrow_mut().drag = Some(DragSession {
            name: String::from(name),
            start,
            max,
        });
        self.update_state(name, |st| st.remove(DividerState::COLLAPSED));
        if let Some(other) = other {
            self.update_state(&other, |st| st.insert(DividerState::COLLAPSED));
        }
        tracing::trace!(nest = name, start, max, "divider drag start");
    }

    fn on_drag_move(&self, name: &str, info: &DragInfo) {
        let (size, divider) = {
            let s = self.state.borrow();
            let (Some(session), Some(entry)) = (s.drag.as_ref(), s.nests.get(name)) else {
                return;
            };
            if session.name != name {
                return;
            }
            let delta = entry.orientation.component(info.delta);
            let size = (session.start + entry.nest.side.sign() * delta)
                .max(0.0)
                .min(session.max);
            (size, entry.nest.divider)
        };
        self.set_size(name, size);
        // The divider follows the layout, not its own offsets.
        if let Some(divider) = divider {
            let dom = self.component.dom();
            dom.remove_style(divider, "left");
            dom.remove_style(divider, "top");
        }
    }

    fn on_drag_end(&self, name: &str, _info: &DragInfo) {
        let nest = {
            let mut s = self.state.borrow_mut();
            if s.drag.as_ref().is_some_and(|d| d.name == name) {
                s.drag = None;
            }
            let Some(entry) = s.nests.get_mut(name) else {
                return;
            };
            if entry.nest.current_size > 0.0 {
                entry.nest.last_size = Some(entry.nest.current_size);
            }
            entry.nest.clone()
        };
        tracing::trace!(nest = name, size = nest.current_size, "divider drag end");
        self.dispatch_split_event(values::DRAG_END, Some(Rc::new(nest)));
    }

    // --- state ---

    /// The one place a nest's size changes: the record and `flex-basis` move together.
    fn set_size(&self, name: &str, size: f64) {
        let element = {
            let mut s = self.state.borrow_mut();
            let Some(entry) = s.nests.get_mut(name) else {
                return;
            };
            entry.nest.current_size = size;
            entry.nest.element
        };
        self.component
            .dom()
            .set_style(element, BASIS, &format_px(size));
    }

    /// Change a divider's state and reflect it in classes and in the dragger's lock.
    fn update_state(&self, name: &str, change: impl FnOnce(&mut DividerState)) {
        let (divider, state, dragger) = {
            let mut s = self.state.borrow_mut();
            let Some(entry) = s.nests.get_mut(name) else {
                return;
            };
            change(&mut entry.nest.state);
            (entry.nest.divider, entry.nest.state, entry.dragger.clone())
        };
        let Some(divider) = divider else {
            return;
        };
        let dom = self.component.dom();
        for (flag, class) in DividerState::CLASSES {
            dom.set_class(divider, class, state.contains(flag));
        }
        if let Some(dragger) = dragger {
            apply_lock(&dragger, state);
        }
    }

    fn sync_lock(&self, name: &str) {
        let entry = {
            let s = self.state.borrow();
            s.nests
                .get(name)
                .and_then(|e| Some((e.dragger.clone()?, e.nest.state)))
        };
        if let Some((dragger, state)) = entry {
            apply_lock(&dragger, state);
        }
    }

    /// Dispatch a [`split_event::SPLIT`] event. Returns `true` if a handler prevented the
    /// default.
    pub fn dispatch_split_event(&self, value: &'static str, payload: Option<Payload>) -> bool {
        self.component
            .dispatch(split_event::SPLIT, value, payload)
    }

    fn announce(&self, value: &'static str, name: &str) {
        let payload = self.nest(name).map(|n| Rc::new(n) as Payload);
        self.dispatch_split_event(value, payload);
    }

    // --- resizing ---

    /// Resize `name` to `size`. See [`resize_with`](Self::resize_with).
    pub fn resize(&self, name: &str, size: f64, skip_animation: bool) -> Result<(), SplitError> {
        self.resize_with(name, size, skip_animation, || {})
    }

    /// Resize `name` to `size` and run `callback` once the new size is in place.
    ///
    /// With `skip_animation`, or when the size does not change, the size is applied and
    /// `callback` runs before this returns. Otherwise the nest is marked
    /// [`ANIMATED_CLASS`], the size is applied, and `callback` runs when the nest's
    /// `flex-basis` transition ends, or after
    /// [`transition_fallback_ms`](SplitConfig::transition_fallback_ms) if it never does.
    ///
    /// A newer resize of the same nest replaces a pending one; the older callback is
    /// dropped without running. B nests are left alone and `callback` is dropped.
    pub fn resize_with(
        &self,
        name: &str,
        size: f64,
        skip_animation: bool,
        callback: impl FnOnce() + 'static,
    ) -> Result<(), SplitError> {
        let nest = self.require(name)?;
        if !nest.can_resize {
            tracing::trace!(nest = name, "resize ignored: nest is not resizable");
            return Ok(());
        }
        self.cancel_pending(name);
        let dom = self.component.dom();
        if skip_animation || size == nest.current_size {
            dom.remove_class(nest.element, ANIMATED_CLASS);
            self.set_size(name, size);
            callback();
            return Ok(());
        }

        dom.add_class(nest.element, ANIMATED_CLASS);
        self.set_size(name, size);
        dom.start_transition(nest.element, BASIS);
        let (token, fallback) = {
            let mut s = self.state.borrow_mut();
            s.next_token += 1;
            (s.next_token, s.config.transition_fallback_ms)
        };
        let timer = fallback.map(|ms| {
            let this = self.downgrade();
            let owned = String::from(name);
            dom.set_timeout(ms, move || {
                if let Some(this) = this.upgrade()
                    && this.complete(&owned, Some(token))
                {
                    tracing::debug!(nest = %owned, "resize completed by fallback timer");
                }
            })
        });
        self.state.borrow_mut().pending.insert(
            String::from(name),
            Pending {
                token,
                timer,
                callback: Box::new(callback),
            },
        );
        tracing::trace!(nest = name, size, "animated resize started");
        Ok(())
    }

    /// Finish the pending resize of `name`, if any and if `token` (when given) matches.
    ///
    /// The entry is removed before its callback runs, so the callback may start another
    /// resize of the same nest.
    fn complete(&self, name: &str, token: Option<u64>) -> bool {
        let (pending, element) = {
            let mut s = self.state.borrow_mut();
            let matches = s
                .pending
                .get(name)
                .is_some_and(|p| token.is_none_or(|t| t == p.token));
            if !matches {
                return false;
            }
            (
                s.pending.remove(name),
                s.nests.get(name).map(|e| e.nest.element),
            )
        };
        let Some(pending) = pending else {
            return false;
        };
        let dom = self.component.dom();
        if let Some(timer) = pending.timer {
            dom.clear_timeout(timer);
        }
        if let Some(element) = element {
            dom.remove_class(element, ANIMATED_CLASS);
        }
        (pending.callback)();
        true
    }

    fn cancel_pending(&self, name: &str) {
        let pending = self.state.borrow_mut().pending.remove(name);
        if let Some(Pending {
            timer: Some(timer), ..
        }) = pending
        {
            self.component.dom().clear_timeout(timer);
        }
    }

    fn cancel_delayed(&self, name: &str) {
        let timer = self.state.borrow_mut().delayed.remove(name);
        if let Some(timer) = timer {
            self.component.dom().clear_timeout(timer);
        }
    }

    // --- open / close ---

    /// Shrink `name` to zero, then mark its divider collapsed. It stays draggable.
    pub fn close(&self, name: &str) -> Result<(), SplitError> {
        self.close_with(name, |st| st.insert(DividerState::COLLAPSED))
    }

    /// Shrink `name` to zero, then mark its divider closed and locked.
    pub fn close_and_lock(&self, name: &str) -> Result<(), SplitError> {
        self.close_with(name, |st| {
            st.remove(DividerState::COLLAPSED);
            st.insert(DividerState::CLOSED | DividerState::LOCKED);
        })
    }

    /// Shrink `name` to zero, then mark its divider closed and collapsed but not locked.
    pub fn close_and_unlock(&self, name: &str) -> Result<(), SplitError> {
        self.close_with(name, |st| {
            st.insert(DividerState::CLOSED | DividerState::COLLAPSED);
            st.remove(DividerState::LOCKED);
        })
    }

    fn close_with(
        &self,
        name: &str,
        mark: impl FnOnce(&mut DividerState) + 'static,
    ) -> Result<(), SplitError> {
        let nest = self.require(name)?;
        if !nest.can_resize {
            return Ok(());
        }
        self.cancel_delayed(name);
        self.dispatch_split_event(values::WILL_CLOSE, Some(Rc::new(nest)));
        let this = self.downgrade();
        let owned = String::from(name);
        self.resize_with(name, 0.0, false, move || {
            if let Some(this) = this.upgrade() {
                this.update_state(&owned, mark);
                this.announce(values::DID_CLOSE, &owned);
            }
        })
    }

    /// Restore `name` to its last dragged size, or its default, and clear the collapsed
    /// and closed marks.
    pub fn open(&self, name: &str) -> Result<(), SplitError> {
        let nest = self.require(name)?;
        if !nest.can_resize {
            return Ok(());
        }
        self.cancel_delayed(name);
        let size = nest.restore_size();
        self.dispatch_split_event(values::WILL_OPEN, Some(Rc::new(nest)));
        self.update_state(name, |st| {
            st.remove(DividerState::COLLAPSED | DividerState::CLOSED);
        });
        let done = self.did_open(name);
        self.resize_with(name, size, false, done)
    }

    /// Unlock and unmark the divider now, then after
    /// [`open_delay_ms`](SplitConfig::open_delay_ms) resize to `size` (or the restore size).
    pub fn open_and_unlock(&self, name: &str, size: Option<f64>) -> Result<(), SplitError> {
        self.open_deferred(name, size, false)
    }

    /// As [`open_and_unlock`](Self::open_and_unlock), but the divider ends up locked.
    pub fn open_and_lock(&self, name: &str, size: Option<f64>) -> Result<(), SplitError> {
        self.open_deferred(name, size, true)
    }

    fn open_deferred(&self, name: &str, size: Option<f64>, lock: bool) -> Result<(), SplitError> {
        let nest = self.require(name)?;
        if !nest.can_resize {
            return Ok(());
        }
        self.cancel_delayed(name);
        // A close still animating must not re-mark the divider once the open has cleared it.
        self.cancel_pending(name);
        let target = size.unwrap_or_else(|| nest.restore_size());
        self.dispatch_split_event(values::WILL_OPEN, Some(Rc::new(nest)));
        self.update_state(name, |st| {
            st.remove(DividerState::COLLAPSED | DividerState::CLOSED);
            st.set(DividerState::LOCKED, lock);
        });

        let delay = self.config().open_delay_ms;
        let this = self.downgrade();
        let owned = String::from(name);
        let timer = self.component.dom().set_timeout(delay, move || {
            let Some(this) = this.upgrade() else {
                return;
            };
            this.state.borrow_mut().delayed.remove(&owned);
            let done = this.did_open(&owned);
            if let Err(err) = this.resize_with(&owned, target, false, done) {
                tracing::warn!(%err, "deferred open failed");
            }
        });
        self.state
            .borrow_mut()
            .delayed
            .insert(String::from(name), timer);
        Ok(())
    }

    fn did_open(&self, name: &str) -> impl FnOnce() + 'static {
        let this = self.downgrade();
        let owned = String::from(name);
        move || {
            if let Some(this) = this.upgrade() {
                this.announce(values::DID_OPEN, &owned);
            }
        }
    }

    /// Open `name` if its size is exactly zero, otherwise close it.
    pub fn toggle(&self, name: &str) -> Result<(), SplitError> {
        let nest = self.require(name)?;
        if nest.current_size == 0.0 {
            self.open(name)
        } else {
            self.close(name)
        }
    }

    /// Lock the divider of `name`.
    pub fn lock(&self, name: &str) -> Result<(), SplitError> {
        self.require(name)?;
        self.update_state(name, |st| st.insert(DividerState::LOCKED));
        Ok(())
    }

    /// Unlock the divider of `name`.
    pub fn unlock(&self, name: &str) -> Result<(), SplitError> {
        self.require(name)?;
        self.update_state(name, |st| st.remove(DividerState::LOCKED));
        Ok(())
    }

    /// [`close_and_lock`](Self::close_and_lock) every leaf nest.
    pub fn close_and_lock_all(&self) {
        for name in self.nest_names() {
            if let Err(err) = self.close_and_lock(&name) {
                tracing::warn!(%err, "close_and_lock_all");
            }
        }
    }

    /// [`open_and_unlock`](Self::open_and_unlock) every leaf nest.
    pub fn open_and_unlock_all(&self) {
        for name in self.nest_names() {
            if let Err(err) = self.open_and_unlock(&name, None) {
                tracing::warn!(%err, "open_and_unlock_all");
            }
        }
    }

    /// Cancel pending resizes and deferred opens, then dispose the root component and
    /// with it every divider.
    pub fn dispose(&self) {
        let (pending, delayed) = {
            let mut s = self.state.borrow_mut();
            s.drag = None;
            (
                core::mem::take(&mut s.pending),
                core::mem::take(&mut s.delayed),
            )
        };
        let dom = self.component.dom();
        for timer in pending.into_values().filter_map(|p| p.timer) {
            dom.clear_timeout(timer);
        }
        for timer in delayed.into_values() {
            dom.clear_timeout(timer);
        }
        self.component.dispose();
        let mut s = self.state.borrow_mut();
        s.nests.clear();
        s.split_elements.clear();
    }
}

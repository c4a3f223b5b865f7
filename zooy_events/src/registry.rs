// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared, bidirectional listener registry.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::{HashMap, HashSet};
use zooy_dom::DomTarget;

use crate::bus::EventName;

/// Identity of a lifecycle object within a [`Registry`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(u64);

/// Something a participant listens to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetKey {
    /// Another participant's event bus. Tracked on both sides.
    Participant(ParticipantId),
    /// A DOM target. Tracked on the observer side only.
    Dom(DomTarget),
}

pub(crate) type Unsubscribe = Box<dyn FnOnce()>;

type Subscriptions = HashMap<EventName, Vec<Unsubscribe>>;

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    /// observer → target → event → unsubscribe actions
    listening_to: HashMap<ParticipantId, HashMap<TargetKey, Subscriptions>>,
    /// target → observers holding at least one live subscription to it
    observed_by: HashMap<ParticipantId, HashSet<ParticipantId>>,
}

/// Listener bookkeeping shared by every participant of one application.
///
/// Each participant owns two logical maps, *listening to* and *observed by*. They are stored
/// here rather than on the participants so that one call updates both sides: an observer
/// appears in a target's *observed by* set if and only if it holds at least one live
/// subscription to that target.
///
/// Unsubscribe actions run after the registry's internal borrow is released, so they may
/// call back into the registry.
#[derive(Clone, Default)]
pub struct Registry(Rc<RefCell<RegistryInner>>);

impl core::fmt::Debug for Registry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("Registry")
            .field("participants", &inner.next_id)
            .field("observers", &inner.listening_to.len())
            .field("observed", &inner.observed_by.len())
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh participant identity.
    pub fn register(&self) -> ParticipantId {
        let mut inner = self.0.borrow_mut();
        inner.next_id += 1;
        ParticipantId(inner.next_id)
    }

    /// Record a subscription of `observer` to `event` on `target`.
    pub(crate) fn subscribe(
        &self,
        observer: ParticipantId,
        target: TargetKey,
        event: EventName,
        unsubscribe: Unsubscribe,
    ) {
        let mut guard = self.0.borrow_mut();
        let inner = &mut *guard;
        inner
            .listening_to
            .entry(observer)
            .or_default()
            .entry(target)
            .or_default()
            .entry(event)
            .or_default()
            .push(unsubscribe);
        if let TargetKey::Participant(t) = target {
            inner.observed_by.entry(t).or_default().insert(observer);
        }
        tracing::trace!(?observer, ?target, "subscribed");
    }

    /// Drop `observer`'s subscriptions to `target`: only those for `event` when given,
    /// otherwise all of them.
    ///
    /// Returns the number of subscriptions removed. Unknown pairs are a no-op.
    pub fn unsubscribe(
        &self,
        observer: ParticipantId,
        target: TargetKey,
        event: Option<&str>,
    ) -> usize {
        let removed = {
            let mut guard = self.0.borrow_mut();
            let inner = &mut *guard;
            let Some(targets) = inner.listening_to.get_mut(&observer) else {
                return 0;
            };
            let Some(subs) = targets.get_mut(&target) else {
                return 0;
            };
            let mut removed: Vec<Unsubscribe> = Vec::new();
            match event {
                Some(event) => {
                    if let Some(actions) = subs.remove(event) {
                        removed.extend(actions);
                    }
                }
                None => {
                    for (_, actions) in subs.drain() {
                        removed.extend(actions);
                    }
                }
            }
            if subs.is_empty() {
                targets.remove(&target);
                if let TargetKey::Participant(t) = target
                    && let Some(observers) = inner.observed_by.get_mut(&t)
                {
                    observers.remove(&observer);
                    if observers.is_empty() {
                        inner.observed_by.remove(&t);
                    }
                }
            }
            if targets.is_empty() {
                inner.listening_to.remove(&observer);
            }
            removed
        };
        let count = removed.len();
        for action in removed {
            action();
        }
        if count > 0 {
            tracing::trace!(?observer, ?target, count, "unsubscribed");
        }
        count
    }

    /// Drop every subscription `observer` holds.
    pub fn unsubscribe_all(&self, observer: ParticipantId) -> usize {
        self.listening_to(observer)
            .into_iter()
            .map(|target| self.unsubscribe(observer, target, None))
            .sum()
    }

    /// Ask every observer of `target` to drop its subscriptions to it.
    pub fn stop_being_listened_to(&self, target: ParticipantId) -> usize {
        self.observers_of(target)
            .into_iter()
            .map(|observer| self.unsubscribe(observer, TargetKey::Participant(target), None))
            .sum()
    }

    /// Drop every subscription any observer holds to `target`.
    ///
    /// Used when a DOM target goes away, since those are not tracked on the target side.
    pub fn drop_target(&self, target: TargetKey) -> usize {
        let observers: Vec<ParticipantId> = self
            .0
            .borrow()
            .listening_to
            .iter()
            .filter(|(_, targets)| targets.contains_key(&target))
            .map(|(observer, _)| *observer)
            .collect();
        observers
            .into_iter()
            .map(|observer| self.unsubscribe(observer, target, None))
            .sum()
    }

    /// Remove every relationship of `participant`, in both directions.
    pub fn forget(&self, participant: ParticipantId) -> usize {
        let outbound = self.unsubscribe_all(participant);
        let inbound = self.stop_being_listened_to(participant);
        outbound + inbound
    }

    // --- queries ---

    /// Targets `observer` currently holds subscriptions to.
    pub fn listening_to(&self, observer: ParticipantId) -> Vec<TargetKey> {
        self.0
            .borrow()
            .listening_to
            .get(&observer)
            .map(|targets| targets.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of live subscriptions `observer` holds to `target`.
    pub fn subscription_count(&self, observer: ParticipantId, target: TargetKey) -> usize {
        self.0
            .borrow()
            .listening_to
            .get(&observer)
            .and_then(|targets| targets.get(&target))
            .map(|subs| subs.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Participants currently listening to `target`.
    pub fn observers_of(&self, target: ParticipantId) -> Vec<ParticipantId> {
        let mut observers: Vec<ParticipantId> = self
            .0
            .borrow()
            .observed_by
            .get(&target)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        observers.sort_unstable();
        observers
    }

    /// Whether `observer` is recorded as listening to `target`.
    pub fn is_observed_by(&self, target: ParticipantId, observer: ParticipantId) -> bool {
        self.0
            .borrow()
            .observed_by
            .get(&target)
            .is_some_and(|set| set.contains(&observer))
    }

    /// True if `participant` has no entries on either side.
    pub fn is_clean(&self, participant: ParticipantId) -> bool {
        let inner = self.0.borrow();
        !inner.listening_to.contains_key(&participant)
            && !inner.observed_by.contains_key(&participant)
    }
}

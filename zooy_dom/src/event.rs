// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native event objects.

use alloc::string::String;
use kurbo::Point;
use smallvec::SmallVec;

use crate::types::{DomTarget, EventKind, Phase};

/// A native event travelling through the document.
///
/// Pointer events carry `client` coordinates. Touch events carry their active touch
/// points in `touches`; consumers that want a single position normally read the first one.
#[derive(Clone, Debug)]
pub struct DomEvent {
    /// Event kind.
    pub kind: EventKind,
    /// Pointer position in client coordinates.
    pub client: Point,
    /// Active touch points, first touch first.
    pub touches: SmallVec<[Point; 2]>,
    /// Transitioned property for [`EventKind::TransitionEnd`].
    pub property_name: Option<String>,
    pub(crate) target: DomTarget,
    pub(crate) current_target: DomTarget,
    pub(crate) phase: Phase,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
}

impl DomEvent {
    /// A bare event of the given kind at the origin.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            client: Point::ZERO,
            touches: SmallVec::new(),
            property_name: None,
            target: DomTarget::Document,
            current_target: DomTarget::Document,
            phase: Phase::Target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// A mouse event at `client`.
    pub fn mouse(kind: EventKind, client: Point) -> Self {
        Self {
            client,
            ..Self::new(kind)
        }
    }

    /// A touch event with the given active touch points.
    ///
    /// `client` is left at the origin, as it is for native touch events.
    pub fn touch(kind: EventKind, touches: &[Point]) -> Self {
        Self {
            touches: touches.iter().copied().collect(),
            ..Self::new(kind)
        }
    }

    /// A `transitionend` event for `property`.
    pub fn transition_end(property: impl Into<String>) -> Self {
        Self {
            property_name: Some(property.into()),
            ..Self::new(EventKind::TransitionEnd)
        }
    }

    /// The first active touch point, if any.
    pub fn first_touch(&self) -> Option<Point> {
        self.touches.first().copied()
    }

    /// Mark the default action as prevented.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether any listener prevented the default action.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Stop propagation after the current listener returns.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether propagation was stopped.
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// The target the event was dispatched to.
    pub fn target(&self) -> DomTarget {
        self.target
    }

    /// The target whose listeners are currently running.
    pub fn current_target(&self) -> DomTarget {
        self.current_target
    }

    /// Current propagation phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }
}

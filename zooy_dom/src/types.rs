// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: element handles, listener keys, event kinds and phases.

/// Identifier for an element in the document (generational).
///
/// A handle stays valid until the element is [released](crate::Dom::release). After that,
/// the slot may be reused with a newer generation and the old handle reads as dead.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Something listeners can be attached to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum DomTarget {
    /// The document itself. It sits above the body in every propagation path.
    Document,
    /// A single element.
    Element(ElementId),
}

impl From<ElementId> for DomTarget {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

/// The kinds of native events the framework reacts to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Primary button pressed.
    MouseDown,
    /// Pointer moved.
    MouseMove,
    /// Primary button released.
    MouseUp,
    /// First finger down.
    TouchStart,
    /// Finger moved.
    TouchMove,
    /// Finger lifted.
    TouchEnd,
    /// Click (press and release on the same element).
    Click,
    /// Double click.
    DblClick,
    /// A CSS transition finished.
    TransitionEnd,
}

impl EventKind {
    /// The DOM event type name, e.g. `"mousedown"`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MouseDown => "mousedown",
            Self::MouseMove => "mousemove",
            Self::MouseUp => "mouseup",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::TransitionEnd => "transitionend",
        }
    }

    /// True for the touch family of events.
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchMove | Self::TouchEnd)
    }
}

/// Propagation phase of a dispatched event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Document → parent of target.
    Capture,
    /// The target itself.
    Target,
    /// Parent of target → document.
    Bubble,
}

/// Options for [`Dom::add_listener`](crate::Dom::add_listener).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ListenOptions {
    /// Run during the capture phase instead of the bubble phase.
    pub capture: bool,
}

impl ListenOptions {
    /// Options for a capture-phase listener.
    pub const fn capture() -> Self {
        Self { capture: true }
    }
}

/// Handle for a registered listener, used to remove it again.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListenerKey(pub(crate) u64);

/// Handle for a pending timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u64);

/// A parsed HTML fragment. Only its root element is used by the framework.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Fragment {
    /// Root element of the fragment.
    pub html: ElementId,
}

// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag geometry, independent of any document.

use kurbo::{Point, Vec2};
use zooy_dom::ElementId;

/// Which offsets a drag may change.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Axis {
    /// Horizontal only: `left` is written.
    X,
    /// Vertical only: `top` is written.
    Y,
    /// Both offsets.
    #[default]
    Free,
}

impl Axis {
    /// `"x"` and `"y"` constrain the drag; anything else is free movement.
    pub fn parse(s: &str) -> Self {
        match s {
            "x" => Self::X,
            "y" => Self::Y,
            _ => Self::Free,
        }
    }

    /// Whether `left` follows the pointer.
    pub const fn moves_x(self) -> bool {
        matches!(self, Self::X | Self::Free)
    }

    /// Whether `top` follows the pointer.
    pub const fn moves_y(self) -> bool {
        matches!(self, Self::Y | Self::Free)
    }
}

impl From<&str> for Axis {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Payload of every drag event.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragInfo {
    /// The dragged element.
    pub target: ElementId,
    /// `left` offset of the element when the drag started.
    pub left: f64,
    /// `top` offset of the element when the drag started.
    pub top: f64,
    /// Pointer x minus the element's `left` at drag start.
    pub x_org: f64,
    /// Pointer y minus the element's `top` at drag start.
    pub y_org: f64,
    /// Pointer position of the event.
    pub client: Point,
    /// `client - org - (left, top)`: pointer travel since the drag started.
    pub delta: Vec2,
}

/// The pointer's hold on an element, fixed at drag start.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Grip {
    pub(crate) target: ElementId,
    pub(crate) left: f64,
    pub(crate) top: f64,
    pub(crate) x_org: f64,
    pub(crate) y_org: f64,
}

impl Grip {
    pub(crate) fn new(target: ElementId, client: Point, left: f64, top: f64) -> Self {
        Self {
            target,
            left,
            top,
            x_org: client.x - left,
            y_org: client.y - top,
        }
    }

    /// New `(left, top)` for a pointer at `client`; `None` for an axis that stays put.
    pub(crate) fn position(&self, axis: Axis, client: Point) -> (Option<f64>, Option<f64>) {
        (
            axis.moves_x().then(|| client.x - self.x_org),
            axis.moves_y().then(|| client.y - self.y_org),
        )
    }

    pub(crate) fn info(&self, client: Point) -> DragInfo {
        DragInfo {
            target: self.target,
            left: self.left,
            top: self.top,
            x_org: self.x_org,
            y_org: self.y_org,
            client,
            delta: Vec2::new(
                client.x - self.x_org - self.left,
                client.y - self.y_org - self.top,
            ),
        }
    }
}

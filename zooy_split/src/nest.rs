// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nest records and the small enums describing them.

use alloc::string::String;

use kurbo::{Rect, Vec2};
use zooy_dom::ElementId;
use zooy_drag::Axis;

/// Direction a container is split in.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Orientation {
    /// Side by side; dividers drag horizontally and sizes are widths.
    #[default]
    EW,
    /// Stacked; dividers drag vertically and sizes are heights.
    NS,
}

impl Orientation {
    /// `"NS"` stacks; anything else is side by side.
    pub fn parse(s: &str) -> Self {
        if s == "NS" { Self::NS } else { Self::EW }
    }

    /// Drag axis of this orientation's dividers.
    pub const fn axis(self) -> Axis {
        match self {
            Self::EW => Axis::X,
            Self::NS => Axis::Y,
        }
    }

    /// Class added to a split container.
    pub const fn class(self) -> &'static str {
        match self {
            Self::EW => "zsplit-ew",
            Self::NS => "zsplit-ns",
        }
    }

    pub(crate) fn extent(self, rect: Rect) -> f64 {
        match self {
            Self::EW => rect.width(),
            Self::NS => rect.height(),
        }
    }

    pub(crate) fn component(self, v: Vec2) -> f64 {
        match self {
            Self::EW => v.x,
            Self::NS => v.y,
        }
    }
}

impl From<&str> for Orientation {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Position of a nest within its split.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// First outer region, sized by the first divider.
    A,
    /// Middle region. Takes the remaining space and is never resized directly.
    B,
    /// Last outer region, sized by the second divider.
    C,
}

impl Side {
    /// The letter appended to the parent's name.
    pub const fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }

    /// Drag direction of this side's divider: `+1` for A, `-1` for C.
    pub(crate) const fn sign(self) -> f64 {
        match self {
            Self::C => -1.0,
            _ => 1.0,
        }
    }
}

bitflags::bitflags! {
    /// Visual state of a divider.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DividerState: u8 {
        /// The nest is shut but the divider can still be dragged open.
        const COLLAPSED = 0b0000_0001;
        /// The nest is shut.
        const CLOSED    = 0b0000_0010;
        /// The divider ignores drags.
        const LOCKED    = 0b0000_0100;
    }
}

impl DividerState {
    pub(crate) const CLASSES: [(Self, &'static str); 2] =
        [(Self::COLLAPSED, "collapsed"), (Self::CLOSED, "closed")];
}

/// Snapshot of a named region.
#[derive(Clone, Debug, PartialEq)]
pub struct Nest {
    /// Parent's name followed by [`Side::letter`].
    pub name: String,
    /// Position within its split.
    pub side: Side,
    /// The region's element.
    pub element: ElementId,
    /// The divider controlling this nest. `None` for B nests.
    pub divider: Option<ElementId>,
    /// Size given when the nest was created.
    pub default_size: f64,
    /// Size currently applied as `flex-basis`.
    pub current_size: f64,
    /// Last non-zero size a drag ended at.
    pub last_size: Option<f64>,
    /// False for B nests.
    pub can_resize: bool,
    /// Divider state.
    pub state: DividerState,
}

impl Nest {
    /// The size `open` restores: the last dragged size, else the default.
    pub fn restore_size(&self) -> f64 {
        self.last_size.unwrap_or(self.default_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_maps_to_axis() {
        assert_eq!(Orientation::parse("NS").axis(), Axis::Y);
        assert_eq!(Orientation::parse("EW").axis(), Axis::X);
        assert_eq!(Orientation::from("anything").axis(), Axis::X);
    }

    #[test]
    fn extent_follows_orientation() {
        let r = Rect::new(0.0, 0.0, 120.0, 40.0);
        assert_eq!(Orientation::EW.extent(r), 120.0);
        assert_eq!(Orientation::NS.extent(r), 40.0);
        assert_eq!(Orientation::NS.component(Vec2::new(3.0, -7.0)), -7.0);
    }
}

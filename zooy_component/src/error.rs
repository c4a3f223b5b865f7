// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Usage errors raised by [`Component`](crate::Component).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComponentError {
    /// `render` was called on a component that is already in the document.
    #[error("component is already rendered")]
    AlreadyRendered,
    /// The component was disposed and cannot be rendered again.
    #[error("component has been disposed")]
    Disposed,
}

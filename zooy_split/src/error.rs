// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use zooy_component::ComponentError;

/// Errors returned by [`Split`](crate::Split).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// The container was split before. The nest map is left untouched.
    #[error("container is already split")]
    AlreadySplit,
    /// No nest with this name is owned by the split.
    #[error("no nest named {0:?}")]
    UnknownNest(String),
    /// A divider component could not be rendered.
    #[error(transparent)]
    Component(#[from] ComponentError),
}

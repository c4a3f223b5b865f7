// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Timing knobs for [`Split`](crate::Split).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SplitConfig {
    /// Delay before the animated resize of `open_and_unlock`/`open_and_lock`, letting a
    /// display change settle before the transition starts.
    pub open_delay_ms: u64,
    /// Complete an animated resize after this long even if no `transitionend` arrives.
    /// `None` waits for the event indefinitely.
    pub transition_fallback_ms: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: 50,
            transition_fallback_ms: Some(600),
        }
    }
}

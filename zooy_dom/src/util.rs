// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::format;
use alloc::string::String;

/// Parse a CSS pixel length such as `"12px"` or `"12.5"`.
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
    number.trim().parse::<f64>().ok()
}

/// Format a pixel length for an inline style.
pub fn format_px(value: f64) -> String {
    format!("{value}px")
}

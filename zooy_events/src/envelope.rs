// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `(value, payload)` envelope carried by component events.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use core::any::Any;

/// Opaque, shareable event payload.
pub type Payload = Rc<dyn Any>;

/// Well-known envelope values.
pub mod values {
    /// A component finished entering the document.
    pub const READY: &str = "ready";
}

/// Immutable `(value, payload)` pair attached to every component event.
///
/// `value` names what happened (for example [`values::READY`]); the payload is whatever the
/// dispatcher chose to attach and is read back with [`CompEventData::downcast`].
#[derive(Clone)]
pub struct CompEventData {
    value: Cow<'static, str>,
    data: Option<Payload>,
}

impl CompEventData {
    /// Wrap a value and an optional payload.
    pub fn new(value: impl Into<Cow<'static, str>>, data: Option<Payload>) -> Self {
        Self {
            value: value.into(),
            data,
        }
    }

    /// The event value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The raw payload, if any.
    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    /// The payload as a `T`, if present and of that type.
    pub fn downcast<T: Any>(&self) -> Option<&T> {
        self.data.as_ref().and_then(|d| d.as_ref().downcast_ref::<T>())
    }
}

impl core::fmt::Debug for CompEventData {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompEventData")
            .field("value", &self.value)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downcast_reads_back_payload() {
        let data = CompEventData::new("saved", Some(Rc::new(42_u32) as Payload));
        assert_eq!(data.value(), "saved");
        assert_eq!(data.downcast::<u32>(), Some(&42));
        assert_eq!(data.downcast::<i64>(), None);
        assert!(CompEventData::new(values::READY, None).data().is_none());
    }
}

// Copyright 2025 the Zooy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use zooy_dom::Dom;
use zooy_events::Registry;

/// The document and listener registry shared by a set of components.
#[derive(Clone, Debug, Default)]
pub struct Runtime {
    dom: Dom,
    registry: Registry,
}

impl Runtime {
    /// A fresh document with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing document.
    pub fn with_dom(dom: Dom) -> Self {
        Self {
            dom,
            registry: Registry::new(),
        }
    }

    pub(crate) fn from_parts(dom: Dom, registry: Registry) -> Self {
        Self { dom, registry }
    }

    /// The document.
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// The listener registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

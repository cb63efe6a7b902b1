// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Emitter configuration.
//!
//! [`EmitterOptions`] is captured once when a registry is built and never
//! changes afterwards. It can be assembled in code or parsed from a JSON
//! record such as `{"inferListeners": true}`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Configuration for an [`EventRegistry`](crate::EventRegistry).
///
/// # Examples
///
/// ```
/// use event_registry::EmitterOptions;
///
/// let options = EmitterOptions::default().with_infer_listeners(true);
/// assert!(options.infer_listeners());
///
/// let parsed = EmitterOptions::from_value(&serde_json::json!({
///     "inferListeners": true
/// }))
/// .unwrap();
/// assert_eq!(parsed, options);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmitterOptions {
    infer_listeners: bool,
}

impl EmitterOptions {
    /// Creates options with every flag at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables name-based handler inference.
    ///
    /// When enabled, emitting `meow` also calls the handler named `onMeow`
    /// and emitting the wildcard calls `onAny`, if the owning entity
    /// provides them.
    #[must_use]
    pub fn with_infer_listeners(mut self, enabled: bool) -> Self {
        self.infer_listeners = enabled;
        self
    }

    /// Returns whether handler inference is enabled.
    #[must_use]
    pub fn infer_listeners(&self) -> bool {
        self.infer_listeners
    }

    /// Parses options from a JSON configuration record.
    ///
    /// `null` yields the defaults. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is neither an object nor
    /// `null`, and [`Error::Options`] if a known field has the wrong type.
    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => Ok(Self::deserialize(value)?),
            other => Err(Error::invalid_argument(format!(
                "expected options to be an object, got {}",
                json_type_name(other)
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

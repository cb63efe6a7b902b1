// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event identifier type.

use std::fmt;

use serde_json::Value;

/// The wildcard event name.
///
/// Emitting any event also emits the wildcard, and the string `"*"` converts
/// to [`EventKey::Any`].
pub const ANY: &str = "*";

/// Identifies an event inside an [`EventRegistry`](crate::EventRegistry).
///
/// # Examples
///
/// ```
/// use event_registry::{ANY, EventKey};
///
/// let meow = EventKey::from("meow");
/// assert_eq!(meow.name(), Some("meow"));
///
/// assert_eq!(EventKey::from(ANY), EventKey::Any);
/// assert!(EventKey::from("*").is_any());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// The wildcard: listeners registered here observe every emission.
    Any,
    /// A named event.
    Named(String),
}

impl EventKey {
    /// Creates a named key. The name `"*"` yields [`EventKey::Any`].
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == ANY { Self::Any } else { Self::Named(name) }
    }

    /// Returns `true` for the wildcard key.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the event name, or `None` for the wildcard.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Named(name) => Some(name),
        }
    }

    /// Returns the key as it is passed to wildcard listeners.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(ANY),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for EventKey {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl From<&String> for EventKey {
    fn from(name: &String) -> Self {
        Self::named(name.as_str())
    }
}

impl From<&EventKey> for EventKey {
    fn from(key: &EventKey) -> Self {
        key.clone()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named handlers used for listener inference.
//!
//! When inference is enabled, emitting `meow` looks up a handler called
//! `onMeow` and calls it before any explicitly registered listener. The
//! lookup goes through the [`NamedHandlers`] capability, so the registry
//! never needs to know the concrete type that provides the handlers.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::Result;
use crate::event::EventKey;
use crate::subscription::Listener;

/// Name of the handler inferred for the wildcard key.
pub const ANY_HANDLER: &str = "onAny";

/// Capability to look up event handlers by name.
///
/// # Examples
///
/// ```
/// use event_registry::{Listener, NamedHandlers};
///
/// struct Cat {
///     on_meow: Listener,
/// }
///
/// impl NamedHandlers for Cat {
///     fn handler(&self, name: &str) -> Option<Listener> {
///         (name == "onMeow").then(|| self.on_meow.clone())
///     }
/// }
/// ```
pub trait NamedHandlers {
    /// Returns the handler registered under `name`, if any.
    fn handler(&self, name: &str) -> Option<Listener>;
}

/// Computes the handler name inferred for `key`.
///
/// The first character of the event name is uppercased and `on` is
/// prepended. The wildcard maps to [`ANY_HANDLER`]. Empty names infer
/// nothing.
///
/// # Examples
///
/// ```
/// use event_registry::{EventKey, inferred_handler_name};
///
/// assert_eq!(inferred_handler_name(&"meow".into()).as_deref(), Some("onMeow"));
/// assert_eq!(inferred_handler_name(&EventKey::Any).as_deref(), Some("onAny"));
/// assert_eq!(inferred_handler_name(&"".into()), None);
/// ```
#[must_use]
pub fn inferred_handler_name(key: &EventKey) -> Option<String> {
    let name = match key {
        EventKey::Any => return Some(ANY_HANDLER.to_string()),
        EventKey::Named(name) => name,
    };

    let mut chars = name.chars();
    let first = chars.next()?;

    let mut inferred = String::with_capacity(name.len() + 2);
    inferred.push_str("on");
    inferred.extend(first.to_uppercase());
    inferred.push_str(chars.as_str());
    Some(inferred)
}

/// A [`NamedHandlers`] implementation backed by a map.
///
/// Useful when handlers are assembled at runtime rather than provided by
/// a dedicated type.
///
/// # Examples
///
/// ```
/// use event_registry::{HandlerTable, NamedHandlers};
///
/// let handlers = HandlerTable::new().with_handler("onMeow", |_args| Ok(()));
/// assert!(handlers.handler("onMeow").is_some());
/// assert!(handlers.handler("onPurr").is_none());
/// ```
#[derive(Debug, Default, Clone)]
pub struct HandlerTable {
    handlers: HashMap<String, Listener>,
}

impl HandlerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handler built from `callback` under `name`.
    #[must_use]
    pub fn with_handler<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&[Value]) -> Result<()> + Send + Sync + 'static,
    {
        self.insert(name, Listener::new(callback));
        self
    }

    /// Inserts `listener` under `name`, returning the handler it replaced.
    pub fn insert(&mut self, name: impl Into<String>, listener: Listener) -> Option<Listener> {
        self.handlers.insert(name.into(), listener)
    }

    /// Removes the handler stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Listener> {
        self.handlers.remove(name)
    }

    /// Returns the number of handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if the table holds no handlers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl NamedHandlers for HandlerTable {
    fn handler(&self, name: &str) -> Option<Listener> {
        self.handlers.get(name).cloned()
    }
}

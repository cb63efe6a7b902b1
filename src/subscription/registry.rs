// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The event registry: registration, removal and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::event::EventKey;
use crate::options::EmitterOptions;
use crate::subscription::handlers::{NamedHandlers, inferred_handler_name};
use crate::subscription::listener::{Entry, Listener, ListenerId, SubscribeOptions};

/// Shared named-handler provider stored in a registry.
pub type SharedHandlers = Arc<dyn NamedHandlers + Send + Sync>;

/// Registry of event listeners with synchronous dispatch.
///
/// Listeners are grouped by [`EventKey`] and kept in registration order. A
/// listener appears at most once per key. Keys without listeners are removed
/// from the registry immediately.
///
/// Emitting a named event first emits the wildcard [`EventKey::Any`] with the
/// event name prepended to the arguments, then calls the inferred handler
/// (when enabled), then the listeners registered for the event itself.
///
/// # Re-entrancy
///
/// All methods take `&self`. No lock is held while user code runs, so
/// listeners may subscribe, unsubscribe and emit on the same registry.
/// An emission only calls listeners that were registered before the `emit`
/// call began, including across its wildcard step and inferred handler:
/// listeners added meanwhile wait for the next emission, and listeners
/// removed meanwhile are not called afterwards.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use event_registry::{EventRegistry, Listener};
/// use serde_json::json;
///
/// let registry = EventRegistry::new();
/// let calls = Arc::new(AtomicUsize::new(0));
///
/// let counter = calls.clone();
/// let listener = Listener::infallible(move |args| {
///     assert_eq!(args, [json!(1), json!(2), json!(3)]);
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// registry.on("meow", &listener);
/// registry.emit("meow", &[json!(1), json!(2), json!(3)])?;
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
///
/// registry.off("meow", Some(&listener))?;
/// registry.emit("meow", &[])?;
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// # Ok::<(), event_registry::Error>(())
/// ```
pub struct EventRegistry {
    options: EmitterOptions,
    handlers: Option<SharedHandlers>,
    events: RwLock<HashMap<EventKey, Vec<Entry>>>,
}

impl EventRegistry {
    /// Creates an empty registry with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(EmitterOptions::default())
    }

    /// Creates an empty registry with the given options.
    #[must_use]
    pub fn with_options(options: EmitterOptions) -> Self {
        Self {
            options,
            handlers: None,
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Creates an empty registry whose inferred handlers come from `handlers`.
    ///
    /// The provider is only consulted when `options` enables inference.
    #[must_use]
    pub fn with_handlers(options: EmitterOptions, handlers: SharedHandlers) -> Self {
        Self {
            handlers: Some(handlers),
            ..Self::with_options(options)
        }
    }

    /// Creates an empty registry from a JSON configuration record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `config` is not an object (or
    /// `null`), and [`Error::Options`] if a field has the wrong type.
    pub fn from_config(config: &Value) -> Result<Self> {
        Ok(Self::with_options(EmitterOptions::from_value(config)?))
    }

    /// Returns the options captured at construction.
    #[must_use]
    pub fn options(&self) -> EmitterOptions {
        self.options
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers `listener` under `key`.
    ///
    /// Registering a listener that is already present under `key` keeps its
    /// position and only replaces its one-shot flag with `options.once`.
    pub fn subscribe(
        &self,
        key: impl Into<EventKey>,
        listener: &Listener,
        options: SubscribeOptions,
    ) -> &Self {
        let key = key.into();
        let mut events = self.events.write();
        let entries = events.entry(key.clone()).or_default();

        if let Some(entry) = entries.iter_mut().find(|entry| entry.listener == *listener) {
            entry.once = options.once;
            tracing::debug!(
                event = %key,
                listener = %entry.id,
                once = options.once,
                "Listener already registered, updated flags"
            );
        } else {
            let id = ListenerId::next();
            entries.push(Entry {
                id,
                listener: listener.clone(),
                once: options.once,
            });
            tracing::debug!(event = %key, listener = %id, once = options.once, "Registered listener");
        }
        self
    }

    /// Registers a persistent listener. Alias of [`subscribe`](Self::subscribe).
    pub fn on(&self, key: impl Into<EventKey>, listener: &Listener) -> &Self {
        self.subscribe(key, listener, SubscribeOptions::persistent())
    }

    /// Registers a persistent listener. Alias of [`on`](Self::on).
    pub fn add_event_listener(&self, key: impl Into<EventKey>, listener: &Listener) -> &Self {
        self.on(key, listener)
    }

    /// Registers a listener that is removed after its first invocation.
    ///
    /// Removal happens once the invocation returns `Ok`, so a one-shot
    /// listener that emits its own event again is called by that nested
    /// emission too.
    pub fn once(&self, key: impl Into<EventKey>, listener: &Listener) -> &Self {
        self.subscribe(key, listener, SubscribeOptions::once())
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes the registration of `listener` under `key`.
    ///
    /// Using the wildcard key removes every listener for every key, and
    /// `listener` may then be omitted. Removing a listener that is not
    /// registered does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `listener` is `None` and `key`
    /// is not the wildcard.
    pub fn unsubscribe(&self, key: impl Into<EventKey>, listener: Option<&Listener>) -> Result<&Self> {
        let key = key.into();
        if key.is_any() {
            return Ok(self.clear());
        }

        let Some(listener) = listener else {
            return Err(Error::invalid_argument(format!(
                "no listener specified for event `{key}`; use unsubscribe_all to remove every listener of an event"
            )));
        };

        let mut events = self.events.write();
        if let Some(entries) = events.get_mut(&key) {
            if let Some(position) = entries.iter().position(|entry| entry.listener == *listener) {
                let entry = entries.remove(position);
                tracing::debug!(event = %key, listener = %entry.id, "Removed listener");
            }
            if entries.is_empty() {
                events.remove(&key);
            }
        }
        Ok(self)
    }

    /// Alias of [`unsubscribe`](Self::unsubscribe).
    ///
    /// # Errors
    ///
    /// See [`unsubscribe`](Self::unsubscribe).
    pub fn off(&self, key: impl Into<EventKey>, listener: Option<&Listener>) -> Result<&Self> {
        self.unsubscribe(key, listener)
    }

    /// Alias of [`unsubscribe`](Self::unsubscribe).
    ///
    /// # Errors
    ///
    /// See [`unsubscribe`](Self::unsubscribe).
    pub fn remove_event_listener(
        &self,
        key: impl Into<EventKey>,
        listener: Option<&Listener>,
    ) -> Result<&Self> {
        self.unsubscribe(key, listener)
    }

    /// Removes every listener registered under `key`, or every listener at
    /// all when `key` is `None`.
    ///
    /// Removing the listeners of one key leaves the wildcard and all other
    /// keys untouched. Does nothing if there is nothing to remove.
    pub fn unsubscribe_all(&self, key: Option<&EventKey>) -> &Self {
        match key {
            Some(key) => {
                if let Some(entries) = self.events.write().remove(key) {
                    tracing::debug!(event = %key, count = entries.len(), "Removed all listeners for event");
                }
                self
            }
            None => self.clear(),
        }
    }

    /// Alias of [`unsubscribe_all`](Self::unsubscribe_all).
    pub fn remove_event_listeners(&self, key: Option<&EventKey>) -> &Self {
        self.unsubscribe_all(key)
    }

    /// Removes every listener for every key.
    pub fn clear(&self) -> &Self {
        let mut events = self.events.write();
        if !events.is_empty() {
            tracing::debug!(events = events.len(), "Removed all listeners");
            events.clear();
        }
        self
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Emits `key` with `args`, using the handler provider given at
    /// construction for inference.
    ///
    /// # Errors
    ///
    /// Returns the first error returned by a listener or inferred handler;
    /// the remaining listeners of that dispatch are not called.
    pub fn emit(&self, key: impl Into<EventKey>, args: &[Value]) -> Result<&Self> {
        self.dispatch(&key.into(), args, self.stored_handlers(), ListenerId::cutoff())?;
        Ok(self)
    }

    /// Emits `key` with `args`, looking up inferred handlers in `handlers`
    /// instead of the provider given at construction.
    ///
    /// # Errors
    ///
    /// See [`emit`](Self::emit).
    pub fn emit_with(
        &self,
        key: impl Into<EventKey>,
        args: &[Value],
        handlers: &dyn NamedHandlers,
    ) -> Result<&Self> {
        self.dispatch(&key.into(), args, Some(handlers), ListenerId::cutoff())?;
        Ok(self)
    }

    fn stored_handlers(&self) -> Option<&dyn NamedHandlers> {
        match &self.handlers {
            Some(handlers) => Some(&**handlers),
            None => None,
        }
    }

    /// Looks up `name` in the provider given at construction.
    pub(crate) fn stored_handler(&self, name: &str) -> Option<Listener> {
        self.handlers.as_ref()?.handler(name)
    }

    /// Runs one emission of `key`. Entries registered at or after `cutoff`
    /// were added once the outermost `emit` call began and are skipped.
    fn dispatch(
        &self,
        key: &EventKey,
        args: &[Value],
        handlers: Option<&dyn NamedHandlers>,
        cutoff: ListenerId,
    ) -> Result<()> {
        if !key.is_any() {
            let mut forwarded = Vec::with_capacity(args.len() + 1);
            forwarded.push(key.to_value());
            forwarded.extend_from_slice(args);
            tracing::trace!(event = %key, "Forwarding emission to wildcard listeners");
            self.dispatch(&EventKey::Any, &forwarded, handlers, cutoff)?;
        }

        if self.options.infer_listeners()
            && let Some(provider) = handlers
            && let Some(name) = inferred_handler_name(key)
            && let Some(handler) = provider.handler(&name)
        {
            tracing::trace!(event = %key, handler = %name, "Calling inferred handler");
            handler.call(args)?;
        }

        let snapshot: Vec<(ListenerId, Listener)> = self
            .events
            .read()
            .get(key)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.id < cutoff)
                    .map(|entry| (entry.id, entry.listener.clone()))
                    .collect()
            })
            .unwrap_or_default();

        for (id, listener) in snapshot {
            if !self.is_registered(key, id) {
                continue;
            }
            listener.call(args)?;
            self.remove_if_once(key, id);
        }
        Ok(())
    }

    fn is_registered(&self, key: &EventKey, id: ListenerId) -> bool {
        self.events
            .read()
            .get(key)
            .is_some_and(|entries| entries.iter().any(|entry| entry.id == id))
    }

    fn remove_if_once(&self, key: &EventKey, id: ListenerId) {
        let mut events = self.events.write();
        let Some(entries) = events.get_mut(key) else {
            return;
        };
        if let Some(position) = entries.iter().position(|entry| entry.id == id && entry.once) {
            entries.remove(position);
            tracing::trace!(event = %key, listener = %id, "Removed one-shot listener");
        }
        if entries.is_empty() {
            events.remove(key);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the number of listeners registered under `key`.
    #[must_use]
    pub fn listener_count(&self, key: &EventKey) -> usize {
        self.events.read().get(key).map_or(0, Vec::len)
    }

    /// Returns the number of registrations across all keys.
    #[must_use]
    pub fn total_listener_count(&self) -> usize {
        self.events.read().values().map(Vec::len).sum()
    }

    /// Returns `true` if at least one listener is registered under `key`.
    #[must_use]
    pub fn has_listeners(&self, key: &EventKey) -> bool {
        self.events.read().contains_key(key)
    }

    /// Returns the keys that currently have listeners, in no particular order.
    #[must_use]
    pub fn event_keys(&self) -> Vec<EventKey> {
        self.events.read().keys().cloned().collect()
    }

    /// Returns `true` if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (event_count, listener_count) = {
            let events = self.events.read();
            (events.len(), events.values().map(Vec::len).sum::<usize>())
        };
        f.debug_struct("EventRegistry")
            .field("options", &self.options)
            .field("has_handlers", &self.handlers.is_some())
            .field("event_count", &event_count)
            .field("listener_count", &listener_count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::HandlerTable;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting(counter: &Arc<AtomicU32>) -> Listener {
        let counter = counter.clone();
        Listener::infallible(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = EventRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.total_listener_count(), 0);
        assert!(!registry.options().infer_listeners());
    }

    #[test]
    fn from_config_rejects_non_object() {
        let err = EventRegistry::from_config(&json!(false)).unwrap_err();
        assert!(err.is_invalid_argument());

        let registry = EventRegistry::from_config(&json!({"inferListeners": true})).unwrap();
        assert!(registry.options().infer_listeners());
    }

    #[test]
    fn subscribe_and_emit() {
        let registry = EventRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));

        registry.on("meow", &counting(&counter));
        assert_eq!(registry.listener_count(&"meow".into()), 1);

        registry.emit("meow", &[]).unwrap();
        registry.emit("meow", &[]).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn duplicate_subscription_is_ignored() {
        let registry = EventRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let listener = counting(&counter);

        registry.on("meow", &listener).on("meow", &listener);
        assert_eq!(registry.listener_count(&"meow".into()), 1);

        registry.emit("meow", &[]).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resubscribing_updates_once_flag() {
        let registry = EventRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let listener = counting(&counter);

        registry.on("meow", &listener).once("meow", &listener);
        registry.emit("meow", &[]).unwrap();
        registry.emit("meow", &[]).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn resubscribing_keeps_position() {
        let registry = EventRegistry::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let first = {
            let order = order.clone();
            Listener::infallible(move |_| order.lock().push("first"))
        };
        let second = {
            let order = order.clone();
            Listener::infallible(move |_| order.lock().push("second"))
        };

        registry.on("meow", &first).on("meow", &second).on("meow", &first);
        registry.emit("meow", &[]).unwrap();

        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn removing_last_listener_prunes_key() {
        let registry = EventRegistry::new();
        let listener = Listener::infallible(|_| {});
        let key = EventKey::from("meow");

        registry.on(&key, &listener);
        assert!(registry.has_listeners(&key));

        registry.off(&key, Some(&listener)).unwrap();
        assert!(!registry.has_listeners(&key));
        assert!(registry.event_keys().is_empty());
    }

    #[test]
    fn unsubscribe_without_listener_fails_for_named_key() {
        let registry = EventRegistry::new();
        let err = registry.unsubscribe("meow", None).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn unsubscribe_wildcard_clears_everything() {
        let registry = EventRegistry::new();
        registry.on("meow", &Listener::infallible(|_| {}));
        registry.on("*", &Listener::infallible(|_| {}));

        registry.unsubscribe("*", None).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn unsubscribe_all_for_key_keeps_others() {
        let registry = EventRegistry::new();
        registry.on("meow", &Listener::infallible(|_| {}));
        registry.on("meow", &Listener::infallible(|_| {}));
        registry.on("purr", &Listener::infallible(|_| {}));
        registry.on(EventKey::Any, &Listener::infallible(|_| {}));

        registry.unsubscribe_all(Some(&"meow".into()));

        assert_eq!(registry.listener_count(&"meow".into()), 0);
        assert_eq!(registry.listener_count(&"purr".into()), 1);
        assert_eq!(registry.listener_count(&EventKey::Any), 1);
    }

    #[test]
    fn wildcard_receives_event_name_first() {
        let registry = EventRegistry::new();
        let received = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let received_clone = received.clone();

        registry.on(
            EventKey::Any,
            &Listener::infallible(move |args| received_clone.lock().push(args.to_vec())),
        );
        registry.emit("purr", &[json!("x")]).unwrap();
        registry.emit(EventKey::Any, &[json!(1)]).unwrap();

        assert_eq!(
            *received.lock(),
            vec![vec![json!("purr"), json!("x")], vec![json!(1)]]
        );
    }

    #[test]
    fn inference_uses_stored_handlers() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut table = HandlerTable::new();
        table.insert("onMeow", counting(&counter));

        let registry = EventRegistry::with_handlers(
            EmitterOptions::new().with_infer_listeners(true),
            Arc::new(table),
        );
        registry.emit("meow", &[]).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn inference_disabled_ignores_handlers() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut table = HandlerTable::new();
        table.insert("onMeow", counting(&counter));

        let registry = EventRegistry::with_handlers(EmitterOptions::new(), Arc::new(table));
        registry.emit("meow", &[]).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn once_listener_is_removed_after_success_only() {
        let registry = EventRegistry::new();
        let failing = Listener::new(|_| Err(Error::listener("hiss")));

        registry.once("meow", &failing);
        assert!(registry.emit("meow", &[]).is_err());
        assert_eq!(registry.listener_count(&"meow".into()), 1);
    }

    #[test]
    fn registry_debug() {
        let registry = EventRegistry::new();
        registry.on("meow", &Listener::infallible(|_| {}));

        let debug = format!("{registry:?}");
        assert!(debug.contains("EventRegistry"));
        assert!(debug.contains("listener_count: 1"));
    }
}

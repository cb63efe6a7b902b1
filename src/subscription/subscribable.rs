// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for entities that expose an event API.
//!
//! An entity embeds an [`EventRegistry`] and implements [`Subscribable`] to
//! get `on`/`once`/`off`/`emit` methods that return the entity itself, and
//! to provide inferred `onX` handlers without any reflection.

use serde_json::Value;

use crate::error::Result;
use crate::event::EventKey;
use crate::subscription::{EventRegistry, Listener, NamedHandlers, SubscribeOptions};

/// Trait for types that support event subscriptions.
///
/// Only [`events`](Self::events) is required. Override
/// [`named_handler`](Self::named_handler) to provide inferred handlers; they
/// are only called when the registry was built with inference enabled.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use event_registry::{EmitterOptions, EventRegistry, Listener, Subscribable};
///
/// struct Cat {
///     events: EventRegistry,
///     meows: Arc<AtomicUsize>,
/// }
///
/// impl Subscribable for Cat {
///     fn events(&self) -> &EventRegistry {
///         &self.events
///     }
///
///     fn named_handler(&self, name: &str) -> Option<Listener> {
///         let meows = self.meows.clone();
///         (name == "onMeow").then(|| {
///             Listener::infallible(move |_| {
///                 meows.fetch_add(1, Ordering::SeqCst);
///             })
///         })
///     }
/// }
///
/// let cat = Cat {
///     events: EventRegistry::with_options(EmitterOptions::new().with_infer_listeners(true)),
///     meows: Arc::new(AtomicUsize::new(0)),
/// };
///
/// cat.emit("meow", &[])?.emit("meow", &[])?;
/// assert_eq!(cat.meows.load(Ordering::SeqCst), 2);
/// # Ok::<(), event_registry::Error>(())
/// ```
pub trait Subscribable {
    /// Returns the registry backing this entity.
    fn events(&self) -> &EventRegistry;

    /// Looks up the handler inferred for an event, e.g. `onMeow` for `meow`.
    ///
    /// When this returns `None`, [`emit`](Self::emit) falls back to the
    /// provider the registry was built with, if any.
    fn named_handler(&self, _name: &str) -> Option<Listener> {
        None
    }

    /// Registers `listener` under `key` with explicit options.
    fn subscribe(
        &self,
        key: impl Into<EventKey>,
        listener: &Listener,
        options: SubscribeOptions,
    ) -> &Self
    where
        Self: Sized,
    {
        self.events().subscribe(key, listener, options);
        self
    }

    /// Registers a persistent listener.
    fn on(&self, key: impl Into<EventKey>, listener: &Listener) -> &Self
    where
        Self: Sized,
    {
        self.events().on(key, listener);
        self
    }

    /// Registers a listener that is removed after its first invocation.
    fn once(&self, key: impl Into<EventKey>, listener: &Listener) -> &Self
    where
        Self: Sized,
    {
        self.events().once(key, listener);
        self
    }

    /// Removes a registration; see [`EventRegistry::unsubscribe`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `listener` is `None` and `key` is not the wildcard.
    fn off(&self, key: impl Into<EventKey>, listener: Option<&Listener>) -> Result<&Self>
    where
        Self: Sized,
    {
        self.events().unsubscribe(key, listener)?;
        Ok(self)
    }

    /// Removes every listener of `key`, or every listener when `None`.
    fn off_all(&self, key: Option<&EventKey>) -> &Self
    where
        Self: Sized,
    {
        self.events().unsubscribe_all(key);
        self
    }

    /// Emits `key` with `args`, using this entity's named handlers for
    /// inference.
    ///
    /// # Errors
    ///
    /// Returns the first error returned by a listener or inferred handler.
    fn emit(&self, key: impl Into<EventKey>, args: &[Value]) -> Result<&Self>
    where
        Self: Sized,
    {
        self.events().emit_with(key, args, &EntityHandlers(self))?;
        Ok(self)
    }
}

/// Adapts a [`Subscribable`] entity to the [`NamedHandlers`] capability.
///
/// The entity's own handlers win over the registry's stored provider.
struct EntityHandlers<'a, T: ?Sized>(&'a T);

impl<T: Subscribable + ?Sized> NamedHandlers for EntityHandlers<'_, T> {
    fn handler(&self, name: &str) -> Option<Listener> {
        self.0
            .named_handler(name)
            .or_else(|| self.0.events().stored_handler(name))
    }
}

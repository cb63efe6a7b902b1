// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener handles and registration entries.
//!
//! - [`Listener`] - A shareable callback compared by identity
//! - [`SubscribeOptions`] - Per-registration flags

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::Result;

/// Closure type for event listeners.
pub type ListenerFn = dyn Fn(&[Value]) -> Result<()> + Send + Sync;

/// A callback that can be registered for events.
///
/// Listeners are compared by identity, not by value: clones of a `Listener`
/// are the same listener, while two listeners built from identical closures
/// are different. Keep a clone around to unsubscribe later.
///
/// # Examples
///
/// ```
/// use event_registry::Listener;
///
/// let purr = Listener::new(|args| {
///     println!("purring with {args:?}");
///     Ok(())
/// });
/// let same = purr.clone();
/// let other = Listener::new(|_| Ok(()));
///
/// assert_eq!(purr, same);
/// assert_ne!(purr, other);
/// ```
#[derive(Clone)]
pub struct Listener(Arc<ListenerFn>);

impl Listener {
    /// Wraps a fallible callback.
    ///
    /// An `Err` returned by the callback aborts the dispatch it runs in and is
    /// handed back to the caller of `emit`.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&[Value]) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Wraps a callback that cannot fail.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        Self::new(move |args| {
            callback(args);
            Ok(())
        })
    }

    /// Invokes the callback with `args`.
    ///
    /// # Errors
    ///
    /// Returns whatever error the callback returns.
    pub fn call(&self, args: &[Value]) -> Result<()> {
        (self.0)(args)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a single registration entry.
///
/// A new registration gets a fresh id; re-subscribing the same listener under
/// the same key keeps the existing entry and its id. Ids only grow, so
/// dispatch uses them both to tell whether an entry from its snapshot is
/// still registered and whether it was added after the emission began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// The id the next registration will receive. Every existing entry has a
    /// smaller id.
    pub(crate) fn cutoff() -> Self {
        Self(NEXT_ID.load(Ordering::SeqCst))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Flags attached to one registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Remove the registration after its first successful invocation.
    pub once: bool,
}

impl SubscribeOptions {
    /// Options for a persistent registration.
    #[must_use]
    pub fn persistent() -> Self {
        Self { once: false }
    }

    /// Options for a one-shot registration.
    #[must_use]
    pub fn once() -> Self {
        Self { once: true }
    }
}

/// One registration under one key.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) id: ListenerId,
    pub(crate) listener: Listener,
    pub(crate) once: bool,
}

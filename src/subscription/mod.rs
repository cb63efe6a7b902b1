// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Listener registration and synchronous event dispatch.
//!
//! # Overview
//!
//! - [`Listener`] - A callback compared by identity, used to register and unregister
//! - [`EventRegistry`] - Stores listeners per event and dispatches emissions
//! - [`NamedHandlers`] - Capability to provide inferred `onX` handlers
//! - [`HandlerTable`] - Map-backed [`NamedHandlers`] implementation
//! - [`Subscribable`] - Trait for entities that expose the event API themselves
//!
//! # Dispatch order
//!
//! Emitting `meow` with arguments `args`:
//!
//! 1. emits the wildcard with `["meow", args...]` (a full nested dispatch,
//!    including the inferred `onAny` handler),
//! 2. calls the inferred `onMeow` handler, if inference is enabled,
//! 3. calls the listeners registered for `meow`, in registration order,
//!    removing one-shot registrations after they ran.
//!
//! Emitting the wildcard directly runs only steps 2 and 3 for the wildcard.
//!
//! # Usage
//!
//! ```
//! use event_registry::{ANY, EventRegistry, Listener};
//! use serde_json::json;
//!
//! let registry = EventRegistry::new();
//!
//! let sleep = Listener::infallible(|args| {
//!     assert_eq!(args, [json!("purr"), json!("x")]);
//! });
//! registry.on(ANY, &sleep);
//!
//! registry.emit("purr", &[json!("x")])?;
//! # Ok::<(), event_registry::Error>(())
//! ```

mod handlers;
mod listener;
mod registry;
mod subscribable;

pub use handlers::{ANY_HANDLER, HandlerTable, NamedHandlers, inferred_handler_name};
pub use listener::{Listener, ListenerFn, SubscribeOptions};
pub use registry::{EventRegistry, SharedHandlers};
pub use subscribable::Subscribable;

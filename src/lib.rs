// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event Registry - a synchronous, in-process event emitter.
//!
//! Objects register listeners for named events and emit events that call
//! those listeners on the caller's stack, in registration order.
//!
//! # Features
//!
//! - **Wildcard listeners**: listeners under [`ANY`] observe every emission
//!   and receive the event name as their first argument
//! - **One-shot listeners**: removed right after their first invocation
//! - **Handler inference**: emitting `meow` can call an `onMeow` handler
//!   without registering it, see [`EmitterOptions::with_infer_listeners`]
//! - **Re-entrancy**: listeners may subscribe, unsubscribe and emit while a
//!   dispatch is running
//!
//! # Quick Start
//!
//! ```
//! use event_registry::{EventRegistry, Listener};
//! use serde_json::json;
//!
//! let registry = EventRegistry::new();
//!
//! let listener = Listener::infallible(|args| {
//!     assert_eq!(args, [json!(1), json!(2), json!(3)]);
//! });
//!
//! registry
//!     .on("meow", &listener)
//!     .emit("meow", &[json!(1), json!(2), json!(3)])?;
//! # Ok::<(), event_registry::Error>(())
//! ```
//!
//! ## Embedding in an entity
//!
//! Types that own a registry implement [`Subscribable`] to expose the event
//! API directly and to provide inferred handlers:
//!
//! ```
//! use event_registry::{EventRegistry, Listener, Subscribable};
//!
//! #[derive(Default)]
//! struct Cat {
//!     events: EventRegistry,
//! }
//!
//! impl Subscribable for Cat {
//!     fn events(&self) -> &EventRegistry {
//!         &self.events
//!     }
//! }
//!
//! let cat = Cat::default();
//! cat.on("meow", &Listener::infallible(|_| {}))
//!     .emit("meow", &[])?;
//! # Ok::<(), event_registry::Error>(())
//! ```
//!
//! # Errors
//!
//! Misuse is reported as [`Error::InvalidArgument`]. An error returned by a
//! listener aborts the dispatch and is returned from `emit` as is.

pub mod error;
pub mod event;
pub mod options;
pub mod subscription;

pub use error::{BoxError, Error, Result};
pub use event::{ANY, EventKey};
pub use options::EmitterOptions;
pub use subscription::{
    EventRegistry, HandlerTable, Listener, NamedHandlers, SubscribeOptions, Subscribable,
    inferred_handler_name,
};

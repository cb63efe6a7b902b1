// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the event registry.
//!
//! Only two things can go wrong: a caller misuses the API (bad configuration
//! record, missing callback on removal), or a listener fails while an event
//! is being dispatched. The registry itself never retries or recovers.

use thiserror::Error;

/// Boxed error type carried by [`Error::Listener`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument passed to the registry was rejected.
    ///
    /// Raised synchronously by construction from a configuration record that
    /// is not an object, and by removal calls that omit a required callback.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration record had the right shape but a field of the wrong type.
    #[error("invalid options: {0}")]
    Options(#[from] serde_json::Error),

    /// A listener failed while handling an event.
    ///
    /// The registry hands this back from `emit` exactly as the listener
    /// returned it; listeners registered after the failing one are not called.
    #[error("listener failed: {0}")]
    Listener(#[source] BoxError),
}

impl Error {
    /// Creates an [`Error::InvalidArgument`] with the given message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Wraps an arbitrary error raised inside a listener.
    pub fn listener(source: impl Into<BoxError>) -> Self {
        Self::Listener(source.into())
    }

    /// Returns `true` if this is an [`Error::InvalidArgument`].
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

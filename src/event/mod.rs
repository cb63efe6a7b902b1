// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event identifiers.
//!
//! Events are addressed by an [`EventKey`]: either a name chosen by the
//! caller or the reserved wildcard [`EventKey::Any`], which observes every
//! emission.

mod key;

pub use key::{ANY, EventKey};

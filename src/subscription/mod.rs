// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device state changes.
//!
//! Listeners are called synchronously, on the task that made the change,
//! once per real state change.
//!
//! # Overview
//!
//! - [`Listener`] - A shareable callback handle; its identity drives deduplication
//! - [`SubscriptionId`] - A unique identifier returned on registration
//! - [`CallbackRegistry`] - Registry that stores listeners in order and dispatches changes
//! - [`Subscribable`] - Trait for types that accept listeners
//!
//! # Usage
//!
//! ```
//! use iot_simulator::Hub;
//! use iot_simulator::subscription::Subscribable;
//!
//! let hub = Hub::new();
//! hub.on_state_changed(|device_id, state| {
//!     println!("Device '{device_id}' updated state to: {state}");
//! });
//!
//! hub.set_device_state("light_1", true);
//! ```
//!
//! There is no unsubscribe: listeners live as long as the hub.

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, Listener, ListenerFailure, SubscriptionId};
pub use subscribable::Subscribable;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that push state-change notifications.

use crate::subscription::{Listener, SubscriptionId};
use crate::types::DeviceValue;

/// Trait for types that accept state-change listeners.
///
/// # Examples
///
/// ```
/// use iot_simulator::Hub;
/// use iot_simulator::subscription::{Listener, Subscribable};
///
/// let hub = Hub::new();
///
/// let listener = Listener::new(|device_id, state| {
///     println!("{device_id} is now {state}");
/// });
///
/// // Registering the same handle twice is a no-op
/// let first = hub.register_callback(listener.clone());
/// let second = hub.register_callback(listener);
/// assert_eq!(first, second);
///
/// // Closures can be registered directly
/// hub.on_state_changed(|device_id, state| {
///     println!("{device_id}: {state}");
/// });
/// ```
pub trait Subscribable {
    /// Registers a listener.
    ///
    /// Registering a handle that is already registered returns its existing
    /// [`SubscriptionId`] and does not add a second registration.
    fn register_callback(&self, listener: Listener) -> SubscriptionId;

    /// Registers a closure as a new listener.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str, &DeviceValue) + Send + Sync + 'static,
    {
        self.register_callback(Listener::new(callback))
    }
}

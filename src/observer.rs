// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observability records emitted by the hub.
//!
//! The hub reports side-channel events (simulation toggles, listener
//! failures) to a [`HubObserver`] instead of writing to a global logger.
//! [`TracingObserver`] is the default and forwards everything to `tracing`.

use crate::subscription::SubscriptionId;

/// Receives observability records from a [`Hub`](crate::Hub).
///
/// Implementations must be cheap: they run on the mutating task.
pub trait HubObserver: Send + Sync {
    /// Called after a device's simulation flag has been set.
    fn simulation_toggled(&self, device_id: &str, enabled: bool);

    /// Called when a listener panicked while being notified.
    fn listener_failed(&self, subscription: SubscriptionId, device_id: &str, message: &str);
}

/// Formats the human-readable toggle message.
///
/// ```
/// assert_eq!(
///     iot_simulator::observer::toggle_message("temp_1", false),
///     "Simulation for temp_1 is now off"
/// );
/// ```
#[must_use]
pub fn toggle_message(device_id: &str, enabled: bool) -> String {
    format!(
        "Simulation for {device_id} is now {}",
        if enabled { "on" } else { "off" }
    )
}

/// Default observer writing records through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl HubObserver for TracingObserver {
    fn simulation_toggled(&self, device_id: &str, enabled: bool) {
        tracing::info!(
            device_id = %device_id,
            enabled,
            "{}",
            toggle_message(device_id, enabled)
        );
    }

    fn listener_failed(&self, subscription: SubscriptionId, device_id: &str, message: &str) {
        tracing::warn!(
            %subscription,
            device_id = %device_id,
            error = %message,
            "Listener failed while handling state change"
        );
    }
}

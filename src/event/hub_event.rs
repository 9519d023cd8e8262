// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hub event types.

use crate::types::DeviceValue;

/// Events published by the hub.
///
/// # Examples
///
/// ```
/// use iot_simulator::event::HubEvent;
/// use iot_simulator::types::DeviceValue;
///
/// let event = HubEvent::state_changed("temp_1", DeviceValue::Number(21.2));
/// assert_eq!(event.device_id(), "temp_1");
///
/// let toggled = HubEvent::simulation_toggled("temp_1", false);
/// assert!(!toggled.is_state_change());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HubEvent {
    /// A device's state really changed.
    StateChanged {
        /// The device that changed.
        device_id: String,
        /// The new state.
        state: DeviceValue,
    },

    /// A device's simulation flag was set.
    SimulationToggled {
        /// The affected device.
        device_id: String,
        /// The new flag value.
        enabled: bool,
    },
}

impl HubEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> &str {
        match self {
            Self::StateChanged { device_id, .. } | Self::SimulationToggled { device_id, .. } => {
                device_id
            }
        }
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(device_id: impl Into<String>, state: DeviceValue) -> Self {
        Self::StateChanged {
            device_id: device_id.into(),
            state,
        }
    }

    /// Creates a simulation toggled event.
    #[must_use]
    pub fn simulation_toggled(device_id: impl Into<String>, enabled: bool) -> Self {
        Self::SimulationToggled {
            device_id: device_id.into(),
            enabled,
        }
    }
}

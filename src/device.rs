// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulated device representation.
//!
//! A [`Device`] is owned by the [`Hub`](crate::Hub), which is the only
//! component that mutates it. Consumers see devices through
//! [`DeviceSnapshot`]s.

use chrono::{DateTime, Utc};

use crate::types::{DeviceKind, DeviceValue};

/// One simulated entity: identity, kind and mutable state.
///
/// The unit and option list are derived from the kind at construction and
/// never change afterwards.
///
/// # Examples
///
/// ```
/// use iot_simulator::Device;
/// use iot_simulator::types::{DeviceKind, DeviceValue};
///
/// let mut device = Device::new("temp_1", "Living room", DeviceKind::Sensor, 21.0);
///
/// // Same value: nothing happens
/// assert!(!device.update_state(21.0));
///
/// // Different value: state is replaced
/// assert!(device.update_state(22.5));
/// assert_eq!(device.state(), &DeviceValue::Number(22.5));
/// ```
#[derive(Debug, Clone)]
pub struct Device {
    id: String,
    name: String,
    kind: DeviceKind,
    state: DeviceValue,
    simulation_enabled: bool,
    unit: Option<&'static str>,
    options: Option<Vec<String>>,
    last_changed: DateTime<Utc>,
}

impl Device {
    /// Creates a device with simulation enabled.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: DeviceKind,
        initial_state: impl Into<DeviceValue>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            state: initial_state.into(),
            simulation_enabled: true,
            unit: kind.unit(),
            options: kind.options(),
            last_changed: Utc::now(),
        }
    }

    /// Replaces the state if `new_state` differs from the current one.
    ///
    /// Returns `true` if the state actually changed. This equality check is
    /// the only thing deciding whether listeners get notified.
    pub fn update_state(&mut self, new_state: impl Into<DeviceValue>) -> bool {
        let new_state = new_state.into();
        if self.state == new_state {
            return false;
        }
        self.state = new_state;
        self.last_changed = Utc::now();
        true
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the device kind.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &DeviceValue {
        &self.state
    }

    /// Returns `true` if the background loop may perturb this device.
    #[must_use]
    pub fn simulation_enabled(&self) -> bool {
        self.simulation_enabled
    }

    pub(crate) fn set_simulation_enabled(&mut self, enabled: bool) {
        self.simulation_enabled = enabled;
    }

    /// Returns the unit of measure (sensors only).
    #[must_use]
    pub fn unit(&self) -> Option<&'static str> {
        self.unit
    }

    /// Returns the allowed options (selects only).
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    /// Returns when the state last changed.
    #[must_use]
    pub fn last_changed(&self) -> DateTime<Utc> {
        self.last_changed
    }

    /// Captures an owned, read-only copy of the device.
    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            state: self.state.clone(),
            unit: self.unit.map(str::to_string),
            options: self.options.clone(),
            simulation_enabled: self.simulation_enabled,
            last_changed: self.last_changed,
        }
    }
}

/// Read-only view of a device at one point in time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceSnapshot {
    /// Stable identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    /// Current state.
    pub state: DeviceValue,
    /// Unit of measure (sensors only).
    pub unit: Option<String>,
    /// Allowed options (selects only).
    pub options: Option<Vec<String>>,
    /// Whether the background loop may perturb the device.
    pub simulation_enabled: bool,
    /// When the state last changed.
    pub last_changed: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_device_has_simulation_enabled() {
        let device = Device::new("light_1", "Ceiling", DeviceKind::Switch, false);
        assert!(device.simulation_enabled());
    }

    #[test]
    fn update_state_with_same_value_is_noop() {
        let mut device = Device::new("light_1", "Ceiling", DeviceKind::Switch, false);
        let before = device.last_changed();

        assert!(!device.update_state(false));
        assert_eq!(device.state(), &DeviceValue::Bool(false));
        assert_eq!(device.last_changed(), before);
    }

    #[test]
    fn update_state_with_new_value_replaces_state() {
        let mut device = Device::new("temp_1", "Temp", DeviceKind::Sensor, 21.0);
        assert!(device.update_state(22.5));
        assert_eq!(device.state(), &DeviceValue::Number(22.5));
    }

    #[test]
    fn update_state_accepts_any_value_type() {
        let mut device = Device::new("light_1", "Ceiling", DeviceKind::Switch, false);
        assert!(device.update_state("not a bool"));
        assert_eq!(device.state().as_str(), Some("not a bool"));
    }

    #[test]
    fn derived_attributes_follow_kind() {
        let sensor = Device::new("t", "T", DeviceKind::Sensor, 0.0);
        assert_eq!(sensor.unit(), Some("\u{b0}C"));
        assert!(sensor.options().is_none());

        let select = Device::new("m", "M", DeviceKind::Select, "Eco");
        assert!(select.unit().is_none());
        assert_eq!(
            select.options(),
            Some(&["Eco".to_string(), "Comfort".to_string(), "Boost".to_string()][..])
        );

        let other = Device::new("x", "X", DeviceKind::Other, serde_json::json!({"a": 1}));
        assert!(other.unit().is_none());
        assert!(other.options().is_none());
    }

    #[test]
    fn snapshot_copies_all_fields() {
        let mut device = Device::new("temp_1", "Temp", DeviceKind::Sensor, 21.0);
        device.set_simulation_enabled(false);

        let snapshot = device.snapshot();
        assert_eq!(snapshot.id, "temp_1");
        assert_eq!(snapshot.name, "Temp");
        assert_eq!(snapshot.kind, DeviceKind::Sensor);
        assert_eq!(snapshot.state, DeviceValue::Number(21.0));
        assert_eq!(snapshot.unit.as_deref(), Some("\u{b0}C"));
        assert!(snapshot.options.is_none());
        assert!(!snapshot.simulation_enabled);
        assert_eq!(snapshot.last_changed, device.last_changed());
    }

    #[test]
    fn snapshot_serializes_kind_as_type() {
        let device = Device::new("mode_1", "Mode", DeviceKind::Select, "Eco");
        let json = serde_json::to_value(device.snapshot()).unwrap();

        assert_eq!(json["type"], "select");
        assert_eq!(json["state"], "Eco");
        assert_eq!(json["options"], serde_json::json!(["Eco", "Comfort", "Boost"]));
        assert_eq!(json["unit"], serde_json::Value::Null);
    }
}

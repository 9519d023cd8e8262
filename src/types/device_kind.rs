// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device type tags.

use std::fmt;
use std::str::FromStr;

/// Unit of measure reported by sensor devices.
pub const SENSOR_UNIT: &str = "\u{b0}C";

/// Options offered by select devices, in display order.
pub const SELECT_OPTIONS: [&str; 3] = ["Eco", "Comfort", "Boost"];

/// The type tag of a simulated device.
///
/// The tag decides which display attributes a device carries and which
/// perturbation rule the background loop applies to it.
///
/// # Examples
///
/// ```
/// use iot_simulator::types::DeviceKind;
///
/// assert_eq!(DeviceKind::Sensor.unit(), Some("\u{b0}C"));
/// assert_eq!(DeviceKind::Switch.unit(), None);
/// assert_eq!("select".parse::<DeviceKind>(), Ok(DeviceKind::Select));
/// assert_eq!("thermostat".parse::<DeviceKind>(), Ok(DeviceKind::Other));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Numeric reading that drifts over time.
    Sensor,
    /// On/off actuator.
    Switch,
    /// Choice among [`SELECT_OPTIONS`].
    Select,
    /// Any other type; carries an opaque value and is never simulated.
    #[serde(other)]
    Other,
}

impl DeviceKind {
    /// Returns the lowercase tag name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Switch => "switch",
            Self::Select => "select",
            Self::Other => "other",
        }
    }

    /// Unit of measure for this kind, only present for sensors.
    #[must_use]
    pub const fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Sensor => Some(SENSOR_UNIT),
            Self::Switch | Self::Select | Self::Other => None,
        }
    }

    /// Allowed options for this kind, only present for selects.
    #[must_use]
    pub fn options(&self) -> Option<Vec<String>> {
        match self {
            Self::Select => Some(SELECT_OPTIONS.iter().map(|o| (*o).to_string()).collect()),
            Self::Sensor | Self::Switch | Self::Other => None,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceKind {
    type Err = std::convert::Infallible;

    /// Unrecognised tags map to [`DeviceKind::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "sensor" => Self::Sensor,
            "switch" => Self::Switch,
            "select" => Self::Select,
            _ => Self::Other,
        })
    }
}

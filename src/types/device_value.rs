// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state values.

use std::fmt;

/// The state held by a simulated device.
///
/// Sensors hold a [`Number`](Self::Number), switches a [`Bool`](Self::Bool)
/// and selects a [`Text`](Self::Text) option. Devices of unknown kind carry
/// an opaque JSON value. The hub does not check that a value matches the
/// device kind.
///
/// Serialized untagged, so a value round-trips as a plain JSON scalar.
///
/// # Examples
///
/// ```
/// use iot_simulator::types::DeviceValue;
///
/// let temp = DeviceValue::from(21.5);
/// assert_eq!(temp.as_f64(), Some(21.5));
///
/// let on = DeviceValue::from(true);
/// assert_eq!(on.as_bool(), Some(true));
///
/// let mode = DeviceValue::from("Boost");
/// assert_eq!(mode.as_str(), Some("Boost"));
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum DeviceValue {
    /// Boolean state (switches).
    Bool(bool),
    /// Numeric state (sensors).
    Number(f64),
    /// String state (selects).
    Text(String),
    /// Anything else.
    Opaque(serde_json::Value),
}

impl DeviceValue {
    /// Returns the numeric value, if this is a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string value, if this is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DeviceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Opaque(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for DeviceValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for DeviceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for DeviceValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for DeviceValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DeviceValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for DeviceValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Opaque(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_none_for_other_variants() {
        let value = DeviceValue::from(true);
        assert_eq!(value.as_f64(), None);
        assert_eq!(value.as_str(), None);

        let value = DeviceValue::from(3.5);
        assert_eq!(value.as_bool(), None);
    }

    #[test]
    fn number_equality_is_numeric() {
        assert_eq!(DeviceValue::from(25), DeviceValue::from(25.0));
        assert_ne!(DeviceValue::from(25.0), DeviceValue::from(25.5));
    }

    #[test]
    fn different_variants_are_never_equal() {
        assert_ne!(DeviceValue::from(true), DeviceValue::from("true"));
        assert_ne!(DeviceValue::from(1.0), DeviceValue::from(true));
    }

    #[test]
    fn serializes_as_plain_json() {
        assert_eq!(serde_json::to_string(&DeviceValue::from(20.2)).unwrap(), "20.2");
        assert_eq!(serde_json::to_string(&DeviceValue::from(false)).unwrap(), "false");
        assert_eq!(
            serde_json::to_string(&DeviceValue::from("Eco")).unwrap(),
            "\"Eco\""
        );
    }

    #[test]
    fn deserializes_scalars_into_typed_variants() {
        let value: DeviceValue = serde_json::from_str("true").unwrap();
        assert_eq!(value, DeviceValue::Bool(true));

        let value: DeviceValue = serde_json::from_str("21").unwrap();
        assert_eq!(value, DeviceValue::Number(21.0));

        let value: DeviceValue = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(value, DeviceValue::Opaque(serde_json::json!([1, 2])));
    }

    #[test]
    fn display() {
        assert_eq!(DeviceValue::from(21.5).to_string(), "21.5");
        assert_eq!(DeviceValue::from(true).to_string(), "true");
        assert_eq!(DeviceValue::from("Boost").to_string(), "Boost");
    }
}

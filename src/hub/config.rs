// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration for the background simulation.

use std::time::Duration;

use crate::error::{Result, ValueError};

/// Default delay between two simulation iterations.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Default bound of the random sensor drift per iteration.
pub const DEFAULT_SENSOR_MAX_DELTA: f64 = 0.2;

/// Default threshold a unit draw must exceed to flip a switch.
pub const DEFAULT_SWITCH_TOGGLE_THRESHOLD: f64 = 0.9;

const MIN_SENSOR_DELTA: f64 = 0.01;
const MAX_SENSOR_DELTA: f64 = 100.0;

/// Tuning of the background simulation loop.
///
/// Missing fields fall back to their defaults when deserializing, so a
/// partial JSON document is enough.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use iot_simulator::hub::SimulationConfig;
///
/// let config = SimulationConfig::default()
///     .with_interval(Duration::from_secs(1))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
///
/// let config = SimulationConfig::from_json(r#"{ "interval_ms": 250 }"#).unwrap();
/// assert_eq!(config.interval, Duration::from_millis(250));
/// assert_eq!(config.switch_toggle_threshold, 0.9);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay between two iterations.
    #[serde(rename = "interval_ms", with = "duration_ms")]
    pub interval: Duration,
    /// Sensor drift is drawn from `[-sensor_max_delta, sensor_max_delta]`.
    pub sensor_max_delta: f64,
    /// A switch flips when a unit draw exceeds this value.
    pub switch_toggle_threshold: f64,
    /// Seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            sensor_max_delta: DEFAULT_SENSOR_MAX_DELTA,
            switch_toggle_threshold: DEFAULT_SWITCH_TOGGLE_THRESHOLD,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`](crate::Error::Parse) for malformed JSON and
    /// [`Error::Value`](crate::Error::Value) for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the delay between iterations.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the sensor drift bound.
    #[must_use]
    pub fn with_sensor_max_delta(mut self, max_delta: f64) -> Self {
        self.sensor_max_delta = max_delta;
        self
    }

    /// Sets the switch toggle threshold.
    #[must_use]
    pub fn with_switch_toggle_threshold(mut self, threshold: f64) -> Self {
        self.switch_toggle_threshold = threshold;
        self
    }

    /// Seeds the default random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::ZeroInterval`] for a zero interval and
    /// [`ValueError::OutOfRange`] for a drift bound outside `[0.01, 100]`
    /// or a threshold outside `[0, 1]`.
    pub fn validate(&self) -> std::result::Result<(), ValueError> {
        if self.interval.is_zero() {
            return Err(ValueError::ZeroInterval);
        }
        check_range(
            "sensor_max_delta",
            self.sensor_max_delta,
            MIN_SENSOR_DELTA,
            MAX_SENSOR_DELTA,
        )?;
        check_range(
            "switch_toggle_threshold",
            self.switch_toggle_threshold,
            0.0,
            1.0,
        )?;
        Ok(())
    }
}

fn check_range(
    name: &'static str,
    actual: f64,
    min: f64,
    max: f64,
) -> std::result::Result<(), ValueError> {
    if (min..=max).contains(&actual) {
        Ok(())
    } else {
        Err(ValueError::OutOfRange {
            name,
            min,
            max,
            actual,
        })
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert!((config.sensor_max_delta - 0.2).abs() < f64::EPSILON);
        assert!((config.switch_toggle_threshold - 0.9).abs() < f64::EPSILON);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = SimulationConfig::default().with_interval(Duration::ZERO);
        assert_eq!(config.validate(), Err(ValueError::ZeroInterval));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let config = SimulationConfig::default().with_switch_toggle_threshold(1.5);
        assert!(matches!(
            config.validate(),
            Err(ValueError::OutOfRange {
                name: "switch_toggle_threshold",
                ..
            })
        ));
    }

    #[test]
    fn tiny_sensor_delta_is_rejected() {
        let config = SimulationConfig::default().with_sensor_max_delta(0.001);
        assert!(matches!(
            config.validate(),
            Err(ValueError::OutOfRange {
                name: "sensor_max_delta",
                ..
            })
        ));
    }

    #[test]
    fn nan_is_rejected() {
        let config = SimulationConfig::default().with_sensor_max_delta(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_json_partial_document_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn from_json_rejects_invalid_values() {
        let result = SimulationConfig::from_json(r#"{ "interval_ms": 0 }"#);
        assert!(matches!(result, Err(Error::Value(ValueError::ZeroInterval))));
    }

    #[test]
    fn from_json_rejects_malformed_documents() {
        let result = SimulationConfig::from_json("{ interval_ms: ");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn serializes_interval_as_millis() {
        let config = SimulationConfig::default().with_interval(Duration::from_millis(1500));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["interval_ms"], 1500);
    }
}

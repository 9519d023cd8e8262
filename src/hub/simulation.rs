// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background simulation: perturbation rules and the task handle.

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::Result;
use crate::random::RandomSource;
use crate::types::{DeviceKind, DeviceValue};

use super::SimulationConfig;

/// Rounds to two decimal places.
///
/// Ties on the scaled value round away from zero, so a reading stored as
/// exactly `0.125` becomes `0.13`.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the next simulated state for a device.
///
/// Returns `None` when the kind has no rule or the current value does not
/// fit the rule (a sensor holding text, a switch holding a number). The
/// returned candidate may equal `current`; the caller decides whether that
/// is a change.
pub(crate) fn perturb(
    kind: DeviceKind,
    current: &DeviceValue,
    rng: &mut dyn RandomSource,
    config: &SimulationConfig,
) -> Option<DeviceValue> {
    match kind {
        DeviceKind::Sensor => current
            .as_f64()
            .map(|value| DeviceValue::Number(drift_sensor(value, rng, config.sensor_max_delta))),
        DeviceKind::Switch => current.as_bool().map(|on| {
            if rng.unit() > config.switch_toggle_threshold {
                DeviceValue::Bool(!on)
            } else {
                DeviceValue::Bool(on)
            }
        }),
        DeviceKind::Select | DeviceKind::Other => None,
    }
}

/// Applies a random drift that always moves the reading.
///
/// When the rounded drift leaves the value unchanged, the full `max_delta`
/// is applied against the direction of the draw.
#[allow(clippy::float_cmp)]
fn drift_sensor(value: f64, rng: &mut dyn RandomSource, max_delta: f64) -> f64 {
    let delta = round2(rng.uniform(-max_delta, max_delta));
    let next = round2(value + delta);
    if next != value {
        return next;
    }
    let forced = if delta <= 0.0 { max_delta } else { -max_delta };
    round2(value + forced)
}

/// Handle to a background simulation task.
///
/// Returned by [`Hub::start_background_updates`](super::Hub::start_background_updates).
/// Dropping the handle also stops the loop, immediately unless an iteration
/// is in progress.
#[derive(Debug)]
pub struct SimulationHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SimulationHandle {
    pub(crate) fn new(shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self { shutdown, task }
    }

    /// Returns `true` if the task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals the loop to stop and waits for it to finish.
    ///
    /// An iteration already in progress runs to completion first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskFailed`](crate::Error::TaskFailed) if the task
    /// panicked or was aborted.
    pub async fn stop(self) -> Result<()> {
        // The task may already be gone; joining reports why.
        let _ = self.shutdown.send(());
        self.task.await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Random source returning fixed draws.
    struct Fixed {
        uniform: f64,
        unit: f64,
    }

    impl RandomSource for Fixed {
        fn uniform(&mut self, _low: f64, _high: f64) -> f64 {
            self.uniform
        }

        fn unit(&mut self) -> f64 {
            self.unit
        }
    }

    fn run(kind: DeviceKind, current: DeviceValue, uniform: f64, unit: f64) -> Option<DeviceValue> {
        let mut rng = Fixed { uniform, unit };
        perturb(kind, &current, &mut rng, &SimulationConfig::default())
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(20.199_999), 20.2);
        assert_eq!(round2(-0.126), -0.13);
        assert_eq!(round2(1.0), 1.0);
        // 0.125 and 12.5 are exact in binary, so these are real ties
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn sensor_adds_rounded_delta() {
        let next = run(DeviceKind::Sensor, DeviceValue::Number(20.0), 0.2, 0.0);
        assert_eq!(next, Some(DeviceValue::Number(20.2)));

        let next = run(DeviceKind::Sensor, DeviceValue::Number(21.0), -0.123, 0.0);
        assert_eq!(next, Some(DeviceValue::Number(20.88)));
    }

    #[test]
    fn sensor_zero_delta_is_forced_up() {
        let next = run(DeviceKind::Sensor, DeviceValue::Number(21.0), 0.0, 0.0);
        assert_eq!(next, Some(DeviceValue::Number(21.2)));
    }

    #[test]
    fn sensor_delta_rounding_to_zero_is_forced() {
        // 0.004 rounds to 0.0, which counts as a non-positive draw
        let next = run(DeviceKind::Sensor, DeviceValue::Number(21.0), 0.004, 0.0);
        assert_eq!(next, Some(DeviceValue::Number(21.2)));

        // -0.004 rounds to -0.0, also non-positive
        let next = run(DeviceKind::Sensor, DeviceValue::Number(21.0), -0.004, 0.0);
        assert_eq!(next, Some(DeviceValue::Number(21.2)));
    }

    #[test]
    fn sensor_always_changes() {
        let mut rng = crate::random::StdRandom::seeded(99);
        let config = SimulationConfig::default();
        let mut value = DeviceValue::Number(21.0);

        for _ in 0..500 {
            let next = perturb(DeviceKind::Sensor, &value, &mut rng, &config).unwrap();
            assert_ne!(next, value);
            value = next;
        }
    }

    #[test]
    fn sensor_with_non_numeric_state_is_skipped() {
        assert_eq!(run(DeviceKind::Sensor, DeviceValue::from("hot"), 0.2, 0.0), None);
    }

    #[test]
    fn switch_flips_above_threshold() {
        let next = run(DeviceKind::Switch, DeviceValue::Bool(false), 0.0, 1.0);
        assert_eq!(next, Some(DeviceValue::Bool(true)));

        let next = run(DeviceKind::Switch, DeviceValue::Bool(true), 0.0, 0.95);
        assert_eq!(next, Some(DeviceValue::Bool(false)));
    }

    #[test]
    fn switch_stays_at_or_below_threshold() {
        let next = run(DeviceKind::Switch, DeviceValue::Bool(false), 0.0, 0.9);
        assert_eq!(next, Some(DeviceValue::Bool(false)));

        let next = run(DeviceKind::Switch, DeviceValue::Bool(false), 0.0, 0.1);
        assert_eq!(next, Some(DeviceValue::Bool(false)));
    }

    #[test]
    fn switch_with_non_boolean_state_is_skipped() {
        assert_eq!(run(DeviceKind::Switch, DeviceValue::Number(1.0), 0.0, 1.0), None);
    }

    #[test]
    fn select_and_other_have_no_rule() {
        assert_eq!(run(DeviceKind::Select, DeviceValue::from("Eco"), 0.2, 1.0), None);
        assert_eq!(
            run(DeviceKind::Other, DeviceValue::from(serde_json::json!({"x": 1})), 0.2, 1.0),
            None
        );
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the simulator.
//!
//! Device mutation is total: unknown device ids are ignored and failing
//! listeners are isolated. Errors only surface where a caller can get
//! something wrong, such as building an invalid [`SimulationConfig`] or
//! stopping a background task that died.
//!
//! [`SimulationConfig`]: crate::hub::SimulationConfig

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration value was rejected.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The background simulation task ended abnormally.
    #[error("simulation task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    /// A configuration document could not be parsed.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("{name} value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the rejected parameter.
        name: &'static str,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
        /// The actual value that was provided.
        actual: f64,
    },

    /// The update interval must be non-zero.
    #[error("update interval must be greater than zero")]
    ZeroInterval,

    /// The event stream needs room for at least one event.
    #[error("event capacity must be greater than zero")]
    ZeroCapacity,

    /// Two devices were given the same identifier.
    #[error("duplicate device id: {0}")]
    DuplicateDeviceId(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

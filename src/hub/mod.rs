// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device hub and its background simulation.
//!
//! # Overview
//!
//! The [`Hub`] owns a fixed set of simulated devices and is the only thing
//! that mutates them. It provides:
//!
//! - **Polling**: snapshots of every device via [`Hub::devices`]
//! - **Push notifications**: listeners called on every real state change
//! - **Event stream**: the same changes on a broadcast channel
//! - **Background simulation**: a periodic task that nudges sensors and
//!   switches, stoppable through a [`SimulationHandle`]
//!
//! # Background rules
//!
//! Every [`SimulationConfig::interval`] (5 seconds by default), for each
//! device with simulation enabled:
//!
//! - **sensor**: adds a drift drawn from `[-0.2, 0.2]`, rounded to two
//!   decimals. A drift that rounds to no change is replaced by a full step
//!   of 0.2, so every iteration moves the reading.
//! - **switch**: flips with probability 0.1.
//! - **select** and **other**: left alone.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use iot_simulator::Hub;
//! use iot_simulator::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> iot_simulator::Result<()> {
//!     let hub = Arc::new(Hub::new());
//!     hub.on_state_changed(|device_id, state| {
//!         println!("Device '{device_id}' updated state to: {state}");
//!     });
//!
//!     let simulation = hub.start_background_updates();
//!     hub.toggle_simulation("temp_1", false);
//!
//!     tokio::time::sleep(Duration::from_secs(20)).await;
//!     simulation.stop().await
//! }
//! ```

mod config;
mod device_hub;
mod simulation;

pub use config::{
    DEFAULT_INTERVAL, DEFAULT_SENSOR_MAX_DELTA, DEFAULT_SWITCH_TOGGLE_THRESHOLD, SimulationConfig,
};
pub use device_hub::{DEFAULT_EVENT_CAPACITY, Hub, HubBuilder};
pub use simulation::SimulationHandle;

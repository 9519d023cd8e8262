// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `iot_simulator` - An in-memory simulator of smart-home devices.
//!
//! The library keeps a handful of simulated devices (a temperature sensor,
//! a light switch and a heating mode selector) in a [`Hub`], lets consumers
//! poll and change their state, pushes every real change to registered
//! listeners, and runs a background task that makes the devices look alive.
//!
//! # Supported Features
//!
//! - **Polling**: read-only [`DeviceSnapshot`]s of every device
//! - **Callbacks**: listeners called once per real state change, never for no-ops
//! - **Event stream**: the same changes on a tokio broadcast channel
//! - **Background simulation**: sensors drift, switches flip now and then,
//!   per-device on/off, with an explicit stop handle
//! - **Observability**: toggles and listener failures go to an injectable
//!   [`HubObserver`](observer::HubObserver), `tracing` by default
//!
//! # Quick Start
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
//!
//!     for device in hub.devices() {
//!         println!("{}: {}", device.id, device.state);
//!     }
//!
//!     hub.on_state_changed(|device_id, state| {
//!         println!("Device '{device_id}' updated state to: {state}");
//!     });
//!
//!     let simulation = hub.start_background_updates();
//!
//!     hub.set_device_state("light_1", true);
//!     hub.set_device_state("mode_1", "Boost");
//!     hub.toggle_simulation("temp_1", false);
//!
//!     tokio::time::sleep(Duration::from_secs(20)).await;
//!     simulation.stop().await
//! }
//! ```

mod device;
pub mod error;
pub mod event;
pub mod hub;
pub mod observer;
pub mod random;
pub mod subscription;
pub mod types;

pub use device::{Device, DeviceSnapshot};
pub use error::{Error, Result, ValueError};
pub use hub::{Hub, HubBuilder, SimulationConfig, SimulationHandle};
pub use subscription::{Listener, Subscribable, SubscriptionId};
pub use types::{DeviceKind, DeviceValue};

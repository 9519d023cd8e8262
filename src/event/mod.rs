// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event stream for hub activity.
//!
//! Besides synchronous listeners, the hub publishes every real state change
//! and every simulation toggle as a [`HubEvent`] on a tokio broadcast
//! channel, so async consumers can follow the hub as a stream.
//!
//! # Examples
//!
//! ```
//! use iot_simulator::Hub;
//! use iot_simulator::event::HubEvent;
//! use iot_simulator::types::DeviceValue;
//!
//! let hub = Hub::new();
//! let mut rx = hub.subscribe();
//!
//! hub.set_device_state("light_1", true);
//! assert_eq!(
//!     rx.try_recv().unwrap(),
//!     HubEvent::state_changed("light_1", DeviceValue::Bool(true))
//! );
//! ```

mod hub_event;

pub use hub_event::HubEvent;

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for simulated devices.
//!
//! # Types
//!
//! - [`DeviceKind`] - Closed set of device type tags (sensor, switch, select, other)
//! - [`DeviceValue`] - The single state value a device holds
//! - [`SELECT_OPTIONS`] - The fixed option list offered by select devices

mod device_kind;
mod device_value;

pub use device_kind::{DeviceKind, SELECT_OPTIONS, SENSOR_UNIT};
pub use device_value::DeviceValue;

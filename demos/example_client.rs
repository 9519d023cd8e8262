// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Example client driving a simulated hub.
//!
//! Prints the initial device states, listens for updates, changes a few
//! devices by hand and lets the background simulation run for 20 seconds.
//!
//! Run with:
//!
//! ```sh
//! RUST_LOG=info cargo run --example example_client
//! ```

use std::sync::Arc;
use std::time::Duration;

use iot_simulator::Hub;
use iot_simulator::subscription::Subscribable;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> iot_simulator::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let hub = Arc::new(Hub::new());

    println!("Initial device states:");
    for device in hub.devices() {
        println!("  {}: {}", device.id, device.state);
    }

    hub.on_state_changed(|device_id, new_state| {
        println!("Device '{device_id}' updated state to: {new_state}");
    });

    let simulation = hub.start_background_updates();

    // Turn on the ceiling light and switch the heating mode
    hub.set_device_state("light_1", true);
    hub.set_device_state("mode_1", "Boost");

    hub.toggle_simulation("temp_1", false);

    tokio::time::sleep(Duration::from_secs(20)).await;

    simulation.stop().await
}

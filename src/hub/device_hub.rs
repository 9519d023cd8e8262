// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The hub owning simulated devices and their listeners.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tokio::sync::{broadcast, oneshot};

use crate::device::{Device, DeviceSnapshot};
use crate::error::{Result, ValueError};
use crate::event::HubEvent;
use crate::observer::{HubObserver, TracingObserver};
use crate::random::{RandomSource, StdRandom};
use crate::subscription::{CallbackRegistry, Listener, Subscribable, SubscriptionId};
use crate::types::{DeviceKind, DeviceValue};

use super::SimulationConfig;
use super::simulation::{SimulationHandle, perturb};

/// Capacity of the event stream unless the builder sets one.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// The devices every hub starts with, in enumeration order.
fn seed_devices() -> Vec<Device> {
    vec![
        Device::new("temp_1", "Wohnzimmer Temperatur", DeviceKind::Sensor, 21.0),
        Device::new("light_1", "Deckenlicht", DeviceKind::Switch, false),
        Device::new("mode_1", "Heizungsmodus", DeviceKind::Select, "Eco"),
    ]
}

/// Owner of the simulated devices.
///
/// The hub is the only component that mutates devices. Every real state
/// change, whether it comes from [`set_device_state`](Self::set_device_state)
/// or from the background loop, goes through the same path: the device
/// compares the new value with its current one, and only a difference
/// notifies the listeners (in registration order) and the event bus.
///
/// # Concurrency
///
/// The hub is `Send + Sync` and meant to be shared as `Arc<Hub>`. A single
/// re-entrant gate serializes each read, decide, write, notify sequence.
/// Device data is not locked while listeners run, so a listener may read
/// snapshots or even mutate the hub from the same thread. A state change
/// requested from inside a listener is queued and applied once the current
/// fan-out has reached every listener, so all listeners see changes in the
/// same order as the device.
///
/// # Examples
///
/// ```
/// use iot_simulator::Hub;
/// use iot_simulator::subscription::Subscribable;
/// use iot_simulator::types::DeviceValue;
///
/// let hub = Hub::new();
/// hub.on_state_changed(|device_id, state| {
///     println!("{device_id} -> {state}");
/// });
///
/// hub.set_device_state("light_1", true);
/// assert_eq!(hub.device("light_1").unwrap().state, DeviceValue::Bool(true));
///
/// // Unknown devices are ignored
/// hub.set_device_state("nonexistent", 1.0);
/// ```
pub struct Hub {
    devices: RwLock<Vec<Device>>,
    gate: ReentrantMutex<()>,
    callbacks: CallbackRegistry,
    fan_out: Mutex<FanOut>,
    events: broadcast::Sender<HubEvent>,
    rng: Mutex<Box<dyn RandomSource>>,
    observer: Arc<dyn HubObserver>,
    config: SimulationConfig,
}

impl Hub {
    /// Creates a hub with the three seed devices and default settings.
    ///
    /// | id | kind | initial state |
    /// |----|------|---------------|
    /// | `temp_1` | sensor | `21.0` |
    /// | `light_1` | switch | `false` |
    /// | `mode_1` | select | `"Eco"` |
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(
            seed_devices(),
            SimulationConfig::default(),
            Box::new(StdRandom::from_entropy()),
            Arc::new(TracingObserver),
            DEFAULT_EVENT_CAPACITY,
        )
    }

    /// Returns a builder for a hub with custom settings.
    #[must_use]
    pub fn builder() -> HubBuilder {
        HubBuilder::default()
    }

    fn from_parts(
        devices: Vec<Device>,
        config: SimulationConfig,
        rng: Box<dyn RandomSource>,
        observer: Arc<dyn HubObserver>,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity);
        Self {
            devices: RwLock::new(devices),
            gate: ReentrantMutex::new(()),
            callbacks: CallbackRegistry::new(),
            fan_out: Mutex::new(FanOut::default()),
            events,
            rng: Mutex::new(rng),
            observer,
            config,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns snapshots of all devices in enumeration order.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceSnapshot> {
        self.devices.read().iter().map(Device::snapshot).collect()
    }

    /// Returns a snapshot of one device.
    #[must_use]
    pub fn device(&self, device_id: &str) -> Option<DeviceSnapshot> {
        self.devices
            .read()
            .iter()
            .find(|d| d.id() == device_id)
            .map(Device::snapshot)
    }

    /// Returns all device ids in enumeration order.
    #[must_use]
    pub fn device_ids(&self) -> Vec<String> {
        self.devices
            .read()
            .iter()
            .map(|d| d.id().to_string())
            .collect()
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns the simulation settings.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Subscribes to the hub's event stream.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.events.subscribe()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Sets a device's state and notifies listeners if it really changed.
    ///
    /// Unknown device ids are ignored. The value is not checked against the
    /// device kind. Called from inside a listener, the change is applied
    /// after every listener has seen the change being dispatched.
    pub fn set_device_state(&self, device_id: &str, new_state: impl Into<DeviceValue>) {
        self.commit(device_id, new_state.into());
    }

    /// Enables or disables background simulation for one device.
    ///
    /// Unknown device ids are ignored. Listeners are not notified; the
    /// observer and the event stream are.
    pub fn toggle_simulation(&self, device_id: &str, enabled: bool) {
        let _gate = self.gate.lock();
        {
            let mut devices = self.devices.write();
            let Some(device) = devices.iter_mut().find(|d| d.id() == device_id) else {
                return;
            };
            device.set_simulation_enabled(enabled);
        }

        self.observer.simulation_toggled(device_id, enabled);
        self.publish(HubEvent::simulation_toggled(device_id, enabled));
    }

    /// Writes a candidate state and notifies on a real change.
    ///
    /// Returns `true` if the state changed. A commit issued while listeners
    /// are being called is queued and reports `false`; the outermost commit
    /// drains the queue before returning.
    fn commit(&self, device_id: &str, new_state: DeviceValue) -> bool {
        let _gate = self.gate.lock();
        {
            let mut fan_out = self.fan_out.lock();
            if fan_out.active {
                fan_out.pending.push_back((device_id.to_string(), new_state));
                return false;
            }
            fan_out.active = true;
        }
        let _drain = FanOutGuard(&self.fan_out);

        let changed = self.apply(device_id, new_state);
        loop {
            // Bind first so the queue lock is released before applying
            let next = self.fan_out.lock().pending.pop_front();
            let Some((queued_id, queued_state)) = next else {
                break;
            };
            self.apply(&queued_id, queued_state);
        }
        changed
    }

    fn apply(&self, device_id: &str, new_state: DeviceValue) -> bool {
        let changed = {
            let mut devices = self.devices.write();
            let Some(device) = devices.iter_mut().find(|d| d.id() == device_id) else {
                return false;
            };
            device.update_state(new_state.clone())
        };

        if changed {
            tracing::debug!(device_id = %device_id, state = %new_state, "Device state changed");
            self.notify(device_id, &new_state);
        }
        changed
    }

    fn notify(&self, device_id: &str, state: &DeviceValue) {
        for failure in self.callbacks.dispatch(device_id, state) {
            self.observer
                .listener_failed(failure.subscription, device_id, &failure.message);
        }
        self.publish(HubEvent::state_changed(device_id, state.clone()));
    }

    fn publish(&self, event: HubEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Background simulation
    // =========================================================================

    /// Runs one simulation iteration over every device, without waiting.
    ///
    /// Devices with simulation disabled are skipped. Returns the number of
    /// devices whose state changed.
    pub fn background_update_once(&self) -> usize {
        self.device_ids()
            .iter()
            .filter(|id| self.simulate_device(id))
            .count()
    }

    fn simulate_device(&self, device_id: &str) -> bool {
        let _gate = self.gate.lock();
        let Some((kind, current)) = self
            .devices
            .read()
            .iter()
            .find(|d| d.id() == device_id && d.simulation_enabled())
            .map(|d| (d.kind(), d.state().clone()))
        else {
            return false;
        };

        let candidate = {
            let mut rng = self.rng.lock();
            perturb(kind, &current, rng.as_mut(), &self.config)
        };

        match candidate {
            Some(next) => self.commit(device_id, next),
            None => false,
        }
    }

    /// Runs the simulation loop on the current task until `shutdown` resolves.
    ///
    /// Each cycle waits for the configured interval, then runs
    /// [`background_update_once`](Self::background_update_once). The wait is
    /// the only point where shutdown is observed.
    pub async fn run_background_updates<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::debug!(
            interval_ms = u64::try_from(self.config.interval.as_millis()).unwrap_or(u64::MAX),
            "Starting background simulation"
        );

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = tokio::time::sleep(self.config.interval) => {
                    let changed = self.background_update_once();
                    tracing::trace!(changed, "Simulation iteration finished");
                }
            }
        }

        tracing::debug!("Background simulation stopped");
    }

    /// Spawns the simulation loop as a tokio task.
    ///
    /// The loop runs until [`SimulationHandle::stop`] is called or the
    /// handle is dropped. Either one stops it immediately unless an
    /// iteration is in progress, which then runs to completion.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use = "dropping the handle stops the simulation"]
    pub fn start_background_updates(self: &Arc<Self>) -> SimulationHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let hub = Arc::clone(self);

        let task = tokio::spawn(async move {
            hub.run_background_updates(async move {
                // Resolves on an explicit stop and when the handle is dropped
                let _ = shutdown_rx.await;
            })
            .await;
        });

        SimulationHandle::new(shutdown_tx, task)
    }
}

/// Changes requested by listeners while a fan-out is running.
#[derive(Debug, Default)]
struct FanOut {
    active: bool,
    pending: VecDeque<(String, DeviceValue)>,
}

/// Ends a fan-out, even if an observer panics halfway.
struct FanOutGuard<'a>(&'a Mutex<FanOut>);

impl Drop for FanOutGuard<'_> {
    fn drop(&mut self) {
        let mut fan_out = self.0.lock();
        fan_out.active = false;
        fan_out.pending.clear();
    }
}

impl Subscribable for Hub {
    fn register_callback(&self, listener: Listener) -> SubscriptionId {
        self.callbacks.register(listener)
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("devices", &self.device_ids())
            .field("callbacks", &self.callbacks)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for a [`Hub`] with custom settings.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use iot_simulator::Hub;
/// use iot_simulator::hub::SimulationConfig;
///
/// let hub = Hub::builder()
///     .config(SimulationConfig::default().with_interval(Duration::from_secs(1)))
///     .build()
///     .unwrap();
/// assert_eq!(hub.config().interval, Duration::from_secs(1));
/// ```
#[derive(Default)]
pub struct HubBuilder {
    devices: Option<Vec<Device>>,
    config: SimulationConfig,
    rng: Option<Box<dyn RandomSource>>,
    observer: Option<Arc<dyn HubObserver>>,
    event_capacity: Option<usize>,
}

impl HubBuilder {
    /// Sets the simulation settings.
    #[must_use]
    pub fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the seed devices.
    ///
    /// Meant for tests and debugging; the regular hub always starts with
    /// the seed set.
    #[must_use]
    pub fn devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = Some(devices);
        self
    }

    /// Sets the random source, overriding any seed in the config.
    #[must_use]
    pub fn random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Sets the observability sink.
    #[must_use]
    pub fn observer(mut self, observer: Arc<dyn HubObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Sets the capacity of the event stream (256 by default).
    #[must_use]
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = Some(capacity);
        self
    }

    /// Builds the hub.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`](crate::Error::Value) if the config is invalid,
    /// the event capacity is zero or two devices share an id.
    pub fn build(self) -> Result<Hub> {
        self.config.validate()?;
        let event_capacity = self.event_capacity.unwrap_or(DEFAULT_EVENT_CAPACITY);
        if event_capacity == 0 {
            return Err(ValueError::ZeroCapacity.into());
        }

        let devices = self.devices.unwrap_or_else(seed_devices);
        {
            let mut seen = HashSet::new();
            for device in &devices {
                if !seen.insert(device.id()) {
                    return Err(ValueError::DuplicateDeviceId(device.id().to_string()).into());
                }
            }
        }

        let rng: Box<dyn RandomSource> = match (self.rng, self.config.seed) {
            (Some(rng), _) => rng,
            (None, Some(seed)) => Box::new(StdRandom::seeded(seed)),
            (None, None) => Box::new(StdRandom::from_entropy()),
        };
        let observer: Arc<dyn HubObserver> = match self.observer {
            Some(observer) => observer,
            None => Arc::new(TracingObserver),
        };

        Ok(Hub::from_parts(
            devices,
            self.config,
            rng,
            observer,
            event_capacity,
        ))
    }
}

impl fmt::Debug for HubBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubBuilder")
            .field("config", &self.config)
            .field("event_capacity", &self.event_capacity)
            .finish_non_exhaustive()
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! This module provides the core types for managing listeners:
//!
//! - [`Listener`] - Shareable handle around a state-change callback
//! - [`SubscriptionId`] - Stable identifier assigned on registration
//! - [`CallbackRegistry`] - Ordered, duplicate-free registry that dispatches changes

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::types::DeviceValue;

/// Unique identifier for a registered listener.
///
/// IDs are unique within a hub's lifetime. Registering the same
/// [`Listener`] again yields the ID it was first given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type StateChangedCallback = Arc<dyn Fn(&str, &DeviceValue) + Send + Sync>;

/// Handle to a state-change callback.
///
/// A listener receives `(device_id, new_state)` for every real state change.
/// Its identity is the allocation it wraps: clones of one `Listener` are the
/// same listener, while two `Listener::new` calls with identical closures
/// are different listeners.
///
/// # Examples
///
/// ```
/// use iot_simulator::subscription::Listener;
///
/// let listener = Listener::new(|device_id, state| {
///     println!("{device_id} -> {state}");
/// });
/// let same = listener.clone();
/// assert!(listener.same_as(&same));
/// ```
#[derive(Clone)]
pub struct Listener(StateChangedCallback);

impl Listener {
    /// Wraps a closure in a new listener handle.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&str, &DeviceValue) + Send + Sync + 'static,
    {
        Self(Arc::new(callback))
    }

    /// Returns `true` if both handles refer to the same callback.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn call(&self, device_id: &str, state: &DeviceValue) {
        (self.0)(device_id, state);
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&Arc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// A listener that panicked during dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    /// The failing listener.
    pub subscription: SubscriptionId,
    /// The panic message, if one could be extracted.
    pub message: String,
}

/// Registry of state-change listeners.
///
/// Listeners are kept in registration order and dispatched in that order.
/// Dispatch works on a copy of the list, so a listener may register further
/// listeners without deadlocking; those only see later changes.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Registers a listener, unless it is already registered.
    ///
    /// Returns the listener's subscription ID, which is the existing one if
    /// the same handle was registered before.
    pub fn register(&self, listener: Listener) -> SubscriptionId {
        let mut listeners = self.listeners.write();
        if let Some((id, _)) = listeners.iter().find(|(_, l)| l.same_as(&listener)) {
            return *id;
        }
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        listeners.push((id, listener));
        id
    }

    /// Invokes every listener with the change, in registration order.
    ///
    /// A panicking listener does not stop the remaining ones; its failure is
    /// returned for the caller to report.
    pub fn dispatch(&self, device_id: &str, state: &DeviceValue) -> Vec<ListenerFailure> {
        let listeners = self.listeners.read().clone();
        let mut failures = Vec::new();

        for (id, listener) in &listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener.call(device_id, state)));
            if let Err(payload) = result {
                failures.push(ListenerFailure {
                    subscription: *id,
                    message: panic_message(payload.as_ref()),
                });
            }
        }

        failures
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Returns `true` if there are no registered listeners.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "listener panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registering_same_listener_twice_keeps_one() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let listener = Listener::new(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let id1 = registry.register(listener.clone());
        let id2 = registry.register(listener);

        assert_eq!(id1, id2);
        assert_eq!(registry.len(), 1);

        registry.dispatch("light_1", &DeviceValue::Bool(true));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distinct_listeners_get_distinct_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.register(Listener::new(|_, _| {}));
        let id2 = registry.register(Listener::new(|_, _| {}));

        assert_ne!(id1, id2);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn dispatch_follows_registration_order() {
        let registry = CallbackRegistry::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for name in ["cb1", "cb2", "cb3"] {
            let calls = calls.clone();
            registry.register(Listener::new(move |device_id, state| {
                calls.lock().push((name, device_id.to_string(), state.clone()));
            }));
        }

        registry.dispatch("temp_1", &DeviceValue::Number(42.0));

        let calls = calls.lock();
        assert_eq!(
            *calls,
            vec![
                ("cb1", "temp_1".to_string(), DeviceValue::Number(42.0)),
                ("cb2", "temp_1".to_string(), DeviceValue::Number(42.0)),
                ("cb3", "temp_1".to_string(), DeviceValue::Number(42.0)),
            ]
        );
    }

    #[test]
    fn panicking_listener_does_not_block_others() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let failing = registry.register(Listener::new(|_, _| panic!("boom")));
        registry.register(Listener::new(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        }));

        let failures = registry.dispatch("light_1", &DeviceValue::Bool(true));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(
            failures,
            vec![ListenerFailure {
                subscription: failing,
                message: "boom".to_string(),
            }]
        );
    }

    #[test]
    fn listener_can_register_during_dispatch() {
        let registry = Arc::new(CallbackRegistry::new());
        let registry_clone = registry.clone();

        registry.register(Listener::new(move |_, _| {
            registry_clone.register(Listener::new(|_, _| {}));
        }));

        registry.dispatch("light_1", &DeviceValue::Bool(true));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn panic_message_with_formatted_string() {
        let registry = CallbackRegistry::new();
        registry.register(Listener::new(|device_id, _| panic!("bad device {device_id}")));

        let failures = registry.dispatch("mode_1", &DeviceValue::from("Eco"));
        assert_eq!(failures[0].message, "bad device mode_1");
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.register(Listener::new(|_, _| {}));

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}

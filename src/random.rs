// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Random draws used by the background simulation.
//!
//! The hub never calls `rand` directly; it asks a [`RandomSource`]. The
//! default [`StdRandom`] wraps a seedable [`StdRng`], and tests can plug in
//! a source that returns fixed draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of random draws for the background loop.
pub trait RandomSource: Send {
    /// Draws uniformly from the closed interval `[low, high]`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Draws uniformly from `[0, 1)`.
    fn unit(&mut self) -> f64;
}

/// Default random source backed by [`StdRng`].
///
/// # Examples
///
/// ```
/// use iot_simulator::random::{RandomSource, StdRandom};
///
/// let mut a = StdRandom::seeded(7);
/// let mut b = StdRandom::seeded(7);
/// assert_eq!(a.unit(), b.unit());
///
/// let draw = a.uniform(-0.2, 0.2);
/// assert!((-0.2..=0.2).contains(&draw));
/// ```
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Creates a source seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible source from a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.random_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

//! Time source seam.
//!
//! The gate compares absolute expiry timestamps against "now". In the browser
//! that is `Date.now()`; tests drive a [`ManualClock`] forward explicitly.

use std::cell::Cell;

/// Monotonic-enough wall clock in milliseconds since the epoch.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: f64) -> Self {
        Self { now: Cell::new(start_ms) }
    }

    /// Move the clock forward by `ms`.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

//! Time source and small timing helpers.
//!
//! All controller timing flows through an injected [`Clock`] so tests can
//! drive the state machine deterministically instead of sleeping.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source injected into the carousel.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock used by real hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and advance time while the carousel holds another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Move the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += step;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock lock")
    }
}

/// Time left of `delay` given that the countdown was armed at `armed_at`.
#[inline]
pub(crate) fn remaining_after(delay: Duration, armed_at: Instant, now: Instant) -> Duration {
    delay.saturating_sub(now.duration_since(armed_at))
}

/// Duration as fractional milliseconds, the unit easing curves sample in.
#[inline]
pub(crate) fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

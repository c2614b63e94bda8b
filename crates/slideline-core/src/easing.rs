//! Pure easing functions for the slide transition.
//!
//! Curves use the classic tweening signature `(elapsed, begin, delta,
//! duration) -> value` so a panel offset can be sampled directly from the
//! animation clock without a separate lerp step.

use serde::{Deserialize, Serialize};

/// Easing function signature: `(elapsed, begin, delta, duration) -> value`.
///
/// `elapsed` and `duration` share a unit (milliseconds in practice);
/// `begin` is the offset at time zero and `delta` the total distance.
pub type EaseFn = fn(f64, f64, f64, f64) -> f64;

/// Easing curve applied to the cross transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Cubic ease-in-out: slow at both ends, fast in the middle.
    CubicInOut,
    /// Constant-rate interpolation ("ease none").
    Linear,
    /// Caller-supplied curve.
    #[serde(skip)]
    Custom(EaseFn),
}

impl Default for Easing {
    fn default() -> Self {
        Self::CubicInOut
    }
}

impl Easing {
    /// Sample the curve at `elapsed` of `duration`.
    pub fn sample(&self, elapsed: f64, begin: f64, delta: f64, duration: f64) -> f64 {
        match self {
            Self::CubicInOut => cubic_in_out(elapsed, begin, delta, duration),
            Self::Linear => linear(elapsed, begin, delta, duration),
            Self::Custom(f) => f(elapsed, begin, delta, duration),
        }
    }
}

/// Cubic ease-in-out over the raw elapsed time.
pub fn cubic_in_out(elapsed: f64, begin: f64, delta: f64, duration: f64) -> f64 {
    let t = elapsed / (duration / 2.0);
    if t < 1.0 {
        delta / 2.0 * t * t * t + begin
    } else {
        let t = t - 2.0;
        delta / 2.0 * (t * t * t + 2.0) + begin
    }
}

/// Linear interpolation over the raw elapsed time.
pub fn linear(elapsed: f64, begin: f64, delta: f64, duration: f64) -> f64 {
    delta * elapsed / duration + begin
}

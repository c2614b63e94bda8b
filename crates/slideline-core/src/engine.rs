//! The transition engine: one timed cross transition between two panels.
//!
//! The engine is driven by the host's frame callbacks rather than a fixed
//! tick, so the animation stays smooth regardless of the rendering rate.

use std::time::{Duration, Instant};

use crate::easing::Easing;
use crate::panel::Panel;
use crate::timing;

/// One side of a cross transition.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target {
    pub panel: usize,
    pub from: f64,
    pub to: f64,
}

/// Outcome of a single animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Still interpolating; keep scheduling frames.
    Running,
    /// Every target snapped to its final offset this step.
    Settled,
}

/// A timed cross transition: the outgoing panel slides visible->end while
/// the incoming panel slides start->visible.
///
/// The start timestamp is captured on the first step. The outgoing target
/// (first in the pair) gates completion; once its elapsed time reaches the
/// duration, all targets snap to their exact end offsets so no rounding
/// drift survives the animation.
#[derive(Debug, Clone)]
pub(crate) struct Transition {
    targets: [Target; 2],
    duration: Duration,
    easing: Easing,
    started: Option<Instant>,
}

impl Transition {
    pub fn new(outgoing: Target, incoming: Target, duration: Duration, easing: Easing) -> Self {
        Self {
            targets: [outgoing, incoming],
            duration,
            easing,
            started: None,
        }
    }

    /// Advance the transition to `now`, writing offsets into `panels`.
    ///
    /// Targets are evaluated in reverse order, so when both sides address
    /// the same panel (single-slide wrap) the outgoing offset wins.
    pub fn step<P: Panel>(
        &mut self,
        now: Instant,
        panels: &mut [P],
        property: &str,
        unit: &str,
    ) -> Step {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.duration_since(started);

        if elapsed >= self.duration {
            for target in self.targets.iter().rev() {
                panels[target.panel].set_offset(property, target.to, unit);
            }
            return Step::Settled;
        }

        let elapsed_ms = timing::millis(elapsed);
        let duration_ms = timing::millis(self.duration);
        for target in self.targets.iter().rev() {
            let value = self
                .easing
                .sample(elapsed_ms, target.from, target.to - target.from, duration_ms);
            panels[target.panel].set_offset(property, value, unit);
        }
        Step::Running
    }
}

//! The carousel controller: index state machine, autoplay countdown, and
//! transition invocation.
//!
//! The controller owns the container and panel set and is driven by its
//! host: `on_frame()` advances the animation and fires due autoplay ticks,
//! `set_hidden()` forwards visibility changes. Real-time hosts can wrap it
//! in [`crate::driver::CarouselDriver`]; synchronous hosts call `on_frame`
//! from their own loop.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::{CarouselConfig, SlideOffsets};
use crate::engine::{Step, Target, Transition};
use crate::error::{Error, Result};
use crate::panel::{self, Container};
use crate::timing::{self, Clock, SystemClock};

/// Index-change callback: `(previous, new)` for `on_change`,
/// `(settled, upcoming)` for `on_change_end`.
pub type ChangeHook = Box<dyn FnMut(usize, usize) + Send>;

/// What a frame step observed. Hosts use this to decide when to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No active transition and no autoplay tick due.
    Idle,
    /// The active transition advanced.
    Animating,
    /// The active transition reached its end offsets this frame.
    Settled,
    /// An autoplay tick fired; a new transition just started.
    Ticked,
}

/// The slide carousel state machine.
pub struct Carousel<C: Container, K: Clock = SystemClock> {
    container: C,
    config: CarouselConfig,
    clock: K,
    panels: Vec<C::Panel>,
    offsets: SlideOffsets,
    current: usize,
    /// Panel animating in during the active/last transition
    inserted: Option<usize>,
    /// Panel animating out during the active/last transition
    removed: Option<usize>,
    transition: Option<Transition>,
    /// Time until the next autoplay tick, recomputed on pause
    remaining: Duration,
    /// When the countdown was armed; `None` while not armed
    armed_at: Option<Instant>,
    /// Pending autoplay tick
    deadline: Option<Instant>,
    visibility_hooked: bool,
    disposed: bool,
    on_change: Option<ChangeHook>,
    on_change_end: Option<ChangeHook>,
}

impl<C: Container> Carousel<C> {
    /// Create a carousel over `container` using the wall clock.
    pub fn new(container: C, config: CarouselConfig) -> Self {
        Self::with_clock(container, config, SystemClock)
    }
}

impl<C: Container, K: Clock> Carousel<C, K> {
    /// Create a carousel with an injected time source.
    pub fn with_clock(container: C, config: CarouselConfig, clock: K) -> Self {
        let offsets = config.offsets(container.width());
        let remaining = config.delay();
        Self {
            container,
            config,
            clock,
            panels: Vec::new(),
            offsets,
            current: 0,
            inserted: None,
            removed: None,
            transition: None,
            remaining,
            armed_at: None,
            deadline: None,
            visibility_hooked: false,
            disposed: false,
            on_change: None,
            on_change_end: None,
        }
    }

    /// Set the hook fired synchronously when the index changes.
    pub fn on_change(mut self, hook: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(hook));
        self
    }

    /// Set the hook fired when a transition settles.
    pub fn on_change_end(mut self, hook: impl FnMut(usize, usize) + Send + 'static) -> Self {
        self.on_change_end = Some(Box::new(hook));
        self
    }

    /// Build the panel set and arm autoplay.
    ///
    /// No slide state is established (and autoplay never starts) when the
    /// container has no children.
    pub fn start(&mut self) -> Result<()> {
        self.reset()?;
        self.start_interval();
        Ok(())
    }

    /// (Re)initialize the panel set and slide state. No-op when the
    /// container currently has no children.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_live()?;

        let panels = panel::init_panels(
            &mut self.container,
            &self.config.transition_property,
            &self.config.unit,
            self.offsets.start,
            self.offsets.visible,
        );
        if panels.is_empty() {
            debug!("reset skipped: container has no panels");
            return Ok(());
        }

        self.panels = panels;
        self.current = 0;
        self.inserted = None;
        self.removed = None;
        self.transition = None;
        self.remaining = self.config.delay();
        Ok(())
    }

    /// Current settled index.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Wrap-around successor of the current index; does not mutate state.
    pub fn next_index(&self) -> usize {
        match self.panels.len() {
            0 => 0,
            len => (self.current + 1) % len,
        }
    }

    /// Wrap-around predecessor of the current index; does not mutate state.
    pub fn prev_index(&self) -> usize {
        match self.panels.len() {
            0 => 0,
            len => (self.current + len - 1) % len,
        }
    }

    /// True iff autoplay is not configured off and there is more than one
    /// panel. Orthogonal to `pause()`/`resume()`, which only suspend the
    /// countdown.
    pub fn is_autoplay(&self) -> bool {
        !self.config.paused && self.panels.len() > 1
    }

    /// True while autoplay applies but the countdown is suspended, either
    /// by `pause()` or by a hidden host. Always false when `is_autoplay()`
    /// is false.
    pub fn is_paused(&self) -> bool {
        self.is_autoplay() && self.deadline.is_none()
    }

    /// Number of panels in the set (zero before a successful `reset`).
    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Start a transition from the current panel to `target`.
    ///
    /// `current_index` is updated and `on_change(previous, target)` fires
    /// before this returns; the visual transition completes later. Any
    /// in-flight transition is replaced: its panels are demoted in stack
    /// order and abandoned at whatever offset they had reached, and its
    /// `on_change_end` never fires.
    pub fn change(&mut self, target: usize) -> Result<()> {
        self.ensure_live()?;
        if self.panels.is_empty() {
            return Ok(());
        }
        if target >= self.panels.len() {
            return Err(Error::InvalidIndex {
                index: target,
                len: self.panels.len(),
            });
        }

        let previous = self.current;

        // Outgoing above the resting panels, incoming above the outgoing;
        // the previous transition's pair drops underneath both.
        panel::restack(&mut self.panels, self.removed, 1, previous, 3);
        panel::restack(&mut self.panels, self.inserted, 2, target, 4);
        self.removed = Some(previous);
        self.inserted = Some(target);

        self.transition = Some(Transition::new(
            Target {
                panel: previous,
                from: self.offsets.visible,
                to: self.offsets.end,
            },
            Target {
                panel: target,
                from: self.offsets.start,
                to: self.offsets.visible,
            },
            self.config.duration(),
            self.config.easing,
        ));

        self.current = target;
        debug!(from = previous, to = target, "slide change");
        if let Some(hook) = self.on_change.as_mut() {
            hook(previous, target);
        }
        Ok(())
    }

    /// Advance to the wrap-around next slide and restart the countdown.
    pub fn next(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.change(self.next_index())?;
        self.start_interval();
        Ok(())
    }

    /// Go back to the wrap-around previous slide and restart the countdown.
    pub fn prev(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.change(self.prev_index())?;
        self.start_interval();
        Ok(())
    }

    /// Suspend the autoplay countdown, capturing the time still owed so
    /// `resume()` picks up where it left off. Idempotent.
    pub fn pause(&mut self) -> Result<()> {
        self.ensure_live()?;
        if self.is_autoplay() {
            if let Some(armed_at) = self.armed_at.take() {
                self.remaining =
                    timing::remaining_after(self.config.delay(), armed_at, self.clock.now());
                debug!(remaining_ms = self.remaining.as_millis() as u64, "autoplay paused");
            }
            self.deadline = None;
        }
        Ok(())
    }

    /// Re-arm the countdown with the remaining time captured by `pause()`.
    pub fn resume(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.start_interval();
        Ok(())
    }

    /// Host visibility notification: hidden suspends the countdown, a
    /// return to visibility fully resets the carousel (index 0, full
    /// delay) and re-arms autoplay. Ignored until autoplay has been armed
    /// at least once, mirroring a listener that is only registered on the
    /// first arm.
    pub fn set_hidden(&mut self, hidden: bool) -> Result<()> {
        self.ensure_live()?;
        if !self.visibility_hooked {
            return Ok(());
        }
        if hidden {
            self.pause()
        } else {
            self.reset()?;
            self.start_interval();
            Ok(())
        }
    }

    /// Advance the carousel by one frame: fire a due autoplay tick, then
    /// step the active transition (settling it fires `on_change_end`).
    pub fn on_frame(&mut self) -> Result<FrameOutcome> {
        self.ensure_live()?;
        let now = self.clock.now();

        let mut ticked = false;
        if let Some(deadline) = self.deadline {
            if now >= deadline {
                self.remaining = self.config.delay();
                self.armed_at = Some(now);
                self.deadline = Some(now + self.remaining);
                let target = self.next_index();
                debug!(next = target, "autoplay tick");
                self.change(target)?;
                ticked = true;
            }
        }

        let outcome = match self.transition.as_mut() {
            Some(transition) => match transition.step(
                now,
                &mut self.panels,
                &self.config.transition_property,
                &self.config.unit,
            ) {
                Step::Running => FrameOutcome::Animating,
                Step::Settled => {
                    self.transition = None;
                    let settled = self.current;
                    let upcoming = self.next_index();
                    debug!(settled, upcoming, "transition settled");
                    if let Some(hook) = self.on_change_end.as_mut() {
                        hook(settled, upcoming);
                    }
                    FrameOutcome::Settled
                }
            },
            None => FrameOutcome::Idle,
        };

        Ok(if ticked { FrameOutcome::Ticked } else { outcome })
    }

    /// Earliest instant the host should call `on_frame` again, if any
    /// work is pending.
    pub fn next_wake(&self) -> Option<Instant> {
        let frame = self
            .transition
            .as_ref()
            .map(|_| self.clock.now() + self.config.frame_interval());
        match (self.deadline, frame) {
            (Some(deadline), Some(frame)) => Some(deadline.min(frame)),
            (deadline, frame) => deadline.or(frame),
        }
    }

    /// Terminal operation: cancel the countdown and the active transition
    /// and release panels and hooks. Every subsequent operation reports
    /// [`Error::Disposed`]; no callback fires after this returns.
    pub fn dispose(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.disposed = true;
        self.deadline = None;
        self.armed_at = None;
        self.transition = None;
        self.on_change = None;
        self.on_change_end = None;
        self.panels.clear();
        debug!("carousel disposed");
        Ok(())
    }

    /// Arm (or re-arm) the autoplay countdown with the current remaining
    /// time. The visibility hook becomes active on the first arm.
    fn start_interval(&mut self) {
        if !self.is_autoplay() {
            return;
        }
        let now = self.clock.now();
        self.armed_at = Some(now);
        self.deadline = Some(now + self.remaining);
        if !self.visibility_hooked {
            self.visibility_hooked = true;
            debug!("visibility handling armed");
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(Error::Disposed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::testing::{FakeContainer, FakePanel};
    use crate::timing::ManualClock;
    use std::sync::{Arc, Mutex};

    type TestCarousel = Carousel<FakeContainer, ManualClock>;

    fn rig(count: usize, config: CarouselConfig) -> (TestCarousel, Vec<FakePanel>, ManualClock) {
        let container = FakeContainer::with_panels(count);
        let cells = container.children.clone();
        let clock = ManualClock::new();
        let carousel = Carousel::with_clock(container, config, clock.clone());
        (carousel, cells, clock)
    }

    fn manual_config() -> CarouselConfig {
        // Autoplay off so tests drive every transition explicitly
        CarouselConfig {
            paused: true,
            start_value: Some(-100.0),
            visible_value: Some(0.0),
            end_value: Some(100.0),
            ..Default::default()
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_index_wrapping() {
        let (mut carousel, _, _) = rig(3, manual_config());
        carousel.start().unwrap();

        assert_eq!(carousel.current_index(), 0);
        assert_eq!(carousel.next_index(), 1);
        assert_eq!(carousel.prev_index(), 2);

        carousel.change(2).unwrap();
        assert_eq!(carousel.next_index(), 0);
        assert_eq!(carousel.prev_index(), 1);
    }

    #[test]
    fn test_single_panel_wraps_to_itself() {
        let (mut carousel, _, _) = rig(1, manual_config());
        carousel.start().unwrap();

        assert_eq!(carousel.next_index(), 0);
        assert_eq!(carousel.prev_index(), 0);
        // Manual navigation still functions
        carousel.next().unwrap();
        assert_eq!(carousel.current_index(), 0);
    }

    #[test]
    fn test_is_autoplay_conditions() {
        let (mut single, _, _) = rig(1, CarouselConfig::default());
        single.start().unwrap();
        assert!(!single.is_autoplay());

        let (mut paused, _, _) = rig(3, manual_config());
        paused.start().unwrap();
        assert!(!paused.is_autoplay());

        let (mut live, _, _) = rig(3, CarouselConfig::default());
        live.start().unwrap();
        assert!(live.is_autoplay());
    }

    #[test]
    fn test_change_is_synchronous() {
        let changes: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let seen = changes.clone();
        let (carousel, _, _) = rig(3, manual_config());
        let mut carousel = carousel.on_change(move |prev, new| {
            seen.lock().unwrap().push((prev, new));
        });
        carousel.start().unwrap();

        carousel.change(2).unwrap();
        // Index and hook both updated before change() returned
        assert_eq!(carousel.current_index(), 2);
        assert_eq!(changes.lock().unwrap().as_slice(), &[(0, 2)]);
    }

    #[test]
    fn test_change_rejects_out_of_range_index() {
        let (mut carousel, _, _) = rig(3, manual_config());
        carousel.start().unwrap();
        assert!(matches!(
            carousel.change(3),
            Err(Error::InvalidIndex { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_change_stack_orders() {
        let (mut carousel, cells, _) = rig(3, manual_config());
        carousel.start().unwrap();

        carousel.change(1).unwrap();
        assert_eq!(cells[0].stack_order(), 3);
        assert_eq!(cells[1].stack_order(), 4);

        // Second change: the old outgoing panel drops to 1; panel 1 is
        // promoted as the new outgoing (3) and then demoted as the old
        // incoming (2); the new incoming panel takes 4
        carousel.change(2).unwrap();
        assert_eq!(cells[0].stack_order(), 1);
        assert_eq!(cells[1].stack_order(), 2);
        assert_eq!(cells[2].stack_order(), 4);
    }

    #[test]
    fn test_two_panel_transition_scenario() {
        let ends: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let seen = ends.clone();
        let (carousel, cells, clock) = rig(2, manual_config());
        let mut carousel = carousel.on_change_end(move |settled, upcoming| {
            seen.lock().unwrap().push((settled, upcoming));
        });
        carousel.start().unwrap();

        carousel.next().unwrap();
        assert_eq!(carousel.current_index(), 1);

        // First frame captures the start timestamp
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Animating);

        clock.advance(ms(250));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Animating);
        assert!(cells[0].offset() > 0.0 && cells[0].offset() < 100.0);
        assert!(cells[1].offset() > -100.0 && cells[1].offset() < 0.0);

        clock.advance(ms(300));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Settled);
        assert_eq!(cells[0].offset(), 100.0);
        assert_eq!(cells[1].offset(), 0.0);
        assert_eq!(ends.lock().unwrap().as_slice(), &[(1, 0)]);

        // Settling is reported exactly once
        clock.advance(ms(100));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Idle);
        assert_eq!(ends.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_replaced_transition_never_settles() {
        let ends: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let seen = ends.clone();
        let (carousel, cells, clock) = rig(3, manual_config());
        let mut carousel = carousel.on_change_end(move |settled, upcoming| {
            seen.lock().unwrap().push((settled, upcoming));
        });
        carousel.start().unwrap();

        carousel.change(1).unwrap();
        carousel.on_frame().unwrap();
        clock.advance(ms(250));
        carousel.on_frame().unwrap();
        let abandoned = cells[0].offset();
        assert!(abandoned > 0.0 && abandoned < 100.0);

        // Replace mid-flight; the old pair stays where it was
        carousel.change(2).unwrap();
        carousel.on_frame().unwrap();
        clock.advance(ms(600));
        carousel.on_frame().unwrap();

        assert_eq!(cells[0].offset(), abandoned);
        assert_eq!(cells[2].offset(), 0.0);
        // Only the replacing transition reported completion
        assert_eq!(ends.lock().unwrap().as_slice(), &[(2, 0)]);
    }

    #[test]
    fn test_autoplay_round_trip() {
        let changes: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let seen = changes.clone();
        let (carousel, _, clock) = rig(3, CarouselConfig::default());
        let mut carousel = carousel.on_change(move |prev, new| {
            seen.lock().unwrap().push((prev, new));
        });
        carousel.start().unwrap();

        // Just short of the first tick: nothing fires
        clock.advance(ms(2999));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Idle);

        clock.advance(ms(1));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Ticked);

        // Let the transition settle, then wait out the second delay
        clock.advance(ms(600));
        carousel.on_frame().unwrap();
        clock.advance(ms(2400));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Ticked);

        assert_eq!(changes.lock().unwrap().as_slice(), &[(0, 1), (1, 2)]);
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn test_pause_resume_preserves_remaining_time() {
        let (mut carousel, _, clock) = rig(3, CarouselConfig::default());
        carousel.start().unwrap();

        clock.advance(ms(1000));
        carousel.pause().unwrap();
        carousel.resume().unwrap();

        // 2000ms were owed at pause time; the tick fires then, not at the
        // full delay and not early
        clock.advance(ms(1999));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Idle);
        clock.advance(ms(1));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Ticked);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let (mut carousel, _, clock) = rig(3, CarouselConfig::default());
        carousel.start().unwrap();

        clock.advance(ms(1000));
        carousel.pause().unwrap();
        clock.advance(ms(5000));
        carousel.pause().unwrap();
        carousel.resume().unwrap();

        clock.advance(ms(1999));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Idle);
        clock.advance(ms(1));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Ticked);
    }

    #[test]
    fn test_is_paused_tracks_countdown_state() {
        let (mut carousel, _, _) = rig(3, CarouselConfig::default());
        carousel.start().unwrap();
        assert!(!carousel.is_paused());

        carousel.pause().unwrap();
        assert!(carousel.is_paused());
        carousel.resume().unwrap();
        assert!(!carousel.is_paused());

        // A hidden host suspends the countdown the same way
        carousel.set_hidden(true).unwrap();
        assert!(carousel.is_paused());
        carousel.set_hidden(false).unwrap();
        assert!(!carousel.is_paused());

        // Without autoplay there is no countdown to suspend
        let (mut manual, _, _) = rig(3, manual_config());
        manual.start().unwrap();
        manual.pause().unwrap();
        assert!(!manual.is_paused());
    }

    #[test]
    fn test_manual_navigation_restarts_countdown() {
        let (mut carousel, _, clock) = rig(3, CarouselConfig::default());
        carousel.start().unwrap();

        clock.advance(ms(2500));
        carousel.on_frame().unwrap();
        carousel.next().unwrap();
        assert_eq!(carousel.current_index(), 1);

        // The old deadline (500ms away) was replaced with a full delay
        clock.advance(ms(2999));
        assert_ne!(carousel.on_frame().unwrap(), FrameOutcome::Ticked);
        clock.advance(ms(1));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Ticked);
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn test_visibility_ignored_before_first_arm() {
        let (mut carousel, _, _) = rig(3, manual_config());
        carousel.start().unwrap();
        carousel.change(2).unwrap();

        // Paused config means autoplay never armed; visibility is inert
        carousel.set_hidden(true).unwrap();
        carousel.set_hidden(false).unwrap();
        assert_eq!(carousel.current_index(), 2);
    }

    #[test]
    fn test_visibility_hidden_pauses_visible_resets() {
        let (mut carousel, _, clock) = rig(3, CarouselConfig::default());
        carousel.start().unwrap();

        clock.advance(ms(3000));
        carousel.on_frame().unwrap();
        assert_eq!(carousel.current_index(), 1);
        clock.advance(ms(600));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Settled);

        carousel.set_hidden(true).unwrap();
        clock.advance(ms(10_000));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Idle);

        // Back to visible: full reset to slide 0 and a full delay
        carousel.set_hidden(false).unwrap();
        assert_eq!(carousel.current_index(), 0);
        clock.advance(ms(2999));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Idle);
        clock.advance(ms(1));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Ticked);
    }

    #[test]
    fn test_empty_container_is_inert() {
        let (mut carousel, _, clock) = rig(0, CarouselConfig::default());
        carousel.start().unwrap();

        assert_eq!(carousel.panel_count(), 0);
        assert!(!carousel.is_autoplay());
        carousel.change(0).unwrap(); // silent no-op
        clock.advance(ms(10_000));
        assert_eq!(carousel.on_frame().unwrap(), FrameOutcome::Idle);
    }

    #[test]
    fn test_dispose_is_terminal() {
        let changes: Arc<Mutex<Vec<(usize, usize)>>> = Arc::default();
        let seen = changes.clone();
        let (carousel, _, clock) = rig(3, CarouselConfig::default());
        let mut carousel = carousel.on_change(move |prev, new| {
            seen.lock().unwrap().push((prev, new));
        });
        carousel.start().unwrap();

        carousel.dispose().unwrap();
        assert!(carousel.is_disposed());

        assert!(matches!(carousel.next(), Err(Error::Disposed)));
        assert!(matches!(carousel.on_frame(), Err(Error::Disposed)));
        assert!(matches!(carousel.dispose(), Err(Error::Disposed)));

        // A deadline that would have fired stays dead
        clock.advance(ms(10_000));
        assert!(matches!(carousel.on_frame(), Err(Error::Disposed)));
        assert!(changes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_next_wake_prefers_earliest() {
        let (mut carousel, _, clock) = rig(3, CarouselConfig::default());
        carousel.start().unwrap();

        // Countdown armed, no transition: wake at the deadline
        let wake = carousel.next_wake().unwrap();
        assert_eq!(wake - clock.now(), ms(3000));

        // Active transition: the frame interval wins
        carousel.change(1).unwrap();
        let wake = carousel.next_wake().unwrap();
        assert!(wake - clock.now() <= carousel.config().frame_interval());
    }
}

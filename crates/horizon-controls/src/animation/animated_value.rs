//! A scalar that moves towards its target over time.

use std::fmt;
use std::time::Instant;

use horizon_controls_core::Signal;
use horizon_controls_core::logging::targets;

use super::movement::{MotionDescriptor, MovementStrategy};

/// Payload of [`AnimatedValue::ticked`] and [`AnimatedValue::settled`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueEvent {
    /// The current value when the event was raised.
    pub value: f64,
    /// The target the value is moving to.
    pub target: f64,
    /// The frame time the event was raised for.
    pub at: Instant,
}

/// A value animated by a pluggable [`MovementStrategy`].
///
/// The owner calls [`advance`](Self::advance) once per frame. Reading
/// [`value`](Self::value) always returns the current (possibly mid-flight)
/// value.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use horizon_controls::animation::{AnimatedValue, LinearMove};
///
/// let start = Instant::now();
/// let mut x = AnimatedValue::new(0.0, &LinearMove::new(100.0));
/// x.retarget_at(50.0, start);
///
/// x.advance(start + Duration::from_millis(250));
/// assert_eq!(x.value(), 25.0);
///
/// x.advance(start + Duration::from_secs(1));
/// assert_eq!(x.value(), 50.0);
/// assert!(!x.is_running());
/// ```
pub struct AnimatedValue {
    current: f64,
    strategy: Box<dyn MovementStrategy>,
    motion: MotionDescriptor,
    started: Instant,
    /// Latest frame time seen by `advance`, `retarget_at` or `snap_at`.
    last_time: Option<Instant>,
    running: bool,
    updated_on_last: bool,
    snap_raises_settled: bool,
    /// Raised on every `advance` while moving, including the settling frame.
    pub ticked: Signal<ValueEvent>,
    /// Raised once when a transition completes.
    pub settled: Signal<ValueEvent>,
}

impl AnimatedValue {
    /// Create a settled value using a private copy of `strategy`.
    pub fn new(initial: f64, strategy: &dyn MovementStrategy) -> Self {
        Self {
            current: initial,
            strategy: strategy.clone_box(),
            motion: MotionDescriptor::at_rest(initial),
            started: Instant::now(),
            last_time: None,
            running: false,
            updated_on_last: false,
            snap_raises_settled: false,
            ticked: Signal::new(),
            settled: Signal::new(),
        }
    }

    /// Builder form of [`set_snap_raises_settled`](Self::set_snap_raises_settled).
    pub fn with_snap_raises_settled(mut self, enabled: bool) -> Self {
        self.snap_raises_settled = enabled;
        self
    }

    /// Make [`snap`](Self::snap) raise [`settled`](Self::settled) like a
    /// completed transition.
    pub fn set_snap_raises_settled(&mut self, enabled: bool) {
        self.snap_raises_settled = enabled;
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.motion.end
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the last [`advance`](Self::advance) moved the value.
    #[inline]
    pub fn was_updated(&self) -> bool {
        self.updated_on_last
    }

    /// The descriptor of the current (or last) transition.
    #[inline]
    pub fn motion(&self) -> &MotionDescriptor {
        &self.motion
    }

    /// Total length in seconds of the current transition; zero when settled.
    pub fn transition_duration(&self) -> f64 {
        if self.running {
            self.strategy.duration(&self.motion)
        } else {
            0.0
        }
    }

    /// Start moving towards `target`, timing from the last frame time this
    /// value was given.
    ///
    /// Values driven by an injected clock stay on that clock. Only a value
    /// that was never advanced or retargeted falls back to [`Instant::now`].
    pub fn retarget(&mut self, target: f64) {
        self.retarget_at(target, self.last_time());
    }

    /// Start moving towards `target`, timing from `now`.
    ///
    /// Does nothing if `target` is already the target. When retargeted
    /// mid-flight the new motion starts at the interpolated position at `now`
    /// and with the speed at `now`, so there is no jump.
    pub fn retarget_at(&mut self, target: f64, now: Instant) {
        self.last_time = Some(now);
        if target == self.motion.end {
            return;
        }

        let (start, initial_speed) = if self.running {
            let elapsed = self.elapsed(now);
            let position = self.strategy.position(&self.motion, elapsed);
            let speed = self.strategy.speed(&self.motion, elapsed);
            (
                if position.is_finite() { position } else { self.current },
                if speed.is_finite() { speed } else { 0.0 },
            )
        } else {
            (self.current, 0.0)
        };

        tracing::trace!(
            target: targets::ANIMATION,
            from = start,
            to = target,
            initial_speed,
            "retarget"
        );

        self.current = start;
        self.motion = MotionDescriptor::new(start, target, initial_speed);
        self.started = now;
        self.running = true;
    }

    /// Jump to `value`, discarding any transition in flight.
    ///
    /// A raised [`settled`](Self::settled) is stamped with the last frame
    /// time, as for [`retarget`](Self::retarget).
    pub fn snap(&mut self, value: f64) {
        self.snap_at(value, self.last_time());
    }

    /// Jump to `value` at frame time `now`.
    pub fn snap_at(&mut self, value: f64, now: Instant) {
        self.last_time = Some(now);
        self.current = value;
        self.motion = MotionDescriptor::at_rest(value);
        self.running = false;

        if self.snap_raises_settled {
            self.settled.emit(ValueEvent {
                value,
                target: value,
                at: now,
            });
        }
    }

    /// Snap to the current target, then use a copy of `strategy` from now on.
    pub fn set_strategy(&mut self, strategy: &dyn MovementStrategy) {
        let target = self.target();
        self.snap(target);
        self.strategy = strategy.clone_box();
    }

    /// Move the value to where it should be at `now`.
    pub fn advance(&mut self, now: Instant) {
        self.last_time = Some(now);
        if !self.running {
            self.updated_on_last = false;
            return;
        }

        let elapsed = self.elapsed(now);
        let duration = self.strategy.duration(&self.motion);

        if !duration.is_finite() || elapsed >= duration {
            self.current = self.motion.end;
            self.running = false;
            self.updated_on_last = true;

            let event = self.event(now);
            self.ticked.emit(event);
            self.settled.emit(event);
            return;
        }

        let position = self.strategy.position(&self.motion, elapsed);
        if position.is_finite() {
            self.current = position;
            self.updated_on_last = true;
        } else {
            tracing::trace!(
                target: targets::ANIMATION,
                elapsed,
                strategy = ?self.strategy,
                "discarding non-finite position"
            );
            self.updated_on_last = false;
        }

        self.ticked.emit(self.event(now));
    }

    fn last_time(&self) -> Instant {
        self.last_time.unwrap_or_else(Instant::now)
    }

    fn elapsed(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.started).as_secs_f64()
    }

    fn event(&self, at: Instant) -> ValueEvent {
        ValueEvent {
            value: self.current,
            target: self.motion.end,
            at,
        }
    }
}

impl fmt::Debug for AnimatedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimatedValue")
            .field("current", &self.current)
            .field("motion", &self.motion)
            .field("running", &self.running)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(AnimatedValue: Send, Sync);

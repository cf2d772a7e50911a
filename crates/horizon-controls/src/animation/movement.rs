//! Movement strategies: how an animated value travels from start to end.
//!
//! A [`MovementStrategy`] is a pure function of a [`MotionDescriptor`] and the
//! elapsed time. It holds only immutable configuration (a speed, a duration,
//! an easing curve), never the progress of a particular motion, so a single
//! strategy can be cloned into any number of [`AnimatedValue`]s that share a
//! motion style without sharing motion state.
//!
//! [`AnimatedValue`]: super::AnimatedValue

use std::fmt;

use super::easing::{Easing, ease, ease_slope};

/// Immutable snapshot of a single transition.
///
/// Created every time an animated value is given a new target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionDescriptor {
    /// Where the motion starts.
    pub start: f64,
    /// Where the motion ends.
    pub end: f64,
    /// Speed (units per second) at the start of the motion.
    pub initial_speed: f64,
}

impl MotionDescriptor {
    /// Create a new descriptor.
    #[inline]
    pub const fn new(start: f64, end: f64, initial_speed: f64) -> Self {
        Self {
            start,
            end,
            initial_speed,
        }
    }

    /// A motionless descriptor resting at `value`.
    #[inline]
    pub const fn at_rest(value: f64) -> Self {
        Self::new(value, value, 0.0)
    }

    /// Signed distance from start to end.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.end - self.start
    }
}

/// Computes position and speed over time for a transition.
///
/// # Contract
///
/// - `t` is elapsed seconds; implementations clamp it to
///   `[0, duration(motion)]`.
/// - `position(motion, t) == motion.end` for every `t >= duration(motion)`.
/// - `position(motion, 0.0) == motion.start` whenever the duration is
///   positive. A zero-duration motion is at `end` from the start.
/// - No side effects: the result depends only on the arguments and the
///   strategy's own configuration.
///
/// The owning [`AnimatedValue`](super::AnimatedValue) decides when a motion
/// is finished by comparing elapsed time with [`duration`](Self::duration).
pub trait MovementStrategy: fmt::Debug + Send + Sync {
    /// Total time in seconds the motion takes.
    fn duration(&self, motion: &MotionDescriptor) -> f64;

    /// Position at `t` seconds into the motion.
    fn position(&self, motion: &MotionDescriptor, t: f64) -> f64;

    /// Instantaneous speed (units per second) at `t` seconds into the motion.
    fn speed(&self, motion: &MotionDescriptor, t: f64) -> f64;

    /// Whether [`MotionDescriptor::initial_speed`] is honoured, so retargeting
    /// mid-flight keeps velocity continuous as well as position.
    fn preserves_velocity(&self) -> bool {
        false
    }

    /// Clone into a new box. Used to give every animated value its own copy.
    fn clone_box(&self) -> Box<dyn MovementStrategy>;
}

impl Clone for Box<dyn MovementStrategy> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[inline]
fn clamp_time(t: f64, duration: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, duration) }
}

/// Jumps straight to the end. Useful to disable animation without changing
/// the code that drives a value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InstantMove;

impl MovementStrategy for InstantMove {
    fn duration(&self, _motion: &MotionDescriptor) -> f64 {
        0.0
    }

    fn position(&self, motion: &MotionDescriptor, _t: f64) -> f64 {
        motion.end
    }

    fn speed(&self, _motion: &MotionDescriptor, _t: f64) -> f64 {
        0.0
    }

    fn clone_box(&self) -> Box<dyn MovementStrategy> {
        Box::new(*self)
    }
}

/// Constant-speed motion. Duration is `|distance| / speed`.
///
/// Non-positive or non-finite speeds complete instantly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMove {
    speed: f64,
}

impl LinearMove {
    /// Create a constant-speed strategy moving `speed` units per second.
    pub fn new(speed: f64) -> Self {
        Self { speed: speed.abs() }
    }

    /// The configured speed.
    pub fn speed_per_second(&self) -> f64 {
        self.speed
    }
}

impl MovementStrategy for LinearMove {
    fn duration(&self, motion: &MotionDescriptor) -> f64 {
        if self.speed > 0.0 && self.speed.is_finite() {
            motion.distance().abs() / self.speed
        } else {
            0.0
        }
    }

    fn position(&self, motion: &MotionDescriptor, t: f64) -> f64 {
        let duration = self.duration(motion);
        if t >= duration {
            return motion.end;
        }
        let t = clamp_time(t, duration);
        motion.start + motion.distance().signum() * self.speed * t
    }

    fn speed(&self, motion: &MotionDescriptor, t: f64) -> f64 {
        if t >= self.duration(motion) {
            0.0
        } else {
            motion.distance().signum() * self.speed
        }
    }

    fn clone_box(&self) -> Box<dyn MovementStrategy> {
        Box::new(*self)
    }
}

/// Fixed-duration motion shaped by an [`Easing`] curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedMove {
    duration: f64,
    easing: Easing,
}

impl EasedMove {
    /// Create an eased strategy taking `duration` seconds.
    pub fn new(duration: f64, easing: Easing) -> Self {
        Self {
            duration: duration.max(0.0),
            easing,
        }
    }

    /// The easing curve.
    pub fn easing(&self) -> Easing {
        self.easing
    }
}

impl MovementStrategy for EasedMove {
    fn duration(&self, _motion: &MotionDescriptor) -> f64 {
        self.duration
    }

    fn position(&self, motion: &MotionDescriptor, t: f64) -> f64 {
        if t >= self.duration {
            return motion.end;
        }
        let progress = clamp_time(t, self.duration) / self.duration;
        motion.start + motion.distance() * ease(self.easing, progress)
    }

    fn speed(&self, motion: &MotionDescriptor, t: f64) -> f64 {
        if t >= self.duration {
            return 0.0;
        }
        let progress = clamp_time(t, self.duration) / self.duration;
        motion.distance() / self.duration * ease_slope(self.easing, progress)
    }

    fn clone_box(&self) -> Box<dyn MovementStrategy> {
        Box::new(*self)
    }
}

/// Fixed-duration motion that starts at the descriptor's initial speed and
/// comes to rest at the end (cubic Hermite curve).
///
/// Because the initial speed is honoured, retargeting mid-flight never
/// produces a visible kink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothMove {
    duration: f64,
}

impl SmoothMove {
    /// Create a smooth strategy taking `duration` seconds.
    pub fn new(duration: f64) -> Self {
        Self {
            duration: duration.max(0.0),
        }
    }
}

impl MovementStrategy for SmoothMove {
    fn duration(&self, _motion: &MotionDescriptor) -> f64 {
        self.duration
    }

    fn position(&self, motion: &MotionDescriptor, t: f64) -> f64 {
        if t >= self.duration {
            return motion.end;
        }
        let s = clamp_time(t, self.duration) / self.duration;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;

        h00 * motion.start + h10 * self.duration * motion.initial_speed + h01 * motion.end
    }

    fn speed(&self, motion: &MotionDescriptor, t: f64) -> f64 {
        if t >= self.duration {
            return 0.0;
        }
        let s = clamp_time(t, self.duration) / self.duration;
        let s2 = s * s;

        let d00 = 6.0 * s2 - 6.0 * s;
        let d10 = 3.0 * s2 - 4.0 * s + 1.0;
        let d01 = -6.0 * s2 + 6.0 * s;

        (d00 * motion.start + d01 * motion.end) / self.duration + d10 * motion.initial_speed
    }

    fn preserves_velocity(&self) -> bool {
        true
    }

    fn clone_box(&self) -> Box<dyn MovementStrategy> {
        Box::new(*self)
    }
}

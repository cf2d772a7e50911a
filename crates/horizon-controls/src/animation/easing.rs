//! Easing functions for smooth animations.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a transformed
//! value that creates smoother, more natural-looking motion. They are the
//! shape behind [`EasedMove`](super::EasedMove).

use std::f64::consts::PI;

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing).
    #[default]
    Linear,
    /// Quadratic ease-in (starts slow, accelerates).
    EaseIn,
    /// Quadratic ease-out (starts fast, decelerates).
    EaseOut,
    /// Quadratic ease-in-out (smooth start and end).
    EaseInOut,
    /// Cubic ease-in (more pronounced than quadratic).
    EaseInCubic,
    /// Cubic ease-out (more pronounced than quadratic).
    EaseOutCubic,
    /// Cubic ease-in-out (more pronounced than quadratic).
    EaseInOutCubic,
    /// Sinusoidal ease-in.
    EaseInSine,
    /// Sinusoidal ease-out.
    EaseOutSine,
    /// Sinusoidal ease-in-out.
    EaseInOutSine,
}

/// Apply an easing function to a progress value.
///
/// `t` is clamped to `0.0..=1.0`; the result is `0.0` at `t == 0` and `1.0`
/// at `t == 1` for every curve.
///
/// ```
/// use horizon_controls::animation::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.5), 0.5);
/// assert!(ease(Easing::EaseIn, 0.5) < 0.5);
/// assert!(ease(Easing::EaseOut, 0.5) > 0.5);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::EaseInCubic => t * t * t,
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::EaseInOutCubic => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
        Easing::EaseInSine => 1.0 - ((t * PI) / 2.0).cos(),
        Easing::EaseOutSine => ((t * PI) / 2.0).sin(),
        Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
    }
}

/// Derivative of [`ease`] with respect to `t`.
///
/// Used to report instantaneous speed for eased motion.
#[inline]
pub fn ease_slope(easing: Easing, t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => 1.0,
        Easing::EaseIn => 2.0 * t,
        Easing::EaseOut => 2.0 * (1.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                4.0 * t
            } else {
                4.0 * (1.0 - t)
            }
        }
        Easing::EaseInCubic => 3.0 * t * t,
        Easing::EaseOutCubic => 3.0 * (1.0 - t).powi(2),
        Easing::EaseInOutCubic => {
            if t < 0.5 {
                12.0 * t * t
            } else {
                3.0 * (-2.0 * t + 2.0).powi(2)
            }
        }
        Easing::EaseInSine => (PI / 2.0) * ((t * PI) / 2.0).sin(),
        Easing::EaseOutSine => (PI / 2.0) * ((t * PI) / 2.0).cos(),
        Easing::EaseInOutSine => (PI / 2.0) * (PI * t).sin(),
    }
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * ease(easing, t)
}

//! Time-based value animation.
//!
//! An [`AnimatedValue`] owns a current value and a target. Each frame its
//! owner calls [`AnimatedValue::advance`], and the value follows a
//! [`MovementStrategy`] from where it was to where it is going. Retargeting
//! mid-flight starts the new motion from the interpolated position, so values
//! never jump.
//!
//! Stock strategies:
//! - [`InstantMove`]: no animation
//! - [`LinearMove`]: constant speed
//! - [`EasedMove`]: fixed duration shaped by an [`Easing`] curve
//! - [`SmoothMove`]: fixed duration, velocity-preserving

mod animated_value;
mod easing;
mod movement;

pub use animated_value::{AnimatedValue, ValueEvent};
pub use easing::{Easing, ease, ease_slope, lerp_eased};
pub use movement::{
    EasedMove, InstantMove, LinearMove, MotionDescriptor, MovementStrategy, SmoothMove,
};

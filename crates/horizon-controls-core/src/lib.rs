//! Core systems for Horizon Controls.
//!
//! This crate provides the foundation the control toolkit is built on:
//!
//! - **Errors**: the [`ControlsError`] taxonomy shared by every crate
//! - **Signal/Slot System**: [`Signal`] notifications for widgets and values
//! - **Geometry**: [`Point`], [`Size`], [`Rect`] and [`Color`]
//! - **Clocks**: the [`Clock`] abstraction over monotonic time
//! - **Logging**: `tracing` targets and a tree formatter for debugging
//!
//! # Signal Example
//!
//! ```
//! use horizon_controls_core::Signal;
//!
//! let clicked = Signal::<()>::new();
//! let id = clicked.connect(|_| println!("clicked"));
//! clicked.emit(());
//! clicked.disconnect(id);
//! ```

pub mod clock;
mod error;
pub mod geometry;
pub mod logging;
pub mod signal;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{ControlsError, Result};
pub use geometry::{Color, Point, Rect, Size};
pub use logging::{PerfSpan, TreeDebug, TreeFormatOptions, TreeStyle, format_tree};
pub use signal::{ConnectionGuard, ConnectionId, Signal};

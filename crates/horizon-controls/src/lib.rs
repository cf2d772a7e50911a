//! Horizon Controls - a retained-mode control toolkit for game-style UIs.
//!
//! The crate has two halves:
//!
//! - [`animation`]: [`AnimatedValue`](animation::AnimatedValue), a scalar
//!   that glides to its target under a pluggable
//!   [`MovementStrategy`](animation::MovementStrategy).
//! - The control hierarchy: widgets in a [`WidgetTree`](tree::WidgetTree),
//!   driven once per frame by a [`ControlManager`](manager::ControlManager)
//!   that hit-tests the pointer, routes keys to the focused widget and loads
//!   content down the tree.
//!
//! # Example
//!
//! ```
//! use horizon_controls::prelude::*;
//!
//! let mut manager = ControlManager::new(ManagerConfig::default());
//! let ok = manager
//!     .add(PushButton::new("OK").with_bounds(Rect::new(10.0, 10.0, 80.0, 24.0)))
//!     .unwrap();
//!
//! let mut pointer = ScriptedPointer::new();
//! pointer.push(PointerState::new(Point::new(20.0, 20.0)));
//! manager.tick(&mut pointer, &mut ());
//!
//! assert_eq!(manager.hovered(), Some(ok));
//! ```

pub use horizon_controls_core::*;

pub mod animation;
pub mod config;
pub mod content;
pub mod input;
pub mod loader;
pub mod manager;
pub mod prelude;
pub mod tree;
pub mod widget;

//! Widget system for Horizon Controls.
//!
//! This module provides the foundational widget architecture:
//!
//! - [`Widget`] trait: the base trait for all UI elements
//! - [`WidgetBase`]: common state every widget carries
//! - [`ControlMessage`]: the message vocabulary the input router delivers
//! - [`EventContext`]: how handlers queue focus changes and tree edits
//! - [`PaintContext`]/[`Canvas`]: the drawing interface
//!
//! Widgets live in a [`WidgetTree`](crate::tree::WidgetTree); the tree owns
//! them and hands them out by [`WidgetId`](crate::tree::WidgetId).
//!
//! # Creating a Widget
//!
//! ```
//! use horizon_controls::widget::{EventContext, MouseEventArgs, Widget, WidgetBase};
//!
//! struct Counter {
//!     base: WidgetBase,
//!     clicks: u32,
//! }
//!
//! impl Widget for Counter {
//!     fn widget_base(&self) -> &WidgetBase { &self.base }
//!     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
//!
//!     fn on_mouse_click(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
//!         self.clicks += 1;
//!         self.base.mouse_click.emit(*args);
//!     }
//! }
//! ```

mod base;
mod context;
mod events;
mod traits;
pub mod widgets;

pub use base::{BoundsChange, WidgetBase};
pub use context::{DeferredRequest, EventContext, FrameTime};
pub use events::{
    CharacterEventArgs, ControlMessage, KeyCode, KeyEventArgs, MouseButton, MouseButtons,
    MouseEventArgs,
};
pub use traits::{Canvas, PaintContext, Widget};

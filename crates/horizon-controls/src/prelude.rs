//! Prelude module for Horizon Controls.
//!
//! ```
//! use horizon_controls::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use crate::{Clock, Color, ControlsError, ManualClock, Point, Rect, Result, Signal, Size};

// ============================================================================
// Animation
// ============================================================================

pub use crate::animation::{
    AnimatedValue, EasedMove, Easing, InstantMove, LinearMove, MovementStrategy, SmoothMove,
};

// ============================================================================
// Control Hierarchy
// ============================================================================

pub use crate::config::ManagerConfig;
pub use crate::content::ContentHandle;
pub use crate::manager::ControlManager;
pub use crate::tree::{WidgetId, WidgetTree};

// ============================================================================
// Widgets and Events
// ============================================================================

pub use crate::widget::widgets::{Panel, PushButton, SwitchBox, SwitchBoxKind};
pub use crate::widget::{
    Canvas, CharacterEventArgs, ControlMessage, EventContext, FrameTime, KeyCode, KeyEventArgs,
    MouseButton, MouseButtons, MouseEventArgs, PaintContext, Widget, WidgetBase,
};

// ============================================================================
// Input
// ============================================================================

pub use crate::input::{ChannelKeySource, KeyEvent, PointerState, ScriptedPointer};

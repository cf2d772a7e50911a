//! Per-call contexts handed to widgets.
//!
//! Widgets never hold a reference to the tree or the manager. Anything an
//! event handler wants to change outside its own state is queued on the
//! [`EventContext`] and applied by the [`ControlManager`] at the end of the
//! tick, after the tree traversal that delivered the event has finished.
//!
//! [`ControlManager`]: crate::manager::ControlManager

use std::fmt;
use std::time::{Duration, Instant};

use horizon_controls_core::Point;

use crate::manager::ControlManager;
use crate::tree::WidgetId;

/// Timing of the frame being updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTime {
    /// When the frame started.
    pub now: Instant,
    /// Time since the previous frame. Zero on the first frame.
    pub delta: Duration,
}

impl FrameTime {
    pub fn new(now: Instant, delta: Duration) -> Self {
        Self { now, delta }
    }

    /// A frame at `now` with no elapsed time.
    pub fn first(now: Instant) -> Self {
        Self::new(now, Duration::ZERO)
    }
}

/// Work an event handler asked the manager to do later.
pub enum DeferredRequest {
    /// Move keyboard focus to a widget, or clear it with `None`.
    Focus(Option<WidgetId>),
    /// Run arbitrary code with full access to the manager, e.g. to add or
    /// remove widgets.
    Custom(Box<dyn FnOnce(&mut ControlManager) + Send + Sync>),
}

impl fmt::Debug for DeferredRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Focus(target) => f.debug_tuple("Focus").field(target).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Context passed to [`Widget::event`](super::Widget::event) and the `on_*`
/// hooks.
pub struct EventContext<'a> {
    widget: WidgetId,
    origin: Point,
    now: Instant,
    requests: &'a mut Vec<DeferredRequest>,
}

impl<'a> EventContext<'a> {
    /// Create a context for delivering a message to `widget`.
    pub fn new(widget: WidgetId, now: Instant, requests: &'a mut Vec<DeferredRequest>) -> Self {
        Self {
            widget,
            origin: Point::ZERO,
            now,
            requests,
        }
    }

    /// Set the receiving widget's UI-space origin (builder pattern).
    #[inline]
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// The widget receiving the message.
    #[inline]
    pub fn widget_id(&self) -> WidgetId {
        self.widget
    }

    /// UI-space position of the receiving widget's top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Convert a UI-space point, such as a mouse position, to widget-local
    /// coordinates.
    #[inline]
    pub fn to_local(&self, point: Point) -> Point {
        point - self.origin
    }

    /// The frame time the message belongs to. Use it to retarget animated
    /// values so they start moving from the frame they were triggered in.
    #[inline]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Ask for keyboard focus for the receiving widget.
    pub fn request_focus(&mut self) {
        self.requests.push(DeferredRequest::Focus(Some(self.widget)));
    }

    /// Ask for keyboard focus to be cleared.
    pub fn clear_focus(&mut self) {
        self.requests.push(DeferredRequest::Focus(None));
    }

    /// Run `f` on the manager at the end of the tick.
    pub fn defer<F>(&mut self, f: F)
    where
        F: FnOnce(&mut ControlManager) + Send + Sync + 'static,
    {
        self.requests.push(DeferredRequest::Custom(Box::new(f)));
    }

    /// Number of requests queued so far in this tick.
    pub fn pending(&self) -> usize {
        self.requests.len()
    }
}

//! Core widget trait definitions.
//!
//! # Key Types
//!
//! - [`Widget`] - Base trait for all UI elements
//! - [`PaintContext`] - Drawing context passed to [`Widget::paint`]
//! - [`Canvas`] - The drawing backend a host provides

use std::any::Any;

use horizon_controls_core::{Color, Rect};

use super::base::WidgetBase;
use super::context::{EventContext, FrameTime};
use super::events::{CharacterEventArgs, ControlMessage, KeyEventArgs, MouseEventArgs};
use crate::content::ContentHandle;

/// Drawing primitives a host renderer provides.
///
/// Rectangles are absolute, in UI space.
pub trait Canvas {
    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline `rect` with a `width`-pixel line.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);
}

/// Context provided during widget painting.
pub struct PaintContext<'a> {
    canvas: &'a mut dyn Canvas,
    /// Absolute bounds of the widget being painted.
    rect: Rect,
    focused: bool,
}

impl<'a> PaintContext<'a> {
    pub fn new(canvas: &'a mut dyn Canvas, rect: Rect) -> Self {
        Self {
            canvas,
            rect,
            focused: false,
        }
    }

    /// Set whether the widget holds focus (builder pattern).
    #[inline]
    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[inline]
    pub fn canvas(&mut self) -> &mut dyn Canvas {
        self.canvas
    }

    /// The widget's absolute bounds.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Fill a rectangle given relative to the widget's origin.
    pub fn fill_local(&mut self, local: Rect, color: Color) {
        let rect = local.translate(self.rect.origin);
        self.canvas.fill_rect(rect, color);
    }

    /// Outline the widget's bounds.
    pub fn draw_border(&mut self, color: Color, width: f32) {
        self.canvas.stroke_rect(self.rect, color, width);
    }
}

/// The base trait for all UI elements.
///
/// Implementors hold a [`WidgetBase`] and expose it through
/// [`widget_base`](Self::widget_base)/[`widget_base_mut`](Self::widget_base_mut).
/// Everything else has a default.
///
/// Input arrives through [`event`](Self::event). Its default implementation
/// forwards each [`ControlMessage`] to the matching `on_*` hook, and the
/// default hooks emit the corresponding [`WidgetBase`] signal. Override a
/// hook to react to one kind of message; override `event` to see all of them.
pub trait Widget: Any + Send + Sync {
    /// Get a reference to the widget base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// Type name used by tree dumps.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether this widget can hold children. Fixed for the widget's lifetime.
    fn is_container(&self) -> bool {
        false
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Clamp or quantize requested bounds before they are stored.
    fn adjust_bounds(&self, requested: Rect) -> Rect {
        requested
    }

    /// Set position and size.
    ///
    /// The request goes through [`adjust_bounds`](Self::adjust_bounds). Each of
    /// [`on_location_changed`](Self::on_location_changed) and
    /// [`on_size_changed`](Self::on_size_changed) runs once if, and only if,
    /// that part of the bounds actually changed.
    fn set_bounds(&mut self, requested: Rect) {
        let bounds = self.adjust_bounds(requested);
        let change = self.widget_base_mut().store_bounds(bounds);
        if change.location {
            self.on_location_changed();
        }
        if change.size {
            self.on_size_changed();
        }
    }

    fn bounds(&self) -> Rect {
        self.widget_base().bounds()
    }

    fn is_enabled(&self) -> bool {
        self.widget_base().is_enabled()
    }

    fn is_focused(&self) -> bool {
        self.widget_base().is_focused()
    }

    fn is_hovered(&self) -> bool {
        self.widget_base().is_hovered()
    }

    // =========================================================================
    // Event Handling
    // =========================================================================

    /// Handle a message.
    ///
    /// Returns `true` if a hook handled it. The default demultiplexes into the
    /// `on_*` hooks and reports `true`.
    fn event(&mut self, message: &ControlMessage, ctx: &mut EventContext<'_>) -> bool {
        match message {
            ControlMessage::KeyCharacter(args) => self.on_character_entered(args, ctx),
            ControlMessage::KeyDown(args) => self.on_key_down(args, ctx),
            ControlMessage::KeyUp(args) => self.on_key_up(args, ctx),
            ControlMessage::MouseMove(args) => self.on_mouse_move(args, ctx),
            ControlMessage::MouseDown(args) => self.on_mouse_down(args, ctx),
            ControlMessage::MouseUp(args) => self.on_mouse_up(args, ctx),
            ControlMessage::MouseClick(args) => self.on_mouse_click(args, ctx),
            ControlMessage::MouseWheel(args) => self.on_mouse_wheel(args, ctx),
            ControlMessage::MouseEnter => self.on_mouse_enter(ctx),
            ControlMessage::MouseLeave => self.on_mouse_leave(ctx),
            ControlMessage::GotFocus => self.on_got_focus(ctx),
            ControlMessage::LostFocus => self.on_lost_focus(ctx),
            ControlMessage::SizeChanged => self.on_size_changed(),
            ControlMessage::LocationChanged => self.on_location_changed(),
        }
        true
    }

    fn on_character_entered(&mut self, args: &CharacterEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().character_entered.emit(*args);
    }

    fn on_key_down(&mut self, args: &KeyEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().key_down.emit(*args);
    }

    fn on_key_up(&mut self, args: &KeyEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().key_up.emit(*args);
    }

    fn on_mouse_move(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().mouse_move.emit(*args);
    }

    fn on_mouse_down(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().mouse_down.emit(*args);
    }

    fn on_mouse_up(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().mouse_up.emit(*args);
    }

    fn on_mouse_click(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().mouse_click.emit(*args);
    }

    fn on_mouse_wheel(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
        self.widget_base().mouse_wheel.emit(*args);
    }

    fn on_mouse_enter(&mut self, _ctx: &mut EventContext<'_>) {
        self.widget_base().mouse_enter.emit(());
    }

    fn on_mouse_leave(&mut self, _ctx: &mut EventContext<'_>) {
        self.widget_base().mouse_leave.emit(());
    }

    fn on_got_focus(&mut self, _ctx: &mut EventContext<'_>) {
        self.widget_base().got_focus.emit(());
    }

    fn on_lost_focus(&mut self, _ctx: &mut EventContext<'_>) {
        self.widget_base().lost_focus.emit(());
    }

    fn on_size_changed(&mut self) {
        let size = self.widget_base().size();
        self.widget_base().size_changed.emit(size);
    }

    fn on_location_changed(&mut self) {
        let position = self.widget_base().position();
        self.widget_base().location_changed.emit(position);
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Advance per-frame state such as animated values.
    fn update(&mut self, _frame: &FrameTime) {}

    /// Draw the widget.
    fn paint(&self, _ctx: &mut PaintContext<'_>) {}

    // =========================================================================
    // Content
    // =========================================================================

    /// Acquire resources from `content`. Called once per load, parents first.
    fn load_content(&mut self, _content: &ContentHandle) {}

    /// Release resources taken from `content`. Called once per unload,
    /// children first.
    fn unload_content(&mut self, _content: &ContentHandle) {}
}

/// Downcast helpers for widget trait objects.
impl dyn Widget {
    /// Borrow as a concrete widget type.
    pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref::<T>()
    }

    /// Mutably borrow as a concrete widget type.
    pub fn downcast_mut<T: Widget>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut::<T>()
    }
}

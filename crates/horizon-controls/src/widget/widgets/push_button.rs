//! Push button widget implementation.
//!
//! # Example
//!
//! ```
//! use horizon_controls::widget::widgets::PushButton;
//!
//! let button = PushButton::new("OK");
//! button.clicked.connect(|_| println!("OK pressed"));
//! ```

use horizon_controls_core::{Color, Rect, Signal};

use crate::animation::{AnimatedValue, Easing, EasedMove};
use crate::config::ManagerConfig;
use crate::widget::{
    EventContext, FrameTime, KeyCode, KeyEventArgs, MouseButton, MouseEventArgs, PaintContext,
    Widget, WidgetBase,
};

/// Seconds the hover highlight takes to fade in or out.
const HIGHLIGHT_FADE: f64 = 0.15;

/// Alpha a disabled button is drawn with.
const DISABLED_ALPHA: f32 = 0.5;

/// A clickable button with an animated hover highlight.
///
/// # Signals
///
/// - `clicked`: a left click landed on the button, or Enter/Space was
///   pressed while it had keyboard focus
/// - `pressed`: the left button went down on the button
/// - `released`: the left button came back up
pub struct PushButton {
    base: WidgetBase,
    text: String,
    /// 0.0 is idle, 1.0 is fully highlighted.
    highlight: AnimatedValue,
    is_down: bool,
    idle_color: Color,
    hover_color: Color,
    down_color: Color,

    pub clicked: Signal<()>,
    pub pressed: Signal<()>,
    pub released: Signal<()>,
}

impl PushButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            text: text.into(),
            highlight: AnimatedValue::new(0.0, &EasedMove::new(HIGHLIGHT_FADE, Easing::EaseOut)),
            is_down: false,
            idle_color: Color::from_rgb8(0x3a, 0x3f, 0x4b),
            hover_color: Color::from_rgb8(0x52, 0x5a, 0x6b),
            down_color: Color::from_rgb8(0x2a, 0x2e, 0x36),
            clicked: Signal::new(),
            pressed: Signal::new(),
            released: Signal::new(),
        }
    }

    /// Apply manager-wide animation defaults (builder pattern).
    pub fn with_config(mut self, config: &ManagerConfig) -> Self {
        self.highlight.set_snap_raises_settled(config.snap_raises_settled);
        self
    }

    /// Set position and size (builder pattern).
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.base.store_bounds(bounds);
        self
    }

    /// Set the widget name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(name);
        self
    }

    /// Set the idle and hover colours (builder pattern).
    pub fn with_colors(mut self, idle: Color, hover: Color) -> Self {
        self.idle_color = idle;
        self.hover_color = hover;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Whether the left button is currently held on the button.
    pub fn is_down(&self) -> bool {
        self.is_down
    }

    /// The highlight animation, from 0.0 (idle) to 1.0 (hovered).
    pub fn highlight(&self) -> &AnimatedValue {
        &self.highlight
    }

    /// The fill colour for the current frame.
    pub fn current_color(&self) -> Color {
        if !self.base.is_enabled() {
            return self.idle_color.with_alpha(DISABLED_ALPHA);
        }
        if self.is_down {
            return self.down_color;
        }
        let t = self.highlight.value().clamp(0.0, 1.0) as f32;
        self.idle_color.lerp(self.hover_color, t)
    }
}

impl Widget for PushButton {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "PushButton"
    }

    fn on_mouse_enter(&mut self, ctx: &mut EventContext<'_>) {
        self.highlight.retarget_at(1.0, ctx.now());
        self.base.mouse_enter.emit(());
    }

    fn on_mouse_leave(&mut self, ctx: &mut EventContext<'_>) {
        self.highlight.retarget_at(0.0, ctx.now());
        self.base.mouse_leave.emit(());
    }

    fn on_mouse_down(&mut self, args: &MouseEventArgs, ctx: &mut EventContext<'_>) {
        if args.is_button(MouseButton::Left) {
            self.is_down = true;
            self.pressed.emit(());
            ctx.request_focus();
        }
        self.base.mouse_down.emit(*args);
    }

    fn on_mouse_up(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
        if args.is_button(MouseButton::Left) && self.is_down {
            self.is_down = false;
            self.released.emit(());
        }
        self.base.mouse_up.emit(*args);
    }

    fn on_mouse_click(&mut self, args: &MouseEventArgs, _ctx: &mut EventContext<'_>) {
        if args.is_button(MouseButton::Left) {
            self.clicked.emit(());
        }
        self.base.mouse_click.emit(*args);
    }

    fn on_key_down(&mut self, args: &KeyEventArgs, _ctx: &mut EventContext<'_>) {
        if args.key == KeyCode::ENTER || args.key == KeyCode::SPACE {
            self.clicked.emit(());
        }
        self.base.key_down.emit(*args);
    }

    fn update(&mut self, frame: &FrameTime) {
        self.highlight.advance(frame.now);
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let rect = ctx.rect();
        ctx.canvas().fill_rect(rect, self.current_color());
        if ctx.is_focused() {
            ctx.draw_border(Color::WHITE, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::{Duration, Instant};

    use horizon_controls_core::Point;

    use super::*;
    use crate::tree::WidgetTree;
    use crate::widget::{ControlMessage, MouseButtons};

    #[test]
    fn test_highlight_follows_hover() {
        let mut tree = WidgetTree::new();
        let id = tree.insert(PushButton::new("Go"));
        let start = Instant::now();
        let mut requests = Vec::new();

        tree.dispatch(id, &ControlMessage::MouseEnter, start, &mut requests);
        let button = tree.get::<PushButton>(id).unwrap();
        assert!(button.is_hovered());
        assert_eq!(button.highlight().target(), 1.0);

        let later = FrameTime::new(start + Duration::from_secs(1), Duration::from_secs(1));
        tree.update(id, &later);
        assert_eq!(tree.get::<PushButton>(id).unwrap().highlight().value(), 1.0);

        tree.dispatch(id, &ControlMessage::MouseLeave, later.now, &mut requests);
        assert_eq!(tree.get::<PushButton>(id).unwrap().highlight().target(), 0.0);
    }

    #[test]
    fn test_left_click_emits_clicked_and_requests_focus() {
        let mut tree = WidgetTree::new();
        let id = tree.insert(PushButton::new("Go"));
        let clicks = Arc::new(AtomicU32::new(0));
        let counter = clicks.clone();
        tree.get::<PushButton>(id).unwrap().clicked.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let now = Instant::now();
        let mut requests = Vec::new();
        let left = MouseEventArgs::new(Point::ZERO, MouseButtons::LEFT).with_button(MouseButton::Left);
        tree.dispatch(id, &ControlMessage::MouseDown(left), now, &mut requests);
        assert!(tree.get::<PushButton>(id).unwrap().is_down());
        assert_eq!(requests.len(), 1);

        let up = MouseEventArgs::new(Point::ZERO, MouseButtons::NONE).with_button(MouseButton::Left);
        tree.dispatch(id, &ControlMessage::MouseUp(up), now, &mut requests);
        tree.dispatch(id, &ControlMessage::MouseClick(up), now, &mut requests);

        let right = MouseEventArgs::new(Point::ZERO, MouseButtons::NONE).with_button(MouseButton::Right);
        tree.dispatch(id, &ControlMessage::MouseClick(right), now, &mut requests);

        assert!(!tree.get::<PushButton>(id).unwrap().is_down());
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disabled_button_is_dimmed() {
        let mut button = PushButton::new("Go");
        let enabled = button.current_color();
        assert_eq!(enabled.a, 1.0);

        button.widget_base_mut().set_enabled(false);
        let dimmed = button.current_color();
        assert_eq!(dimmed.a, DISABLED_ALPHA);
        assert_eq!((dimmed.r, dimmed.g, dimmed.b), (enabled.r, enabled.g, enabled.b));
    }

    #[test]
    fn test_enter_key_clicks() {
        let mut tree = WidgetTree::new();
        let id = tree.insert(PushButton::new("Go"));
        let clicks = Arc::new(AtomicU32::new(0));
        let counter = clicks.clone();
        tree.get::<PushButton>(id).unwrap().clicked.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut requests = Vec::new();
        let enter = KeyEventArgs::new(KeyCode::ENTER, false, false);
        let escape = KeyEventArgs::new(KeyCode::ESCAPE, false, false);
        tree.dispatch(id, &ControlMessage::KeyDown(enter), Instant::now(), &mut requests);
        tree.dispatch(id, &ControlMessage::KeyDown(escape), Instant::now(), &mut requests);
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }
}

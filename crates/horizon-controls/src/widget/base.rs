//! Widget base implementation.
//!
//! This module provides `WidgetBase`, the state every widget carries:
//! geometry, enabled/focus/hover flags and the notification signals the
//! default message hooks raise.

use horizon_controls_core::{Point, Rect, Signal, Size};

use super::events::{CharacterEventArgs, KeyEventArgs, MouseEventArgs};

/// Which parts of the bounds a [`WidgetBase::store_bounds`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundsChange {
    pub location: bool,
    pub size: bool,
}

/// The base implementation for all widgets.
///
/// Widget implementations include this as a field and hand it out through
/// [`Widget::widget_base`](super::Widget::widget_base).
///
/// # Example
///
/// ```
/// use horizon_controls::widget::{Widget, WidgetBase};
///
/// struct Label {
///     base: WidgetBase,
///     text: String,
/// }
///
/// impl Widget for Label {
///     fn widget_base(&self) -> &WidgetBase { &self.base }
///     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
/// }
/// ```
pub struct WidgetBase {
    name: String,

    /// Position relative to the parent container.
    position: Point,

    size: Size,

    /// Whether the widget takes part in input routing.
    enabled: bool,

    /// Set by the tree right before `GotFocus`/`LostFocus` is dispatched.
    focused: bool,

    /// Set by the tree right before `MouseEnter`/`MouseLeave` is dispatched.
    hovered: bool,

    /// Emitted when the position changes.
    pub location_changed: Signal<Point>,
    /// Emitted when the size changes.
    pub size_changed: Signal<Size>,
    /// Emitted when the enabled state changes.
    pub enabled_changed: Signal<bool>,

    pub got_focus: Signal<()>,
    pub lost_focus: Signal<()>,
    pub mouse_enter: Signal<()>,
    pub mouse_leave: Signal<()>,
    pub mouse_move: Signal<MouseEventArgs>,
    pub mouse_down: Signal<MouseEventArgs>,
    pub mouse_up: Signal<MouseEventArgs>,
    pub mouse_click: Signal<MouseEventArgs>,
    pub mouse_wheel: Signal<MouseEventArgs>,
    pub key_down: Signal<KeyEventArgs>,
    pub key_up: Signal<KeyEventArgs>,
    pub character_entered: Signal<CharacterEventArgs>,
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetBase {
    /// Create a base at the origin with zero size.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            position: Point::ZERO,
            size: Size::ZERO,
            enabled: true,
            focused: false,
            hovered: false,
            location_changed: Signal::new(),
            size_changed: Signal::new(),
            enabled_changed: Signal::new(),
            got_focus: Signal::new(),
            lost_focus: Signal::new(),
            mouse_enter: Signal::new(),
            mouse_leave: Signal::new(),
            mouse_move: Signal::new(),
            mouse_down: Signal::new(),
            mouse_up: Signal::new(),
            mouse_click: Signal::new(),
            mouse_wheel: Signal::new(),
            key_down: Signal::new(),
            key_up: Signal::new(),
            character_entered: Signal::new(),
        }
    }

    /// Create a base with initial bounds. No notifications are raised.
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            position: bounds.origin,
            size: bounds.size,
            ..Self::new()
        }
    }

    /// Set the debug name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Position relative to the parent container.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Bounds relative to the parent container.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Store new bounds and report what changed. Signals are left to the
    /// caller; see [`Widget::set_bounds`](super::Widget::set_bounds).
    pub fn store_bounds(&mut self, bounds: Rect) -> BoundsChange {
        let change = BoundsChange {
            location: self.position != bounds.origin,
            size: self.size != bounds.size,
        };
        self.position = bounds.origin;
        self.size = bounds.size;
        change
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the widget.
    ///
    /// This will emit `enabled_changed` if the state actually changed.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.enabled_changed.emit(enabled);
        }
    }

    /// Whether the widget holds keyboard focus.
    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Whether the widget is the current pointer target.
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_bounds_reports_changes() {
        let mut base = WidgetBase::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0));

        let change = base.store_bounds(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(change, BoundsChange::default());

        let change = base.store_bounds(Rect::new(5.0, 0.0, 10.0, 10.0));
        assert!(change.location && !change.size);

        let change = base.store_bounds(Rect::new(5.0, 0.0, 20.0, 10.0));
        assert!(!change.location && change.size);
        assert_eq!(base.bounds(), Rect::new(5.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn test_set_enabled_is_silent_when_unchanged() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut base = WidgetBase::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        base.enabled_changed.connect(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        base.set_enabled(true);
        base.set_enabled(false);
        base.set_enabled(false);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!base.is_enabled());
    }
}

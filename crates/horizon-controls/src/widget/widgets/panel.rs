//! Plain container widget.

use horizon_controls_core::{Color, Rect};

use crate::widget::{PaintContext, Widget, WidgetBase};

/// A container with an optional background fill.
///
/// Panels never receive pointer input themselves: hit-testing only considers
/// leaves, so a click on an empty part of a panel goes nowhere.
pub struct Panel {
    base: WidgetBase,
    background: Option<Color>,
}

impl Panel {
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            background: None,
        }
    }

    /// Set the widget name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(name);
        self
    }

    /// Set position and size (builder pattern).
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.base.store_bounds(bounds);
        self
    }

    /// Fill the panel with `color` when drawn (builder pattern).
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn background(&self) -> Option<Color> {
        self.background
    }

    pub fn set_background(&mut self, color: Option<Color>) {
        self.background = color;
    }
}

impl Default for Panel {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Panel {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Panel"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        if let Some(color) = self.background {
            let rect = ctx.rect();
            ctx.canvas().fill_rect(rect, color);
        }
    }
}

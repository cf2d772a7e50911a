//! An on/off switch with a sliding handle.
//!
//! The handle glides between its two rest positions with an
//! [`AnimatedValue`]. Clicking the track flips the switch; the handle can
//! also be dragged and dropped on either half.

use std::time::Instant;

use horizon_controls_core::logging::targets;
use horizon_controls_core::{Color, Point, Rect, Signal, Size};

use crate::animation::{AnimatedValue, SmoothMove};
use crate::config::ManagerConfig;
use crate::widget::{
    EventContext, FrameTime, MouseButton, MouseEventArgs, PaintContext, Widget, WidgetBase,
};

/// Seconds the handle takes to cross the track.
const HANDLE_TRAVEL: f64 = 0.25;

/// Size and handle geometry variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwitchBoxKind {
    Smaller,
    #[default]
    Small,
    Big,
    Bigger,
}

impl SwitchBoxKind {
    /// The fixed widget size.
    pub fn size(self) -> Size {
        match self {
            Self::Smaller | Self::Small => Size::new(34.0, 15.0),
            Self::Big => Size::new(71.0, 17.0),
            Self::Bigger => Size::new(66.0, 24.0),
        }
    }

    /// Handle x offsets for the off and on positions.
    fn handle_travel(self) -> (f32, f32) {
        match self {
            Self::Smaller => (-8.0, 11.0),
            Self::Small => (-7.0, 10.0),
            Self::Big => (-1.0, 41.0),
            Self::Bigger => (0.0, 35.0),
        }
    }

    fn handle_y(self) -> f32 {
        match self {
            Self::Smaller | Self::Small => -3.0,
            Self::Big => -2.0,
            Self::Bigger => 1.0,
        }
    }

    /// The grabbable part of the handle, relative to the handle offset.
    fn handle_area(self) -> Rect {
        match self {
            Self::Smaller => Rect::new(9.0, 4.0, 13.0, 13.0),
            Self::Small => Rect::new(7.0, 2.0, 17.0, 17.0),
            Self::Big => Rect::new(1.0, 1.0, 29.0, 19.0),
            Self::Bigger => Rect::new(1.0, 0.0, 29.0, 22.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    origin: f32,
    current: f32,
}

/// A two-state switch.
///
/// # Signals
///
/// - `toggled`: the state changed; carries the new state
pub struct SwitchBox {
    base: WidgetBase,
    kind: SwitchBoxKind,
    on: bool,
    handle_x: AnimatedValue,
    drag: Option<Drag>,
    swallow_click: bool,
    track_off: Color,
    track_on: Color,
    handle_color: Color,

    pub toggled: Signal<bool>,
}

impl SwitchBox {
    /// Create a switch in the off position.
    pub fn new(kind: SwitchBoxKind) -> Self {
        let (off_x, _) = kind.handle_travel();
        let mut base = WidgetBase::new();
        base.store_bounds(Rect::from_origin_size(Point::ZERO, kind.size()));
        Self {
            base,
            kind,
            on: false,
            handle_x: AnimatedValue::new(f64::from(off_x), &SmoothMove::new(HANDLE_TRAVEL)),
            drag: None,
            swallow_click: false,
            track_off: Color::from_rgb8(0x55, 0x55, 0x55),
            track_on: Color::from_rgb8(0x3d, 0x9b, 0x5a),
            handle_color: Color::from_rgb8(0xee, 0xee, 0xee),
            toggled: Signal::new(),
        }
    }

    /// Apply manager-wide animation defaults (builder pattern).
    pub fn with_config(mut self, config: &ManagerConfig) -> Self {
        self.handle_x.set_snap_raises_settled(config.snap_raises_settled);
        self
    }

    /// Place the switch (builder pattern). The size is fixed by the kind.
    pub fn with_position(mut self, position: Point) -> Self {
        self.base
            .store_bounds(Rect::from_origin_size(position, self.kind.size()));
        self
    }

    /// Set the widget name (builder pattern).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.base.set_name(name);
        self
    }

    pub fn kind(&self) -> SwitchBoxKind {
        self.kind
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Flip to `on`, animating the handle from the last frame the switch
    /// was updated in.
    pub fn set_on(&mut self, on: bool) {
        self.handle_x.retarget(self.rest_x(on));
        self.store_state(on);
    }

    /// Flip to `on`, animating the handle from `now`.
    pub fn set_on_at(&mut self, on: bool, now: Instant) {
        self.handle_x.retarget_at(self.rest_x(on), now);
        self.store_state(on);
    }

    /// Flip to `on` with the handle jumping straight to its rest position.
    pub fn set_on_instantly(&mut self, on: bool) {
        self.drag = None;
        self.handle_x.snap(self.rest_x(on));
        self.store_state(on);
    }

    /// Whether the handle is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The handle's animated x offset.
    pub fn handle_offset(&self) -> &AnimatedValue {
        &self.handle_x
    }

    /// Where the handle is drawn this frame, including any drag, relative to
    /// the widget origin.
    pub fn handle_x(&self) -> f32 {
        let (min, max) = self.kind.handle_travel();
        let drag = self.drag.map_or(0.0, |d| d.current - d.origin);
        (self.handle_x.value() as f32 + drag).clamp(min, max)
    }

    fn rest_x(&self, on: bool) -> f64 {
        let (off_x, on_x) = self.kind.handle_travel();
        f64::from(if on { on_x } else { off_x })
    }

    fn store_state(&mut self, on: bool) {
        if self.on != on {
            self.on = on;
            tracing::debug!(target: targets::INPUT, name = self.base.name(), on, "switch toggled");
            self.toggled.emit(on);
        }
    }

    fn handle_rect(&self) -> Rect {
        self.kind
            .handle_area()
            .translate(Point::new(self.handle_x(), self.kind.handle_y()))
    }

    /// Drop the handle at local x `x`: it keeps its dragged position and then
    /// glides to whichever half of the track `x` is on.
    fn end_drag(&mut self, x: f32, now: Instant) {
        if self.drag.take().is_none() {
            return;
        }
        let dropped_at = f64::from(self.handle_x());
        self.handle_x.snap_at(dropped_at, now);
        let width = self.base.size().width;
        self.set_on_at(x >= (width - x).abs(), now);
        self.swallow_click = true;
    }
}

impl Widget for SwitchBox {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "SwitchBox"
    }

    fn adjust_bounds(&self, requested: Rect) -> Rect {
        Rect::from_origin_size(requested.origin, self.kind.size())
    }

    fn on_mouse_down(&mut self, args: &MouseEventArgs, ctx: &mut EventContext<'_>) {
        if args.is_button(MouseButton::Left) {
            let local = ctx.to_local(args.position);
            if self.handle_rect().contains(local) {
                self.drag = Some(Drag {
                    origin: local.x,
                    current: local.x,
                });
            }
            self.swallow_click = false;
        }
        self.base.mouse_down.emit(*args);
    }

    fn on_mouse_move(&mut self, args: &MouseEventArgs, ctx: &mut EventContext<'_>) {
        if let Some(drag) = &mut self.drag {
            drag.current = ctx.to_local(args.position).x;
        }
        self.base.mouse_move.emit(*args);
    }

    fn on_mouse_up(&mut self, args: &MouseEventArgs, ctx: &mut EventContext<'_>) {
        if args.is_button(MouseButton::Left) {
            let x = ctx.to_local(args.position).x;
            self.end_drag(x, ctx.now());
        }
        self.base.mouse_up.emit(*args);
    }

    fn on_mouse_click(&mut self, args: &MouseEventArgs, ctx: &mut EventContext<'_>) {
        if args.is_button(MouseButton::Left) {
            // A drag release already placed the handle.
            if !std::mem::take(&mut self.swallow_click) {
                self.set_on_at(!self.on, ctx.now());
            }
        }
        self.base.mouse_click.emit(*args);
    }

    fn on_mouse_leave(&mut self, ctx: &mut EventContext<'_>) {
        if let Some(drag) = self.drag {
            self.end_drag(drag.current, ctx.now());
        }
        self.base.mouse_leave.emit(());
    }

    fn update(&mut self, frame: &FrameTime) {
        self.handle_x.advance(frame.now);
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let (min, max) = self.kind.handle_travel();
        let progress = (self.handle_x() - min) / (max - min);
        let track = self.track_off.lerp(self.track_on, progress);
        let rect = ctx.rect();
        ctx.canvas().fill_rect(rect, track);
        ctx.fill_local(self.handle_rect(), self.handle_color);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::tree::WidgetTree;
    use crate::widget::{ControlMessage, MouseButtons};

    fn press(x: f32, y: f32) -> ControlMessage {
        ControlMessage::MouseDown(
            MouseEventArgs::new(Point::new(x, y), MouseButtons::LEFT).with_button(MouseButton::Left),
        )
    }

    fn release(x: f32, y: f32) -> [ControlMessage; 2] {
        let args = MouseEventArgs::new(Point::new(x, y), MouseButtons::NONE).with_button(MouseButton::Left);
        [ControlMessage::MouseUp(args), ControlMessage::MouseClick(args)]
    }

    #[test]
    fn test_bounds_snap_to_kind_size() {
        let mut switch = SwitchBox::new(SwitchBoxKind::Bigger);
        switch.set_bounds(Rect::new(5.0, 6.0, 200.0, 200.0));
        assert_eq!(switch.bounds(), Rect::new(5.0, 6.0, 66.0, 24.0));
    }

    #[test]
    fn test_click_on_track_toggles_and_animates() {
        let mut tree = WidgetTree::new();
        let id = tree.insert(SwitchBox::new(SwitchBoxKind::Small));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        tree.get::<SwitchBox>(id)
            .unwrap()
            .toggled
            .connect(move |&on| sink.lock().push(on));

        let start = Instant::now();
        let mut requests = Vec::new();
        tree.dispatch(id, &press(30.0, 5.0), start, &mut requests);
        for message in release(30.0, 5.0) {
            tree.dispatch(id, &message, start, &mut requests);
        }

        let switch = tree.get::<SwitchBox>(id).unwrap();
        assert!(switch.is_on());
        assert!(!switch.is_dragging());
        assert!(switch.handle_offset().is_running());
        assert_eq!(*seen.lock(), vec![true]);

        let done = start + Duration::from_secs(1);
        tree.update(id, &FrameTime::new(done, Duration::from_secs(1)));
        assert_eq!(tree.get::<SwitchBox>(id).unwrap().handle_x(), 10.0);
    }

    #[test]
    fn test_drag_handle_to_far_half() {
        let mut tree = WidgetTree::new();
        let id = tree.insert(SwitchBox::new(SwitchBoxKind::Small));
        let now = Instant::now();
        let mut requests = Vec::new();

        tree.dispatch(id, &press(5.0, 5.0), now, &mut requests);
        assert!(tree.get::<SwitchBox>(id).unwrap().is_dragging());

        let moved = MouseEventArgs::new(Point::new(30.0, 5.0), MouseButtons::LEFT);
        tree.dispatch(id, &ControlMessage::MouseMove(moved), now, &mut requests);
        assert_eq!(tree.get::<SwitchBox>(id).unwrap().handle_x(), 10.0);

        for message in release(30.0, 5.0) {
            tree.dispatch(id, &message, now, &mut requests);
        }
        let switch = tree.get::<SwitchBox>(id).unwrap();
        assert!(switch.is_on());
        assert!(!switch.is_dragging());
    }

    #[test]
    fn test_set_on_follows_frame_clock() {
        let mut tree = WidgetTree::new();
        let id = tree.insert(SwitchBox::new(SwitchBoxKind::Bigger));
        let frame = Instant::now() + Duration::from_secs(3600);
        tree.update(id, &FrameTime::new(frame, Duration::ZERO));

        tree.get_mut::<SwitchBox>(id).unwrap().set_on(true);
        tree.update(id, &FrameTime::new(frame + Duration::from_secs(1), Duration::from_secs(1)));

        let switch = tree.get::<SwitchBox>(id).unwrap();
        assert!(switch.is_on());
        assert!(!switch.handle_offset().is_running());
        assert_eq!(switch.handle_x(), 35.0);
    }

    #[test]
    fn test_set_on_instantly_snaps_handle() {
        let mut switch = SwitchBox::new(SwitchBoxKind::Bigger);
        switch.set_on_instantly(true);
        assert!(switch.is_on());
        assert!(!switch.handle_offset().is_running());
        assert_eq!(switch.handle_x(), 35.0);
    }
}

//! Pointer routing through a ControlManager: hit-testing, hover, capture,
//! clicks and the wheel.

mod common;

use std::sync::Arc;

use common::{Log, Recorder, manager, new_log, take, tick_at, tick_with};
use horizon_controls::prelude::*;
use parking_lot::Mutex;

/// `a` at (0,0) and `b` at (20,0), both 10x10, directly under the root.
fn side_by_side(config: ManagerConfig) -> (ControlManager, Log, WidgetId, WidgetId) {
    let log = new_log();
    let (mut manager, _clock) = manager(config);
    let a = manager
        .add(Recorder::new("a", Rect::new(0.0, 0.0, 10.0, 10.0), &log))
        .unwrap();
    let b = manager
        .add(Recorder::new("b", Rect::new(20.0, 0.0, 10.0, 10.0), &log))
        .unwrap();
    (manager, log, a, b)
}

#[test]
fn test_hit_test_accumulates_container_offsets() {
    let log = new_log();
    let (mut manager, _clock) = manager(ManagerConfig::default());
    let outer = manager
        .add(Panel::new().with_bounds(Rect::new(10.0, 10.0, 100.0, 100.0)))
        .unwrap();
    let inner = manager
        .add_to(outer, Panel::new().with_bounds(Rect::new(5.0, 5.0, 50.0, 50.0)))
        .unwrap();
    let leaf = manager
        .add_to(inner, Recorder::new("leaf", Rect::new(2.0, 2.0, 4.0, 4.0), &log))
        .unwrap();

    tick_at(&mut manager, 18.0, 18.0, false);
    assert_eq!(manager.hovered(), Some(leaf));
    assert_eq!(take(&log), ["leaf:MouseEnter"]);

    tick_at(&mut manager, 16.0, 16.0, false);
    assert_eq!(manager.hovered(), None);
    assert_eq!(take(&log), ["leaf:MouseLeave"]);
}

#[test]
fn test_pointer_offset_is_subtracted() {
    let config = ManagerConfig::new().with_pointer_offset(100.0, 50.0);
    let (mut manager, _log, a, _b) = side_by_side(config);

    tick_at(&mut manager, 105.0, 55.0, false);
    assert_eq!(manager.hovered(), Some(a));

    tick_at(&mut manager, 5.0, 5.0, false);
    assert_eq!(manager.hovered(), None);
}

#[test]
fn test_topmost_leaf_wins() {
    let log = new_log();
    let (mut manager, _clock) = manager(ManagerConfig::default());
    manager
        .add(Recorder::new("under", Rect::new(0.0, 0.0, 20.0, 20.0), &log))
        .unwrap();
    let over = manager
        .add(Recorder::new("over", Rect::new(10.0, 10.0, 20.0, 20.0), &log))
        .unwrap();

    tick_at(&mut manager, 15.0, 15.0, false);
    assert_eq!(manager.hovered(), Some(over));
    assert_eq!(take(&log), ["over:MouseEnter"]);
}

#[test]
fn test_first_tick_raises_no_phantom_move_or_wheel() {
    let (mut manager, log, _a, _b) = side_by_side(ManagerConfig::default());

    let state = PointerState::new(Point::new(5.0, 5.0)).with_scroll(480);
    tick_with(&mut manager, state);
    assert_eq!(take(&log), ["a:MouseEnter"]);

    tick_with(&mut manager, state);
    assert!(take(&log).is_empty());
}

#[test]
fn test_leave_precedes_enter_precedes_move() {
    let (mut manager, log, _a, b) = side_by_side(ManagerConfig::default());

    tick_at(&mut manager, 5.0, 5.0, false);
    take(&log);

    tick_at(&mut manager, 25.0, 5.0, false);
    assert_eq!(take(&log), ["a:MouseLeave", "b:MouseEnter", "b:MouseMove"]);
    assert_eq!(manager.hovered(), Some(b));
}

#[test]
fn test_press_and_release_on_same_widget_clicks() {
    let (mut manager, log, a, _b) = side_by_side(ManagerConfig::default());

    tick_at(&mut manager, 5.0, 5.0, false);
    tick_at(&mut manager, 5.0, 5.0, true);
    assert_eq!(manager.capture(MouseButton::Left), Some(a));

    tick_at(&mut manager, 5.0, 5.0, false);
    assert_eq!(
        take(&log),
        ["a:MouseEnter", "a:MouseDown", "a:MouseUp", "a:MouseClick"]
    );
    assert_eq!(manager.capture(MouseButton::Left), None);
}

#[test]
fn test_capture_holds_target_and_release_elsewhere_does_not_click() {
    let (mut manager, log, a, b) = side_by_side(ManagerConfig::default());

    tick_at(&mut manager, 5.0, 5.0, false);
    tick_at(&mut manager, 5.0, 5.0, true);
    take(&log);

    // Dragging over b keeps a as the target.
    tick_at(&mut manager, 25.0, 5.0, true);
    assert_eq!(manager.hovered(), Some(a));
    assert_eq!(take(&log), ["a:MouseMove"]);

    tick_at(&mut manager, 25.0, 5.0, false);
    assert_eq!(take(&log), ["a:MouseUp"]);
    assert_eq!(manager.capture(MouseButton::Left), None);

    // With the capture gone, the next tick retargets to b.
    tick_at(&mut manager, 25.0, 5.0, false);
    assert_eq!(take(&log), ["a:MouseLeave", "b:MouseEnter"]);
    assert_eq!(manager.hovered(), Some(b));
}

#[test]
fn test_drag_out_and_back_still_clicks() {
    let (mut manager, log, _a, _b) = side_by_side(ManagerConfig::default());

    tick_at(&mut manager, 5.0, 5.0, false);
    tick_at(&mut manager, 5.0, 5.0, true);
    tick_at(&mut manager, 25.0, 5.0, true);
    tick_at(&mut manager, 6.0, 5.0, true);
    take(&log);

    tick_at(&mut manager, 6.0, 5.0, false);
    assert_eq!(take(&log), ["a:MouseUp", "a:MouseClick"]);
}

#[test]
fn test_press_over_nothing_captures_nothing() {
    let (mut manager, log, _a, _b) = side_by_side(ManagerConfig::default());

    tick_at(&mut manager, 15.0, 50.0, false);
    tick_at(&mut manager, 15.0, 50.0, true);
    assert_eq!(manager.capture(MouseButton::Left), None);

    // Moving onto a widget with the button held does not start a capture.
    tick_at(&mut manager, 5.0, 5.0, true);
    tick_at(&mut manager, 5.0, 5.0, false);
    assert_eq!(take(&log), ["a:MouseEnter", "a:MouseMove", "a:MouseUp"]);
}

#[test]
fn test_wheel_reports_scroll_difference() {
    let (mut manager, log, _a, _b) = side_by_side(ManagerConfig::default());

    let at = PointerState::new(Point::new(5.0, 5.0));
    tick_with(&mut manager, at);
    tick_with(&mut manager, at.with_scroll(120));
    tick_with(&mut manager, at.with_scroll(-240));
    assert_eq!(
        take(&log),
        ["a:MouseEnter", "a:MouseWheel(120)", "a:MouseWheel(-360)"]
    );
}

#[test]
fn test_disabled_leaves_are_skipped_unless_configured() {
    let (mut manager, _log, a, _b) = side_by_side(ManagerConfig::default());
    manager
        .tree_mut()
        .widget_mut(a)
        .unwrap()
        .widget_base_mut()
        .set_enabled(false);

    tick_at(&mut manager, 5.0, 5.0, false);
    assert_eq!(manager.hovered(), None);

    manager.set_config(ManagerConfig::new().with_hit_test_disabled(true));
    tick_at(&mut manager, 5.0, 5.0, false);
    assert_eq!(manager.hovered(), Some(a));
}

#[test]
fn test_button_hooks_see_changed_button() {
    let (mut manager, _clock) = manager(ManagerConfig::default());
    let button = manager
        .add(PushButton::new("go").with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)))
        .unwrap();
    let downs = Arc::new(Mutex::new(Vec::new()));
    let sink = downs.clone();
    manager
        .tree()
        .get::<PushButton>(button)
        .unwrap()
        .widget_base()
        .mouse_down
        .connect(move |args| sink.lock().push(*args));

    tick_at(&mut manager, 5.0, 5.0, false);
    let right = PointerState::new(Point::new(5.0, 5.0)).with_button(MouseButton::Right, true);
    tick_with(&mut manager, right);

    let downs = downs.lock();
    assert_eq!(downs.len(), 1);
    assert_eq!(downs[0].button, Some(MouseButton::Right));
    assert!(downs[0].buttons.contains(MouseButton::Right));
    assert!(!manager.tree().get::<PushButton>(button).unwrap().is_down());
}

#[test]
fn test_held_capture_outranks_pointer_for_later_presses() {
    let (mut manager, log, a, b) = side_by_side(ManagerConfig::default());
    let at = |x: f32, left: bool, right: bool| {
        PointerState::new(Point::new(x, 5.0))
            .with_button(MouseButton::Left, left)
            .with_button(MouseButton::Right, right)
    };

    tick_with(&mut manager, at(25.0, false, true));
    assert_eq!(manager.capture(MouseButton::Right), Some(b));
    take(&log);

    // Over a with right still held, a left press lands on the capture holder.
    tick_with(&mut manager, at(5.0, false, true));
    tick_with(&mut manager, at(5.0, true, true));
    assert_eq!(manager.hovered(), Some(b));
    assert_eq!(manager.capture(MouseButton::Left), Some(b));
    assert_eq!(take(&log), ["b:MouseMove", "b:MouseDown"]);

    // Releasing right off the holder: MouseUp without a click, target kept.
    tick_with(&mut manager, at(5.0, true, false));
    assert_eq!(take(&log), ["b:MouseUp"]);
    assert_eq!(manager.capture(MouseButton::Right), None);
    assert_eq!(manager.hovered(), Some(b));

    tick_with(&mut manager, at(5.0, false, false));
    assert_eq!(take(&log), ["b:MouseUp"]);

    tick_with(&mut manager, at(5.0, false, false));
    assert_eq!(take(&log), ["b:MouseLeave", "a:MouseEnter"]);
    assert_eq!(manager.hovered(), Some(a));
}

/// Logs every message and update, and destroys itself through a deferred
/// request when clicked.
struct SelfDestructing {
    base: WidgetBase,
    log: Log,
}

impl Widget for SelfDestructing {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn event(&mut self, message: &ControlMessage, ctx: &mut EventContext<'_>) -> bool {
        self.log.lock().push(format!("{}:{}", self.base.name(), message.name()));
        if matches!(message, ControlMessage::MouseClick(_)) {
            let id = ctx.widget_id();
            ctx.defer(move |manager| manager.destroy(id).unwrap());
        }
        true
    }

    fn update(&mut self, _frame: &FrameTime) {
        self.log.lock().push(format!("{}:update", self.base.name()));
    }
}

#[test]
fn test_deferred_destroy_runs_after_update_and_releases_references() {
    let log = new_log();
    let (mut manager, _clock) = manager(ManagerConfig::default());
    let a = manager
        .add(SelfDestructing {
            base: WidgetBase::with_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)).with_name("a"),
            log: log.clone(),
        })
        .unwrap();
    manager.set_keyboard_control(Some(a)).unwrap();

    let both = PointerState::new(Point::new(5.0, 5.0))
        .with_button(MouseButton::Left, true)
        .with_button(MouseButton::Right, true);
    tick_with(&mut manager, both);
    assert_eq!(manager.capture(MouseButton::Right), Some(a));
    take(&log);

    // Left click while right stays captured.
    tick_with(&mut manager, both.with_button(MouseButton::Left, false));
    assert_eq!(
        take(&log),
        ["a:MouseUp", "a:MouseClick", "a:update", "a:LostFocus", "a:MouseLeave"]
    );
    assert!(!manager.tree().is_alive(a));
    assert_eq!(manager.hovered(), None);
    assert_eq!(manager.keyboard_control(), None);
    assert_eq!(manager.capture(MouseButton::Left), None);
    assert_eq!(manager.capture(MouseButton::Right), None);

    tick_with(&mut manager, PointerState::new(Point::new(5.0, 5.0)));
    assert!(take(&log).is_empty());
}

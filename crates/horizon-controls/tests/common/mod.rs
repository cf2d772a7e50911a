//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use horizon_controls::prelude::*;
use parking_lot::Mutex;

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Drain and return everything logged so far.
pub fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock())
}

/// A leaf that writes `name:Message` for every message it receives.
pub struct Recorder {
    base: WidgetBase,
    log: Log,
    focus_on_click: bool,
}

impl Recorder {
    pub fn new(name: &str, bounds: Rect, log: &Log) -> Self {
        Self {
            base: WidgetBase::with_bounds(bounds).with_name(name),
            log: log.clone(),
            focus_on_click: false,
        }
    }

    /// Ask for keyboard focus whenever clicked.
    pub fn focus_on_click(mut self) -> Self {
        self.focus_on_click = true;
        self
    }
}

impl Widget for Recorder {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        "Recorder"
    }

    fn event(&mut self, message: &ControlMessage, ctx: &mut EventContext<'_>) -> bool {
        let entry = match message {
            ControlMessage::MouseWheel(args) => {
                format!("{}:MouseWheel({})", self.base.name(), args.wheel_delta)
            }
            other => format!("{}:{}", self.base.name(), other.name()),
        };
        self.log.lock().push(entry);

        if self.focus_on_click && matches!(message, ControlMessage::MouseClick(_)) {
            ctx.request_focus();
        }
        true
    }

    fn load_content(&mut self, _content: &ContentHandle) {
        self.log.lock().push(format!("{}:load", self.base.name()));
    }

    fn unload_content(&mut self, _content: &ContentHandle) {
        self.log.lock().push(format!("{}:unload", self.base.name()));
    }
}

/// A manager driven by a clock the test controls.
pub fn manager(config: ManagerConfig) -> (ControlManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let manager = ControlManager::with_clock(config, clock.clone());
    (manager, clock)
}

/// A pointer parked at `(x, y)` with no buttons held.
pub fn pointer_at(x: f32, y: f32) -> ScriptedPointer {
    let mut pointer = ScriptedPointer::new();
    pointer.push(PointerState::new(Point::new(x, y)));
    pointer
}

/// Run one tick with the pointer at `(x, y)` and `left` held or not.
pub fn tick_at(manager: &mut ControlManager, x: f32, y: f32, left: bool) {
    let state = PointerState::new(Point::new(x, y)).with_button(MouseButton::Left, left);
    tick_with(manager, state);
}

/// Run one tick with an explicit pointer state and no keyboard input.
pub fn tick_with(manager: &mut ControlManager, state: PointerState) {
    let mut pointer = ScriptedPointer::new();
    pointer.push(state);
    manager.tick(&mut pointer, &mut ());
}

/// Step the clock by one 60 Hz frame.
pub fn next_frame(clock: &ManualClock) {
    clock.advance(Duration::from_micros(16_667));
}

/// One call made against a [`RecordingCanvas`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Fill(Rect, Color),
    Stroke(Rect, f32),
}

/// Canvas that remembers every call in order.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Fill(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color, width: f32) {
        self.ops.push(DrawOp::Stroke(rect, width));
    }
}

//! The root of a control hierarchy: input routing, focus and the frame tick.
//!
//! A [`ControlManager`] owns a [`WidgetTree`] with a root [`Panel`]. The host
//! calls [`tick`](ControlManager::tick) once per frame with its pointer
//! device and key source, then [`draw`](ControlManager::draw).
//!
//! # Pointer routing
//!
//! Each tick compares the polled pointer state with the previous tick's:
//!
//! 1. The polled position is shifted by the configured pointer offset.
//! 2. The *target* is the widget capturing the highest-priority held button
//!    (left, then middle, then right). With no capture it is the topmost
//!    enabled leaf under the pointer.
//! 3. If the target changed, the old one gets `MouseLeave` and the new one
//!    `MouseEnter`, before anything else.
//! 4. If the pointer moved, the target gets `MouseMove`.
//! 5. For each button whose state changed: a press sends `MouseDown` and makes
//!    the target capture that button. A release sends `MouseUp`, plus
//!    `MouseClick` when the capturing widget is also the widget under the
//!    pointer, then clears the capture.
//! 6. If the scroll value changed, the target gets `MouseWheel` with the
//!    difference.
//!
//! Widgets are updated after all input is routed. Requests queued by event
//! handlers run last.

use std::time::Instant;

use horizon_controls_core::logging::targets;
use horizon_controls_core::{ControlsError, PerfSpan, Result, SharedClock, SystemClock};

use crate::config::ManagerConfig;
use crate::content::ContentHandle;
use crate::input::{KeyEvent, KeyEventSource, PointerDevice, PointerState};
use crate::tree::{WidgetId, WidgetTree};
use crate::widget::widgets::Panel;
use crate::widget::{
    Canvas, ControlMessage, DeferredRequest, FrameTime, MouseButton, MouseEventArgs, Widget,
};

/// Upper bound on request rounds applied in one tick. Requests queued by the
/// last round wait for the next tick.
const MAX_REQUEST_ROUNDS: usize = 8;

/// Root manager for a control hierarchy.
pub struct ControlManager {
    tree: WidgetTree,
    root: WidgetId,
    config: ManagerConfig,
    clock: SharedClock,
    hovered: Option<WidgetId>,
    capture: [Option<WidgetId>; MouseButton::COUNT],
    focused: Option<WidgetId>,
    last_pointer: Option<PointerState>,
    last_frame: Option<Instant>,
    requests: Vec<DeferredRequest>,
}

impl ControlManager {
    /// Create a manager timed by the system clock.
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_clock(config, std::sync::Arc::new(SystemClock))
    }

    /// Create a manager timed by `clock`.
    pub fn with_clock(config: ManagerConfig, clock: SharedClock) -> Self {
        let mut tree = WidgetTree::new();
        let root = tree.insert(Panel::new().with_name("root"));
        Self {
            tree,
            root,
            config,
            clock,
            hovered: None,
            capture: [None; MouseButton::COUNT],
            focused: None,
            last_pointer: None,
            last_frame: None,
            requests: Vec::new(),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ManagerConfig) {
        self.config = config;
    }

    /// The root container.
    #[inline]
    pub fn root(&self) -> WidgetId {
        self.root
    }

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// Direct access to the tree.
    ///
    /// Hover, capture and focus references into widgets removed this way are
    /// dropped at the start of the next tick. Prefer
    /// [`remove_child`](Self::remove_child) and [`destroy`](Self::destroy),
    /// which release them immediately.
    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The current time according to the manager's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Whether `id` is a (transitive) member of this manager's tree.
    pub fn is_member(&self, id: WidgetId) -> bool {
        self.tree.is_ancestor(self.root, id)
    }

    // =========================================================================
    // Tree editing
    // =========================================================================

    /// Insert `widget` and append it to the root container.
    pub fn add<W: Widget>(&mut self, widget: W) -> Result<WidgetId> {
        self.add_to(self.root, widget)
    }

    /// Insert `widget` and append it to `container`.
    pub fn add_to<W: Widget>(&mut self, container: WidgetId, widget: W) -> Result<WidgetId> {
        let id = self.tree.insert(widget);
        if let Err(error) = self.tree.add_child(container, id) {
            // Nothing else can reference the new id yet.
            let _ = self.tree.destroy(id);
            return Err(error);
        }
        Ok(id)
    }

    /// Move `child` into `container`. See [`WidgetTree::add_child`].
    pub fn add_child(&mut self, container: WidgetId, child: WidgetId) -> Result<()> {
        self.tree.check_add_child(container, child)?;
        let leaving_tree = self.is_member(child) && !self.is_member(container) && container != self.root;
        if leaving_tree {
            self.release_subtree(child);
        }
        self.tree.add_child(container, child)
    }

    /// Remove `child` from `container`, releasing hover, capture and focus
    /// held by anything in the removed subtree.
    pub fn remove_child(&mut self, container: WidgetId, child: WidgetId) -> Result<bool> {
        if self.tree.parent(child) == Some(container) && self.tree.is_container(container) {
            self.release_subtree(child);
        }
        self.tree.remove_child(container, child)
    }

    /// Destroy a widget subtree, releasing references to it first.
    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        if id == self.root {
            return Err(usage_error(ControlsError::NotInTree, "destroy"));
        }
        if self.tree.is_alive(id) {
            self.release_subtree(id);
        }
        self.tree.destroy(id).map(|_| ())
    }

    /// Drop every hover, capture and focus reference into `subtree`.
    fn release_subtree(&mut self, subtree: WidgetId) {
        let now = self.clock.now();
        let inside = |tree: &WidgetTree, id: WidgetId| id == subtree || tree.is_ancestor(subtree, id);

        if let Some(focused) = self.focused.filter(|&f| inside(&self.tree, f)) {
            self.focused = None;
            tracing::debug!(target: targets::FOCUS, ?focused, "focused widget leaving tree");
            self.tree.dispatch(focused, &ControlMessage::LostFocus, now, &mut self.requests);
        }
        if let Some(hovered) = self.hovered.filter(|&h| inside(&self.tree, h)) {
            self.hovered = None;
            self.tree.dispatch(hovered, &ControlMessage::MouseLeave, now, &mut self.requests);
        }
        for slot in &mut self.capture {
            if slot.is_some_and(|c| inside(&self.tree, c)) {
                *slot = None;
            }
        }
    }

    /// Drop references to widgets that died or left the tree behind the
    /// manager's back.
    fn prune_references(&mut self, now: Instant) {
        if let Some(focused) = self.focused.filter(|&f| !self.is_member(f)) {
            self.focused = None;
            tracing::debug!(target: targets::FOCUS, ?focused, "dropping stale focus");
            self.tree.dispatch(focused, &ControlMessage::LostFocus, now, &mut self.requests);
        }
        if let Some(hovered) = self.hovered.filter(|&h| !self.is_member(h)) {
            self.hovered = None;
            self.tree.dispatch(hovered, &ControlMessage::MouseLeave, now, &mut self.requests);
        }
        for i in 0..MouseButton::COUNT {
            if self.capture[i].is_some_and(|c| !self.is_member(c)) {
                self.capture[i] = None;
            }
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Load content for the whole tree.
    pub fn load_content(&mut self, handle: &ContentHandle) -> Result<()> {
        self.tree.load_content(self.root, handle)
    }

    /// Unload content for the whole tree. `handle` must match the loaded one.
    pub fn unload_content(&mut self, handle: &ContentHandle) -> Result<()> {
        self.tree.unload_content(self.root, handle)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The widget receiving keyboard input.
    #[inline]
    pub fn keyboard_control(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Move keyboard focus.
    ///
    /// The previous holder gets `LostFocus`, then the new one `GotFocus`.
    /// Setting the current holder again does nothing. Fails with
    /// [`ControlsError::NotInTree`] for widgets outside this manager's tree.
    pub fn set_keyboard_control(&mut self, target: Option<WidgetId>) -> Result<()> {
        if let Some(id) = target {
            if !self.tree.is_alive(id) {
                return Err(usage_error(ControlsError::InvalidWidgetId, "set_keyboard_control"));
            }
            if !self.is_member(id) {
                return Err(usage_error(ControlsError::NotInTree, "set_keyboard_control"));
            }
        }
        if target == self.focused {
            return Ok(());
        }

        let now = self.clock.now();
        let previous = std::mem::replace(&mut self.focused, target);
        tracing::debug!(target: targets::FOCUS, ?previous, ?target, "keyboard focus changed");

        if let Some(previous) = previous {
            self.tree.dispatch(previous, &ControlMessage::LostFocus, now, &mut self.requests);
        }
        if let Some(target) = target {
            self.tree.dispatch(target, &ControlMessage::GotFocus, now, &mut self.requests);
        }
        Ok(())
    }

    // =========================================================================
    // Pointer state
    // =========================================================================

    /// The current pointer target.
    #[inline]
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    /// The widget capturing `button`, if any.
    #[inline]
    pub fn capture(&self, button: MouseButton) -> Option<WidgetId> {
        self.capture[button.index()]
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Run one frame: route key and pointer input, update every widget, then
    /// apply requests queued by event handlers.
    pub fn tick(&mut self, pointer: &mut dyn PointerDevice, keys: &mut dyn KeyEventSource) {
        let _span = PerfSpan::new("control_manager_tick");
        let now = self.clock.now();

        self.prune_references(now);

        while let Some(event) = keys.poll_event() {
            self.route_key(event, now);
        }

        let state = pointer.poll();
        self.route_pointer(state, now);

        let frame = match self.last_frame {
            Some(last) => FrameTime::new(now, now.saturating_duration_since(last)),
            None => FrameTime::first(now),
        };
        self.tree.update(self.root, &frame);
        self.last_frame = Some(now);

        self.apply_requests();
    }

    /// Paint the whole tree.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.tree.draw(self.root, canvas);
    }

    /// Render the hierarchy for debugging.
    pub fn dump(&self) -> String {
        self.tree.dump(self.root)
    }

    fn route_key(&mut self, event: KeyEvent, now: Instant) {
        match self.focused {
            Some(focused) => {
                self.tree.dispatch(focused, &event.to_message(), now, &mut self.requests);
            }
            None => {
                tracing::trace!(target: targets::INPUT, ?event, "no keyboard control, dropping key event");
            }
        }
    }

    fn route_pointer(&mut self, raw: PointerState, now: Instant) {
        let state = PointerState {
            position: raw.position - self.config.pointer_offset(),
            ..raw
        };
        let last = self.last_pointer.unwrap_or_else(|| state.released());

        let under_pointer = self
            .tree
            .widget_at(self.root, state.position, self.config.hit_test_disabled);
        let target = self.capture.iter().find_map(|c| *c).or(under_pointer);

        if target != self.hovered {
            if let Some(old) = self.hovered {
                self.tree.dispatch(old, &ControlMessage::MouseLeave, now, &mut self.requests);
            }
            if let Some(new) = target {
                self.tree.dispatch(new, &ControlMessage::MouseEnter, now, &mut self.requests);
            }
            tracing::trace!(target: targets::INPUT, from = ?self.hovered, to = ?target, "hover changed");
            self.hovered = target;
        }

        let args = MouseEventArgs::new(state.position, state.button_mask());

        if state.position != last.position {
            if let Some(target) = target {
                self.tree.dispatch(target, &ControlMessage::MouseMove(args), now, &mut self.requests);
            }
        }

        for button in MouseButton::ALL {
            let i = button.index();
            let pressed = state.buttons[i];
            if pressed == last.buttons[i] {
                continue;
            }

            let Some(target) = target else {
                self.capture[i] = None;
                continue;
            };
            let args = args.with_button(button);

            if pressed {
                self.tree.dispatch(target, &ControlMessage::MouseDown(args), now, &mut self.requests);
                self.capture[i] = Some(target);
            } else {
                self.tree.dispatch(target, &ControlMessage::MouseUp(args), now, &mut self.requests);
                let captured = self.capture[i].take();
                if captured == Some(target) && under_pointer == Some(target) {
                    self.tree.dispatch(target, &ControlMessage::MouseClick(args), now, &mut self.requests);
                }
            }
        }

        if state.scroll != last.scroll {
            if let Some(target) = target {
                let delta = state.scroll.wrapping_sub(last.scroll);
                let wheel = ControlMessage::MouseWheel(args.with_wheel_delta(delta));
                self.tree.dispatch(target, &wheel, now, &mut self.requests);
            }
        }

        self.last_pointer = Some(state);
    }

    fn apply_requests(&mut self) {
        for _ in 0..MAX_REQUEST_ROUNDS {
            if self.requests.is_empty() {
                return;
            }
            for request in std::mem::take(&mut self.requests) {
                match request {
                    DeferredRequest::Focus(target) => {
                        // Already logged by set_keyboard_control.
                        let _ = self.set_keyboard_control(target);
                    }
                    DeferredRequest::Custom(apply) => apply(self),
                }
            }
        }
        if !self.requests.is_empty() {
            tracing::debug!(
                target: targets::INPUT,
                pending = self.requests.len(),
                "deferring remaining requests to next tick"
            );
        }
    }
}

fn usage_error(error: ControlsError, operation: &'static str) -> ControlsError {
    tracing::error!(target: targets::TREE, %error, operation, "control manager usage error");
    error
}

static_assertions::assert_impl_all!(ControlManager: Send, Sync);
static_assertions::assert_impl_all!(DeferredRequest: Send, Sync);

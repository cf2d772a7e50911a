//! Input collaborators: pointer devices and key event sources.
//!
//! The [`ControlManager`](crate::manager::ControlManager) polls a
//! [`PointerDevice`] once per tick and drains a [`KeyEventSource`]. Hosts
//! implement these over their windowing layer. [`ChannelKeySource`] covers
//! the common case of a native keyboard hook running on another thread.

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use horizon_controls_core::Point;
use horizon_controls_core::logging::targets;

use crate::widget::{CharacterEventArgs, ControlMessage, KeyEventArgs, MouseButton, MouseButtons};

/// A snapshot of the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Absolute position in host coordinates.
    pub position: Point,
    /// Cumulative scroll wheel value since the device was created.
    pub scroll: i32,
    /// Pressed state per [`MouseButton`] index.
    pub buttons: [bool; MouseButton::COUNT],
}

impl PointerState {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Set a button's pressed state (builder pattern).
    pub fn with_button(mut self, button: MouseButton, pressed: bool) -> Self {
        self.buttons[button.index()] = pressed;
        self
    }

    /// Set the cumulative scroll value (builder pattern).
    pub fn with_scroll(mut self, scroll: i32) -> Self {
        self.scroll = scroll;
        self
    }

    #[inline]
    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    /// Pressed buttons as a mask.
    pub fn button_mask(&self) -> MouseButtons {
        MouseButtons::from_pressed(&self.buttons)
    }

    /// The same position and scroll with every button released.
    pub fn released(&self) -> Self {
        Self {
            buttons: [false; MouseButton::COUNT],
            ..*self
        }
    }
}

/// A pointer the manager can poll.
pub trait PointerDevice {
    /// The pointer state right now.
    fn poll(&mut self) -> PointerState;
}

/// A pointer device that replays queued states.
///
/// Each poll takes the next queued state; once the queue is empty the last
/// state repeats.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPointer {
    queue: VecDeque<PointerState>,
    last: PointerState,
}

impl ScriptedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a state for a later poll.
    pub fn push(&mut self, state: PointerState) -> &mut Self {
        self.queue.push_back(state);
        self
    }

    /// Number of states not yet polled.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl PointerDevice for ScriptedPointer {
    fn poll(&mut self) -> PointerState {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// A keyboard event from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyEvent {
    Character(CharacterEventArgs),
    KeyDown(KeyEventArgs),
    KeyUp(KeyEventArgs),
}

impl KeyEvent {
    /// The message delivered to the focused widget.
    pub fn to_message(self) -> ControlMessage {
        match self {
            Self::Character(args) => ControlMessage::KeyCharacter(args),
            Self::KeyDown(args) => ControlMessage::KeyDown(args),
            Self::KeyUp(args) => ControlMessage::KeyUp(args),
        }
    }
}

/// A source of keyboard events the manager drains once per tick.
pub trait KeyEventSource {
    /// The next pending event, or `None` when nothing is pending.
    fn poll_event(&mut self) -> Option<KeyEvent>;
}

/// No keyboard at all.
impl KeyEventSource for () {
    fn poll_event(&mut self) -> Option<KeyEvent> {
        None
    }
}

impl KeyEventSource for VecDeque<KeyEvent> {
    fn poll_event(&mut self) -> Option<KeyEvent> {
        self.pop_front()
    }
}

/// Sending half of a [`ChannelKeySource`]. Cheap to clone; give one to each
/// producer thread.
#[derive(Debug, Clone)]
pub struct KeySender {
    sender: Sender<KeyEvent>,
}

impl KeySender {
    /// Queue an event. Returns `false` if the source was dropped.
    pub fn send(&self, event: KeyEvent) -> bool {
        let send_result = self.sender.send(event);
        if send_result.is_err() {
            tracing::trace!(target: targets::INPUT, "key source dropped, discarding key event");
        }
        send_result.is_ok()
    }

    pub fn send_character(&self, character: char, param: u32) -> bool {
        self.send(KeyEvent::Character(CharacterEventArgs::new(character, param)))
    }

    pub fn send_key_down(&self, args: KeyEventArgs) -> bool {
        self.send(KeyEvent::KeyDown(args))
    }

    pub fn send_key_up(&self, args: KeyEventArgs) -> bool {
        self.send(KeyEvent::KeyUp(args))
    }
}

/// Key events delivered over an unbounded channel.
#[derive(Debug)]
pub struct ChannelKeySource {
    receiver: Receiver<KeyEvent>,
}

impl ChannelKeySource {
    /// Create a connected sender/source pair.
    pub fn new() -> (KeySender, ChannelKeySource) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (KeySender { sender }, ChannelKeySource { receiver })
    }

    /// Number of events waiting.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl KeyEventSource for ChannelKeySource {
    fn poll_event(&mut self) -> Option<KeyEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

static_assertions::assert_impl_all!(KeySender: Send, Sync, Clone);
static_assertions::assert_impl_all!(ChannelKeySource: Send);

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::widget::KeyCode;

    #[test]
    fn test_scripted_pointer_repeats_last_state() {
        let mut pointer = ScriptedPointer::new();
        pointer
            .push(PointerState::new(Point::new(1.0, 1.0)))
            .push(PointerState::new(Point::new(2.0, 2.0)).with_button(MouseButton::Left, true));

        assert_eq!(pointer.poll().position, Point::new(1.0, 1.0));
        let second = pointer.poll();
        assert!(second.is_pressed(MouseButton::Left));
        assert_eq!(pointer.poll(), second);
        assert_eq!(pointer.remaining(), 0);
    }

    #[test]
    fn test_released_keeps_position_and_scroll() {
        let state = PointerState::new(Point::new(3.0, 4.0))
            .with_scroll(240)
            .with_button(MouseButton::Right, true);
        let released = state.released();
        assert_eq!(released.position, state.position);
        assert_eq!(released.scroll, 240);
        assert!(released.button_mask().is_empty());
    }

    #[test]
    fn test_channel_source_across_threads() {
        let (sender, mut source) = ChannelKeySource::new();
        let handle = thread::spawn(move || {
            sender.send_character('x', 1);
            sender.send_key_down(KeyEventArgs::new(KeyCode::ENTER, true, false));
        });
        handle.join().unwrap();

        assert_eq!(source.pending(), 2);
        assert_eq!(
            source.poll_event(),
            Some(KeyEvent::Character(CharacterEventArgs::new('x', 1)))
        );
        assert!(matches!(source.poll_event(), Some(KeyEvent::KeyDown(args)) if args.shift));
        assert_eq!(source.poll_event(), None);
    }

    #[test]
    fn test_sender_reports_dropped_source() {
        let (sender, source) = ChannelKeySource::new();
        drop(source);
        assert!(!sender.send_character('a', 0));
    }
}

//! The message vocabulary passed from the input router to widgets.
//!
//! Every input a widget can receive arrives as a [`ControlMessage`] through
//! [`Widget::event`](super::Widget::event). The default implementation of
//! that method demultiplexes the message into the typed `on_*` hooks.

use horizon_controls_core::Point;

/// Pointer buttons, in routing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Middle button (scroll wheel click).
    Middle = 1,
    /// Secondary button (usually right).
    Right = 2,
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: usize = 3;

    /// All buttons in priority order.
    pub const ALL: [MouseButton; Self::COUNT] =
        [MouseButton::Left, MouseButton::Middle, MouseButton::Right];

    /// Zero-based index of this button.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A set of pressed mouse buttons, one bit per [`MouseButton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseButtons(u8);

impl MouseButtons {
    /// No buttons pressed.
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const MIDDLE: Self = Self(2);
    pub const RIGHT: Self = Self(4);

    /// Build a mask from raw bits. Bits above the tracked buttons are dropped.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b111)
    }

    /// Build a mask from per-button pressed flags.
    pub fn from_pressed(pressed: &[bool; MouseButton::COUNT]) -> Self {
        let bits = pressed
            .iter()
            .enumerate()
            .filter(|(_, down)| **down)
            .fold(0u8, |bits, (i, _)| bits | (1 << i));
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether `button` is in the set.
    #[inline]
    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & (1 << button as u8) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for MouseButtons {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Payload of every pointer message.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseEventArgs {
    /// Absolute pointer position in UI space, after the manager's offset.
    pub position: Point,
    /// Buttons held when the message was generated.
    pub buttons: MouseButtons,
    /// The button that changed, for down, up and click messages.
    pub button: Option<MouseButton>,
    /// Scroll change since the previous frame. Zero except for wheel messages.
    pub wheel_delta: i32,
}

impl MouseEventArgs {
    pub fn new(position: Point, buttons: MouseButtons) -> Self {
        Self {
            position,
            buttons,
            button: None,
            wheel_delta: 0,
        }
    }

    /// Name the button that changed (builder pattern).
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Whether this message was caused by `button`.
    #[inline]
    pub fn is_button(&self, button: MouseButton) -> bool {
        self.button == Some(button)
    }

    /// Attach a wheel delta (builder pattern).
    pub fn with_wheel_delta(mut self, delta: i32) -> Self {
        self.wheel_delta = delta;
        self
    }
}

/// A platform virtual key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyCode(pub u32);

impl KeyCode {
    pub const BACKSPACE: Self = Self(0x08);
    pub const TAB: Self = Self(0x09);
    pub const ENTER: Self = Self(0x0d);
    pub const SHIFT: Self = Self(0x10);
    pub const CONTROL: Self = Self(0x11);
    pub const ESCAPE: Self = Self(0x1b);
    pub const SPACE: Self = Self(0x20);
    pub const LEFT: Self = Self(0x25);
    pub const UP: Self = Self(0x26);
    pub const RIGHT: Self = Self(0x27);
    pub const DOWN: Self = Self(0x28);
    pub const DELETE: Self = Self(0x2e);
}

/// Payload of key-down and key-up messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEventArgs {
    /// The key that changed state.
    pub key: KeyCode,
    /// Whether shift was held.
    pub shift: bool,
    /// Whether control was held.
    pub control: bool,
}

impl KeyEventArgs {
    const SHIFT_BIT: u32 = 1;
    const CONTROL_BIT: u32 = 2;

    pub fn new(key: KeyCode, shift: bool, control: bool) -> Self {
        Self {
            key,
            shift,
            control,
        }
    }

    /// Decode modifiers packed as shift in bit 0 and control in bit 1.
    pub fn from_packed(key: KeyCode, modifiers: u32) -> Self {
        Self::new(
            key,
            modifiers & Self::SHIFT_BIT != 0,
            modifiers & Self::CONTROL_BIT != 0,
        )
    }

    /// Inverse of [`from_packed`](Self::from_packed).
    pub fn packed_modifiers(&self) -> u32 {
        (if self.shift { Self::SHIFT_BIT } else { 0 })
            | (if self.control { Self::CONTROL_BIT } else { 0 })
    }
}

/// Payload of character messages.
///
/// `param` is the native keystroke word delivered with the character:
///
/// | Bits  | Meaning                                 |
/// |-------|-----------------------------------------|
/// | 0-15  | repeat count                            |
/// | 24    | extended key                            |
/// | 29    | alt held                                |
/// | 30    | key was already down                    |
/// | 31    | key is being released                   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterEventArgs {
    /// The character that was typed.
    pub character: char,
    /// Raw keystroke word.
    pub param: u32,
}

impl CharacterEventArgs {
    pub fn new(character: char, param: u32) -> Self {
        Self { character, param }
    }

    #[inline]
    pub fn repeat_count(&self) -> u16 {
        (self.param & 0xffff) as u16
    }

    #[inline]
    pub fn extended_key(&self) -> bool {
        self.param & (1 << 24) != 0
    }

    /// Whether alt was held while the character was typed.
    #[inline]
    pub fn alt_pressed(&self) -> bool {
        self.param & (1 << 29) != 0
    }

    #[inline]
    pub fn previous_state(&self) -> bool {
        self.param & (1 << 30) != 0
    }

    #[inline]
    pub fn transition_state(&self) -> bool {
        self.param & (1 << 31) != 0
    }
}

/// A message delivered to a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    /// A character was typed while the widget had focus.
    KeyCharacter(CharacterEventArgs),
    /// A key was pressed while the widget had focus.
    KeyDown(KeyEventArgs),
    /// A key was released while the widget had focus.
    KeyUp(KeyEventArgs),
    /// The pointer moved over (or while captured by) the widget.
    MouseMove(MouseEventArgs),
    /// A button was pressed over the widget.
    MouseDown(MouseEventArgs),
    /// A button was released while the widget was the pointer target.
    MouseUp(MouseEventArgs),
    /// A press and release happened on the same widget.
    MouseClick(MouseEventArgs),
    /// The scroll wheel moved; see [`MouseEventArgs::wheel_delta`].
    MouseWheel(MouseEventArgs),
    /// The widget became the pointer target.
    MouseEnter,
    /// The widget stopped being the pointer target.
    MouseLeave,
    /// The widget received keyboard focus.
    GotFocus,
    /// The widget lost keyboard focus.
    LostFocus,
    /// The widget's size changed.
    SizeChanged,
    /// The widget's position changed.
    LocationChanged,
}

impl ControlMessage {
    /// Short name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::KeyCharacter(_) => "KeyCharacter",
            Self::KeyDown(_) => "KeyDown",
            Self::KeyUp(_) => "KeyUp",
            Self::MouseMove(_) => "MouseMove",
            Self::MouseDown(_) => "MouseDown",
            Self::MouseUp(_) => "MouseUp",
            Self::MouseClick(_) => "MouseClick",
            Self::MouseWheel(_) => "MouseWheel",
            Self::MouseEnter => "MouseEnter",
            Self::MouseLeave => "MouseLeave",
            Self::GotFocus => "GotFocus",
            Self::LostFocus => "LostFocus",
            Self::SizeChanged => "SizeChanged",
            Self::LocationChanged => "LocationChanged",
        }
    }

    /// The pointer payload, for pointer messages.
    pub fn mouse_args(&self) -> Option<&MouseEventArgs> {
        match self {
            Self::MouseMove(args)
            | Self::MouseDown(args)
            | Self::MouseUp(args)
            | Self::MouseClick(args)
            | Self::MouseWheel(args) => Some(args),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mask_from_pressed() {
        let mask = MouseButtons::from_pressed(&[true, false, true]);
        assert!(mask.contains(MouseButton::Left));
        assert!(!mask.contains(MouseButton::Middle));
        assert!(mask.contains(MouseButton::Right));
        assert_eq!(mask, MouseButtons::LEFT | MouseButtons::RIGHT);
        assert!(MouseButtons::from_pressed(&[false; 3]).is_empty());
    }

    #[test]
    fn test_key_modifier_packing() {
        let args = KeyEventArgs::from_packed(KeyCode::ENTER, 3);
        assert!(args.shift && args.control);
        assert_eq!(KeyEventArgs::from_packed(KeyCode::TAB, 1).packed_modifiers(), 1);
        assert_eq!(KeyEventArgs::new(KeyCode::TAB, false, true).packed_modifiers(), 2);
    }

    #[test]
    fn test_character_param_bits() {
        let param = 3 | (1 << 24) | (1 << 29) | (1 << 31);
        let args = CharacterEventArgs::new('a', param);
        assert_eq!(args.repeat_count(), 3);
        assert!(args.extended_key());
        assert!(args.alt_pressed());
        assert!(!args.previous_state());
        assert!(args.transition_state());
    }

    #[test]
    fn test_mouse_args_accessor() {
        let args = MouseEventArgs::new(Point::new(1.0, 2.0), MouseButtons::LEFT).with_wheel_delta(-120);
        assert_eq!(ControlMessage::MouseWheel(args).mouse_args(), Some(&args));
        assert_eq!(ControlMessage::GotFocus.mouse_args(), None);
        assert_eq!(ControlMessage::MouseEnter.name(), "MouseEnter");
    }
}

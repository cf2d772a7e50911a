//! Stock widgets.
//!
//! - [`Panel`]: the plain container
//! - [`PushButton`]: a button with an animated hover highlight
//! - [`SwitchBox`]: an on/off switch with a sliding handle

mod panel;
mod push_button;
mod switch_box;

pub use panel::Panel;
pub use push_button::PushButton;
pub use switch_box::{SwitchBox, SwitchBoxKind};

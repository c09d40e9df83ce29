//! Input: raw device events mapped onto a fixed set of logical buttons.
//!
//! # Invariants
//! - Every physical source resolves to exactly one logical button or is ignored.
//! - `just_pressed` lives for exactly one tick; `InputState::update` clears it.

mod button;
mod state;
mod touch;

pub use button::{Button, InputError, KeyBinding, KeyBindings, LogicalButton};
pub use state::InputState;
pub use touch::{Rect, TouchRegion};

pub fn crate_info() -> &'static str {
    "menagerie-input v0.1.0"
}

//! Stock components.
//!
//! [`SkinInstance`] places an animated model under its owner's node and keeps
//! its mixer running. [`Player`] turns, moves and respawns its owner from the
//! logical input buttons. [`spawn_showcase`] lines up a set of models, each
//! playing its first clip.

mod player;
mod showcase;
mod skin;

pub use player::{Player, PlayerConfig};
pub use showcase::{SHOWCASE_SPACING, showcase_x, spawn_showcase};
pub use skin::SkinInstance;

pub fn crate_info() -> &'static str {
    "menagerie-behaviors v0.1.0"
}

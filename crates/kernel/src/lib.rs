//! Frame loop: time accounting, the asset barrier and per-tick ordering.
//!
//! # Invariants
//! - Delta time is clamped to `[0, max_delta]`.
//! - Within a tick, entities update before input edges are cleared.
//! - The init hook runs at most once, and only after every requested model
//!   arrived.

mod clock;
mod config;
mod frame_loop;

pub use clock::{FrameClock, FrameTimer};
pub use config::{ConfigError, LoopConfig};
pub use frame_loop::{FrameLoop, InitHook, TickReport};

pub fn crate_info() -> &'static str {
    "menagerie-kernel v0.1.0"
}

//! Rendering adapter: the narrow services the entity runtime calls into.
//!
//! # Invariants
//! - The runtime never draws; it places nodes, drives mixers and asks
//!   visibility questions through these traits.
//! - Unknown node, mixer or action ids are no-ops, never panics.
//!
//! # Workaround
//! `HeadlessScene` implements every service by bookkeeping alone so the
//! runtime can be driven and tested without a GPU. A real engine backend
//! implements the same traits.

mod camera;
mod frustum;
mod headless;
mod services;

pub use camera::Camera;
pub use frustum::{Frustum, FrustumTest};
pub use headless::{ActionState, HeadlessScene};
pub use services::{ActionId, Animator, MixerId, SceneGraph, SceneServices, Visibility};

pub fn crate_info() -> &'static str {
    "menagerie-render v0.1.0"
}

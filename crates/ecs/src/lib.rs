//! Entity/component runtime.
//!
//! Entities own an ordered list of components and a scene node. The
//! [`EntityManager`] updates every entity once per tick; entities and
//! components can be created or removed at any time, including from inside
//! an update, without disturbing the pass in progress.
//!
//! # Invariants
//! - Update order is insertion order, for entities and for components.
//! - Additions become visible at the next pass; removals take effect
//!   immediately for the current pass and physically by its end.
//! - Component failures are logged and never stop the rest of the tick.

mod component;
mod context;
mod deferred;
mod entity;
mod manager;

pub use component::{Component, ComponentError, ComponentId, ComponentKind};
pub use context::{FrameContext, UpdateContext};
pub use deferred::{DeferredList, Keyed, Pending};
pub use entity::Entity;
pub use manager::EntityManager;

pub fn crate_info() -> &'static str {
    "menagerie-ecs v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("ecs"));
    }
}

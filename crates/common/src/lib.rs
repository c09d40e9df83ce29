//! Shared types: entity/node/model identifiers and the spatial transform.

mod types;

pub use types::{EntityId, ModelId, NodeId, Transform};

pub fn crate_info() -> &'static str {
    "menagerie-common v0.1.0"
}

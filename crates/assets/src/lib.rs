//! Asset loading: glTF metadata import, completion signals and the
//! "all N loaded" barrier that gates scene initialization.
//!
//! Models are identified by content-addressed hashes. The runtime consumes
//! them by name through a [`ModelLibrary`], never by raw file paths.
//!
//! # Invariants
//! - A model is visible in the library only once fully imported.
//! - The barrier reports `Ready` only when every requested model arrived.

mod gltf;
mod loader;
mod model;

pub use gltf::{import_gltf, import_gltf_bytes};
pub use loader::{Completion, LoadStatus, LoadTracker};
pub use model::{AnimationClip, ModelData, ModelLibrary};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("glTF parse error: {0}")]
    GltfParse(String),
}

pub fn crate_info() -> &'static str {
    "menagerie-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}

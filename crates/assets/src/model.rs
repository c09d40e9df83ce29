use menagerie_common::ModelId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A named animation clip and its length in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
}

/// Imported model metadata. Clips keep file order; the first one is the
/// default animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelData {
    pub id: ModelId,
    pub name: String,
    pub source: String,
    pub clips: Vec<AnimationClip>,
    pub meshes: Vec<String>,
}

impl ModelData {
    /// In-memory model with the given clips, for hosts without model files.
    pub fn placeholder(name: &str, clips: &[(&str, f32)]) -> Self {
        Self {
            id: content_id(name.as_bytes()),
            name: name.to_string(),
            source: format!("placeholder:{name}"),
            clips: clips
                .iter()
                .map(|(clip, duration)| AnimationClip {
                    name: (*clip).to_string(),
                    duration: *duration,
                })
                .collect(),
            meshes: Vec::new(),
        }
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }

    pub fn first_clip(&self) -> Option<&AnimationClip> {
        self.clips.first()
    }
}

/// Content hash of raw asset bytes, truncated to 64 bits.
pub(crate) fn content_id(bytes: &[u8]) -> ModelId {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    let mut id = [0u8; 8];
    id.copy_from_slice(&result[..8]);
    ModelId(u64::from_le_bytes(id))
}

/// Loaded models by name.
#[derive(Debug, Clone, Default)]
pub struct ModelLibrary {
    models: BTreeMap<String, Arc<ModelData>>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: Arc<ModelData>) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModelData>> {
        self.models.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModelData>> {
        self.models.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_keeps_clip_order() {
        let model = ModelData::placeholder("bird", &[("Fly", 1.0), ("Dive", 0.5)]);
        assert_eq!(model.first_clip().unwrap().name, "Fly");
        assert_eq!(model.clip("Dive").unwrap().duration, 0.5);
        assert!(model.clip("Walk").is_none());
    }

    #[test]
    fn content_id_is_stable() {
        assert_eq!(content_id(b"zebra"), content_id(b"zebra"));
        assert_ne!(content_id(b"zebra"), content_id(b"horse"));
    }

    #[test]
    fn library_lookup_by_name() {
        let mut lib = ModelLibrary::new();
        lib.insert(Arc::new(ModelData::placeholder("horse", &[])));
        assert_eq!(lib.len(), 1);
        assert!(lib.get("horse").is_some());
        assert!(lib.get("zebra").is_none());
    }
}

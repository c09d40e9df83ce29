use serde_json::Value;
use std::path::Path;

use crate::AssetError;
use crate::model::{AnimationClip, ModelData, content_id};

/// Import model metadata from a glTF JSON file on disk.
pub fn import_gltf(name: &str, path: impl AsRef<Path>) -> Result<ModelData, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    import_gltf_bytes(name, &path.display().to_string(), &bytes)
}

/// Import model metadata from glTF JSON bytes.
///
/// Reads animation names and durations plus mesh names. A clip's duration is
/// the largest keyframe time among the input accessors of its samplers.
pub fn import_gltf_bytes(name: &str, source: &str, bytes: &[u8]) -> Result<ModelData, AssetError> {
    let json: Value =
        serde_json::from_slice(bytes).map_err(|e| AssetError::GltfParse(e.to_string()))?;
    if !json.is_object() {
        return Err(AssetError::GltfParse("top level is not an object".into()));
    }

    let accessors = json
        .get("accessors")
        .and_then(|a| a.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut clips = Vec::new();
    if let Some(animations) = json.get("animations").and_then(|a| a.as_array()) {
        for (i, anim) in animations.iter().enumerate() {
            let clip_name = anim
                .get("name")
                .and_then(|n| n.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("animation_{i}"));
            let duration = anim
                .get("samplers")
                .and_then(|s| s.as_array())
                .map(|samplers| {
                    samplers
                        .iter()
                        .filter_map(|s| s.get("input").and_then(|i| i.as_u64()))
                        .filter_map(|input| accessor_max(accessors, input as usize))
                        .fold(0.0f32, f32::max)
                })
                .unwrap_or(0.0);
            clips.push(AnimationClip {
                name: clip_name,
                duration,
            });
        }
    }

    let meshes = json
        .get("meshes")
        .and_then(|m| m.as_array())
        .map(|meshes| {
            meshes
                .iter()
                .enumerate()
                .map(|(i, mesh)| {
                    mesh.get("name")
                        .and_then(|n| n.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("mesh_{i}"))
                })
                .collect()
        })
        .unwrap_or_default();

    tracing::debug!(name, source, clips = clips.len(), "imported glTF metadata");

    Ok(ModelData {
        id: content_id(bytes),
        name: name.to_string(),
        source: source.to_string(),
        clips,
        meshes,
    })
}

fn accessor_max(accessors: &[Value], index: usize) -> Option<f32> {
    accessors
        .get(index)?
        .get("max")?
        .as_array()?
        .first()?
        .as_f64()
        .map(|v| v as f32)
}

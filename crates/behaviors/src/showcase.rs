use std::sync::Arc;

use glam::Vec3;
use menagerie_assets::ModelData;
use menagerie_common::EntityId;
use menagerie_ecs::EntityManager;
use menagerie_render::SceneServices;

use crate::skin::SkinInstance;

/// Distance between neighbours in the showcase row.
pub const SHOWCASE_SPACING: f32 = 3.0;

/// Row slot that sits at the origin.
const CENTER_SLOT: f32 = 3.0;

/// X position of the `index`-th showcased model.
pub fn showcase_x(index: usize) -> f32 {
    (index as f32 - CENTER_SLOT) * SHOWCASE_SPACING
}

/// Put each model in a row along X, every one playing its first clip.
///
/// One entity per model, named after it, created under the scene root at
/// [`showcase_x`]. Returns the new entity ids in row order.
pub fn spawn_showcase<S: SceneServices + ?Sized>(
    models: &[Arc<ModelData>],
    entities: &mut EntityManager,
    scene: &mut S,
) -> Vec<EntityId> {
    let root = scene.root();
    let mut spawned = Vec::with_capacity(models.len());
    for (index, model) in models.iter().enumerate() {
        let entity = entities.create_entity(scene, root, &model.name);
        entity.transform.position = Vec3::new(showcase_x(index), 0.0, 0.0);
        let node = entity.node();
        let skin = entity.add_component(SkinInstance::new(scene, node, Arc::clone(model)));
        match model.first_clip() {
            Some(clip) => {
                let clip = clip.name.clone();
                skin.set_animation(scene, &clip);
            }
            None => tracing::debug!(model = %model.name, "model has no clips, shown still"),
        }
        spawned.push(entity.id());
    }
    tracing::info!(models = spawned.len(), "showcase spawned");
    spawned
}

use menagerie_common::{EntityId, NodeId};
use menagerie_input::InputState;
use menagerie_render::{SceneGraph, SceneServices};

use crate::context::FrameContext;
use crate::deferred::DeferredList;
use crate::entity::Entity;

/// Owns every entity and fans the per-tick update out to them.
#[derive(Debug, Default)]
pub struct EntityManager {
    entities: DeferredList<Entity>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with its node under `parent`. It is usable at once
    /// and first updated by the next [`EntityManager::update`].
    pub fn create_entity<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        parent: NodeId,
        name: &str,
    ) -> &mut Entity {
        let entity = Entity::new(scene, parent, name);
        tracing::debug!(id = %entity.id(), name, node = ?entity.node(), "entity created");
        self.entities.add(entity)
    }

    /// Drop the entity at the next pass boundary. Unknown ids are ignored.
    pub fn remove_entity(&mut self, id: EntityId) {
        tracing::debug!(%id, "entity removal queued");
        self.entities.remove(id);
    }

    /// Update every live entity once, in creation order. Returns how many
    /// entities were visited.
    pub fn update(
        &mut self,
        frame: &FrameContext<'_>,
        input: &InputState,
        scene: &mut dyn SceneServices,
    ) -> usize {
        let _span = tracing::info_span!("entities", frame = frame.frame).entered();
        let mut visited = 0;
        self.entities.for_each(|entity, pending| {
            visited += 1;
            entity.update(frame, input, &mut *scene, &mut pending.reborrow());
        });
        visited
    }

    /// Push every entity's transform onto its scene node.
    pub fn sync_to_scene<S: SceneGraph + ?Sized>(&self, scene: &mut S) {
        for entity in self.entities.iter() {
            scene.set_transform(entity.node(), &entity.transform);
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// First entity named `name`; names are not unique.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

use glam::Vec3;
use menagerie_common::{EntityId, NodeId, Transform};
use menagerie_input::InputState;
use menagerie_render::{Camera, SceneServices, Visibility};

use crate::component::{Component, ComponentId, ComponentSlot};
use crate::deferred::Pending;
use crate::entity::Entity;

/// Per-tick values shared by every component.
///
/// Built once by the frame loop and lent immutably for the whole pass.
#[derive(Clone, Copy)]
pub struct FrameContext<'a> {
    /// Seconds since the loop started.
    pub time: f32,
    /// Seconds since the previous tick, already clamped.
    pub delta_time: f32,
    pub frame: u64,
    pub camera: Camera,
    visibility: &'a dyn Visibility,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        time: f32,
        delta_time: f32,
        frame: u64,
        camera: Camera,
        visibility: &'a dyn Visibility,
    ) -> Self {
        Self {
            time,
            delta_time,
            frame,
            camera,
            visibility,
        }
    }

    /// Whether `point` lies inside this tick's camera frustum.
    pub fn is_visible(&self, point: Vec3) -> bool {
        self.visibility.contains_point(&self.camera, point)
    }
}

impl std::fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameContext")
            .field("time", &self.time)
            .field("delta_time", &self.delta_time)
            .field("frame", &self.frame)
            .field("camera", &self.camera)
            .finish_non_exhaustive()
    }
}

/// Everything one component may touch during its update.
///
/// The owner's transform is lent mutably. Component and entity changes made
/// here are deferred: additions first run next tick, removals skip the rest
/// of this one.
pub struct UpdateContext<'a> {
    pub frame: &'a FrameContext<'a>,
    pub input: &'a InputState,
    pub scene: &'a mut dyn SceneServices,
    pub transform: &'a mut Transform,
    pub(crate) entity: EntityId,
    pub(crate) name: &'a str,
    pub(crate) node: NodeId,
    pub(crate) components: Pending<'a, ComponentSlot>,
    pub(crate) next_component: &'a mut u64,
    pub(crate) entities: Pending<'a, Entity>,
}

impl UpdateContext<'_> {
    /// The owning entity.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// The owner's scene node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn delta_time(&self) -> f32 {
        self.frame.delta_time
    }

    /// Attach another component to the owner.
    pub fn add_component<C: Component>(&mut self, component: C) -> &mut C {
        let id = ComponentId(*self.next_component);
        *self.next_component += 1;
        tracing::debug!(entity = %self.entity, kind = %C::KIND, "component queued");
        self.components
            .add(ComponentSlot::new(id, component))
            .typed_mut::<C>()
    }

    pub fn remove_component(&mut self, id: ComponentId) {
        self.components.remove(id);
    }

    /// First other live component of type `C` on the owner. Never the
    /// component being updated, nor one added this tick.
    pub fn sibling<C: Component>(&self) -> Option<&C> {
        self.components
            .others()
            .find_map(|slot| slot.downcast_ref::<C>())
    }

    pub fn sibling_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .others_mut()
            .find_map(|slot| slot.downcast_mut::<C>())
    }

    /// [`UpdateContext::sibling_mut`] together with the scene services.
    pub fn sibling_with_scene<C: Component>(&mut self) -> Option<(&mut C, &mut dyn SceneServices)> {
        let sibling = self
            .components
            .others_mut()
            .find_map(|slot| slot.downcast_mut::<C>())?;
        Some((sibling, &mut *self.scene))
    }

    /// Create an entity whose node hangs under `parent`.
    pub fn create_entity(&mut self, parent: NodeId, name: &str) -> &mut Entity {
        let entity = Entity::new(&mut *self.scene, parent, name);
        tracing::debug!(id = %entity.id(), name, "entity queued");
        self.entities.add(entity)
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        tracing::debug!(%id, "entity removal queued");
        self.entities.remove(id);
    }

    /// Remove the owner. The current pass still finishes its components.
    pub fn remove_self(&mut self) {
        let id = self.entity;
        self.remove_entity(id);
    }
}

use menagerie_common::{EntityId, NodeId, Transform};
use menagerie_input::InputState;
use menagerie_render::{SceneGraph, SceneServices};

use crate::component::{Component, ComponentId, ComponentKind, ComponentSlot};
use crate::context::{FrameContext, UpdateContext};
use crate::deferred::{DeferredList, Keyed, Pending};

/// A named object in the scene: a transform node plus ordered components.
pub struct Entity {
    id: EntityId,
    name: String,
    node: NodeId,
    pub transform: Transform,
    components: DeferredList<ComponentSlot>,
    next_component: u64,
}

impl Entity {
    /// Create the entity's node under `parent`.
    pub(crate) fn new<S: SceneGraph + ?Sized>(scene: &mut S, parent: NodeId, name: &str) -> Self {
        let node = scene.create_child(parent);
        Self {
            id: EntityId::new(),
            name: name.to_string(),
            node,
            transform: Transform::default(),
            components: DeferredList::new(),
            next_component: 0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Append a component; it runs after every component added before it.
    pub fn add_component<C: Component>(&mut self, component: C) -> &mut C {
        let id = ComponentId(self.next_component);
        self.next_component += 1;
        tracing::debug!(entity = %self.id, kind = %C::KIND, ?id, "component added");
        self.components
            .add(ComponentSlot::new(id, component))
            .typed_mut::<C>()
    }

    pub fn remove_component(&mut self, id: ComponentId) {
        self.components.remove(id);
    }

    /// First component of type `C`.
    pub fn get_component<C: Component>(&self) -> Option<&C> {
        self.components.iter().find_map(|slot| slot.downcast_ref::<C>())
    }

    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .find_map(|slot| slot.downcast_mut::<C>())
    }

    /// The component with `id`, if it has type `C`.
    pub fn component_by_id<C: Component>(&self, id: ComponentId) -> Option<&C> {
        self.components.get(id)?.downcast_ref::<C>()
    }

    /// Ids in update order.
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.components.iter().map(|slot| slot.id).collect()
    }

    pub fn component_kinds(&self) -> Vec<ComponentKind> {
        self.components.iter().map(|slot| slot.kind()).collect()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn update(
        &mut self,
        frame: &FrameContext<'_>,
        input: &InputState,
        scene: &mut dyn SceneServices,
        entities: &mut Pending<'_, Entity>,
    ) {
        let Self {
            id,
            name,
            node,
            transform,
            components,
            next_component,
        } = self;
        components.for_each(|slot, pending| {
            let mut cx = UpdateContext {
                frame,
                input,
                scene: &mut *scene,
                transform: &mut *transform,
                entity: *id,
                name: name.as_str(),
                node: *node,
                components: pending.reborrow(),
                next_component: &mut *next_component,
                entities: entities.reborrow(),
            };
            if let Err(e) = slot.component.update_dyn(&mut cx) {
                tracing::warn!(
                    entity = %id,
                    name = %name,
                    kind = %slot.kind(),
                    error = %e,
                    "component update failed"
                );
            }
        });
    }
}

impl Keyed for Entity {
    type Key = EntityId;

    fn key(&self) -> EntityId {
        self.id
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("node", &self.node)
            .field("transform", &self.transform)
            .field("components", &self.component_kinds())
            .finish()
    }
}

use std::any::Any;

use crate::context::UpdateContext;
use crate::deferred::Keyed;

/// Stable identifier of a component kind.
///
/// Lookups compare kinds first, so two component types only match when they
/// declare the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(&'static str);

impl ComponentKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Identifier of one attached component, unique within its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

/// Why a component skipped its work this tick.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("required component {0} not found")]
    MissingComponent(ComponentKind),
    #[error("asset not available: {0}")]
    MissingAsset(String),
}

/// A unit of per-entity behavior.
///
/// `update` runs once per tick in attachment order. It borrows the owner's
/// transform and the shared frame state through the [`UpdateContext`]; on
/// failure it should leave the owner untouched and return an error, which
/// is logged without interrupting the tick.
pub trait Component: Any {
    const KIND: ComponentKind;

    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<(), ComponentError> {
        let _ = cx;
        Ok(())
    }
}

/// Object-safe face of [`Component`].
pub(crate) trait DynComponent: Any {
    fn kind(&self) -> ComponentKind;
    fn update_dyn(&mut self, cx: &mut UpdateContext<'_>) -> Result<(), ComponentError>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> DynComponent for C {
    fn kind(&self) -> ComponentKind {
        C::KIND
    }

    fn update_dyn(&mut self, cx: &mut UpdateContext<'_>) -> Result<(), ComponentError> {
        self.update(cx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub(crate) struct ComponentSlot {
    pub(crate) id: ComponentId,
    pub(crate) component: Box<dyn DynComponent>,
}

impl ComponentSlot {
    pub(crate) fn new<C: Component>(id: ComponentId, component: C) -> Self {
        Self {
            id,
            component: Box::new(component),
        }
    }

    pub(crate) fn kind(&self) -> ComponentKind {
        self.component.kind()
    }

    pub(crate) fn downcast_ref<C: Component>(&self) -> Option<&C> {
        if self.kind() != C::KIND {
            return None;
        }
        self.component.as_any().downcast_ref::<C>()
    }

    pub(crate) fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        if self.kind() != C::KIND {
            return None;
        }
        self.component.as_any_mut().downcast_mut::<C>()
    }

    /// For a slot just built from a `C`.
    pub(crate) fn typed_mut<C: Component>(&mut self) -> &mut C {
        self.downcast_mut::<C>()
            .expect("slot holds the component type it was built from")
    }
}

impl Keyed for ComponentSlot {
    type Key = ComponentId;

    fn key(&self) -> ComponentId {
        self.id
    }
}

impl std::fmt::Debug for ComponentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSlot")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .finish()
    }
}

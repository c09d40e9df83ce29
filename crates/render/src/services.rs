use glam::Vec3;
use menagerie_common::{ModelId, NodeId, Transform};

use crate::camera::Camera;

/// Handle to an animation mixer bound to one model instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MixerId(pub u32);

/// Handle to a clip action owned by a mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u32);

/// Scene-graph placement. Entities call this once at construction and the
/// frame loop pushes transforms through it every tick.
pub trait SceneGraph {
    /// The scene root every other node hangs under.
    fn root(&self) -> NodeId;

    /// Create a detached node.
    fn create_node(&mut self) -> NodeId;

    /// Re-parent `child` under `parent`. Returns false if either is unknown.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> bool;

    fn set_transform(&mut self, node: NodeId, transform: &Transform);

    /// Clone a loaded model's node hierarchy under `parent`, returning its root.
    fn instantiate_model(&mut self, model: ModelId, parent: NodeId) -> NodeId;

    /// Create a node and attach it under `parent` in one step.
    fn create_child(&mut self, parent: NodeId) -> NodeId {
        let node = self.create_node();
        if !self.attach(parent, node) {
            tracing::warn!(?parent, ?node, "parent node unknown, node left detached");
        }
        node
    }
}

/// Animation playback for skinned model instances.
pub trait Animator {
    fn create_mixer(&mut self, root: NodeId) -> MixerId;

    /// The mixer's action for `clip`, created on first request and reused
    /// afterwards. `None` if the mixer is unknown.
    fn clip_action(&mut self, mixer: MixerId, clip: &str, duration: f32) -> Option<ActionId>;

    fn set_enabled(&mut self, action: ActionId, enabled: bool);

    /// Rewind to the start of the clip.
    fn reset(&mut self, action: ActionId);

    fn play(&mut self, action: ActionId);

    /// Advance every playing action of the mixer by `delta` seconds.
    fn advance(&mut self, mixer: MixerId, delta: f32);
}

/// Whether a world-space point is inside the camera frustum.
pub trait Visibility {
    fn contains_point(&self, camera: &Camera, point: Vec3) -> bool;
}

/// Everything a component may call on the external engine during an update.
pub trait SceneServices: SceneGraph + Animator {}

use glam::{Mat4, Vec3};
use menagerie_common::{ModelId, NodeId, Transform};

use crate::services::{ActionId, Animator, MixerId, SceneGraph, SceneServices};

#[derive(Debug, Clone)]
struct NodeRecord {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    transform: Transform,
    model: Option<ModelId>,
}

impl NodeRecord {
    fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            model: None,
        }
    }
}

#[derive(Debug, Clone)]
struct MixerRecord {
    root: NodeId,
    actions: Vec<ActionId>,
}

/// Playback state of one clip action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionState {
    pub mixer: MixerId,
    pub clip: String,
    pub duration: f32,
    pub enabled: bool,
    pub playing: bool,
    pub time: f32,
}

/// Scene and animation services without a GPU.
///
/// Keeps the node hierarchy, transforms, model instances and per-action
/// playback clocks so hosts and tests can observe what the runtime asked for.
#[derive(Debug, Clone)]
pub struct HeadlessScene {
    nodes: Vec<NodeRecord>,
    mixers: Vec<MixerRecord>,
    actions: Vec<ActionState>,
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessScene {
    /// A scene holding only its root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord::new()],
            mixers: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn transform(&self, node: NodeId) -> Option<&Transform> {
        self.node(node).map(|n| &n.transform)
    }

    pub fn model(&self, node: NodeId) -> Option<ModelId> {
        self.node(node).and_then(|n| n.model)
    }

    /// Position after composing every ancestor's transform.
    pub fn world_position(&self, node: NodeId) -> Option<Vec3> {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(node);
        while let Some(id) = current {
            let record = self.node(id)?;
            let t = &record.transform;
            matrix =
                Mat4::from_scale_rotation_translation(t.scale, t.rotation, t.position) * matrix;
            current = record.parent;
        }
        Some(matrix.transform_point3(Vec3::ZERO))
    }

    pub fn action(&self, action: ActionId) -> Option<&ActionState> {
        self.actions.get(action.0 as usize)
    }

    /// Actions created on `mixer`, in creation order.
    pub fn mixer_actions(&self, mixer: MixerId) -> Vec<ActionId> {
        self.mixers
            .get(mixer.0 as usize)
            .map(|m| m.actions.clone())
            .unwrap_or_default()
    }

    pub fn mixer_root(&self, mixer: MixerId) -> Option<NodeId> {
        self.mixers.get(mixer.0 as usize).map(|m| m.root)
    }

    /// Human-readable dump of the node tree, for CLI output and logs.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "=== Scene (nodes={}, mixers={}, actions={}) ===\n",
            self.nodes.len(),
            self.mixers.len(),
            self.actions.len()
        );
        self.describe_node(self.root(), 0, &mut out);
        out
    }

    fn describe_node(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(record) = self.node(node) else {
            return;
        };
        let p = record.transform.position;
        out.push_str(&format!(
            "{:indent$}node {} pos=({:.2}, {:.2}, {:.2})",
            "",
            node.0,
            p.x,
            p.y,
            p.z,
            indent = depth * 2
        ));
        if let Some(model) = record.model {
            out.push_str(&format!(" model={:#x}", model.0));
        }
        out.push('\n');
        for child in &record.children {
            self.describe_node(*child, depth + 1, out);
        }
    }

    fn node(&self, node: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(node.0 as usize)
    }

    fn is_ancestor(&self, maybe_ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == maybe_ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

impl SceneGraph for HeadlessScene {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn create_node(&mut self) -> NodeId {
        self.nodes.push(NodeRecord::new());
        NodeId(self.nodes.len() as u32 - 1)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return false;
        }
        if self.is_ancestor(child, parent) {
            tracing::warn!(?parent, ?child, "refusing to create a node cycle");
            return false;
        }
        if let Some(old) = self.nodes[child.0 as usize].parent {
            self.nodes[old.0 as usize].children.retain(|c| *c != child);
        }
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(child);
        true
    }

    fn set_transform(&mut self, node: NodeId, transform: &Transform) {
        if let Some(record) = self.nodes.get_mut(node.0 as usize) {
            record.transform = *transform;
        }
    }

    fn instantiate_model(&mut self, model: ModelId, parent: NodeId) -> NodeId {
        let node = self.create_child(parent);
        self.nodes[node.0 as usize].model = Some(model);
        node
    }
}

impl Animator for HeadlessScene {
    fn create_mixer(&mut self, root: NodeId) -> MixerId {
        self.mixers.push(MixerRecord {
            root,
            actions: Vec::new(),
        });
        MixerId(self.mixers.len() as u32 - 1)
    }

    fn clip_action(&mut self, mixer: MixerId, clip: &str, duration: f32) -> Option<ActionId> {
        let record = self.mixers.get(mixer.0 as usize)?;
        if let Some(existing) = record
            .actions
            .iter()
            .find(|a| self.actions[a.0 as usize].clip == clip)
        {
            return Some(*existing);
        }
        let id = ActionId(self.actions.len() as u32);
        self.actions.push(ActionState {
            mixer,
            clip: clip.to_string(),
            duration: duration.max(0.0),
            enabled: true,
            playing: false,
            time: 0.0,
        });
        self.mixers[mixer.0 as usize].actions.push(id);
        Some(id)
    }

    fn set_enabled(&mut self, action: ActionId, enabled: bool) {
        if let Some(state) = self.actions.get_mut(action.0 as usize) {
            state.enabled = enabled;
        }
    }

    fn reset(&mut self, action: ActionId) {
        if let Some(state) = self.actions.get_mut(action.0 as usize) {
            state.time = 0.0;
        }
    }

    fn play(&mut self, action: ActionId) {
        if let Some(state) = self.actions.get_mut(action.0 as usize) {
            state.playing = true;
        }
    }

    fn advance(&mut self, mixer: MixerId, delta: f32) {
        let Some(record) = self.mixers.get(mixer.0 as usize) else {
            return;
        };
        for id in &record.actions {
            let state = &mut self.actions[id.0 as usize];
            if !(state.enabled && state.playing) {
                continue;
            }
            state.time += delta;
            if state.duration > 0.0 {
                state.time %= state.duration;
            }
        }
    }
}

impl SceneServices for HeadlessScene {}

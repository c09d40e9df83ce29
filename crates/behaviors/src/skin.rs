use std::sync::Arc;

use menagerie_assets::ModelData;
use menagerie_common::NodeId;
use menagerie_ecs::{Component, ComponentError, ComponentKind, UpdateContext};
use menagerie_render::{ActionId, Animator, MixerId, SceneServices};

/// An instance of a loaded model under its owner's node, animated by its own
/// mixer.
#[derive(Debug)]
pub struct SkinInstance {
    model: Arc<ModelData>,
    root: NodeId,
    mixer: MixerId,
    started: Vec<ActionId>,
    current: Option<String>,
}

impl SkinInstance {
    /// Instantiate `model` under `owner` and give it a mixer.
    pub fn new<S: SceneServices + ?Sized>(
        scene: &mut S,
        owner: NodeId,
        model: Arc<ModelData>,
    ) -> Self {
        let root = scene.instantiate_model(model.id, owner);
        let mixer = scene.create_mixer(root);
        tracing::debug!(model = %model.name, ?root, ?mixer, "skin instantiated");
        Self {
            model,
            root,
            mixer,
            started: Vec::new(),
            current: None,
        }
    }

    /// Switch to the clip called `name`. Every action started before is
    /// disabled; the clip's action is rewound and played. Returns false if
    /// the model has no such clip.
    pub fn set_animation<S: Animator + ?Sized>(&mut self, scene: &mut S, name: &str) -> bool {
        let Some(clip) = self.model.clip(name) else {
            tracing::warn!(model = %self.model.name, clip = name, "unknown animation clip");
            return false;
        };
        let Some(action) = scene.clip_action(self.mixer, &clip.name, clip.duration) else {
            return false;
        };
        for previous in self.started.drain(..) {
            scene.set_enabled(previous, false);
        }
        scene.set_enabled(action, true);
        scene.reset(action);
        scene.play(action);
        self.started.push(action);
        self.current = Some(clip.name.clone());
        true
    }

    /// Rewind and replay the current clip. False when nothing is playing.
    pub fn restart<S: Animator + ?Sized>(&mut self, scene: &mut S) -> bool {
        match self.current.clone() {
            Some(clip) => self.set_animation(scene, &clip),
            None => false,
        }
    }

    pub fn model(&self) -> &ModelData {
        &self.model
    }

    /// Root node of the instantiated model.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn mixer(&self) -> MixerId {
        self.mixer
    }

    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl Component for SkinInstance {
    const KIND: ComponentKind = ComponentKind::new("skin-instance");

    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<(), ComponentError> {
        let delta = cx.delta_time();
        cx.scene.advance(self.mixer, delta);
        Ok(())
    }
}

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::Vec3;
use menagerie_assets::ModelData;
use menagerie_ecs::{Component, ComponentError, ComponentKind, Entity, UpdateContext};
use menagerie_input::LogicalButton;
use menagerie_render::SceneServices;
use serde::{Deserialize, Serialize};

use crate::skin::SkinInstance;

/// Tuning for [`Player`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units per second while up or down is held.
    pub move_speed: f32,
    /// Radians turned per left/right press.
    pub turn_step: f32,
    /// Local axis the model faces along.
    pub forward_axis: Vec3,
    /// Seconds out of view before respawning.
    pub max_time_offscreen: f32,
    pub home: Vec3,
    /// Model looked up in the loaded library.
    pub model: String,
    /// Clip started on attach; the model's first clip when unset.
    pub animation: Option<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 16.0,
            turn_step: FRAC_PI_2,
            forward_axis: Vec3::X,
            max_time_offscreen: 3.0,
            home: Vec3::ZERO,
            model: "phoenix".to_string(),
            animation: None,
        }
    }
}

/// Input-driven movement for the owning entity.
///
/// Left and right turn by a fixed step once per press. Up and down move along
/// the owner's forward axis while held. An owner that stays outside the
/// camera frustum for too long is put back at its home position, and its
/// clip starts over. Needs a [`SkinInstance`] on the same entity.
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
    offscreen: f32,
}

impl Player {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            offscreen: 0.0,
        }
    }

    /// Give `entity` a skin for `model` playing its configured clip, then a
    /// player driving it.
    pub fn attach<'e, S: SceneServices + ?Sized>(
        entity: &'e mut Entity,
        model: Arc<ModelData>,
        scene: &mut S,
        config: PlayerConfig,
    ) -> &'e mut Player {
        let node = entity.node();
        let skin = entity.add_component(SkinInstance::new(scene, node, model));
        let clip = config
            .animation
            .clone()
            .or_else(|| skin.model().first_clip().map(|c| c.name.clone()));
        match clip {
            Some(clip) => {
                skin.set_animation(scene, &clip);
            }
            None => tracing::debug!(model = %skin.model().name, "model has no clips"),
        }
        entity.add_component(Player::new(config))
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Seconds the owner has been continuously out of view.
    pub fn time_offscreen(&self) -> f32 {
        self.offscreen
    }
}

impl Component for Player {
    const KIND: ComponentKind = ComponentKind::new("player");

    fn update(&mut self, cx: &mut UpdateContext<'_>) -> Result<(), ComponentError> {
        if cx.sibling::<SkinInstance>().is_none() {
            return Err(ComponentError::MissingComponent(SkinInstance::KIND));
        }
        let dt = cx.delta_time();
        let owner = cx.entity();
        let input = cx.input;
        let transform = &mut *cx.transform;

        if input.just_pressed(LogicalButton::Left) {
            transform.rotate_y(self.config.turn_step);
        }
        if input.just_pressed(LogicalButton::Right) {
            transform.rotate_y(-self.config.turn_step);
        }

        let step = self.config.move_speed * dt;
        if input.is_down(LogicalButton::Up) {
            transform.translate_on_axis(self.config.forward_axis, step);
        }
        if input.is_down(LogicalButton::Down) {
            transform.translate_on_axis(self.config.forward_axis, -step);
        }

        let mut respawned = false;
        if cx.frame.is_visible(transform.position) {
            self.offscreen = 0.0;
        } else {
            self.offscreen += dt;
            if self.offscreen >= self.config.max_time_offscreen {
                tracing::info!(entity = %owner, "player off screen too long, respawning");
                transform.position = self.config.home;
                self.offscreen = 0.0;
                respawned = true;
            }
        }

        if respawned {
            if let Some((skin, scene)) = cx.sibling_with_scene::<SkinInstance>() {
                skin.restart(scene);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use menagerie_ecs::{EntityManager, FrameContext};
    use menagerie_input::InputState;
    use menagerie_render::{Camera, HeadlessScene, SceneGraph, Visibility};

    struct Always(bool);
    impl Visibility for Always {
        fn contains_point(&self, _camera: &Camera, _point: Vec3) -> bool {
            self.0
        }
    }

    struct Rig {
        scene: HeadlessScene,
        manager: EntityManager,
        input: InputState,
        id: menagerie_common::EntityId,
        frame: u64,
    }

    impl Rig {
        fn new(config: PlayerConfig) -> Self {
            let mut scene = HeadlessScene::new();
            let mut manager = EntityManager::new();
            let root = scene.root();
            let entity = manager.create_entity(&mut scene, root, "phoenix");
            let model = Arc::new(ModelData::placeholder("phoenix", &[("Fly", 1.0)]));
            Player::attach(entity, model, &mut scene, config);
            let id = entity.id();
            Self {
                scene,
                manager,
                input: InputState::default(),
                id,
                frame: 0,
            }
        }

        fn tick(&mut self, dt: f32, visible: bool) {
            let visibility = Always(visible);
            let cx = FrameContext::new(0.0, dt, self.frame, Camera::default(), &visibility);
            self.manager.update(&cx, &self.input, &mut self.scene);
            self.manager.sync_to_scene(&mut self.scene);
            self.input.update();
            self.frame += 1;
        }

        fn entity(&self) -> &Entity {
            self.manager.get(self.id).expect("player entity")
        }

        fn position(&self) -> Vec3 {
            self.entity().transform.position
        }

        fn forward(&self) -> Vec3 {
            self.entity().transform.local_axis(Vec3::X)
        }
    }

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.move_speed, 16.0);
        assert!((config.turn_step - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(config.forward_axis, Vec3::X);
        assert_eq!(config.max_time_offscreen, 3.0);
    }

    #[test]
    fn config_from_partial_json() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{"move_speed": 4.0, "animation": "Glide"}"#).unwrap();
        assert_eq!(config.move_speed, 4.0);
        assert_eq!(config.animation.as_deref(), Some("Glide"));
        assert_eq!(config.model, "phoenix");
    }

    #[test]
    fn attach_starts_first_clip() {
        let rig = Rig::new(PlayerConfig::default());
        let entity = rig.entity();
        assert_eq!(entity.component_kinds(), vec![SkinInstance::KIND, Player::KIND]);
        let skin = entity.get_component::<SkinInstance>().unwrap();
        assert_eq!(skin.current_animation(), Some("Fly"));
        assert_eq!(rig.scene.parent(skin.root()), Some(entity.node()));
    }

    #[test]
    fn turns_once_per_press() {
        let mut rig = Rig::new(PlayerConfig::default());
        rig.input.set_button(LogicalButton::Left, true);
        rig.tick(0.016, true);
        let after_press = rig.forward();
        assert!((after_press - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        // held, and repeated key events, do not turn again
        rig.input.set_button(LogicalButton::Left, true);
        rig.tick(0.016, true);
        rig.tick(0.016, true);
        assert!((rig.forward() - after_press).length() < 1e-5);

        rig.input.set_button(LogicalButton::Left, false);
        rig.tick(0.016, true);
        rig.input.set_button(LogicalButton::Right, true);
        rig.tick(0.016, true);
        assert!((rig.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn moves_along_forward_scaled_by_delta() {
        let mut rig = Rig::new(PlayerConfig::default());
        rig.input.set_button(LogicalButton::Up, true);
        rig.tick(0.5, true);
        assert!((rig.position() - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-4);
        rig.input.set_button(LogicalButton::Up, false);
        rig.input.set_button(LogicalButton::Down, true);
        rig.tick(0.25, true);
        assert!((rig.position() - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn respawns_after_time_offscreen() {
        let mut rig = Rig::new(PlayerConfig::default());
        rig.input.set_button(LogicalButton::Up, true);
        rig.tick(0.25, true);
        let moved = rig.position();
        assert!(moved.x > 0.0);
        rig.input.set_button(LogicalButton::Up, false);

        for _ in 0..11 {
            rig.tick(0.25, false);
        }
        assert_eq!(rig.position(), moved);
        let timer = rig.entity().get_component::<Player>().map(|p| p.time_offscreen());
        assert_eq!(timer, Some(2.75));

        rig.tick(0.25, false);
        assert_eq!(rig.position(), Vec3::ZERO);
        let timer = rig.entity().get_component::<Player>().map(|p| p.time_offscreen());
        assert_eq!(timer, Some(0.0));
    }

    #[test]
    fn respawn_restarts_the_clip() {
        let mut rig = Rig::new(PlayerConfig {
            max_time_offscreen: 0.5,
            ..PlayerConfig::default()
        });
        let clip_time = |rig: &Rig| {
            let mixer = rig.entity().get_component::<SkinInstance>().unwrap().mixer();
            let action = rig.scene.mixer_actions(mixer)[0];
            rig.scene.action(action).unwrap().time
        };
        rig.tick(0.25, true);
        rig.tick(0.25, false);
        assert!((clip_time(&rig) - 0.5).abs() < 1e-6);
        rig.tick(0.25, false);
        assert_eq!(rig.entity().get_component::<Player>().map(|p| p.time_offscreen()), Some(0.0));
        assert_eq!(clip_time(&rig), 0.0);
    }

    #[test]
    fn player_without_skin_stays_put() {
        let mut scene = HeadlessScene::new();
        let mut manager = EntityManager::new();
        let root = scene.root();
        let entity = manager.create_entity(&mut scene, root, "bare");
        entity.add_component(Player::new(PlayerConfig::default()));
        let id = entity.id();
        let mut input = InputState::default();
        input.set_button(LogicalButton::Up, true);
        let visibility = Always(false);
        let cx = FrameContext::new(0.0, 0.5, 0, Camera::default(), &visibility);
        manager.update(&cx, &input, &mut scene);

        let entity = manager.get(id).unwrap();
        assert_eq!(entity.transform.position, Vec3::ZERO);
        assert_eq!(entity.get_component::<Player>().map(|p| p.time_offscreen()), Some(0.0));
    }

    #[test]
    fn visibility_resets_timer() {
        let mut rig = Rig::new(PlayerConfig::default());
        rig.tick(1.0, false);
        rig.tick(1.0, false);
        rig.tick(1.0, true);
        rig.tick(1.0, false);
        rig.tick(1.0, false);
        let timer = rig.entity().get_component::<Player>().map(|p| p.time_offscreen());
        assert_eq!(timer, Some(2.0));
    }

    #[test]
    fn skin_advances_with_delta() {
        let mut rig = Rig::new(PlayerConfig {
            animation: Some("Fly".into()),
            ..PlayerConfig::default()
        });
        rig.tick(0.25, true);
        let mixer = rig.entity().get_component::<SkinInstance>().unwrap().mixer();
        let action = rig.scene.mixer_actions(mixer)[0];
        let time = rig.scene.action(action).unwrap().time;
        assert!((time - 0.25).abs() < 1e-6);
    }
}

use std::time::Duration;

use menagerie_assets::{LoadStatus, LoadTracker, ModelLibrary};
use menagerie_ecs::{EntityManager, FrameContext};
use menagerie_input::InputState;
use menagerie_render::{Camera, FrustumTest, SceneServices, Visibility};

use crate::clock::{FrameClock, FrameTimer};
use crate::config::{ConfigError, LoopConfig};

/// Scene setup run once, when every requested model has arrived.
pub type InitHook = Box<dyn FnOnce(&ModelLibrary, &mut EntityManager, &mut dyn SceneServices)>;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    pub time: f32,
    pub delta_time: f32,
    /// Entities visited by the update pass.
    pub updated: usize,
    /// True on the tick that ran the init hook.
    pub initialized: bool,
}

/// Owns the per-frame state and runs one tick at a time for the host.
pub struct FrameLoop {
    config: LoopConfig,
    clock: FrameClock,
    timer: FrameTimer,
    input: InputState,
    entities: EntityManager,
    camera: Camera,
    visibility: Box<dyn Visibility>,
    loader: LoadTracker,
    init: Option<InitHook>,
    initialized: bool,
}

impl FrameLoop {
    pub fn new(config: LoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let input =
            InputState::new(config.bindings.clone()).with_regions(config.touch_regions.clone());
        Ok(Self {
            clock: FrameClock::new(config.max_delta),
            timer: FrameTimer::new(config.timer_window),
            input,
            entities: EntityManager::new(),
            camera: config.camera,
            visibility: Box::new(FrustumTest),
            loader: LoadTracker::new(),
            init: None,
            initialized: false,
            config,
        })
    }

    /// Replace the frustum test with another visibility predicate.
    pub fn with_visibility(mut self, visibility: impl Visibility + 'static) -> Self {
        self.visibility = Box::new(visibility);
        self
    }

    /// Set the scene setup to run once the load barrier opens.
    pub fn on_ready(
        &mut self,
        hook: impl FnOnce(&ModelLibrary, &mut EntityManager, &mut dyn SceneServices) + 'static,
    ) {
        self.init = Some(Box::new(hook));
    }

    /// Run one frame at host time `now_ms`.
    pub fn tick(&mut self, now_ms: f64, scene: &mut dyn SceneServices) -> TickReport {
        let delta_time = self.clock.advance(now_ms);
        self.timer.record_secs(delta_time);
        let frame = self.clock.frame();
        let _span = tracing::info_span!("tick", frame).entered();

        let initialized = self.poll_barrier(scene);

        let cx = FrameContext::new(
            self.clock.time(),
            delta_time,
            frame,
            self.camera,
            &*self.visibility,
        );
        let updated = self.entities.update(&cx, &self.input, scene);
        self.entities.sync_to_scene(scene);
        self.input.update();

        tracing::trace!(delta_time, updated, "tick done");
        TickReport {
            frame,
            time: self.clock.time(),
            delta_time,
            updated,
            initialized,
        }
    }

    /// Block until every requested model settled or `timeout` passed. The
    /// init hook still runs on the next tick.
    pub fn await_assets(&mut self, timeout: Duration) -> LoadStatus {
        self.loader.wait(timeout)
    }

    fn poll_barrier(&mut self, scene: &mut dyn SceneServices) -> bool {
        if self.initialized {
            return false;
        }
        match self.loader.poll() {
            LoadStatus::Ready => {
                self.initialized = true;
                tracing::info!(models = self.loader.total(), "all models loaded");
                if let Some(hook) = self.init.take() {
                    hook(self.loader.library(), &mut self.entities, scene);
                }
                true
            }
            LoadStatus::Loading { .. } | LoadStatus::Failed { .. } => false,
        }
    }

    pub fn loader_mut(&mut self) -> &mut LoadTracker {
        &mut self.loader
    }

    pub fn load_status(&self) -> LoadStatus {
        self.loader.status()
    }

    /// Fraction of requested models loaded so far.
    pub fn loading_progress(&self) -> f32 {
        self.loader.progress()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Feed raw device events in between ticks.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }
}

impl std::fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("clock", &self.clock)
            .field("entities", &self.entities.len())
            .field("camera", &self.camera)
            .field("loader", &self.loader.status())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

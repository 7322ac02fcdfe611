//! Play session orchestration
//!
//! One `PlayState` is one player's turn: it owns the world, the asset
//! cache, the renderer and the gameplay systems, and runs them in the
//! frame order the engine requires. Text rendering stays outside; the
//! session only surfaces HUD data for the caller to draw.

use crate::spawn;
use orbit_engine::assets::AssetError;
use orbit_engine::core::config::{GameConfig, SceneConfig};
use orbit_engine::ecs::components::{CameraComponent, FreeCameraControllerComponent};
use orbit_engine::ecs::SceneError;
use orbit_engine::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// How long the speed effect lasts once picked up
pub const SPEED_EFFECT_DURATION: f32 = 10.0;

/// Field of view while the speed effect runs
pub const BOOST_FOV: f32 = 3.0;

/// Field of view restored when the speed effect expires
pub const NORMAL_FOV: f32 = 1.518;

/// Postprocess effect shown while boosted
const BOOST_EFFECT: &str = "speedup";

/// Position sensitivity while boosted
const BOOST_SENSITIVITY: f32 = 10.0;

/// Position sensitivity restored when the boost expires
const NORMAL_SENSITIVITY: f32 = 6.0;

/// Z offset factor placing the track relative to the start line
const TRACK_Z_PLACEMENT: f32 = -3.9;

/// Height at which the camera starts over the track
const CAMERA_START_HEIGHT: f32 = 2.0;

/// Errors raised while setting a play session up
#[derive(Error, Debug)]
pub enum PlayError {
    /// The asset manifest failed to build
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// The scene world graph failed to build
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Whether the turn is still running
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnStatus {
    /// The race is still on
    Running,
    /// The player crossed the track's far end
    Finished {
        /// Seconds the turn took
        elapsed: f32,
        /// Fraction of artifacts collected
        collected_ratio: f32,
    },
}

/// Data the caller needs to draw the HUD
#[derive(Debug, Clone, Copy)]
pub struct HudState {
    /// Seconds since the turn started
    pub elapsed: f32,
    /// Artifacts collected so far
    pub collected: usize,
    /// Artifacts the race started with
    pub total: usize,
}

/// One player's turn over the world
pub struct PlayState {
    world: World,
    assets: AssetCache,
    renderer: ForwardRenderer,
    camera_controller: FreeCameraControllerSystem,
    config: GameConfig,
    speed: SpeedEffect,
    total_artifacts: usize,
    remaining_artifacts: usize,
    elapsed: f32,
    finished: bool,
}

impl PlayState {
    /// Build a session from scene configuration
    ///
    /// `assets` must already hold the meshes the scene references (model
    /// parsing is the caller's concern); shaders, textures and materials
    /// are built here from the manifest. `seed` drives all randomized
    /// content, so a race can be replayed exactly.
    pub fn initialize(
        mut assets: AssetCache,
        scene: &SceneConfig,
        seed: u64,
        window_size: (u32, u32),
        device: &mut dyn GraphicsDevice,
    ) -> Result<Self, PlayError> {
        assets.deserialize_all(&scene.assets, device)?;

        let mut world = World::new();
        world.deserialize(&scene.world, None, &assets)?;

        // Stretch the track to the configured length, push it out along Z
        // and compute the bounds everything downstream depends on.
        let track_key_opt = world
            .iter_live()
            .find(|(_, entity)| entity.kind == EntityKind::Track)
            .map(|(key, _)| key);
        if let Some(track_key) = track_key_opt {
            let configured = scene.track_length;
            if let Some(entity) = world.entity_mut(track_key) {
                let length = configured.unwrap_or(entity.transform.scale.z);
                entity.transform.scale.z = length;
                entity.transform.position.z = TRACK_Z_PLACEMENT * length;
                world.set_track_length(length);
            }
        }
        world.compute_track_bounds(&assets);

        // Center the camera over the track at the start line.
        if let Some(camera_key) = world.first_with::<CameraComponent>() {
            let track = world.track().clone();
            if let Some(entity) = world.entity_mut(camera_key) {
                entity.transform.position = Vec3::new(
                    (track.far_left.x + track.far_right.x) / 2.0,
                    CAMERA_START_HEIGHT,
                    0.0,
                );
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let total_artifacts =
            spawn::spawn_artifacts(&mut world, &mut rng, &scene.game.hyper_parameters);
        spawn::spawn_speed_collectable(&mut world, &mut rng, &scene.game.hyper_parameters);
        spawn::spawn_environment(&mut world, &mut rng);
        spawn::spawn_rival_aircraft(&mut world, &mut rng);
        spawn::create_finish_line(&mut world);

        let mut renderer = ForwardRenderer::new();
        renderer.initialize(window_size, &scene.renderer, device);

        Ok(Self {
            world,
            assets,
            renderer,
            camera_controller: FreeCameraControllerSystem::new(),
            config: scene.game.clone(),
            speed: SpeedEffect::new(),
            total_artifacts,
            remaining_artifacts: total_artifacts,
            elapsed: 0.0,
            finished: false,
        })
    }

    /// Advance the session by one frame
    ///
    /// Runs the systems in their required order: movement, camera
    /// candidate, collision against the candidate, conditional commit,
    /// speed-effect transitions, then rendering.
    pub fn tick(
        &mut self,
        delta_time: f32,
        input: &mut dyn InputSource,
        audio: &mut dyn AudioSink,
        device: &mut dyn GraphicsDevice,
    ) -> TurnStatus {
        if self.finished {
            return self.status();
        }
        self.elapsed += delta_time;

        // The pickup flag only survives the frame it was touched in.
        self.speed.in_effect = false;

        MovementSystem::update(&mut self.world, delta_time);

        let Some(frame) = self.camera_controller.update(
            &mut self.world,
            input,
            delta_time,
            &self.config,
            self.speed.is_active(),
        ) else {
            // Without a camera there is nothing to collide or render.
            return self.status();
        };

        let mut forbidden_collision = false;
        self.remaining_artifacts = CollisionSystem::update(
            &mut self.world,
            frame.position,
            &mut forbidden_collision,
            &mut self.speed,
            audio,
        );

        // Commit the candidate only when nothing blocked it.
        if !forbidden_collision {
            if let Some(entity) = self.world.entity_mut(frame.entity) {
                entity.transform.position = frame.position;
            }
        }

        self.update_speed_effect(frame.entity, frame.position.z);

        self.renderer.render(
            &mut self.world,
            &self.assets,
            device,
            frame.forbidden_access,
            &self.config,
            self.elapsed,
        );

        if let Some(entity) = self.world.entity(frame.entity) {
            if entity.transform.position.z <= self.world.track().z_furthest {
                self.finished = true;
            }
        }
        self.status()
    }

    fn update_speed_effect(&mut self, camera_entity: EntityKey, candidate_z: f32) {
        match self.speed.started_at {
            None if self.speed.in_effect => {
                self.speed.started_at = Some(self.elapsed);
                self.speed.z_at_collection = Some(candidate_z);
                self.speed.previous_effect = self.renderer.active_effect().map(str::to_owned);
                self.renderer.set_active_effect(Some(BOOST_EFFECT));
                self.set_camera_tuning(camera_entity, BOOST_FOV, BOOST_SENSITIVITY);
            }
            Some(started_at) if self.elapsed - started_at > SPEED_EFFECT_DURATION => {
                let previous = self.speed.previous_effect.take();
                self.renderer.set_active_effect(previous.as_deref());
                self.set_camera_tuning(camera_entity, NORMAL_FOV, NORMAL_SENSITIVITY);
                self.speed.reset();
            }
            _ => {}
        }
    }

    fn set_camera_tuning(&mut self, camera_entity: EntityKey, fov: f32, sensitivity: f32) {
        if let Some(camera) = self.world.component_mut::<CameraComponent>(camera_entity) {
            camera.fov_y = fov;
        }
        if let Some(controller) = self
            .world
            .component_mut::<FreeCameraControllerComponent>(camera_entity)
        {
            controller.position_sensitivity = Vec3::new(sensitivity, sensitivity, sensitivity);
        }
    }

    fn status(&self) -> TurnStatus {
        if self.finished {
            let collected = self.total_artifacts - self.remaining_artifacts;
            TurnStatus::Finished {
                elapsed: self.elapsed,
                collected_ratio: if self.total_artifacts == 0 {
                    0.0
                } else {
                    collected as f32 / self.total_artifacts as f32
                },
            }
        } else {
            TurnStatus::Running
        }
    }

    /// Data for the caller's HUD text
    pub fn hud(&self) -> HudState {
        HudState {
            elapsed: self.elapsed,
            collected: self.total_artifacts - self.remaining_artifacts,
            total: self.total_artifacts,
        }
    }

    /// The world, for inspection
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The speed-effect state, for inspection
    pub fn speed(&self) -> &SpeedEffect {
        &self.speed
    }

    /// Tear the session down, releasing renderer and asset resources
    pub fn destroy(&mut self, input: &mut dyn InputSource, device: &mut dyn GraphicsDevice) {
        self.renderer.destroy(device);
        self.camera_controller.exit(input);
        self.world.clear();
        self.assets.clear_all(device);
    }
}

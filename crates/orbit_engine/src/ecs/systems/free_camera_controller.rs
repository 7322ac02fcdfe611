//! Free camera controller system
//!
//! Steers the unique entity carrying both a camera and a controller
//! component from pointer and key input. The system never commits the new
//! position itself: it returns a candidate that the caller hands to
//! collision detection first, together with a forbidden-access flag for
//! any axis restriction the candidate violated.

use crate::core::config::GameConfig;
use crate::ecs::components::{CameraComponent, FreeCameraControllerComponent};
use crate::ecs::entity::EntityKey;
use crate::ecs::world::World;
use crate::foundation::math::{wrap_angle, Point3, Vec3};
use crate::input::{InputSource, KeyCode, MouseButton};
use std::f32::consts::{FRAC_PI_2, PI};

/// Pitch stops just short of vertical to avoid gimbal lock
const PITCH_LIMIT: f32 = FRAC_PI_2 * 0.99;

/// Field of view stays inside (0.01π, 0.99π)
const FOV_MIN: f32 = PI * 0.01;
const FOV_MAX: f32 = PI * 0.99;

/// The aircraft may not drop below this height while restricted in Y
const MIN_FLIGHT_HEIGHT: f32 = 1.0;

/// The aircraft may not retreat behind this Z while restricted in Z
const START_LINE_Z: f32 = 4.0;

/// Roll applied to the aircraft while strafing
const STRAFE_ROLL: f32 = 0.3;

/// The controller's output for one frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// The entity carrying the camera and controller
    pub entity: EntityKey,

    /// Candidate position; committed by the caller after collision checks
    pub position: Vec3,

    /// Whether any restricted axis rejected its displacement
    pub forbidden_access: bool,
}

/// Translates input into a candidate camera position
pub struct FreeCameraControllerSystem {
    mouse_captured: bool,
}

impl Default for FreeCameraControllerSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeCameraControllerSystem {
    /// Create the system with the pointer uncaptured
    pub fn new() -> Self {
        Self {
            mouse_captured: false,
        }
    }

    /// Run one frame of camera steering
    ///
    /// Returns `None` when no entity carries both a camera and a
    /// controller; the caller must then skip this frame's collision and
    /// render steps.
    pub fn update(
        &mut self,
        world: &mut World,
        input: &mut dyn InputSource,
        delta_time: f32,
        config: &GameConfig,
        speed_active: bool,
    ) -> Option<CameraFrame> {
        let entity_key = world.iter_live().map(|(key, _)| key).find(|&key| {
            world.component::<CameraComponent>(key).is_some()
                && world
                    .component::<FreeCameraControllerComponent>(key)
                    .is_some()
        });
        let Some(entity_key) = entity_key else {
            log::debug!("no camera/controller entity; skipping camera update");
            return None;
        };

        // Holding the left button captures the pointer, as in most
        // first-person controls; releasing it lets go.
        if input.is_mouse_pressed(MouseButton::Left) && !self.mouse_captured {
            input.capture_pointer();
            self.mouse_captured = true;
        } else if !input.is_mouse_pressed(MouseButton::Left) && self.mouse_captured {
            input.release_pointer();
            self.mouse_captured = false;
        }

        let controller = world
            .component::<FreeCameraControllerComponent>(entity_key)?
            .clone();
        let restriction = &config.movement_restriction;

        let (position, front, up, right) = {
            let entity = world.entity_mut(entity_key)?;
            let rotation = &mut entity.transform.rotation;

            if restriction.allow_mouse && input.is_mouse_pressed(MouseButton::Left) {
                let delta = input.pointer_delta();
                rotation.x -= delta.y * controller.rotation_sensitivity;
                rotation.y -= delta.x * controller.rotation_sensitivity;
            }
            rotation.x = rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
            rotation.y = wrap_angle(rotation.y);

            let matrix = entity.transform.to_matrix();
            (
                entity.transform.position,
                matrix.transform_vector(&Vec3::new(0.0, 0.0, -1.0)),
                matrix.transform_vector(&Vec3::new(0.0, 1.0, 0.0)),
                matrix.transform_vector(&Vec3::new(1.0, 0.0, 0.0)),
            )
        };

        if let Some(camera) = world.component_mut::<CameraComponent>(entity_key) {
            let fov = camera.fov_y + input.scroll_delta().y * controller.fov_sensitivity;
            camera.fov_y = fov.clamp(FOV_MIN, FOV_MAX);
        }

        let mut sensitivity = controller.position_sensitivity;
        if speed_active || input.is_key_pressed(KeyCode::LeftShift) {
            sensitivity *= controller.speedup_factor;
        }

        let mut candidate = position;

        // W and S move along the entity's front axis. Auto-forward and the
        // speed effect both override the key.
        if restriction.auto_move_forward || speed_active {
            candidate += front * (delta_time * sensitivity.z);
        } else {
            if input.is_key_pressed(KeyCode::W) {
                candidate += front * (delta_time * sensitivity.z);
            }
            if restriction.allow_moving_backwards && input.is_key_pressed(KeyCode::S) {
                candidate -= front * (delta_time * sensitivity.z);
            }
        }

        // Q and E move up and down.
        if input.is_key_pressed(KeyCode::Q) {
            candidate += up * (delta_time * sensitivity.y);
        }
        if input.is_key_pressed(KeyCode::E) {
            candidate -= up * (delta_time * sensitivity.y);
        }

        // A and D strafe, banking the visible aircraft while held.
        if input.is_key_pressed(KeyCode::D) {
            candidate += right * (delta_time * sensitivity.x);
            self.set_aircraft_roll(world, -STRAFE_ROLL);
        } else if input.was_key_released(KeyCode::D) {
            self.set_aircraft_roll(world, 0.0);
        }
        if input.is_key_pressed(KeyCode::A) {
            candidate -= right * (delta_time * sensitivity.x);
            self.set_aircraft_roll(world, STRAFE_ROLL);
        } else if input.was_key_released(KeyCode::A) {
            self.set_aircraft_roll(world, 0.0);
        }

        let mut updated = position;
        let mut forbidden_access = false;
        let offset = config.hyper_parameters.camera_aircraft_offset;

        // X stays inside the track's world-space left/right bounds. The
        // candidate is projected through the parent chain to compare in
        // world coordinates without mutating the entity.
        if restriction.restrict_x {
            let world_candidate = world
                .parent_matrix(entity_key)
                .transform_point(&Point3::from(candidate));
            let track = world.track();
            if world_candidate.x < track.far_left.x || world_candidate.x > track.far_right.x {
                forbidden_access = true;
            } else {
                updated.x = candidate.x;
            }
        } else {
            updated.x = candidate.x;
        }

        // Y keeps the aircraft above the track surface.
        if restriction.restrict_y {
            if candidate.y + offset.y < MIN_FLIGHT_HEIGHT {
                forbidden_access = true;
            } else {
                updated.y = candidate.y;
            }
        } else {
            updated.y = candidate.y;
        }

        // Z keeps the aircraft from retreating behind the start line.
        if restriction.restrict_z {
            if candidate.z + offset.z > START_LINE_Z {
                forbidden_access = true;
            } else {
                updated.z = candidate.z;
            }
        } else {
            updated.z = candidate.z;
        }

        Some(CameraFrame {
            entity: entity_key,
            position: updated,
            forbidden_access,
        })
    }

    /// Release the pointer when the owning state exits
    pub fn exit(&mut self, input: &mut dyn InputSource) {
        if self.mouse_captured {
            self.mouse_captured = false;
            input.release_pointer();
        }
    }

    fn set_aircraft_roll(&self, world: &mut World, roll: f32) {
        if let Some(aircraft) = world.aircraft() {
            if let Some(entity) = world.entity_mut(aircraft) {
                entity.transform.rotation.z = roll;
            }
        }
    }
}

//! Per-frame gameplay systems
//!
//! Frame ordering is a correctness contract, not a convention: movement
//! integrates first, the camera controller produces a candidate position
//! without committing it, collision detection consumes that candidate and
//! mutates the world, the caller commits the camera position only when no
//! forbidden collision occurred, and the renderer runs last.

pub mod collision;
pub mod free_camera_controller;
pub mod movement;

pub use collision::{CollisionSystem, SpeedEffect};
pub use free_camera_controller::{CameraFrame, FreeCameraControllerSystem};
pub use movement::MovementSystem;

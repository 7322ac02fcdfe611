//! Component types attachable to entities

pub mod camera;
pub mod free_camera_controller;
pub mod light;
pub mod mesh_renderer;
pub mod movement;

pub use camera::CameraComponent;
pub use free_camera_controller::FreeCameraControllerComponent;
pub use light::{LightComponent, LightKind};
pub use mesh_renderer::{MeshRendererComponent, MultiMeshRendererComponent};
pub use movement::MovementComponent;

//! Free camera controller component
//!
//! Marks the entity the free-camera-controller system steers and carries
//! the tuning knobs for that steering. The system locates the unique
//! entity holding both this component and a camera.

use crate::foundation::math::Vec3;
use serde::Deserialize;

/// Tuning parameters for pointer-and-key camera steering
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FreeCameraControllerComponent {
    /// Radians of rotation per pixel of pointer movement
    pub rotation_sensitivity: f32,

    /// Radians of field-of-view change per scroll unit
    pub fov_sensitivity: f32,

    /// Units per second of displacement along each local axis
    pub position_sensitivity: Vec3,

    /// Multiplier applied to the position sensitivity while boosted
    pub speedup_factor: f32,
}

impl Default for FreeCameraControllerComponent {
    fn default() -> Self {
        Self {
            rotation_sensitivity: 0.01,
            fov_sensitivity: 0.3,
            position_sensitivity: Vec3::new(6.0, 6.0, 6.0),
            speedup_factor: 5.0,
        }
    }
}

//! Movement component for entities that drift or spin at constant speed

use crate::foundation::math::Vec3;
use serde::Deserialize;

/// Constant linear and angular velocity applied every frame
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovementComponent {
    /// Linear velocity in units per second
    pub linear_velocity: Vec3,

    /// Angular velocity in radians per second around each Euler axis
    pub angular_velocity: Vec3,
}

impl Default for MovementComponent {
    fn default() -> Self {
        Self {
            linear_velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
        }
    }
}

impl MovementComponent {
    /// Create a movement component with only linear velocity
    pub fn with_linear(linear_velocity: Vec3) -> Self {
        Self {
            linear_velocity,
            angular_velocity: Vec3::zeros(),
        }
    }

    /// Create a movement component with only angular velocity
    pub fn with_angular(angular_velocity: Vec3) -> Self {
        Self {
            linear_velocity: Vec3::zeros(),
            angular_velocity,
        }
    }
}

//! Light component

use crate::foundation::math::{Vec2, Vec3};
use serde::Deserialize;

/// The kind of a light source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    /// Parallel rays from an infinitely distant source
    Directional,
    /// Omnidirectional light radiating from a point
    Point,
    /// A cone of light with inner and outer angles
    Spot,
}

/// Light source attached to an entity
///
/// The light's world position comes from the owning entity's transform;
/// the direction is internal to the component for directional and spot
/// lights (point lights derive it in the shader).
#[derive(Debug, Clone)]
pub struct LightComponent {
    /// Kind of light source
    pub kind: LightKind,

    /// Light color
    pub color: Vec3,

    /// Inner and outer cone angles in radians (spot lights only)
    pub cone_angles: Vec2,

    /// Constant, linear and quadratic attenuation factors
    pub attenuation: Vec3,

    /// Direction of the light (directional and spot lights)
    pub direction: Vec3,
}

impl Default for LightComponent {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            color: Vec3::new(0.8, 0.8, 0.8),
            cone_angles: Vec2::zeros(),
            attenuation: Vec3::new(1.0, 0.0, 0.0),
            direction: Vec3::new(1.0, 1.0, 0.0),
        }
    }
}

impl LightComponent {
    /// Integer tag uploaded to the shader's light array
    pub fn shader_kind(&self) -> i32 {
        match self.kind {
            LightKind::Directional => 0,
            LightKind::Point => 1,
            LightKind::Spot => 2,
        }
    }
}

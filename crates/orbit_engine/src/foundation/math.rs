//! Math utilities and types
//!
//! Provides fundamental math types for 3D graphics and game development.

pub use nalgebra::{Matrix3, Matrix4, Rotation3, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Transform representing position, Euler rotation, and scale
///
/// The rotation is stored as Euler angles in radians: `x` is pitch, `y` is
/// yaw and `z` is roll. Systems mutate these fields directly every frame,
/// so the matrix is recomputed on demand and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Euler angles in radians (pitch, yaw, roll)
    pub rotation: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Compute the yaw-pitch-roll rotation matrix for this transform
    fn rotation_matrix(&self) -> Mat4 {
        let rotation = Rotation3::from_axis_angle(&Vec3::y_axis(), self.rotation.y)
            * Rotation3::from_axis_angle(&Vec3::x_axis(), self.rotation.x)
            * Rotation3::from_axis_angle(&Vec3::z_axis(), self.rotation.z);
        rotation.to_homogeneous()
    }

    /// Convert to a transformation matrix
    ///
    /// Composition order is always Scale, then Rotate, then Translate.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation_matrix()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }

    /// Apply this transform to a direction vector (no translation)
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.to_matrix().transform_vector(&vector)
    }
}

/// Wrap an angle into the [0, 2π) range
///
/// Prevents floating point drift when an angle keeps growing in a single
/// direction for a very long time.
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(std::f32::consts::TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_transform() {
        let transform = Transform::identity();
        assert_relative_eq!(transform.to_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_composition_order_is_scale_rotate_translate() {
        // A point on the +X axis, scaled by 2, rotated 90 degrees around Y
        // (which carries +X onto -Z), then translated by (0, 0, 5).
        let transform = Transform {
            position: Vec3::new(0.0, 0.0, 5.0),
            rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
            scale: Vec3::new(2.0, 1.0, 1.0),
        };

        let result = transform.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(result, Point3::new(0.0, 0.0, 3.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_order_is_yaw_pitch_roll() {
        // Yaw then pitch: the local forward (-Z) first pitches up, then the
        // whole frame yaws. With yaw=90 and pitch=45 the forward vector ends
        // up halfway between +Y and -X.
        let transform = Transform {
            rotation: Vec3::new(PI / 4.0, FRAC_PI_2, 0.0),
            ..Default::default()
        };

        let forward = transform.transform_vector(Vec3::new(0.0, 0.0, -1.0));
        let half = (2.0_f32).sqrt() / 2.0;
        assert_relative_eq!(forward, Vec3::new(-half, half, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let transform = Transform::from_position(Vec3::new(10.0, 20.0, 30.0));
        let vector = transform.transform_vector(Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(vector, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_wrap_angle() {
        assert_relative_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = EPSILON);
        assert_relative_eq!(wrap_angle(-0.5), TAU - 0.5, epsilon = EPSILON);
        assert_relative_eq!(wrap_angle(1.0), 1.0, epsilon = EPSILON);
    }
}

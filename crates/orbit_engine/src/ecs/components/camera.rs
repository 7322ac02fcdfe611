//! Camera component
//!
//! The camera's position and orientation come from its owning entity's
//! transform chain; the component itself only carries the projection
//! parameters.

use crate::foundation::math::{Mat4, Point3, Vec3};

/// Perspective camera attached to an entity
#[derive(Debug, Clone)]
pub struct CameraComponent {
    /// Vertical field of view in radians
    pub fov_y: f32,

    /// Near clipping plane distance
    pub near: f32,

    /// Far clipping plane distance
    pub far: f32,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            fov_y: 1.518,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl CameraComponent {
    /// Compute the view matrix from the owner's local-to-world matrix
    ///
    /// The eye sits at the entity origin, looking down the entity's local
    /// -Z axis with local +Y up.
    pub fn view_matrix(&self, local_to_world: &Mat4) -> Mat4 {
        let eye = local_to_world.transform_point(&Point3::origin());
        let target = local_to_world.transform_point(&Point3::new(0.0, 0.0, -1.0));
        let up = local_to_world.transform_vector(&Vec3::new(0.0, 1.0, 0.0));
        Mat4::look_at_rh(&eye, &target, &up)
    }

    /// Compute the perspective projection matrix for the given window size
    pub fn projection_matrix(&self, window_size: (u32, u32)) -> Mat4 {
        let aspect = window_size.0 as f32 / window_size.1.max(1) as f32;
        nalgebra::Perspective3::new(aspect, self.fov_y, self.near, self.far).to_homogeneous()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_matrix_looks_down_negative_z() {
        let camera = CameraComponent::default();
        let view = camera.view_matrix(&Mat4::identity());

        // A point ahead of the camera lands on the view-space -Z axis.
        let ahead = view.transform_point(&Point3::new(0.0, 0.0, -5.0));
        assert_relative_eq!(ahead, Point3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_follows_owner_translation() {
        let camera = CameraComponent::default();
        let owner = Mat4::new_translation(&Vec3::new(0.0, 0.0, 10.0));
        let view = camera.view_matrix(&owner);

        let origin = view.transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(0.0, 0.0, -10.0), epsilon = 1e-5);
    }
}

//! Per-frame render commands
//!
//! A render command is an ephemeral (mesh, material, transform) tuple built
//! fresh every frame while scanning the world. Commands never outlive the
//! frame that produced them.

use super::backend::MeshId;
use super::material::Material;
use crate::foundation::math::{Mat4, Point3, Vec3};

/// One object to draw this frame
#[derive(Debug, Clone)]
pub struct RenderCommand<'a> {
    /// The entity's local-to-world matrix at command build time
    pub local_to_world: Mat4,

    /// The object-space origin transformed to world space
    ///
    /// Used as the sort point for the transparent back-to-front pass.
    pub center: Vec3,

    /// The mesh to draw
    pub mesh: MeshId,

    /// The material to draw it with (cache-owned, never owned here)
    pub material: &'a Material,
}

impl<'a> RenderCommand<'a> {
    /// Build a command, deriving the center from the transform
    pub fn new(local_to_world: Mat4, mesh: MeshId, material: &'a Material) -> Self {
        let center = local_to_world.transform_point(&Point3::origin()).coords;
        Self {
            local_to_world,
            center,
            mesh,
            material,
        }
    }
}

//! Mesh renderer components
//!
//! Renderer components reference meshes and materials by asset-cache name.
//! They never own the assets; the cache manages their lifetime and a
//! missing name simply skips the draw.

use serde::Deserialize;

/// Component drawing a single mesh with a single material
#[derive(Debug, Clone, Deserialize)]
pub struct MeshRendererComponent {
    /// Asset-cache name of the mesh to draw
    pub mesh: String,

    /// Asset-cache name of the material to draw it with
    pub material: String,
}

impl MeshRendererComponent {
    /// Create a renderer for the named mesh and material
    pub fn new(mesh: impl Into<String>, material: impl Into<String>) -> Self {
        Self {
            mesh: mesh.into(),
            material: material.into(),
        }
    }
}

/// Component drawing a multi-mesh bundle, one material per sub-mesh
///
/// Materials pair with sub-meshes by list position, so the material list
/// length must match the bundle's mesh count. Scene construction enforces
/// the match and fails hard on a mismatch.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiMeshRendererComponent {
    /// Asset-cache name of the multi-mesh bundle
    pub meshes: String,

    /// Asset-cache material names, one per sub-mesh in order
    pub materials: Vec<String>,
}

impl MultiMeshRendererComponent {
    /// Create a renderer for the named bundle and material list
    pub fn new(meshes: impl Into<String>, materials: Vec<String>) -> Self {
        Self {
            meshes: meshes.into(),
            materials,
        }
    }
}

//! Mesh data and procedural mesh construction
//!
//! Vertex data is uploaded to the device at creation; the engine keeps only
//! the device handle plus the object-space extreme points, which the world
//! needs to compute track bounds. Model file parsing is the embedding
//! application's concern.

use super::backend::{DeviceResult, GraphicsDevice, MeshId};
use crate::foundation::math::Vec3;
use bytemuck::{Pod, Zeroable};

/// One vertex as uploaded to the device
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position
    pub position: [f32; 3],
    /// Vertex color (RGBA, 8 bits per channel)
    pub color: [u8; 4],
    /// Texture coordinates
    pub tex_coord: [f32; 2],
    /// Object-space normal
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a white vertex from position, normal and texture coordinates
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            color: [255; 4],
            tex_coord,
            normal,
        }
    }
}

/// Object-space extreme vertices of a mesh, cached at load time
///
/// The track-bounds pass transforms these into world space instead of
/// re-scanning vertex data every time.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshExtremes {
    /// Vertex with the smallest X
    pub far_left: Vec3,
    /// Vertex with the largest X
    pub far_right: Vec3,
    /// Vertex with the largest Z (closest to the start line)
    pub z_nearest: Vec3,
    /// Vertex with the smallest Z (deepest into the track)
    pub z_furthest: Vec3,
}

impl MeshExtremes {
    /// Scan the vertex list for its extreme points
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let mut extremes = Self {
            far_left: Vec3::new(f32::MAX, 0.0, 0.0),
            far_right: Vec3::new(f32::MIN, 0.0, 0.0),
            z_nearest: Vec3::new(0.0, 0.0, f32::MIN),
            z_furthest: Vec3::new(0.0, 0.0, f32::MAX),
        };
        for vertex in vertices {
            let position = Vec3::from(vertex.position);
            if position.x < extremes.far_left.x {
                extremes.far_left = position;
            }
            if position.x > extremes.far_right.x {
                extremes.far_right = position;
            }
            if position.z > extremes.z_nearest.z {
                extremes.z_nearest = position;
            }
            if position.z < extremes.z_furthest.z {
                extremes.z_furthest = position;
            }
        }
        extremes
    }
}

/// A mesh uploaded to the device
///
/// Owns nothing on the CPU side beyond the cached extremes; the device
/// handle is released when the asset cache clears.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Device handle for drawing
    pub gpu: MeshId,

    /// Cached object-space extreme points
    pub extremes: MeshExtremes,
}

impl Mesh {
    /// Upload vertex data and build the mesh record
    pub fn create(
        device: &mut dyn GraphicsDevice,
        vertices: &[Vertex],
        indices: &[u32],
    ) -> DeviceResult<Self> {
        let gpu = device.create_mesh(vertices, indices)?;
        Ok(Self {
            gpu,
            extremes: MeshExtremes::from_vertices(vertices),
        })
    }
}

/// A bundle of sub-meshes loaded from one multi-object model
#[derive(Debug, Clone, Default)]
pub struct MultiMesh {
    /// The sub-meshes in model order
    pub meshes: Vec<Mesh>,
}

/// Generate a UV sphere
///
/// `segments` are the latitude and longitude subdivision counts. Triangles
/// wind counter-clockwise seen from outside; normals point outward.
pub fn sphere(segments: (u32, u32)) -> (Vec<Vertex>, Vec<u32>) {
    let (lat_segments, lon_segments) = (segments.0.max(2), segments.1.max(3));
    let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
    let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);

    for lat in 0..=lat_segments {
        let theta = std::f32::consts::PI * lat as f32 / lat_segments as f32;
        for lon in 0..=lon_segments {
            let phi = std::f32::consts::TAU * lon as f32 / lon_segments as f32;
            let position = [theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()];
            let tex_coord = [
                lon as f32 / lon_segments as f32,
                lat as f32 / lat_segments as f32,
            ];
            vertices.push(Vertex::new(position, position, tex_coord));
        }
    }

    let stride = lon_segments + 1;
    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let i0 = lat * stride + lon;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
        }
    }

    (vertices, indices)
}

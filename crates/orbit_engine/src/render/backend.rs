//! Backend abstraction for the rendering system
//!
//! [`GraphicsDevice`] is the narrow contract a concrete graphics API must
//! satisfy for the forward renderer to drive it. The engine ships only the
//! recording [`HeadlessDevice`]; windowed backends live with the embedding
//! application.

use super::pipeline::PipelineState;
use super::RenderError;
use crate::foundation::math::{Mat4, Vec2, Vec3, Vec4};
use crate::render::mesh::Vertex;
use serde::Deserialize;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, RenderError>;

/// Handle to a shader program owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderId(pub u64);

/// Handle to a texture owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Handle to an uploaded mesh owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

/// Handle to an offscreen framebuffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u64);

/// An offscreen framebuffer with its color and depth attachments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    /// The framebuffer itself
    pub framebuffer: FramebufferId,
    /// Color attachment texture
    pub color: TextureId,
    /// Depth attachment texture
    pub depth: TextureId,
}

/// Texture minification/magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Linear interpolation
    #[default]
    Linear,
    /// Nearest texel
    Nearest,
}

/// Texture coordinate wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureWrap {
    /// Repeat the texture
    #[default]
    Repeat,
    /// Clamp coordinates to the edge texel
    ClampToEdge,
}

/// Sampler settings applied when binding a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SamplerDesc {
    /// Minification filter
    pub min_filter: TextureFilter,
    /// Magnification filter
    pub mag_filter: TextureFilter,
    /// Wrap mode along S
    pub wrap_s: TextureWrap,
    /// Wrap mode along T
    pub wrap_t: TextureWrap,
}

impl SamplerDesc {
    /// Linear filtering, repeating along S and clamped along T (sky default)
    pub fn sky() -> Self {
        Self {
            wrap_t: TextureWrap::ClampToEdge,
            ..Default::default()
        }
    }

    /// Linear filtering clamped on both axes (postprocess input default)
    pub fn clamped() -> Self {
        Self {
            wrap_s: TextureWrap::ClampToEdge,
            wrap_t: TextureWrap::ClampToEdge,
            ..Default::default()
        }
    }
}

/// A typed uniform value uploaded to the bound shader
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// Signed integer uniform
    Int(i32),
    /// Float uniform
    Float(f32),
    /// 2-vector uniform
    Vec2(Vec2),
    /// 3-vector uniform
    Vec3(Vec3),
    /// 4-vector uniform
    Vec4(Vec4),
    /// 4x4 matrix uniform
    Mat4(Mat4),
}

/// The contract a rendering backend must satisfy
///
/// Resource creation returns opaque handles; all drawing goes through the
/// bound shader and pipeline state. Implementations are free to batch or
/// reorder internally as long as observable draw order is preserved.
pub trait GraphicsDevice {
    /// Create a shader program from vertex and fragment source paths
    fn create_shader(&mut self, vertex_path: &str, fragment_path: &str) -> DeviceResult<ShaderId>;

    /// Load a 2D texture from an image file
    fn load_texture(&mut self, path: &str, generate_mipmaps: bool) -> DeviceResult<TextureId>;

    /// Upload mesh data and return a handle for drawing it
    fn create_mesh(&mut self, vertices: &[Vertex], indices: &[u32]) -> DeviceResult<MeshId>;

    /// Create an offscreen render target with color and depth attachments
    fn create_render_target(&mut self, size: (u32, u32)) -> DeviceResult<RenderTarget>;

    /// Destroy a shader program
    fn destroy_shader(&mut self, shader: ShaderId);

    /// Destroy a texture
    fn destroy_texture(&mut self, texture: TextureId);

    /// Destroy an uploaded mesh
    fn destroy_mesh(&mut self, mesh: MeshId);

    /// Destroy a render target and its attachments
    fn destroy_render_target(&mut self, target: RenderTarget);

    /// Set the viewport to cover the given size from the origin
    fn set_viewport(&mut self, size: (u32, u32));

    /// Clear the bound framebuffer's color and depth
    fn clear(&mut self, color: [f32; 4], depth: f32);

    /// Bind an offscreen framebuffer, or the default one for `None`
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>);

    /// Apply fixed-function pipeline state
    fn apply_pipeline_state(&mut self, state: &PipelineState);

    /// Make a shader program current
    fn use_shader(&mut self, shader: ShaderId);

    /// Upload a named uniform to the current shader
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Bind a texture with sampler settings to a texture unit
    fn bind_texture(&mut self, unit: u32, texture: TextureId, sampler: &SamplerDesc);

    /// Draw an uploaded mesh with the current shader and state
    fn draw_mesh(&mut self, mesh: MeshId);

    /// Draw a fullscreen triangle generated in the vertex shader
    fn draw_fullscreen_triangle(&mut self);
}

/// One recorded device call
///
/// The headless device logs every call it receives so tests and the
/// offline harness can assert on draw order and uniform traffic.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    /// `set_viewport`
    SetViewport((u32, u32)),
    /// `clear`
    Clear,
    /// `bind_framebuffer`
    BindFramebuffer(Option<FramebufferId>),
    /// `apply_pipeline_state`
    ApplyPipelineState(PipelineState),
    /// `use_shader`
    UseShader(ShaderId),
    /// `set_uniform`
    SetUniform(String, UniformValue),
    /// `bind_texture`
    BindTexture(u32, TextureId),
    /// `draw_mesh`
    DrawMesh(MeshId),
    /// `draw_fullscreen_triangle`
    DrawFullscreenTriangle,
}

/// A graphics device that records calls instead of talking to a GPU
///
/// Used by the renderer tests and by the headless race harness. Resource
/// creation hands out sequential handles; `fail_render_targets` simulates
/// an incomplete framebuffer for degraded-mode testing.
#[derive(Default)]
pub struct HeadlessDevice {
    next_handle: u64,
    calls: Vec<DeviceCall>,
    /// When set, every `create_render_target` call fails
    pub fail_render_targets: bool,
}

impl HeadlessDevice {
    /// Create a recording device
    pub fn new() -> Self {
        Self::default()
    }

    /// The calls recorded so far
    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Take and reset the recorded calls
    pub fn take_calls(&mut self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.calls)
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_shader(&mut self, _vertex_path: &str, _fragment_path: &str) -> DeviceResult<ShaderId> {
        Ok(ShaderId(self.next()))
    }

    fn load_texture(&mut self, _path: &str, _generate_mipmaps: bool) -> DeviceResult<TextureId> {
        Ok(TextureId(self.next()))
    }

    fn create_mesh(&mut self, _vertices: &[Vertex], _indices: &[u32]) -> DeviceResult<MeshId> {
        Ok(MeshId(self.next()))
    }

    fn create_render_target(&mut self, size: (u32, u32)) -> DeviceResult<RenderTarget> {
        if self.fail_render_targets {
            return Err(RenderError::RenderTargetIncomplete(format!(
                "headless device configured to fail {}x{} targets",
                size.0, size.1
            )));
        }
        Ok(RenderTarget {
            framebuffer: FramebufferId(self.next()),
            color: TextureId(self.next()),
            depth: TextureId(self.next()),
        })
    }

    fn destroy_shader(&mut self, _shader: ShaderId) {}

    fn destroy_texture(&mut self, _texture: TextureId) {}

    fn destroy_mesh(&mut self, _mesh: MeshId) {}

    fn destroy_render_target(&mut self, _target: RenderTarget) {}

    fn set_viewport(&mut self, size: (u32, u32)) {
        self.calls.push(DeviceCall::SetViewport(size));
    }

    fn clear(&mut self, _color: [f32; 4], _depth: f32) {
        self.calls.push(DeviceCall::Clear);
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) {
        self.calls.push(DeviceCall::BindFramebuffer(framebuffer));
    }

    fn apply_pipeline_state(&mut self, state: &PipelineState) {
        self.calls.push(DeviceCall::ApplyPipelineState(state.clone()));
    }

    fn use_shader(&mut self, shader: ShaderId) {
        self.calls.push(DeviceCall::UseShader(shader));
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.calls.push(DeviceCall::SetUniform(name.to_owned(), value));
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId, _sampler: &SamplerDesc) {
        self.calls.push(DeviceCall::BindTexture(unit, texture));
    }

    fn draw_mesh(&mut self, mesh: MeshId) {
        self.calls.push(DeviceCall::DrawMesh(mesh));
    }

    fn draw_fullscreen_triangle(&mut self) {
        self.calls.push(DeviceCall::DrawFullscreenTriangle);
    }
}

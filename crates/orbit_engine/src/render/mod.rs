//! Rendering subsystem
//!
//! A forward renderer driving an abstract [`GraphicsDevice`]. The engine
//! core never talks to a concrete graphics API; the device trait is the
//! seam where a real backend (or the recording headless device) plugs in.

pub mod backend;
pub mod commands;
pub mod forward;
pub mod material;
pub mod mesh;
pub mod pipeline;

pub use backend::{GraphicsDevice, HeadlessDevice};
pub use commands::RenderCommand;
pub use forward::ForwardRenderer;
pub use material::{Material, MaterialKind};
pub use mesh::{Mesh, MultiMesh, Vertex};
pub use pipeline::PipelineState;

use thiserror::Error;

/// Errors surfaced by graphics device operations
#[derive(Error, Debug)]
pub enum RenderError {
    /// Shader program creation or linking failed
    #[error("shader creation failed: {0}")]
    ShaderCreation(String),

    /// A texture could not be loaded or created
    #[error("texture load failed: {0}")]
    TextureLoad(String),

    /// An offscreen render target could not be completed
    #[error("render target incomplete: {0}")]
    RenderTargetIncomplete(String),

    /// Mesh data could not be uploaded
    #[error("mesh upload failed: {0}")]
    MeshUpload(String),
}

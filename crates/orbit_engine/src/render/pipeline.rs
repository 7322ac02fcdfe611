//! Pipeline state description
//!
//! Captures the fixed-function state a material needs when its draw calls
//! execute. The device applies the whole struct before each draw.

/// Depth comparison function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthFunction {
    /// Pass when the incoming depth is strictly smaller
    Less,
    /// Pass when the incoming depth is smaller or equal
    LessOrEqual,
    /// Pass when the depths are equal
    Equal,
    /// Always pass
    Always,
}

/// Which face winding gets culled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullFace {
    /// Cull front faces (used when drawing from inside a sphere)
    Front,
    /// Cull back faces
    Back,
}

/// Fixed-function state applied before drawing with a material
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    /// Depth testing function, or `None` to disable depth testing
    pub depth_test: Option<DepthFunction>,

    /// Face culling mode, or `None` to disable culling
    pub face_culling: Option<CullFace>,

    /// Whether alpha blending is enabled
    pub blending: bool,

    /// Whether depth writes are enabled
    pub depth_mask: bool,

    /// Per-channel color write mask
    pub color_mask: [bool; 4],
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            depth_test: None,
            face_culling: None,
            blending: false,
            depth_mask: true,
            color_mask: [true; 4],
        }
    }
}

impl PipelineState {
    /// State for ordinary opaque geometry
    pub fn opaque() -> Self {
        Self {
            depth_test: Some(DepthFunction::Less),
            face_culling: Some(CullFace::Back),
            ..Default::default()
        }
    }

    /// State for the sky sphere
    ///
    /// The sky draws after opaque geometry at the far plane, so the depth
    /// function must admit equal depths, and the sphere is seen from the
    /// inside so front faces are culled.
    pub fn sky() -> Self {
        Self {
            depth_test: Some(DepthFunction::LessOrEqual),
            face_culling: Some(CullFace::Front),
            ..Default::default()
        }
    }

    /// State for blended fullscreen overlays
    pub fn overlay() -> Self {
        Self {
            blending: true,
            ..Default::default()
        }
    }
}

//! Material model
//!
//! One flat material struct with a kind tag instead of an inheritance
//! chain: every material carries a pipeline state, a shader, a tint and a
//! transparency flag, and the kind tag carries whatever texture set the
//! shading path needs. The upload path is selected once at creation time,
//! not re-discovered per draw call.

use super::backend::{GraphicsDevice, SamplerDesc, ShaderId, TextureId, UniformValue};
use super::pipeline::PipelineState;
use crate::foundation::math::Vec4;

/// Texture bindings for a plainly textured material
#[derive(Debug, Clone, PartialEq)]
pub struct TextureSet {
    /// The diffuse texture
    pub texture: TextureId,
    /// Sampler settings
    pub sampler: SamplerDesc,
    /// Alpha below which fragments are discarded
    pub alpha_threshold: f32,
}

/// Texture maps for a lit material
#[derive(Debug, Clone, PartialEq)]
pub struct LitTextures {
    /// Albedo map
    pub albedo: TextureId,
    /// Specular map
    pub specular: TextureId,
    /// Roughness map
    pub roughness: TextureId,
    /// Ambient occlusion map
    pub ambient_occlusion: TextureId,
    /// Emissive map
    pub emissive: TextureId,
    /// One sampler shared by all maps
    pub sampler: SamplerDesc,
    /// Alpha below which fragments are discarded
    pub alpha_threshold: f32,
}

/// Frame sequence for an animated texture material
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedTexture {
    /// The frames in playback order
    pub frames: Vec<TextureId>,
    /// Sampler settings
    pub sampler: SamplerDesc,
    /// Alpha below which fragments are discarded
    pub alpha_threshold: f32,
    /// How long each frame stays on screen
    pub seconds_per_frame: f32,
}

impl AnimatedTexture {
    /// The frame to show at the given elapsed time
    ///
    /// Derived from elapsed time rather than mutated per draw, so playback
    /// position never drifts with frame rate.
    pub fn frame_at(&self, time: f32) -> Option<TextureId> {
        if self.frames.is_empty() || self.seconds_per_frame <= 0.0 {
            return self.frames.first().copied();
        }
        let index = (time / self.seconds_per_frame) as usize % self.frames.len();
        Some(self.frames[index])
    }
}

/// Shading path of a material
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialKind {
    /// Solid tint only
    Tinted,
    /// Tint modulating a single texture
    Textured(TextureSet),
    /// Lit shading with a full texture-map set
    Lit(LitTextures),
    /// Tint modulating an animated frame sequence
    AnimatedTexture(AnimatedTexture),
}

/// A material: pipeline state, shader, tint and shading path
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Fixed-function state for draws with this material
    pub pipeline: PipelineState,

    /// Shader program handle
    pub shader: ShaderId,

    /// Whether draws must go through the back-to-front transparent pass
    pub transparent: bool,

    /// Tint color multiplied into the shading result
    pub tint: Vec4,

    /// Shading path and its texture set
    pub kind: MaterialKind,
}

impl Material {
    /// Create a tint-only material with default pipeline state
    pub fn tinted(shader: ShaderId, tint: Vec4) -> Self {
        Self {
            pipeline: PipelineState::default(),
            shader,
            transparent: false,
            tint,
            kind: MaterialKind::Tinted,
        }
    }

    /// Whether this material takes the lit upload path
    pub fn is_lit(&self) -> bool {
        matches!(self.kind, MaterialKind::Lit(_))
    }

    /// Apply pipeline state, make the shader current and upload the
    /// material's own uniforms
    ///
    /// `time` selects the current frame for animated textures. The caller
    /// uploads the transform (and, for lit materials, the light array) on
    /// top of this.
    pub fn bind(&self, device: &mut dyn GraphicsDevice, time: f32) {
        device.apply_pipeline_state(&self.pipeline);
        device.use_shader(self.shader);
        device.set_uniform("tint", UniformValue::Vec4(self.tint));

        match &self.kind {
            MaterialKind::Tinted => {}
            MaterialKind::Textured(set) => {
                device.set_uniform("alpha_threshold", UniformValue::Float(set.alpha_threshold));
                device.set_uniform("tex", UniformValue::Int(0));
                device.bind_texture(0, set.texture, &set.sampler);
            }
            MaterialKind::Lit(maps) => {
                device.set_uniform("alpha_threshold", UniformValue::Float(maps.alpha_threshold));
                let bindings = [
                    ("material.albedo", maps.albedo),
                    ("material.specular", maps.specular),
                    ("material.roughness", maps.roughness),
                    ("material.ambient_occlusion", maps.ambient_occlusion),
                    ("material.emissive", maps.emissive),
                ];
                for (unit, (name, texture)) in bindings.into_iter().enumerate() {
                    device.set_uniform(name, UniformValue::Int(unit as i32));
                    device.bind_texture(unit as u32, texture, &maps.sampler);
                }
            }
            MaterialKind::AnimatedTexture(animation) => {
                device.set_uniform(
                    "alpha_threshold",
                    UniformValue::Float(animation.alpha_threshold),
                );
                device.set_uniform("tex", UniformValue::Int(0));
                if let Some(frame) = animation.frame_at(time) {
                    device.bind_texture(0, frame, &animation.sampler);
                }
            }
        }
    }
}

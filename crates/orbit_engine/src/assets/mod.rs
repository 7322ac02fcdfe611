//! Asset cache
//!
//! Typed, string-keyed storage for everything the renderer reads: shaders,
//! textures, samplers, meshes, multi-mesh bundles and materials. The cache
//! is the owner; components and render commands only ever look assets up
//! by name and tolerate a missing entry by skipping the draw.
//!
//! `deserialize_all` builds shaders, textures and materials from the asset
//! manifest. Malformed manifests (a material naming a shader or texture
//! that the manifest never declares, or missing a field its kind requires)
//! abort the load: a partially built asset set corrupts every scene that
//! references it. A texture file that merely fails to load is different:
//! the entry is left empty and dependent materials degrade to their tint.

use crate::core::config::{AssetsConfig, MaterialDesc, MaterialKindDesc};
use crate::foundation::math::Vec4;
use crate::render::backend::{GraphicsDevice, SamplerDesc, ShaderId, TextureId};
use crate::render::material::{
    AnimatedTexture, LitTextures, Material, MaterialKind, TextureSet,
};
use crate::render::mesh::{Mesh, MultiMesh};
use crate::render::pipeline::{CullFace, DepthFunction, PipelineState};
use crate::render::RenderError;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building assets from the manifest
#[derive(Error, Debug)]
pub enum AssetError {
    /// A material referenced a shader the manifest does not declare
    #[error("material '{material}' references unknown shader '{name}'")]
    UnknownShader {
        /// Offending material name
        material: String,
        /// The missing shader name
        name: String,
    },

    /// A material referenced a texture the manifest does not declare
    #[error("material '{material}' references unknown texture '{name}'")]
    UnknownTexture {
        /// Offending material name
        material: String,
        /// The missing texture name
        name: String,
    },

    /// A material is missing a field its kind requires
    #[error("material '{material}' is missing required field '{field}'")]
    MissingField {
        /// Offending material name
        material: String,
        /// The missing field
        field: &'static str,
    },

    /// A device operation failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Marker trait tying an asset type to its store inside the cache
pub trait CachedAsset: Sized {
    /// Borrow the store for this asset type
    fn store(cache: &AssetCache) -> &HashMap<String, Self>;

    /// Mutably borrow the store for this asset type
    fn store_mut(cache: &mut AssetCache) -> &mut HashMap<String, Self>;
}

macro_rules! impl_cached_asset {
    ($asset:ty, $field:ident) => {
        impl CachedAsset for $asset {
            fn store(cache: &AssetCache) -> &HashMap<String, Self> {
                &cache.$field
            }

            fn store_mut(cache: &mut AssetCache) -> &mut HashMap<String, Self> {
                &mut cache.$field
            }
        }
    };
}

/// The owning cache of all shared assets
#[derive(Default)]
pub struct AssetCache {
    shaders: HashMap<String, ShaderId>,
    textures: HashMap<String, TextureId>,
    samplers: HashMap<String, SamplerDesc>,
    meshes: HashMap<String, Mesh>,
    multi_meshes: HashMap<String, MultiMesh>,
    materials: HashMap<String, Material>,
}

impl_cached_asset!(ShaderId, shaders);
impl_cached_asset!(TextureId, textures);
impl_cached_asset!(SamplerDesc, samplers);
impl_cached_asset!(Mesh, meshes);
impl_cached_asset!(MultiMesh, multi_meshes);
impl_cached_asset!(Material, materials);

impl AssetCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-owning lookup by name
    pub fn get<T: CachedAsset>(&self, name: &str) -> Option<&T> {
        T::store(self).get(name)
    }

    /// Insert an asset, replacing any existing entry under the same name
    pub fn insert<T: CachedAsset>(&mut self, name: impl Into<String>, asset: T) {
        T::store_mut(self).insert(name.into(), asset);
    }

    /// Build shaders, textures, samplers and materials from the manifest
    ///
    /// Meshes are registered separately by the embedding application since
    /// model file parsing is not an engine concern.
    pub fn deserialize_all(
        &mut self,
        config: &AssetsConfig,
        device: &mut dyn GraphicsDevice,
    ) -> Result<(), AssetError> {
        for (name, desc) in &config.shaders {
            match device.create_shader(&desc.vertex, &desc.fragment) {
                Ok(shader) => {
                    self.shaders.insert(name.clone(), shader);
                }
                Err(error) => log::error!("shader '{}' failed to build: {}", name, error),
            }
        }

        for (name, path) in &config.textures {
            match device.load_texture(path, true) {
                Ok(texture) => {
                    self.textures.insert(name.clone(), texture);
                }
                Err(error) => log::error!("texture '{}' failed to load: {}", name, error),
            }
        }

        for (name, sampler) in &config.samplers {
            self.samplers.insert(name.clone(), *sampler);
        }

        for (name, desc) in &config.materials {
            match self.build_material(name, desc, config) {
                Ok(Some(material)) => {
                    self.materials.insert(name.clone(), material);
                }
                // The material's shader or a texture file failed earlier;
                // the entry stays empty and dependents skip it.
                Ok(None) => {}
                Err(error) => return Err(error),
            }
        }

        Ok(())
    }

    /// Release every cached asset and the device resources behind them
    pub fn clear_all(&mut self, device: &mut dyn GraphicsDevice) {
        for shader in self.shaders.values() {
            device.destroy_shader(*shader);
        }
        for texture in self.textures.values() {
            device.destroy_texture(*texture);
        }
        for mesh in self.meshes.values() {
            device.destroy_mesh(mesh.gpu);
        }
        for bundle in self.multi_meshes.values() {
            for mesh in &bundle.meshes {
                device.destroy_mesh(mesh.gpu);
            }
        }
        self.shaders.clear();
        self.textures.clear();
        self.samplers.clear();
        self.meshes.clear();
        self.multi_meshes.clear();
        self.materials.clear();
    }

    /// Look up a texture that a material requires
    ///
    /// Declared-but-failed textures return `Ok(None)` so the material can
    /// degrade; undeclared names are a fatal manifest error.
    fn required_texture(
        &self,
        material: &str,
        name: &str,
        config: &AssetsConfig,
    ) -> Result<Option<TextureId>, AssetError> {
        if let Some(texture) = self.textures.get(name) {
            return Ok(Some(*texture));
        }
        if config.textures.contains_key(name) {
            log::warn!(
                "material '{}' degrades to tint: texture '{}' failed to load",
                material,
                name
            );
            return Ok(None);
        }
        Err(AssetError::UnknownTexture {
            material: material.to_owned(),
            name: name.to_owned(),
        })
    }

    fn sampler_or_default(&self, name: Option<&String>) -> SamplerDesc {
        name.and_then(|n| self.samplers.get(n).copied())
            .unwrap_or_default()
    }

    fn build_material(
        &self,
        name: &str,
        desc: &MaterialDesc,
        config: &AssetsConfig,
    ) -> Result<Option<Material>, AssetError> {
        let Some(&shader) = self.shaders.get(&desc.shader) else {
            if config.shaders.contains_key(&desc.shader) {
                log::warn!(
                    "material '{}' skipped: shader '{}' failed to build",
                    name,
                    desc.shader
                );
                return Ok(None);
            }
            return Err(AssetError::UnknownShader {
                material: name.to_owned(),
                name: desc.shader.clone(),
            });
        };

        let pipeline = PipelineState {
            depth_test: desc.depth_test.then_some(DepthFunction::Less),
            face_culling: desc.cull_back_faces.then_some(CullFace::Back),
            blending: desc.blending,
            ..PipelineState::default()
        };
        let sampler = self.sampler_or_default(desc.sampler.as_ref());

        let kind = match desc.kind {
            MaterialKindDesc::Tinted => MaterialKind::Tinted,
            MaterialKindDesc::Textured => {
                let Some(texture_name) = desc.texture.as_ref() else {
                    return Err(AssetError::MissingField {
                        material: name.to_owned(),
                        field: "texture",
                    });
                };
                match self.required_texture(name, texture_name, config)? {
                    Some(texture) => MaterialKind::Textured(TextureSet {
                        texture,
                        sampler,
                        alpha_threshold: desc.alpha_threshold,
                    }),
                    None => MaterialKind::Tinted,
                }
            }
            MaterialKindDesc::Lit => {
                let fields = [
                    ("albedo", desc.albedo.as_ref()),
                    ("specular", desc.specular.as_ref()),
                    ("roughness", desc.roughness.as_ref()),
                    ("ambient_occlusion", desc.ambient_occlusion.as_ref()),
                    ("emissive", desc.emissive.as_ref()),
                ];
                let mut maps = Vec::with_capacity(fields.len());
                for (field, value) in fields {
                    let Some(texture_name) = value else {
                        return Err(AssetError::MissingField {
                            material: name.to_owned(),
                            field,
                        });
                    };
                    maps.push(self.required_texture(name, texture_name, config)?);
                }
                match maps.into_iter().collect::<Option<Vec<TextureId>>>() {
                    Some(maps) => MaterialKind::Lit(LitTextures {
                        albedo: maps[0],
                        specular: maps[1],
                        roughness: maps[2],
                        ambient_occlusion: maps[3],
                        emissive: maps[4],
                        sampler,
                        alpha_threshold: desc.alpha_threshold,
                    }),
                    None => MaterialKind::Tinted,
                }
            }
            MaterialKindDesc::Gif => {
                if desc.frames.is_empty() {
                    return Err(AssetError::MissingField {
                        material: name.to_owned(),
                        field: "frames",
                    });
                }
                let mut frames = Vec::with_capacity(desc.frames.len());
                for frame in &desc.frames {
                    if let Some(texture) = self.required_texture(name, frame, config)? {
                        frames.push(texture);
                    }
                }
                MaterialKind::AnimatedTexture(AnimatedTexture {
                    frames,
                    sampler,
                    alpha_threshold: desc.alpha_threshold,
                    seconds_per_frame: desc.seconds_per_frame,
                })
            }
        };

        Ok(Some(Material {
            pipeline,
            shader,
            transparent: desc.transparent,
            tint: Vec4::from(desc.tint),
            kind,
        }))
    }
}

//! Unified configuration types
//!
//! Everything the engine consumes from configuration lives here: the asset
//! manifest, the scene world graph, gameplay hyper-parameters, movement
//! restriction flags and renderer options. The on-disk format is RON; the
//! structures themselves stay format-agnostic through serde.

use crate::ecs::components::{
    FreeCameraControllerComponent, LightComponent, MeshRendererComponent, MovementComponent,
    MultiMeshRendererComponent,
};
use crate::ecs::components::{CameraComponent, LightKind};
use crate::ecs::entity::EntityKind;
use crate::foundation::math::{Vec2, Vec3};
use crate::render::backend::SamplerDesc;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file did not parse
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

fn default_true() -> bool {
    true
}

fn unit_scale() -> Vec3 {
    Vec3::new(1.0, 1.0, 1.0)
}

fn default_tint() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

fn default_seconds_per_frame() -> f32 {
    0.1
}

/// Which axes the player's movement is restricted along
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovementRestriction {
    /// Keep the aircraft inside the track's left/right bounds
    pub restrict_x: bool,

    /// Keep the aircraft above the minimum flight height
    pub restrict_y: bool,

    /// Keep the aircraft ahead of the start line
    pub restrict_z: bool,

    /// Move forward automatically every frame
    pub auto_move_forward: bool,

    /// Whether the backward-movement key does anything
    pub allow_moving_backwards: bool,

    /// Whether pointer movement rotates the camera at all
    pub allow_mouse: bool,
}

impl Default for MovementRestriction {
    fn default() -> Self {
        Self {
            restrict_x: false,
            restrict_y: false,
            restrict_z: false,
            auto_move_forward: false,
            allow_moving_backwards: true,
            allow_mouse: true,
        }
    }
}

/// Gameplay tuning knobs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HyperParameters {
    /// Offset from the camera position to the visible aircraft
    pub camera_aircraft_offset: Vec3,

    /// Asset-cache mesh name used for collectable artifacts
    pub collectable_mesh: String,

    /// Asset-cache material name used for collectable artifacts
    pub collectable_material: String,

    /// Collectables spawned per unit of track length
    pub collectable_density: f32,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            camera_aircraft_offset: Vec3::new(0.0, -1.0, -5.0),
            collectable_mesh: "collectable".to_owned(),
            collectable_material: "moon".to_owned(),
            collectable_density: 0.35,
        }
    }
}

/// Top-level gameplay configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Movement restriction flags
    pub movement_restriction: MovementRestriction,

    /// Gameplay tuning knobs
    pub hyper_parameters: HyperParameters,
}

/// Renderer options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RendererOptions {
    /// Sky texture path; no sky is drawn when absent
    pub sky: Option<String>,

    /// Named postprocess effects mapped to fragment shader paths
    pub postprocess: BTreeMap<String, String>,
}

/// Shader program description
#[derive(Debug, Clone, Deserialize)]
pub struct ShaderDesc {
    /// Vertex shader source path
    pub vertex: String,

    /// Fragment shader source path
    pub fragment: String,
}

/// Shading path selector for a configured material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKindDesc {
    /// Solid tint only
    #[default]
    Tinted,
    /// Single diffuse texture
    Textured,
    /// Lit shading with a texture-map set
    Lit,
    /// Animated frame sequence
    Gif,
}

/// A configured material
///
/// Which optional fields are required depends on `kind`; the asset loader
/// treats a missing required field as a fatal configuration error.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialDesc {
    /// Shading path
    #[serde(default)]
    pub kind: MaterialKindDesc,

    /// Asset-cache shader name
    pub shader: String,

    /// Tint color
    #[serde(default = "default_tint")]
    pub tint: [f32; 4],

    /// Whether the material draws in the transparent pass
    #[serde(default)]
    pub transparent: bool,

    /// Whether depth testing is enabled
    #[serde(default = "default_true")]
    pub depth_test: bool,

    /// Whether alpha blending is enabled
    #[serde(default)]
    pub blending: bool,

    /// Whether back faces are culled
    #[serde(default = "default_true")]
    pub cull_back_faces: bool,

    /// Diffuse texture name (textured materials)
    #[serde(default)]
    pub texture: Option<String>,

    /// Sampler name; device defaults when absent
    #[serde(default)]
    pub sampler: Option<String>,

    /// Alpha threshold below which fragments are discarded
    #[serde(default)]
    pub alpha_threshold: f32,

    /// Albedo map name (lit materials)
    #[serde(default)]
    pub albedo: Option<String>,

    /// Specular map name (lit materials)
    #[serde(default)]
    pub specular: Option<String>,

    /// Roughness map name (lit materials)
    #[serde(default)]
    pub roughness: Option<String>,

    /// Ambient occlusion map name (lit materials)
    #[serde(default)]
    pub ambient_occlusion: Option<String>,

    /// Emissive map name (lit materials)
    #[serde(default)]
    pub emissive: Option<String>,

    /// Frame texture names in playback order (animated materials)
    #[serde(default)]
    pub frames: Vec<String>,

    /// Seconds each animation frame stays on screen
    #[serde(default = "default_seconds_per_frame")]
    pub seconds_per_frame: f32,
}

/// The asset manifest: everything the cache builds up front
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Shader programs by name
    pub shaders: BTreeMap<String, ShaderDesc>,

    /// Texture image paths by name
    pub textures: BTreeMap<String, String>,

    /// Samplers by name
    pub samplers: BTreeMap<String, SamplerDesc>,

    /// Materials by name
    pub materials: BTreeMap<String, MaterialDesc>,
}

/// Camera component configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let component = CameraComponent::default();
        Self {
            fov_y: component.fov_y,
            near: component.near,
            far: component.far,
        }
    }
}

impl CameraConfig {
    /// Build the runtime component
    pub fn to_component(&self) -> CameraComponent {
        CameraComponent {
            fov_y: self.fov_y,
            near: self.near,
            far: self.far,
        }
    }
}

/// Light component configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    /// Kind of light source
    pub kind: LightKind,

    /// Light color
    #[serde(default = "LightConfig::default_color")]
    pub color: Vec3,

    /// Constant, linear and quadratic attenuation factors
    #[serde(default = "LightConfig::default_attenuation")]
    pub attenuation: Vec3,

    /// Inner and outer cone angles in radians (spot lights)
    #[serde(default = "LightConfig::default_cone_angles")]
    pub cone_angles: Vec2,

    /// Light direction (directional and spot lights)
    #[serde(default = "LightConfig::default_direction")]
    pub direction: Vec3,
}

impl LightConfig {
    fn default_color() -> Vec3 {
        LightComponent::default().color
    }

    fn default_attenuation() -> Vec3 {
        LightComponent::default().attenuation
    }

    fn default_cone_angles() -> Vec2 {
        Vec2::zeros()
    }

    fn default_direction() -> Vec3 {
        LightComponent::default().direction
    }

    /// Build the runtime component
    pub fn to_component(&self) -> LightComponent {
        LightComponent {
            kind: self.kind,
            color: self.color,
            attenuation: self.attenuation,
            cone_angles: self.cone_angles,
            direction: self.direction,
        }
    }
}

/// One component attached to a configured entity
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentConfig {
    /// Perspective camera
    Camera(CameraConfig),
    /// Light source
    Light(LightConfig),
    /// Single-mesh renderer
    MeshRenderer(MeshRendererComponent),
    /// Multi-mesh renderer
    MultiMeshRenderer(MultiMeshRendererComponent),
    /// Constant velocity movement
    Movement(MovementComponent),
    /// Free camera steering
    FreeCameraController(FreeCameraControllerComponent),
}

/// One entity in the scene world graph
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Entity name
    pub name: String,

    /// Gameplay classification tag
    pub kind: EntityKind,

    /// Local position
    pub position: Vec3,

    /// Local rotation in degrees (converted to radians on load)
    pub rotation: Vec3,

    /// Local scale
    pub scale: Vec3,

    /// Components attached to the entity
    pub components: Vec<ComponentConfig>,

    /// Child entities, parented to this one
    pub children: Vec<EntityConfig>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: EntityKind::Other,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: unit_scale(),
            components: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// The whole scene: assets, world graph, gameplay and renderer settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Asset manifest
    pub assets: AssetsConfig,

    /// Root entities of the world graph
    pub world: Vec<EntityConfig>,

    /// Gameplay configuration
    pub game: GameConfig,

    /// Renderer options
    pub renderer: RendererOptions,

    /// Track length override; the track entity's Z scale when absent
    pub track_length: Option<f32>,
}

impl SceneConfig {
    /// Parse a scene from RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Load a scene from a RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }
}

//! Forward renderer
//!
//! Builds per-frame render command lists from the world, sorts transparent
//! commands back-to-front, and executes the opaque → aircraft → sky →
//! transparent → postprocess → overlay draw sequence against the abstract
//! graphics device. The renderer owns only its auxiliary resources (sky
//! sphere and material, offscreen target, postprocess and overlay
//! materials); everything else is read from the asset cache.

use super::backend::{GraphicsDevice, RenderTarget, SamplerDesc, UniformValue};
use super::commands::RenderCommand;
use super::material::{Material, MaterialKind, TextureSet};
use super::mesh::{self, Mesh, MultiMesh};
use super::pipeline::PipelineState;
use crate::assets::AssetCache;
use crate::core::config::{GameConfig, RendererOptions};
use crate::ecs::components::{
    CameraComponent, LightComponent, MeshRendererComponent, MultiMeshRendererComponent,
};
use crate::ecs::world::World;
use crate::ecs::EntityKey;
use crate::foundation::math::{Mat4, Point3, Vec3, Vec4};
use std::collections::HashMap;

/// The aircraft is hidden once the field of view crosses this value,
/// since the boosted view would clip straight through it.
const AIRCRAFT_HIDE_FOV: f32 = 2.0;

/// Vertex shader shared by sky and screen-space geometry
const TEXTURED_VERTEX_SHADER: &str = "assets/shaders/textured.vert";
/// Fragment shader for the sky sphere
const TEXTURED_FRAGMENT_SHADER: &str = "assets/shaders/textured.frag";
/// Vertex shader generating the fullscreen triangle
const FULLSCREEN_VERTEX_SHADER: &str = "assets/shaders/fullscreen.vert";
/// Fragment shader tinting the forbidden-zone overlay
const FORBIDDEN_FRAGMENT_SHADER: &str = "assets/shaders/forbidden-access.frag";

/// Latitude/longitude segments of the sky sphere
const SKY_SPHERE_SEGMENTS: (u32, u32) = (16, 16);

struct SkyResources {
    mesh: Mesh,
    material: Material,
}

struct PostprocessResources {
    target: RenderTarget,
    materials: HashMap<String, Material>,
    active: Option<String>,
}

/// Forward rendering pipeline over an abstract graphics device
#[derive(Default)]
pub struct ForwardRenderer {
    window_size: (u32, u32),
    sky: Option<SkyResources>,
    postprocess: Option<PostprocessResources>,
    overlay: Option<Material>,
}

impl ForwardRenderer {
    /// Create a renderer with no resources yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the renderer-owned auxiliary resources
    ///
    /// A failed sky or overlay shader skips that feature; an incomplete
    /// offscreen target is logged and disables postprocessing for the
    /// whole session. Neither failure is fatal.
    pub fn initialize(
        &mut self,
        window_size: (u32, u32),
        options: &RendererOptions,
        device: &mut dyn GraphicsDevice,
    ) {
        self.window_size = window_size;

        if let Some(sky_texture) = &options.sky {
            self.sky = self.build_sky(sky_texture, device);
        }

        if !options.postprocess.is_empty() {
            self.postprocess = self.build_postprocess(&options.postprocess, device);
        }

        match device.create_shader(FULLSCREEN_VERTEX_SHADER, FORBIDDEN_FRAGMENT_SHADER) {
            Ok(shader) => {
                let mut material =
                    Material::tinted(shader, Vec4::new(0.8, 0.0, 0.0, 0.35));
                material.pipeline = PipelineState::overlay();
                self.overlay = Some(material);
            }
            Err(error) => log::error!("forbidden-zone overlay unavailable: {}", error),
        }
    }

    fn build_sky(&self, texture_path: &str, device: &mut dyn GraphicsDevice) -> Option<SkyResources> {
        let (vertices, indices) = mesh::sphere(SKY_SPHERE_SEGMENTS);
        let sphere = match Mesh::create(device, &vertices, &indices) {
            Ok(sphere) => sphere,
            Err(error) => {
                log::error!("sky sphere upload failed: {}", error);
                return None;
            }
        };
        let shader = match device.create_shader(TEXTURED_VERTEX_SHADER, TEXTURED_FRAGMENT_SHADER) {
            Ok(shader) => shader,
            Err(error) => {
                log::error!("sky shader failed to build: {}", error);
                return None;
            }
        };
        // Mipmaps are skipped to avoid blurring the sky.
        let texture = match device.load_texture(texture_path, false) {
            Ok(texture) => texture,
            Err(error) => {
                log::error!("sky texture '{}' failed to load: {}", texture_path, error);
                return None;
            }
        };

        Some(SkyResources {
            mesh: sphere,
            material: Material {
                pipeline: PipelineState::sky(),
                shader,
                transparent: false,
                tint: Vec4::new(1.0, 1.0, 1.0, 1.0),
                kind: MaterialKind::Textured(TextureSet {
                    texture,
                    sampler: SamplerDesc::sky(),
                    alpha_threshold: 1.0,
                }),
            },
        })
    }

    fn build_postprocess(
        &self,
        effects: &std::collections::BTreeMap<String, String>,
        device: &mut dyn GraphicsDevice,
    ) -> Option<PostprocessResources> {
        let target = match device.create_render_target(self.window_size) {
            Ok(target) => target,
            Err(error) => {
                log::error!("{}; continuing without postprocessing", error);
                return None;
            }
        };

        let mut materials = HashMap::new();
        for (name, fragment_path) in effects {
            let shader = match device.create_shader(FULLSCREEN_VERTEX_SHADER, fragment_path) {
                Ok(shader) => shader,
                Err(error) => {
                    log::error!("postprocess effect '{}' failed to build: {}", name, error);
                    continue;
                }
            };
            materials.insert(
                name.clone(),
                Material {
                    // Postprocessing never touches the depth buffer.
                    pipeline: PipelineState {
                        depth_mask: false,
                        ..PipelineState::default()
                    },
                    shader,
                    transparent: false,
                    tint: Vec4::new(1.0, 1.0, 1.0, 1.0),
                    kind: MaterialKind::Textured(TextureSet {
                        texture: target.color,
                        sampler: SamplerDesc::clamped(),
                        alpha_threshold: 0.0,
                    }),
                },
            );
        }

        let active = materials.contains_key("default").then(|| "default".to_owned());
        if active.is_none() {
            log::warn!("no 'default' postprocess effect supplied");
        }

        Some(PostprocessResources {
            target,
            materials,
            active,
        })
    }

    /// The currently selected postprocess effect, if any
    pub fn active_effect(&self) -> Option<&str> {
        self.postprocess
            .as_ref()
            .and_then(|postprocess| postprocess.active.as_deref())
    }

    /// Select a postprocess effect by name, or disable postprocessing
    pub fn set_active_effect(&mut self, name: Option<&str>) {
        let Some(postprocess) = self.postprocess.as_mut() else {
            return;
        };
        match name {
            None => postprocess.active = None,
            Some(name) if postprocess.materials.contains_key(name) => {
                postprocess.active = Some(name.to_owned());
            }
            Some(name) => log::warn!("unknown postprocess effect '{}'", name),
        }
    }

    /// Render one frame of the world
    ///
    /// `time` is the session's elapsed time in seconds, used to advance
    /// animated textures. A world without a camera renders nothing.
    pub fn render(
        &mut self,
        world: &mut World,
        assets: &AssetCache,
        device: &mut dyn GraphicsDevice,
        forbidden_access: bool,
        config: &GameConfig,
        time: f32,
    ) {
        let mut camera_key: Option<EntityKey> = None;
        let mut opaque: Vec<RenderCommand<'_>> = Vec::new();
        let mut transparent: Vec<RenderCommand<'_>> = Vec::new();
        let aircraft_key = world.aircraft();

        for (key, _) in world.iter_live() {
            if camera_key.is_none() && world.component::<CameraComponent>(key).is_some() {
                camera_key = Some(key);
            }
            // The aircraft is slaved to the camera and drawn specially.
            if Some(key) == aircraft_key {
                continue;
            }

            if let Some(renderer) = world.component::<MeshRendererComponent>(key) {
                let Some(mesh) = assets.get::<Mesh>(&renderer.mesh) else {
                    log::debug!("mesh '{}' missing; draw skipped", renderer.mesh);
                    continue;
                };
                let Some(material) = assets.get::<Material>(&renderer.material) else {
                    log::debug!("material '{}' missing; draw skipped", renderer.material);
                    continue;
                };
                let command =
                    RenderCommand::new(world.local_to_world_matrix(key), mesh.gpu, material);
                if material.transparent {
                    transparent.push(command);
                } else {
                    opaque.push(command);
                }
            } else if let Some(renderer) = world.component::<MultiMeshRendererComponent>(key) {
                let Some(bundle) = assets.get::<MultiMesh>(&renderer.meshes) else {
                    log::debug!("multi-mesh '{}' missing; draw skipped", renderer.meshes);
                    continue;
                };
                let local_to_world = world.local_to_world_matrix(key);
                // Materials pair with sub-meshes by list position.
                for (mesh, material_name) in bundle.meshes.iter().zip(&renderer.materials) {
                    let Some(material) = assets.get::<Material>(material_name) else {
                        continue;
                    };
                    let command = RenderCommand::new(local_to_world, mesh.gpu, material);
                    if material.transparent {
                        transparent.push(command);
                    } else {
                        opaque.push(command);
                    }
                }
            }
        }

        let Some(camera_key) = camera_key else {
            log::debug!("no camera in world; frame skipped");
            return;
        };
        let Some(camera) = world.component::<CameraComponent>(camera_key).cloned() else {
            return;
        };

        // Slave the aircraft to the camera before building its command.
        let aircraft_command = aircraft_key.and_then(|key| {
            let camera_position = world.entity(camera_key)?.transform.position;
            let entity = world.entity_mut(key)?;
            entity.transform.position =
                camera_position + config.hyper_parameters.camera_aircraft_offset;
            let renderer = world.component::<MeshRendererComponent>(key)?;
            let mesh = assets.get::<Mesh>(&renderer.mesh)?;
            let material = assets.get::<Material>(&renderer.material)?;
            Some(RenderCommand::new(
                world.local_to_world_matrix(key),
                mesh.gpu,
                material,
            ))
        });

        let camera_to_world = world.local_to_world_matrix(camera_key);
        let camera_position = camera_to_world.transform_point(&Point3::origin()).coords;
        let camera_forward = camera_to_world
            .transform_point(&Point3::new(0.0, 0.0, -1.0))
            .coords;

        // Painter's algorithm: the command farthest from the point one unit
        // ahead of the camera draws first.
        transparent.sort_by(|first, second| {
            let first_distance = (camera_forward - first.center).norm();
            let second_distance = (camera_forward - second.center).norm();
            second_distance
                .partial_cmp(&first_distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let view_projection =
            camera.projection_matrix(self.window_size) * camera.view_matrix(&camera_to_world);

        device.set_viewport(self.window_size);
        if let Some(postprocess) = self.postprocess.as_ref().filter(|p| p.active.is_some()) {
            device.bind_framebuffer(Some(postprocess.target.framebuffer));
        }
        device.clear([0.0, 0.0, 0.0, 1.0], 1.0);

        for command in &opaque {
            self.draw_command(command, world, device, &view_projection, camera_position, time);
        }

        // The aircraft would visually clip the boosted wide-angle view.
        if camera.fov_y < AIRCRAFT_HIDE_FOV {
            if let Some(command) = &aircraft_command {
                self.draw_command(command, world, device, &view_projection, camera_position, time);
            }
        }

        if let Some(sky) = &self.sky {
            sky.material.bind(device, time);
            let sky_model = Mat4::new_translation(&camera_position);
            // Forces NDC depth to the far plane while leaving X/Y intact,
            // so the sky passes the depth test behind all real geometry.
            #[rustfmt::skip]
            let always_behind = Mat4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
                0.0, 0.0, 0.0, 1.0,
            );
            let transform = always_behind * (view_projection * sky_model);
            device.set_uniform("transform", UniformValue::Mat4(transform));
            device.draw_mesh(sky.mesh.gpu);
        }

        for command in &transparent {
            self.draw_command(command, world, device, &view_projection, camera_position, time);
        }

        if let Some(postprocess) = self.postprocess.as_ref() {
            if let Some(active) = &postprocess.active {
                device.bind_framebuffer(None);
                if let Some(material) = postprocess.materials.get(active) {
                    material.bind(device, time);
                    device.draw_fullscreen_triangle();
                }
            }
        }

        if forbidden_access {
            if let Some(overlay) = &self.overlay {
                overlay.bind(device, time);
                device.draw_fullscreen_triangle();
            }
        }
    }

    fn draw_command(
        &self,
        command: &RenderCommand<'_>,
        world: &World,
        device: &mut dyn GraphicsDevice,
        view_projection: &Mat4,
        camera_position: Vec3,
        time: f32,
    ) {
        command.material.bind(device, time);
        if command.material.is_lit() {
            self.upload_lights(command, world, device, view_projection, camera_position);
        } else {
            let transform = view_projection * command.local_to_world;
            device.set_uniform("transform", UniformValue::Mat4(transform));
        }
        device.draw_mesh(command.mesh);
    }

    /// Upload the world's light array plus the matrices the lit shading
    /// path needs
    fn upload_lights(
        &self,
        command: &RenderCommand<'_>,
        world: &World,
        device: &mut dyn GraphicsDevice,
        view_projection: &Mat4,
        camera_position: Vec3,
    ) {
        device.set_uniform("light_count", UniformValue::Int(world.light_count() as i32));

        // We are in space; every sky band gets the same blackish gray.
        let space_gray = Vec3::new(0.3, 0.3, 0.3);
        device.set_uniform("sky.top", UniformValue::Vec3(space_gray));
        device.set_uniform("sky.horizon", UniformValue::Vec3(space_gray));
        device.set_uniform("sky.bottom", UniformValue::Vec3(space_gray));

        for (index, light_key) in world.lights().enumerate() {
            let Some(light) = world.component::<LightComponent>(light_key) else {
                continue;
            };
            let Some(owner) = world.entity(light_key) else {
                continue;
            };
            let prefix = format!("lights[{}]", index);
            device.set_uniform(
                &format!("{}.type", prefix),
                UniformValue::Int(light.shader_kind()),
            );
            device.set_uniform(&format!("{}.color", prefix), UniformValue::Vec3(light.color));
            device.set_uniform(
                &format!("{}.attenuation", prefix),
                UniformValue::Vec3(light.attenuation),
            );
            device.set_uniform(
                &format!("{}.cone_angles", prefix),
                UniformValue::Vec2(light.cone_angles),
            );
            device.set_uniform(
                &format!("{}.direction", prefix),
                UniformValue::Vec3(light.direction),
            );
            device.set_uniform(
                &format!("{}.position", prefix),
                UniformValue::Vec3(owner.transform.position),
            );
        }

        let normal_matrix = command
            .local_to_world
            .try_inverse()
            .unwrap_or_else(Mat4::identity)
            .transpose();
        device.set_uniform("M", UniformValue::Mat4(command.local_to_world));
        device.set_uniform("M_IT", UniformValue::Mat4(normal_matrix));
        device.set_uniform("VP", UniformValue::Mat4(*view_projection));
        device.set_uniform("camera_position", UniformValue::Vec3(camera_position));
    }

    /// Release every renderer-owned device resource
    pub fn destroy(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(sky) = self.sky.take() {
            device.destroy_mesh(sky.mesh.gpu);
            device.destroy_shader(sky.material.shader);
            if let MaterialKind::Textured(set) = sky.material.kind {
                device.destroy_texture(set.texture);
            }
        }
        if let Some(postprocess) = self.postprocess.take() {
            for material in postprocess.materials.values() {
                // The color texture belongs to the render target.
                device.destroy_shader(material.shader);
            }
            device.destroy_render_target(postprocess.target);
        }
        if let Some(overlay) = self.overlay.take() {
            device.destroy_shader(overlay.shader);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::{DeviceCall, HeadlessDevice, MeshId, ShaderId};
    use crate::render::pipeline::DepthFunction;

    fn flat_material(shader: u64, transparent: bool) -> Material {
        Material {
            pipeline: PipelineState::opaque(),
            shader: ShaderId(shader),
            transparent,
            tint: Vec4::new(1.0, 1.0, 1.0, 1.0),
            kind: MaterialKind::Tinted,
        }
    }

    fn register_mesh(cache: &mut AssetCache, name: &str, id: u64) {
        cache.insert(
            name,
            Mesh {
                gpu: MeshId(id),
                extremes: crate::render::mesh::MeshExtremes::from_vertices(&[]),
            },
        );
    }

    /// World with a camera at the origin and three transparent quads at
    /// known depths straight ahead.
    fn transparent_scene() -> (World, AssetCache) {
        let mut world = World::new();
        let camera = world.add();
        world.add_component(camera, CameraComponent::default());

        let mut cache = AssetCache::new();
        cache.insert("glass", flat_material(1, true));

        for (index, depth) in [5.0_f32, 1.0, 9.0].into_iter().enumerate() {
            let name = format!("quad{}", index);
            register_mesh(&mut cache, &name, 100 + index as u64);
            let entity = world.add();
            world.entity_mut(entity).unwrap().transform.position = Vec3::new(0.0, 0.0, -depth);
            world.add_component(entity, MeshRendererComponent::new(name, "glass"));
        }
        (world, cache)
    }

    fn drawn_meshes(device: &HeadlessDevice) -> Vec<MeshId> {
        device
            .calls()
            .iter()
            .filter_map(|call| match call {
                DeviceCall::DrawMesh(mesh) => Some(*mesh),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_transparent_commands_sort_back_to_front() {
        let (mut world, cache) = transparent_scene();
        let mut device = HeadlessDevice::new();
        let mut renderer = ForwardRenderer::new();
        renderer.initialize((800, 600), &RendererOptions::default(), &mut device);
        device.take_calls();

        renderer.render(
            &mut world,
            &cache,
            &mut device,
            false,
            &GameConfig::default(),
            0.0,
        );

        // Depths were 5, 1, 9 → the draw order is 9, 5, 1.
        assert_eq!(
            drawn_meshes(&device),
            vec![MeshId(102), MeshId(100), MeshId(101)]
        );
    }

    #[test]
    fn test_no_camera_renders_nothing() {
        let mut world = World::new();
        let entity = world.add();
        let mut cache = AssetCache::new();
        cache.insert("flat", flat_material(1, false));
        register_mesh(&mut cache, "cube", 7);
        world.add_component(entity, MeshRendererComponent::new("cube", "flat"));

        let mut device = HeadlessDevice::new();
        let mut renderer = ForwardRenderer::new();
        renderer.initialize((800, 600), &RendererOptions::default(), &mut device);
        device.take_calls();

        renderer.render(
            &mut world,
            &cache,
            &mut device,
            false,
            &GameConfig::default(),
            0.0,
        );
        assert!(drawn_meshes(&device).is_empty());
    }

    #[test]
    fn test_draw_sequence_ends_with_postprocess_then_overlay() {
        let mut options = RendererOptions::default();
        options.sky = Some("assets/textures/space.png".to_owned());
        options.postprocess.insert(
            "default".to_owned(),
            "assets/shaders/vignette.frag".to_owned(),
        );

        let (mut world, cache) = transparent_scene();
        let mut device = HeadlessDevice::new();
        let mut renderer = ForwardRenderer::new();
        renderer.initialize((800, 600), &options, &mut device);
        device.take_calls();

        renderer.render(
            &mut world,
            &cache,
            &mut device,
            true,
            &GameConfig::default(),
            0.0,
        );

        let calls = device.calls();
        // The offscreen framebuffer is bound before the first draw and the
        // default framebuffer restored for the postprocess pass.
        let bind_offscreen = calls
            .iter()
            .position(|call| matches!(call, DeviceCall::BindFramebuffer(Some(_))))
            .unwrap();
        let bind_default = calls
            .iter()
            .position(|call| matches!(call, DeviceCall::BindFramebuffer(None)))
            .unwrap();
        let first_draw = calls
            .iter()
            .position(|call| matches!(call, DeviceCall::DrawMesh(_)))
            .unwrap();
        assert!(bind_offscreen < first_draw);
        assert!(first_draw < bind_default);

        // Postprocess triangle, then the forbidden overlay triangle.
        let triangles: Vec<usize> = calls
            .iter()
            .enumerate()
            .filter_map(|(index, call)| {
                matches!(call, DeviceCall::DrawFullscreenTriangle).then_some(index)
            })
            .collect();
        assert_eq!(triangles.len(), 2);
        assert!(bind_default < triangles[0]);
    }

    #[test]
    fn test_sky_draws_between_opaque_and_transparent() {
        let mut options = RendererOptions::default();
        options.sky = Some("assets/textures/space.png".to_owned());

        let mut world = World::new();
        let camera = world.add();
        world.add_component(camera, CameraComponent::default());

        let mut cache = AssetCache::new();
        cache.insert("solid", flat_material(1, false));
        cache.insert("glass", flat_material(2, true));
        register_mesh(&mut cache, "rock", 50);
        register_mesh(&mut cache, "window", 60);

        let rock = world.add();
        world.entity_mut(rock).unwrap().transform.position = Vec3::new(0.0, 0.0, -5.0);
        world.add_component(rock, MeshRendererComponent::new("rock", "solid"));
        let window = world.add();
        world.entity_mut(window).unwrap().transform.position = Vec3::new(0.0, 0.0, -3.0);
        world.add_component(window, MeshRendererComponent::new("window", "glass"));

        let mut device = HeadlessDevice::new();
        let mut renderer = ForwardRenderer::new();
        renderer.initialize((800, 600), &options, &mut device);
        device.take_calls();

        renderer.render(
            &mut world,
            &cache,
            &mut device,
            false,
            &GameConfig::default(),
            0.0,
        );

        let drawn = drawn_meshes(&device);
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[0], MeshId(50));
        assert_eq!(drawn[2], MeshId(60));

        // The sky pass applies its dedicated pipeline state.
        let sky_state = device.calls().iter().any(|call| {
            matches!(
                call,
                DeviceCall::ApplyPipelineState(state)
                    if state.depth_test == Some(DepthFunction::LessOrEqual)
            )
        });
        assert!(sky_state);
    }

    #[test]
    fn test_incomplete_render_target_degrades_postprocessing() {
        let mut options = RendererOptions::default();
        options.postprocess.insert(
            "default".to_owned(),
            "assets/shaders/vignette.frag".to_owned(),
        );

        let mut device = HeadlessDevice::new();
        device.fail_render_targets = true;
        let mut renderer = ForwardRenderer::new();
        renderer.initialize((800, 600), &options, &mut device);

        assert!(renderer.active_effect().is_none());

        // Rendering still works, just without the offscreen pass.
        let (mut world, cache) = transparent_scene();
        device.take_calls();
        renderer.render(
            &mut world,
            &cache,
            &mut device,
            false,
            &GameConfig::default(),
            0.0,
        );
        assert_eq!(drawn_meshes(&device).len(), 3);
        assert!(!device
            .calls()
            .iter()
            .any(|call| matches!(call, DeviceCall::BindFramebuffer(Some(_)))));
    }

    #[test]
    fn test_aircraft_is_slaved_and_hidden_while_boosted() {
        let mut world = World::new();
        let camera = world.add();
        world.entity_mut(camera).unwrap().transform.position = Vec3::new(1.0, 5.0, -4.0);
        world.add_component(camera, CameraComponent::default());

        let aircraft = world.add_kind(crate::ecs::EntityKind::MainAircraft);
        let mut cache = AssetCache::new();
        cache.insert("metal", flat_material(3, false));
        register_mesh(&mut cache, "ship", 77);
        world.add_component(aircraft, MeshRendererComponent::new("ship", "metal"));

        let config = GameConfig::default();
        let mut device = HeadlessDevice::new();
        let mut renderer = ForwardRenderer::new();
        renderer.initialize((800, 600), &RendererOptions::default(), &mut device);
        device.take_calls();

        renderer.render(&mut world, &cache, &mut device, false, &config, 0.0);
        assert_eq!(drawn_meshes(&device), vec![MeshId(77)]);

        let expected = Vec3::new(1.0, 5.0, -4.0) + config.hyper_parameters.camera_aircraft_offset;
        approx::assert_relative_eq!(
            world.entity(aircraft).unwrap().transform.position,
            expected,
            epsilon = 1e-5
        );

        // Boosted field of view suppresses the aircraft draw.
        world.component_mut::<CameraComponent>(camera).unwrap().fov_y = 3.0;
        device.take_calls();
        renderer.render(&mut world, &cache, &mut device, false, &config, 0.0);
        assert!(drawn_meshes(&device).is_empty());
    }

    #[test]
    fn test_set_active_effect_swaps_and_restores() {
        let mut options = RendererOptions::default();
        options.postprocess.insert(
            "default".to_owned(),
            "assets/shaders/vignette.frag".to_owned(),
        );
        options.postprocess.insert(
            "speedup".to_owned(),
            "assets/shaders/speed-lines.frag".to_owned(),
        );

        let mut device = HeadlessDevice::new();
        let mut renderer = ForwardRenderer::new();
        renderer.initialize((800, 600), &options, &mut device);

        assert_eq!(renderer.active_effect(), Some("default"));
        renderer.set_active_effect(Some("speedup"));
        assert_eq!(renderer.active_effect(), Some("speedup"));
        renderer.set_active_effect(Some("does-not-exist"));
        assert_eq!(renderer.active_effect(), Some("speedup"));
        renderer.set_active_effect(Some("default"));
        assert_eq!(renderer.active_effect(), Some("default"));
    }
}

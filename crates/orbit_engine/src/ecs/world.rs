//! ECS World implementation
//!
//! The world owns every live entity of a gameplay session and keeps three
//! derived indices consistent with entity membership: the set of entities
//! carrying lights (consumed by the renderer's light array upload), the
//! set of collectable space artifacts (consumed by the collision system
//! and the win condition), and the world-space track bounds (consumed by
//! movement restriction and artifact placement).
//!
//! Entities are never freed immediately. Removal is a two-phase protocol:
//! `mark_for_removal` pulls the entity out of the live set and every
//! derived index, and `delete_marked_entities` frees the arena slots once
//! no system can still hold a key obtained earlier in the frame.

use super::component::{Component, ComponentStore};
use super::components::{LightComponent, MultiMeshRendererComponent};
use super::entity::{Entity, EntityKey, EntityKind};
use crate::assets::AssetCache;
use crate::core::config::{ComponentConfig, EntityConfig};
use crate::foundation::math::{Mat4, Point3, Transform, Vec3};
use crate::render::mesh::MultiMesh;
use slotmap::SlotMap;
use std::any::TypeId;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while building a world from scene configuration
///
/// All of these abort scene construction: a partially built scene corrupts
/// everything downstream, so missing assets are fatal rather than skipped.
#[derive(Error, Debug)]
pub enum SceneError {
    /// A mesh renderer referenced a mesh name the asset cache does not hold
    #[error("entity '{entity}' references unknown mesh '{name}'")]
    UnknownMesh {
        /// Offending entity name
        entity: String,
        /// The missing mesh name
        name: String,
    },

    /// A renderer referenced a multi-mesh name the asset cache does not hold
    #[error("entity '{entity}' references unknown multi-mesh '{name}'")]
    UnknownMultiMesh {
        /// Offending entity name
        entity: String,
        /// The missing bundle name
        name: String,
    },

    /// A renderer referenced a material name the asset cache does not hold
    #[error("entity '{entity}' references unknown material '{name}'")]
    UnknownMaterial {
        /// Offending entity name
        entity: String,
        /// The missing material name
        name: String,
    },

    /// A multi-mesh renderer's material list does not pair 1:1 with its sub-meshes
    #[error("entity '{entity}' has {meshes} sub-meshes but {materials} materials")]
    MaterialCountMismatch {
        /// Offending entity name
        entity: String,
        /// Number of sub-meshes in the bundle
        meshes: usize,
        /// Number of materials supplied
        materials: usize,
    },
}

/// World-space extents of the race track
///
/// Computed once after the track entity is loaded; the single source of
/// truth for axis restriction and artifact placement.
#[derive(Debug, Clone)]
pub struct TrackBounds {
    /// World-space point of the leftmost track vertex
    pub far_left: Vec3,

    /// World-space point of the rightmost track vertex
    pub far_right: Vec3,

    /// Most negative world-space Z reached by the track (the finish end)
    pub z_furthest: f32,

    /// Least negative world-space Z reached by the track (the start end)
    pub z_nearest: f32,

    /// Track length along Z in world units
    pub length: f32,
}

impl Default for TrackBounds {
    fn default() -> Self {
        Self {
            far_left: Vec3::new(f32::MAX, 0.0, 0.0),
            far_right: Vec3::new(f32::MIN, 0.0, 0.0),
            z_furthest: f32::MAX,
            z_nearest: f32::MIN,
            length: 1.0,
        }
    }
}

/// The owning container of all live entities for one gameplay session
#[derive(Default)]
pub struct World {
    entities: SlotMap<EntityKey, Entity>,
    components: ComponentStore,
    marked_for_removal: HashSet<EntityKey>,
    lights: HashSet<EntityKey>,
    artifacts: HashSet<EntityKey>,
    aircraft: Option<EntityKey>,
    track: TrackBounds,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity and return its key
    pub fn add(&mut self) -> EntityKey {
        self.entities.insert(Entity::default())
    }

    /// Allocate a new entity with the given kind
    pub fn add_kind(&mut self, kind: EntityKind) -> EntityKey {
        let key = self.entities.insert(Entity::with_kind(kind));
        if kind == EntityKind::MainAircraft {
            self.aircraft = Some(key);
        }
        key
    }

    /// Whether the key addresses a live (not marked, not freed) entity
    pub fn is_live(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key) && !self.marked_for_removal.contains(&key)
    }

    /// Whether the key's arena slot is still allocated
    ///
    /// True for marked-but-not-yet-deleted entities, which keeps keys held
    /// by systems earlier in the frame valid until the deletion point.
    pub fn is_allocated(&self, key: EntityKey) -> bool {
        self.entities.contains_key(key)
    }

    /// Borrow a live entity
    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        if self.marked_for_removal.contains(&key) {
            return None;
        }
        self.entities.get(key)
    }

    /// Mutably borrow a live entity
    pub fn entity_mut(&mut self, key: EntityKey) -> Option<&mut Entity> {
        if self.marked_for_removal.contains(&key) {
            return None;
        }
        self.entities.get_mut(key)
    }

    /// Iterate over all live entities
    pub fn iter_live(&self) -> impl Iterator<Item = (EntityKey, &Entity)> {
        self.entities
            .iter()
            .filter(move |(key, _)| !self.marked_for_removal.contains(key))
    }

    /// Number of live entities
    pub fn live_count(&self) -> usize {
        self.entities.len() - self.marked_for_removal.len()
    }

    /// Attach a component to a live entity, replacing any existing one
    pub fn add_component<T: Component>(&mut self, key: EntityKey, component: T) {
        if !self.is_live(key) {
            return;
        }
        self.components.insert(key, component);
        if TypeId::of::<T>() == TypeId::of::<LightComponent>() {
            self.lights.insert(key);
        }
    }

    /// Borrow a component of a live entity
    pub fn component<T: Component>(&self, key: EntityKey) -> Option<&T> {
        if self.marked_for_removal.contains(&key) {
            return None;
        }
        self.components.get(key)
    }

    /// Mutably borrow a component of a live entity
    pub fn component_mut<T: Component>(&mut self, key: EntityKey) -> Option<&mut T> {
        if self.marked_for_removal.contains(&key) {
            return None;
        }
        self.components.get_mut(key)
    }

    /// Find the first live entity carrying a component of the given type
    pub fn first_with<T: Component>(&self) -> Option<EntityKey> {
        self.iter_live()
            .map(|(key, _)| key)
            .find(|&key| self.components.get::<T>(key).is_some())
    }

    /// Mark an entity for removal at the end of the frame
    ///
    /// No-op if the entity is not live. The entity leaves the live set and
    /// every derived index immediately, but its arena slot is only freed by
    /// [`World::delete_marked_entities`].
    pub fn mark_for_removal(&mut self, key: EntityKey) {
        if !self.is_live(key) {
            return;
        }
        self.lights.remove(&key);
        self.artifacts.remove(&key);
        if self.aircraft == Some(key) {
            self.aircraft = None;
        }
        self.marked_for_removal.insert(key);
    }

    /// Free every entity marked for removal
    ///
    /// Must run once per frame after all systems are done reading entity
    /// keys for that frame: freeing earlier would invalidate keys other
    /// systems still hold. Calling it again with nothing newly marked is a
    /// no-op.
    pub fn delete_marked_entities(&mut self) {
        for key in std::mem::take(&mut self.marked_for_removal) {
            self.components.remove_all(key);
            self.entities.remove(key);
        }
    }

    /// Delete every live and pending entity and empty all indices
    pub fn clear(&mut self) {
        self.delete_marked_entities();
        self.entities.clear();
        self.components.clear();
        self.lights.clear();
        self.artifacts.clear();
        self.aircraft = None;
        self.track = TrackBounds::default();
    }

    /// Keys of entities carrying a light component
    pub fn lights(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.lights.iter().copied()
    }

    /// Number of lights in the world
    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Record an entity as a collectable space artifact
    pub fn register_artifact(&mut self, key: EntityKey) {
        if self.is_live(key) {
            self.artifacts.insert(key);
        }
    }

    /// Whether the entity is currently in the artifact index
    pub fn is_artifact(&self, key: EntityKey) -> bool {
        self.artifacts.contains(&key)
    }

    /// Number of collectable artifacts still in the world
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// The main aircraft entity, if one exists
    pub fn aircraft(&self) -> Option<EntityKey> {
        self.aircraft
    }

    /// World-space track bounds
    pub fn track(&self) -> &TrackBounds {
        &self.track
    }

    /// Record the configured track length
    pub fn set_track_length(&mut self, length: f32) {
        self.track.length = length;
    }

    /// Replace the track bounds wholesale
    ///
    /// For callers that compute bounds without track geometry, such as
    /// synthetic scenes in tests and tools.
    pub fn set_track_bounds(&mut self, bounds: TrackBounds) {
        self.track = bounds;
    }

    /// Transformation matrix from the entity's local space to world space
    ///
    /// Folds the chain of ancestor transforms by left-multiplying each
    /// ancestor's local matrix. Recomputed on every call since parents
    /// mutate every frame. Marked entities still resolve so keys obtained
    /// earlier in the frame keep working until the deletion point.
    pub fn local_to_world_matrix(&self, key: EntityKey) -> Mat4 {
        let Some(entity) = self.entities.get(key) else {
            return Mat4::identity();
        };
        let mut matrix = entity.transform.to_matrix();
        let mut ancestor = entity.parent;
        while let Some(parent_key) = ancestor {
            let Some(parent) = self.entities.get(parent_key) else {
                break;
            };
            matrix = parent.transform.to_matrix() * matrix;
            ancestor = parent.parent;
        }
        matrix
    }

    /// Transformation matrix of the entity's parent chain, excluding the
    /// entity's own local transform
    ///
    /// Lets callers ask where a candidate local position would land in
    /// world space without mutating the entity.
    pub fn parent_matrix(&self, key: EntityKey) -> Mat4 {
        self.entities
            .get(key)
            .and_then(|entity| entity.parent)
            .map_or_else(Mat4::identity, |parent| self.local_to_world_matrix(parent))
    }

    /// Compute the track bounds from the track entity's sub-mesh extremes
    ///
    /// Locates the entity tagged as the track, transforms each sub-mesh's
    /// cached extreme points into world space through the entity's
    /// local-to-world matrix and takes the running min/max. Logs and leaves
    /// the bounds untouched when no track exists.
    pub fn compute_track_bounds(&mut self, cache: &AssetCache) {
        let Some((key, renderer)) = self.iter_live().find_map(|(key, entity)| {
            (entity.kind == EntityKind::Track)
                .then(|| self.component::<MultiMeshRendererComponent>(key).map(|r| (key, r)))
                .flatten()
        }) else {
            log::warn!("no track entity found; track bounds not computed");
            return;
        };

        let Some(bundle) = cache.get::<MultiMesh>(&renderer.meshes) else {
            log::warn!("track bundle '{}' missing from asset cache", renderer.meshes);
            return;
        };

        let local_to_world = self.local_to_world_matrix(key);
        let mut bounds = TrackBounds {
            length: self.track.length,
            ..TrackBounds::default()
        };
        for mesh in &bundle.meshes {
            let extremes = &mesh.extremes;
            let far_left = local_to_world.transform_point(&Point3::from(extremes.far_left));
            let far_right = local_to_world.transform_point(&Point3::from(extremes.far_right));
            let z_furthest = local_to_world.transform_point(&Point3::from(extremes.z_furthest));
            let z_nearest = local_to_world.transform_point(&Point3::from(extremes.z_nearest));

            if far_left.x < bounds.far_left.x {
                bounds.far_left = far_left.coords;
            }
            if far_right.x > bounds.far_right.x {
                bounds.far_right = far_right.coords;
            }
            if z_furthest.z < bounds.z_furthest {
                bounds.z_furthest = z_furthest.z;
            }
            if z_nearest.z > bounds.z_nearest {
                bounds.z_nearest = z_nearest.z;
            }
        }
        self.track = bounds;
    }

    /// Build entities from scene configuration
    ///
    /// Children are created recursively with the new entity as their
    /// parent. Asset references are resolved against the cache up front;
    /// any missing name or multi-mesh material count mismatch aborts the
    /// whole load.
    pub fn deserialize(
        &mut self,
        entities: &[EntityConfig],
        parent: Option<EntityKey>,
        cache: &AssetCache,
    ) -> Result<(), SceneError> {
        for config in entities {
            let key = self.add_kind(config.kind);
            if let Some(entity) = self.entity_mut(key) {
                entity.name = config.name.clone();
                entity.parent = parent;
                entity.transform = Transform {
                    position: config.position,
                    rotation: config.rotation.map(f32::to_radians),
                    scale: config.scale,
                };
            }

            for component in &config.components {
                self.attach_from_config(key, &config.name, component, cache)?;
            }

            self.deserialize(&config.children, Some(key), cache)?;
        }
        Ok(())
    }

    fn attach_from_config(
        &mut self,
        key: EntityKey,
        entity_name: &str,
        config: &ComponentConfig,
        cache: &AssetCache,
    ) -> Result<(), SceneError> {
        use crate::render::material::Material;
        use crate::render::mesh::Mesh;

        match config {
            ComponentConfig::Camera(camera) => self.add_component(key, camera.to_component()),
            ComponentConfig::Light(light) => self.add_component(key, light.to_component()),
            ComponentConfig::Movement(movement) => self.add_component(key, movement.clone()),
            ComponentConfig::FreeCameraController(controller) => {
                self.add_component(key, controller.clone());
            }
            ComponentConfig::MeshRenderer(renderer) => {
                if cache.get::<Mesh>(&renderer.mesh).is_none() {
                    return Err(SceneError::UnknownMesh {
                        entity: entity_name.to_owned(),
                        name: renderer.mesh.clone(),
                    });
                }
                if cache.get::<Material>(&renderer.material).is_none() {
                    return Err(SceneError::UnknownMaterial {
                        entity: entity_name.to_owned(),
                        name: renderer.material.clone(),
                    });
                }
                self.add_component(key, renderer.clone());
            }
            ComponentConfig::MultiMeshRenderer(renderer) => {
                let Some(bundle) = cache.get::<MultiMesh>(&renderer.meshes) else {
                    return Err(SceneError::UnknownMultiMesh {
                        entity: entity_name.to_owned(),
                        name: renderer.meshes.clone(),
                    });
                };
                if bundle.meshes.len() != renderer.materials.len() {
                    return Err(SceneError::MaterialCountMismatch {
                        entity: entity_name.to_owned(),
                        meshes: bundle.meshes.len(),
                        materials: renderer.materials.len(),
                    });
                }
                for material in &renderer.materials {
                    if cache.get::<Material>(material).is_none() {
                        return Err(SceneError::UnknownMaterial {
                            entity: entity_name.to_owned(),
                            name: material.clone(),
                        });
                    }
                }
                self.add_component(key, renderer.clone());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{CameraComponent, MovementComponent};
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_and_query() {
        let mut world = World::new();
        let entity = world.add();

        assert!(world.is_live(entity));
        world.add_component(entity, CameraComponent::default());
        assert!(world.component::<CameraComponent>(entity).is_some());
        assert!(world.component::<MovementComponent>(entity).is_none());
    }

    #[test]
    fn test_mark_removes_from_live_set_but_keeps_allocation() {
        let mut world = World::new();
        let entity = world.add();
        world.add_component(entity, LightComponent::default());
        world.register_artifact(entity);

        world.mark_for_removal(entity);

        assert!(!world.is_live(entity));
        assert!(world.entity(entity).is_none());
        assert_eq!(world.light_count(), 0);
        assert_eq!(world.artifact_count(), 0);
        assert!(!world.is_artifact(entity));
        // The slot is still allocated until the deletion point.
        assert!(world.is_allocated(entity));

        world.delete_marked_entities();
        assert!(!world.is_allocated(entity));
    }

    #[test]
    fn test_mark_is_noop_for_dead_entities() {
        let mut world = World::new();
        let entity = world.add();
        world.mark_for_removal(entity);
        world.delete_marked_entities();

        // Marking an already freed key changes nothing.
        world.mark_for_removal(entity);
        world.delete_marked_entities();
        assert_eq!(world.live_count(), 0);
    }

    #[test]
    fn test_delete_marked_is_idempotent() {
        let mut world = World::new();
        let entity = world.add();
        world.mark_for_removal(entity);

        world.delete_marked_entities();
        let count_after_first = world.live_count();
        world.delete_marked_entities();
        assert_eq!(world.live_count(), count_after_first);
    }

    #[test]
    fn test_live_iteration_skips_marked() {
        let mut world = World::new();
        let keep = world.add();
        let drop = world.add();
        world.mark_for_removal(drop);

        let live: Vec<EntityKey> = world.iter_live().map(|(key, _)| key).collect();
        assert_eq!(live, vec![keep]);
    }

    #[test]
    fn test_local_to_world_depth_zero_equals_local() {
        let mut world = World::new();
        let entity = world.add();
        world.entity_mut(entity).unwrap().transform.position = Vec3::new(1.0, 2.0, 3.0);

        let matrix = world.local_to_world_matrix(entity);
        let expected = world.entity(entity).unwrap().transform.to_matrix();
        assert_relative_eq!(matrix, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_local_to_world_folds_ancestor_chain() {
        let mut world = World::new();
        let root = world.add();
        let middle = world.add();
        let leaf = world.add();

        world.entity_mut(root).unwrap().transform.position = Vec3::new(10.0, 0.0, 0.0);
        {
            let entity = world.entity_mut(middle).unwrap();
            entity.parent = Some(root);
            entity.transform.position = Vec3::new(0.0, 5.0, 0.0);
        }
        {
            let entity = world.entity_mut(leaf).unwrap();
            entity.parent = Some(middle);
            entity.transform.position = Vec3::new(0.0, 0.0, -2.0);
        }

        let expected = world.entity(root).unwrap().transform.to_matrix()
            * world.entity(middle).unwrap().transform.to_matrix()
            * world.entity(leaf).unwrap().transform.to_matrix();
        assert_relative_eq!(world.local_to_world_matrix(leaf), expected, epsilon = 1e-6);

        let origin = world
            .local_to_world_matrix(leaf)
            .transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(10.0, 5.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut world = World::new();
        let a = world.add();
        let b = world.add();
        world.add_component(a, LightComponent::default());
        world.register_artifact(b);
        world.mark_for_removal(b);

        world.clear();

        assert_eq!(world.live_count(), 0);
        assert_eq!(world.light_count(), 0);
        assert_eq!(world.artifact_count(), 0);
        assert!(!world.is_allocated(a));
        assert!(!world.is_allocated(b));
    }

    #[test]
    fn test_track_bounds_from_sub_mesh_extremes() {
        use crate::render::backend::MeshId;
        use crate::render::mesh::{Mesh, MeshExtremes, MultiMesh, Vertex};

        // A flat strip spanning x in [-10, 10] and z in [0, 1].
        let vertices = [
            Vertex::new([-10.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0]),
            Vertex::new([10.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0]),
            Vertex::new([10.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0]),
            Vertex::new([-10.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0]),
        ];
        let mesh = Mesh {
            gpu: MeshId(1),
            extremes: MeshExtremes::from_vertices(&vertices),
        };
        let mut cache = AssetCache::new();
        cache.insert("track", MultiMesh { meshes: vec![mesh] });

        let mut world = World::new();
        let track = world.add_kind(EntityKind::Track);
        {
            let entity = world.entity_mut(track).unwrap();
            entity.transform.scale.z = 20.0;
            entity.transform.position.z = -50.0;
        }
        world.add_component(
            track,
            MultiMeshRendererComponent::new("track", vec!["surface".to_owned()]),
        );
        world.set_track_length(20.0);

        world.compute_track_bounds(&cache);

        let bounds = world.track();
        assert_relative_eq!(bounds.far_left.x, -10.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.far_right.x, 10.0, epsilon = 1e-5);
        // Object-space z [0, 1] scaled by 20 and pushed to -50.
        assert_relative_eq!(bounds.z_furthest, -50.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.z_nearest, -30.0, epsilon = 1e-4);
        assert_relative_eq!(bounds.length, 20.0, epsilon = 1e-6);
    }

    #[test]
    fn test_scene_multi_mesh_material_mismatch_is_fatal() {
        use crate::core::config::{ComponentConfig, EntityConfig};
        use crate::render::backend::MeshId;
        use crate::render::mesh::{Mesh, MeshExtremes, MultiMesh};

        let sub_mesh = || Mesh {
            gpu: MeshId(1),
            extremes: MeshExtremes::from_vertices(&[]),
        };
        let mut cache = AssetCache::new();
        cache.insert(
            "track",
            MultiMesh {
                meshes: vec![sub_mesh(), sub_mesh()],
            },
        );

        let config = EntityConfig {
            name: "track".to_owned(),
            kind: EntityKind::Track,
            components: vec![ComponentConfig::MultiMeshRenderer(
                MultiMeshRendererComponent::new("track", vec!["surface".to_owned()]),
            )],
            ..EntityConfig::default()
        };

        let mut world = World::new();
        let result = world.deserialize(&[config], None, &cache);
        assert!(matches!(
            result,
            Err(SceneError::MaterialCountMismatch { meshes: 2, materials: 1, .. })
        ));
    }

    #[test]
    fn test_aircraft_tracked_by_kind() {
        let mut world = World::new();
        let aircraft = world.add_kind(EntityKind::MainAircraft);
        assert_eq!(world.aircraft(), Some(aircraft));

        world.mark_for_removal(aircraft);
        assert_eq!(world.aircraft(), None);
    }
}

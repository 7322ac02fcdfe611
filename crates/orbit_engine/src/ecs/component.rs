//! Per-type component storage
//!
//! Components are stored in dense per-type maps keyed by entity handle
//! instead of being boxed inside the entities themselves. An entity carries
//! at most one component of each type; adding a second one replaces the
//! first, and querying an absent component yields `None`.

use super::components::{
    CameraComponent, FreeCameraControllerComponent, LightComponent, MeshRendererComponent,
    MovementComponent, MultiMeshRendererComponent,
};
use super::entity::EntityKey;
use slotmap::SecondaryMap;

/// Marker trait tying a component type to its storage inside a world
///
/// Implemented for every concrete component via the `impl_component!`
/// macro below, which projects the matching `SecondaryMap` out of the
/// [`ComponentStore`].
pub trait Component: Sized + 'static {
    /// Borrow the per-type storage for this component
    fn storage(store: &ComponentStore) -> &SecondaryMap<EntityKey, Self>;

    /// Mutably borrow the per-type storage for this component
    fn storage_mut(store: &mut ComponentStore) -> &mut SecondaryMap<EntityKey, Self>;
}

/// Dense storage for every component type the engine knows about
#[derive(Default)]
pub struct ComponentStore {
    cameras: SecondaryMap<EntityKey, CameraComponent>,
    lights: SecondaryMap<EntityKey, LightComponent>,
    mesh_renderers: SecondaryMap<EntityKey, MeshRendererComponent>,
    multi_mesh_renderers: SecondaryMap<EntityKey, MultiMeshRendererComponent>,
    movements: SecondaryMap<EntityKey, MovementComponent>,
    controllers: SecondaryMap<EntityKey, FreeCameraControllerComponent>,
}

impl ComponentStore {
    /// Attach a component, replacing any previous one of the same type
    pub fn insert<T: Component>(&mut self, entity: EntityKey, component: T) {
        T::storage_mut(self).insert(entity, component);
    }

    /// Get a component of the given type, if the entity carries one
    pub fn get<T: Component>(&self, entity: EntityKey) -> Option<&T> {
        T::storage(self).get(entity)
    }

    /// Get a mutable component of the given type, if the entity carries one
    pub fn get_mut<T: Component>(&mut self, entity: EntityKey) -> Option<&mut T> {
        T::storage_mut(self).get_mut(entity)
    }

    /// Detach a component of the given type from an entity
    pub fn remove<T: Component>(&mut self, entity: EntityKey) -> Option<T> {
        T::storage_mut(self).remove(entity)
    }

    /// Drop every component attached to the entity
    ///
    /// Called when an entity slot is finally freed so no stale data
    /// survives a slot reuse.
    pub fn remove_all(&mut self, entity: EntityKey) {
        self.cameras.remove(entity);
        self.lights.remove(entity);
        self.mesh_renderers.remove(entity);
        self.multi_mesh_renderers.remove(entity);
        self.movements.remove(entity);
        self.controllers.remove(entity);
    }

    /// Drop every component in the store
    pub fn clear(&mut self) {
        self.cameras.clear();
        self.lights.clear();
        self.mesh_renderers.clear();
        self.multi_mesh_renderers.clear();
        self.movements.clear();
        self.controllers.clear();
    }
}

macro_rules! impl_component {
    ($component:ty, $field:ident) => {
        impl Component for $component {
            fn storage(store: &ComponentStore) -> &SecondaryMap<EntityKey, Self> {
                &store.$field
            }

            fn storage_mut(store: &mut ComponentStore) -> &mut SecondaryMap<EntityKey, Self> {
                &mut store.$field
            }
        }
    };
}

impl_component!(CameraComponent, cameras);
impl_component!(LightComponent, lights);
impl_component!(MeshRendererComponent, mesh_renderers);
impl_component!(MultiMeshRendererComponent, multi_mesh_renderers);
impl_component!(MovementComponent, movements);
impl_component!(FreeCameraControllerComponent, controllers);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use slotmap::SlotMap;

    fn test_key() -> EntityKey {
        let mut arena: SlotMap<EntityKey, ()> = SlotMap::with_key();
        arena.insert(())
    }

    #[test]
    fn test_insert_replaces_existing_component() {
        let entity = test_key();
        let mut store = ComponentStore::default();

        store.insert(entity, MovementComponent::with_linear(Vec3::new(1.0, 0.0, 0.0)));
        store.insert(entity, MovementComponent::with_linear(Vec3::new(0.0, 2.0, 0.0)));

        let movement = store.get::<MovementComponent>(entity).unwrap();
        assert_eq!(movement.linear_velocity, Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_absent_component_is_none() {
        let entity = test_key();
        let store = ComponentStore::default();
        assert!(store.get::<CameraComponent>(entity).is_none());
    }

    #[test]
    fn test_remove_all_detaches_every_type() {
        let entity = test_key();
        let mut store = ComponentStore::default();

        store.insert(entity, CameraComponent::default());
        store.insert(entity, MovementComponent::default());
        store.remove_all(entity);

        assert!(store.get::<CameraComponent>(entity).is_none());
        assert!(store.get::<MovementComponent>(entity).is_none());
    }
}

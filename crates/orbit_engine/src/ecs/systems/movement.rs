//! Movement system
//!
//! Integrates every entity's constant linear and angular velocity into its
//! transform once per frame. Stateless and order-independent: no entity's
//! movement depends on another's within the same tick.

use crate::ecs::components::MovementComponent;
use crate::ecs::world::World;
use crate::ecs::EntityKey;

/// Integrates [`MovementComponent`] velocities into transforms
pub struct MovementSystem;

impl MovementSystem {
    /// Advance every moving entity by one frame
    pub fn update(world: &mut World, delta_time: f32) {
        let moving: Vec<(EntityKey, MovementComponent)> = world
            .iter_live()
            .filter_map(|(key, _)| {
                world
                    .component::<MovementComponent>(key)
                    .map(|movement| (key, movement.clone()))
            })
            .collect();

        for (key, movement) in moving {
            if let Some(entity) = world.entity_mut(key) {
                entity.transform.position += movement.linear_velocity * delta_time;
                entity.transform.rotation += movement.angular_velocity * delta_time;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_velocity_advances_position() {
        let mut world = World::new();
        let entity = world.add();
        world.add_component(
            entity,
            MovementComponent::with_linear(Vec3::new(2.0, 0.0, -4.0)),
        );

        MovementSystem::update(&mut world, 0.5);

        let position = world.entity(entity).unwrap().transform.position;
        assert_relative_eq!(position, Vec3::new(1.0, 0.0, -2.0), epsilon = 1e-6);
    }

    #[test]
    fn test_angular_velocity_advances_rotation() {
        let mut world = World::new();
        let entity = world.add();
        world.add_component(
            entity,
            MovementComponent::with_angular(Vec3::new(0.0, 1.0, 0.0)),
        );

        MovementSystem::update(&mut world, 0.25);

        let rotation = world.entity(entity).unwrap().transform.rotation;
        assert_relative_eq!(rotation, Vec3::new(0.0, 0.25, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_entities_without_movement_are_untouched() {
        let mut world = World::new();
        let still = world.add();

        MovementSystem::update(&mut world, 1.0);

        let position = world.entity(still).unwrap().transform.position;
        assert_eq!(position, Vec3::zeros());
    }

    #[test]
    fn test_all_movers_advance_in_one_update() {
        let mut world = World::new();
        let a = world.add();
        let b = world.add();
        world.add_component(a, MovementComponent::with_linear(Vec3::new(1.0, 0.0, 0.0)));
        world.add_component(b, MovementComponent::with_linear(Vec3::new(0.0, 1.0, 0.0)));

        MovementSystem::update(&mut world, 1.0);

        assert_relative_eq!(
            world.entity(a).unwrap().transform.position,
            Vec3::new(1.0, 0.0, 0.0),
            epsilon = 1e-6
        );
        assert_relative_eq!(
            world.entity(b).unwrap().transform.position,
            Vec3::new(0.0, 1.0, 0.0),
            epsilon = 1e-6
        );
    }
}

//! Randomized content generation
//!
//! Every function threads an explicit random number generator so a race
//! can be reproduced from its seed: same seed, same artifact layout, same
//! environment.

use orbit_engine::core::config::HyperParameters;
use orbit_engine::ecs::components::{LightComponent, LightKind, MeshRendererComponent, MovementComponent};
use orbit_engine::prelude::*;
use rand::Rng;
use std::f32::consts::PI;

/// Fewest artifacts a race will ever have
pub const MIN_ARTIFACTS: usize = 40;

/// Most artifacts a race will ever have
pub const MAX_ARTIFACTS: usize = 100;

/// Height above the track at which artifacts float
const ARTIFACT_HEIGHT: f32 = 5.0;

/// Artifacts may spawn slightly behind the start line
const ARTIFACT_Z_MARGIN: f32 = 5.0;

/// Material of the speed collectable
const SPEED_COLLECTABLE_MATERIAL: &str = "green_metal";

/// Minimum spacing between celestial orbs
const ORB_MIN_DISTANCE: f32 = 70.0;

/// Placement attempts before accepting a crowded spot
const PLACEMENT_ATTEMPTS: usize = 32;

/// Scatter collectable artifacts along the track
///
/// The count comes from the density hyper-parameter and the track length,
/// clamped into the supported range. Returns the number spawned.
pub fn spawn_artifacts(world: &mut World, rng: &mut impl Rng, hyper: &HyperParameters) -> usize {
    let track = world.track().clone();
    let count = ((track.length * hyper.collectable_density) as usize)
        .clamp(MIN_ARTIFACTS, MAX_ARTIFACTS);
    log::info!("spawning {} artifacts", count);

    for _ in 0..count {
        let key = world.add_kind(EntityKind::CollectableCoin);
        let x = rng.gen_range(track.far_left.x..=track.far_right.x);
        let z = rng.gen_range(track.z_furthest..=ARTIFACT_Z_MARGIN);
        if let Some(entity) = world.entity_mut(key) {
            entity.transform.position = Vec3::new(x, ARTIFACT_HEIGHT, z);
        }
        world.add_component(
            key,
            MeshRendererComponent::new(&hyper.collectable_mesh, &hyper.collectable_material),
        );
        world.register_artifact(key);
    }
    count
}

/// Spawn the speed collectable with a coin-flip chance
///
/// Returns whether the pickup was placed this race.
pub fn spawn_speed_collectable(
    world: &mut World,
    rng: &mut impl Rng,
    hyper: &HyperParameters,
) -> bool {
    if !rng.gen_bool(0.5) {
        return false;
    }
    log::info!("a speed collectable is generated");

    let track = world.track().clone();
    let key = world.add_kind(EntityKind::SpeedCollectable);
    let x = rng.gen_range(track.far_left.x..=track.far_right.x);
    let z = rng.gen_range(track.z_furthest..=ARTIFACT_Z_MARGIN);
    if let Some(entity) = world.entity_mut(key) {
        entity.transform.position = Vec3::new(x, ARTIFACT_HEIGHT, z);
    }
    world.add_component(
        key,
        MeshRendererComponent::new(&hyper.collectable_mesh, SPEED_COLLECTABLE_MATERIAL),
    );
    true
}

/// Pick a position at least [`ORB_MIN_DISTANCE`] from every placed orb
fn place_orb(rng: &mut impl Rng, placed: &[Vec3], z_span: f32) -> Vec3 {
    let mut position = Vec3::zeros();
    for _ in 0..PLACEMENT_ATTEMPTS {
        let sign_x = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sign_y = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        position = Vec3::new(
            sign_x * rng.gen_range(0.0..240.0),
            sign_y * rng.gen_range(20.0..=150.0),
            -rng.gen_range(0.0..z_span),
        );
        let crowded = placed
            .iter()
            .any(|other| (position - other).norm() < ORB_MIN_DISTANCE);
        if !crowded {
            break;
        }
    }
    position
}

/// Populate space around the track with planets, moons and stars
///
/// Planets and moons are scenery obstacles; stars additionally carry point
/// lights for the lit shading path. Everything spins slowly.
pub fn spawn_environment(world: &mut World, rng: &mut impl Rng) {
    let mut placed: Vec<Vec3> = Vec::new();
    let planet_materials = ["planet_1", "planet_2"];

    let planet_count = rng.gen_range(50..=90);
    log::info!("spawning {} planets", planet_count);
    for _ in 0..planet_count {
        let scale = rng.gen_range(2.0..=5.0);
        let position = place_orb(rng, &placed, 200.0);
        placed.push(position);

        let planet = world.add_kind(EntityKind::CelestialOrb);
        if let Some(entity) = world.entity_mut(planet) {
            entity.transform.position = position;
            entity.transform.scale = Vec3::new(scale, scale, scale);
        }
        let material = planet_materials[rng.gen_range(0..planet_materials.len())];
        world.add_component(planet, MeshRendererComponent::new("sphere", material));
        world.add_component(
            planet,
            MovementComponent::with_angular(Vec3::new(
                0.0,
                rng.gen_range(0.0..120.0) / 180.0 * PI,
                0.0,
            )),
        );

        // Every third planet or so gets a moon close by.
        if rng.gen_range(0..3) > 1 {
            let moon = world.add_kind(EntityKind::CelestialOrb);
            let moon_position = position + Vec3::new(scale * 2.5, scale * 2.5, scale * 2.5);
            if let Some(entity) = world.entity_mut(moon) {
                entity.transform.position = moon_position;
                entity.transform.scale = Vec3::new(scale / 4.0, scale / 4.0, scale / 4.0);
            }
            world.add_component(moon, MeshRendererComponent::new("sphere", "moon"));
            placed.push(moon_position);
        }
    }

    let star_count = rng.gen_range(5..=10);
    log::info!("spawning {} stars", star_count);
    for _ in 0..star_count {
        let position = place_orb(rng, &placed, 500.0);
        placed.push(position);
        let scale = rng.gen_range(4.0..=7.0);

        let star = world.add_kind(EntityKind::CelestialOrb);
        if let Some(entity) = world.entity_mut(star) {
            entity.transform.position = position;
            entity.transform.scale = Vec3::new(scale, scale, scale);
        }
        world.add_component(star, MeshRendererComponent::new("sphere", "star"));
        world.add_component(
            star,
            LightComponent {
                kind: LightKind::Point,
                color: Vec3::new(1.0, 1.0, 1.0),
                attenuation: Vec3::new(0.0, 0.0, 1.0),
                ..LightComponent::default()
            },
        );
        world.add_component(
            star,
            MovementComponent::with_angular(Vec3::new(
                0.0,
                rng.gen_range(0.0..60.0) / 180.0 * PI,
                0.0,
            )),
        );
    }
}

/// Altitude band rival aircraft drift in
///
/// Must stay above the player's cruising height by more than the aircraft
/// collision threshold.
const RIVAL_ALTITUDE: std::ops::RangeInclusive<f32> = 9.0..=11.0;

/// Spawn rival aircraft drifting along the track
pub fn spawn_rival_aircraft(world: &mut World, rng: &mut impl Rng) {
    let track = world.track().clone();
    let count = rng.gen_range(2..=4);
    log::info!("spawning {} rival aircraft", count);

    for _ in 0..count {
        let key = world.add_kind(EntityKind::OtherAircraft);
        let x = rng.gen_range(track.far_left.x..=track.far_right.x);
        let z = rng.gen_range(track.z_furthest..=0.0);
        if let Some(entity) = world.entity_mut(key) {
            entity.transform.position = Vec3::new(x, rng.gen_range(RIVAL_ALTITUDE), z);
        }
        world.add_component(key, MeshRendererComponent::new("aircraft", "metal"));
        world.add_component(
            key,
            MovementComponent::with_linear(Vec3::new(0.0, 0.0, rng.gen_range(-2.0..0.0))),
        );
    }
}

/// Create the finish line plane at the far end of the track
pub fn create_finish_line(world: &mut World) {
    let track = world.track().clone();
    let key = world.add_kind(EntityKind::FinishLine);
    if let Some(entity) = world.entity_mut(key) {
        entity.transform.position = Vec3::new(
            (track.far_left.x + track.far_right.x) / 2.0,
            20.0,
            track.z_furthest,
        );
        entity.transform.scale = Vec3::new(23.0, 20.0, 5.0);
    }
    world.add_component(key, MeshRendererComponent::new("plane", "portal"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_engine::ecs::world::TrackBounds;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn bounded_world() -> World {
        let mut world = World::new();
        world.set_track_bounds(TrackBounds {
            far_left: Vec3::new(-10.0, 0.0, 0.0),
            far_right: Vec3::new(10.0, 0.0, 0.0),
            z_furthest: -100.0,
            z_nearest: 0.0,
            length: 100.0,
        });
        world
    }

    #[test]
    fn test_artifact_count_follows_density() {
        let mut world = bounded_world();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let hyper = HyperParameters {
            collectable_density: 0.6,
            ..HyperParameters::default()
        };

        // Track length 100 at density 0.6 lands inside the clamp range.
        let count = spawn_artifacts(&mut world, &mut rng, &hyper);
        assert_eq!(count, 60);
        assert_eq!(world.artifact_count(), count);
    }

    #[test]
    fn test_sparse_density_clamps_to_minimum() {
        let mut world = bounded_world();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let hyper = HyperParameters {
            collectable_density: 0.01,
            ..HyperParameters::default()
        };

        let count = spawn_artifacts(&mut world, &mut rng, &hyper);
        assert_eq!(count, MIN_ARTIFACTS);
    }

    #[test]
    fn test_artifacts_spawn_inside_track_bounds() {
        let mut world = bounded_world();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        spawn_artifacts(&mut world, &mut rng, &HyperParameters::default());

        for (_, entity) in world.iter_live() {
            let position = entity.transform.position;
            assert!((-10.0..=10.0).contains(&position.x));
            assert!((-100.0..=ARTIFACT_Z_MARGIN).contains(&position.z));
        }
    }

    #[test]
    fn test_same_seed_reproduces_the_layout() {
        let layout = |seed: u64| -> Vec<Vec3> {
            let mut world = bounded_world();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            spawn_artifacts(&mut world, &mut rng, &HyperParameters::default());
            world
                .iter_live()
                .map(|(_, entity)| entity.transform.position)
                .collect()
        };

        assert_eq!(layout(42), layout(42));
    }

    #[test]
    fn test_environment_stars_carry_lights() {
        let mut world = bounded_world();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        spawn_environment(&mut world, &mut rng);
        assert!(world.light_count() >= 5);
    }

    #[test]
    fn test_finish_line_sits_at_the_far_end() {
        let mut world = bounded_world();
        create_finish_line(&mut world);

        let (_, finish) = world
            .iter_live()
            .find(|(_, entity)| entity.kind == EntityKind::FinishLine)
            .unwrap();
        assert_eq!(finish.transform.position.z, -100.0);
        assert_eq!(finish.transform.position.x, 0.0);
    }
}

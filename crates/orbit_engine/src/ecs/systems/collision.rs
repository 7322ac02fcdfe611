//! Collision detection system
//!
//! One scan over the live entities per frame, classifying each by kind:
//! coins are collected by proximity (or swept up while boosted), the speed
//! collectable arms the speed effect, and celestial orbs or rival aircraft
//! within their scale-weighted thresholds raise the forbidden-collision
//! flag. The scan always runs to completion; a forbidden collision never
//! aborts pickups found later in the same frame.
//!
//! Entities to remove are gathered during the scan and only marked after
//! it finishes; mutating the live set mid-iteration is forbidden. The
//! frame's single `delete_marked_entities` call happens here, at the end.

use crate::audio::AudioSink;
use crate::ecs::entity::{EntityKey, EntityKind};
use crate::ecs::world::World;
use crate::foundation::math::Vec3;

/// Distance within which a coin is collected
pub const COIN_COLLECT_DISTANCE: f32 = 3.0;

/// Distance within which the speed collectable is picked up
pub const SPEED_COLLECT_DISTANCE: f32 = 5.0;

/// Base collision distance for celestial orbs, scaled by the orb's size
const ORB_COLLISION_DISTANCE: f32 = 2.0;

/// Base collision distance for rival aircraft, scaled by both aircraft
const AIRCRAFT_COLLISION_DISTANCE: f32 = 2.0;

/// Half-width of the lateral band swept while the speed effect is active
const SWEEP_HALF_WIDTH: f32 = 3.0;

/// Sound cue fired when a coin is collected
const COIN_SOUND: &str = "assets/sounds/coin.wav";

/// State of the speed-collectable effect
///
/// `in_effect` is only set true by the collision system in the frame the
/// pickup is touched; the caller must reset it before invoking the system
/// each frame, or the effect appears sticky. Activation time and the Z
/// coordinate at collection are tagged values, not sentinels: `None` means
/// no effect is running.
#[derive(Debug, Clone, Default)]
pub struct SpeedEffect {
    /// True only in the frame the pickup was touched
    pub in_effect: bool,

    /// Elapsed-time stamp when the effect started
    pub started_at: Option<f32>,

    /// Camera Z at the moment of collection, while the effect runs
    pub z_at_collection: Option<f32>,

    /// Postprocess effect to restore when the boost expires
    pub previous_effect: Option<String>,
}

impl SpeedEffect {
    /// Fresh state with no effect running
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the effect is currently running
    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Clear all effect state (each race or turn starts clean)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Classifies proximity of the candidate camera position to the world
pub struct CollisionSystem;

impl CollisionSystem {
    /// Run collision detection against a candidate camera position
    ///
    /// Returns the number of collectable artifacts remaining after this
    /// frame's pickups.
    pub fn update(
        world: &mut World,
        candidate_position: Vec3,
        forbidden_collision: &mut bool,
        speed: &mut SpeedEffect,
        audio: &mut dyn AudioSink,
    ) -> usize {
        let player_scale = world
            .aircraft()
            .and_then(|key| world.entity(key))
            .map_or(1.0, |entity| entity.transform.scale.x);

        let mut to_remove: Vec<EntityKey> = Vec::new();
        for (key, entity) in world.iter_live() {
            let position = entity.transform.position;
            let distance = (position - candidate_position).norm();
            match entity.kind {
                EntityKind::CollectableCoin => {
                    // While boosted, coins between the activation Z and the
                    // candidate Z inside a narrow lateral band are swept up
                    // without a proximity check.
                    let swept = speed.z_at_collection.map_or(false, |z_start| {
                        let (near, far) = if candidate_position.z < z_start {
                            (candidate_position.z, z_start)
                        } else {
                            (z_start, candidate_position.z)
                        };
                        position.z >= near
                            && position.z <= far
                            && (position.x - candidate_position.x).abs() < SWEEP_HALF_WIDTH
                    });
                    if distance < COIN_COLLECT_DISTANCE || swept {
                        to_remove.push(key);
                        audio.play_sound(COIN_SOUND);
                    }
                }
                EntityKind::SpeedCollectable => {
                    if distance < SPEED_COLLECT_DISTANCE {
                        speed.in_effect = true;
                        to_remove.push(key);
                    }
                }
                EntityKind::CelestialOrb => {
                    let threshold = ORB_COLLISION_DISTANCE * entity.transform.scale.x;
                    if distance < threshold {
                        *forbidden_collision = true;
                    }
                }
                EntityKind::OtherAircraft => {
                    let threshold =
                        AIRCRAFT_COLLISION_DISTANCE * entity.transform.scale.x * player_scale;
                    if distance < threshold {
                        *forbidden_collision = true;
                    }
                }
                _ => {}
            }
        }

        for key in to_remove {
            world.mark_for_removal(key);
        }
        world.delete_marked_entities();

        world.artifact_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;

    fn coin_at(world: &mut World, position: Vec3) -> EntityKey {
        let key = world.add_kind(EntityKind::CollectableCoin);
        world.entity_mut(key).unwrap().transform.position = position;
        world.register_artifact(key);
        key
    }

    #[test]
    fn test_coin_inside_threshold_is_collected() {
        let mut world = World::new();
        let coin = coin_at(&mut world, Vec3::new(0.0, 0.0, COIN_COLLECT_DISTANCE - 0.01));
        let mut forbidden = false;
        let mut speed = SpeedEffect::new();
        let mut audio = RecordingAudio::default();

        let remaining = CollisionSystem::update(
            &mut world,
            Vec3::zeros(),
            &mut forbidden,
            &mut speed,
            &mut audio,
        );

        assert_eq!(remaining, 0);
        assert!(!world.is_allocated(coin));
        assert_eq!(audio.played.len(), 1);
        assert!(!forbidden);
    }

    #[test]
    fn test_coin_outside_threshold_stays() {
        let mut world = World::new();
        let coin = coin_at(&mut world, Vec3::new(0.0, 0.0, COIN_COLLECT_DISTANCE + 0.01));
        let mut forbidden = false;
        let mut speed = SpeedEffect::new();
        let mut audio = RecordingAudio::default();

        let remaining = CollisionSystem::update(
            &mut world,
            Vec3::zeros(),
            &mut forbidden,
            &mut speed,
            &mut audio,
        );

        assert_eq!(remaining, 1);
        assert!(world.is_live(coin));
        assert!(audio.played.is_empty());
    }

    #[test]
    fn test_forbidden_orb_does_not_abort_pickups() {
        let mut world = World::new();
        let orb = world.add_kind(EntityKind::CelestialOrb);
        world.entity_mut(orb).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
        let coin = coin_at(&mut world, Vec3::new(0.0, 0.0, 1.0));

        let mut forbidden = false;
        let mut speed = SpeedEffect::new();
        let mut audio = RecordingAudio::default();
        let remaining = CollisionSystem::update(
            &mut world,
            Vec3::zeros(),
            &mut forbidden,
            &mut speed,
            &mut audio,
        );

        // The scan completes: the collision is flagged and the coin still
        // lands in the same frame.
        assert!(forbidden);
        assert_eq!(remaining, 0);
        assert!(!world.is_allocated(coin));
    }

    #[test]
    fn test_speed_pickup_arms_the_effect() {
        let mut world = World::new();
        let pickup = world.add_kind(EntityKind::SpeedCollectable);
        world.entity_mut(pickup).unwrap().transform.position = Vec3::new(0.0, 0.0, 4.0);

        let mut forbidden = false;
        let mut speed = SpeedEffect::new();
        let mut audio = RecordingAudio::default();
        CollisionSystem::update(
            &mut world,
            Vec3::zeros(),
            &mut forbidden,
            &mut speed,
            &mut audio,
        );

        assert!(speed.in_effect);
        assert!(!world.is_allocated(pickup));
    }

    #[test]
    fn test_boost_sweeps_coins_inside_the_band() {
        let mut world = World::new();
        // Far from the candidate but inside the swept corridor.
        let swept = coin_at(&mut world, Vec3::new(1.0, 0.0, -10.0));
        // Same depth but outside the lateral band.
        let outside = coin_at(&mut world, Vec3::new(8.0, 0.0, -10.0));

        let mut forbidden = false;
        let mut speed = SpeedEffect {
            z_at_collection: Some(0.0),
            started_at: Some(0.0),
            ..SpeedEffect::default()
        };
        let mut audio = RecordingAudio::default();
        let remaining = CollisionSystem::update(
            &mut world,
            Vec3::new(0.0, 0.0, -20.0),
            &mut forbidden,
            &mut speed,
            &mut audio,
        );

        assert_eq!(remaining, 1);
        assert!(!world.is_allocated(swept));
        assert!(world.is_live(outside));
    }

    #[test]
    fn test_orb_threshold_scales_with_orb_size() {
        let mut world = World::new();
        let orb = world.add_kind(EntityKind::CelestialOrb);
        {
            let entity = world.entity_mut(orb).unwrap();
            entity.transform.position = Vec3::new(0.0, 0.0, 5.0);
            entity.transform.scale = Vec3::new(3.0, 3.0, 3.0);
        }

        let mut forbidden = false;
        let mut speed = SpeedEffect::new();
        let mut audio = RecordingAudio::default();
        CollisionSystem::update(
            &mut world,
            Vec3::zeros(),
            &mut forbidden,
            &mut speed,
            &mut audio,
        );

        // Distance 5 is inside the scaled threshold 2 * 3 = 6.
        assert!(forbidden);
    }

    #[test]
    fn test_rival_aircraft_threshold_scales_with_both_aircraft() {
        let mut world = World::new();
        let player = world.add_kind(EntityKind::MainAircraft);
        world.entity_mut(player).unwrap().transform.scale = Vec3::new(1.5, 1.5, 1.5);
        let rival = world.add_kind(EntityKind::OtherAircraft);
        {
            let entity = world.entity_mut(rival).unwrap();
            entity.transform.position = Vec3::new(0.0, 0.0, 5.0);
            entity.transform.scale = Vec3::new(2.0, 2.0, 2.0);
        }

        let mut forbidden = false;
        let mut speed = SpeedEffect::new();
        let mut audio = RecordingAudio::default();
        CollisionSystem::update(
            &mut world,
            Vec3::zeros(),
            &mut forbidden,
            &mut speed,
            &mut audio,
        );

        // Distance 5 is inside the doubly scaled threshold 2 * 2 * 1.5 = 6.
        assert!(forbidden);
    }

    #[test]
    fn test_speed_effect_activity_is_tagged_not_sentinel() {
        let mut speed = SpeedEffect::new();
        assert!(!speed.is_active());
        speed.started_at = Some(12.0);
        assert!(speed.is_active());
        speed.reset();
        assert!(!speed.is_active());
        assert!(speed.z_at_collection.is_none());
    }
}

//! Entity arena types
//!
//! Entities are plain data records owned by the [`World`](crate::ecs::World)
//! arena and addressed by generational keys, so a stale key can never reach
//! another entity's data after a slot is reused.

use crate::foundation::math::Transform;
use serde::Deserialize;
use slotmap::new_key_type;

new_key_type! {
    /// Generational handle addressing an entity inside a world's arena
    pub struct EntityKey;
}

/// Gameplay classification of an entity
///
/// Systems use the kind tag to decide how an entity participates in
/// collision and win-condition checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Scenery with no special gameplay role
    #[default]
    Other,
    /// A planet, moon or star the player must not fly into
    CelestialOrb,
    /// A collectable space artifact
    CollectableCoin,
    /// The special pickup that triggers the speed effect
    SpeedCollectable,
    /// The player's own aircraft, slaved to the camera
    MainAircraft,
    /// A rival aircraft the player must not fly into
    OtherAircraft,
    /// The race track geometry
    Track,
    /// The finish line plane at the far end of the track
    FinishLine,
}

/// A positioned object in the world
///
/// Holds the local transform and the non-owning parent reference. The
/// components attached to an entity live in the world's per-type storage,
/// not inside this record.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    /// Display name, mostly useful in logs
    pub name: String,

    /// Gameplay classification tag
    pub kind: EntityKind,

    /// Transform relative to the parent entity (or the world root)
    pub transform: Transform,

    /// Parent entity, if any. Never owning.
    pub parent: Option<EntityKey>,
}

impl Entity {
    /// Create an entity with the given kind at the arena default transform
    pub fn with_kind(kind: EntityKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

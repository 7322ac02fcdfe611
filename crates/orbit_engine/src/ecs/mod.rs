//! Entity-Component-System implementation
//!
//! The world owns a generational arena of entities, per-type component
//! storage, and the derived indices the gameplay systems and renderer
//! depend on. Systems live in [`systems`] and operate on the world once
//! per frame in a fixed order.

pub mod component;
pub mod components;
pub mod entity;
pub mod systems;
pub mod world;

pub use component::{Component, ComponentStore};
pub use entity::{Entity, EntityKey, EntityKind};
pub use world::{SceneError, TrackBounds, World};

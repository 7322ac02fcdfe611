//! # Orbit Engine
//!
//! The ECS world and forward-rendering core of a 3D space racing game.
//!
//! ## Features
//!
//! - **ECS Architecture**: arena-backed world with per-type component
//!   storage and a mark-then-delete entity lifecycle
//! - **Forward Rendering**: command-list renderer with transparency
//!   sorting, sky pass, postprocessing and lit-material light upload
//! - **Gameplay Systems**: movement integration, free-camera steering
//!   with axis restriction, and distance-threshold collision detection
//! - **Narrow Collaborators**: graphics device, input source, audio sink
//!   and asset cache consumed through small traits
//!
//! ## Frame contract
//!
//! Per frame, in order: reset the speed-effect flag, run the movement
//! system, let the camera controller produce a candidate position, run
//! collision detection against the candidate, commit the camera position
//! only if no forbidden collision occurred, then render. Entity deletion
//! happens exactly once per frame, at the end of collision resolution.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod audio;
pub mod core;
pub mod ecs;
pub mod foundation;
pub mod input;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetCache, AssetError},
        audio::{AudioSink, NullAudio},
        core::config::{GameConfig, RendererOptions, SceneConfig},
        ecs::systems::{
            CameraFrame, CollisionSystem, FreeCameraControllerSystem, MovementSystem, SpeedEffect,
        },
        ecs::{Entity, EntityKey, EntityKind, SceneError, World},
        foundation::math::{Mat4, Transform, Vec2, Vec3, Vec4},
        input::{InputSource, KeyCode, MouseButton, ScriptedInput},
        render::{ForwardRenderer, GraphicsDevice, HeadlessDevice, Material, Mesh, RenderError},
    };
}

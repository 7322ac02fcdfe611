//! Two-player space race on the `orbit_engine` core
//!
//! This crate owns the gameplay shell the engine stays agnostic of: the
//! per-frame system ordering, the speed-effect lifecycle, deterministic
//! randomized content generation and the headless harness that drives a
//! full race without a window.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod harness;
pub mod play;
pub mod spawn;

pub use play::{HudState, PlayError, PlayState, TurnStatus};

//! # Arena Core
//!
//! Simulation core for a top-down arena shooter.
//!
//! ## Features
//!
//! - **Entity Collections**: Players, enemies, projectiles and particles in
//!   slot-map arenas with a single-visit death sweep
//! - **Frame Pipeline**: Ordered update, collision and sweep passes
//! - **Directors**: Timed spawn schedulers with a level-progression ramp
//! - **Game State Machine**: NotStarted, Starting, Running, Paused, GameOver
//! - **Pluggable Collaborators**: Assets, controllers and rendering come in
//!   through narrow traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arena_core::prelude::*;
//!
//! fn main() -> Result<(), GameError> {
//!     let assets = MemoryAssetProvider::with_defaults();
//!     let mut game = Game::new(GameConfig::default(), &assets)?;
//!     let mut controllers = ScriptedControllers::new();
//!     controllers.connect(ControllerId(0));
//!
//!     game.reset(&mut controllers)?;
//!     for _ in 0..600 {
//!         game.update(1.0 / 60.0, &mut controllers)?;
//!     }
//!
//!     for event in game.drain_events() {
//!         log::info!("{:?}", event);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod physics;
pub mod spatial;
pub mod assets;
pub mod input;
pub mod render;
pub mod events;
pub mod config;
pub mod entity;
pub mod spawn;
pub mod director;
pub mod weapon;
pub mod world;
pub mod game;

mod error;

pub use error::{AssetError, DirectorError, GameError, SpawnError};
pub use game::{Game, GameSnapshot, GameState, PlayerSnapshot};

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Game, GameError, GameSnapshot, GameState, PlayerSnapshot,
        assets::{AssetProvider, MemoryAssetProvider, ModelTemplate},
        config::{Config, GameConfig},
        entity::{EnemyFilter, EnemyType, ExplosionSize},
        events::{EventSink, GameEvent},
        foundation::math::{Mat4, Vec2, Vec3},
        input::{ControllerId, ControllerProvider, ControllerState, ScriptedControllers},
        physics::{Boundary, BoundingSphere},
        render::{Camera, DrawRequest, Renderer},
    };
}

//! Error types for the simulation core

use crate::config::ConfigError;
use crate::entity::{EnemyFilter, EnemyType};

/// Spawn factory failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// The wildcard category was used where a concrete one is required
    #[error("'Any' is a filter, not a spawnable enemy category")]
    WildcardCategory,

    /// No constructor registered for the category
    #[error("no constructor registered for {0:?}")]
    Unregistered(EnemyType),

    /// No registered category matches the filter
    #[error("no registered enemy category matches filter {0:?}")]
    NoMatchingCategory(EnemyFilter),
}

/// Director scheduler failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectorError {
    /// The scheduler was built without directors
    #[error("director pool is empty")]
    EmptyPool,

    /// No director in the pool can run at level 1
    #[error("director pool has no director eligible at level 1")]
    NoEntryLevelDirector,

    /// No director in the pool can run at the given level
    #[error("no director eligible at level {level}")]
    NoEligibleDirector {
        /// Level that had no candidate
        level: u32,
    },
}

/// Asset provider failures
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// The provider has no template with this id
    #[error("missing model template '{0}'")]
    MissingTemplate(String),

    /// The template has no bounding geometry
    #[error("model template '{0}' has no bounding geometry")]
    EmptyGeometry(String),
}

/// Top-level error for the game
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Spawn refused
    #[error("spawn error: {0}")]
    Spawn(#[from] SpawnError),

    /// Director scheduling failed
    #[error("director error: {0}")]
    Director(#[from] DirectorError),

    /// Asset loading failed
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A reset was requested with no controller connected
    #[error("cannot start a game without connected controllers")]
    NoControllers,
}

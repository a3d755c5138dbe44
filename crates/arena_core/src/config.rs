//! Configuration system
//!
//! [`GameConfig`] carries every tunable of the simulation. Each section
//! falls back to its defaults, so a file only needs the values it changes.

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value breaks a simulation invariant
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the game's random generator; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Playfield
    pub arena: ArenaConfig,

    /// Level progression and directors
    pub director: DirectorConfig,

    /// Players
    pub player: PlayerConfig,

    /// Weapons and projectiles
    pub weapons: WeaponConfig,

    /// Explosion particles
    pub particles: ParticleConfig,

    /// Broad phase
    pub spatial: SpatialConfig,
}

/// Playfield configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Half the side length of the square arena
    pub half_extent: f32,
}

/// Level progression and director tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorConfig {
    /// Budget of the level before level 1 (seconds)
    pub initial_level_time: f32,

    /// Scale of the per-level budget reduction `coefficient / level`
    pub time_coefficient: f32,

    /// Budgets never drop below this (seconds)
    pub minimum_level_time: f32,

    /// Scatter spawn interval is `budget / (level * constant)`
    pub scatter_spawn_constant: f32,

    /// Corner spawn interval is `budget / (level * constant)`
    pub corner_spawn_constant: f32,

    /// Corner director runs for `budget / divisor`
    pub corner_time_divisor: f32,

    /// Burst spawns `ceil(level / divisor)` spirals
    pub burst_level_divisor: u32,

    /// First level the burst director can be chosen at
    pub burst_minimum_level: u32,
}

/// Player tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Lives at the start of a game
    pub starting_lives: i32,

    /// Bombs at the start of a game
    pub bombs: u32,

    /// Movement speed (units per second)
    pub speed: f32,

    /// Delay before a killed player reappears (seconds)
    pub respawn_delay: f32,
}

/// Weapon tuning shared by every weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Minimum time between shots (seconds)
    pub fire_rate: f32,

    /// Projectile displacement per frame
    pub projectile_speed: f32,

    /// Damage dealt by one projectile
    pub projectile_power: i32,

    /// Projectiles per concentrated shot
    pub concentrated_count: u32,

    /// Fan width of a concentrated shot (degrees)
    pub concentrated_spread_degrees: f32,

    /// Number of offsets the scattered weapon cycles through
    pub scatter_offsets: u32,

    /// Total width of the scattered offsets (degrees)
    pub scatter_spread_degrees: f32,
}

/// Explosion particle tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Shortest particle life (frames)
    pub min_ttl: u32,

    /// Longest particle life (frames)
    pub max_ttl: u32,

    /// Divides the per-frame particle drift
    pub speed_factor: f32,
}

/// Broad-phase tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Grid cell side length
    pub cell_size: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self { half_extent: 50.0 }
    }
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            initial_level_time: 30.0,
            time_coefficient: 2.5,
            minimum_level_time: 5.0,
            scatter_spawn_constant: 10.0,
            corner_spawn_constant: 25.0,
            corner_time_divisor: 5.0,
            burst_level_divisor: 5,
            burst_minimum_level: 5,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            bombs: 3,
            speed: 60.0,
            respawn_delay: 2.0,
        }
    }
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            fire_rate: 0.1,
            projectile_speed: 2.2,
            projectile_power: 10,
            concentrated_count: 5,
            concentrated_spread_degrees: 20.0,
            scatter_offsets: 5,
            scatter_spread_degrees: 30.0,
        }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            min_ttl: 15,
            max_ttl: 30,
            speed_factor: 1.0,
        }
    }
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self { cell_size: 10.0 }
    }
}

impl GameConfig {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| Err(ConfigError::Invalid(message.to_string()));

        if !(self.arena.half_extent > 0.0) {
            return invalid("arena.half_extent must be positive");
        }

        let director = &self.director;
        if !(director.minimum_level_time > 0.0) {
            return invalid("director.minimum_level_time must be positive");
        }
        if director.initial_level_time < director.minimum_level_time {
            return invalid("director.initial_level_time must not be below minimum_level_time");
        }
        if director.time_coefficient < 0.0 {
            return invalid("director.time_coefficient must not be negative");
        }
        if !(director.scatter_spawn_constant > 0.0)
            || !(director.corner_spawn_constant > 0.0)
            || !(director.corner_time_divisor > 0.0)
        {
            return invalid("director spawn constants must be positive");
        }
        if director.burst_level_divisor == 0 {
            return invalid("director.burst_level_divisor must be at least 1");
        }

        if self.player.starting_lives < 0 {
            return invalid("player.starting_lives must not be negative");
        }
        if self.player.speed < 0.0 || self.player.respawn_delay < 0.0 {
            return invalid("player speed and respawn delay must not be negative");
        }

        let weapons = &self.weapons;
        if !(weapons.fire_rate > 0.0) {
            return invalid("weapons.fire_rate must be positive");
        }
        if weapons.concentrated_count == 0 || weapons.scatter_offsets == 0 {
            return invalid("weapons need at least one projectile per shot");
        }

        let particles = &self.particles;
        if particles.min_ttl == 0 || particles.min_ttl > particles.max_ttl {
            return invalid("particles ttl range must be non-empty and start above zero");
        }
        if !(particles.speed_factor > 0.0) {
            return invalid("particles.speed_factor must be positive");
        }

        if !(self.spatial.cell_size > 0.0) {
            return invalid("spatial.cell_size must be positive");
        }

        Ok(())
    }
}

impl Config for GameConfig {}

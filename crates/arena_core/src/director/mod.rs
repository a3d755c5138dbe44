//! Directors: timed spawn schedulers
//!
//! A director is armed with a level and a time budget, then asked once per
//! frame what to spawn. It never touches the entity collections itself; it
//! queues [`SpawnRequest`]s that the world applies before its next update
//! pass. The [`DirectorScheduler`] owns a fixed pool of directors and moves
//! to the next level whenever the current one runs out of time.

pub mod burst;
pub mod corner;
pub mod scatter;
pub mod scheduler;

use rand::rngs::StdRng;

use crate::config::DirectorConfig;
use crate::foundation::time::Stopwatch;
use crate::physics::Boundary;
use crate::spawn::SpawnRequest;

pub use burst::BurstDirector;
pub use corner::CornerDirector;
pub use scatter::ScatterDirector;
pub use scheduler::{DirectorScheduler, LevelChange};

/// Collaborators a director may use while resetting or updating
pub struct DirectorContext<'a> {
    /// Playfield for spawn positions
    pub boundary: &'a Boundary,
    /// The game's random generator
    pub rng: &'a mut StdRng,
    /// Spawns requested this frame
    pub requests: &'a mut Vec<SpawnRequest>,
}

/// A spawn scheduling strategy
pub trait Director {
    /// Name for logs and events
    fn name(&self) -> &'static str;

    /// Lowest level this director may be chosen at
    fn minimum_level(&self) -> u32;

    /// Arm the director for `level` with a `budget` in seconds
    fn reset(&mut self, level: u32, budget: f32, ctx: &mut DirectorContext<'_>);

    /// Advance by one frame
    fn update(&mut self, delta_time: f32, ctx: &mut DirectorContext<'_>);

    /// Time left before the scheduler moves on
    fn remaining_time(&self) -> f32;
}

/// Level, budget and elapsed time shared by every director
#[derive(Debug, Clone, Default)]
pub struct DirectorClock {
    level: u32,
    level_time: f32,
    elapsed: Stopwatch,
}

impl DirectorClock {
    /// Idle clock; reports no remaining time until armed
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `level`, running for `level_time` seconds
    pub fn reset(&mut self, level: u32, level_time: f32) {
        self.level = level;
        self.level_time = level_time;
        self.elapsed.restart();
    }

    /// Advance by one frame
    pub fn tick(&mut self, delta_time: f32) {
        self.elapsed.tick(delta_time);
    }

    /// Assigned level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Time this director runs for
    pub fn level_time(&self) -> f32 {
        self.level_time
    }

    /// `level_time` minus the time elapsed since the reset
    pub fn remaining(&self) -> f32 {
        self.level_time - self.elapsed.elapsed()
    }
}

/// The standard pool: scatter, burst and corner directors
pub fn default_pool(config: &DirectorConfig) -> Vec<Box<dyn Director>> {
    vec![
        Box::new(ScatterDirector::new(config.scatter_spawn_constant)),
        Box::new(BurstDirector::new(config.burst_level_divisor, config.burst_minimum_level)),
        Box::new(CornerDirector::new(config.corner_spawn_constant, config.corner_time_divisor)),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use rand::SeedableRng;

    /// Owned collaborators for driving a director in tests
    pub struct Harness {
        pub boundary: Boundary,
        pub rng: StdRng,
        pub requests: Vec<SpawnRequest>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                boundary: Boundary::centered(50.0),
                rng: StdRng::seed_from_u64(17),
                requests: Vec::new(),
            }
        }

        pub fn ctx(&mut self) -> DirectorContext<'_> {
            DirectorContext {
                boundary: &self.boundary,
                rng: &mut self.rng,
                requests: &mut self.requests,
            }
        }
    }
}

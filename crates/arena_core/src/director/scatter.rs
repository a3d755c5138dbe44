//! Scatter director: roaming enemies at random spots, on a steady beat

use super::{Director, DirectorClock, DirectorContext};
use crate::entity::EnemyFilter;
use crate::spawn::SpawnRequest;

/// Spawns one roaming enemy at a random in-bounds point every
/// `budget / (level * spawn_constant)` seconds.
#[derive(Debug, Clone)]
pub struct ScatterDirector {
    clock: DirectorClock,
    spawn_constant: f32,
    filter: EnemyFilter,
    spawn_interval: f32,
    since_last_spawn: f32,
}

impl ScatterDirector {
    /// Create an idle scatter director
    pub fn new(spawn_constant: f32) -> Self {
        Self {
            clock: DirectorClock::new(),
            spawn_constant,
            filter: EnemyFilter::ROAMING,
            spawn_interval: f32::INFINITY,
            since_last_spawn: 0.0,
        }
    }

    /// Seconds between spawns at the current level
    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }
}

impl Director for ScatterDirector {
    fn name(&self) -> &'static str {
        "scatter"
    }

    fn minimum_level(&self) -> u32 {
        1
    }

    #[allow(clippy::cast_precision_loss)]
    fn reset(&mut self, level: u32, budget: f32, _ctx: &mut DirectorContext<'_>) {
        self.clock.reset(level, budget);
        self.spawn_interval = budget / (level.max(1) as f32 * self.spawn_constant);
        self.since_last_spawn = 0.0;
    }

    fn update(&mut self, delta_time: f32, ctx: &mut DirectorContext<'_>) {
        self.clock.tick(delta_time);
        self.since_last_spawn += delta_time;

        if self.since_last_spawn > self.spawn_interval {
            self.since_last_spawn = 0.0;
            ctx.requests.push(SpawnRequest::Random {
                filter: self.filter,
                position: ctx.boundary.random_point(&mut *ctx.rng),
            });
        }
    }

    fn remaining_time(&self) -> f32 {
        self.clock.remaining()
    }
}

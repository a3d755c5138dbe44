//! Burst director: a one-off wave of spirals when armed

use super::{Director, DirectorClock, DirectorContext};
use crate::entity::EnemyType;
use crate::spawn::SpawnRequest;

/// Spawns `ceil(level / level_divisor)` spirals at random points when reset,
/// then stays quiet for the rest of its budget.
#[derive(Debug, Clone)]
pub struct BurstDirector {
    clock: DirectorClock,
    level_divisor: u32,
    minimum_level: u32,
    kind: EnemyType,
}

impl BurstDirector {
    /// Create an idle burst director
    pub fn new(level_divisor: u32, minimum_level: u32) -> Self {
        Self {
            clock: DirectorClock::new(),
            level_divisor: level_divisor.max(1),
            minimum_level,
            kind: EnemyType::Spiral,
        }
    }

    /// Number of enemies spawned for `level`
    pub fn spawn_count(&self, level: u32) -> u32 {
        level.div_ceil(self.level_divisor)
    }
}

impl Director for BurstDirector {
    fn name(&self) -> &'static str {
        "burst"
    }

    fn minimum_level(&self) -> u32 {
        self.minimum_level
    }

    fn reset(&mut self, level: u32, budget: f32, ctx: &mut DirectorContext<'_>) {
        self.clock.reset(level, budget);
        for _ in 0..self.spawn_count(level) {
            ctx.requests.push(SpawnRequest::Exact {
                kind: self.kind,
                position: ctx.boundary.random_point(&mut *ctx.rng),
            });
        }
    }

    fn update(&mut self, delta_time: f32, _ctx: &mut DirectorContext<'_>) {
        self.clock.tick(delta_time);
    }

    fn remaining_time(&self) -> f32 {
        self.clock.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::test_support::Harness;

    #[test]
    fn test_spawn_count_rounds_up() {
        let director = BurstDirector::new(5, 5);
        assert_eq!(director.spawn_count(5), 1);
        assert_eq!(director.spawn_count(6), 2);
        assert_eq!(director.spawn_count(10), 2);
        assert_eq!(director.spawn_count(11), 3);
    }

    #[test]
    fn test_fires_once_per_reset() {
        let mut harness = Harness::new();
        let mut director = BurstDirector::new(5, 5);

        director.reset(7, 12.0, &mut harness.ctx());
        assert_eq!(harness.requests.len(), 2);
        assert!(harness.requests.iter().all(|request| matches!(
            request,
            SpawnRequest::Exact { kind: EnemyType::Spiral, .. }
        )));

        for _ in 0..100 {
            director.update(0.1, &mut harness.ctx());
        }
        assert_eq!(harness.requests.len(), 2);
        assert!(director.remaining_time() < 2.0 + 1e-3);

        director.reset(8, 12.0, &mut harness.ctx());
        assert_eq!(harness.requests.len(), 4);
        assert_eq!(director.remaining_time(), 12.0);
    }
}

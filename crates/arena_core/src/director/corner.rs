//! Corner director: diamonds pouring in from the arena corners

use super::{Director, DirectorClock, DirectorContext};
use crate::entity::EnemyType;
use crate::spawn::SpawnRequest;

/// Spawns a diamond at one arena corner per interval, moving to the next
/// corner each time. Runs for a fraction of the level budget.
#[derive(Debug, Clone)]
pub struct CornerDirector {
    clock: DirectorClock,
    spawn_constant: f32,
    time_divisor: f32,
    spawn_interval: f32,
    since_last_spawn: f32,
    next_corner: usize,
}

impl CornerDirector {
    /// Create an idle corner director
    pub fn new(spawn_constant: f32, time_divisor: f32) -> Self {
        Self {
            clock: DirectorClock::new(),
            spawn_constant,
            time_divisor,
            spawn_interval: f32::INFINITY,
            since_last_spawn: 0.0,
            next_corner: 0,
        }
    }

    /// Seconds between spawns at the current level
    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }
}

impl Director for CornerDirector {
    fn name(&self) -> &'static str {
        "corner"
    }

    fn minimum_level(&self) -> u32 {
        1
    }

    #[allow(clippy::cast_precision_loss)]
    fn reset(&mut self, level: u32, budget: f32, _ctx: &mut DirectorContext<'_>) {
        self.clock.reset(level, budget / self.time_divisor);
        self.spawn_interval = budget / (level.max(1) as f32 * self.spawn_constant);
        self.since_last_spawn = 0.0;
        self.next_corner = 0;
    }

    fn update(&mut self, delta_time: f32, ctx: &mut DirectorContext<'_>) {
        self.clock.tick(delta_time);
        self.since_last_spawn += delta_time;

        if self.since_last_spawn > self.spawn_interval {
            self.since_last_spawn = 0.0;
            let corners = ctx.boundary.corners();
            ctx.requests.push(SpawnRequest::Exact {
                kind: EnemyType::Diamond,
                position: corners[self.next_corner % corners.len()],
            });
            self.next_corner = (self.next_corner + 1) % corners.len();
        }
    }

    fn remaining_time(&self) -> f32 {
        self.clock.remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::test_support::Harness;
    use approx::assert_relative_eq;

    #[test]
    fn test_runs_for_a_fraction_of_the_budget() {
        let mut harness = Harness::new();
        let mut director = CornerDirector::new(25.0, 5.0);

        director.reset(2, 25.0, &mut harness.ctx());
        assert_relative_eq!(director.remaining_time(), 5.0);
        assert_relative_eq!(director.spawn_interval(), 0.5);
    }

    #[test]
    fn test_cycles_through_corners() {
        let mut harness = Harness::new();
        let mut director = CornerDirector::new(25.0, 5.0);
        director.reset(1, 25.0, &mut harness.ctx());

        // Interval is 1s, crossed on every fifth 0.25s frame
        for _ in 0..30 {
            director.update(0.25, &mut harness.ctx());
        }

        let corners = harness.boundary.corners();
        let positions: Vec<_> = harness
            .requests
            .iter()
            .map(|request| match request {
                SpawnRequest::Exact { kind, position } => {
                    assert_eq!(*kind, EnemyType::Diamond);
                    *position
                }
                SpawnRequest::Random { .. } => panic!("corner spawns diamonds"),
            })
            .collect();

        assert_eq!(positions.len(), 6);
        for (i, position) in positions.iter().enumerate() {
            assert_eq!(*position, corners[i % 4]);
        }
    }
}

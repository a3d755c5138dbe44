//! Level progression and director selection

use rand::seq::SliceRandom;

use super::{Director, DirectorContext};
use crate::config::DirectorConfig;
use crate::error::DirectorError;
use crate::foundation::logging::{debug, info};

/// Result of a level transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelChange {
    /// New level
    pub level: u32,
    /// Budget handed to the chosen director
    pub budget: f32,
    /// Name of the chosen director
    pub director: &'static str,
}

/// Owns the director pool and moves through the levels
///
/// Each transition raises the level by one and shrinks the budget by
/// `time_coefficient / level`, never below `minimum_level_time`. The next
/// director is drawn uniformly from those whose minimum level has been
/// reached.
pub struct DirectorScheduler {
    pool: Vec<Box<dyn Director>>,
    current: Option<usize>,
    level: u32,
    level_time: f32,
    initial_level_time: f32,
    time_coefficient: f32,
    minimum_level_time: f32,
}

impl DirectorScheduler {
    /// Build a scheduler over `pool`. The pool must hold at least one
    /// director that can run at level 1.
    pub fn new(
        pool: Vec<Box<dyn Director>>,
        config: &DirectorConfig,
    ) -> Result<Self, DirectorError> {
        if pool.is_empty() {
            return Err(DirectorError::EmptyPool);
        }
        if !pool.iter().any(|director| director.minimum_level() <= 1) {
            return Err(DirectorError::NoEntryLevelDirector);
        }

        Ok(Self {
            pool,
            current: None,
            level: 0,
            level_time: config.initial_level_time,
            initial_level_time: config.initial_level_time,
            time_coefficient: config.time_coefficient,
            minimum_level_time: config.minimum_level_time,
        })
    }

    /// Back to level 0 with no current director
    pub fn reset(&mut self) {
        self.level = 0;
        self.level_time = self.initial_level_time;
        self.current = None;
    }

    /// Current level
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Budget of the current level
    pub fn level_time(&self) -> f32 {
        self.level_time
    }

    /// Name of the running director, if any
    pub fn current_director(&self) -> Option<&'static str> {
        self.current.map(|index| self.pool[index].name())
    }

    /// Time left for the running director
    pub fn remaining_time(&self) -> Option<f32> {
        self.current.map(|index| self.pool[index].remaining_time())
    }

    /// Advance one frame. Moves to the next level first when no director is
    /// running or the current one is out of time, and reports the change.
    pub fn update(
        &mut self,
        delta_time: f32,
        ctx: &mut DirectorContext<'_>,
    ) -> Result<Option<LevelChange>, DirectorError> {
        let expired = self
            .current
            .map_or(true, |index| self.pool[index].remaining_time() <= 0.0);

        let change = if expired { Some(self.advance(ctx)?) } else { None };

        if let Some(index) = self.current {
            self.pool[index].update(delta_time, ctx);
        }

        Ok(change)
    }

    /// Move to the next level and arm a new director
    #[allow(clippy::cast_precision_loss)]
    pub fn advance(&mut self, ctx: &mut DirectorContext<'_>) -> Result<LevelChange, DirectorError> {
        let level = self.level + 1;
        let budget = (self.level_time - self.time_coefficient / level as f32)
            .max(self.minimum_level_time);

        let eligible: Vec<usize> = self
            .pool
            .iter()
            .enumerate()
            .filter(|(_, director)| director.minimum_level() <= level)
            .map(|(index, _)| index)
            .collect();
        let index = *eligible
            .choose(&mut *ctx.rng)
            .ok_or(DirectorError::NoEligibleDirector { level })?;

        self.level = level;
        self.level_time = budget;
        self.current = Some(index);

        let director = &mut self.pool[index];
        director.reset(level, budget, ctx);
        debug!("Director '{}' armed with {:.2}s", director.name(), budget);
        info!("Level {} ({:.2}s) with the {} director", level, budget, director.name());

        Ok(LevelChange {
            level,
            budget,
            director: director.name(),
        })
    }
}

impl std::fmt::Debug for DirectorScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectorScheduler")
            .field("level", &self.level)
            .field("level_time", &self.level_time)
            .field("current", &self.current_director())
            .field("pool", &self.pool.iter().map(|d| d.name()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::director::test_support::Harness;
    use crate::director::{default_pool, BurstDirector, ScatterDirector};
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_pools_without_entry_director() {
        let config = DirectorConfig::default();
        assert_eq!(
            DirectorScheduler::new(Vec::new(), &config).unwrap_err(),
            DirectorError::EmptyPool
        );
        assert_eq!(
            DirectorScheduler::new(vec![Box::new(BurstDirector::new(5, 5))], &config).unwrap_err(),
            DirectorError::NoEntryLevelDirector
        );
    }

    #[test]
    fn test_first_update_starts_level_one() {
        let mut harness = Harness::new();
        let config = DirectorConfig::default();
        let mut scheduler = DirectorScheduler::new(default_pool(&config), &config).unwrap();

        let change = scheduler.update(0.016, &mut harness.ctx()).unwrap().unwrap();
        assert_eq!(change.level, 1);
        assert_relative_eq!(change.budget, 27.5);
        assert_ne!(change.director, "burst");

        assert!(scheduler.update(0.016, &mut harness.ctx()).unwrap().is_none());
    }

    #[test]
    fn test_budget_sequence_shrinks_to_floor() {
        let mut harness = Harness::new();
        let config = DirectorConfig {
            time_coefficient: 10.0,
            ..DirectorConfig::default()
        };
        let mut scheduler = DirectorScheduler::new(default_pool(&config), &config).unwrap();

        let budgets: Vec<f32> = (0..50)
            .map(|_| scheduler.advance(&mut harness.ctx()).unwrap().budget)
            .collect();

        assert_relative_eq!(budgets[0], 20.0);
        assert_relative_eq!(budgets[1], 15.0);
        assert!(budgets.windows(2).all(|pair| pair[1] <= pair[0]));
        assert!(budgets.iter().all(|budget| *budget >= config.minimum_level_time));
        assert_relative_eq!(budgets[49], config.minimum_level_time);
    }

    #[test]
    fn test_default_budgets_never_increase() {
        let mut harness = Harness::new();
        let config = DirectorConfig::default();
        let mut scheduler = DirectorScheduler::new(default_pool(&config), &config).unwrap();

        let budgets: Vec<f32> = (0..200)
            .map(|_| scheduler.advance(&mut harness.ctx()).unwrap().budget)
            .collect();

        assert_relative_eq!(budgets[0], 27.5);
        assert_relative_eq!(budgets[1], 26.25);
        assert!(budgets.windows(2).all(|pair| pair[1] <= pair[0]));
    }

    #[test]
    fn test_selection_respects_minimum_level() {
        let mut harness = Harness::new();
        let config = DirectorConfig::default();
        let mut scheduler = DirectorScheduler::new(default_pool(&config), &config).unwrap();

        let mut burst_seen = false;
        for _ in 0..100 {
            let change = scheduler.advance(&mut harness.ctx()).unwrap();
            if change.director == "burst" {
                assert!(change.level >= config.burst_minimum_level);
                burst_seen = true;
            }
        }
        assert!(burst_seen);
    }

    #[test]
    fn test_moves_on_when_director_runs_out() {
        let mut harness = Harness::new();
        let config = DirectorConfig {
            initial_level_time: 10.0,
            time_coefficient: 0.0,
            ..DirectorConfig::default()
        };
        let pool: Vec<Box<dyn Director>> = vec![Box::new(ScatterDirector::new(10.0))];
        let mut scheduler = DirectorScheduler::new(pool, &config).unwrap();

        assert!(scheduler.update(4.0, &mut harness.ctx()).unwrap().is_some());
        assert!(scheduler.update(4.0, &mut harness.ctx()).unwrap().is_none());
        assert!(scheduler.update(4.0, &mut harness.ctx()).unwrap().is_none());
        assert_relative_eq!(scheduler.remaining_time().unwrap(), -2.0);

        let change = scheduler.update(4.0, &mut harness.ctx()).unwrap().unwrap();
        assert_eq!(change.level, 2);
        assert_eq!(scheduler.level(), 2);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut harness = Harness::new();
        let config = DirectorConfig::default();
        let mut scheduler = DirectorScheduler::new(default_pool(&config), &config).unwrap();

        for _ in 0..5 {
            scheduler.advance(&mut harness.ctx()).unwrap();
        }
        scheduler.reset();

        assert_eq!(scheduler.level(), 0);
        assert_eq!(scheduler.level_time(), config.initial_level_time);
        assert!(scheduler.current_director().is_none());
    }
}

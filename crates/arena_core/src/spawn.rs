//! Enemy spawn factory
//!
//! Maps each concrete [`EnemyType`] to a constructor. Random spawns filter
//! the registered categories first and sample uniformly from what is left,
//! so an unsatisfiable filter is an error instead of an endless retry.

use std::collections::BTreeMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::assets::TemplateSet;
use crate::entity::{Enemy, EnemyFilter, EnemyType};
use crate::error::SpawnError;
use crate::foundation::logging::debug;
use crate::foundation::math::Vec3;

/// Builds an enemy at a position
pub type EnemyConstructor = Box<dyn Fn(Vec3, &mut StdRng) -> Result<Enemy, SpawnError>>;

/// What a director wants spawned
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnRequest {
    /// A specific category
    Exact {
        /// Category to spawn
        kind: EnemyType,
        /// Where
        position: Vec3,
    },
    /// Any registered category accepted by the filter
    Random {
        /// Accepted categories
        filter: EnemyFilter,
        /// Where
        position: Vec3,
    },
}

/// Registry of enemy constructors
#[derive(Default)]
pub struct SpawnFactory {
    constructors: BTreeMap<EnemyType, EnemyConstructor>,
}

impl SpawnFactory {
    /// Empty factory
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with a constructor for every category in `templates`
    pub fn with_templates(templates: &TemplateSet) -> Result<Self, SpawnError> {
        let mut factory = Self::new();
        for kind in EnemyType::CONCRETE {
            let Some(template) = templates.enemy(kind) else {
                continue;
            };
            let template = Arc::clone(template);
            factory.register(
                kind,
                Box::new(move |position: Vec3, rng: &mut StdRng| {
                    Enemy::new(kind, Arc::clone(&template), position, rng)
                }),
            )?;
        }
        Ok(factory)
    }

    /// Register or replace the constructor for a concrete category
    pub fn register(
        &mut self,
        kind: EnemyType,
        constructor: EnemyConstructor,
    ) -> Result<(), SpawnError> {
        if kind == EnemyType::Any {
            return Err(SpawnError::WildcardCategory);
        }
        self.constructors.insert(kind, constructor);
        Ok(())
    }

    /// Registered categories in order
    pub fn registered(&self) -> Vec<EnemyType> {
        self.constructors.keys().copied().collect()
    }

    /// Whether any registered category matches `filter`
    pub fn can_satisfy(&self, filter: EnemyFilter) -> bool {
        self.constructors.keys().any(|kind| kind.matches(filter))
    }

    /// Spawn a specific category
    pub fn spawn(
        &self,
        kind: EnemyType,
        position: Vec3,
        rng: &mut StdRng,
    ) -> Result<Enemy, SpawnError> {
        if kind == EnemyType::Any {
            return Err(SpawnError::WildcardCategory);
        }
        let constructor = self.constructors.get(&kind).ok_or(SpawnError::Unregistered(kind))?;
        debug!("Spawning {:?} at ({:.1}, {:.1})", kind, position.x, position.y);
        constructor(position, rng)
    }

    /// Spawn a uniformly chosen registered category accepted by `filter`
    pub fn spawn_random(
        &self,
        filter: EnemyFilter,
        position: Vec3,
        rng: &mut StdRng,
    ) -> Result<Enemy, SpawnError> {
        let eligible: Vec<EnemyType> = self
            .constructors
            .keys()
            .copied()
            .filter(|kind| kind.matches(filter))
            .collect();

        let kind = *eligible.choose(rng).ok_or(SpawnError::NoMatchingCategory(filter))?;
        self.spawn(kind, position, rng)
    }

    /// Carry out a director request
    pub fn fulfil(&self, request: &SpawnRequest, rng: &mut StdRng) -> Result<Enemy, SpawnError> {
        match *request {
            SpawnRequest::Exact { kind, position } => self.spawn(kind, position, rng),
            SpawnRequest::Random { filter, position } => self.spawn_random(filter, position, rng),
        }
    }
}

impl std::fmt::Debug for SpawnFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnFactory")
            .field("registered", &self.registered())
            .finish()
    }
}

//! Player weapons
//!
//! A weapon turns an aim direction into projectile requests, at most once per
//! fire-rate interval. The two variants only differ in how many projectiles a
//! shot produces and at which angles.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::WeaponConfig;
use crate::foundation::math::{angle_of, heading, Vec2, Vec3};
use crate::foundation::time::Stopwatch;

/// Weapon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    /// Fan of projectiles across a fixed spread, all at once
    Concentrated,
    /// One projectile per shot, cycling through fixed angular offsets
    Scattered,
}

impl WeaponKind {
    /// Every variant, in armoury order
    pub const ALL: [Self; 2] = [Self::Concentrated, Self::Scattered];
}

/// A projectile the world should create
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileRequest {
    /// Spawn position
    pub position: Vec3,
    /// Displacement per frame
    pub direction: Vec2,
    /// Damage on hit
    pub power: i32,
}

/// A rate-limited weapon
#[derive(Debug, Clone)]
pub struct Weapon {
    kind: WeaponKind,
    since_last_shot: Stopwatch,
    fire_rate: f32,
    projectile_speed: f32,
    power: i32,
    count: u32,
    spread: f32,
    shots_fired: u32,
}

impl Weapon {
    /// Build a weapon of `kind` from the shared tuning
    pub fn new(kind: WeaponKind, config: &WeaponConfig) -> Self {
        let (count, spread_degrees) = match kind {
            WeaponKind::Concentrated => {
                (config.concentrated_count, config.concentrated_spread_degrees)
            }
            WeaponKind::Scattered => (config.scatter_offsets, config.scatter_spread_degrees),
        };

        Self {
            kind,
            since_last_shot: Stopwatch::start_new(),
            fire_rate: config.fire_rate,
            projectile_speed: config.projectile_speed,
            power: config.projectile_power,
            count: count.max(1),
            spread: spread_degrees.to_radians(),
            shots_fired: 0,
        }
    }

    /// Pick a weapon uniformly from the armoury
    pub fn random<R: Rng + ?Sized>(config: &WeaponConfig, rng: &mut R) -> Self {
        let kind = WeaponKind::ALL
            .choose(rng)
            .copied()
            .unwrap_or(WeaponKind::Concentrated);
        Self::new(kind, config)
    }

    /// Variant
    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    /// Advance the shot clock
    pub fn tick(&mut self, delta_time: f32) {
        self.since_last_shot.tick(delta_time);
    }

    /// Enough time passed since the last shot
    pub fn can_shoot(&self) -> bool {
        self.since_last_shot.elapsed() > self.fire_rate
    }

    /// Fire toward `aim` from `origin`. Returns nothing while cooling down or
    /// when `aim` is zero.
    #[allow(clippy::cast_precision_loss)]
    pub fn shoot(&mut self, origin: Vec3, aim: Vec2) -> Vec<ProjectileRequest> {
        if !self.can_shoot() || aim.norm_squared() <= f32::EPSILON {
            return Vec::new();
        }
        self.since_last_shot.restart();

        let angle = angle_of(aim.x, aim.y);
        let offsets: Vec<f32> = match self.kind {
            WeaponKind::Concentrated => {
                if self.count == 1 {
                    vec![0.0]
                } else {
                    let step = self.spread / (self.count - 1) as f32;
                    (0..self.count)
                        .map(|i| -self.spread / 2.0 + step * i as f32)
                        .collect()
                }
            }
            WeaponKind::Scattered => {
                let step = self.spread / self.count as f32;
                let slot = (self.shots_fired % self.count) as f32 - (self.count / 2) as f32;
                vec![step * slot]
            }
        };
        self.shots_fired = self.shots_fired.wrapping_add(1);

        offsets
            .into_iter()
            .map(|offset| ProjectileRequest {
                position: origin,
                direction: heading(angle + offset) * self.projectile_speed,
                power: self.power,
            })
            .collect()
    }
}

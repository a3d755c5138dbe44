//! Enemies
//!
//! Every enemy shares one record. Its [`EnemyType`] selects a profile
//! (health, score value, scale, death explosion) and the motion rule it
//! runs each frame.

use std::sync::Arc;

use bitflags::bitflags;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Drawable, Killable};
use super::particle::{Explosion, ExplosionSize};
use crate::assets::{template_ids, ModelTemplate};
use crate::error::SpawnError;
use crate::foundation::math::{angle_of, constants::TWO_PI, extend, heading, wrap_angle, Vec2, Vec3};
use crate::input::ControllerId;
use crate::physics::Boundary;
use crate::render::{Color, DrawKind};

/// Enemy categories
///
/// `Any` is a filter marker only; it is never spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyType {
    /// Wildcard used by filters
    Any,
    /// Slow spinning drifter
    Pinwheel,
    /// Stationary, heavily armoured spinner
    Spiral,
    /// Homes toward the nearest player
    Diamond,
    /// Fast bouncing dart
    Darter,
}

bitflags! {
    /// Set of enemy categories accepted by a random spawn
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EnemyFilter: u8 {
        /// Pinwheels
        const PINWHEEL = 1 << 0;
        /// Spirals
        const SPIRAL = 1 << 1;
        /// Diamonds
        const DIAMOND = 1 << 2;
        /// Darters
        const DARTER = 1 << 3;
        /// Everything that moves around the arena
        const ROAMING = Self::PINWHEEL.bits() | Self::DIAMOND.bits() | Self::DARTER.bits();
        /// Every category
        const ANY = Self::ROAMING.bits() | Self::SPIRAL.bits();
    }
}

/// Fixed per-category values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    /// Starting health
    pub health: i32,
    /// Score awarded for the kill
    pub value: u64,
    /// Scale at spawn
    pub base_scale: [f32; 3],
    /// Explosion size on death
    pub explosion_size: ExplosionSize,
    /// Explosion colour on death
    pub explosion_color: Color,
}

const PINWHEEL_PROFILE: EnemyProfile = EnemyProfile {
    health: 1,
    value: 100,
    base_scale: [2.0, 2.0, 2.0],
    explosion_size: ExplosionSize::Large,
    explosion_color: Color::PURPLE,
};

const SPIRAL_PROFILE: EnemyProfile = EnemyProfile {
    health: 250,
    value: 500,
    base_scale: [3.0, 3.0, 3.0],
    explosion_size: ExplosionSize::Huge,
    explosion_color: Color::STEEL_BLUE,
};

const DIAMOND_PROFILE: EnemyProfile = EnemyProfile {
    health: 1,
    value: 200,
    base_scale: [1.0, 1.0, 1.0],
    explosion_size: ExplosionSize::Medium,
    explosion_color: Color::BLUE,
};

const DARTER_PROFILE: EnemyProfile = EnemyProfile {
    health: 1,
    value: 500,
    base_scale: [1.0, 1.0, 2.0],
    explosion_size: ExplosionSize::Medium,
    explosion_color: Color::YELLOW,
};

const PINWHEEL_SPEED: f32 = 5.0;
const PINWHEEL_SPIN: f32 = 15.0 * TWO_PI / 60.0;
const SPIRAL_SPIN_PER_FRAME: f32 = TWO_PI / 360.0;
const DIAMOND_SPEED: f32 = 20.0;
const DARTER_SPEED: f32 = 45.0;

impl EnemyType {
    /// Every spawnable category
    pub const CONCRETE: [Self; 4] = [Self::Pinwheel, Self::Spiral, Self::Diamond, Self::Darter];

    /// Filter bit of this category; `Any` maps to every bit
    pub const fn filter(self) -> EnemyFilter {
        match self {
            Self::Any => EnemyFilter::ANY,
            Self::Pinwheel => EnemyFilter::PINWHEEL,
            Self::Spiral => EnemyFilter::SPIRAL,
            Self::Diamond => EnemyFilter::DIAMOND,
            Self::Darter => EnemyFilter::DARTER,
        }
    }

    /// Whether this is a concrete category accepted by `filter`
    pub fn matches(self, filter: EnemyFilter) -> bool {
        self != Self::Any && filter.contains(self.filter())
    }

    /// Asset template id
    pub const fn template_id(self) -> &'static str {
        match self {
            Self::Any | Self::Pinwheel => template_ids::PINWHEEL,
            Self::Spiral => template_ids::SPIRAL,
            Self::Diamond => template_ids::DIAMOND,
            Self::Darter => template_ids::DARTER,
        }
    }

    /// Fixed values for a concrete category
    pub fn profile(self) -> Option<&'static EnemyProfile> {
        match self {
            Self::Any => None,
            Self::Pinwheel => Some(&PINWHEEL_PROFILE),
            Self::Spiral => Some(&SPIRAL_PROFILE),
            Self::Diamond => Some(&DIAMOND_PROFILE),
            Self::Darter => Some(&DARTER_PROFILE),
        }
    }
}

/// How an enemy moves each frame
#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    /// Constant velocity (units per second) reflected off the walls
    Drift {
        velocity: Vec2,
        spin: Option<f32>,
    },
    /// Stays put and turns a fixed angle per frame
    Rotate { per_frame: f32 },
    /// Moves toward the nearest target (units per second)
    Home { speed: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PulseAxes {
    Y,
    XY,
}

/// Scale oscillating between two bounds by a fixed step per frame
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pulse {
    axes: PulseAxes,
    value: f32,
    min: f32,
    max: f32,
    step: f32,
    growing: bool,
}

impl Pulse {
    fn new(axes: PulseAxes, min: f32, max: f32, step: f32) -> Self {
        Self {
            axes,
            value: 1.0_f32.clamp(min, max),
            min,
            max,
            step,
            growing: true,
        }
    }

    fn tick(&mut self) {
        if self.growing {
            self.value += self.step;
            if self.value >= self.max {
                self.value = self.max;
                self.growing = false;
            }
        } else {
            self.value -= self.step;
            if self.value <= self.min {
                self.value = self.min;
                self.growing = true;
            }
        }
    }

    fn apply(&self, scale: &mut Vec3) {
        match self.axes {
            PulseAxes::Y => scale.y = self.value,
            PulseAxes::XY => {
                scale.x = self.value;
                scale.y = self.value;
            }
        }
    }
}

/// A live enemy
#[derive(Debug, Clone)]
pub struct Enemy {
    kind: EnemyType,
    body: Body,
    health: i32,
    value: u64,
    motion: Motion,
    pulse: Option<Pulse>,
    credited: Option<ControllerId>,
}

impl Enemy {
    /// Build an enemy of a concrete category
    pub fn new<R: Rng + ?Sized>(
        kind: EnemyType,
        template: Arc<ModelTemplate>,
        position: Vec3,
        rng: &mut R,
    ) -> Result<Self, SpawnError> {
        let profile = kind.profile().ok_or(SpawnError::WildcardCategory)?;
        let random_heading = |rng: &mut R| heading(rng.gen_range(0.0..TWO_PI));

        let (motion, pulse) = match kind {
            EnemyType::Pinwheel => (
                Motion::Drift {
                    velocity: random_heading(rng) * PINWHEEL_SPEED,
                    spin: Some(PINWHEEL_SPIN),
                },
                None,
            ),
            EnemyType::Spiral => (Motion::Rotate { per_frame: SPIRAL_SPIN_PER_FRAME }, None),
            EnemyType::Diamond => (
                Motion::Home { speed: DIAMOND_SPEED },
                Some(Pulse::new(PulseAxes::Y, 0.75, 1.75, 0.01)),
            ),
            EnemyType::Darter => (
                Motion::Drift {
                    velocity: random_heading(rng) * DARTER_SPEED,
                    spin: None,
                },
                Some(Pulse::new(PulseAxes::XY, 0.75, 1.25, 0.005)),
            ),
            EnemyType::Any => return Err(SpawnError::WildcardCategory),
        };

        let mut body = Body::with_scale(template, position, Vec3::from(profile.base_scale));
        if let Some(pulse) = &pulse {
            pulse.apply(&mut body.scale);
        }
        if let Motion::Drift { velocity, spin: None } = motion {
            body.rotation = angle_of(velocity.x, velocity.y);
        }
        body.recompute();

        Ok(Self {
            kind,
            body,
            health: profile.health,
            value: profile.value,
            motion,
            pulse,
            credited: None,
        })
    }

    /// Category
    pub fn kind(&self) -> EnemyType {
        self.kind
    }

    /// Remaining health
    pub fn health(&self) -> i32 {
        self.health
    }

    /// Score awarded for the kill
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Player credited with the kill, if any
    pub fn credited(&self) -> Option<ControllerId> {
        self.credited
    }

    /// Record the player credited with the kill
    pub fn credit_to(&mut self, player: ControllerId) {
        self.credited = Some(player);
    }

    /// Mutable spatial state
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Advance one frame. `targets` are the positions of active players.
    pub fn update(&mut self, delta_time: f32, targets: &[Vec3], boundary: &Boundary) {
        let body = &mut self.body;

        match &mut self.motion {
            Motion::Drift { velocity, spin } => {
                *velocity = boundary.bounce_movement(&body.position, *velocity);
                body.position += extend(&(*velocity * delta_time));
                body.rotation = match spin {
                    Some(rate) => wrap_angle(body.rotation + *rate * delta_time),
                    None => angle_of(velocity.x, velocity.y),
                };
            }
            Motion::Rotate { per_frame } => {
                body.rotation = wrap_angle(body.rotation + *per_frame);
            }
            Motion::Home { speed } => {
                let nearest = targets.iter().min_by(|a, b| {
                    let da = (*a - body.position).xy().norm_squared();
                    let db = (*b - body.position).xy().norm_squared();
                    da.total_cmp(&db)
                });
                if let Some(target) = nearest {
                    let to_target = (target - body.position).xy();
                    let distance = to_target.norm();
                    if distance > f32::EPSILON {
                        let step = (*speed * delta_time).min(distance);
                        body.position += extend(&(to_target / distance * step));
                    }
                }
            }
        }

        if let Some(pulse) = &mut self.pulse {
            pulse.tick();
            pulse.apply(&mut body.scale);
        }

        body.recompute();
    }

    /// Apply damage. Returns the score value exactly once, on the hit that
    /// takes health to zero or below.
    pub fn damage(&mut self, amount: i32) -> Option<u64> {
        if !self.is_alive() {
            return None;
        }

        self.health -= amount;
        (!self.is_alive()).then_some(self.value)
    }

    /// Explosion emitted when this enemy is swept
    pub fn death_explosion(&self) -> Explosion {
        let profile = self.kind.profile().unwrap_or(&PINWHEEL_PROFILE);
        Explosion::new(self.body.position, profile.explosion_size, profile.explosion_color)
    }
}

impl Killable for Enemy {
    fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn kill(&mut self) {
        self.health = self.health.min(0);
    }
}

impl Drawable for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn draw_kind(&self) -> DrawKind {
        DrawKind::Enemy(self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VisualHandle;
    use crate::physics::BoundingSphere;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn template() -> Arc<ModelTemplate> {
        let bounds = vec![BoundingSphere::new(Vec3::zeros(), 1.0)];
        Arc::new(ModelTemplate::new("enemy", VisualHandle(2), bounds).unwrap())
    }

    fn spawn(kind: EnemyType, position: Vec3) -> Enemy {
        let mut rng = StdRng::seed_from_u64(11);
        Enemy::new(kind, template(), position, &mut rng).unwrap()
    }

    #[test]
    fn test_wildcard_cannot_be_built() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = Enemy::new(EnemyType::Any, template(), Vec3::zeros(), &mut rng);
        assert_eq!(result.unwrap_err(), SpawnError::WildcardCategory);
    }

    #[test]
    fn test_filter_matching() {
        assert!(EnemyType::Darter.matches(EnemyFilter::ROAMING));
        assert!(!EnemyType::Spiral.matches(EnemyFilter::ROAMING));
        assert!(EnemyType::Spiral.matches(EnemyFilter::ANY));
        assert!(!EnemyType::Any.matches(EnemyFilter::ANY));
    }

    #[test]
    fn test_lethal_damage_pays_once() {
        let mut enemy = spawn(EnemyType::Pinwheel, Vec3::zeros());
        assert_eq!(enemy.health(), 1);

        assert_eq!(enemy.damage(1), Some(100));
        assert_eq!(enemy.health(), 0);
        assert!(!enemy.is_alive());
        assert_eq!(enemy.damage(1), None);
    }

    #[test]
    fn test_spiral_absorbs_hits() {
        let mut enemy = spawn(EnemyType::Spiral, Vec3::zeros());
        for _ in 0..24 {
            assert_eq!(enemy.damage(10), None);
        }
        assert_eq!(enemy.damage(10), Some(500));
    }

    #[test]
    fn test_kill_forces_non_positive_health() {
        let mut enemy = spawn(EnemyType::Spiral, Vec3::zeros());
        enemy.kill();
        assert!(!enemy.is_alive());
        assert!(enemy.health() <= 0);
    }

    #[test]
    fn test_diamond_homes_on_nearest_target() {
        let boundary = Boundary::centered(50.0);
        let mut enemy = spawn(EnemyType::Diamond, Vec3::zeros());
        let targets = [Vec3::new(-30.0, 0.0, 0.0), Vec3::new(0.0, 10.0, 0.0)];

        enemy.update(0.1, &targets, &boundary);
        assert_relative_eq!(enemy.body().position, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-5);

        let before = enemy.body().position;
        enemy.update(0.1, &[], &boundary);
        assert_eq!(enemy.body().position, before);
    }

    #[test]
    fn test_pulsing_enemies_start_at_unit_scale() {
        let diamond = spawn(EnemyType::Diamond, Vec3::zeros());
        assert_eq!(diamond.body().scale.y, 1.0);

        let darter = spawn(EnemyType::Darter, Vec3::zeros());
        assert_eq!(darter.body().scale.x, 1.0);
        assert_eq!(darter.body().scale.y, 1.0);
    }

    #[test]
    fn test_diamond_pulse_stays_in_range() {
        let boundary = Boundary::centered(50.0);
        let mut enemy = spawn(EnemyType::Diamond, Vec3::zeros());
        for _ in 0..500 {
            enemy.update(1.0 / 60.0, &[], &boundary);
            let y = enemy.body().scale.y;
            assert!((0.75..=1.75).contains(&y));
        }
    }

    #[test]
    fn test_darter_bounces_back_inside() {
        let boundary = Boundary::centered(50.0);
        let mut enemy = spawn(EnemyType::Darter, Vec3::zeros());
        for _ in 0..2000 {
            enemy.update(1.0 / 60.0, &[], &boundary);
        }
        let position = enemy.body().position;
        // One frame of overshoot at most
        assert!(position.x.abs() <= 50.0 + DARTER_SPEED / 60.0 + 1e-3);
        assert!(position.y.abs() <= 50.0 + DARTER_SPEED / 60.0 + 1e-3);
    }

    #[test]
    fn test_spiral_turns_one_degree_per_frame() {
        let boundary = Boundary::centered(50.0);
        let mut enemy = spawn(EnemyType::Spiral, Vec3::new(5.0, 5.0, 0.0));
        for _ in 0..90 {
            enemy.update(1.0 / 60.0, &[], &boundary);
        }
        assert_relative_eq!(enemy.body().rotation, std::f32::consts::FRAC_PI_2, epsilon = 1e-3);
        assert_eq!(enemy.body().position, Vec3::new(5.0, 5.0, 0.0));
    }
}

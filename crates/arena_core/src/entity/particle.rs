//! Explosion particles
//!
//! Purely cosmetic. A particle flies outward along its own random
//! orientation, shrinks linearly and dies when its frame budget runs out.

use std::sync::Arc;

use rand::Rng;

use super::body::{Body, Drawable, Killable};
use crate::assets::ModelTemplate;
use crate::config::ParticleConfig;
use crate::foundation::math::{constants::TWO_PI, Mat4, Vec3};
use crate::render::{Color, DrawKind};

/// Named explosion sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplosionSize {
    /// 10 particles
    Small,
    /// 50 particles
    Medium,
    /// 250 particles
    Large,
    /// 1000 particles
    Huge,
}

impl ExplosionSize {
    /// Number of particles emitted
    pub const fn particle_count(self) -> usize {
        match self {
            Self::Small => 10,
            Self::Medium => 50,
            Self::Large => 250,
            Self::Huge => 1000,
        }
    }
}

/// Request to emit a burst of particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    /// Centre of the burst
    pub position: Vec3,
    /// How many particles
    pub size: ExplosionSize,
    /// Tint of every particle
    pub color: Color,
}

impl Explosion {
    /// Create an explosion request
    pub fn new(position: Vec3, size: ExplosionSize, color: Color) -> Self {
        Self { position, size, color }
    }
}

/// A single explosion particle
#[derive(Debug, Clone)]
pub struct Particle {
    body: Body,
    time_to_live: u32,
    offset: f32,
    velocity_offset: f32,
    orientation: Vec3,
    tint: Color,
    size: f32,
    scale_decay: f32,
}

impl Particle {
    /// Emit one particle of `explosion`
    #[allow(clippy::cast_precision_loss)]
    pub fn new<R: Rng + ?Sized>(
        template: Arc<ModelTemplate>,
        explosion: &Explosion,
        config: &ParticleConfig,
        rng: &mut R,
    ) -> Self {
        let time_to_live = rng.gen_range(config.min_ttl..=config.max_ttl).max(1);
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let velocity_offset = rng.gen::<f32>() / config.speed_factor * direction * 2.0;
        let orientation = Vec3::new(
            rng.gen_range(0.0..TWO_PI),
            rng.gen_range(0.0..TWO_PI),
            rng.gen_range(0.0..TWO_PI),
        );

        let mut particle = Self {
            body: Body::new(template, explosion.position),
            time_to_live,
            offset: 0.0,
            velocity_offset,
            orientation,
            tint: explosion.color,
            size: 1.0,
            scale_decay: 1.0 / time_to_live as f32,
        };
        particle.compose();
        particle
    }

    /// Advance one frame
    pub fn update(&mut self) {
        if self.time_to_live == 0 {
            return;
        }

        self.time_to_live -= 1;
        self.offset += self.velocity_offset;
        self.size = (self.size - self.scale_decay).max(0.0);
        self.compose();
    }

    /// Frames left
    pub fn time_to_live(&self) -> u32 {
        self.time_to_live
    }

    /// Current uniform scale
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Scale, then push out along local Y, then orient, then move to the
    /// burst centre.
    fn compose(&mut self) {
        self.body.scale = Vec3::new(self.size, self.size, self.size);
        let transform = Mat4::new_translation(&self.body.position)
            * Mat4::from_euler_angles(self.orientation.x, self.orientation.y, self.orientation.z)
            * Mat4::new_translation(&Vec3::new(0.0, self.offset, 0.0))
            * Mat4::new_scaling(self.size);
        self.body.set_transform(transform);
    }
}

impl Killable for Particle {
    fn is_alive(&self) -> bool {
        self.time_to_live > 0
    }

    fn kill(&mut self) {
        self.time_to_live = 0;
    }
}

impl Drawable for Particle {
    fn body(&self) -> &Body {
        &self.body
    }

    fn draw_kind(&self) -> DrawKind {
        DrawKind::Particle
    }

    fn tint(&self) -> Option<Color> {
        Some(self.tint)
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
        let bounds = vec![BoundingSphere::new(Vec3::zeros(), 0.1)];
        Arc::new(ModelTemplate::new("particle", VisualHandle(9), bounds).unwrap())
    }

    #[test]
    fn test_explosion_sizes() {
        assert_eq!(ExplosionSize::Small.particle_count(), 10);
        assert_eq!(ExplosionSize::Medium.particle_count(), 50);
        assert_eq!(ExplosionSize::Large.particle_count(), 250);
        assert_eq!(ExplosionSize::Huge.particle_count(), 1000);
    }

    #[test]
    fn test_particle_decays_to_zero_and_dies() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = ParticleConfig::default();
        let explosion =
            Explosion::new(Vec3::new(1.0, 2.0, 0.0), ExplosionSize::Small, Color::YELLOW);
        let mut particle = Particle::new(template(), &explosion, &config, &mut rng);

        let ttl = particle.time_to_live();
        assert!((config.min_ttl..=config.max_ttl).contains(&ttl));
        assert_eq!(particle.tint(), Some(Color::YELLOW));

        for _ in 0..ttl {
            assert!(particle.is_alive());
            particle.update();
        }
        assert!(!particle.is_alive());
        assert_relative_eq!(particle.size(), 0.0, epsilon = 1e-4);

        // Dead particles stay put
        let transform = *particle.body().transform();
        particle.update();
        assert_eq!(*particle.body().transform(), transform);
    }
}

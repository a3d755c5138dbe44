//! Projectiles

use std::sync::Arc;

use super::body::{Body, Drawable, Killable};
use super::particle::{Explosion, ExplosionSize};
use crate::assets::ModelTemplate;
use crate::foundation::collections::PlayerKey;
use crate::foundation::math::{angle_of, extend, Vec2, Vec3};
use crate::physics::Boundary;
use crate::render::{Color, DrawKind};

/// A projectile in flight
///
/// `owner` is a handle into the player arena, not a reference: if the
/// player is gone by the time the projectile scores, the credit is dropped.
#[derive(Debug, Clone)]
pub struct Projectile {
    body: Body,
    owner: Option<PlayerKey>,
    direction: Vec2,
    power: i32,
    alive: bool,
}

impl Projectile {
    /// Create a projectile moving `direction` units per frame
    pub fn new(
        template: Arc<ModelTemplate>,
        owner: Option<PlayerKey>,
        position: Vec3,
        direction: Vec2,
        power: i32,
    ) -> Self {
        let mut body = Body::new(template, position);
        body.rotation = angle_of(direction.x, direction.y);
        body.recompute();

        Self {
            body,
            owner,
            direction,
            power,
            alive: true,
        }
    }

    /// Firing player
    pub fn owner(&self) -> Option<PlayerKey> {
        self.owner
    }

    /// Damage dealt on hit
    pub fn power(&self) -> i32 {
        self.power
    }

    /// Displacement per frame
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Mutable spatial state
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Move one frame; leaving the boundary kills the projectile
    pub fn update(&mut self, boundary: &Boundary) {
        if !self.alive {
            return;
        }

        self.body.position += extend(&self.direction);
        self.body.recompute();

        if !boundary.contains(&self.body.position) {
            self.alive = false;
        }
    }

    /// Explosion emitted when this projectile is swept
    pub fn death_explosion(&self) -> Explosion {
        Explosion::new(self.body.position, ExplosionSize::Small, Color::YELLOW)
    }
}

impl Killable for Projectile {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.alive = false;
    }
}

impl Drawable for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn draw_kind(&self) -> DrawKind {
        DrawKind::Projectile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VisualHandle;
    use crate::physics::BoundingSphere;

    fn template() -> Arc<ModelTemplate> {
        let bounds = vec![BoundingSphere::new(Vec3::zeros(), 0.5)];
        Arc::new(ModelTemplate::new("projectile", VisualHandle(3), bounds).unwrap())
    }

    #[test]
    fn test_moves_by_direction_each_frame() {
        let boundary = Boundary::centered(50.0);
        let mut projectile =
            Projectile::new(template(), None, Vec3::zeros(), Vec2::new(2.0, 0.0), 10);

        projectile.update(&boundary);
        projectile.update(&boundary);
        assert_eq!(projectile.body().position, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(projectile.body().bounding_volumes()[0].center, Vec3::new(4.0, 0.0, 0.0));
        assert!(projectile.is_alive());
    }

    #[test]
    fn test_dies_leaving_the_arena() {
        let boundary = Boundary::centered(50.0);
        let mut projectile = Projectile::new(
            template(),
            None,
            Vec3::new(49.0, 0.0, 0.0),
            Vec2::new(2.2, 0.0),
            10,
        );

        projectile.update(&boundary);
        assert!(!projectile.is_alive());

        let explosion = projectile.death_explosion();
        assert_eq!(explosion.size, ExplosionSize::Small);
        assert_eq!(explosion.color, Color::YELLOW);
    }
}

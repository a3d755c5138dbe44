//! Playfield boundary
//!
//! Containment, clamping and bouncing against an axis-aligned rectangle on
//! the X/Y plane. Z is ignored throughout.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Vec2, Vec3};

/// Axis-aligned playfield rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Lower-left corner
    pub min: Vec2,
    /// Upper-right corner
    pub max: Vec2,
}

impl Boundary {
    /// Create a boundary from two corners
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Square boundary centred on the origin
    pub fn centered(half_extent: f32) -> Self {
        Self {
            min: Vec2::new(-half_extent, -half_extent),
            max: Vec2::new(half_extent, half_extent),
        }
    }

    /// Width along X
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height along Y
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Centre of the rectangle at `z = 0`
    pub fn center(&self) -> Vec3 {
        let center = (self.min + self.max) * 0.5;
        Vec3::new(center.x, center.y, 0.0)
    }

    /// The four corners, clockwise from the upper left
    pub fn corners(&self) -> [Vec3; 4] {
        [
            Vec3::new(self.min.x, self.max.y, 0.0),
            Vec3::new(self.max.x, self.max.y, 0.0),
            Vec3::new(self.max.x, self.min.y, 0.0),
            Vec3::new(self.min.x, self.min.y, 0.0),
        ]
    }

    /// Point-in-rectangle test, edges inclusive
    pub fn contains(&self, position: &Vec3) -> bool {
        position.x >= self.min.x
            && position.x <= self.max.x
            && position.y >= self.min.y
            && position.y <= self.max.y
    }

    /// Zero every axis on which `position` is outside and `direction` keeps
    /// pushing further out.
    pub fn clamp_movement(&self, position: &Vec3, direction: Vec2) -> Vec2 {
        let mut adjusted = direction;
        if self.escaping_x(position, direction.x) {
            adjusted.x = 0.0;
        }
        if self.escaping_y(position, direction.y) {
            adjusted.y = 0.0;
        }
        adjusted
    }

    /// Like [`Boundary::clamp_movement`], but reflects the offending axis
    /// instead of stopping it.
    pub fn bounce_movement(&self, position: &Vec3, direction: Vec2) -> Vec2 {
        let mut adjusted = direction;
        if self.escaping_x(position, direction.x) {
            adjusted.x = -adjusted.x;
        }
        if self.escaping_y(position, direction.y) {
            adjusted.y = -adjusted.y;
        }
        adjusted
    }

    /// Uniformly random point inside the rectangle
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let x = if self.width() > 0.0 {
            rng.gen_range(self.min.x..self.max.x)
        } else {
            self.min.x
        };
        let y = if self.height() > 0.0 {
            rng.gen_range(self.min.y..self.max.y)
        } else {
            self.min.y
        };
        Vec3::new(x, y, 0.0)
    }

    fn escaping_x(&self, position: &Vec3, dx: f32) -> bool {
        (position.x < self.min.x && dx < 0.0) || (position.x > self.max.x && dx > 0.0)
    }

    fn escaping_y(&self, position: &Vec3, dy: f32) -> bool {
        (position.y < self.min.y && dy < 0.0) || (position.y > self.max.y && dy > 0.0)
    }
}

impl Default for Boundary {
    fn default() -> Self {
        Self::centered(50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_contains_is_edge_inclusive() {
        let boundary = Boundary::centered(50.0);
        assert!(boundary.contains(&Vec3::new(0.0, 0.0, 0.0)));
        assert!(boundary.contains(&Vec3::new(50.0, -50.0, 10.0)));
        assert!(!boundary.contains(&Vec3::new(50.1, 0.0, 0.0)));
    }

    #[test]
    fn test_clamp_only_stops_outward_motion() {
        let boundary = Boundary::centered(50.0);
        let outside = Vec3::new(51.0, 0.0, 0.0);

        let outward = boundary.clamp_movement(&outside, Vec2::new(1.0, 1.0));
        assert_eq!(outward, Vec2::new(0.0, 1.0));

        let inward = boundary.clamp_movement(&outside, Vec2::new(-1.0, 1.0));
        assert_eq!(inward, Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn test_bounce_reflects_outward_axis() {
        let boundary = Boundary::centered(50.0);
        let corner = Vec3::new(-51.0, 52.0, 0.0);

        let bounced = boundary.bounce_movement(&corner, Vec2::new(-2.0, 3.0));
        assert_eq!(bounced, Vec2::new(2.0, -3.0));

        let inside = Vec3::new(0.0, 0.0, 0.0);
        assert_eq!(boundary.bounce_movement(&inside, Vec2::new(-2.0, 3.0)), Vec2::new(-2.0, 3.0));
    }

    #[test]
    fn test_random_points_stay_inside() {
        let boundary = Boundary::centered(10.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            assert!(boundary.contains(&boundary.random_point(&mut rng)));
        }
    }

    #[test]
    fn test_corners_and_center() {
        let boundary = Boundary::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
        assert_eq!(boundary.center(), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(boundary.corners()[0], Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(boundary.corners()[2], Vec3::new(4.0, 0.0, 0.0));
    }
}

//! Rendering hand-off
//!
//! The core owns no rendering state. Each frame it builds one
//! [`DrawRequest`] per drawable entity and passes it to a [`Renderer`].

use crate::assets::VisualHandle;
use crate::entity::EnemyType;
use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::input::ControllerId;
use crate::physics::Boundary;

/// Linear RGBA colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque colour from components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Pure red
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Steel blue
    pub const STEEL_BLUE: Self = Self::rgb(0.275, 0.510, 0.706);
    /// White
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Yellow
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Purple
    pub const PURPLE: Self = Self::rgb(0.502, 0.0, 0.502);
    /// Blue
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
}

/// What is being drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// A player ship
    Player(ControllerId),
    /// An enemy
    Enemy(EnemyType),
    /// A projectile
    Projectile,
    /// An explosion particle
    Particle,
}

/// One entity to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    /// Entity category
    pub kind: DrawKind,
    /// Model to draw
    pub visual: VisualHandle,
    /// World transform
    pub world: Mat4,
    /// Camera projection times view
    pub view_projection: Mat4,
    /// Optional colour tint
    pub tint: Option<Color>,
}

/// Rendering collaborator
pub trait Renderer {
    /// Draw a single entity
    fn draw(&mut self, request: &DrawRequest);
}

/// Camera looking down the Z axis onto the arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// View matrix
    pub view: Mat4,
    /// Projection matrix
    pub projection: Mat4,
}

impl Camera {
    /// Vertical field of view
    pub const FIELD_OF_VIEW: f32 = std::f32::consts::FRAC_PI_2;

    /// Near clip plane
    pub const NEAR_PLANE: f32 = 0.01;

    /// Camera that frames `boundary` from a height equal to its half extent
    pub fn for_arena(boundary: &Boundary, aspect_ratio: f32) -> Self {
        let center = boundary.center();
        let height = boundary.width().max(boundary.height()) * 0.5;
        let eye = Point3::new(center.x, center.y, height);
        let target = Point3::new(center.x, center.y, 0.0);

        Self {
            view: Mat4::look_at_rh(&eye, &target, &Vec3::y()),
            projection: Mat4::new_perspective(
                aspect_ratio,
                Self::FIELD_OF_VIEW,
                Self::NEAR_PLANE,
                height * 2.0,
            ),
        }
    }

    /// Projection times view
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arena_camera_centres_origin() {
        let camera = Camera::for_arena(&Boundary::centered(50.0), 1.0);
        let clip = camera.view_projection() * nalgebra::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(clip.y / clip.w, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_arena_camera_frames_edges() {
        // 90 degree FOV from half-extent height puts the edge on the frustum
        let camera = Camera::for_arena(&Boundary::centered(50.0), 1.0);
        let clip = camera.view_projection() * nalgebra::Vector4::new(50.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(clip.x / clip.w, 1.0, epsilon = 1e-4);
    }
}

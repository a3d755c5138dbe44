//! Shared spatial state for every entity

use std::sync::Arc;

use crate::assets::ModelTemplate;
use crate::foundation::math::{world_matrix, Mat4, Vec3};
use crate::physics::BoundingSphere;
use crate::render::{Color, DrawKind, DrawRequest};

/// Position, orientation and scale of an entity, with the transform and
/// world-space bounding volumes derived from them.
///
/// `transform` and `bounding_volumes` are only written by
/// [`Body::recompute`] and [`Body::set_transform`], so after either call the
/// spheres always match the transform.
#[derive(Debug, Clone)]
pub struct Body {
    /// World-space position
    pub position: Vec3,
    /// Rotation around the Z axis (radians)
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vec3,
    transform: Mat4,
    bounding_volumes: Vec<BoundingSphere>,
    template: Arc<ModelTemplate>,
}

impl Body {
    /// Create a body at `position` with unit scale, already recomputed
    pub fn new(template: Arc<ModelTemplate>, position: Vec3) -> Self {
        Self::with_scale(template, position, Vec3::new(1.0, 1.0, 1.0))
    }

    /// Create a body with an explicit scale, already recomputed
    pub fn with_scale(template: Arc<ModelTemplate>, position: Vec3, scale: Vec3) -> Self {
        let mut body = Self {
            position,
            rotation: 0.0,
            scale,
            transform: Mat4::identity(),
            bounding_volumes: Vec::with_capacity(template.local_bounds().len()),
            template,
        };
        body.recompute();
        body
    }

    /// Rebuild the transform from position, rotation and scale, then the
    /// bounding volumes from the transform.
    pub fn recompute(&mut self) {
        let transform = world_matrix(&self.position, self.rotation, &self.scale);
        self.set_transform(transform);
    }

    /// Use a custom transform and rebuild the bounding volumes from it
    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.bounding_volumes.clear();
        self.bounding_volumes.extend(
            self.template
                .local_bounds()
                .iter()
                .map(|sphere| sphere.transformed(&self.transform)),
        );
    }

    /// Current world transform
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// World-space bounding spheres
    pub fn bounding_volumes(&self) -> &[BoundingSphere] {
        &self.bounding_volumes
    }

    /// Model this body was built from
    pub fn template(&self) -> &Arc<ModelTemplate> {
        &self.template
    }

    /// Whether position and transform hold only finite numbers
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.transform.iter().all(|v| v.is_finite())
            && self.bounding_volumes.iter().all(BoundingSphere::is_finite)
    }
}

/// Entities that can die and be swept
pub trait Killable {
    /// Still part of the simulation
    fn is_alive(&self) -> bool;

    /// Force the entity dead
    fn kill(&mut self);
}

/// Entities that can be drawn
pub trait Drawable {
    /// Spatial state
    fn body(&self) -> &Body;

    /// Category for the renderer
    fn draw_kind(&self) -> DrawKind;

    /// Colour tint, if any
    fn tint(&self) -> Option<Color> {
        None
    }

    /// Whether to draw this frame
    fn is_visible(&self) -> bool {
        true
    }

    /// Build a draw request for this entity
    fn draw_request(&self, view_projection: &Mat4) -> DrawRequest {
        let body = self.body();
        DrawRequest {
            kind: self.draw_kind(),
            visual: body.template().visual(),
            world: *body.transform(),
            view_projection: *view_projection,
            tint: self.tint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::VisualHandle;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    fn template() -> Arc<ModelTemplate> {
        Arc::new(
            ModelTemplate::new(
                "test",
                VisualHandle(1),
                vec![
                    BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 0.5),
                    BoundingSphere::new(Vec3::new(-1.0, 0.0, 0.0), 0.25),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_bounds_follow_transform() {
        let mut body = Body::new(template(), Vec3::new(3.0, 4.0, 0.0));
        body.rotation = HALF_PI;
        body.scale = Vec3::new(2.0, 2.0, 1.0);
        body.recompute();

        let expected: Vec<BoundingSphere> = body
            .template()
            .local_bounds()
            .iter()
            .map(|sphere| sphere.transformed(body.transform()))
            .collect();
        assert_eq!(body.bounding_volumes(), expected.as_slice());

        let first = body.bounding_volumes()[0];
        assert_relative_eq!(first.center, Vec3::new(3.0, 6.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(first.radius, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_non_finite_position_is_detected() {
        let mut body = Body::new(template(), Vec3::zeros());
        assert!(body.is_finite());

        body.position.x = f32::NAN;
        body.recompute();
        assert!(!body.is_finite());
    }
}

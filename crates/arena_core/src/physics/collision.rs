//! Bounding spheres and overlap tests

use serde::{Deserialize, Serialize};

use crate::foundation::math::{max_axis_scale, Mat4, Point3, Vec3};

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another; touching counts
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// This sphere carried through `matrix`. The radius grows by the largest
    /// axis scale so the result still encloses a non-uniformly scaled mesh.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let center = matrix.transform_point(&Point3::from(self.center));
        Self {
            center: center.coords,
            radius: self.radius * max_axis_scale(matrix),
        }
    }

    /// Whether every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.radius.is_finite() && self.center.iter().all(|c| c.is_finite())
    }
}

/// True iff any sphere of `a` intersects any sphere of `b`
pub fn intersects_any(a: &[BoundingSphere], b: &[BoundingSphere]) -> bool {
    a.iter().any(|left| b.iter().any(|right| left.intersects(right)))
}

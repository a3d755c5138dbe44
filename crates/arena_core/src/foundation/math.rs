//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by the simulation. The arena is
//! laid out on the X/Y plane; Z is only used for depth when drawing.

pub use nalgebra::{Vector2, Vector3, Matrix4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Mathematical constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Two times Pi
    pub const TWO_PI: f32 = 2.0 * PI;

    /// Pi divided by 2
    pub const HALF_PI: f32 = PI / 2.0;
}

/// Heading of a direction on the X/Y plane, in radians within `[0, 2π)`.
///
/// A zero vector has no heading and maps to `0.0`.
pub fn angle_of(x: f32, y: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }

    let angle = y.atan2(x);
    if angle < 0.0 {
        angle + constants::TWO_PI
    } else {
        angle
    }
}

/// Unit vector on the X/Y plane pointing along `angle` radians
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into `[0, 2π)`
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(constants::TWO_PI)
}

/// World matrix for an object: scale first, then a rotation around Z, then
/// the translation.
pub fn world_matrix(position: &Vec3, rotation: f32, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
        * Mat4::from_axis_angle(&Vec3::z_axis(), rotation)
        * Mat4::new_nonuniform_scaling(scale)
}

/// Largest axis scale of the linear part of `matrix`
pub fn max_axis_scale(matrix: &Mat4) -> f32 {
    (0..3)
        .map(|column| {
            Vec3::new(matrix[(0, column)], matrix[(1, column)], matrix[(2, column)]).norm()
        })
        .fold(0.0, f32::max)
}

/// Lift a plane vector into 3D with `z = 0`
pub fn extend(v: &Vec2) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

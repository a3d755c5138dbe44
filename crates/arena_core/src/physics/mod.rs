//! Physics and collision detection
//!
//! The arena only needs two pieces: a rectangular playfield on the X/Y plane
//! that keeps movement inside it, and sphere sets for overlap tests.

pub mod bounds;
pub mod collision;

pub use bounds::Boundary;
pub use collision::{BoundingSphere, intersects_any};

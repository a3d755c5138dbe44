//! Spatial partitioning for broad-phase collision detection

pub mod grid;

pub use grid::SpatialGrid;

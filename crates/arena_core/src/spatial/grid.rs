//! Uniform grid broad phase
//!
//! Buckets keyed items by the X/Y cells their bounding spheres overlap.
//! Queries return every item sharing at least one cell with the query volume, so a
//! narrow-phase sphere test on the candidates finds exactly the pairs an
//! exhaustive sweep would.

use std::collections::HashMap;

use crate::physics::BoundingSphere;

/// Items spanning more cells than this go to an overflow list that every
/// query returns.
const MAX_CELLS_PER_ITEM: i64 = 256;

/// Uniform X/Y grid of keyed bounding volumes
#[derive(Debug, Clone)]
pub struct SpatialGrid<K> {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<K>>,
    oversized: Vec<K>,
    len: usize,
}

impl<K: Copy + Ord> SpatialGrid<K> {
    /// Create an empty grid; `cell_size` must be positive
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: Vec::new(),
            len: 0,
        }
    }

    /// Side length of one cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Remove every item, keeping allocated buckets
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.oversized.clear();
        self.len = 0;
    }

    /// Number of inserted items
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the grid holds nothing
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `key` into every cell touched by `volumes`
    pub fn insert(&mut self, key: K, volumes: &[BoundingSphere]) {
        self.len += 1;
        if !self.fits_grid(volumes) {
            self.oversized.push(key);
            return;
        }

        for sphere in volumes {
            let (min, max) = self.sphere_cells(sphere);
            for x in min.0..=max.0 {
                for y in min.1..=max.1 {
                    let bucket = self.cells.entry((x, y)).or_default();
                    if bucket.last() != Some(&key) {
                        bucket.push(key);
                    }
                }
            }
        }
    }

    /// Candidates that may overlap `volumes`, sorted by key and deduplicated
    pub fn query(&self, volumes: &[BoundingSphere]) -> Vec<K> {
        let mut found: Vec<K> = self.oversized.clone();

        if self.fits_grid(volumes) {
            for sphere in volumes {
                let (min, max) = self.sphere_cells(sphere);
                for x in min.0..=max.0 {
                    for y in min.1..=max.1 {
                        if let Some(bucket) = self.cells.get(&(x, y)) {
                            found.extend_from_slice(bucket);
                        }
                    }
                }
            }
        } else {
            // Probe too large to walk cell by cell
            found.extend(self.cells.values().flatten().copied());
        }

        found.sort_unstable();
        found.dedup();
        found
    }

    /// Whether `volumes` can be walked cell by cell: non-empty, finite and
    /// not spanning too many cells.
    fn fits_grid(&self, volumes: &[BoundingSphere]) -> bool {
        if volumes.is_empty() || !volumes.iter().all(BoundingSphere::is_finite) {
            return false;
        }

        let total = volumes
            .iter()
            .map(|sphere| {
                let (lo, hi) = self.sphere_cells(sphere);
                (i64::from(hi.0) - i64::from(lo.0) + 1)
                    .saturating_mul(i64::from(hi.1) - i64::from(lo.1) + 1)
            })
            .fold(0, i64::saturating_add);
        total <= MAX_CELLS_PER_ITEM
    }

    #[allow(clippy::cast_possible_truncation)]
    fn sphere_cells(&self, sphere: &BoundingSphere) -> ((i32, i32), (i32, i32)) {
        let cell = |v: f32| (v / self.cell_size).floor() as i32;
        let r = sphere.radius.abs();
        (
            (cell(sphere.center.x - r), cell(sphere.center.y - r)),
            (cell(sphere.center.x + r), cell(sphere.center.y + r)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn sphere(x: f32, y: f32, radius: f32) -> Vec<BoundingSphere> {
        vec![BoundingSphere::new(Vec3::new(x, y, 0.0), radius)]
    }

    #[test]
    fn test_query_returns_neighbours_only() {
        let mut grid = SpatialGrid::new(10.0);
        grid.insert(1u32, &sphere(1.0, 1.0, 1.0));
        grid.insert(2u32, &sphere(-40.0, 40.0, 1.0));
        grid.insert(3u32, &sphere(9.5, 1.0, 1.0));

        let found = grid.query(&sphere(2.0, 2.0, 1.0));
        assert_eq!(found, vec![1, 3]);
        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn test_query_deduplicates_and_sorts() {
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(9u32, &sphere(0.0, 0.0, 3.0));
        grid.insert(4u32, &sphere(0.5, 0.5, 3.0));

        assert_eq!(grid.query(&sphere(0.0, 0.0, 2.0)), vec![4, 9]);
    }

    #[test]
    fn test_oversized_items_are_always_candidates() {
        let mut grid = SpatialGrid::new(1.0);
        grid.insert(7u32, &sphere(0.0, 0.0, 1000.0));
        grid.insert(8u32, &sphere(f32::NAN, 0.0, 1.0));

        assert_eq!(grid.query(&sphere(40.0, 40.0, 0.5)), vec![7, 8]);
    }

    #[test]
    fn test_clear_empties_grid() {
        let mut grid = SpatialGrid::new(5.0);
        grid.insert(1u32, &sphere(0.0, 0.0, 1.0));
        grid.clear();

        assert!(grid.is_empty());
        assert!(grid.query(&sphere(0.0, 0.0, 1.0)).is_empty());
    }
}

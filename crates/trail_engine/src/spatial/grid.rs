//! Uniform bucket grid over the world's horizontal plane
//!
//! The grid is the broad phase for tomb collisions: each cell holds the
//! payloads inserted at world positions inside it, and a query gathers the
//! block of cells around a position. World `(x, z)` maps to
//! `(row, col) = (floor(z / cell_width), floor(x / cell_width))`.
//!
//! Anything outside `[0, row_count) x [0, column_count)` is silently ignored:
//! inserts do nothing and lookups come back empty.

use log::trace;

/// Neighbourhood radius used by collision queries (a 3x3 block)
pub const DEFAULT_NEIGHBOR_RADIUS: i32 = 1;

/// Fixed-size 2D grid of payload buckets
#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    row_count: i32,
    column_count: i32,
    cell_width: f32,
    cells: Vec<Vec<T>>,
}

impl<T> SpatialGrid<T> {
    /// Create a grid of `row_count * column_count` empty cells.
    ///
    /// # Panics
    ///
    /// Panics if `cell_width` is not a positive finite number.
    pub fn new(row_count: u16, column_count: u16, cell_width: f32) -> Self {
        assert!(
            cell_width.is_finite() && cell_width > 0.0,
            "cell width must be positive and finite, got {cell_width}"
        );

        let cell_count = usize::from(row_count) * usize::from(column_count);
        let mut cells = Vec::with_capacity(cell_count);
        cells.resize_with(cell_count, Vec::new);

        Self {
            row_count: i32::from(row_count),
            column_count: i32::from(column_count),
            cell_width,
            cells,
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> i32 {
        self.row_count
    }

    /// Number of columns
    pub fn column_count(&self) -> i32 {
        self.column_count
    }

    /// World units covered by one cell along each axis
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Cell containing world `(x, z)`, or `None` for non-finite coordinates.
    ///
    /// The returned cell may still lie outside the grid.
    pub fn cell_of(&self, x_world: f32, z_world: f32) -> Option<(i32, i32)> {
        if !x_world.is_finite() || !z_world.is_finite() {
            return None;
        }
        // Saturating casts keep far-away coordinates out of range instead of wrapping
        let row = (z_world / self.cell_width).floor() as i32;
        let col = (x_world / self.cell_width).floor() as i32;
        Some((row, col))
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || row >= self.row_count || col < 0 || col >= self.column_count {
            return None;
        }
        let (row, col) = (usize::try_from(row).ok()?, usize::try_from(col).ok()?);
        let columns = usize::try_from(self.column_count).ok()?;
        Some(row * columns + col)
    }

    /// Append `value` to cell `(row, col)`; returns false (and does nothing) when out of range
    pub fn insert_grid(&mut self, row: i32, col: i32, value: T) -> bool {
        match self.index(row, col) {
            Some(index) => {
                self.cells[index].push(value);
                true
            }
            None => {
                trace!("Ignoring insert outside grid at cell ({row}, {col})");
                false
            }
        }
    }

    /// Append `value` to the cell containing world `(x, z)`
    pub fn insert_world(&mut self, x_world: f32, z_world: f32, value: T) -> bool {
        match self.cell_of(x_world, z_world) {
            Some((row, col)) => self.insert_grid(row, col, value),
            None => false,
        }
    }

    /// Values stored in cell `(row, col)`, empty when out of range
    pub fn retrieve_grid(&self, row: i32, col: i32) -> &[T] {
        match self.index(row, col) {
            Some(index) => &self.cells[index],
            None => &[],
        }
    }

    /// Values stored in the cell containing world `(x, z)`
    pub fn retrieve_world(&self, x_world: f32, z_world: f32) -> &[T] {
        match self.cell_of(x_world, z_world) {
            Some((row, col)) => self.retrieve_grid(row, col),
            None => &[],
        }
    }

    /// Total number of values indexed across all cells
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// True when no cell holds a value
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }

    /// Empty every cell, keeping the grid dimensions
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }
}

impl<T: Clone> SpatialGrid<T> {
    /// Concatenate the `(2 * radius + 1)^2` block of cells centred on `(row, col)`.
    ///
    /// Rows are visited from `row - radius` to `row + radius`, and within a
    /// row, columns from `col - radius` to `col + radius`. Cells outside the
    /// grid contribute nothing. Negative radii yield an empty result.
    pub fn retrieve_neighbors_grid(&self, row: i32, col: i32, radius: i32) -> Vec<T> {
        let mut neighbors = Vec::new();
        if radius < 0 {
            return neighbors;
        }
        // Only cells inside the grid can hold values
        let rows = row.saturating_sub(radius).max(0)..=row.saturating_add(radius).min(self.row_count - 1);
        let cols = col.saturating_sub(radius).max(0)..=col.saturating_add(radius).min(self.column_count - 1);
        for r in rows {
            for c in cols.clone() {
                neighbors.extend_from_slice(self.retrieve_grid(r, c));
            }
        }
        neighbors
    }

    /// World-coordinate form of [`Self::retrieve_neighbors_grid`]
    pub fn retrieve_neighbors_world(&self, x_world: f32, z_world: f32, radius: i32) -> Vec<T> {
        self.cell_of(x_world, z_world)
            .map_or_else(Vec::new, |(row, col)| self.retrieve_neighbors_grid(row, col, radius))
    }
}

impl<T: PartialEq> SpatialGrid<T> {
    /// Remove the first value equal to `value` from cell `(row, col)`.
    ///
    /// The remaining values keep their order. Returns whether a value was removed.
    pub fn remove_grid(&mut self, row: i32, col: i32, value: &T) -> bool {
        let Some(index) = self.index(row, col) else {
            return false;
        };
        let cell = &mut self.cells[index];
        match cell.iter().position(|v| v == value) {
            Some(position) => {
                cell.remove(position);
                true
            }
            None => false,
        }
    }

    /// Remove `value` from the cell containing world `(x, z)`
    pub fn remove_world(&mut self, x_world: f32, z_world: f32, value: &T) -> bool {
        match self.cell_of(x_world, z_world) {
            Some((row, col)) => self.remove_grid(row, col, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_grid() -> SpatialGrid<u32> {
        SpatialGrid::new(18, 18, 250.0)
    }

    #[test]
    fn test_insert_then_retrieve_every_cell() {
        let mut grid = world_grid();
        for row in 0..18 {
            for col in 0..18 {
                let value = (row * 18 + col) as u32;
                assert!(grid.insert_grid(row, col, value));
                assert!(grid.retrieve_grid(row, col).contains(&value));
            }
        }
        assert_eq!(grid.len(), 18 * 18);
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut grid = world_grid();
        for (row, col) in [(-1, 0), (0, -1), (18, 0), (0, 18), (18, 18), (i32::MAX, i32::MIN)] {
            assert!(!grid.insert_grid(row, col, 7));
            assert!(grid.retrieve_grid(row, col).is_empty());
        }
        assert!(grid.is_empty());

        assert!(!grid.insert_world(-1.0, 10.0, 7));
        assert!(!grid.insert_world(4500.0, 10.0, 7));
        assert!(!grid.insert_world(f32::NAN, 10.0, 7));
        assert!(grid.retrieve_world(f32::INFINITY, 0.0).is_empty());
        assert!(grid.is_empty());
    }

    #[test]
    fn test_world_coordinates_map_x_to_column_and_z_to_row() {
        let mut grid = world_grid();
        grid.insert_world(260.0, 510.0, 1);

        assert_eq!(grid.cell_of(260.0, 510.0), Some((2, 1)));
        assert_eq!(grid.retrieve_grid(2, 1), &[1]);
        assert_eq!(grid.retrieve_world(499.9, 749.9), &[1]);
        assert!(grid.retrieve_grid(1, 2).is_empty());
    }

    #[test]
    fn test_neighbors_include_center_cell() {
        let mut grid = world_grid();
        grid.insert_grid(9, 9, 1);
        grid.insert_grid(9, 9, 2);

        let neighbors = grid.retrieve_neighbors_grid(9, 9, DEFAULT_NEIGHBOR_RADIUS);
        assert!(neighbors.contains(&1));
        assert!(neighbors.contains(&2));
    }

    #[test]
    fn test_neighbors_are_row_major() {
        let mut grid = world_grid();
        grid.insert_grid(4, 5, 5);
        grid.insert_grid(6, 6, 9);
        grid.insert_grid(4, 4, 1);
        grid.insert_grid(5, 4, 4);
        grid.insert_grid(5, 5, 50);
        grid.insert_grid(5, 5, 51);
        // Outside a radius-1 block around (5, 5)
        grid.insert_grid(7, 5, 99);

        assert_eq!(grid.retrieve_neighbors_grid(5, 5, 1), vec![1, 5, 4, 50, 51, 9]);
        assert_eq!(grid.retrieve_neighbors_grid(5, 5, 0), vec![50, 51]);
        assert!(grid.retrieve_neighbors_grid(5, 5, -1).is_empty());
        assert!(grid.retrieve_neighbors_grid(5, 5, 2).contains(&99));
    }

    #[test]
    fn test_neighbors_at_corner_skip_missing_cells() {
        let mut grid = world_grid();
        grid.insert_grid(0, 0, 1);
        grid.insert_grid(1, 1, 2);
        assert_eq!(grid.retrieve_neighbors_world(10.0, 10.0, 1), vec![1, 2]);
    }

    #[test]
    fn test_wide_radius_only_visits_grid_cells() {
        let mut grid = world_grid();
        grid.insert_grid(17, 0, 3);
        grid.insert_grid(0, 17, 2);
        grid.insert_grid(0, 0, 1);

        assert_eq!(grid.retrieve_neighbors_grid(9, 9, 100_000), vec![1, 2, 3]);
        assert_eq!(grid.retrieve_neighbors_grid(9, 9, i32::MAX), vec![1, 2, 3]);
        assert_eq!(grid.retrieve_neighbors_grid(-500, 9, 100_000), vec![1, 2, 3]);
        assert!(grid.retrieve_neighbors_grid(-5, -5, 1).is_empty());
    }

    #[test]
    fn test_remove_keeps_order_of_remaining_values() {
        let mut grid = world_grid();
        for v in [1, 2, 3, 2] {
            grid.insert_world(2250.0, 2250.0, v);
        }

        assert!(grid.remove_world(2250.0, 2250.0, &2));
        assert_eq!(grid.retrieve_world(2250.0, 2250.0), &[1, 3, 2]);
        assert!(!grid.remove_world(2250.0, 2250.0, &7));
        assert!(!grid.remove_grid(-1, 0, &1));

        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.row_count(), 18);
    }
}

//! Toroidal grid storage shared by heights, normals and colors.

use super::TerrainError;

/// Square lattice of `size * size` cells addressed with wrap-around.
///
/// `size` is always a power of two, so any signed coordinate is mapped back
/// into `[0, size)` with the bitmask `coord & (size - 1)`. Cells are stored
/// with `x` as the outer index, which makes storage order equal to vertex
/// order in the assembled mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Create a grid filled with `T::default()`.
    pub fn new(size: usize) -> Result<Self, TerrainError> {
        check_size(size)?;
        Ok(Self {
            size,
            cells: vec![T::default(); size * size],
        })
    }

    /// Wrap existing cell values. `cells` must hold exactly `size * size` values.
    pub fn from_cells(size: usize, cells: Vec<T>) -> Result<Self, TerrainError> {
        check_size(size)?;
        if cells.len() != size * size {
            return Err(TerrainError::invalid(
                "cells",
                format!(
                    "expected {} values for a {}x{} grid, got {}",
                    size * size,
                    size,
                    size,
                    cells.len()
                ),
            ));
        }
        Ok(Self { size, cells })
    }

    /// Same as [`Grid::from_cells`] for sizes and lengths already known to be valid.
    pub(crate) fn from_parts(size: usize, cells: Vec<T>) -> Self {
        debug_assert!(size.is_power_of_two() && cells.len() == size * size);
        Self { size, cells }
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells in storage order.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn get(&self, x: isize, z: isize) -> T {
        self.cells[self.index(x, z)]
    }

    pub fn set(&mut self, x: isize, z: isize, value: T) {
        let idx = self.index(x, z);
        self.cells[idx] = value;
    }

    /// Build a new grid of the same size from every cell of this one.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        U: Copy + Default,
        F: FnMut(&T) -> U,
    {
        Grid {
            size: self.size,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    /// Apply `f` to every cell in place.
    pub fn for_each_mut<F: FnMut(&mut T)>(&mut self, f: F) {
        self.cells.iter_mut().for_each(f);
    }

    #[inline]
    fn index(&self, x: isize, z: isize) -> usize {
        let mask = self.size - 1;
        // Two's complement makes the mask correct for negative coordinates too.
        ((x as usize) & mask) * self.size + ((z as usize) & mask)
    }
}

fn check_size(size: usize) -> Result<(), TerrainError> {
    if size < 2 || !size.is_power_of_two() {
        return Err(TerrainError::invalid(
            "size",
            format!("grid size must be a power of two >= 2, got {}", size),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_zeroed() {
        let grid: Grid<f32> = Grid::new(4).unwrap();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.cells().len(), 16);
        assert!(grid.cells().iter().all(|&h| h == 0.0));
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        assert!(Grid::<f32>::new(6).is_err());
        assert!(Grid::<f32>::new(1).is_err());
        assert!(Grid::<f32>::new(0).is_err());
    }

    #[test]
    fn test_from_cells_length_mismatch() {
        let result = Grid::from_cells(4, vec![0.0f32; 15]);
        assert!(matches!(result, Err(TerrainError::InvalidParameter { .. })));
    }

    #[test]
    fn test_wraps_positive_and_negative_coordinates() {
        let mut grid: Grid<f32> = Grid::new(8).unwrap();
        grid.set(3, 5, 7.5);

        assert_eq!(grid.get(3 + 8, 5), 7.5);
        assert_eq!(grid.get(3, 5 + 16), 7.5);
        assert_eq!(grid.get(3 - 8, 5 - 8), 7.5);
        assert_eq!(grid.get(-5, -3), 7.5);
    }

    #[test]
    fn test_set_through_wrapped_coordinate() {
        let mut grid: Grid<f32> = Grid::new(4).unwrap();
        grid.set(-1, 4, 2.0);
        assert_eq!(grid.get(3, 0), 2.0);
    }

    #[test]
    fn test_storage_order_is_x_major() {
        let cells: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let grid = Grid::from_cells(4, cells).unwrap();
        // index = x * size + z
        assert_eq!(grid.get(1, 2), 6.0);
        assert_eq!(grid.get(3, 0), 12.0);
    }

    #[test]
    fn test_map_preserves_size() {
        let grid = Grid::from_cells(2, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
        let doubled = grid.map(|h| h * 2.0);
        assert_eq!(doubled.size(), 2);
        assert_eq!(doubled.cells(), &[2.0, 4.0, 6.0, 8.0]);
    }
}

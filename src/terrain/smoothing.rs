//! Kernel convolution over toroidal grids.

use std::ops::{Add, Mul};

use super::grid::Grid;
use super::kernel::Kernel;

/// Convolve `grid` with `kernel`, wrapping neighbours around the grid edges.
///
/// The result is written to a fresh grid, so every output cell sees only
/// pre-smoothing values. Vector cells are weighted component-wise.
pub fn convolve<T>(grid: &Grid<T>, kernel: &Kernel) -> Grid<T>
where
    T: Copy + Default + Add<Output = T> + Mul<f32, Output = T>,
{
    let size = grid.size() as isize;
    let radius = kernel.radius() as isize;
    let mut cells = Vec::with_capacity(grid.cells().len());

    for x in 0..size {
        for z in 0..size {
            let mut acc = T::default();
            for row in 0..kernel.size() {
                let dx = row as isize - radius;
                for col in 0..kernel.size() {
                    let dz = col as isize - radius;
                    acc = acc + grid.get(x + dx, z + dz) * kernel.weight(row, col);
                }
            }
            cells.push(acc);
        }
    }

    Grid::from_parts(grid.size(), cells)
}

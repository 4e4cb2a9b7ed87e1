//! Diamond-square height-field generation over a periodic grid.

use rand::Rng;

use super::grid::Grid;
use super::TerrainError;

/// Run diamond-square subdivision on a `size * size` toroidal grid.
///
/// No corners are seeded: with wrap-around addressing the cell at `(0, 0)`
/// stands in for all four corners, so the subdivision starts straight away
/// at `step = size`. Each level perturbs new points by a uniform draw from
/// `[-range, range]`, after which the range is multiplied by `deviance`.
pub fn diamond_square<R: Rng + ?Sized>(
    size: usize,
    initial_range: f32,
    deviance: f32,
    rng: &mut R,
) -> Result<Grid<f32>, TerrainError> {
    let mut heights = Grid::new(size)?;
    let size = size as isize;
    let mut step = size;
    let mut range = initial_range.abs();

    while step > 1 {
        let half = step / 2;

        // Diamond: cell centers from their diagonal neighbours.
        for z in (half..size + half).step_by(step as usize) {
            for x in (half..size + half).step_by(step as usize) {
                let avg = average([
                    heights.get(x - half, z - half),
                    heights.get(x + half, z - half),
                    heights.get(x - half, z + half),
                    heights.get(x + half, z + half),
                ]);
                heights.set(x, z, avg + displacement(rng, range));
            }
        }

        // Square: edge midpoints from their orthogonal neighbours.
        for z in (0..size).step_by(step as usize) {
            for x in (0..size).step_by(step as usize) {
                let mx = x + half;
                let avg = average([
                    heights.get(mx - half, z),
                    heights.get(mx + half, z),
                    heights.get(mx, z - half),
                    heights.get(mx, z + half),
                ]);
                heights.set(mx, z, avg + displacement(rng, range));

                let mz = z + half;
                let avg = average([
                    heights.get(x - half, mz),
                    heights.get(x + half, mz),
                    heights.get(x, mz - half),
                    heights.get(x, mz + half),
                ]);
                heights.set(x, mz, avg + displacement(rng, range));
            }
        }

        log::trace!("diamond-square level step={} range={}", step, range);
        step /= 2;
        range *= deviance.abs();
    }

    Ok(heights)
}

#[inline]
fn average(values: [f32; 4]) -> f32 {
    values.iter().sum::<f32>() / 4.0
}

#[inline]
fn displacement<R: Rng + ?Sized>(rng: &mut R, range: f32) -> f32 {
    if range == 0.0 {
        0.0
    } else {
        // `-range..=range` overflows for ranges above half of f32::MAX.
        rng.gen_range(-1.0f32..=1.0) * range
    }
}

//! Per-vertex normals from forward differences of the height grid.

use glam::Vec3;

use super::grid::Grid;

/// Unit normal of the triangle `p1, p2, p3`, or straight up when the edges are parallel.
pub fn surface_normal(p1: Vec3, p2: Vec3, p3: Vec3) -> Vec3 {
    try_surface_normal(p1, p2, p3).unwrap_or(Vec3::Y)
}

fn try_surface_normal(p1: Vec3, p2: Vec3, p3: Vec3) -> Option<Vec3> {
    let v1 = p2 - p1;
    let v2 = p3 - p1;
    v1.cross(v2).try_normalize()
}

/// Normal for every vertex of `heights`.
///
/// Vertex `(i, j)` sits at `(i / size, h, j / size)`. Its neighbours at
/// `(i, j + 1)` and `(i + 1, j)` read their heights through the wrapped grid
/// but keep their unwrapped coordinates, so the last row and column use the
/// first row and column as their forward neighbours.
pub fn estimate_normals(heights: &Grid<f32>) -> Grid<Vec3> {
    let size = heights.size() as isize;
    let position = |i: isize, j: isize| {
        Vec3::new(
            i as f32 / size as f32,
            heights.get(i, j),
            j as f32 / size as f32,
        )
    };

    let mut degenerate = 0usize;
    let mut cells = Vec::with_capacity(heights.cells().len());
    for i in 0..size {
        for j in 0..size {
            let n = try_surface_normal(position(i, j), position(i, j + 1), position(i + 1, j))
                .unwrap_or_else(|| {
                    degenerate += 1;
                    Vec3::Y
                });
            cells.push(n);
        }
    }

    if degenerate > 0 {
        log::trace!("{} degenerate normals replaced with +Y", degenerate);
    }

    Grid::from_parts(heights.size(), cells)
}

/// Re-normalize every normal in place, e.g. after smoothing.
pub fn renormalize(normals: &mut Grid<Vec3>) {
    normals.for_each_mut(|n| *n = n.try_normalize().unwrap_or(Vec3::Y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::heightfield::diamond_square;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_flat_grid_points_up() {
        let heights = Grid::from_cells(4, vec![0.25f32; 16]).unwrap();
        let normals = estimate_normals(&heights);
        for n in normals.cells() {
            assert!((*n - Vec3::Y).length() < EPS);
        }
    }

    #[test]
    fn test_parallel_edges_fall_back_to_up() {
        let p1 = Vec3::ZERO;
        let p2 = Vec3::new(1.0, 1.0, 0.0);
        let p3 = Vec3::new(2.0, 2.0, 0.0);
        assert_eq!(surface_normal(p1, p2, p3), Vec3::Y);
    }

    #[test]
    fn test_coincident_points_fall_back_to_up() {
        let p = Vec3::new(0.3, 0.1, 0.7);
        assert_eq!(surface_normal(p, p, p), Vec3::Y);
    }

    #[test]
    fn test_nan_height_falls_back_to_up() {
        let p1 = Vec3::new(0.0, f32::NAN, 0.0);
        let n = surface_normal(p1, Vec3::Z, Vec3::X);
        assert_eq!(n, Vec3::Y);
    }

    #[test]
    fn test_generated_normals_are_unit_and_face_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let heights = diamond_square(32, 0.3, 0.5, &mut rng).unwrap();
        let normals = estimate_normals(&heights);

        for n in normals.cells() {
            assert!((n.length() - 1.0).abs() < 1e-4, "normal {:?} not unit", n);
            assert!(n.y > 0.0, "normal {:?} points down", n);
        }
    }

    #[test]
    fn test_slope_tilts_normal_away_from_rise() {
        // Heights rise along +x, so the normal leans toward -x.
        let cells = (0..16).map(|v| (v / 4) as f32 * 0.1).collect();
        let heights = Grid::from_cells(4, cells).unwrap();
        let normals = estimate_normals(&heights);
        let n = normals.get(1, 1);
        assert!(n.x < 0.0);
        assert!(n.z.abs() < EPS);
    }

    #[test]
    fn test_last_column_uses_wrapped_height() {
        let mut heights: Grid<f32> = Grid::new(4).unwrap();
        heights.set(0, 0, 1.0);
        let normals = estimate_normals(&heights);

        // (3, 0) looks forward to (4, 0) == (0, 0), which is raised.
        let n = normals.get(3, 0);
        assert!(n.x < 0.0);
        assert!(n.y > 0.0);
    }

    #[test]
    fn test_renormalize_restores_unit_length() {
        let cells = vec![
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::ZERO,
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(0.0, 0.5, 0.5),
        ];
        let mut normals = Grid::from_cells(2, cells).unwrap();
        renormalize(&mut normals);

        assert_eq!(normals.get(0, 1), Vec3::Y);
        for n in normals.cells() {
            assert!((n.length() - 1.0).abs() < EPS);
        }
    }
}

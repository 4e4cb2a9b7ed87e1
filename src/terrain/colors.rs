//! Per-vertex colors for generated terrain.
//!
//! Every vertex starts from the base color. A [`ColorMode`] decides whether
//! height tints it, and [`add_noise`] jitters the brightness of each vertex.

use std::str::FromStr;

use glam::Vec3;
use rand::Rng;

use super::grid::Grid;

/// Height gradients for [`ColorMode::Scheme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Natural terrain colors: blue (water) → green → brown → white (snow)
    #[default]
    Terrain,
    /// Scientific heatmap: blue (cold/low) → cyan → green → yellow → red (hot/high)
    Heatmap,
    /// Single color with intensity based on height
    Monochrome,
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terrain" => Ok(ColorScheme::Terrain),
            "heatmap" => Ok(ColorScheme::Heatmap),
            "monochrome" => Ok(ColorScheme::Monochrome),
            other => Err(format!(
                "unknown color scheme '{}' (expected terrain, heatmap or monochrome)",
                other
            )),
        }
    }
}

/// How the base color is turned into a per-vertex color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ColorMode {
    /// Every vertex gets the base color.
    #[default]
    Base,
    /// Blue channel offset by `height / (2 * range)`.
    HeightTint,
    /// Height normalized over the grid and mapped through a gradient.
    Scheme(ColorScheme),
}

/// Assign a color to every vertex of `heights`.
///
/// `range` is the generation amplitude, used to scale the height tint.
pub fn assign_colors(heights: &Grid<f32>, base: Vec3, mode: ColorMode, range: f32) -> Grid<Vec3> {
    match mode {
        ColorMode::Base => heights.map(|_| base),
        ColorMode::HeightTint => {
            let spread = range.abs() * 2.0;
            if spread == 0.0 {
                return heights.map(|_| base);
            }
            heights.map(|&h| Vec3::new(base.x, base.y, base.z + h / spread))
        }
        ColorMode::Scheme(scheme) => {
            let (min, max) = bounds(heights.cells());
            let span = if (max - min).abs() < 0.0001 {
                1.0
            } else {
                max - min
            };
            heights.map(|&h| Vec3::from_array(height_to_color((h - min) / span, scheme)))
        }
    }
}

/// Add one uniform draw from `[-level, level]` to all three channels of each color.
pub fn add_noise<R: Rng + ?Sized>(colors: &mut Grid<Vec3>, level: f32, rng: &mut R) {
    let level = level.abs();
    if level == 0.0 || !level.is_finite() {
        return;
    }
    colors.for_each_mut(|c| *c += Vec3::splat(rng.gen_range(-1.0f32..=1.0) * level));
}

/// Convert normalized height (0.0-1.0) to RGB color based on scheme.
pub fn height_to_color(t: f32, scheme: ColorScheme) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    match scheme {
        ColorScheme::Terrain => terrain_color(t),
        ColorScheme::Heatmap => heatmap_color(t),
        ColorScheme::Monochrome => monochrome_color(t),
    }
}

fn bounds(values: &[f32]) -> (f32, f32) {
    let (min, max) = values
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if min > max {
        (0.0, 0.0)
    } else {
        (min, max)
    }
}

fn terrain_color(t: f32) -> [f32; 3] {
    if t < 0.3 {
        // water
        let s = t / 0.3;
        [0.0, s * 0.5, 0.8 + s * 0.2]
    } else if t < 0.5 {
        let s = (t - 0.3) / 0.2;
        [s * 0.2, 0.5 + s * 0.3, 1.0 - s * 0.6]
    } else if t < 0.8 {
        let s = (t - 0.5) / 0.3;
        [0.2 + s * 0.4, 0.8 - s * 0.4, 0.4 - s * 0.3]
    } else {
        // snow
        let s = (t - 0.8) / 0.2;
        [0.6 + s * 0.4, 0.4 + s * 0.6, 0.1 + s * 0.9]
    }
}

fn heatmap_color(t: f32) -> [f32; 3] {
    let s = (t % 0.25) / 0.25;
    match (t / 0.25) as u32 {
        0 => [0.0, s, 1.0],
        1 => [0.0, 1.0, 1.0 - s],
        2 => [s, 1.0, 0.0],
        3 => [1.0, 1.0 - s, 0.0],
        _ => [1.0, 0.0, 0.0],
    }
}

fn monochrome_color(t: f32) -> [f32; 3] {
    let v = 0.1 + t * 0.9;
    [v, v, v]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn slope() -> Grid<f32> {
        let cells = (0..16).map(|v| v as f32 / 15.0 - 0.5).collect();
        Grid::from_cells(4, cells).unwrap()
    }

    // ==================== Color Mode Tests ====================

    #[test]
    fn test_base_mode_copies_base_color() {
        let base = Vec3::new(1.0, 0.0, 0.0);
        let colors = assign_colors(&slope(), base, ColorMode::Base, 1.0);
        assert!(colors.cells().iter().all(|&c| c == base));
    }

    #[test]
    fn test_height_tint_only_touches_blue() {
        let base = Vec3::new(0.2, 0.6, 0.3);
        let heights = slope();
        let colors = assign_colors(&heights, base, ColorMode::HeightTint, 0.5);

        for (c, &h) in colors.cells().iter().zip(heights.cells()) {
            assert_eq!(c.x, 0.2);
            assert_eq!(c.y, 0.6);
            assert!((c.z - (0.3 + h)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_height_tint_with_zero_range_is_base() {
        let base = Vec3::new(0.1, 0.2, 0.3);
        let colors = assign_colors(&slope(), base, ColorMode::HeightTint, 0.0);
        assert!(colors.cells().iter().all(|&c| c == base));
    }

    #[test]
    fn test_scheme_spans_gradient() {
        let colors = assign_colors(
            &slope(),
            Vec3::ZERO,
            ColorMode::Scheme(ColorScheme::Monochrome),
            1.0,
        );
        let lowest = colors.get(0, 0);
        let highest = colors.get(3, 3);
        assert!((lowest.x - 0.1).abs() < 1e-5);
        assert!((highest.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_scheme_on_flat_grid() {
        let heights = Grid::from_cells(2, vec![0.5f32; 4]).unwrap();
        let colors = assign_colors(
            &heights,
            Vec3::ZERO,
            ColorMode::Scheme(ColorScheme::Terrain),
            1.0,
        );
        let expected = Vec3::from_array(height_to_color(0.0, ColorScheme::Terrain));
        assert!(colors.cells().iter().all(|&c| c == expected));
    }

    // ==================== Noise Tests ====================

    #[test]
    fn test_noise_shifts_channels_equally() {
        let base = Vec3::new(0.5, 0.25, 0.75);
        let mut colors = assign_colors(&slope(), base, ColorMode::Base, 1.0);
        add_noise(&mut colors, 0.1, &mut ChaCha8Rng::seed_from_u64(4));

        for c in colors.cells() {
            let shift = *c - base;
            assert!(shift.x.abs() <= 0.1 + 1e-6);
            assert!((shift.x - shift.y).abs() < 1e-6);
            assert!((shift.x - shift.z).abs() < 1e-6);
        }
        assert!(colors.cells().iter().any(|&c| c != base));
    }

    #[test]
    fn test_zero_noise_is_noop() {
        let base = Vec3::new(1.0, 0.0, 0.0);
        let mut colors = assign_colors(&slope(), base, ColorMode::Base, 1.0);
        add_noise(&mut colors, 0.0, &mut ChaCha8Rng::seed_from_u64(4));
        assert!(colors.cells().iter().all(|&c| c == base));
    }

    #[test]
    fn test_huge_finite_noise_level() {
        let base = Vec3::new(0.5, 0.5, 0.5);
        let mut colors = assign_colors(&slope(), base, ColorMode::Base, 1.0);
        add_noise(&mut colors, 3e38, &mut ChaCha8Rng::seed_from_u64(6));

        assert_eq!(colors.size(), 4);
        assert!(colors.cells().iter().any(|&c| c != base));
    }

    // ==================== Gradient Tests ====================

    #[test]
    fn test_terrain_low_is_bluish() {
        let color = height_to_color(0.0, ColorScheme::Terrain);
        assert!(color[2] > color[0], "Low terrain should be bluish");
        assert!(color[2] > color[1], "Blue > Green at low heights");
    }

    #[test]
    fn test_terrain_high_is_whitish() {
        let color = height_to_color(1.0, ColorScheme::Terrain);
        assert!(color.iter().all(|&c| c > 0.9), "High terrain should be near white");
    }

    #[test]
    fn test_heatmap_ends() {
        let low = height_to_color(0.0, ColorScheme::Heatmap);
        let high = height_to_color(1.0, ColorScheme::Heatmap);
        assert!(low[2] > low[0], "Low heatmap should be blue");
        assert!(high[0] > high[2], "High heatmap should be red");
    }

    #[test]
    fn test_heatmap_mid_is_greenish() {
        let color = height_to_color(0.5, ColorScheme::Heatmap);
        assert!(color[1] > 0.5);
    }

    #[test]
    fn test_monochrome_is_grayscale() {
        let color = height_to_color(0.5, ColorScheme::Monochrome);
        assert_eq!(color[0], color[1]);
        assert_eq!(color[0], color[2]);
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(
            height_to_color(-0.5, ColorScheme::Terrain),
            height_to_color(0.0, ColorScheme::Terrain)
        );
        assert_eq!(
            height_to_color(1.5, ColorScheme::Heatmap),
            height_to_color(1.0, ColorScheme::Heatmap)
        );
    }

    #[test]
    fn test_parse_scheme() {
        assert_eq!("Heatmap".parse::<ColorScheme>(), Ok(ColorScheme::Heatmap));
        assert_eq!(" terrain ".parse::<ColorScheme>(), Ok(ColorScheme::Terrain));
        assert!("sepia".parse::<ColorScheme>().is_err());
    }
}

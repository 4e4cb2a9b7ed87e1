//! Fractal terrain generation.
//!
//! This module provides:
//! - [`FractalParameters`] - Per-generation settings (depth, range, deviance, color)
//! - [`PipelineConfig`] - Optional smoothing and noise stages
//! - [`Terrain`] - The generated grids and the mesh built from them
//! - [`Kernel`] - Gaussian and box convolution kernels

pub mod colors;
pub mod grid;
pub mod heightfield;
pub mod kernel;
pub mod mesh;
pub mod normals;
pub mod smoothing;

use glam::Vec3;
use rand::Rng;
use thiserror::Error;

pub use colors::{ColorMode, ColorScheme};
pub use grid::Grid;
pub use kernel::{box_kernel, gaussian_kernel, Kernel, KernelSpec};
pub use mesh::{TerrainMesh, Vertex, FLOATS_PER_VERTEX};

/// Largest accepted depth; keeps `size²` well inside the `u32` index range.
pub const MAX_DEPTH: u32 = 15;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("Invalid {parameter}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },
}

impl TerrainError {
    pub(crate) fn invalid(parameter: &'static str, message: impl Into<String>) -> Self {
        TerrainError::InvalidParameter {
            parameter,
            message: message.into(),
        }
    }
}

/// Settings for one diamond-square generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParameters {
    /// Number of subdivision levels; the grid side is `2^depth`.
    pub depth: u32,
    /// Displacement amplitude at the coarsest level.
    pub initial_range: f32,
    /// Factor applied to the amplitude after every level.
    pub deviance: f32,
    pub base_color: Vec3,
}

impl Default for FractalParameters {
    fn default() -> Self {
        Self {
            depth: 6,
            initial_range: 0.2,
            deviance: 0.5,
            base_color: Vec3::new(0.2, 0.6, 0.3),
        }
    }
}

impl FractalParameters {
    /// Grid side length, `2^depth`, or `None` when it does not fit in `usize`.
    pub fn size(&self) -> Option<usize> {
        1usize.checked_shl(self.depth)
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.depth < 1 || self.depth > MAX_DEPTH {
            return Err(TerrainError::invalid(
                "depth",
                format!("must be between 1 and {}, got {}", MAX_DEPTH, self.depth),
            ));
        }
        if !self.initial_range.is_finite() {
            return Err(TerrainError::invalid(
                "initial range",
                format!("must be finite, got {}", self.initial_range),
            ));
        }
        if !self.deviance.is_finite() {
            return Err(TerrainError::invalid(
                "deviance",
                format!("must be finite, got {}", self.deviance),
            ));
        }
        Ok(())
    }
}

/// Optional stages run after the height field is generated.
///
/// Stages always run in this order: smooth positions, normals, smooth
/// normals, colors, smooth colors, noise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub smooth_positions: bool,
    pub smooth_normals: bool,
    pub smooth_colors: bool,
    pub add_noise: bool,
    pub position_kernel: KernelSpec,
    pub normal_kernel: KernelSpec,
    pub color_kernel: KernelSpec,
    pub noise_level: f32,
    pub color_mode: ColorMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smooth_positions: false,
            smooth_normals: false,
            smooth_colors: false,
            add_noise: false,
            position_kernel: KernelSpec::Gaussian {
                size: 5,
                sigma: 1.0,
            },
            normal_kernel: KernelSpec::Box { size: 3 },
            color_kernel: KernelSpec::Gaussian {
                size: 5,
                sigma: 1.0,
            },
            noise_level: 0.05,
            color_mode: ColorMode::Base,
        }
    }
}

/// A generated terrain: height, normal and color grids plus the mesh built from them.
///
/// Every generation builds a new `Terrain`; post-processing methods replace
/// the affected grids and rebuild the mesh before returning.
#[derive(Debug, Clone)]
pub struct Terrain {
    params: FractalParameters,
    heights: Grid<f32>,
    normals: Grid<Vec3>,
    colors: Grid<Vec3>,
    mesh: TerrainMesh,
}

/// Generate a terrain with the default pipeline and a thread-local RNG.
pub fn generate(params: FractalParameters) -> Result<Terrain, TerrainError> {
    Terrain::generate(params)
}

impl Terrain {
    /// Generate a terrain with the default pipeline and a thread-local RNG.
    pub fn generate(params: FractalParameters) -> Result<Self, TerrainError> {
        Self::generate_with(params, &PipelineConfig::default(), &mut rand::thread_rng())
    }

    /// Run the full pipeline with an explicit configuration and random source.
    ///
    /// All kernels are built before any work starts, so an invalid
    /// configuration fails without producing partial buffers.
    pub fn generate_with<R: Rng + ?Sized>(
        params: FractalParameters,
        config: &PipelineConfig,
        rng: &mut R,
    ) -> Result<Self, TerrainError> {
        params.validate()?;
        let position_kernel = stage_kernel(config.smooth_positions, &config.position_kernel)?;
        let normal_kernel = stage_kernel(config.smooth_normals, &config.normal_kernel)?;
        let color_kernel = stage_kernel(config.smooth_colors, &config.color_kernel)?;

        let size = params
            .size()
            .ok_or_else(|| TerrainError::invalid("depth", "grid size overflows usize"))?;
        log::debug!(
            "generating {}x{} terrain (depth {}, range {}, deviance {})",
            size,
            size,
            params.depth,
            params.initial_range,
            params.deviance
        );

        let mut heights =
            heightfield::diamond_square(size, params.initial_range, params.deviance, rng)?;
        if let Some(kernel) = &position_kernel {
            log::debug!("smoothing positions with {}x{} kernel", kernel.size(), kernel.size());
            heights = smoothing::convolve(&heights, kernel);
        }

        let mut normals = normals::estimate_normals(&heights);
        if let Some(kernel) = &normal_kernel {
            log::debug!("smoothing normals with {}x{} kernel", kernel.size(), kernel.size());
            normals = smoothing::convolve(&normals, kernel);
            normals::renormalize(&mut normals);
        }

        let mut colors = colors::assign_colors(
            &heights,
            params.base_color,
            config.color_mode,
            params.initial_range,
        );
        if let Some(kernel) = &color_kernel {
            log::debug!("smoothing colors with {}x{} kernel", kernel.size(), kernel.size());
            colors = smoothing::convolve(&colors, kernel);
        }
        if config.add_noise {
            log::debug!("adding color noise at level {}", config.noise_level);
            colors::add_noise(&mut colors, config.noise_level, rng);
        }

        let mesh = TerrainMesh::assemble(&heights, &normals, &colors);
        log::debug!(
            "assembled mesh: {} vertices, {} indices",
            mesh.vertex_count(),
            mesh.index_count()
        );

        Ok(Self {
            params,
            heights,
            normals,
            colors,
            mesh,
        })
    }

    pub fn params(&self) -> &FractalParameters {
        &self.params
    }

    pub fn depth(&self) -> u32 {
        self.params.depth
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.heights.size()
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn index_count(&self) -> usize {
        self.mesh.index_count()
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// Interleaved position, normal, color floats; 9 per vertex.
    pub fn vertex_data(&self) -> &[f32] {
        self.mesh.vertex_data()
    }

    pub fn index_data(&self) -> &[u32] {
        self.mesh.index_data()
    }

    pub fn heights(&self) -> &Grid<f32> {
        &self.heights
    }

    pub fn normals(&self) -> &Grid<Vec3> {
        &self.normals
    }

    pub fn colors(&self) -> &Grid<Vec3> {
        &self.colors
    }

    /// Height at `(x, z)`, wrapping coordinates outside the grid.
    pub fn height_at(&self, x: isize, z: isize) -> f32 {
        self.heights.get(x, z)
    }

    pub fn normal_at(&self, x: isize, z: isize) -> Vec3 {
        self.normals.get(x, z)
    }

    pub fn color_at(&self, x: isize, z: isize) -> Vec3 {
        self.colors.get(x, z)
    }

    /// Returns the minimum and maximum height values in the terrain.
    pub fn height_bounds(&self) -> (f32, f32) {
        self.heights
            .cells()
            .iter()
            .fold((f32::MAX, f32::MIN), |(min, max), &h| (min.min(h), max.max(h)))
    }

    /// Mean of all heights; renderers use it to centre the camera on the terrain.
    pub fn average_height(&self) -> f32 {
        let cells = self.heights.cells();
        cells.iter().sum::<f32>() / cells.len() as f32
    }

    /// Smooth the heights, then re-derive the normals and rebuild the mesh.
    ///
    /// Colors are kept as they are.
    pub fn smooth_heights(&mut self, kernel: &Kernel) {
        self.heights = smoothing::convolve(&self.heights, kernel);
        self.normals = normals::estimate_normals(&self.heights);
        self.rebuild_mesh();
    }

    /// Smooth the normals, re-normalize them and rebuild the mesh.
    pub fn smooth_normals(&mut self, kernel: &Kernel) {
        self.normals = smoothing::convolve(&self.normals, kernel);
        normals::renormalize(&mut self.normals);
        self.rebuild_mesh();
    }

    pub fn smooth_colors(&mut self, kernel: &Kernel) {
        self.colors = smoothing::convolve(&self.colors, kernel);
        self.rebuild_mesh();
    }

    pub fn add_color_noise<R: Rng + ?Sized>(&mut self, level: f32, rng: &mut R) {
        colors::add_noise(&mut self.colors, level, rng);
        self.rebuild_mesh();
    }

    fn rebuild_mesh(&mut self) {
        self.mesh = TerrainMesh::assemble(&self.heights, &self.normals, &self.colors);
    }
}

fn stage_kernel(enabled: bool, spec: &KernelSpec) -> Result<Option<Kernel>, TerrainError> {
    if enabled {
        spec.build().map(Some)
    } else {
        Ok(None)
    }
}

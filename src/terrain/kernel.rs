//! Convolution kernels used to smooth terrain grids.

use super::TerrainError;

/// Square matrix of normalized weights with an odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Gaussian kernel with standard deviation `sigma`, centered on the middle cell.
    pub fn gaussian(size: usize, sigma: f32) -> Result<Self, TerrainError> {
        check_kernel_size(size)?;
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(TerrainError::invalid(
                "sigma",
                format!("must be a positive finite number, got {}", sigma),
            ));
        }

        let radius = (size / 2) as f32;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let mut weights = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let dy = row as f32 - radius;
                let dx = col as f32 - radius;
                weights.push((-(dx * dx + dy * dy) / two_sigma_sq).exp());
            }
        }

        let sum: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }

        Ok(Self { size, weights })
    }

    /// Uniform kernel where every weight is `1 / size²`.
    pub fn box_filter(size: usize) -> Result<Self, TerrainError> {
        check_kernel_size(size)?;
        let weight = 1.0 / (size * size) as f32;
        Ok(Self {
            size,
            weights: vec![weight; size * size],
        })
    }

    /// Side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center cell to the edge.
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    pub fn weight(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.size + col]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

/// Build a Gaussian kernel. See [`Kernel::gaussian`].
pub fn gaussian_kernel(size: usize, sigma: f32) -> Result<Kernel, TerrainError> {
    Kernel::gaussian(size, sigma)
}

/// Build a box kernel. See [`Kernel::box_filter`].
pub fn box_kernel(size: usize) -> Result<Kernel, TerrainError> {
    Kernel::box_filter(size)
}

/// Description of a kernel, as carried by configuration before it is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelSpec {
    Gaussian { size: usize, sigma: f32 },
    Box { size: usize },
}

impl KernelSpec {
    pub fn build(&self) -> Result<Kernel, TerrainError> {
        match *self {
            KernelSpec::Gaussian { size, sigma } => Kernel::gaussian(size, sigma),
            KernelSpec::Box { size } => Kernel::box_filter(size),
        }
    }
}

fn check_kernel_size(size: usize) -> Result<(), TerrainError> {
    if size == 0 || size % 2 == 0 {
        return Err(TerrainError::invalid(
            "kernel size",
            format!("must be odd and non-zero, got {}", size),
        ));
    }
    Ok(())
}

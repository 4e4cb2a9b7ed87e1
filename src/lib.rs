//! Diamond-square fractal terrain: height fields, normals, colors and
//! GPU-ready meshes.
//!
//! ```
//! use fractal_terrain::terrain::{generate, FractalParameters};
//!
//! let terrain = generate(FractalParameters {
//!     depth: 2,
//!     ..Default::default()
//! })
//! .unwrap();
//! assert_eq!(terrain.vertex_count(), 16);
//! assert_eq!(terrain.index_count(), 54);
//! ```

pub mod export;
pub mod profile;
pub mod terrain;

pub use terrain::{generate, FractalParameters, PipelineConfig, Terrain, TerrainError};

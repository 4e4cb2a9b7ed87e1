use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use fractal_terrain::export::save_fdf;
use fractal_terrain::profile::{load_profile, Profile};
use fractal_terrain::terrain::{ColorMode, ColorScheme, Terrain};

#[derive(Parser, Debug)]
#[command(name = "fractal-terrain")]
#[command(about = "Diamond-square fractal terrain generator")]
struct Args {
    /// Path to a profile file with generation settings
    profile: Option<PathBuf>,

    /// Subdivision depth; the grid side is 2^depth
    #[arg(long)]
    depth: Option<u32>,

    /// Displacement amplitude at the coarsest level
    #[arg(long)]
    range: Option<f32>,

    /// Amplitude decay per level
    #[arg(long)]
    deviance: Option<f32>,

    /// Seed for reproducible terrain
    #[arg(long)]
    seed: Option<u64>,

    /// Height color scheme (terrain, heatmap, monochrome)
    #[arg(long)]
    scheme: Option<ColorScheme>,

    /// Write the terrain as an .fdf heightmap
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Height scale multiplier for export
    #[arg(long, default_value = "1.0")]
    height_scale: f32,
}

impl Args {
    /// Profile values with command-line overrides applied.
    fn settings(&self) -> Result<Profile> {
        let mut profile = match &self.profile {
            Some(path) => load_profile(path)
                .with_context(|| format!("loading profile {}", path.display()))?,
            None => Profile::default(),
        };

        if let Some(depth) = self.depth {
            profile.params.depth = depth;
        }
        if let Some(range) = self.range {
            profile.params.initial_range = range;
        }
        if let Some(deviance) = self.deviance {
            profile.params.deviance = deviance;
        }
        if let Some(scheme) = self.scheme {
            profile.pipeline.color_mode = ColorMode::Scheme(scheme);
        }

        Ok(profile)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = args.settings()?;

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let terrain = Terrain::generate_with(settings.params, &settings.pipeline, &mut rng)
        .context("generating terrain")?;

    let (min_h, max_h) = terrain.height_bounds();
    println!(
        "Generated terrain: {}x{} (depth {}), height range: {:.4}..{:.4}, average {:.4}",
        terrain.size(),
        terrain.size(),
        terrain.depth(),
        min_h,
        max_h,
        terrain.average_height()
    );
    println!(
        "Generated mesh: {} vertices, {} indices",
        terrain.vertex_count(),
        terrain.index_count()
    );

    if let Some(path) = &args.output {
        save_fdf(&terrain, path, args.height_scale)
            .with_context(|| format!("exporting to {}", path.display()))?;
        println!("Saved heightmap to {}", path.display());
    }

    Ok(())
}

//! Export generated terrain as an `.fdf` heightmap.
//!
//! One grid row per line, each value written as `height,0xRRGGBB`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use glam::Vec3;
use thiserror::Error;

use crate::terrain::Terrain;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid height scale {0}")]
    InvalidScale(f32),
}

/// Write `terrain` to `path`, multiplying heights by `height_scale`.
pub fn save_fdf<P: AsRef<Path>>(
    terrain: &Terrain,
    path: P,
    height_scale: f32,
) -> Result<(), ExportError> {
    check_scale(height_scale)?;
    let path = path.as_ref();
    let wrap = |source| ExportError::Write {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    write_rows(terrain, &mut writer, height_scale).map_err(wrap)?;
    writer.flush().map_err(wrap)?;

    log::info!("wrote {}x{} heightmap to {}", terrain.size(), terrain.size(), path.display());
    Ok(())
}

/// Write `terrain` in `.fdf` format to any writer.
pub fn write_fdf<W: Write>(
    terrain: &Terrain,
    writer: &mut W,
    height_scale: f32,
) -> Result<(), ExportError> {
    check_scale(height_scale)?;
    write_rows(terrain, writer, height_scale).map_err(|source| ExportError::Write {
        path: "<writer>".to_string(),
        source,
    })
}

fn check_scale(height_scale: f32) -> Result<(), ExportError> {
    if !height_scale.is_finite() {
        return Err(ExportError::InvalidScale(height_scale));
    }
    Ok(())
}

fn write_rows<W: Write>(terrain: &Terrain, writer: &mut W, height_scale: f32) -> io::Result<()> {
    let size = terrain.size() as isize;
    for z in 0..size {
        let row: Vec<String> = (0..size)
            .map(|x| {
                format!(
                    "{:.4},0x{:06X}",
                    terrain.height_at(x, z) * height_scale,
                    pack_rgb(terrain.color_at(x, z))
                )
            })
            .collect();
        writeln!(writer, "{}", row.join(" "))?;
    }
    Ok(())
}

/// Pack a color with channels in `[0, 1]` into `0xRRGGBB`.
pub fn pack_rgb(color: Vec3) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(color.x) << 16) | (channel(color.y) << 8) | channel(color.z)
}

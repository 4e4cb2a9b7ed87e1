//! Profile files: plain-text generation settings.
//!
//! A profile is a list of `key value` (or `key = value`) lines. `#` starts a
//! comment. Values are numbers; flags use `0` / `1`. Keys that only concern a
//! renderer (camera, lighting, window) are accepted and ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::terrain::{ColorMode, FractalParameters, KernelSpec, PipelineConfig};

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Cannot open file: {0}")]
    FileNotFound(String),
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Generation settings read from a profile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Profile {
    pub params: FractalParameters,
    pub pipeline: PipelineConfig,
}

const RENDERER_KEY_PREFIXES: &[&str] = &[
    "camera",
    "light",
    "wireframe",
    "background",
    "normalLength",
    "areFaces",
    "areNormals",
    "isWireframe",
    "isCulling",
    "isPointLighting",
    "isFullScreen",
];

/// Load a profile from a file.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Profile, ProfileError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|_| ProfileError::FileNotFound(path.display().to_string()))?;

    parse_profile(&content)
}

/// Parse profile content string (useful for testing)
pub fn parse_profile(content: &str) -> Result<Profile, ProfileError> {
    let values = parse_entries(content)?;
    let mut profile = Profile::default();

    for key in values.keys() {
        if !is_known_key(key) {
            log::warn!("ignoring unknown profile key '{}'", key);
        }
    }

    let params = &mut profile.params;
    if let Some(&v) = values.get("fractalDepth") {
        params.depth = to_unsigned("fractalDepth", v)?;
    }
    set_f32(&values, "fractalYRange", &mut params.initial_range);
    set_f32(&values, "fractalYDeviance", &mut params.deviance);
    set_f32(&values, "fractalColourRed", &mut params.base_color.x);
    set_f32(&values, "fractalColourGreen", &mut params.base_color.y);
    set_f32(&values, "fractalColourBlue", &mut params.base_color.z);

    let pipeline = &mut profile.pipeline;
    set_flag(&values, "isSmoothingPositionsEnabled", &mut pipeline.smooth_positions);
    set_flag(&values, "isSmoothingNormalsEnabled", &mut pipeline.smooth_normals);
    set_flag(&values, "isSmoothingColoursEnabled", &mut pipeline.smooth_colors);
    set_flag(&values, "isColourNoiseEnabled", &mut pipeline.add_noise);
    set_f32(&values, "colourNoiseLevel", &mut pipeline.noise_level);

    pipeline.position_kernel = gaussian_from(
        &values,
        "smoothPositionsKernelSize",
        "smoothPositionsSigmaValue",
        pipeline.position_kernel,
    )?;
    pipeline.color_kernel = gaussian_from(
        &values,
        "smoothColoursKernelSize",
        "smoothColoursSigmaValue",
        pipeline.color_kernel,
    )?;
    if let Some(&v) = values.get("smoothNormalsKernelSize") {
        pipeline.normal_kernel = KernelSpec::Box {
            size: to_unsigned("smoothNormalsKernelSize", v)? as usize,
        };
    }

    if values.get("isHeightTintEnabled").is_some_and(|&v| v != 0.0) {
        pipeline.color_mode = ColorMode::HeightTint;
    }

    Ok(profile)
}

/// Split content into a key/value map, rejecting malformed lines.
fn parse_entries(content: &str) -> Result<HashMap<String, f32>, ProfileError> {
    let mut values = HashMap::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = match line.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => match line.split_once(char::is_whitespace) {
                Some((k, v)) => (k.trim(), v.trim()),
                None => {
                    return Err(ProfileError::ParseError {
                        line: line_idx + 1,
                        message: format!("missing value for '{}'", line),
                    })
                }
            },
        };

        if key.is_empty() || value.is_empty() {
            return Err(ProfileError::ParseError {
                line: line_idx + 1,
                message: "expected 'key value'".to_string(),
            });
        }

        let number: f32 = value.parse().map_err(|_| ProfileError::ParseError {
            line: line_idx + 1,
            message: format!("expected number, got '{}'", value),
        })?;
        values.insert(key.to_string(), number);
    }

    Ok(values)
}

fn is_known_key(key: &str) -> bool {
    const KEYS: &[&str] = &[
        "fractalDepth",
        "fractalYRange",
        "fractalYDeviance",
        "fractalColourRed",
        "fractalColourGreen",
        "fractalColourBlue",
        "isSmoothingPositionsEnabled",
        "smoothPositionsKernelSize",
        "smoothPositionsSigmaValue",
        "isSmoothingNormalsEnabled",
        "smoothNormalsKernelSize",
        "isSmoothingColoursEnabled",
        "smoothColoursKernelSize",
        "smoothColoursSigmaValue",
        "isColourNoiseEnabled",
        "colourNoiseLevel",
        "isHeightTintEnabled",
    ];
    KEYS.contains(&key) || RENDERER_KEY_PREFIXES.iter().any(|p| key.starts_with(p))
}

fn set_f32(values: &HashMap<String, f32>, key: &str, target: &mut f32) {
    if let Some(&v) = values.get(key) {
        *target = v;
    }
}

fn set_flag(values: &HashMap<String, f32>, key: &str, target: &mut bool) {
    if let Some(&v) = values.get(key) {
        *target = v != 0.0;
    }
}

fn to_unsigned(key: &str, value: f32) -> Result<u32, ProfileError> {
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f32 {
        return Err(ProfileError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a non-negative integer, got {}", value),
        });
    }
    Ok(value as u32)
}

fn gaussian_from(
    values: &HashMap<String, f32>,
    size_key: &str,
    sigma_key: &str,
    current: KernelSpec,
) -> Result<KernelSpec, ProfileError> {
    let (mut size, mut sigma) = match current {
        KernelSpec::Gaussian { size, sigma } => (size, sigma),
        KernelSpec::Box { size } => (size, 1.0),
    };
    if let Some(&v) = values.get(size_key) {
        size = to_unsigned(size_key, v)? as usize;
    }
    set_f32(values, sigma_key, &mut sigma);
    Ok(KernelSpec::Gaussian { size, sigma })
}

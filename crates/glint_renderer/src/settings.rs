//! Render configuration.
//!
//! Settings can be built in code (starting from `Default`) or loaded from a
//! JSON document where every field is optional.

use std::path::Path;

use glint_math::Mat4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// Errors that can occur while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("per_sample_jitter must be at least 1")]
    ZeroSamples,

    #[error("max_bounces must not be negative (got {0})")]
    NegativeBounces(i32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// What happens once `max_frames` full frames have been accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapPolicy {
    /// Stop touching the image; further updates are no-ops.
    #[default]
    Stop,
    /// Stop advancing counters but keep re-sampling the current scanline.
    KeepSampling,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Jittered camera rays averaged per pixel per update
    pub per_sample_jitter: u32,
    /// Maximum ray bounce depth
    pub max_bounces: i32,
    /// Number of full frames to accumulate
    pub max_frames: u32,
    pub cap_policy: CapPolicy,
    /// Shade hits with their normal instead of tracing bounces
    pub show_normals: bool,
    /// World-to-view transform of the camera
    pub view: Mat4,
    /// Background color for rays heading straight down
    pub ground_color: Color,
    /// Background color for rays heading straight up
    pub sky_color: Color,
    /// Albedo of the metal materials in the default scene
    pub albedo: Color,
    /// Multiplier on every dielectric index in the default scene
    pub refractive_index: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 180,
            per_sample_jitter: 1,
            max_bounces: 10,
            max_frames: 1000,
            cap_policy: CapPolicy::default(),
            show_normals: false,
            view: Mat4::IDENTITY,
            ground_color: Color::new(1.0, 1.0, 1.0),
            sky_color: Color::new(0.5, 0.7, 1.0),
            albedo: Color::new(0.8, 0.6, 0.2),
            refractive_index: 1.0,
        }
    }
}

impl RenderSettings {
    /// Parse settings from a JSON string and validate them.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file and validate them.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check the settings can drive a render.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.per_sample_jitter == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        if self.max_bounces < 0 {
            return Err(ConfigError::NegativeBounces(self.max_bounces));
        }
        Ok(())
    }

    /// Number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

//! Configuration module
//!
//! Environment-driven configuration for the watermarking pipeline and its
//! collaborators. All values have constant defaults so the library works with
//! an empty environment.

use std::env;

use crate::constants::{
    DEFAULT_MAX_DIMENSION_PERCENT, DEFAULT_OPACITY, DEFAULT_POSITION, DEFAULT_SIZE_PERCENT,
};
use crate::error::AppError;
use crate::validation::{
    validate_max_dimension_percent, validate_opacity, validate_size_percent,
};

const DEFAULT_MAX_BATCH_WORKERS: usize = 4;
const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";

/// Default watermark parameters applied when a caller leaves them unset.
#[derive(Clone, Debug)]
pub struct WatermarkDefaults {
    /// Free-form position text, resolved against the nine anchors.
    pub position: String,
    pub size_percent: u32,
    pub opacity: f32,
    pub max_dimension_percent: u32,
}

impl Default for WatermarkDefaults {
    fn default() -> Self {
        Self {
            position: DEFAULT_POSITION.to_string(),
            size_percent: DEFAULT_SIZE_PERCENT,
            opacity: DEFAULT_OPACITY,
            max_dimension_percent: DEFAULT_MAX_DIMENSION_PERCENT,
        }
    }
}

impl WatermarkDefaults {
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            position: env::var("AQUAMARK_POSITION").unwrap_or(base.position),
            size_percent: parse_env("AQUAMARK_SIZE_PERCENT", base.size_percent),
            opacity: parse_env("AQUAMARK_OPACITY", base.opacity),
            max_dimension_percent: parse_env(
                "AQUAMARK_MAX_DIMENSION_PERCENT",
                base.max_dimension_percent,
            ),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_size_percent(self.size_percent)?;
        validate_opacity(self.opacity)?;
        validate_max_dimension_percent(self.max_dimension_percent)?;
        Ok(())
    }
}

/// Batch orchestration configuration
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Upper bound on concurrently running composite invocations.
    pub max_workers: usize,
    /// Flat file the usage counter persists to; `None` disables counting.
    pub usage_counter_path: Option<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_BATCH_WORKERS,
            usage_counter_path: None,
        }
    }
}

impl BatchConfig {
    pub fn from_env() -> Self {
        Self {
            max_workers: parse_env("AQUAMARK_MAX_BATCH_WORKERS", DEFAULT_MAX_BATCH_WORKERS).max(1),
            usage_counter_path: env::var("AQUAMARK_USAGE_COUNTER_PATH").ok(),
        }
    }
}

/// Paths to the external video collaborators.
#[derive(Clone, Debug)]
pub struct VideoToolConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl Default for VideoToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: DEFAULT_FFMPEG_PATH.to_string(),
            ffprobe_path: DEFAULT_FFPROBE_PATH.to_string(),
        }
    }
}

impl VideoToolConfig {
    pub fn from_env() -> Self {
        Self {
            ffmpeg_path: env::var("AQUAMARK_FFMPEG_PATH")
                .unwrap_or_else(|_| DEFAULT_FFMPEG_PATH.to_string()),
            ffprobe_path: env::var("AQUAMARK_FFPROBE_PATH")
                .unwrap_or_else(|_| DEFAULT_FFPROBE_PATH.to_string()),
        }
    }
}

/// Top-level configuration bundle
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub watermark: WatermarkDefaults,
    pub batch: BatchConfig,
    pub video: VideoToolConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let config = Self {
            watermark: WatermarkDefaults::from_env(),
            batch: BatchConfig::from_env(),
            video: VideoToolConfig::from_env(),
        };
        config.watermark.validate()?;
        Ok(config)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key = key, value = %raw, "Unparseable env value, using default");
            default
        }),
        Err(_) => default,
    }
}

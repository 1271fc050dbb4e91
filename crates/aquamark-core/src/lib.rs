//! Aquamark Core Library
//!
//! This crate provides the error types, configuration, constants, validation,
//! and integration hooks shared across all aquamark components.

pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod validation;

// Re-export commonly used types
pub use config::{BatchConfig, Config, VideoToolConfig, WatermarkDefaults};
pub use constants::{
    BATCH_OUTPUT_PREFIX, DEFAULT_MAX_DIMENSION_PERCENT, DEFAULT_OPACITY, DEFAULT_POSITION,
    DEFAULT_SIZE_PERCENT, MAX_PIXEL_BUDGET,
};
pub use error::{AppError, LogLevel};
pub use hooks::{NoOpUsageReporter, UsageReporter};
pub use validation::{
    validate_max_dimension_percent, validate_opacity, validate_size_percent,
};

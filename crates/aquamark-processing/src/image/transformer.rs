//! Per-image watermark pipeline
//!
//! Chains the transform steps in order:
//! 1. Decode base bytes
//! 2. Color-mode normalization
//! 3. Pixel-budget guard
//! 4. User-requested percentage downscale
//! 5. Watermark scale + opacity + alpha composite
//! 6. PNG encode
//!
//! The pipeline owns the decoded watermark and memoizes one prepared overlay
//! per distinct target width, so batches against the same logo scale it once
//! per distinct base width instead of once per image.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use aquamark_core::{
    validate_max_dimension_percent, validate_opacity, validate_size_percent, AppError,
    WatermarkDefaults,
};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};

use crate::image::anchor::Anchor;
use crate::image::processor::ImageProcessor;
use crate::image::resize::ImageResize;
use crate::image::watermark::{PreparedWatermark, Watermark};

/// Watermark placement and appearance parameters.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    pub anchor: Anchor,
    /// Watermark width as a percentage of the (downscaled) base width, [1,100].
    pub size_percent: u32,
    /// Alpha multiplier in [0.0, 1.0].
    pub opacity: f32,
    /// Cap on base dimensions as a percentage of the original, [1,100].
    pub max_dimension_percent: u32,
}

impl WatermarkOptions {
    /// Options from defaults, resolving the free-form position text.
    pub fn from_defaults(defaults: &WatermarkDefaults) -> Self {
        Self {
            anchor: Anchor::parse(&defaults.position),
            size_percent: defaults.size_percent,
            opacity: defaults.opacity,
            max_dimension_percent: defaults.max_dimension_percent,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_size_percent(self.size_percent)?;
        validate_opacity(self.opacity)?;
        validate_max_dimension_percent(self.max_dimension_percent)?;
        Ok(())
    }
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self::from_defaults(&WatermarkDefaults::default())
    }
}

/// Reusable watermarking pipeline for one (watermark, options) pair.
#[derive(Debug)]
pub struct WatermarkPipeline {
    watermark: Watermark,
    options: WatermarkOptions,
    // Prepared overlays keyed by base width; bases of equal width share one
    prepared: Mutex<HashMap<u32, Arc<PreparedWatermark>>>,
}

impl WatermarkPipeline {
    pub fn new(watermark_bytes: &[u8], options: WatermarkOptions) -> Result<Self, AppError> {
        options.validate()?;
        let watermark = Watermark::from_bytes(watermark_bytes)?;
        Ok(Self::from_watermark(watermark, options))
    }

    pub fn from_watermark(watermark: Watermark, options: WatermarkOptions) -> Self {
        Self {
            watermark,
            options,
            prepared: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &WatermarkOptions {
        &self.options
    }

    /// Watermark one encoded image, returning PNG bytes.
    pub fn process(&self, base_bytes: &[u8]) -> Result<Bytes, AppError> {
        if base_bytes.is_empty() {
            return Err(AppError::MissingInput("base image bytes".to_string()));
        }
        let img = ImageProcessor::decode(base_bytes)?;
        let out = self.process_image(&img);
        ImageProcessor::encode_png(&out)
    }

    /// Watermark an already-decoded image, leaving the caller's image
    /// untouched. Useful for previews where the caller re-composites the same
    /// decoded base with different parameters.
    pub fn process_image(&self, img: &DynamicImage) -> DynamicImage {
        let img = ImageProcessor::normalize(img.clone());
        let img = ImageResize::clamp_pixel_budget(img);
        let img = ImageResize::shrink_to_percent(img, self.options.max_dimension_percent);

        let prepared = self.prepared_for(img.width());
        prepared.composite_onto(&img)
    }

    fn prepared_for(&self, base_width: u32) -> Arc<PreparedWatermark> {
        let mut cache = self
            .prepared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cache
            .entry(base_width)
            .or_insert_with(|| {
                tracing::debug!(base_width = base_width, "Preparing scaled watermark");
                Arc::new(self.watermark.prepare(
                    base_width,
                    self.options.size_percent,
                    self.options.opacity,
                    self.options.anchor,
                ))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, ImageFormat::Png).unwrap();
        buffer
    }

    fn white_base_png(width: u32, height: u32) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        ))
    }

    fn black_watermark_png() -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255])))
    }

    fn options(max_dimension_percent: u32) -> WatermarkOptions {
        WatermarkOptions {
            anchor: Anchor::TOP_LEFT,
            size_percent: 50,
            opacity: 1.0,
            max_dimension_percent,
        }
    }

    #[test]
    fn test_output_dimensions_match_downscaled_base() {
        let pipeline = WatermarkPipeline::new(&black_watermark_png(), options(50)).unwrap();
        let out = pipeline.process(&white_base_png(200, 100)).unwrap();

        let decoded = ImageProcessor::decode(&out).unwrap();
        // 200x100 base at 50% -> 100x50; never the watermark's dimensions
        assert_eq!(decoded.dimensions(), (100, 50));
    }

    #[test]
    fn test_default_options_parse_center() {
        let opts = WatermarkOptions::default();
        assert_eq!(opts.anchor, Anchor::CENTER);
        assert_eq!(opts.size_percent, 50);
        assert_eq!(opts.max_dimension_percent, 50);
    }

    #[test]
    fn test_invalid_options_rejected_at_construction() {
        let bad = WatermarkOptions {
            size_percent: 0,
            ..options(50)
        };
        let err = WatermarkPipeline::new(&black_watermark_png(), bad).unwrap_err();
        assert_eq!(err.error_type(), "InvalidInput");
    }

    #[test]
    fn test_missing_base_bytes() {
        let pipeline = WatermarkPipeline::new(&black_watermark_png(), options(100)).unwrap();
        let err = pipeline.process(&[]).unwrap_err();
        assert_eq!(err.error_type(), "MissingInput");
    }

    #[test]
    fn test_undecodable_base_bytes() {
        let pipeline = WatermarkPipeline::new(&black_watermark_png(), options(100)).unwrap();
        let err = pipeline.process(b"definitely not a png").unwrap_err();
        assert_eq!(err.error_type(), "Decode");
    }

    #[test]
    fn test_watermark_lands_after_downscale() {
        let pipeline = WatermarkPipeline::new(&black_watermark_png(), options(50)).unwrap();
        let out = pipeline.process(&white_base_png(200, 200)).unwrap();

        // Base downscales to 100x100; watermark 50% of that is 50x50 top-left
        let decoded = ImageProcessor::decode(&out).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(decoded.get_pixel(49, 49), &Rgba([0, 0, 0, 255]));
        assert_eq!(decoded.get_pixel(50, 50), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_prepared_overlay_is_shared_per_width() {
        let pipeline = WatermarkPipeline::new(&black_watermark_png(), options(100)).unwrap();
        let first = pipeline.prepared_for(120);
        let second = pipeline.prepared_for(120);
        assert!(Arc::ptr_eq(&first, &second));

        let other = pipeline.prepared_for(60);
        assert!(!Arc::ptr_eq(&first, &other));
    }
}

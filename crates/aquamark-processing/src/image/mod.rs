//! Image processing module
//!
//! This module provides the watermark compositing pipeline:
//! - Decode, color-mode normalization, and PNG encode (processor)
//! - Pixel-budget guard and percentage downscale (resize)
//! - Anchor parsing and offset resolution (anchor)
//! - Watermark scaling, opacity, and alpha composite (watermark)
//! - The per-image pipeline tying it together (transformer)

pub mod anchor;
pub mod processor;
pub mod resize;
pub mod transformer;
pub mod watermark;

pub use anchor::{Anchor, HorizontalAnchor, VerticalAnchor};
pub use processor::ImageProcessor;
pub use resize::ImageResize;
pub use transformer::{WatermarkOptions, WatermarkPipeline};
pub use watermark::{PreparedWatermark, Watermark};

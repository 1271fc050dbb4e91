//! Aquamark processing
//!
//! The watermark compositor: given a base raster, a watermark raster, and
//! placement/appearance parameters, produce a new raster with the watermark
//! alpha-composited on top. The video module applies the same model to video
//! clips through an external FFmpeg collaborator.

pub mod image;
pub mod metadata;
#[cfg(feature = "video")]
pub mod video;

pub use crate::image::{
    Anchor, HorizontalAnchor, ImageProcessor, ImageResize, PreparedWatermark, VerticalAnchor,
    Watermark, WatermarkOptions, WatermarkPipeline,
};
pub use metadata::{ImageMetadata, VideoMetadata};
#[cfg(feature = "video")]
pub use video::{VideoProbe, VideoWatermarker};

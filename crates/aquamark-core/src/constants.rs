//! Shared constants

/// Maximum pixel count a decoded base image may have before the pre-resize
/// guard shrinks it. Kept just under the decompression-bomb ceilings enforced
/// by common imaging libraries.
pub const MAX_PIXEL_BUDGET: u64 = 178_956_970;

/// Default watermark placement when the caller gives no position text.
pub const DEFAULT_POSITION: &str = "Center";

/// Default watermark width as a percentage of the base image width.
pub const DEFAULT_SIZE_PERCENT: u32 = 50;

/// Default opacity multiplier applied to the watermark's alpha channel.
pub const DEFAULT_OPACITY: f32 = 0.2;

/// Default cap on the base image dimensions, as a percentage of the original.
pub const DEFAULT_MAX_DIMENSION_PERCENT: u32 = 50;

/// Filename prefix for batch outputs (`watermarked_<n>.png`).
pub const BATCH_OUTPUT_PREFIX: &str = "watermarked_";

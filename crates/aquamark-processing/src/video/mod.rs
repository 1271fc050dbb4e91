//! Video watermarking module
//!
//! Applies the same anchor/opacity/scale model to video clips. Frame
//! iteration and encoding are delegated to external ffmpeg/ffprobe binaries;
//! only the placement arithmetic is computed here, once per clip.

pub mod overlay;
pub mod probe;

pub use overlay::VideoWatermarker;
pub use probe::VideoProbe;

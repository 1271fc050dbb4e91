//! Media metadata types

use serde::{Deserialize, Serialize};

/// Image metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub size_bytes: Option<u64>,
}

/// Video metadata, as reported by ffprobe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub codec: String,
    pub duration: Option<f64>,
    pub framerate: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_metadata_serializes() {
        let meta = ImageMetadata {
            width: 640,
            height: 480,
            format: "Png".to_string(),
            size_bytes: Some(1024),
        };
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains("\"width\":640"));

        let back: ImageMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back.height, 480);
    }
}

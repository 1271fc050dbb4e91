//! Image processor - decode, color-mode normalization, and PNG encode

use aquamark_core::AppError;
use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

use crate::metadata::ImageMetadata;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode image bytes, guessing the container format.
    pub fn decode(data: &[u8]) -> Result<DynamicImage, AppError> {
        if data.is_empty() {
            return Err(AppError::MissingInput("image bytes".to_string()));
        }
        let cursor = Cursor::new(data);
        let reader = ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| AppError::Decode(e.to_string()))?;
        reader.decode().map_err(|e| AppError::Decode(e.to_string()))
    }

    /// Normalize the color mode for alpha compositing.
    ///
    /// Sources without alpha semantics (CMYK JPEGs) arrive from the decoder
    /// already converted to RGB; deep-color variants are reduced to 8-bit so
    /// the alpha blend has a defined channel range. Alpha is kept only if the
    /// source carried it.
    pub fn normalize(img: DynamicImage) -> DynamicImage {
        match img {
            img @ (DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => img,
            other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        }
    }

    /// Validate that the bytes decode to a supported raster.
    pub fn validate(data: &[u8]) -> Result<(), AppError> {
        Self::decode(data).map(|_| ())
    }

    /// Dimensions of a decodable image, or `None`.
    pub fn get_dimensions(data: &[u8]) -> Option<(u32, u32)> {
        Self::decode(data).ok().map(|img| img.dimensions())
    }

    /// Extract basic metadata without keeping the decoded pixels.
    pub fn extract_metadata(data: &[u8]) -> Result<ImageMetadata, AppError> {
        let cursor = Cursor::new(data);
        let reader = ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| AppError::Decode(e.to_string()))?;
        let format = reader
            .format()
            .map(|f| format!("{:?}", f))
            .unwrap_or_else(|| "unknown".to_string());
        let img = reader.decode().map_err(|e| AppError::Decode(e.to_string()))?;
        let (width, height) = img.dimensions();

        Ok(ImageMetadata {
            width,
            height,
            format,
            size_bytes: Some(data.len() as u64),
        })
    }

    /// Encode to a PNG byte buffer.
    pub fn encode_png(img: &DynamicImage) -> Result<Bytes, AppError> {
        let (width, height) = img.dimensions();
        let estimated_size = (width * height * 3) as usize;
        let mut buffer = Vec::with_capacity(estimated_size);
        let mut cursor = Cursor::new(&mut buffer);
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| AppError::ImageProcessing(format!("PNG encode failed: {}", e)))?;

        Ok(Bytes::from(buffer))
    }
}

//! Watermark compositing
//!
//! A [`Watermark`] holds the decoded logo once and can be reused across a
//! whole batch. [`Watermark::prepare`] scales it for a given base width and
//! bakes in the opacity; [`PreparedWatermark::composite_onto`] pastes it onto
//! a copy of a base image, clipping silently where the overlay leaves the
//! canvas.

use aquamark_core::AppError;
use image::{imageops, DynamicImage, GenericImageView, RgbaImage};

use crate::image::anchor::Anchor;
use crate::image::processor::ImageProcessor;

/// A decoded watermark raster, reusable across many base images.
#[derive(Debug, Clone)]
pub struct Watermark {
    rgba: RgbaImage,
}

impl Watermark {
    pub fn from_bytes(data: &[u8]) -> Result<Self, AppError> {
        if data.is_empty() {
            return Err(AppError::MissingInput("watermark bytes".to_string()));
        }
        let img = ImageProcessor::decode(data)?;
        Ok(Self::from_image(&img))
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        Self {
            rgba: img.to_rgba8(),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.rgba.dimensions()
    }

    /// Scaled watermark dimensions for a base of `base_width` pixels.
    ///
    /// Width drives: `floor(base_width * size_percent / 100)`. Height is
    /// derived from the aspect ratio with the same floor rule. Both axes are
    /// clamped to a minimum of 1 pixel so a tiny base can never round a
    /// dimension to zero.
    pub fn scaled_dimensions(&self, base_width: u32, size_percent: u32) -> (u32, u32) {
        let (wm_width, wm_height) = self.rgba.dimensions();
        let target_width = ((base_width as u64 * size_percent as u64) / 100).max(1) as u32;
        let target_height = ((target_width as u64 * wm_height as u64) / wm_width as u64).max(1) as u32;
        (target_width, target_height)
    }

    /// Scale the watermark for `base_width` and bake in the opacity. The
    /// result is anchored but not yet placed; placement happens per base
    /// image in [`PreparedWatermark::composite_onto`].
    pub fn prepare(
        &self,
        base_width: u32,
        size_percent: u32,
        opacity: f32,
        anchor: Anchor,
    ) -> PreparedWatermark {
        let (target_width, target_height) = self.scaled_dimensions(base_width, size_percent);

        // Lanczos only: nearest-neighbor visibly degrades logo edges
        let mut scaled = if (target_width, target_height) != self.rgba.dimensions() {
            imageops::resize(
                &self.rgba,
                target_width,
                target_height,
                imageops::FilterType::Lanczos3,
            )
        } else {
            self.rgba.clone()
        };

        apply_opacity(&mut scaled, opacity);

        PreparedWatermark {
            image: scaled,
            anchor,
        }
    }
}

/// Multiply the alpha plane by `opacity`, truncating to the lower integer.
/// Color channels are untouched; `opacity = 1.0` leaves alpha as-is.
fn apply_opacity(img: &mut RgbaImage, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity >= 1.0 {
        return;
    }
    // One flat pass over the sample buffer; alpha is every 4th channel
    for pixel in img.chunks_exact_mut(4) {
        pixel[3] = (pixel[3] as f32 * opacity) as u8;
    }
}

/// A watermark scaled and opacity-adjusted for one target width.
#[derive(Debug, Clone)]
pub struct PreparedWatermark {
    image: RgbaImage,
    anchor: Anchor,
}

impl PreparedWatermark {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Alpha-composite onto a copy of `base` at the anchored offset.
    ///
    /// The caller's image is never mutated. The result has the base's
    /// dimensions and keeps an alpha channel only if the base had one.
    /// Overlay regions outside the canvas clip silently.
    pub fn composite_onto(&self, base: &DynamicImage) -> DynamicImage {
        let (base_width, base_height) = base.dimensions();
        let (wm_width, wm_height) = self.image.dimensions();
        let (x, y) = self.anchor.resolve(base_width, base_height, wm_width, wm_height);

        tracing::debug!(
            base_width = base_width,
            base_height = base_height,
            wm_width = wm_width,
            wm_height = wm_height,
            x = x,
            y = y,
            "Compositing watermark"
        );

        let had_alpha = base.color().has_alpha();
        let mut canvas = base.to_rgba8();
        imageops::overlay(&mut canvas, &self.image, x, y);

        let composited = DynamicImage::ImageRgba8(canvas);
        if had_alpha {
            composited
        } else {
            DynamicImage::ImageRgb8(composited.into_rgb8())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};

    fn white_base(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([255, 255, 255, 255]),
        ))
    }

    fn black_watermark(width: u32, height: u32) -> Watermark {
        Watermark::from_image(&DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([0, 0, 0, 255]),
        )))
    }

    #[test]
    fn test_scaled_dimensions_floor_rule() {
        // 1000x500 watermark, size 50% against an 800-wide base:
        // target width floor(800*0.5)=400, height floor(400*500/1000)=200
        let wm = black_watermark(1000, 500);
        assert_eq!(wm.scaled_dimensions(800, 50), (400, 200));
    }

    #[test]
    fn test_scaled_dimensions_truncates_derived_height() {
        // 3x2 watermark at width 100: height floor(100*2/3) = 66
        let wm = black_watermark(3, 2);
        assert_eq!(wm.scaled_dimensions(200, 50), (100, 66));
    }

    #[test]
    fn test_scaled_dimensions_clamps_to_one_pixel() {
        // 1x1000 watermark against a tiny base: height would round to zero
        let wm = black_watermark(1000, 1);
        let (w, h) = wm.scaled_dimensions(50, 1);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn test_from_bytes_rejects_empty_and_garbage() {
        assert_eq!(
            Watermark::from_bytes(&[]).unwrap_err().error_type(),
            "MissingInput"
        );
        assert_eq!(
            Watermark::from_bytes(b"not an image").unwrap_err().error_type(),
            "Decode"
        );
    }

    #[test]
    fn test_opacity_zero_leaves_base_untouched() {
        let base = white_base(100, 100);
        let wm = black_watermark(50, 50);
        let prepared = wm.prepare(100, 50, 0.0, Anchor::CENTER);

        let out = prepared.composite_onto(&base);
        assert_eq!(out.dimensions(), (100, 100));
        for (_, _, pixel) in out.to_rgba8().enumerate_pixels() {
            assert_eq!(*pixel, Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn test_opacity_one_covers_exactly() {
        let base = white_base(100, 100);
        let wm = black_watermark(100, 100);
        // size 50% of a 100-wide base: 50x50 overlay at the top-left
        let prepared = wm.prepare(100, 50, 1.0, Anchor::TOP_LEFT);

        let out = prepared.composite_onto(&base).to_rgba8();
        assert_eq!(out.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(49, 49), &Rgba([0, 0, 0, 255]));
        // Just outside the bounding box the base is unchanged
        assert_eq!(out.get_pixel(50, 50), &Rgba([255, 255, 255, 255]));
        assert_eq!(out.get_pixel(99, 99), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_bottom_right_lands_on_last_pixel() {
        let base = white_base(100, 80);
        let wm = black_watermark(100, 100);
        let prepared = wm.prepare(100, 20, 1.0, Anchor::BOTTOM_RIGHT);
        assert_eq!(prepared.dimensions(), (20, 20));

        let out = prepared.composite_onto(&base).to_rgba8();
        assert_eq!(out.get_pixel(99, 79), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(80, 60), &Rgba([0, 0, 0, 255]));
        assert_eq!(out.get_pixel(79, 59), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_partial_opacity_truncates() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        apply_opacity(&mut img, 0.5);
        // floor(255 * 0.5) = 127; color channels unchanged
        assert_eq!(img.get_pixel(0, 0), &Rgba([10, 20, 30, 127]));

        let mut img = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 101]));
        apply_opacity(&mut img, 0.2);
        // floor(101 * 0.2) = floor(20.2) = 20
        assert_eq!(img.get_pixel(0, 0).0[3], 20);
    }

    #[test]
    fn test_oversized_watermark_clips_without_failing() {
        let base = white_base(40, 40);
        let wm = black_watermark(100, 200); // taller than the base at any width
        let prepared = wm.prepare(40, 100, 1.0, Anchor::CENTER);
        let (w, h) = prepared.dimensions();
        assert!(h > 40, "overlay should exceed the canvas, got {}x{}", w, h);

        let out = prepared.composite_onto(&base);
        assert_eq!(out.dimensions(), (40, 40));
    }

    #[test]
    fn test_base_is_not_mutated() {
        let base = white_base(60, 60);
        let wm = black_watermark(30, 30);
        let prepared = wm.prepare(60, 50, 1.0, Anchor::TOP_LEFT);

        let _first = prepared.composite_onto(&base);
        // Reusing the same decoded base must see pristine pixels
        let pristine = base.to_rgba8();
        assert_eq!(pristine.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));

        let second = prepared.composite_onto(&base).to_rgba8();
        assert_eq!(second.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_rgb_base_stays_rgb() {
        let base = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([200, 200, 200])));
        let wm = black_watermark(10, 10);
        let prepared = wm.prepare(50, 20, 1.0, Anchor::CENTER);

        let out = prepared.composite_onto(&base);
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
        assert_eq!(out.dimensions(), (50, 50));
    }
}

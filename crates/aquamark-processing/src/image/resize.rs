//! Base-image resizing: the pixel-budget guard and the user-facing
//! percentage downscale. Neither step ever enlarges an image.

use aquamark_core::MAX_PIXEL_BUDGET;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Dimensions after the budget guard: unchanged when `w*h` is within the
    /// budget, otherwise both axes scaled by `sqrt(budget / (w*h))` and
    /// floored (minimum 1).
    pub fn budget_dimensions(width: u32, height: u32, budget: u64) -> (u32, u32) {
        let pixels = width as u64 * height as u64;
        if pixels <= budget {
            return (width, height);
        }
        let factor = (budget as f64 / pixels as f64).sqrt();
        let new_width = ((width as f64 * factor).floor() as u32).max(1);
        let new_height = ((height as f64 * factor).floor() as u32).max(1);
        (new_width, new_height)
    }

    /// Bound decode/processing cost: uniformly shrink any image whose pixel
    /// count exceeds [`MAX_PIXEL_BUDGET`]. This is not the user-requested
    /// resize; it only caps memory and time before further processing.
    pub fn clamp_pixel_budget(img: DynamicImage) -> DynamicImage {
        Self::clamp_to_budget(img, MAX_PIXEL_BUDGET)
    }

    pub(crate) fn clamp_to_budget(img: DynamicImage, budget: u64) -> DynamicImage {
        let (width, height) = img.dimensions();
        let (new_width, new_height) = Self::budget_dimensions(width, height, budget);
        if (new_width, new_height) == (width, height) {
            return img;
        }

        tracing::debug!(
            width = width,
            height = height,
            new_width = new_width,
            new_height = new_height,
            "Pixel budget exceeded, downscaling"
        );
        let filter = Self::select_filter(width, height, new_width, new_height);
        img.resize_exact(new_width, new_height, filter)
    }

    /// Shrink the image to fit within `percent` of its own dimensions,
    /// preserving aspect ratio (thumbnail semantics). `percent >= 100` is a
    /// no-op; this step never enlarges.
    pub fn shrink_to_percent(img: DynamicImage, percent: u32) -> DynamicImage {
        if percent >= 100 {
            return img;
        }
        let (width, height) = img.dimensions();
        let max_width = ((width as u64 * percent as u64 / 100) as u32).max(1);
        let max_height = ((height as u64 * percent as u64 / 100) as u32).max(1);
        img.thumbnail(max_width, max_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255])))
    }

    #[test]
    fn test_budget_dimensions_under_budget_unchanged() {
        assert_eq!(ImageResize::budget_dimensions(4000, 3000, MAX_PIXEL_BUDGET), (4000, 3000));
    }

    #[test]
    fn test_budget_dimensions_over_budget() {
        // 20000x20000 = 400,000,000 px; factor = sqrt(budget / 4e8) ~ 0.669
        let (w, h) = ImageResize::budget_dimensions(20000, 20000, MAX_PIXEL_BUDGET);
        assert_eq!(w, h);
        let ratio = w as f64 / 20000.0;
        assert!((ratio - 0.669).abs() < 0.001, "ratio was {}", ratio);
        assert!(w as u64 * h as u64 <= MAX_PIXEL_BUDGET);
    }

    #[test]
    fn test_budget_dimensions_floors_each_axis() {
        // 20x20 against a 100 px budget: factor 0.5 exactly
        assert_eq!(ImageResize::budget_dimensions(20, 20, 100), (10, 10));
        // Non-square: 30x10 = 300 px against 75 -> factor 0.5
        assert_eq!(ImageResize::budget_dimensions(30, 10, 75), (15, 5));
    }

    #[test]
    fn test_budget_dimensions_never_zero() {
        let (w, h) = ImageResize::budget_dimensions(1, 1000, 10);
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn test_clamp_to_budget_resizes_image() {
        let img = test_image(20, 20);
        let clamped = ImageResize::clamp_to_budget(img, 100);
        assert_eq!(clamped.dimensions(), (10, 10));
    }

    #[test]
    fn test_clamp_pixel_budget_noop_for_small_image() {
        let img = test_image(100, 100);
        let clamped = ImageResize::clamp_pixel_budget(img);
        assert_eq!(clamped.dimensions(), (100, 100));
    }

    #[test]
    fn test_shrink_to_percent() {
        let img = test_image(200, 100);
        let shrunk = ImageResize::shrink_to_percent(img, 50);
        assert_eq!(shrunk.dimensions(), (100, 50));
    }

    #[test]
    fn test_shrink_to_percent_full_size_is_noop() {
        let img = test_image(200, 100);
        let shrunk = ImageResize::shrink_to_percent(img, 100);
        assert_eq!(shrunk.dimensions(), (200, 100));
    }

    #[test]
    fn test_shrink_to_percent_tiny_image_keeps_min_dimension() {
        let img = test_image(3, 3);
        let shrunk = ImageResize::shrink_to_percent(img, 1);
        let (w, h) = shrunk.dimensions();
        assert!(w >= 1 && h >= 1);
    }

    #[test]
    fn test_select_filter_ratios() {
        use image::imageops::FilterType;
        assert!(matches!(
            ImageResize::select_filter(100, 100, 40, 40),
            FilterType::Triangle
        ));
        assert!(matches!(
            ImageResize::select_filter(100, 100, 60, 60),
            FilterType::CatmullRom
        ));
        assert!(matches!(
            ImageResize::select_filter(100, 100, 90, 90),
            FilterType::Lanczos3
        ));
    }
}

//! Synthetic image builders for testing.

use image::{Rgb, RgbImage};
use pixel_qa_core::domain::{ImageInfo, PixelBuffer};

/// Pure black.
pub const BLACK: [u8; 3] = [0, 0, 0];
/// Pure white.
pub const WHITE: [u8; 3] = [255, 255, 255];
/// Mid gray, neither black nor white fill.
pub const GRAY: [u8; 3] = [128, 128, 128];

/// Builder for creating synthetic test images.
///
/// Provides convenience methods for generating images that trigger (or
/// avoid) specific detectors: letterbox bands, solid fills, dominant
/// backgrounds, odd aspect ratios.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    fn info(name: &str, rgb: RgbImage) -> ImageInfo {
        ImageInfo::from_buffer(format!("synthetic://{name}"), PixelBuffer::new(rgb))
    }

    // === Uniform images ===

    /// Creates a single-color image.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> ImageInfo {
        Self::info("solid", RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    /// Creates a zero-area image (edge case for error paths).
    #[must_use]
    pub fn empty() -> ImageInfo {
        Self::info("empty", RgbImage::new(0, 0))
    }

    /// Creates a 1x1 image.
    #[must_use]
    pub fn single_pixel(rgb: [u8; 3]) -> ImageInfo {
        Self::info("1x1", RgbImage::from_pixel(1, 1, Rgb(rgb)))
    }

    // === Varied images ===

    /// Creates a colorful gradient that passes every default check.
    ///
    /// Red grows with x, green with y, blue stays at 128, so no pixel is
    /// near-black or near-white.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn gradient(width: u32, height: u32) -> ImageInfo {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let r = (255 * x / width.max(1)) as u8;
            let g = (255 * y / height.max(1)) as u8;
            Rgb([r, g, 128])
        });
        Self::info("gradient", img)
    }

    /// Creates a black/white checkerboard with 8px cells.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> ImageInfo {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a black/white checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        let cell = cell_size.max(1);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgb(WHITE)
            } else {
                Rgb(BLACK)
            }
        });
        Self::info("checkerboard", img)
    }

    // === Border fill ===

    /// Gradient content with `rows` rows of `fill` at the top.
    #[must_use]
    pub fn top_band(width: u32, height: u32, rows: u32, fill: [u8; 3]) -> ImageInfo {
        Self::banded("top_band", width, height, rows, 0, fill)
    }

    /// Gradient content with `rows` rows of `fill` at the bottom.
    #[must_use]
    pub fn bottom_band(width: u32, height: u32, rows: u32, fill: [u8; 3]) -> ImageInfo {
        Self::banded("bottom_band", width, height, 0, rows, fill)
    }

    /// Gradient content with `rows` rows of `fill` at the top and bottom.
    #[must_use]
    pub fn letterboxed(width: u32, height: u32, rows: u32, fill: [u8; 3]) -> ImageInfo {
        Self::banded("letterboxed", width, height, rows, rows, fill)
    }

    fn banded(name: &str, width: u32, height: u32, top: u32, bottom: u32, fill: [u8; 3]) -> ImageInfo {
        let content = Self::gradient(width, height).buffer;
        let img = RgbImage::from_fn(width, height, |x, y| {
            if y < top || y >= height.saturating_sub(bottom) {
                Rgb(fill)
            } else {
                Rgb(content.get(x, y))
            }
        });
        Self::info(name, img)
    }

    // === Background ===

    /// Centered square subject of side `subject_side` on a solid background.
    #[must_use]
    pub fn product_shot(
        size: u32,
        subject_side: u32,
        background: [u8; 3],
        subject: [u8; 3],
    ) -> ImageInfo {
        let side = subject_side.min(size);
        let lo = (size - side) / 2;
        let hi = lo + side;
        let img = RgbImage::from_fn(size, size, |x, y| {
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                Rgb(subject)
            } else {
                Rgb(background)
            }
        });
        Self::info("product_shot", img)
    }
}

/// Convenience functions for common test images.
impl SyntheticImageBuilder {
    /// Returns a 320x180 (16:9) gradient that no default detector flags.
    #[must_use]
    pub fn clean_image() -> ImageInfo {
        Self::gradient(320, 180)
    }

    /// Returns a 320x180 gradient with 18-row black letterbox bands.
    #[must_use]
    pub fn letterboxed_image() -> ImageInfo {
        Self::letterboxed(320, 180, 18, BLACK)
    }

    /// Returns a 200x200 solid white image.
    #[must_use]
    pub fn blank_image() -> ImageInfo {
        Self::solid(200, 200, WHITE)
    }
}

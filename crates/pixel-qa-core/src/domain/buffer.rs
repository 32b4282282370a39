//! Pixel buffer and image wrapper types.

use image::{DynamicImage, RgbImage};

/// A decoded image exposed as a dense RGB raster.
///
/// Read-only to detectors. Cloning is cheap relative to decoding but still
/// copies the pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    rgb: RgbImage,
}

impl PixelBuffer {
    /// Wraps an RGB raster.
    #[must_use]
    pub const fn new(rgb: RgbImage) -> Self {
        Self { rgb }
    }

    /// Converts any decoded image to an RGB raster, dropping alpha.
    #[must_use]
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        Self::new(image.to_rgb8())
    }

    /// Builds a buffer from interleaved RGB bytes.
    ///
    /// Returns `None` if `data.len() != width * height * 3`.
    #[must_use]
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbImage::from_raw(width, height, data).map(Self::new)
    }

    /// Creates a buffer filled with a single color.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::new(RgbImage::from_pixel(width, height, image::Rgb(rgb)))
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.rgb.height()
    }

    /// Total number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Returns true if the buffer has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Returns the RGB triple at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.rgb.get_pixel(x, y).0
    }

    /// Returns the RGB triple at a row-major linear index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= pixel_count()`.
    #[must_use]
    pub fn get_linear(&self, index: usize) -> [u8; 3] {
        let offset = index * 3;
        let raw = self.rgb.as_raw();
        [raw[offset], raw[offset + 1], raw[offset + 2]]
    }

    /// Iterates over all pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.rgb.pixels().map(|p| p.0)
    }

    /// Iterates over the pixels of rows `start..end`.
    pub fn rows(&self, start: u32, end: u32) -> impl Iterator<Item = [u8; 3]> + '_ {
        let width = self.width() as usize;
        let raw = self.rgb.as_raw();
        let from = start as usize * width * 3;
        let to = end.min(self.height()) as usize * width * 3;
        raw[from.min(to)..to]
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
    }

    /// Iterates over the pixels of the rectangle `[x0, x1) x [y0, y1)`.
    pub fn region(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> impl Iterator<Item = [u8; 3]> + '_ {
        let x1 = x1.min(self.width());
        let y1 = y1.min(self.height());
        (y0..y1).flat_map(move |y| (x0..x1).map(move |x| self.get(x, y)))
    }

    /// Borrows the underlying raster.
    #[must_use]
    pub const fn as_rgb(&self) -> &RgbImage {
        &self.rgb
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(rgb: RgbImage) -> Self {
        Self::new(rgb)
    }
}

impl From<&DynamicImage> for PixelBuffer {
    fn from(image: &DynamicImage) -> Self {
        Self::from_dynamic(image)
    }
}

/// An image to analyze: an identifier plus its decoded pixels.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path or other identifier of the image.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded pixel data.
    pub buffer: PixelBuffer,
}

impl ImageInfo {
    /// Creates image info from a decoded image.
    #[must_use]
    pub fn new(path: impl Into<String>, image: &DynamicImage) -> Self {
        Self::from_buffer(path, PixelBuffer::from_dynamic(image))
    }

    /// Creates image info from an existing pixel buffer.
    #[must_use]
    pub fn from_buffer(path: impl Into<String>, buffer: PixelBuffer) -> Self {
        Self {
            path: path.into(),
            width: buffer.width(),
            height: buffer.height(),
            buffer,
        }
    }
}

//! RGB, HSV and LAB representations of pixel colors.
//!
//! Value scales:
//! - RGB: channels 0-255
//! - HSV: hue in degrees `[0, 360)`, saturation and value 0-100
//! - LAB: CIE L*a*b* under D65, L 0-100, a/b roughly -128..127

use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Hsv, Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::domain::PixelBuffer;

/// A color expressed in one of the [`ColorSpace`] scales.
pub type Color = [f32; 3];

/// Color space used for distance computations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColorSpace {
    /// sRGB channels, 0-255.
    #[default]
    Rgb,
    /// Hue/saturation/value.
    Hsv,
    /// CIE L*a*b* (D65).
    Lab,
}

impl ColorSpace {
    /// All supported color spaces.
    pub const ALL: [Self; 3] = [Self::Rgb, Self::Hsv, Self::Lab];

    /// Returns the canonical uppercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => "RGB",
            Self::Hsv => "HSV",
            Self::Lab => "LAB",
        }
    }

    /// Converts an 8-bit sRGB triple into this space.
    #[must_use]
    pub fn from_rgb(self, rgb: [u8; 3]) -> Color {
        match self {
            Self::Rgb => rgb.map(f32::from),
            Self::Hsv => {
                let hsv: Hsv = Hsv::from_color(srgb(rgb));
                [
                    hsv.hue.into_positive_degrees() % 360.0,
                    hsv.saturation * 100.0,
                    hsv.value * 100.0,
                ]
            }
            Self::Lab => {
                let lab: Lab = Lab::from_color(srgb(rgb));
                [lab.l, lab.a, lab.b]
            }
        }
    }

    /// Converts a color in this space back to an 8-bit sRGB triple.
    ///
    /// Out-of-gamut values are clamped.
    #[must_use]
    pub fn to_rgb(self, color: Color) -> [u8; 3] {
        let rgb: Srgb = match self {
            Self::Rgb => return color.map(to_channel),
            Self::Hsv => {
                let hsv: Hsv = Hsv::new(color[0], color[1] / 100.0, color[2] / 100.0);
                Srgb::from_color(hsv)
            }
            Self::Lab => {
                let lab: Lab = Lab::new(color[0], color[1], color[2]);
                Srgb::from_color(lab)
            }
        };
        [rgb.red, rgb.green, rgb.blue].map(|c| to_channel(c * 255.0))
    }

    /// Distance between two colors in this space.
    ///
    /// Euclidean for RGB and LAB (ΔE76). HSV wraps the hue difference and
    /// rescales it to the 0-100 range of the other channels.
    #[must_use]
    pub fn distance(self, a: Color, b: Color) -> f32 {
        let d0 = match self {
            Self::Rgb | Self::Lab => a[0] - b[0],
            Self::Hsv => {
                let raw = (a[0] - b[0]).abs() % 360.0;
                raw.min(360.0 - raw) * (100.0 / 360.0)
            }
        };
        let d1 = a[1] - b[1];
        let d2 = a[2] - b[2];
        d2.mul_add(d2, d1.mul_add(d1, d0 * d0)).sqrt()
    }

    /// Mean of a set of colors, or `None` if the set is empty.
    ///
    /// HSV hue is averaged on the circle.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean<'a>(self, colors: impl IntoIterator<Item = &'a Color>) -> Option<Color> {
        let mut count = 0usize;
        let mut sum = [0.0f64; 3];
        let (mut sin, mut cos) = (0.0f64, 0.0f64);
        for c in colors {
            count += 1;
            if self == Self::Hsv {
                let rad = f64::from(c[0]).to_radians();
                sin += rad.sin();
                cos += rad.cos();
            } else {
                sum[0] += f64::from(c[0]);
            }
            sum[1] += f64::from(c[1]);
            sum[2] += f64::from(c[2]);
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        let first = if self == Self::Hsv {
            sin.atan2(cos).to_degrees().rem_euclid(360.0)
        } else {
            sum[0] / n
        };
        #[allow(clippy::cast_possible_truncation)]
        Some([first as f32, (sum[1] / n) as f32, (sum[2] / n) as f32])
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorSpace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|space| space.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown color space '{s}', expected RGB, HSV or LAB"))
    }
}

impl TryFrom<String> for ColorSpace {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorSpace> for String {
    fn from(space: ColorSpace) -> Self {
        space.as_str().to_owned()
    }
}

fn srgb(rgb: [u8; 3]) -> Srgb<f32> {
    Srgb::new(rgb[0], rgb[1], rgb[2]).into_format::<f32>()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f32) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// A raster converted into a [`ColorSpace`], row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedBuffer {
    space: ColorSpace,
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl ConvertedBuffer {
    /// Target color space.
    #[must_use]
    pub const fn space(&self) -> ColorSpace {
        self.space
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Converted colors in row-major order.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.data
    }

    /// Converted color at `(x, y)`, if in bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// Converts a whole pixel buffer into `space`, preserving dimensions.
#[must_use]
pub fn convert(buffer: &PixelBuffer, space: ColorSpace) -> ConvertedBuffer {
    ConvertedBuffer {
        space,
        width: buffer.width(),
        height: buffer.height(),
        data: buffer.pixels().map(|p| space.from_rgb(p)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_rgb_identity() {
        assert_eq!(ColorSpace::Rgb.from_rgb([1, 2, 3]), [1.0, 2.0, 3.0]);
        assert_eq!(ColorSpace::Rgb.to_rgb([1.4, 300.0, -5.0]), [1, 255, 0]);
    }

    #[test]
    fn test_hsv_scales() {
        let red = ColorSpace::Hsv.from_rgb([255, 0, 0]);
        assert!(close(red[0], 0.0, 1e-3), "hue {red:?}");
        assert!(close(red[1], 100.0, 1e-3));
        assert!(close(red[2], 100.0, 1e-3));

        let blue = ColorSpace::Hsv.from_rgb([0, 0, 255]);
        assert!(close(blue[0], 240.0, 1e-2), "hue {blue:?}");
    }

    #[test]
    fn test_lab_white_and_black() {
        let white = ColorSpace::Lab.from_rgb([255, 255, 255]);
        assert!(close(white[0], 100.0, 0.1), "L {white:?}");
        assert!(close(white[1], 0.0, 0.1));
        assert!(close(white[2], 0.0, 0.1));

        let black = ColorSpace::Lab.from_rgb([0, 0, 0]);
        assert!(close(black[0], 0.0, 0.1), "L {black:?}");
    }

    #[test]
    fn test_inverse_conversions() {
        for space in ColorSpace::ALL {
            for rgb in [[12, 200, 77], [255, 255, 255], [0, 0, 0], [128, 64, 32]] {
                let back = space.to_rgb(space.from_rgb(rgb));
                for (a, b) in back.iter().zip(rgb) {
                    assert!(a.abs_diff(b) <= 1, "{space}: {rgb:?} -> {back:?}");
                }
            }
        }
    }

    #[test]
    fn test_hsv_hue_wraps() {
        let d = ColorSpace::Hsv.distance([355.0, 50.0, 50.0], [5.0, 50.0, 50.0]);
        assert!(close(d, 10.0 * 100.0 / 360.0, 1e-3), "distance {d}");
    }

    #[test]
    fn test_euclidean_distance() {
        let d = ColorSpace::Rgb.distance([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]);
        assert!(close(d, 5.0, 1e-5));
    }

    #[test]
    fn test_circular_mean() {
        let mean = ColorSpace::Hsv
            .mean(&[[350.0, 10.0, 20.0], [10.0, 30.0, 40.0]])
            .unwrap_or_default();
        assert!(close(mean[0], 0.0, 1e-2) || close(mean[0], 360.0, 1e-2), "{mean:?}");
        assert!(close(mean[1], 20.0, 1e-4));

        assert!(ColorSpace::Lab.mean(&[]).is_none());
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("lab".parse::<ColorSpace>(), Ok(ColorSpace::Lab));
        assert_eq!("Hsv".parse::<ColorSpace>(), Ok(ColorSpace::Hsv));
        assert!("cmyk".parse::<ColorSpace>().is_err());
    }

    #[test]
    fn test_convert_preserves_dimensions() {
        let buffer = PixelBuffer::filled(3, 2, [255, 0, 0]);
        let converted = convert(&buffer, ColorSpace::Lab);
        assert_eq!(converted.width(), 3);
        assert_eq!(converted.height(), 2);
        assert_eq!(converted.colors().len(), 6);
        assert!(converted.get(3, 0).is_none());
    }
}

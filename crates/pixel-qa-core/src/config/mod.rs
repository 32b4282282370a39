//! Detection configuration: one sub-config per detector plus enable flags.
//!
//! A [`DetectionConfig`] is built once, from a [`Preset`], from explicit
//! struct updates followed by [`DetectionConfig::validate`], or from a flat
//! string mapping (see [`overrides`]). It is never mutated during analysis.

pub mod overrides;
mod presets;
mod ratio;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::ColorSpace;
use crate::error::ConfigError;

pub use overrides::{fields, parse_bool, FieldSpec};
pub use presets::Preset;
pub use ratio::AspectRatio;

/// Border fill (letterbox) detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderFillConfig {
    /// Minimum black fill, as a fraction of the image, to flag a strip.
    pub black_fill_threshold: f64,
    /// Minimum white fill, as a fraction of the image, to flag a strip.
    pub white_fill_threshold: f64,
    /// Fraction of strip pixels that must match the fill color.
    pub uniformity_required: f64,
    /// Strip height as a fraction of the image height.
    pub region_fraction: f64,
    /// A channel strictly below this counts as black.
    pub black_level: u8,
    /// A channel strictly above this counts as white.
    pub white_level: u8,
    /// Inspect the top strip.
    pub check_top: bool,
    /// Inspect the bottom strip.
    pub check_bottom: bool,
}

impl Default for BorderFillConfig {
    fn default() -> Self {
        Self {
            black_fill_threshold: 0.05,
            white_fill_threshold: 0.05,
            uniformity_required: 0.90,
            region_fraction: 0.10,
            black_level: 30,
            white_level: 225,
            check_top: true,
            check_bottom: true,
        }
    }
}

/// Uniform color detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformColorConfig {
    /// Fraction of uniform samples at which the image is flagged.
    pub uniform_coverage_threshold: f64,
    /// Maximum distance to the dominant color, in `color_space` units.
    pub color_delta_threshold: f32,
    /// Color space used for clustering and distances.
    pub color_space: ColorSpace,
    /// Maximum number of sampled pixels.
    pub sample_size: usize,
    /// Exclude a margin around the image from sampling.
    pub ignore_edges: bool,
    /// Margin width as a fraction of each dimension.
    pub edge_ignore_fraction: f64,
}

impl Default for UniformColorConfig {
    fn default() -> Self {
        Self {
            uniform_coverage_threshold: 0.85,
            color_delta_threshold: 15.0,
            color_space: ColorSpace::Rgb,
            sample_size: 1000,
            ignore_edges: false,
            edge_ignore_fraction: 0.02,
        }
    }
}

/// Strategy for estimating the background color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMethod {
    /// Sample a band along the image perimeter.
    #[default]
    #[serde(alias = "edge")]
    EdgeBased,
    /// Sample square patches in the four corners.
    #[serde(alias = "corner")]
    CornerBased,
    /// Most frequent bucket of a quantized whole-image histogram.
    #[serde(alias = "histogram")]
    HistogramBased,
}

impl BackgroundMethod {
    /// All methods.
    pub const ALL: [Self; 3] = [Self::EdgeBased, Self::CornerBased, Self::HistogramBased];

    /// Canonical snake_case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EdgeBased => "edge_based",
            Self::CornerBased => "corner_based",
            Self::HistogramBased => "histogram_based",
        }
    }
}

impl fmt::Display for BackgroundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackgroundMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s || m.as_str().strip_suffix("_based") == Some(s.as_str()))
            .ok_or_else(|| format!("unknown background method '{s}'"))
    }
}

/// Background dominance detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundDetectionConfig {
    /// Fraction of background pixels at which the image is flagged.
    pub background_coverage_threshold: f64,
    /// Maximum ΔE76 from the estimated background color.
    pub background_color_tolerance: f32,
    /// Background estimation strategy.
    pub detection_method: BackgroundMethod,
    /// Perimeter band width, as a fraction of each dimension.
    pub edge_sample_fraction: f64,
    /// Corner patch size, as a fraction of each dimension.
    pub corner_sample_fraction: f64,
    /// Histogram buckets per channel.
    pub histogram_bins: u16,
}

impl Default for BackgroundDetectionConfig {
    fn default() -> Self {
        Self {
            background_coverage_threshold: 0.70,
            background_color_tolerance: 25.0,
            detection_method: BackgroundMethod::EdgeBased,
            edge_sample_fraction: 0.05,
            corner_sample_fraction: 0.08,
            histogram_bins: 64,
        }
    }
}

/// Aspect ratio and dimension settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioConfig {
    /// Maximum relative deviation from a target ratio.
    pub tolerance: f64,
    /// Accepted aspect ratios, in preference order.
    pub target_ratios: Vec<AspectRatio>,
    /// Minimum width in pixels.
    pub minimum_width: u32,
    /// Minimum height in pixels.
    pub minimum_height: u32,
    /// Report images smaller than the minimum dimensions.
    pub check_minimum_dimensions: bool,
    /// Report images larger than the maximum dimensions.
    pub check_maximum_dimensions: bool,
    /// Maximum width in pixels.
    pub maximum_width: u32,
    /// Maximum height in pixels.
    pub maximum_height: u32,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.10,
            target_ratios: AspectRatio::COMMON.to_vec(),
            minimum_width: 100,
            minimum_height: 100,
            check_minimum_dimensions: true,
            check_maximum_dimensions: false,
            maximum_width: 10_000,
            maximum_height: 10_000,
        }
    }
}

/// Complete engine configuration.
///
/// `Default` is the `default` preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Run the border fill detector.
    pub enable_border_fill: bool,
    /// Run the uniform color detector.
    pub enable_uniform_color: bool,
    /// Run the background detector.
    pub enable_background: bool,
    /// Run the ratio detector.
    pub enable_ratio: bool,
    /// Border fill settings.
    pub border_fill: BorderFillConfig,
    /// Uniform color settings.
    pub uniform_color: UniformColorConfig,
    /// Background settings.
    pub background: BackgroundDetectionConfig,
    /// Ratio settings.
    pub ratio: RatioConfig,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enable_border_fill: true,
            enable_uniform_color: true,
            enable_background: true,
            enable_ratio: true,
            border_fill: BorderFillConfig::default(),
            uniform_color: UniformColorConfig::default(),
            background: BackgroundDetectionConfig::default(),
            ratio: RatioConfig::default(),
        }
    }
}

impl DetectionConfig {
    /// Returns a copy of a named preset.
    #[must_use]
    pub fn from_preset(preset: Preset) -> Self {
        presets::get(preset).clone()
    }

    /// Returns a copy of the preset with the given (case-insensitive) name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] for unrecognized names.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        name.parse().map(Self::from_preset)
    }

    /// Default preset plus string overrides.
    ///
    /// # Errors
    ///
    /// Returns the first failing override, or a validation error.
    pub fn custom<I, K, V>(overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::default().with_overrides(overrides)
    }

    /// Applies string overrides to this configuration, in iteration order.
    ///
    /// Keys are matched case-insensitively; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first failing override, or a validation error.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in overrides {
            overrides::apply(&mut self, key.as_ref(), value.as_ref())?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Returns whether the given detector is enabled.
    #[must_use]
    pub const fn is_enabled(&self, kind: crate::domain::DetectorKind) -> bool {
        use crate::domain::DetectorKind;
        match kind {
            DetectorKind::BorderFill => self.enable_border_fill,
            DetectorKind::UniformColor => self.enable_uniform_color,
            DetectorKind::Background => self.enable_background,
            DetectorKind::Ratio => self.enable_ratio,
        }
    }

    /// Checks every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.border_fill;
        fraction("border_fill.black_fill_threshold", b.black_fill_threshold)?;
        fraction("border_fill.white_fill_threshold", b.white_fill_threshold)?;
        fraction("border_fill.uniformity_required", b.uniformity_required)?;
        fraction("border_fill.region_fraction", b.region_fraction)?;

        let u = &self.uniform_color;
        fraction("uniform_color.uniform_coverage_threshold", u.uniform_coverage_threshold)?;
        non_negative("uniform_color.color_delta_threshold", u.color_delta_threshold)?;
        if u.sample_size == 0 {
            return Err(out_of_range("uniform_color.sample_size", 0, ">= 1"));
        }
        half_fraction("uniform_color.edge_ignore_fraction", u.edge_ignore_fraction)?;

        let bg = &self.background;
        fraction("background.background_coverage_threshold", bg.background_coverage_threshold)?;
        non_negative("background.background_color_tolerance", bg.background_color_tolerance)?;
        half_fraction("background.edge_sample_fraction", bg.edge_sample_fraction)?;
        half_fraction("background.corner_sample_fraction", bg.corner_sample_fraction)?;
        if !(2..=256).contains(&bg.histogram_bins) {
            return Err(out_of_range("background.histogram_bins", bg.histogram_bins, "2..=256"));
        }

        let r = &self.ratio;
        non_negative("ratio.tolerance", r.tolerance)?;
        if let Some(bad) = r.target_ratios.iter().find(|t| !t.is_valid()) {
            return Err(ConfigError::MalformedRatio(bad.to_string()));
        }
        if self.enable_ratio && r.target_ratios.is_empty() {
            return Err(ConfigError::EmptyTargetRatios);
        }
        Ok(())
    }
}

fn out_of_range(key: &str, value: impl fmt::Display, range: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        key: key.to_owned(),
        value: value.to_string(),
        range,
    }
}

pub(crate) fn fraction(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(key, value, "0.0..=1.0"))
    }
}

pub(crate) fn half_fraction(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..0.5).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(key, value, "0.0..0.5"))
    }
}

pub(crate) fn non_negative<T>(key: &str, value: T) -> Result<(), ConfigError>
where
    T: Into<f64> + fmt::Display + Copy,
{
    let v: f64 = value.into();
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value, ">= 0 and finite"))
    }
}

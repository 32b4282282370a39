//! Detection and analysis result types.

use serde::{Deserialize, Serialize};

use super::DetectorKind;
use crate::color::ColorSpace;
use crate::config::{AspectRatio, BackgroundMethod};

/// Verdict of a single detector run on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Detector that produced this result.
    pub detector_name: DetectorKind,
    /// Whether the detector considers the image problematic.
    pub is_problematic: bool,
    /// Strength of evidence for "problematic" (0.0 to 1.0).
    pub confidence: f64,
    /// Detector-specific measurements.
    pub details: DetectionDetails,
    /// Human-readable issue descriptions, in detection order.
    pub issues: Vec<String>,
}

impl DetectionResult {
    /// Creates a result, clamping confidence into `[0, 1]`.
    #[must_use]
    pub fn new(
        detector_name: DetectorKind,
        is_problematic: bool,
        confidence: f64,
        details: DetectionDetails,
        issues: Vec<String>,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            detector_name,
            is_problematic,
            confidence,
            details,
            issues,
        }
    }
}

/// Detector-specific details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectionDetails {
    /// Border fill measurements.
    BorderFill(BorderFillDetails),
    /// Uniform color measurements.
    UniformColor(UniformColorDetails),
    /// Background dominance measurements.
    Background(BackgroundDetails),
    /// Aspect ratio and dimension checks.
    Ratio(RatioDetails),
}

/// Details for border fill detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderFillDetails {
    /// Top strip analysis, if the top border was checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_border: Option<StripAnalysis>,
    /// Bottom strip analysis, if the bottom border was checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_border: Option<StripAnalysis>,
}

/// Which horizontal border a strip belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripPosition {
    /// Top of the image.
    Top,
    /// Bottom of the image.
    Bottom,
}

impl StripPosition {
    /// Capitalized label for issue messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        }
    }
}

/// Solid fill color of a border strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillColor {
    /// Near-black fill.
    Black,
    /// Near-white fill.
    White,
}

impl FillColor {
    /// Lowercase label for issue messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

/// Measurements for one border strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripAnalysis {
    /// Strip position.
    pub region: StripPosition,
    /// Number of pixel rows in the strip.
    pub rows: u32,
    /// Fraction of strip pixels that are black.
    pub black_fill: f64,
    /// Fraction of strip pixels that are white.
    pub white_fill: f64,
    /// Black pixels in the strip as a fraction of the whole image.
    pub black_percentage: f64,
    /// White pixels in the strip as a fraction of the whole image.
    pub white_percentage: f64,
    /// Fraction of strip pixels matching the dominant fill color.
    pub homogeneity: f64,
    /// Dominant fill color, if any black or white pixels were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_fill: Option<FillColor>,
    /// Whether this strip is flagged.
    pub is_problematic: bool,
}

impl StripAnalysis {
    /// In-strip fill fraction of whichever of black or white is larger.
    #[must_use]
    pub fn fill(&self) -> f64 {
        self.black_fill.max(self.white_fill)
    }
}

/// Details for uniform color detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniformColorDetails {
    /// Fraction of samples within tolerance of the dominant color.
    pub uniformity_percentage: f64,
    /// Dominant color in the active color space.
    pub dominant_color: [f32; 3],
    /// Active color space.
    pub color_space: ColorSpace,
    /// Number of pixels actually sampled.
    pub sample_count: usize,
    /// Number of pixels eligible for sampling.
    pub total_pixel_count: usize,
    /// Distance tolerance used.
    pub color_tolerance: f32,
    /// Coverage threshold used.
    pub threshold: f64,
}

/// Details for background dominance detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackgroundDetails {
    /// Estimated background color (RGB).
    pub estimated_color: [u8; 3],
    /// Sampling strategy used.
    pub detection_method: BackgroundMethod,
    /// Fraction of the image matching the estimated color.
    pub coverage_percentage: f64,
    /// Number of pixels sampled to estimate the color.
    pub sample_count: usize,
    /// Color tolerance (ΔE) used.
    pub color_tolerance: f32,
    /// Coverage threshold used.
    pub threshold: f64,
}

/// Details for aspect ratio and dimension checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RatioDetails {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Width divided by height.
    pub aspect_ratio: f64,
    /// Configured target ratios.
    pub target_ratios: Vec<AspectRatio>,
    /// Relative tolerance used.
    pub tolerance: f64,
    /// Closest target ratio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest_ratio: Option<AspectRatio>,
    /// Relative deviation from the closest target.
    pub closest_deviation: f64,
    /// Aspect ratio issues.
    pub ratio_issues: Vec<String>,
    /// Dimension issues.
    pub dimension_issues: Vec<String>,
}

/// Aggregated analysis for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Path or identifier of the analyzed image.
    pub file_path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Results of the enabled detectors, in registry order.
    pub detection_results: Vec<DetectionResult>,
    /// True iff any detection result is problematic.
    pub is_problematic: bool,
}

impl ImageAnalysis {
    /// Builds an analysis, deriving `is_problematic` from the results.
    #[must_use]
    pub fn new(
        file_path: impl Into<String>,
        width: u32,
        height: u32,
        detection_results: Vec<DetectionResult>,
    ) -> Self {
        let is_problematic = detection_results.iter().any(|r| r.is_problematic);
        Self {
            file_path: file_path.into(),
            width,
            height,
            detection_results,
            is_problematic,
        }
    }

    /// Returns the result for a given detector, if it ran.
    #[must_use]
    pub fn result(&self, kind: DetectorKind) -> Option<&DetectionResult> {
        self.detection_results
            .iter()
            .find(|r| r.detector_name == kind)
    }

    /// Iterates over all issue lines of problematic results.
    pub fn issues(&self) -> impl Iterator<Item = &str> {
        self.detection_results
            .iter()
            .filter(|r| r.is_problematic)
            .flat_map(|r| r.issues.iter().map(String::as_str))
    }
}

/// Summary counts for a batch of images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Images analyzed successfully.
    pub total_images: usize,
    /// Analyzed images flagged as problematic.
    pub problematic_images: usize,
    /// Analyzed images that passed every detector.
    pub passed_images: usize,
    /// Images that could not be loaded or analyzed.
    pub failed_images: usize,
}

/// Collected analyses for a batch of images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Summary counts.
    pub summary: BatchSummary,
    /// Per-image analyses.
    pub analyses: Vec<ImageAnalysis>,
}

impl BatchReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful analysis.
    pub fn push(&mut self, analysis: ImageAnalysis) {
        self.summary.total_images += 1;
        if analysis.is_problematic {
            self.summary.problematic_images += 1;
        } else {
            self.summary.passed_images += 1;
        }
        self.analyses.push(analysis);
    }

    /// Records an image that could not be analyzed.
    pub fn record_failure(&mut self) {
        self.summary.failed_images += 1;
    }
}

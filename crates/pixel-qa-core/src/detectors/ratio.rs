//! Aspect ratio and dimension checks.

use crate::config::{AspectRatio, RatioConfig};
use crate::domain::{
    DetectionDetails, DetectionResult, Detector, DetectorKind, PixelBuffer, RatioDetails,
};
use crate::error::DetectorError;

/// Confidence for a ratio mismatch without dimension issues.
const MISMATCH_CONFIDENCE: f64 = 0.5;

/// Aspect ratio detector.
pub struct RatioDetector {
    config: RatioConfig,
}

impl RatioDetector {
    /// Creates a new ratio detector with the given configuration.
    #[must_use]
    pub const fn new(config: RatioConfig) -> Self {
        Self { config }
    }

    /// Returns the detector configuration.
    #[must_use]
    pub const fn config(&self) -> &RatioConfig {
        &self.config
    }

    /// Checks dimensions alone; only width and height are needed.
    ///
    /// # Errors
    ///
    /// Returns [`DetectorError::EmptyImage`] if either dimension is zero.
    pub fn check(&self, width: u32, height: u32) -> Result<DetectionResult, DetectorError> {
        if width == 0 || height == 0 {
            return Err(DetectorError::EmptyImage { width, height });
        }
        let config = &self.config;
        let aspect_ratio = f64::from(width) / f64::from(height);

        // First target wins on equal deviation.
        let closest = config
            .target_ratios
            .iter()
            .map(|&t| (t, (aspect_ratio - t.value()).abs() / t.value()))
            .fold(None, |best: Option<(AspectRatio, f64)>, cur| match best {
                Some(b) if b.1 <= cur.1 => Some(b),
                _ => Some(cur),
            });

        let mut ratio_issues = Vec::new();
        if let Some((target, deviation)) = closest {
            if deviation > config.tolerance {
                ratio_issues.push(format!(
                    "Ratio {aspect_ratio:.3} doesn't match any target ratios. Closest: {:.3} ({target})",
                    target.value()
                ));
            }
        }

        let mut dimension_issues = Vec::new();
        if config.check_minimum_dimensions {
            if width < config.minimum_width {
                dimension_issues.push(format!(
                    "Width {width} is below minimum {}",
                    config.minimum_width
                ));
            }
            if height < config.minimum_height {
                dimension_issues.push(format!(
                    "Height {height} is below minimum {}",
                    config.minimum_height
                ));
            }
        }
        if config.check_maximum_dimensions {
            if width > config.maximum_width {
                dimension_issues.push(format!(
                    "Width {width} exceeds maximum {}",
                    config.maximum_width
                ));
            }
            if height > config.maximum_height {
                dimension_issues.push(format!(
                    "Height {height} exceeds maximum {}",
                    config.maximum_height
                ));
            }
        }

        let confidence = if !dimension_issues.is_empty() {
            1.0
        } else if !ratio_issues.is_empty() {
            MISMATCH_CONFIDENCE
        } else {
            0.0
        };
        let is_problematic = !ratio_issues.is_empty() || !dimension_issues.is_empty();
        let issues = ratio_issues
            .iter()
            .chain(&dimension_issues)
            .cloned()
            .collect();

        Ok(DetectionResult::new(
            DetectorKind::Ratio,
            is_problematic,
            confidence,
            DetectionDetails::Ratio(RatioDetails {
                width,
                height,
                aspect_ratio,
                target_ratios: config.target_ratios.clone(),
                tolerance: config.tolerance,
                closest_ratio: closest.map(|(t, _)| t),
                closest_deviation: closest.map_or(0.0, |(_, d)| d),
                ratio_issues,
                dimension_issues,
            }),
            issues,
        ))
    }
}

impl Default for RatioDetector {
    fn default() -> Self {
        Self::new(RatioConfig::default())
    }
}

impl Detector for RatioDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Ratio
    }

    fn detect(&self, buffer: &PixelBuffer) -> Result<DetectionResult, DetectorError> {
        self.check(buffer.width(), buffer.height())
    }
}

//! Border fill detection.
//!
//! Flags letterboxed or padded images: the top and/or bottom strip is a
//! solid band of near-black or near-white pixels.

use crate::config::BorderFillConfig;
use crate::domain::{
    ensure_non_empty, BorderFillDetails, DetectionDetails, DetectionResult, Detector,
    DetectorKind, FillColor, PixelBuffer, StripAnalysis, StripPosition,
};
use crate::error::DetectorError;

/// Border fill detector.
pub struct BorderFillDetector {
    config: BorderFillConfig,
}

impl BorderFillDetector {
    /// Creates a new border fill detector with the given configuration.
    #[must_use]
    pub const fn new(config: BorderFillConfig) -> Self {
        Self { config }
    }

    /// Returns the detector configuration.
    #[must_use]
    pub const fn config(&self) -> &BorderFillConfig {
        &self.config
    }

    /// Strip height in rows: at least 1, at most half the image (but 1 for
    /// single-row images).
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn strip_rows(&self, height: u32) -> u32 {
        let rows = (self.config.region_fraction * f64::from(height)).floor() as u32;
        rows.max(1).min((height / 2).max(1))
    }

    #[allow(clippy::cast_precision_loss)]
    fn analyze_strip(&self, buffer: &PixelBuffer, region: StripPosition) -> StripAnalysis {
        let height = buffer.height();
        let rows = self.strip_rows(height);
        let start = match region {
            StripPosition::Top => 0,
            StripPosition::Bottom => height - rows,
        };

        let (mut black, mut white) = (0usize, 0usize);
        for [r, g, b] in buffer.rows(start, start + rows) {
            let (lo, hi) = (r.min(g).min(b), r.max(g).max(b));
            if hi < self.config.black_level {
                black += 1;
            } else if lo > self.config.white_level {
                white += 1;
            }
        }

        let strip = (rows as usize * buffer.width() as usize) as f64;
        let total = buffer.pixel_count() as f64;
        let black_fill = black as f64 / strip;
        let white_fill = white as f64 / strip;

        // Thresholds apply to the fill inside the strip.
        let black_flag = black_fill >= self.config.black_fill_threshold
            && black_fill >= self.config.uniformity_required;
        let white_flag = white_fill >= self.config.white_fill_threshold
            && white_fill >= self.config.uniformity_required;

        let dominant_fill = if black_flag || (!white_flag && black > 0 && black >= white) {
            Some(FillColor::Black)
        } else if white_flag || white > 0 {
            Some(FillColor::White)
        } else {
            None
        };
        let homogeneity = match dominant_fill {
            Some(FillColor::Black) => black_fill,
            Some(FillColor::White) => white_fill,
            None => 0.0,
        };

        StripAnalysis {
            region,
            rows,
            black_fill,
            white_fill,
            black_percentage: black as f64 / total,
            white_percentage: white as f64 / total,
            homogeneity,
            dominant_fill,
            is_problematic: black_flag || white_flag,
        }
    }
}

impl Default for BorderFillDetector {
    fn default() -> Self {
        Self::new(BorderFillConfig::default())
    }
}

fn issue(strip: &StripAnalysis) -> Option<String> {
    if !strip.is_problematic {
        return None;
    }
    let fill = strip.dominant_fill?;
    let pct = match fill {
        FillColor::Black => strip.black_fill,
        FillColor::White => strip.white_fill,
    };
    Some(format!(
        "{} border has {} fill: {:.1}%",
        strip.region.label(),
        fill.label(),
        pct * 100.0
    ))
}

impl Detector for BorderFillDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::BorderFill
    }

    fn detect(&self, buffer: &PixelBuffer) -> Result<DetectionResult, DetectorError> {
        ensure_non_empty(buffer)?;

        let top_border = self
            .config
            .check_top
            .then(|| self.analyze_strip(buffer, StripPosition::Top));
        let bottom_border = self
            .config
            .check_bottom
            .then(|| self.analyze_strip(buffer, StripPosition::Bottom));

        let strips = || top_border.iter().chain(bottom_border.iter());
        let is_problematic = strips().any(|s| s.is_problematic);
        let confidence = strips()
            .map(StripAnalysis::fill)
            .fold(0.0, f64::max);
        let issues = strips().filter_map(issue).collect();

        Ok(DetectionResult::new(
            DetectorKind::BorderFill,
            is_problematic,
            confidence,
            DetectionDetails::BorderFill(BorderFillDetails {
                top_border,
                bottom_border,
            }),
            issues,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    /// Gray image with `rows` rows of `fill` at the top.
    fn banded(width: u32, height: u32, rows: u32, fill: [u8; 3]) -> PixelBuffer {
        PixelBuffer::new(RgbImage::from_fn(width, height, |_, y| {
            if y < rows {
                Rgb(fill)
            } else {
                Rgb([128, 128, 128])
            }
        }))
    }

    fn details(result: &DetectionResult) -> &BorderFillDetails {
        let DetectionDetails::BorderFill(details) = &result.details else {
            panic!("expected BorderFillDetails");
        };
        details
    }

    #[test]
    fn test_detector_name() {
        assert_eq!(BorderFillDetector::default().name(), "border_fill");
    }

    #[test]
    fn test_strip_rows_bounds() {
        let detector = BorderFillDetector::default();
        assert_eq!(detector.strip_rows(100), 10);
        assert_eq!(detector.strip_rows(5), 1);
        assert_eq!(detector.strip_rows(1), 1);

        let wide = BorderFillDetector::new(BorderFillConfig {
            region_fraction: 1.0,
            ..BorderFillConfig::default()
        });
        assert_eq!(wide.strip_rows(100), 50);
    }

    #[test]
    fn test_top_black_band() {
        let buffer = banded(100, 100, 10, [0, 0, 0]);
        let result = BorderFillDetector::default()
            .detect(&buffer)
            .expect("detection should succeed");

        assert!(result.is_problematic);
        let top = details(&result).top_border.as_ref().expect("top checked");
        assert!(top.is_problematic);
        assert!(
            (top.black_percentage - 0.10).abs() < 1e-9,
            "black_percentage should be 0.10, got {}",
            top.black_percentage
        );
        assert!((top.black_fill - 1.0).abs() < f64::EPSILON);
        assert_eq!(top.dominant_fill, Some(FillColor::Black));
        assert_eq!(result.issues, vec!["Top border has black fill: 100.0%"]);
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);

        let bottom = details(&result).bottom_border.as_ref().expect("bottom checked");
        assert!(!bottom.is_problematic);
    }

    #[test]
    fn test_bottom_white_band() {
        let buffer = PixelBuffer::new(RgbImage::from_fn(50, 100, |_, y| {
            if y >= 90 {
                Rgb([250, 250, 250])
            } else {
                Rgb([90, 60, 30])
            }
        }));
        let result = BorderFillDetector::default()
            .detect(&buffer)
            .expect("detection should succeed");

        assert!(result.is_problematic);
        assert_eq!(result.issues, vec!["Bottom border has white fill: 100.0%"]);
    }

    #[test]
    fn test_threshold_above_strip_share() {
        // A threshold larger than region_fraction must still be reachable.
        let detector = BorderFillDetector::new(BorderFillConfig {
            black_fill_threshold: 0.30,
            region_fraction: 0.05,
            uniformity_required: 0.80,
            ..BorderFillConfig::default()
        });
        let result = detector
            .detect(&banded(100, 100, 5, [0, 0, 0]))
            .expect("detection should succeed");

        assert!(result.is_problematic);
        let top = details(&result).top_border.as_ref().expect("top checked");
        assert_eq!(top.rows, 5);
        assert!((top.black_percentage - 0.05).abs() < 1e-9);
        assert!((top.black_fill - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fill_below_threshold() {
        // 8 of 10 strip rows are black: fill 0.8 misses a 0.85 threshold.
        let detector = BorderFillDetector::new(BorderFillConfig {
            black_fill_threshold: 0.85,
            uniformity_required: 0.50,
            ..BorderFillConfig::default()
        });
        let result = detector
            .detect(&banded(100, 100, 8, [0, 0, 0]))
            .expect("detection should succeed");

        assert!(!result.is_problematic);
        assert!((result.confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_partial_band_not_uniform() {
        // Only 5 of the 10 strip rows are black: homogeneity 0.5 < 0.9.
        let buffer = banded(100, 100, 5, [0, 0, 0]);
        let result = BorderFillDetector::default()
            .detect(&buffer)
            .expect("detection should succeed");

        assert!(!result.is_problematic);
        let top = details(&result).top_border.as_ref().expect("top checked");
        assert!((top.homogeneity - 0.5).abs() < 1e-9);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_dark_but_not_black() {
        // Channel 30 is not strictly below the black level.
        let buffer = banded(100, 100, 10, [30, 30, 30]);
        let result = BorderFillDetector::default()
            .detect(&buffer)
            .expect("detection should succeed");
        assert!(!result.is_problematic);
        assert!(result.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn test_check_top_disabled() {
        let detector = BorderFillDetector::new(BorderFillConfig {
            check_top: false,
            ..BorderFillConfig::default()
        });
        let buffer = banded(100, 100, 10, [0, 0, 0]);
        let result = detector.detect(&buffer).expect("detection should succeed");

        assert!(!result.is_problematic);
        assert!(details(&result).top_border.is_none());
    }

    #[test]
    fn test_empty_image_rejected() {
        let buffer = PixelBuffer::filled(10, 0, [0, 0, 0]);
        assert!(BorderFillDetector::default().detect(&buffer).is_err());
    }
}

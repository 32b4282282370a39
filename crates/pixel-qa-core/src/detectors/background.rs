//! Background dominance detection.
//!
//! Estimates the background color from a sampling strategy, then measures
//! how much of the image lies within a ΔE76 tolerance of it.

use std::collections::HashMap;

use crate::color::{convert, ColorSpace};
use crate::config::{BackgroundDetectionConfig, BackgroundMethod};
use crate::domain::{
    ensure_non_empty, BackgroundDetails, DetectionDetails, DetectionResult, Detector,
    DetectorKind, PixelBuffer,
};
use crate::error::DetectorError;

/// Background dominance detector.
pub struct BackgroundDetector {
    config: BackgroundDetectionConfig,
}

impl BackgroundDetector {
    /// Creates a new background detector with the given configuration.
    #[must_use]
    pub const fn new(config: BackgroundDetectionConfig) -> Self {
        Self { config }
    }

    /// Returns the detector configuration.
    #[must_use]
    pub const fn config(&self) -> &BackgroundDetectionConfig {
        &self.config
    }

    /// Estimates the background color and returns it with the sample count.
    #[must_use]
    pub fn estimate(&self, buffer: &PixelBuffer) -> ([u8; 3], usize) {
        match self.config.detection_method {
            BackgroundMethod::EdgeBased => {
                let bw = band(buffer.width(), self.config.edge_sample_fraction);
                let bh = band(buffer.height(), self.config.edge_sample_fraction);
                let (w, h) = (buffer.width(), buffer.height());
                let samples: Vec<_> = sample_where(buffer, |x, y| {
                    x < bw || y < bh || x >= w - bw || y >= h - bh
                });
                (mode_color(&samples), samples.len())
            }
            BackgroundMethod::CornerBased => {
                let pw = band(buffer.width(), self.config.corner_sample_fraction);
                let ph = band(buffer.height(), self.config.corner_sample_fraction);
                let (w, h) = (buffer.width(), buffer.height());
                let samples: Vec<_> = sample_where(buffer, |x, y| {
                    (x < pw || x >= w - pw) && (y < ph || y >= h - ph)
                });
                (mode_color(&samples), samples.len())
            }
            BackgroundMethod::HistogramBased => (
                histogram_peak(buffer, self.config.histogram_bins),
                buffer.pixel_count(),
            ),
        }
    }
}

impl Default for BackgroundDetector {
    fn default() -> Self {
        Self::new(BackgroundDetectionConfig::default())
    }
}

/// Band width in pixels: `fraction * dim`, at least 1, at most `dim`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn band(dim: u32, fraction: f64) -> u32 {
    ((f64::from(dim) * fraction).floor() as u32).max(1).min(dim)
}

/// Pixels matching `keep`, in row-major order.
fn sample_where(buffer: &PixelBuffer, keep: impl Fn(u32, u32) -> bool) -> Vec<[u8; 3]> {
    let (w, h) = (buffer.width(), buffer.height());
    (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| keep(x, y))
        .map(|(x, y)| buffer.get(x, y))
        .collect()
}

/// Most frequent exact color; ties go to the color seen first. Falls back
/// to the rounded mean when no color repeats.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn mode_color(samples: &[[u8; 3]]) -> [u8; 3] {
    let mut counts: HashMap<[u8; 3], (usize, usize)> = HashMap::new();
    for (i, &rgb) in samples.iter().enumerate() {
        counts.entry(rgb).or_insert((0, i)).0 += 1;
    }

    let best = counts
        .iter()
        .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then(fb.cmp(fa)));
    match best {
        Some((&rgb, &(count, _))) if count > 1 || samples.len() == 1 => rgb,
        _ => {
            let n = samples.len().max(1) as f64;
            let mut sum = [0u64; 3];
            for rgb in samples {
                for (s, &c) in sum.iter_mut().zip(rgb) {
                    *s += u64::from(c);
                }
            }
            sum.map(|s| (s as f64 / n).round() as u8)
        }
    }
}

/// Mean color of the most populated bucket of a per-channel quantized
/// histogram; ties go to the lowest bucket index.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn histogram_peak(buffer: &PixelBuffer, bins: u16) -> [u8; 3] {
    let bins = u32::from(bins.clamp(2, 256));
    let bucket = |c: u8| u32::from(c) * bins / 256;

    let mut buckets: HashMap<u32, (u64, [u64; 3])> = HashMap::new();
    for rgb in buffer.pixels() {
        let key = (bucket(rgb[0]) * bins + bucket(rgb[1])) * bins + bucket(rgb[2]);
        let entry = buckets.entry(key).or_insert((0, [0; 3]));
        entry.0 += 1;
        for (s, c) in entry.1.iter_mut().zip(rgb) {
            *s += u64::from(c);
        }
    }

    buckets
        .iter()
        .max_by(|(ka, (ca, _)), (kb, (cb, _))| ca.cmp(cb).then(kb.cmp(ka)))
        .map_or([0, 0, 0], |(_, (count, sum))| {
            sum.map(|s| (s as f64 / *count as f64).round() as u8)
        })
}

impl Detector for BackgroundDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Background
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, buffer: &PixelBuffer) -> Result<DetectionResult, DetectorError> {
        ensure_non_empty(buffer)?;

        let (estimated_color, sample_count) = self.estimate(buffer);
        let target = ColorSpace::Lab.from_rgb(estimated_color);
        let tolerance = self.config.background_color_tolerance;
        let lab = convert(buffer, ColorSpace::Lab);
        let matches = lab
            .colors()
            .iter()
            .filter(|&&c| ColorSpace::Lab.distance(c, target) <= tolerance)
            .count();
        let coverage_percentage = matches as f64 / buffer.pixel_count() as f64;

        let threshold = self.config.background_coverage_threshold;
        let is_problematic = coverage_percentage >= threshold;
        let issues = if is_problematic {
            vec![format!(
                "Background dominates {:.1}% of image",
                coverage_percentage * 100.0
            )]
        } else {
            vec![]
        };

        Ok(DetectionResult::new(
            DetectorKind::Background,
            is_problematic,
            coverage_percentage,
            DetectionDetails::Background(BackgroundDetails {
                estimated_color,
                detection_method: self.config.detection_method,
                coverage_percentage,
                sample_count,
                color_tolerance: tolerance,
                threshold,
            }),
            issues,
        ))
    }
}

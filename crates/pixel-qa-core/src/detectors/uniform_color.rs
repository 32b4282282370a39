//! Uniform color detection.
//!
//! Flags images where almost every sampled pixel is close to one dominant
//! color: blank frames, solid placeholders, failed renders.

use crate::color::{Clustering, Color, KMeans};
use crate::config::UniformColorConfig;
use crate::domain::{
    ensure_non_empty, DetectionDetails, DetectionResult, Detector, DetectorKind, PixelBuffer,
    UniformColorDetails,
};
use crate::error::DetectorError;

/// Clusters requested from the clustering primitive.
const CLUSTERS: usize = 3;

/// Uniform color detector.
pub struct UniformColorDetector {
    config: UniformColorConfig,
    clustering: Box<dyn Clustering>,
}

impl UniformColorDetector {
    /// Creates a detector using k-means in the configured color space.
    #[must_use]
    pub fn new(config: UniformColorConfig) -> Self {
        let clustering = Box::new(KMeans::new(config.color_space));
        Self { config, clustering }
    }

    /// Replaces the clustering primitive.
    #[must_use]
    pub fn with_clustering(mut self, clustering: Box<dyn Clustering>) -> Self {
        self.clustering = clustering;
        self
    }

    /// Returns the detector configuration.
    #[must_use]
    pub const fn config(&self) -> &UniformColorConfig {
        &self.config
    }

    /// Candidate rectangle `(x0, y0, width, height)`: the whole image, or its
    /// interior when edges are ignored and the interior is non-empty.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn candidate_area(&self, buffer: &PixelBuffer) -> (u32, u32, u32, u32) {
        let (w, h) = (buffer.width(), buffer.height());
        if !self.config.ignore_edges {
            return (0, 0, w, h);
        }
        let mx = (f64::from(w) * self.config.edge_ignore_fraction).floor() as u32;
        let my = (f64::from(h) * self.config.edge_ignore_fraction).floor() as u32;
        let (iw, ih) = (w.saturating_sub(2 * mx), h.saturating_sub(2 * my));
        if iw == 0 || ih == 0 {
            (0, 0, w, h)
        } else {
            (mx, my, iw, ih)
        }
    }

    /// Evenly spaced grid sample of the candidate area, in the active space.
    ///
    /// Returns the samples and the candidate pixel count.
    #[allow(clippy::cast_possible_truncation)]
    fn sample(&self, buffer: &PixelBuffer) -> (Vec<Color>, usize) {
        let (x0, y0, cw, ch) = self.candidate_area(buffer);
        let candidates = cw as usize * ch as usize;
        let n = self.config.sample_size.min(candidates);
        let space = self.config.color_space;

        let samples = (0..n)
            .map(|i| {
                // u128 keeps i * candidates from overflowing on huge images.
                let idx = (i as u128 * candidates as u128 / n as u128) as usize;
                let (x, y) = (idx % cw as usize, idx / cw as usize);
                let rgb = buffer.get(x0 + x as u32, y0 + y as u32);
                space.from_rgb(rgb)
            })
            .collect();
        (samples, candidates)
    }
}

impl Default for UniformColorDetector {
    fn default() -> Self {
        Self::new(UniformColorConfig::default())
    }
}

impl Detector for UniformColorDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::UniformColor
    }

    #[allow(clippy::cast_precision_loss)]
    fn detect(&self, buffer: &PixelBuffer) -> Result<DetectionResult, DetectorError> {
        ensure_non_empty(buffer)?;

        let space = self.config.color_space;
        let (samples, total_pixel_count) = self.sample(buffer);
        let clusters = self.clustering.cluster(&samples, CLUSTERS);
        let dominant_color = clusters
            .dominant_centroid()
            .or_else(|| space.mean(&samples))
            .ok_or_else(|| DetectorError::Unsupported("no pixels to sample".into()))?;

        let tolerance = self.config.color_delta_threshold;
        let uniform = samples
            .iter()
            .filter(|&&s| space.distance(s, dominant_color) <= tolerance)
            .count();
        let uniformity_percentage = uniform as f64 / samples.len() as f64;

        let threshold = self.config.uniform_coverage_threshold;
        let is_problematic = uniformity_percentage >= threshold;
        let issues = if is_problematic {
            vec![format!(
                "Image is {:.1}% uniform color (threshold: {:.1}%)",
                uniformity_percentage * 100.0,
                threshold * 100.0
            )]
        } else {
            vec![]
        };

        Ok(DetectionResult::new(
            DetectorKind::UniformColor,
            is_problematic,
            uniformity_percentage,
            DetectionDetails::UniformColor(UniformColorDetails {
                uniformity_percentage,
                dominant_color,
                color_space: space,
                sample_count: samples.len(),
                total_pixel_count,
                color_tolerance: tolerance,
                threshold,
            }),
            issues,
        ))
    }
}

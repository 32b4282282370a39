//! Runs the enabled detectors and aggregates their verdicts.

use tracing::{debug, info};

use super::{BackgroundDetector, BorderFillDetector, RatioDetector, UniformColorDetector};
use crate::config::DetectionConfig;
use crate::domain::{Detector, DetectorKind, ImageAnalysis, ImageInfo, PixelBuffer};
use crate::error::{AnalysisError, ConfigError};

/// Aggregating detector over the fixed registry.
///
/// Holds no per-image state; one instance can be shared across threads.
pub struct CompositeDetector {
    detectors: Vec<Box<dyn Detector>>,
}

impl CompositeDetector {
    /// Builds the enabled detectors from a validated configuration, in
    /// registry order.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure of `config`.
    pub fn new(config: &DetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Wraps an explicit detector list, run in the given order.
    #[must_use]
    pub fn from_detectors(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    fn build(config: &DetectionConfig) -> Self {
        let detectors = DetectorKind::ALL
            .into_iter()
            .filter(|&kind| config.is_enabled(kind))
            .map(|kind| -> Box<dyn Detector> {
                match kind {
                    DetectorKind::BorderFill => {
                        Box::new(BorderFillDetector::new(config.border_fill.clone()))
                    }
                    DetectorKind::UniformColor => {
                        Box::new(UniformColorDetector::new(config.uniform_color.clone()))
                    }
                    DetectorKind::Background => {
                        Box::new(BackgroundDetector::new(config.background.clone()))
                    }
                    DetectorKind::Ratio => Box::new(RatioDetector::new(config.ratio.clone())),
                }
            })
            .collect();
        Self { detectors }
    }

    /// Kinds of the detectors that will run, in order.
    pub fn kinds(&self) -> impl Iterator<Item = DetectorKind> + '_ {
        self.detectors.iter().map(|d| d.kind())
    }

    /// Number of enabled detectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// True if every detector is disabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Runs every enabled detector on `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Detector`] for the first detector that fails;
    /// no partial analysis is produced.
    pub fn analyze(
        &self,
        buffer: &PixelBuffer,
        identifier: &str,
    ) -> Result<ImageAnalysis, AnalysisError> {
        let mut results = Vec::with_capacity(self.detectors.len());
        for detector in &self.detectors {
            let result = detector
                .detect(buffer)
                .map_err(|source| AnalysisError::Detector {
                    detector: detector.name(),
                    image: identifier.to_owned(),
                    source,
                })?;
            debug!(
                image = identifier,
                detector = detector.name(),
                problematic = result.is_problematic,
                confidence = result.confidence,
                "detector finished"
            );
            results.push(result);
        }

        let analysis = ImageAnalysis::new(identifier, buffer.width(), buffer.height(), results);
        if analysis.is_problematic {
            info!(image = identifier, issues = analysis.issues().count(), "image flagged");
        } else {
            debug!(image = identifier, "image passed");
        }
        Ok(analysis)
    }

    /// Runs every enabled detector on a loaded image.
    ///
    /// # Errors
    ///
    /// See [`Self::analyze`].
    pub fn analyze_image(&self, image: &ImageInfo) -> Result<ImageAnalysis, AnalysisError> {
        self.analyze(&image.buffer, &image.path)
    }
}

impl Default for CompositeDetector {
    fn default() -> Self {
        Self::build(&DetectionConfig::default())
    }
}

impl std::fmt::Debug for CompositeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::{DetectionResult, RatioDetails, DetectionDetails};
    use crate::error::DetectorError;

    #[test]
    fn test_registry_order() {
        let composite = CompositeDetector::default();
        let kinds: Vec<_> = composite.kinds().collect();
        assert_eq!(kinds, DetectorKind::ALL);
    }

    #[test]
    fn test_disabled_detectors_omitted() {
        let config = DetectionConfig {
            enable_uniform_color: false,
            enable_ratio: false,
            ..DetectionConfig::default()
        };
        let composite = CompositeDetector::new(&config).expect("valid config");
        let analysis = composite
            .analyze(&PixelBuffer::filled(200, 200, [120, 120, 120]), "gray.png")
            .expect("analysis should succeed");

        let kinds: Vec<_> = analysis
            .detection_results
            .iter()
            .map(|r| r.detector_name)
            .collect();
        assert_eq!(kinds, [DetectorKind::BorderFill, DetectorKind::Background]);
    }

    #[test]
    fn test_all_disabled_not_problematic() {
        let config = DetectionConfig {
            enable_border_fill: false,
            enable_uniform_color: false,
            enable_background: false,
            enable_ratio: false,
            ..DetectionConfig::default()
        };
        let composite = CompositeDetector::new(&config).expect("valid config");
        assert!(composite.is_empty());
        let analysis = composite
            .analyze(&PixelBuffer::filled(10, 10, [0, 0, 0]), "black.png")
            .expect("analysis should succeed");
        assert!(analysis.detection_results.is_empty());
        assert!(!analysis.is_problematic);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DetectionConfig::default();
        config.uniform_color.uniform_coverage_threshold = 2.0;
        assert!(CompositeDetector::new(&config).is_err());
    }

    #[test]
    fn test_empty_buffer_short_circuits() {
        let err = CompositeDetector::default()
            .analyze(&PixelBuffer::filled(0, 10, [0, 0, 0]), "empty.png")
            .expect_err("zero-area image must fail");
        assert_eq!(err.detector(), "border_fill");
        assert_eq!(err.image(), "empty.png");
    }

    struct Failing;

    impl Detector for Failing {
        fn kind(&self) -> DetectorKind {
            DetectorKind::UniformColor
        }

        fn detect(&self, _buffer: &PixelBuffer) -> Result<DetectionResult, DetectorError> {
            Err(DetectorError::Unsupported("boom".into()))
        }
    }

    struct AlwaysFlag;

    impl Detector for AlwaysFlag {
        fn kind(&self) -> DetectorKind {
            DetectorKind::Ratio
        }

        fn detect(&self, buffer: &PixelBuffer) -> Result<DetectionResult, DetectorError> {
            Ok(DetectionResult::new(
                DetectorKind::Ratio,
                true,
                1.0,
                DetectionDetails::Ratio(RatioDetails {
                    width: buffer.width(),
                    height: buffer.height(),
                    aspect_ratio: 1.0,
                    target_ratios: vec![],
                    tolerance: 0.0,
                    closest_ratio: None,
                    closest_deviation: 0.0,
                    ratio_issues: vec![],
                    dimension_issues: vec!["flagged".into()],
                }),
                vec!["flagged".into()],
            ))
        }
    }

    #[test]
    fn test_failure_is_not_masked() {
        let composite = CompositeDetector::from_detectors(vec![Box::new(AlwaysFlag), Box::new(Failing)]);
        let Err(AnalysisError::Detector { detector, source, .. }) =
            composite.analyze(&PixelBuffer::filled(4, 4, [0, 0, 0]), "x")
        else {
            panic!("expected detector failure");
        };
        assert_eq!(detector, "uniform_color");
        assert_eq!(source, DetectorError::Unsupported("boom".into()));
    }

    #[test]
    fn test_any_problematic_flags_image() {
        let composite = CompositeDetector::from_detectors(vec![Box::new(AlwaysFlag)]);
        let analysis = composite
            .analyze(&PixelBuffer::filled(4, 4, [0, 0, 0]), "x")
            .expect("analysis should succeed");
        assert!(analysis.is_problematic);
        assert_eq!(analysis.issues().collect::<Vec<_>>(), ["flagged"]);
    }
}

//! Error types for the detection engine.

use thiserror::Error;

/// Errors raised while building or validating a [`DetectionConfig`].
///
/// Always raised at construction time, never mid-analysis.
///
/// [`DetectionConfig`]: crate::config::DetectionConfig
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric value lies outside its allowed range.
    #[error("{key} must be within {range}, got {value}")]
    OutOfRange {
        /// Field or override key.
        key: String,
        /// Offending value, as given.
        value: String,
        /// Human-readable allowed range.
        range: &'static str,
    },

    /// A value could not be parsed into the field's type.
    #[error("{key}: '{value}' is not a valid {expected}")]
    InvalidValue {
        /// Field or override key.
        key: String,
        /// Offending value, as given.
        value: String,
        /// Description of the expected type.
        expected: &'static str,
    },

    /// A `W:H` ratio entry is malformed or has a zero component.
    #[error("malformed aspect ratio '{0}', expected W:H with positive integers")]
    MalformedRatio(String),

    /// Ratio detection is enabled but no target ratios are configured.
    #[error("ratio.target_ratios must not be empty while ratio detection is enabled")]
    EmptyTargetRatios,

    /// An unknown preset name was requested.
    #[error("unknown preset '{0}', expected one of: strict, default, lenient, photo, document")]
    UnknownPreset(String),
}

/// Errors raised by a single detector that cannot process a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    /// The buffer has no pixels.
    #[error("image has zero area ({width}x{height})")]
    EmptyImage {
        /// Buffer width.
        width: u32,
        /// Buffer height.
        height: u32,
    },

    /// The buffer cannot be interpreted by this detector.
    #[error("unsupported input: {0}")]
    Unsupported(String),
}

/// Analysis-level failure carrying the failing detector and image.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A detector failed; no partial analysis is produced.
    #[error("detector '{detector}' failed on {image}: {source}")]
    Detector {
        /// Name of the failing detector.
        detector: &'static str,
        /// Identifier of the analyzed image.
        image: String,
        /// Underlying detector failure.
        #[source]
        source: DetectorError,
    },
}

impl AnalysisError {
    /// Returns the name of the detector that failed.
    #[must_use]
    pub const fn detector(&self) -> &'static str {
        match self {
            Self::Detector { detector, .. } => detector,
        }
    }

    /// Returns the identifier of the image being analyzed.
    #[must_use]
    pub fn image(&self) -> &str {
        match self {
            Self::Detector { image, .. } => image,
        }
    }
}

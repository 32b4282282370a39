//! Detector trait and the fixed detector registry.

use serde::{Deserialize, Serialize};

use super::{DetectionResult, PixelBuffer};
use crate::error::DetectorError;

/// The known detectors, in the order the composite detector runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Solid black/white fill bands at the top and bottom.
    BorderFill,
    /// Image dominated by a single near-uniform color.
    UniformColor,
    /// Oversized single-color background.
    Background,
    /// Aspect ratio and dimension checks.
    Ratio,
}

impl DetectorKind {
    /// All detectors in registry order.
    pub const ALL: [Self; 4] = [
        Self::BorderFill,
        Self::UniformColor,
        Self::Background,
        Self::Ratio,
    ];

    /// Returns the detector's snake_case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BorderFill => "border_fill",
            Self::UniformColor => "uniform_color",
            Self::Background => "background",
            Self::Ratio => "ratio",
        }
    }

    /// Looks a detector up by its snake_case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for implementing visual-quality detectors.
///
/// Each detector owns its sub-configuration, holds no per-image state, and
/// maps a pixel buffer to a single [`DetectionResult`].
pub trait Detector: Send + Sync {
    /// Returns which registry entry this detector implements.
    fn kind(&self) -> DetectorKind;

    /// Returns the name of this detector.
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Analyzes a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be processed, e.g. it has zero
    /// area.
    fn detect(&self, buffer: &PixelBuffer) -> Result<DetectionResult, DetectorError>;
}

/// Rejects buffers without pixels.
///
/// # Errors
///
/// Returns [`DetectorError::EmptyImage`] if the buffer has zero area.
pub fn ensure_non_empty(buffer: &PixelBuffer) -> Result<(), DetectorError> {
    if buffer.is_empty() {
        Err(DetectorError::EmptyImage {
            width: buffer.width(),
            height: buffer.height(),
        })
    } else {
        Ok(())
    }
}

//! Result output port for writing analysis results.

use crate::domain::ImageAnalysis;

/// Port for emitting per-image analyses.
pub trait ResultOutput: Send + Sync {
    /// Writes the analysis of a single image.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, analysis: &ImageAnalysis) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}

//! Batch progress port.
//!
//! A check run emits one `Started` and one `Completed` or `Skipped` per
//! discovered image, then a single `Finished` carrying the batch counts.

use crate::domain::ImageAnalysis;

/// Lifecycle of a batch check, one image at a time.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// An image decoded and is about to run through the enabled detectors.
    Started {
        /// Image identifier as reported in the analysis.
        path: String,
        /// Position among decoded and undecodable items, from 0.
        index: usize,
        /// Discovered item count, when the source knows it up front.
        total: Option<usize>,
    },
    /// Every enabled detector ran on the image.
    Completed {
        /// Verdicts in registry order, with any issue lines.
        analysis: ImageAnalysis,
    },
    /// The image could not be decoded, or a detector rejected its pixels.
    ///
    /// Skips are counted but do not affect the exit status.
    Skipped {
        /// Image identifier, or its position when decoding failed.
        path: String,
        /// Decoder or detector error text.
        reason: String,
    },
    /// The batch is over and output has been flushed.
    Finished {
        /// Images with a completed analysis.
        processed: usize,
        /// Completed images with at least one problematic verdict.
        problematic: usize,
        /// Images reported as skipped.
        skipped: usize,
    },
}

/// Receives batch events; implemented by the CLI's terminal reporter.
pub trait ProgressSink: Send + Sync {
    /// Handles one event. Must not fail the batch.
    fn on_event(&self, event: ProgressEvent);
}

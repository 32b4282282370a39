//! Core domain types for image analysis.

mod buffer;
mod detector;
mod result;

pub use buffer::{ImageInfo, PixelBuffer};
pub use detector::{ensure_non_empty, Detector, DetectorKind};
pub use result::{
    BackgroundDetails, BatchReport, BatchSummary, BorderFillDetails, DetectionDetails,
    DetectionResult, FillColor, ImageAnalysis, RatioDetails, StripAnalysis, StripPosition,
    UniformColorDetails,
};

//! Pixel QA Core - Detection engine and ports
//!
//! This crate contains the domain types, the [`Detector`] trait and the four
//! detectors (border fill, uniform color, background dominance, aspect
//! ratio), the [`CompositeDetector`] that aggregates them, and the
//! [`DetectionConfig`] presets and override schema.
//!
//! ```
//! use pixel_qa_core::{CompositeDetector, DetectionConfig, PixelBuffer, Preset};
//!
//! let config = DetectionConfig::from_preset(Preset::Strict);
//! let engine = CompositeDetector::new(&config)?;
//! let analysis = engine.analyze(&PixelBuffer::filled(40, 40, [255, 255, 255]), "blank")?;
//! assert!(analysis.is_problematic);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod color;
pub mod config;
pub mod detectors;
pub mod domain;
pub mod error;
pub mod ports;

pub use color::ColorSpace;
pub use config::{
    AspectRatio, BackgroundDetectionConfig, BackgroundMethod, BorderFillConfig, DetectionConfig,
    Preset, RatioConfig, UniformColorConfig,
};
pub use detectors::{
    BackgroundDetector, BorderFillDetector, CompositeDetector, RatioDetector,
    UniformColorDetector,
};
pub use domain::{
    BatchReport, BatchSummary, DetectionDetails, DetectionResult, Detector, DetectorKind,
    ImageAnalysis, ImageInfo, PixelBuffer,
};
pub use error::{AnalysisError, ConfigError, DetectorError};
pub use ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};

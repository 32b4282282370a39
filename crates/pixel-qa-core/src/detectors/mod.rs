//! Detector implementations.
//!
//! Each detector implements the [`Detector`](crate::domain::Detector) trait
//! for one visual-quality check. [`CompositeDetector`] runs the enabled ones.

mod background;
mod border_fill;
mod composite;
mod ratio;
mod uniform_color;

pub use background::BackgroundDetector;
pub use border_fill::BorderFillDetector;
pub use composite::CompositeDetector;
pub use ratio::RatioDetector;
pub use uniform_color::UniformColorDetector;

//! Test support utilities for pixel-qa.
//!
//! Provides mocks, synthetic image builders, and utilities for testing
//! the pixel-qa detection pipeline.
//!
//! # Example
//!
//! ```
//! use pixel_qa_test_support::{MockImageSource, SyntheticImageBuilder};
//!
//! // Create synthetic test images
//! let clean = SyntheticImageBuilder::clean_image();
//! let letterboxed = SyntheticImageBuilder::letterboxed_image();
//!
//! // Create mock image source
//! let source = MockImageSource::new(vec![clean, letterboxed]);
//! ```

mod builders;
mod mocks;

pub use builders::{SyntheticImageBuilder, BLACK, GRAY, WHITE};
pub use mocks::{FinishedCounts, MockImageSource, MockProgressSink, MockResultOutput};

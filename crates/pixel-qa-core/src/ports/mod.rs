//! Ports between the detection engine and the outside world.
//!
//! Adapters supply images ([`ImageSource`]), receive per-image analyses
//! ([`ResultOutput`]) and observe batch progress ([`ProgressSink`]).

mod image_source;
mod progress;
mod result_output;

pub use image_source::ImageSource;
pub use progress::{ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;

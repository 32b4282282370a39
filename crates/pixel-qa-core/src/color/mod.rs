//! Color space conversion and clustering primitives shared by detectors.

mod cluster;
mod space;

pub use cluster::{Clustering, Clusters, KMeans};
pub use space::{convert, Color, ColorSpace, ConvertedBuffer};

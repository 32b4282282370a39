//! Image source port: where decoded rasters come from.

use crate::domain::ImageInfo;

/// Port for enumerating images to analyze.
///
/// Items are decoded RGB rasters. A failed item is reported and skipped by
/// the caller; it never ends the iteration.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over the images of this source, in a stable order.
    ///
    /// # Errors
    ///
    /// Individual items are errors if an image cannot be read or decoded.
    fn images(&self) -> Box<dyn Iterator<Item = anyhow::Result<ImageInfo>> + Send + '_>;

    /// Returns the number of items `images()` will yield, if known.
    fn count_hint(&self) -> Option<usize>;
}

//! Photo source port for reading encoded photos from various sources.

use crate::domain::PhotoUpload;

/// Port for reading photos from a source.
pub trait PhotoSource: Send + Sync {
    /// Returns an iterator over photos from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if a photo cannot be read.
    fn photos(&self) -> Box<dyn Iterator<Item = anyhow::Result<PhotoUpload>> + Send + '_>;

    /// Returns the total number of photos, if known.
    fn count_hint(&self) -> Option<usize>;
}

//! Image decoder port.

use image::GenericImageView;
use tracing::debug;

use crate::domain::RawImage;
use crate::error::InvalidImageError;

/// Port for turning an encoded buffer into pixels.
pub trait ImageDecoder: Send + Sync {
    /// Decodes a buffer.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidImageError`] if the buffer is empty, cannot be
    /// decoded, or decodes to an image with no pixels.
    fn decode(&self, buffer: &[u8]) -> Result<RawImage, InvalidImageError>;
}

/// Decoder backed by the `image` crate. The format is guessed from magic bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, buffer: &[u8]) -> Result<RawImage, InvalidImageError> {
        if buffer.is_empty() {
            return Err(InvalidImageError::Empty);
        }

        let format = image::guess_format(buffer).ok();
        let image = image::load_from_memory(buffer)
            .map_err(|source| InvalidImageError::Undecodable { source })?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(InvalidImageError::ZeroDimensions { width, height });
        }

        debug!("Decoded {width}x{height} image ({format:?}, {} bytes)", buffer.len());
        Ok(RawImage::new(image, format, buffer.len()))
    }
}

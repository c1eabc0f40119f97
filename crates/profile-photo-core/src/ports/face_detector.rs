//! Face detection port.

use crate::domain::{DetectedFace, RawImage};
use crate::error::FeatureUnavailableError;

/// Port for the external face-detection provider.
pub trait FaceDetector: Send + Sync {
    /// Returns the name of this backend.
    fn name(&self) -> &'static str;

    /// Detects faces in a decoded image. An empty list is a valid answer.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureUnavailableError`] if the backend cannot be reached.
    fn detect(&self, image: &RawImage) -> Result<Vec<DetectedFace>, FeatureUnavailableError>;
}

/// Detector used when no backend is wired in. Always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableFaceDetector;

impl FaceDetector for UnavailableFaceDetector {
    fn name(&self) -> &'static str {
        "none"
    }

    fn detect(&self, _image: &RawImage) -> Result<Vec<DetectedFace>, FeatureUnavailableError> {
        Err(FeatureUnavailableError::new(
            self.name(),
            "no face detection backend configured",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_detector() {
        let image = RawImage::from_image(image::DynamicImage::new_rgb8(4, 4));
        let result = UnavailableFaceDetector.detect(&image);
        assert!(result.is_err());
    }
}

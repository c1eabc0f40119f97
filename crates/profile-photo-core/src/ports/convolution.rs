//! Convolution filter port used by the sharpness, noise and distraction metrics.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::{laplacian_filter, median_filter};

use crate::error::MeasurementError;

/// Signed 3x3 edge response of a greyscale image.
pub type EdgeMap = ImageBuffer<Luma<i16>, Vec<i16>>;

/// Port for the filters behind the pixel metrics.
pub trait ConvolutionFilter: Send + Sync {
    /// Applies a fixed 3x3 high-pass (Laplacian) kernel.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError`] if the filter cannot run on this image.
    fn edge_response(&self, image: &GrayImage) -> Result<EdgeMap, MeasurementError>;

    /// Applies a median filter with the given radius.
    ///
    /// # Errors
    ///
    /// Returns [`MeasurementError`] if the filter cannot run on this image.
    fn median(&self, image: &GrayImage, radius: u32) -> Result<GrayImage, MeasurementError>;
}

/// Filters backed by `imageproc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocFilter;

fn ensure_non_empty(metric: &'static str, image: &GrayImage) -> Result<(), MeasurementError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(MeasurementError::new(metric, "image has no pixels"));
    }
    Ok(())
}

impl ConvolutionFilter for ImageprocFilter {
    fn edge_response(&self, image: &GrayImage) -> Result<EdgeMap, MeasurementError> {
        ensure_non_empty("edge response", image)?;
        Ok(laplacian_filter(image))
    }

    fn median(&self, image: &GrayImage, radius: u32) -> Result<GrayImage, MeasurementError> {
        ensure_non_empty("median", image)?;
        Ok(median_filter(image, radius, radius))
    }
}

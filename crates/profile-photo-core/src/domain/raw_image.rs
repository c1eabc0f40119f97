//! Decoded image records.

use image::{DynamicImage, GrayImage, ImageFormat};
use serde::{Deserialize, Serialize};

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel area.
    #[must_use]
    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }

    /// Width divided by height. Zero when the height is zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }

    /// Length of the image diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        f64::from(self.width).hypot(f64::from(self.height))
    }
}

/// A successfully decoded photo.
///
/// Created once per call by an [`ImageDecoder`](crate::ports::ImageDecoder)
/// and never mutated.
#[derive(Debug, Clone)]
pub struct RawImage {
    image: DynamicImage,
    format: Option<ImageFormat>,
    byte_size: usize,
}

impl RawImage {
    /// Wraps a decoded image with the format and size of its source buffer.
    #[must_use]
    pub const fn new(image: DynamicImage, format: Option<ImageFormat>, byte_size: usize) -> Self {
        Self {
            image,
            format,
            byte_size,
        }
    }

    /// Wraps an in-memory image that has no encoded source.
    #[must_use]
    pub const fn from_image(image: DynamicImage) -> Self {
        Self::new(image, None, 0)
    }

    /// The decoded pixels.
    #[must_use]
    pub const fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width and height.
    #[must_use]
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width(), self.height())
    }

    /// Number of color channels, including alpha.
    #[must_use]
    pub fn channels(&self) -> u8 {
        self.image.color().channel_count()
    }

    /// Declared container format, if it was recognised.
    #[must_use]
    pub const fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Short lowercase format label such as `"jpeg"`.
    #[must_use]
    pub fn format_label(&self) -> Option<String> {
        self.format.map(|f| format!("{f:?}").to_lowercase())
    }

    /// Size of the encoded source buffer in bytes.
    #[must_use]
    pub const fn byte_size(&self) -> usize {
        self.byte_size
    }

    /// Greyscale copy of the image.
    #[must_use]
    pub fn to_luma8(&self) -> GrayImage {
        self.image.to_luma8()
    }
}

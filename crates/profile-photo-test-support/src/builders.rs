//! Synthetic images, landmark sets and faces for testing.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use profile_photo_core::domain::{
    BoundingBox, DetectedFace, Landmarks, Point, RawImage, LANDMARK_COUNT,
};

/// Builder for creating synthetic test images.
///
/// Images are generated at test time; use [`SyntheticImageBuilder::png`] or
/// [`SyntheticImageBuilder::jpeg`] to get an encoded buffer.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Sharp/High-Contrast Images ===

    /// Creates a high-contrast checkerboard pattern (very sharp edges).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> DynamicImage {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> DynamicImage {
        let cell = cell_size.max(1);
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Creates deterministic salt-and-pepper noise over mid-gray.
    #[must_use]
    pub fn speckled(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, y| {
            match (x.wrapping_mul(7) ^ y.wrapping_mul(13)) % 5 {
                0 => Luma([255u8]),
                1 => Luma([0u8]),
                _ => Luma([128u8]),
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    // === Flat Images ===

    /// Creates a uniform gray image (no edges).
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([value])))
    }

    /// Creates a smooth horizontal gradient.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Luma([val])
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([r, g, b])))
    }

    // === Portrait Scenes ===

    /// Creates a well-lit RGB portrait scene: a skin-toned ellipse over a soft
    /// vertical background gradient, with mild texture so the frame is not flat.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn portrait_scene(width: u32, height: u32) -> DynamicImage {
        let (w, h) = (f64::from(width), f64::from(height));
        let (cx, cy) = (w / 2.0, h * 0.45);
        let (rx, ry) = (w * 0.22, h * 0.28);

        let img = RgbImage::from_fn(width, height, |x, y| {
            let (fx, fy) = (f64::from(x), f64::from(y));
            let texture = f64::from((x / 3 + y / 3) % 2) * 12.0;
            let inside = ((fx - cx) / rx).powi(2) + ((fy - cy) / ry).powi(2) <= 1.0;
            if inside {
                Rgb([
                    (200.0 + texture) as u8,
                    (160.0 + texture) as u8,
                    (135.0 + texture) as u8,
                ])
            } else {
                let shade = 90.0 + 50.0 * fy / h.max(1.0);
                Rgb([
                    (shade + texture) as u8,
                    (shade + 5.0 + texture) as u8,
                    (shade + 10.0 + texture) as u8,
                ])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    /// Creates a nearly black RGB scene.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn dark_scene(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let v = ((x + y) % 12) as u8;
            Rgb([v, v, v])
        });
        DynamicImage::ImageRgb8(img)
    }

    // === Encoding ===

    /// Encodes an image as PNG.
    ///
    /// # Panics
    ///
    /// Panics if encoding fails, which only happens for unsupported layouts.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn png(image: &DynamicImage) -> Vec<u8> {
        Self::encode(image, ImageFormat::Png).expect("PNG encoding of synthetic image")
    }

    /// Encodes an image as JPEG (converted to RGB first).
    ///
    /// # Panics
    ///
    /// Panics if encoding fails.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn jpeg(image: &DynamicImage) -> Vec<u8> {
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        Self::encode(&rgb, ImageFormat::Jpeg).expect("JPEG encoding of synthetic image")
    }

    fn encode(image: &DynamicImage, format: ImageFormat) -> image::ImageResult<Vec<u8>> {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), format)?;
        Ok(buf)
    }

    /// A PNG cut off halfway through.
    #[must_use]
    pub fn truncated_png(image: &DynamicImage) -> Vec<u8> {
        let mut bytes = Self::png(image);
        bytes.truncate(bytes.len() / 2);
        bytes
    }

    /// Bytes that are not an image in any format.
    #[must_use]
    pub fn garbage() -> Vec<u8> {
        b"definitely not an image, just some text bytes".to_vec()
    }

    /// Wraps an image as a decoded [`RawImage`] with a PNG format tag.
    #[must_use]
    pub fn raw(image: DynamicImage) -> RawImage {
        let byte_size = Self::png(&image).len();
        RawImage::new(image, Some(ImageFormat::Png), byte_size)
    }
}

/// Builds 68-point landmark sets in the common dlib order.
///
/// Eyes are rings around their centers and the mouth is an ellipse, so the
/// centroids used by symmetry scoring fall exactly on the nominal points.
pub struct LandmarkBuilder {
    center: Point,
    interocular: f64,
    nose_shift: f64,
    mouth_shift: f64,
    eye_tilt: f64,
}

impl LandmarkBuilder {
    /// A face centered at `(cx, cy)` with the given interocular distance.
    #[must_use]
    pub const fn new(cx: f64, cy: f64, interocular: f64) -> Self {
        Self {
            center: Point::new(cx, cy),
            interocular,
            nose_shift: 0.0,
            mouth_shift: 0.0,
            eye_tilt: 0.0,
        }
    }

    /// Fitted to a face box: eyes at 40% height, interocular half the width.
    #[must_use]
    pub fn for_box(bbox: &BoundingBox) -> Self {
        Self::new(
            bbox.x + bbox.width / 2.0,
            bbox.y + bbox.height * 0.4,
            bbox.width * 0.5,
        )
    }

    /// Moves the nose tip sideways by a fraction of the interocular distance.
    #[must_use]
    pub fn nose_shift(mut self, fraction: f64) -> Self {
        self.nose_shift = fraction;
        self
    }

    /// Moves the mouth sideways by a fraction of the interocular distance.
    #[must_use]
    pub fn mouth_shift(mut self, fraction: f64) -> Self {
        self.mouth_shift = fraction;
        self
    }

    /// Raises the right eye by a fraction of the interocular distance.
    #[must_use]
    pub fn eye_tilt(mut self, fraction: f64) -> Self {
        self.eye_tilt = fraction;
        self
    }

    /// A mirror-symmetric face.
    #[must_use]
    pub fn symmetric(cx: f64, cy: f64, interocular: f64) -> Landmarks {
        Self::new(cx, cy, interocular).build()
    }

    /// A visibly lopsided face.
    #[must_use]
    pub fn skewed(cx: f64, cy: f64, interocular: f64) -> Landmarks {
        Self::new(cx, cy, interocular)
            .nose_shift(0.15)
            .mouth_shift(0.2)
            .eye_tilt(0.1)
            .build()
    }

    /// Builds the landmark set.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn build(&self) -> Landmarks {
        let d = self.interocular;
        let Point { x: cx, y: cy } = self.center;
        let mut points = vec![self.center; LANDMARK_COUNT];

        let ring = |center: Point, rx: f64, ry: f64, n: usize| -> Vec<Point> {
            (0..n)
                .map(|i| {
                    let t = std::f64::consts::TAU * i as f64 / n as f64;
                    Point::new(center.x + rx * t.cos(), center.y + ry * t.sin())
                })
                .collect()
        };

        // Jaw 0..=16, mirrored pairs around cx.
        for i in 0..=16 {
            let t = std::f64::consts::PI * i as f64 / 16.0;
            points[i] = Point::new(cx - d * 1.1 * t.cos(), cy + d * 0.2 + d * 1.1 * t.sin());
        }

        // Brows 17..=21 and 22..=26.
        for k in 0..5 {
            let offset = d * (0.8 - 0.15 * k as f64);
            points[17 + k] = Point::new(cx - offset, cy - d * 0.35);
            points[26 - k] = Point::new(cx + offset, cy - d * 0.35);
        }

        // Nose bridge 27..=30 and nostrils 31..=35.
        let nose_x = cx + self.nose_shift * d;
        for k in 0..4 {
            points[27 + k] = Point::new(nose_x, cy + d * 0.15 * (k as f64 + 1.0));
        }
        for (k, offset) in [-0.3, -0.15, 0.0, 0.15, 0.3].iter().enumerate() {
            points[31 + k] = Point::new(nose_x + offset * d, cy + d * 0.65);
        }

        let left_eye = Point::new(cx - d / 2.0, cy);
        let right_eye = Point::new(cx + d / 2.0, cy - self.eye_tilt * d);
        points[36..=41].copy_from_slice(&ring(left_eye, d * 0.15, d * 0.06, 6));
        points[42..=47].copy_from_slice(&ring(right_eye, d * 0.15, d * 0.06, 6));

        let mouth = Point::new(cx + self.mouth_shift * d, cy + d * 1.0);
        points[48..=59].copy_from_slice(&ring(mouth, d * 0.4, d * 0.15, 12));
        points[60..=67].copy_from_slice(&ring(mouth, d * 0.25, d * 0.06, 8));

        Landmarks::new(points)
    }
}

/// Ready-made faces.
pub struct FaceBuilder;

impl FaceBuilder {
    /// A square face box centered in the frame covering `ratio` of its area.
    #[must_use]
    pub fn centered(width: u32, height: u32, ratio: f64, confidence: f64) -> DetectedFace {
        let (w, h) = (f64::from(width), f64::from(height));
        let side = (w * h * ratio).sqrt();
        let bbox = BoundingBox::new((w - side) / 2.0, (h - side) / 2.0, side, side);
        DetectedFace::new(confidence, bbox)
    }

    /// A face box centered on `(cx, cy)` covering `ratio` of the frame.
    #[must_use]
    pub fn at(width: u32, height: u32, cx: f64, cy: f64, ratio: f64) -> DetectedFace {
        let side = (f64::from(width) * f64::from(height) * ratio).sqrt();
        let bbox = BoundingBox::new(cx - side / 2.0, cy - side / 2.0, side, side);
        DetectedFace::new(0.95, bbox)
    }

    /// A confident, well-framed face with symmetric landmarks and metadata.
    #[must_use]
    pub fn portrait(width: u32, height: u32) -> DetectedFace {
        let face = Self::centered(width, height, 0.2, 0.98);
        let landmarks = LandmarkBuilder::for_box(&face.bbox).build();
        face.with_landmarks(landmarks)
            .with_expressions([("happy", 0.7), ("neutral", 0.25), ("surprised", 0.05)])
            .with_age(29.0)
            .with_gender("female")
    }
}

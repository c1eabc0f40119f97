//! Face detections supplied by an external provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ImageDimensions;

/// Number of points in a complete landmark set (iBUG 300-W layout).
pub const LANDMARK_COUNT: usize = 68;

/// A 2D point in pixel coordinates.
///
/// Serialized as a `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Axis-aligned face box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Box area. Negative extents count as zero.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Returns true if the pixel at `(px, py)` lies inside the box.
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Ordered facial landmark points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Landmarks(Vec<Point>);

impl Landmarks {
    /// Wraps a list of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// The landmark points in provider order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Returns true when all 68 points are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.len() >= LANDMARK_COUNT
    }
}

/// A face found by the external detection provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Detection confidence (0.0 to 1.0).
    pub confidence: f64,
    /// Face bounding box.
    pub bbox: BoundingBox,
    /// Optional 68-point landmark set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmarks: Option<Landmarks>,
    /// Expression probabilities keyed by label.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expressions: BTreeMap<String, f64>,
    /// Estimated age in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Estimated gender label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl DetectedFace {
    /// Creates a face with only a confidence and a box.
    #[must_use]
    pub const fn new(confidence: f64, bbox: BoundingBox) -> Self {
        Self {
            confidence,
            bbox,
            landmarks: None,
            expressions: BTreeMap::new(),
            age: None,
            gender: None,
        }
    }

    /// Attaches a landmark set.
    #[must_use]
    pub fn with_landmarks(mut self, landmarks: Landmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }

    /// Attaches an expression distribution.
    #[must_use]
    pub fn with_expressions<I, S>(mut self, expressions: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.expressions = expressions.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Attaches an estimated age.
    #[must_use]
    pub fn with_age(mut self, age: f64) -> Self {
        self.age = Some(age);
        self
    }

    /// Attaches an estimated gender label.
    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Confidence clamped into `0.0..=1.0`. Non-finite values count as 0.
    #[must_use]
    pub fn clamped_confidence(&self) -> f64 {
        if self.confidence.is_finite() {
            self.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Box area divided by image area.
    #[must_use]
    pub fn size_ratio(&self, dims: ImageDimensions) -> f64 {
        let image_area = dims.area();
        if image_area <= 0.0 {
            return 0.0;
        }
        self.bbox.area() / image_area
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_center_and_area() {
        let bbox = BoundingBox::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(bbox.center(), Point::new(30.0, 50.0));
        assert!((bbox.area() - 2400.0).abs() < f64::EPSILON);
        assert!(bbox.contains(10.0, 20.0));
        assert!(!bbox.contains(50.0, 20.0));
    }

    #[test]
    fn test_size_ratio() {
        let face = DetectedFace::new(0.9, BoundingBox::new(0.0, 0.0, 50.0, 40.0));
        let ratio = face.size_ratio(ImageDimensions::new(100, 100));
        assert!((ratio - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_confidence() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!((DetectedFace::new(1.7, bbox).clamped_confidence() - 1.0).abs() < f64::EPSILON);
        assert!(DetectedFace::new(f64::NAN, bbox).clamped_confidence().abs() < f64::EPSILON);
    }

    #[test]
    fn test_face_deserializes_from_provider_json() {
        let json = r#"{
            "confidence": 0.93,
            "bbox": {"x": 10, "y": 12, "width": 30, "height": 40},
            "expressions": {"happy": 0.7, "neutral": 0.3},
            "age": 29.5,
            "gender": "female"
        }"#;
        let face: DetectedFace = serde_json::from_str(json).unwrap();
        assert!((face.confidence - 0.93).abs() < f64::EPSILON);
        assert!(face.landmarks.is_none());
        assert_eq!(face.expressions.len(), 2);
        assert_eq!(face.gender.as_deref(), Some("female"));
    }

    #[test]
    fn test_landmarks_serialize_as_pairs() {
        let landmarks = Landmarks::new(vec![Point::new(1.0, 2.0)]);
        let json = serde_json::to_string(&landmarks).unwrap();
        assert_eq!(json, "[[1.0,2.0]]");
        assert!(!landmarks.is_complete());
    }
}

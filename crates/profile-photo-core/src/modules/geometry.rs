//! Face geometry and composition metrics.
//!
//! Consumes face detections from the external provider. Only the
//! highest-confidence face feeds symmetry and framing; the remaining faces
//! contribute metadata only.

use std::collections::BTreeMap;

use image::GrayImage;

use crate::domain::{
    BoundingBox, ChannelAccumulator, CompositionMetrics, DetectedFace, DistractionLevel,
    FaceSummary, ImageDimensions, Landmarks, Point, Score,
};
use crate::ports::EdgeMap;

const LEFT_EYE: std::ops::RangeInclusive<usize> = 36..=41;
const RIGHT_EYE: std::ops::RangeInclusive<usize> = 42..=47;
const NOSE_TIP: usize = 30;
const MOUTH: std::ops::RangeInclusive<usize> = 48..=67;

/// Configuration for the geometry metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryConfig {
    /// Points deducted per unit of interocular-normalized deviation.
    pub symmetry_penalty: f64,
    /// Size-ratio band that earns a full framing score.
    pub ideal_band: (f64, f64),
    /// Size-ratio band that earns [`GeometryConfig::acceptable_score`].
    pub acceptable_band: (f64, f64),
    /// Framing score inside the acceptable band.
    pub acceptable_score: f64,
    /// Points dropped on leaving the acceptable band.
    pub framing_step: f64,
    /// Quadratic decay coefficient outside the acceptable band.
    pub framing_decay: f64,
    /// Lowest framing score for a present face.
    pub framing_floor: f64,
    /// Points deducted per unit of quadrant-weight variance.
    pub balance_penalty: f64,
    /// Absolute edge response counted as a strong edge.
    pub edge_threshold: i16,
    /// Strong-edge share above which distraction is `medium`.
    pub medium_distraction: f64,
    /// Strong-edge share above which distraction is `high`.
    pub high_distraction: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            symmetry_penalty: 150.0,
            ideal_band: (0.15, 0.30),
            acceptable_band: (0.10, 0.40),
            acceptable_score: 80.0,
            framing_step: 5.0,
            framing_decay: 2000.0,
            framing_floor: 20.0,
            balance_penalty: 0.05,
            edge_threshold: 48,
            medium_distraction: 0.10,
            high_distraction: 0.25,
        }
    }
}

/// Symmetry, framing and composition from face geometry.
#[derive(Debug, Clone, Default)]
pub struct FaceGeometryAnalyzer {
    config: GeometryConfig,
}

impl FaceGeometryAnalyzer {
    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: GeometryConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GeometryConfig {
        &self.config
    }

    /// Scores landmark symmetry.
    ///
    /// Deviation of the nose tip and mouth center from the eye midline plus
    /// the imbalance between each eye's distance to the nose, all normalized
    /// by the interocular distance. Returns the neutral fallback when the
    /// landmark set is missing or incomplete.
    #[must_use]
    pub fn symmetry(&self, landmarks: Option<&Landmarks>) -> Score {
        let Some(points) = landmarks.filter(|l| l.is_complete()).map(Landmarks::points) else {
            return Score::neutral();
        };

        let left_eye = centroid(&points[LEFT_EYE]);
        let right_eye = centroid(&points[RIGHT_EYE]);
        let nose = points[NOSE_TIP];
        let mouth = centroid(&points[MOUTH]);

        let interocular = left_eye.distance(&right_eye);
        if interocular < f64::EPSILON {
            return Score::neutral();
        }

        let midpoint = Point::new(
            (left_eye.x + right_eye.x) / 2.0,
            (left_eye.y + right_eye.y) / 2.0,
        );
        let axis = Point::new(
            (right_eye.x - left_eye.x) / interocular,
            (right_eye.y - left_eye.y) / interocular,
        );
        let lateral = |p: Point| ((p.x - midpoint.x) * axis.x + (p.y - midpoint.y) * axis.y).abs();

        let nose_dev = lateral(nose) / interocular;
        let mouth_dev = lateral(mouth) / interocular;
        let eye_imbalance = (left_eye.distance(&nose) - right_eye.distance(&nose)).abs() / interocular;

        let total = nose_dev + mouth_dev + eye_imbalance;
        Score::measured((100.0 - total * self.config.symmetry_penalty).max(0.0))
    }

    /// Proximity of the face center to the nearest rule-of-thirds point.
    #[must_use]
    pub fn rule_of_thirds(&self, bbox: &BoundingBox, dims: ImageDimensions) -> Score {
        let diagonal = dims.diagonal();
        if diagonal <= 0.0 {
            return Score::neutral();
        }
        let (w, h) = (f64::from(dims.width), f64::from(dims.height));
        let center = bbox.center();

        let nearest = [1.0, 2.0]
            .iter()
            .flat_map(|fx| [1.0, 2.0].map(|fy| Point::new(w * fx / 3.0, h * fy / 3.0)))
            .map(|p| p.distance(&center))
            .fold(f64::INFINITY, f64::min);

        Score::measured(100.0 * (1.0 - nearest / (diagonal / 3.0)))
    }

    /// Scores a face-area ratio against the ideal framing band.
    #[must_use]
    pub fn framing(&self, size_ratio: f64) -> Score {
        let c = &self.config;
        let (ideal_lo, ideal_hi) = c.ideal_band;
        let (ok_lo, ok_hi) = c.acceptable_band;

        let score = if (ideal_lo..=ideal_hi).contains(&size_ratio) {
            100.0
        } else if (ok_lo..=ok_hi).contains(&size_ratio) {
            c.acceptable_score
        } else {
            let dist = if size_ratio < ok_lo {
                ok_lo - size_ratio
            } else {
                size_ratio - ok_hi
            };
            (c.acceptable_score - c.framing_step - c.framing_decay * dist * dist)
                .max(c.framing_floor)
        };
        Score::measured(score)
    }

    /// Closeness of the frame to a square crop.
    #[must_use]
    pub fn aspect_ratio(&self, dims: ImageDimensions) -> Score {
        Score::measured(100.0 - (dims.aspect_ratio() - 1.0).abs() * 100.0)
    }

    /// Evenness of brightness weight (mean plus std) across four quadrants.
    #[must_use]
    pub fn balance(&self, luma: &GrayImage) -> Score {
        let (w, h) = luma.dimensions();
        if w < 2 || h < 2 {
            return Score::neutral();
        }
        let (mid_x, mid_y) = (w / 2, h / 2);

        let mut quadrants = [ChannelAccumulator::default(); 4];
        for (x, y, pixel) in luma.enumerate_pixels() {
            let index = usize::from(x >= mid_x) + 2 * usize::from(y >= mid_y);
            quadrants[index].push(pixel.0[0]);
        }

        let weights = quadrants.map(|q| {
            let stats = q.finish();
            stats.mean + stats.std_dev
        });
        let mean = weights.iter().sum::<f64>() / 4.0;
        let variance = weights.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / 4.0;

        Score::measured(100.0 - variance * self.config.balance_penalty)
    }

    /// Classifies clutter from the share of strong edges outside the face.
    ///
    /// Without an edge map the level falls back to `medium`.
    #[must_use]
    pub fn distraction(&self, edges: Option<&EdgeMap>, face: Option<&BoundingBox>) -> DistractionLevel {
        let Some(edges) = edges else {
            return DistractionLevel::Medium;
        };

        let threshold = self.config.edge_threshold.unsigned_abs();
        let (mut outside, mut strong) = (0_u64, 0_u64);
        for (x, y, pixel) in edges.enumerate_pixels() {
            if face.is_some_and(|b| b.contains(f64::from(x), f64::from(y))) {
                continue;
            }
            outside += 1;
            if pixel.0[0].unsigned_abs() > threshold {
                strong += 1;
            }
        }

        if outside == 0 {
            return DistractionLevel::Low;
        }
        #[allow(clippy::cast_precision_loss)]
        let share = strong as f64 / outside as f64;

        if share > self.config.high_distraction {
            DistractionLevel::High
        } else if share > self.config.medium_distraction {
            DistractionLevel::Medium
        } else {
            DistractionLevel::Low
        }
    }

    /// Builds the composition metrics for the primary face, if any.
    ///
    /// With no face, rule of thirds and framing take the neutral fallback.
    /// Aspect ratio, balance and distraction always use the whole frame.
    #[must_use]
    pub fn composition(
        &self,
        face: Option<&DetectedFace>,
        dims: ImageDimensions,
        luma: &GrayImage,
        edges: Option<&EdgeMap>,
    ) -> CompositionMetrics {
        let (rule_of_thirds_score, framing_score) = face.map_or_else(
            || (Score::neutral(), Score::neutral()),
            |f| {
                (
                    self.rule_of_thirds(&f.bbox, dims),
                    self.framing(f.size_ratio(dims)),
                )
            },
        );

        CompositionMetrics {
            rule_of_thirds_score,
            framing_score,
            balance_score: self.balance(luma),
            aspect_ratio_score: self.aspect_ratio(dims),
            distraction_level: self.distraction(edges, face.map(|f| &f.bbox)),
        }
    }
}

/// Highest-confidence face. Ties keep the earliest face.
#[must_use]
pub fn primary_face(faces: &[DetectedFace]) -> Option<&DetectedFace> {
    faces.iter().fold(None, |best: Option<&DetectedFace>, face| match best {
        Some(b) if b.clamped_confidence() >= face.clamped_confidence() => Some(b),
        _ => Some(face),
    })
}

/// Arg-max of the expression distribution averaged over all faces.
///
/// Faces without a label contribute zero for it. Ties pick the
/// alphabetically first label.
#[must_use]
pub fn dominant_expression(faces: &[DetectedFace]) -> Option<String> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for face in faces {
        for (label, p) in &face.expressions {
            if p.is_finite() {
                *totals.entry(label.as_str()).or_default() += p;
            }
        }
    }

    // Dividing by the face count does not change the arg-max.
    totals
        .into_iter()
        .fold(None, |best: Option<(&str, f64)>, (label, total)| match best {
            Some((_, b)) if b >= total => best,
            _ => Some((label, total)),
        })
        .map(|(label, _)| label.to_string())
}

/// Count of faces per gender label.
#[must_use]
pub fn gender_distribution(faces: &[DetectedFace]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for gender in faces.iter().filter_map(|f| f.gender.as_deref()) {
        *counts.entry(gender.to_string()).or_default() += 1;
    }
    counts
}

/// Face metadata for the result.
#[must_use]
pub fn face_summary(faces: &[DetectedFace]) -> FaceSummary {
    let ages: Vec<f64> = faces
        .iter()
        .filter_map(|f| f.age)
        .filter(|a| a.is_finite())
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let average_age = (!ages.is_empty()).then(|| ages.iter().sum::<f64>() / ages.len() as f64);

    FaceSummary {
        faces_detected: faces.len(),
        primary_confidence: primary_face(faces).map(DetectedFace::clamped_confidence),
        average_age,
        dominant_expression: dominant_expression(faces),
        gender_distribution: gender_distribution(faces),
    }
}

fn centroid(points: &[Point]) -> Point {
    #[allow(clippy::cast_precision_loss)]
    let n = points.len().max(1) as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::{ImageBuffer, Luma};

    use super::*;
    use crate::domain::LANDMARK_COUNT;

    fn landmarks_with(nose_x: f64) -> Landmarks {
        let mut points = vec![Point::new(50.0, 50.0); LANDMARK_COUNT];
        for i in LEFT_EYE {
            points[i] = Point::new(35.0, 40.0);
        }
        for i in RIGHT_EYE {
            points[i] = Point::new(65.0, 40.0);
        }
        points[NOSE_TIP] = Point::new(nose_x, 55.0);
        for i in MOUTH {
            points[i] = Point::new(50.0, 70.0);
        }
        Landmarks::new(points)
    }

    #[test]
    fn test_symmetric_landmarks_score_full() {
        let analyzer = FaceGeometryAnalyzer::default();
        let score = analyzer.symmetry(Some(&landmarks_with(50.0)));
        assert!(!score.is_fallback());
        assert!((score.value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_skewed_landmarks_score_lower() {
        let analyzer = FaceGeometryAnalyzer::default();
        let symmetric = analyzer.symmetry(Some(&landmarks_with(50.0)));
        let skewed = analyzer.symmetry(Some(&landmarks_with(56.0)));
        assert!(skewed.value < symmetric.value);
    }

    #[test]
    fn test_incomplete_landmarks_are_neutral() {
        let analyzer = FaceGeometryAnalyzer::default();
        let partial = Landmarks::new(vec![Point::new(1.0, 1.0); 5]);
        assert!(analyzer.symmetry(Some(&partial)).is_fallback());
        assert!(analyzer.symmetry(None).is_fallback());
    }

    #[test]
    fn test_framing_band() {
        let analyzer = FaceGeometryAnalyzer::default();
        assert!((analyzer.framing(0.20).value - 100.0).abs() < 1e-9);
        assert!((analyzer.framing(0.12).value - 80.0).abs() < 1e-9);
        assert!((analyzer.framing(0.35).value - 80.0).abs() < 1e-9);
        // 0.60 is 0.20 past the band: 80 - 5 - 2000 * 0.04 < 0 -> floor
        assert!((analyzer.framing(0.60).value - 20.0).abs() < 1e-9);
        assert!((analyzer.framing(0.05).value - 70.0).abs() < 1e-9);
        // Just past either edge already sits a full step below the band.
        assert!(analyzer.framing(0.401).value < 75.01);
        assert!(analyzer.framing(0.099).value < 75.01);
    }

    #[test]
    fn test_rule_of_thirds_on_intersection() {
        let analyzer = FaceGeometryAnalyzer::default();
        let dims = ImageDimensions::new(300, 300);
        let on_point = BoundingBox::new(80.0, 80.0, 40.0, 40.0);
        let centered = BoundingBox::new(130.0, 130.0, 40.0, 40.0);

        assert!((analyzer.rule_of_thirds(&on_point, dims).value - 100.0).abs() < 1e-9);
        assert!(analyzer.rule_of_thirds(&centered, dims).value < 100.0);
    }

    #[test]
    fn test_aspect_ratio() {
        let analyzer = FaceGeometryAnalyzer::default();
        assert!((analyzer.aspect_ratio(ImageDimensions::new(500, 500)).value - 100.0).abs() < 1e-9);
        assert!((analyzer.aspect_ratio(ImageDimensions::new(300, 400)).value - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_balance_uniform_vs_split() {
        let analyzer = FaceGeometryAnalyzer::default();
        let uniform: GrayImage = ImageBuffer::from_pixel(20, 20, Luma([90]));
        let split: GrayImage =
            ImageBuffer::from_fn(20, 20, |x, _| Luma([if x < 10 { 0 } else { 255 }]));

        assert!((analyzer.balance(&uniform).value - 100.0).abs() < 1e-9);
        assert!(analyzer.balance(&split).value < 100.0);
        assert!(analyzer.balance(&GrayImage::new(1, 5)).is_fallback());
    }

    #[test]
    fn test_distraction_levels() {
        let analyzer = FaceGeometryAnalyzer::default();
        let calm: EdgeMap = ImageBuffer::from_pixel(10, 10, Luma([0_i16]));
        let busy: EdgeMap = ImageBuffer::from_pixel(10, 10, Luma([-200_i16]));
        let whole = BoundingBox::new(0.0, 0.0, 10.0, 10.0);

        assert_eq!(analyzer.distraction(Some(&calm), None), DistractionLevel::Low);
        assert_eq!(analyzer.distraction(Some(&busy), None), DistractionLevel::High);
        assert_eq!(analyzer.distraction(Some(&busy), Some(&whole)), DistractionLevel::Low);
        assert_eq!(analyzer.distraction(None, None), DistractionLevel::Medium);
    }

    #[test]
    fn test_primary_face_prefers_confidence_then_order() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let faces = vec![
            DetectedFace::new(0.7, bbox).with_age(20.0),
            DetectedFace::new(0.9, bbox).with_age(30.0),
            DetectedFace::new(0.9, bbox).with_age(40.0),
        ];
        assert_eq!(primary_face(&faces).unwrap().age, Some(30.0));
        assert!(primary_face(&[]).is_none());
    }

    #[test]
    fn test_face_summary_metadata() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let faces = vec![
            DetectedFace::new(0.8, bbox)
                .with_expressions([("happy", 0.6), ("neutral", 0.4)])
                .with_age(20.0)
                .with_gender("female"),
            DetectedFace::new(0.6, bbox)
                .with_expressions([("neutral", 0.9), ("happy", 0.1)])
                .with_age(30.0)
                .with_gender("female"),
        ];

        let summary = face_summary(&faces);
        assert_eq!(summary.faces_detected, 2);
        assert_eq!(summary.primary_confidence, Some(0.8));
        assert_eq!(summary.average_age, Some(25.0));
        assert_eq!(summary.dominant_expression.as_deref(), Some("neutral"));
        assert_eq!(summary.gender_distribution.get("female"), Some(&2));
    }

    #[test]
    fn test_composition_without_face() {
        let analyzer = FaceGeometryAnalyzer::default();
        let luma: GrayImage = ImageBuffer::from_pixel(40, 40, Luma([128]));
        let m = analyzer.composition(None, ImageDimensions::new(40, 40), &luma, None);

        assert!(m.rule_of_thirds_score.is_fallback());
        assert!(m.framing_score.is_fallback());
        assert!(!m.aspect_ratio_score.is_fallback());
        assert!(!m.balance_score.is_fallback());
    }
}

//! End-to-end tests for single-photo analysis.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use profile_photo_core::domain::{
    DistractionLevel, PhotoAnalysisResult, PhotoMetadata, RecommendationKind, Score,
};
use profile_photo_core::{InvalidImageError, PhotoAnalyzer};
use profile_photo_test_support::{
    FaceBuilder, FailingFilter, LandmarkBuilder, MockFaceDetector, SyntheticImageBuilder,
};

fn portrait_png() -> Vec<u8> {
    SyntheticImageBuilder::png(&SyntheticImageBuilder::portrait_scene(400, 500))
}

fn all_scores(r: &PhotoAnalysisResult) -> Vec<Score> {
    let q = &r.quality;
    let c = &r.composition;
    let a = &r.attractiveness;
    vec![
        q.resolution_score,
        q.sharpness_score,
        q.lighting_score,
        q.color_balance_score,
        q.noise_score,
        c.rule_of_thirds_score,
        c.framing_score,
        c.balance_score,
        c.aspect_ratio_score,
        a.face_symmetry,
        a.facial_features,
        a.lighting_quality,
        a.composition,
        a.background_quality,
        a.image_sharpness,
        a.color_balance,
    ]
}

fn assert_bounded(r: &PhotoAnalysisResult) {
    for score in all_scores(r) {
        assert!((0.0..=100.0).contains(&score.value), "{score:?} out of range");
    }
    assert!((0.0..=100.0).contains(&r.attractiveness.overall_score));
    assert!((0.0..=100.0).contains(&r.overall_rating));
    assert!((0.0..=100.0).contains(&r.overall_quality_score));
}

#[test]
fn test_portrait_with_supplied_face() {
    let face = FaceBuilder::portrait(400, 500);
    let metadata = PhotoMetadata::with_faces(vec![face]);

    let result = PhotoAnalyzer::default()
        .analyze_photo(&portrait_png(), Some(&metadata))
        .unwrap();

    assert_bounded(&result);
    assert_eq!(result.faces_detected(), 1);
    assert_eq!(result.format.as_deref(), Some("png"));
    assert_eq!(result.channels, 3);
    assert!(result.warning.is_none());

    assert!(!result.attractiveness.face_symmetry.is_fallback());
    assert!(result.attractiveness.face_symmetry.value > 99.0);
    assert!(!result.attractiveness.facial_features.is_fallback());
    assert!((result.composition.framing_score.value - 100.0).abs() < 1e-9);
    assert_eq!(result.faces.dominant_expression.as_deref(), Some("happy"));
    assert!(!result
        .recommendations
        .iter()
        .any(|r| r.kind == RecommendationKind::FaceVisibility));
}

#[test]
fn test_zero_faces_is_degraded_not_failed() {
    let metadata = PhotoMetadata::with_faces(vec![]);
    let result = PhotoAnalyzer::default()
        .analyze_photo(&portrait_png(), Some(&metadata))
        .unwrap();

    assert_bounded(&result);
    assert_eq!(result.faces_detected(), 0);
    assert!(result.attractiveness.facial_features.is_fallback());
    assert!((result.attractiveness.facial_features.value - 50.0).abs() < f64::EPSILON);
    assert!(result.attractiveness.face_symmetry.is_fallback());
    assert!(result.composition.rule_of_thirds_score.is_fallback());
    assert!(result.composition.framing_score.is_fallback());
    assert!(!result.composition.aspect_ratio_score.is_fallback());
    assert!(!result.composition.balance_score.is_fallback());
    assert!(result.warning.is_none());

    let face_rec = result
        .recommendations
        .iter()
        .find(|r| r.kind == RecommendationKind::FaceVisibility)
        .unwrap();
    assert!(face_rec.message.contains("not clearly visible"));
    assert!(!result
        .recommendations
        .iter()
        .any(|r| r.kind == RecommendationKind::Composition));
}

#[test]
fn test_unavailable_detector_sets_warning() {
    let result = PhotoAnalyzer::default()
        .analyze_photo(&portrait_png(), None)
        .unwrap();

    assert_eq!(result.faces_detected(), 0);
    assert!(result.warning.as_deref().unwrap().contains("unavailable"));
}

#[test]
fn test_detector_used_only_without_supplied_faces() {
    let detector = Arc::new(MockFaceDetector::returning(vec![FaceBuilder::portrait(
        400, 500,
    )]));
    let analyzer = PhotoAnalyzer::default().with_face_detector(detector.clone());

    let result = analyzer.analyze_photo(&portrait_png(), None).unwrap();
    assert_eq!(result.faces_detected(), 1);
    assert_eq!(detector.call_count(), 1);

    let metadata = PhotoMetadata::with_faces(vec![]);
    let result = analyzer
        .analyze_photo(&portrait_png(), Some(&metadata))
        .unwrap();
    assert_eq!(result.faces_detected(), 0);
    assert_eq!(detector.call_count(), 1);
}

#[test]
fn test_corrupt_buffers_are_invalid_images() {
    let analyzer = PhotoAnalyzer::default();
    let img = SyntheticImageBuilder::checkerboard(64, 64);

    assert!(matches!(
        analyzer.analyze_photo(&SyntheticImageBuilder::truncated_png(&img), None),
        Err(InvalidImageError::Undecodable { .. })
    ));
    assert!(matches!(
        analyzer.analyze_photo(&SyntheticImageBuilder::garbage(), None),
        Err(InvalidImageError::Undecodable { .. })
    ));
    assert!(matches!(
        analyzer.analyze_photo(&[], None),
        Err(InvalidImageError::Empty)
    ));
}

#[test]
fn test_repeated_analysis_is_identical() {
    let analyzer = PhotoAnalyzer::default();
    let bytes = portrait_png();
    let metadata = PhotoMetadata::with_faces(vec![FaceBuilder::portrait(400, 500)]);

    let mut first = analyzer.analyze_photo(&bytes, Some(&metadata)).unwrap();
    let mut second = analyzer.analyze_photo(&bytes, Some(&metadata)).unwrap();
    for r in [&mut first, &mut second] {
        r.analyzed_at.clear();
        r.processing_time_ms = 0;
    }

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_symmetric_face_beats_skewed_face() {
    let analyzer = PhotoAnalyzer::default();
    let bytes = portrait_png();

    let symmetric = FaceBuilder::portrait(400, 500);
    let b = symmetric.bbox;
    let skewed = symmetric.clone().with_landmarks(
        LandmarkBuilder::for_box(&b)
            .nose_shift(0.15)
            .mouth_shift(0.2)
            .eye_tilt(0.1)
            .build(),
    );

    let sym = analyzer
        .analyze_photo(&bytes, Some(&PhotoMetadata::with_faces(vec![symmetric])))
        .unwrap();
    let skw = analyzer
        .analyze_photo(&bytes, Some(&PhotoMetadata::with_faces(vec![skewed])))
        .unwrap();

    assert!(sym.attractiveness.face_symmetry.value > skw.attractiveness.face_symmetry.value);
    assert!(sym.attractiveness.overall_score >= skw.attractiveness.overall_score);
}

#[test]
fn test_reported_framing_drops_at_band_edges() {
    let analyzer = PhotoAnalyzer::default();
    let bytes = SyntheticImageBuilder::png(&SyntheticImageBuilder::portrait_scene(1000, 1000));
    let framing = |ratio: f64| {
        let face = FaceBuilder::centered(1000, 1000, ratio, 0.95);
        analyzer
            .analyze_photo(&bytes, Some(&PhotoMetadata::with_faces(vec![face])))
            .unwrap()
            .composition
            .framing_score
            .value
    };

    let inside_high = framing(0.399);
    let inside_low = framing(0.101);
    assert!((inside_high - 80.0).abs() < 1e-9);
    assert!((inside_low - 80.0).abs() < 1e-9);

    let outside_high = framing(0.404);
    let outside_low = framing(0.097);
    assert!(outside_high < inside_high, "0.404 reported {outside_high}");
    assert!(outside_low < inside_low, "0.097 reported {outside_low}");
    assert!(framing(0.45) < outside_high);
    assert!(framing(0.07) < outside_low);
}

#[test]
fn test_failing_filter_degrades_metrics() {
    let analyzer = PhotoAnalyzer::default().with_filter(Arc::new(FailingFilter));
    let result = analyzer
        .analyze_photo(&portrait_png(), Some(&PhotoMetadata::with_faces(vec![])))
        .unwrap();

    assert_bounded(&result);
    assert!(result.quality.sharpness_score.is_fallback());
    assert!(result.quality.noise_score.is_fallback());
    assert_eq!(result.composition.distraction_level, DistractionLevel::Medium);
    assert!(result.warning.as_deref().unwrap().contains("filter backend failed"));
}

#[test]
fn test_grayscale_color_balance_fallback() {
    let bytes = SyntheticImageBuilder::png(&SyntheticImageBuilder::checkerboard(64, 64));
    let result = PhotoAnalyzer::default()
        .analyze_photo(&bytes, Some(&PhotoMetadata::with_faces(vec![])))
        .unwrap();

    assert_eq!(result.channels, 1);
    assert!(result.quality.color_balance_score.is_fallback());
    assert!((result.quality.color_balance_score.value - 70.0).abs() < f64::EPSILON);
}

#[test]
fn test_scores_bounded_across_inputs() {
    let analyzer = PhotoAnalyzer::default();
    let images = [
        SyntheticImageBuilder::uniform_gray(3, 3, 0),
        SyntheticImageBuilder::uniform_gray(50, 10, 255),
        SyntheticImageBuilder::speckled(80, 80),
        SyntheticImageBuilder::horizontal_gradient(300, 40),
        SyntheticImageBuilder::dark_scene(60, 90),
        SyntheticImageBuilder::rgb_uniform(40, 40, 255, 0, 0),
    ];

    for img in &images {
        let bytes = SyntheticImageBuilder::png(img);
        let faces = vec![FaceBuilder::centered(img.width(), img.height(), 0.9, 1.0)];
        let with_face = analyzer
            .analyze_photo(&bytes, Some(&PhotoMetadata::with_faces(faces)))
            .unwrap();
        let without = analyzer.analyze_photo(&bytes, None).unwrap();
        assert_bounded(&with_face);
        assert_bounded(&without);
    }
}

#[test]
fn test_jpeg_input() {
    let img = SyntheticImageBuilder::portrait_scene(120, 160);
    let result = PhotoAnalyzer::default()
        .analyze_photo(&SyntheticImageBuilder::jpeg(&img), None)
        .unwrap();
    assert_eq!(result.format.as_deref(), Some("jpeg"));
    assert_eq!(result.dimensions.width, 120);
}

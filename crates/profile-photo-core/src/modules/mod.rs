//! Scoring components.
//!
//! Two leaf analyzers (pixel measurements and face geometry), a non-scoring
//! lifestyle tagger, the composite engine, the presentation stage with its
//! recommendation rules, and the batch coordinator.

mod batch;
mod geometry;
mod lifestyle;
mod measurement;
mod presentation;
mod recommendations;
mod scoring;

pub use batch::{summarize, BatchCoordinator};
pub use geometry::{
    dominant_expression, face_summary, gender_distribution, primary_face, FaceGeometryAnalyzer,
    GeometryConfig,
};
pub use lifestyle::{LifestyleConfig, LifestyleContextClassifier};
pub use measurement::{
    color_balance, lighting, measure, noise, resolution, sharpness, ImageMeasurementExtractor,
    MeasurementConfig, Measurements, SINGLE_CHANNEL_COLOR_BALANCE,
};
pub use presentation::{iso_timestamp, ResultContext, ResultPresenter, SCORE_DECIMALS};
pub use recommendations::{RecommendationConfig, RecommendationGenerator};
pub use scoring::{
    AttractivenessWeights, CompositeScoringEngine, RatingWeights, ScoreCard, ScoringConfig,
    ScoringInput, TierThresholds, WEIGHT_TOLERANCE,
};

//! Core domain types for profile photo scoring.

mod batch;
mod face;
mod metrics;
mod raw_image;
mod result;
mod score;
mod stats;

pub use batch::{BatchEntry, BatchResult, BatchSummary, PhotoMetadata, PhotoUpload};
pub use face::{BoundingBox, DetectedFace, Landmarks, Point, LANDMARK_COUNT};
pub use metrics::{CompositionMetrics, DistractionLevel, QualityMetrics};
pub use raw_image::{ImageDimensions, RawImage};
pub use result::{
    AttractivenessBreakdown, FaceSummary, LifestyleTag, PhotoAnalysisResult, Priority,
    QualityTier, Recommendation, RecommendationKind,
};
pub use score::{clamp_score, round_to, Score, ScoreOrigin, NEUTRAL_SCORE, SCORE_MAX, SCORE_MIN};
pub(crate) use stats::ChannelAccumulator;
pub use stats::{ChannelStats, PixelStatistics};

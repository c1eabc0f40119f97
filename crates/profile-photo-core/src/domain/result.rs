//! Analysis result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{CompositionMetrics, ImageDimensions, QualityMetrics, Score};

/// Weighted attractiveness components, each in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttractivenessBreakdown {
    /// Landmark symmetry of the primary face.
    pub face_symmetry: Score,
    /// Detection confidence and face size.
    pub facial_features: Score,
    /// Lighting score.
    pub lighting_quality: Score,
    /// Mean composition score.
    pub composition: Score,
    /// Proxy built from color balance and noise.
    pub background_quality: Score,
    /// Sharpness score.
    pub image_sharpness: Score,
    /// Color balance score.
    pub color_balance: Score,
    /// Weighted sum of the components, clamped to `0.0..=100.0`.
    pub overall_score: f64,
}

/// Discrete quality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    /// 90 and above.
    Excellent,
    /// 80 and above.
    VeryGood,
    /// 70 and above.
    Good,
    /// 60 and above.
    Fair,
    /// Below 60.
    Poor,
}

impl QualityTier {
    /// Stable snake-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::VeryGood => "very_good",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Area a recommendation addresses.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Overall technical quality.
    Quality,
    /// Lighting.
    Lighting,
    /// No face was found.
    FaceVisibility,
    /// Subject placement.
    Composition,
    /// Background clutter.
    Background,
    /// Overall appeal.
    Attractiveness,
}

/// Recommendation urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Fix first.
    High,
    /// Worth fixing.
    Medium,
    /// Nice to have.
    Low,
}

/// An actionable improvement message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Area addressed.
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// Urgency.
    pub priority: Priority,
    /// Human-readable advice.
    pub message: String,
}

/// Best-effort context tag. Never scored.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifestyleTag {
    /// Taller than wide.
    Portrait,
    /// Wider than tall.
    Landscape,
    /// Roughly square.
    Square,
    /// Dark scene.
    LowLight,
    /// Bright, well-lit scene.
    BrightDaylight,
    /// Red-dominant palette.
    WarmTones,
    /// Blue-dominant palette.
    CoolTones,
    /// Two or more faces.
    GroupPhoto,
    /// One face.
    SoloPortrait,
    /// Face fills a large part of the frame.
    CloseUp,
}

/// Face metadata. Only the primary face feeds scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceSummary {
    /// Number of faces supplied by the provider.
    pub faces_detected: usize,
    /// Confidence of the highest-confidence face.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_confidence: Option<f64>,
    /// Mean estimated age over faces that report one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_age: Option<f64>,
    /// Arg-max of the averaged expression distribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_expression: Option<String>,
    /// Count of faces per gender label.
    pub gender_distribution: BTreeMap<String, usize>,
}

/// Complete result for one photo. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAnalysisResult {
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// Number of color channels.
    pub channels: u8,
    /// Container format, if recognised.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Encoded size in bytes.
    pub byte_size: usize,
    /// Technical quality metrics.
    pub quality: QualityMetrics,
    /// Mean of the quality metrics.
    pub overall_quality_score: f64,
    /// Tier derived from `overall_quality_score`.
    pub quality_tier: QualityTier,
    /// Composition metrics.
    pub composition: CompositionMetrics,
    /// Attractiveness components and their weighted sum.
    pub attractiveness: AttractivenessBreakdown,
    /// Usability blend of attractiveness, quality, composition and face presence.
    pub overall_rating: f64,
    /// Face metadata.
    pub faces: FaceSummary,
    /// Context tags, never scored.
    pub lifestyle_tags: Vec<LifestyleTag>,
    /// Ordered improvement advice.
    pub recommendations: Vec<Recommendation>,
    /// Set when an optional signal was unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Time of analysis (RFC 3339).
    pub analyzed_at: String,
    /// Wall-clock analysis time in milliseconds.
    pub processing_time_ms: u64,
}

impl PhotoAnalysisResult {
    /// Number of detected faces.
    #[must_use]
    pub const fn faces_detected(&self) -> usize {
        self.faces.faces_detected
    }
}

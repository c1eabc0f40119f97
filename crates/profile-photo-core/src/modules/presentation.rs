//! Presentation stage: rounding, tier labels and recommendations.

use tracing::debug;

use crate::domain::{
    round_to, AttractivenessBreakdown, CompositionMetrics, FaceSummary, ImageDimensions,
    LifestyleTag, PhotoAnalysisResult, QualityMetrics, Score,
};

use super::recommendations::RecommendationGenerator;
use super::scoring::{ScoreCard, TierThresholds};

/// Decimal places kept on reported sub-scores.
pub const SCORE_DECIMALS: u8 = 1;

/// Non-numeric facts reported alongside the scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultContext {
    /// Image dimensions.
    pub dimensions: ImageDimensions,
    /// Number of color channels.
    pub channels: u8,
    /// Container format label.
    pub format: Option<String>,
    /// Encoded size in bytes.
    pub byte_size: usize,
    /// Face metadata.
    pub faces: FaceSummary,
    /// Context tags.
    pub lifestyle_tags: Vec<LifestyleTag>,
    /// Degradation notice.
    pub warning: Option<String>,
    /// RFC 3339 analysis time.
    pub analyzed_at: String,
    /// Wall-clock analysis time.
    pub processing_time_ms: u64,
}

/// Turns a numeric scorecard into a reported result.
#[derive(Debug, Clone, Default)]
pub struct ResultPresenter {
    tiers: TierThresholds,
    recommendations: RecommendationGenerator,
}

impl ResultPresenter {
    /// Creates a presenter.
    #[must_use]
    pub const fn new(tiers: TierThresholds, recommendations: RecommendationGenerator) -> Self {
        Self {
            tiers,
            recommendations,
        }
    }

    /// Rounds the scorecard, labels its tier and attaches recommendations.
    ///
    /// The tier is derived from the reported (rounded) quality score so the
    /// label always agrees with the number next to it.
    #[must_use]
    pub fn present(&self, card: &ScoreCard, context: ResultContext) -> PhotoAnalysisResult {
        let overall_quality_score = round_to(card.overall_quality.value, SCORE_DECIMALS);
        let quality_tier = self.tiers.tier(overall_quality_score);

        let mut result = PhotoAnalysisResult {
            dimensions: context.dimensions,
            channels: context.channels,
            format: context.format,
            byte_size: context.byte_size,
            quality: round_quality(&card.quality),
            overall_quality_score,
            quality_tier,
            composition: round_composition(&card.composition),
            attractiveness: round_attractiveness(&card.attractiveness),
            overall_rating: round_to(card.overall_rating, SCORE_DECIMALS),
            faces: context.faces,
            lifestyle_tags: context.lifestyle_tags,
            recommendations: Vec::new(),
            warning: context.warning,
            analyzed_at: context.analyzed_at,
            processing_time_ms: context.processing_time_ms,
        };
        result.recommendations = self.recommendations.generate(&result);

        debug!(
            "Presented result: quality {} ({}), attractiveness {}, {} recommendation(s)",
            result.overall_quality_score,
            result.quality_tier,
            result.attractiveness.overall_score,
            result.recommendations.len()
        );
        result
    }
}

fn round(score: Score) -> Score {
    score.rounded(SCORE_DECIMALS)
}

fn round_quality(q: &QualityMetrics) -> QualityMetrics {
    QualityMetrics {
        resolution_score: round(q.resolution_score),
        sharpness_score: round(q.sharpness_score),
        lighting_score: round(q.lighting_score),
        color_balance_score: round(q.color_balance_score),
        noise_score: round(q.noise_score),
    }
}

fn round_composition(c: &CompositionMetrics) -> CompositionMetrics {
    CompositionMetrics {
        rule_of_thirds_score: round(c.rule_of_thirds_score),
        framing_score: round(c.framing_score),
        balance_score: round(c.balance_score),
        aspect_ratio_score: round(c.aspect_ratio_score),
        distraction_level: c.distraction_level,
    }
}

fn round_attractiveness(a: &AttractivenessBreakdown) -> AttractivenessBreakdown {
    AttractivenessBreakdown {
        face_symmetry: round(a.face_symmetry),
        facial_features: round(a.facial_features),
        lighting_quality: round(a.lighting_quality),
        composition: round(a.composition),
        background_quality: round(a.background_quality),
        image_sharpness: round(a.image_sharpness),
        color_balance: round(a.color_balance),
        overall_score: round_to(a.overall_score, 0),
    }
}

/// Current UTC time as RFC 3339.
#[must_use]
pub fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

//! Improvement advice derived from a finished result.

use crate::domain::{
    DistractionLevel, PhotoAnalysisResult, Priority, Recommendation, RecommendationKind,
};

/// Rule thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationConfig {
    /// Overall quality below which the quality rule fires.
    pub min_quality: f64,
    /// Lighting below which the lighting rule fires.
    pub min_lighting: f64,
    /// Rule-of-thirds score below which the composition rule fires.
    pub min_rule_of_thirds: f64,
    /// Attractiveness below which the appeal rule fires.
    pub min_attractiveness: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_quality: 70.0,
            min_lighting: 60.0,
            min_rule_of_thirds: 50.0,
            min_attractiveness: 60.0,
        }
    }
}

/// Deterministic rule table.
///
/// Rules are independent and evaluated in a fixed order, so the output order
/// is stable for a given result.
#[derive(Debug, Clone, Default)]
pub struct RecommendationGenerator {
    config: RecommendationConfig,
}

impl RecommendationGenerator {
    /// Creates a generator with the given thresholds.
    #[must_use]
    pub const fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Evaluates every rule against a result.
    #[must_use]
    pub fn generate(&self, result: &PhotoAnalysisResult) -> Vec<Recommendation> {
        let c = &self.config;
        let has_face = result.faces_detected() > 0;

        let rules = [
            (
                result.overall_quality_score < c.min_quality,
                RecommendationKind::Quality,
                Priority::High,
                "Use a higher-resolution, sharper photo with less noise",
            ),
            (
                result.quality.lighting_score.value < c.min_lighting,
                RecommendationKind::Lighting,
                Priority::Medium,
                "Improve lighting: face a window or shoot in soft daylight",
            ),
            (
                !has_face,
                RecommendationKind::FaceVisibility,
                Priority::High,
                "Face not clearly visible: make sure your face is in frame and unobstructed",
            ),
            (
                has_face && result.composition.rule_of_thirds_score.value < c.min_rule_of_thirds,
                RecommendationKind::Composition,
                Priority::Low,
                "Position your face near a rule-of-thirds point for a more balanced shot",
            ),
            (
                result.composition.distraction_level == DistractionLevel::High,
                RecommendationKind::Background,
                Priority::Medium,
                "Choose a simpler background so attention stays on you",
            ),
            (
                result.attractiveness.overall_score < c.min_attractiveness,
                RecommendationKind::Attractiveness,
                Priority::Medium,
                "Try a natural smile, better lighting and a closer crop",
            ),
        ];

        rules
            .into_iter()
            .filter(|(fires, ..)| *fires)
            .map(|(_, kind, priority, message)| Recommendation {
                kind,
                priority,
                message: message.to_string(),
            })
            .collect()
    }
}

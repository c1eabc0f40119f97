//! Quality and composition metric records.

use serde::{Deserialize, Serialize};

use super::Score;

/// Technical quality metrics, each in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Resolution relative to a 1080px short side.
    pub resolution_score: Score,
    /// Edge-response variance.
    pub sharpness_score: Score,
    /// Brightness and contrast.
    pub lighting_score: Score,
    /// Agreement between channel means.
    pub color_balance_score: Score,
    /// Inverse of high-frequency noise.
    pub noise_score: Score,
}

impl QualityMetrics {
    /// Mean of the five quality metrics.
    #[must_use]
    pub fn overall(&self) -> Score {
        Score::mean_of(&[
            self.resolution_score,
            self.sharpness_score,
            self.lighting_score,
            self.color_balance_score,
            self.noise_score,
        ])
    }
}

/// How busy the frame is around the subject.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionLevel {
    /// Calm background.
    Low,
    /// Some clutter.
    Medium,
    /// Busy background competing with the subject.
    High,
}

/// Composition metrics, each in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositionMetrics {
    /// Proximity of the face center to a rule-of-thirds intersection.
    pub rule_of_thirds_score: Score,
    /// Face size relative to the frame.
    pub framing_score: Score,
    /// Evenness of brightness across quadrants.
    pub balance_score: Score,
    /// Closeness of the frame to a square crop.
    pub aspect_ratio_score: Score,
    /// Background clutter classification.
    pub distraction_level: DistractionLevel,
}

impl CompositionMetrics {
    /// Mean of the four composition scores.
    #[must_use]
    pub fn overall(&self) -> Score {
        Score::mean_of(&[
            self.rule_of_thirds_score,
            self.framing_score,
            self.balance_score,
            self.aspect_ratio_score,
        ])
    }
}

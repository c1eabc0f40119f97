//! Composite scoring.
//!
//! Fuses the quality, composition and face metrics into the attractiveness
//! breakdown and the overall rating. Output of this stage is purely numeric;
//! rounding and labels are applied by [`super::presentation`].

use serde::{Deserialize, Serialize};

use crate::domain::{
    clamp_score, AttractivenessBreakdown, CompositionMetrics, DetectedFace, ImageDimensions,
    QualityMetrics, QualityTier, Score,
};
use crate::error::ConfigError;

/// Tolerance for weight tables summing to 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Weights of the seven attractiveness components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractivenessWeights {
    /// Weight of landmark symmetry.
    pub face_symmetry: f64,
    /// Weight of confidence and face size.
    pub facial_features: f64,
    /// Weight of lighting.
    pub lighting_quality: f64,
    /// Weight of the mean composition score.
    pub composition: f64,
    /// Weight of the background proxy.
    pub background_quality: f64,
    /// Weight of sharpness.
    pub image_sharpness: f64,
    /// Weight of color balance.
    pub color_balance: f64,
}

impl Default for AttractivenessWeights {
    fn default() -> Self {
        Self {
            face_symmetry: 0.25,
            facial_features: 0.20,
            lighting_quality: 0.15,
            composition: 0.15,
            background_quality: 0.10,
            image_sharpness: 0.10,
            color_balance: 0.05,
        }
    }
}

impl AttractivenessWeights {
    /// Named weights in declaration order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("face_symmetry", self.face_symmetry),
            ("facial_features", self.facial_features),
            ("lighting_quality", self.lighting_quality),
            ("composition", self.composition),
            ("background_quality", self.background_quality),
            ("image_sharpness", self.image_sharpness),
            ("color_balance", self.color_balance),
        ]
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }
}

/// Weights of the overall-rating blend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingWeights {
    /// Weight of the attractiveness score.
    pub attractiveness: f64,
    /// Weight of the overall quality score.
    pub quality: f64,
    /// Weight of the composition score.
    pub composition: f64,
    /// Weight of the face-detection bonus.
    pub face_bonus: f64,
}

impl Default for RatingWeights {
    fn default() -> Self {
        Self {
            attractiveness: 0.4,
            quality: 0.3,
            composition: 0.2,
            face_bonus: 0.1,
        }
    }
}

impl RatingWeights {
    /// Named weights in declaration order.
    #[must_use]
    pub const fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("attractiveness", self.attractiveness),
            ("quality", self.quality),
            ("composition", self.composition),
            ("face_bonus", self.face_bonus),
        ]
    }

    /// Sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }
}

/// Lower bounds of the quality tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Minimum score for `excellent`.
    pub excellent: f64,
    /// Minimum score for `very_good`.
    pub very_good: f64,
    /// Minimum score for `good`.
    pub good: f64,
    /// Minimum score for `fair`.
    pub fair: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: 90.0,
            very_good: 80.0,
            good: 70.0,
            fair: 60.0,
        }
    }
}

impl TierThresholds {
    /// Maps a score onto its tier.
    #[must_use]
    pub fn tier(&self, score: f64) -> QualityTier {
        if score >= self.excellent {
            QualityTier::Excellent
        } else if score >= self.very_good {
            QualityTier::VeryGood
        } else if score >= self.good {
            QualityTier::Good
        } else if score >= self.fair {
            QualityTier::Fair
        } else {
            QualityTier::Poor
        }
    }

    fn is_ordered(&self) -> bool {
        let t = [100.0, self.excellent, self.very_good, self.good, self.fair, 0.0];
        t.iter().all(|v| v.is_finite())
            && t[0] >= t[1]
            && t[1] > t[2]
            && t[2] > t[3]
            && t[3] > t[4]
            && t[4] >= t[5]
    }
}

/// Weight and threshold tables for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Attractiveness component weights.
    pub attractiveness: AttractivenessWeights,
    /// Overall-rating blend weights.
    pub rating: RatingWeights,
    /// Quality tier thresholds.
    pub tiers: TierThresholds,
    /// Bonus fed into the rating when at least one face is present.
    pub face_present_bonus: f64,
    /// Bonus fed into the rating when no face is present.
    pub face_absent_bonus: f64,
    /// Facial-features points per unit of confidence.
    pub confidence_scale: f64,
    /// Facial-features points per unit of face size ratio.
    pub size_ratio_scale: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            attractiveness: AttractivenessWeights::default(),
            rating: RatingWeights::default(),
            tiers: TierThresholds::default(),
            face_present_bonus: 80.0,
            face_absent_bonus: 20.0,
            confidence_scale: 100.0,
            size_ratio_scale: 200.0,
        }
    }
}

impl ScoringConfig {
    /// Checks weight sums, weight signs and tier ordering.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_table("attractiveness", &self.attractiveness.entries())?;
        check_table("rating", &self.rating.entries())?;
        if !self.tiers.is_ordered() {
            return Err(ConfigError::TierOrder);
        }
        Ok(())
    }
}

fn check_table(table: &'static str, entries: &[(&'static str, f64)]) -> Result<(), ConfigError> {
    if let Some(&(name, value)) = entries.iter().find(|(_, w)| !w.is_finite() || *w < 0.0) {
        return Err(ConfigError::InvalidWeight { table, name, value });
    }
    let sum: f64 = entries.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(ConfigError::WeightSum { table, sum });
    }
    Ok(())
}

/// Everything the engine fuses for one photo.
#[derive(Debug, Clone, Copy)]
pub struct ScoringInput<'a> {
    /// Technical quality metrics.
    pub quality: QualityMetrics,
    /// Composition metrics.
    pub composition: CompositionMetrics,
    /// Symmetry of the primary face.
    pub symmetry: Score,
    /// The primary face, if any.
    pub primary_face: Option<&'a DetectedFace>,
    /// Number of faces the provider reported.
    pub faces_detected: usize,
    /// Image dimensions.
    pub dimensions: ImageDimensions,
}

/// Numeric scoring output, before rounding and labelling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCard {
    /// Technical quality metrics.
    pub quality: QualityMetrics,
    /// Mean of the quality metrics.
    pub overall_quality: Score,
    /// Composition metrics.
    pub composition: CompositionMetrics,
    /// Mean of the composition metrics.
    pub composition_score: Score,
    /// Attractiveness components and their unrounded weighted sum.
    pub attractiveness: AttractivenessBreakdown,
    /// Unrounded overall rating.
    pub overall_rating: f64,
    /// Number of faces the provider reported.
    pub faces_detected: usize,
}

/// Stateless fusion of sub-scores into composite scores.
#[derive(Debug, Clone, Default)]
pub struct CompositeScoringEngine {
    config: ScoringConfig,
}

impl CompositeScoringEngine {
    /// Creates an engine after validating its configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the tables are inconsistent.
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Confidence and face size, or the neutral fallback without a face.
    #[must_use]
    pub fn facial_features(&self, face: Option<&DetectedFace>, dims: ImageDimensions) -> Score {
        face.map_or_else(Score::neutral, |f| {
            let raw = f.clamped_confidence() * self.config.confidence_scale
                + f.size_ratio(dims) * self.config.size_ratio_scale;
            Score::measured(raw.min(100.0))
        })
    }

    /// Mean of color balance and noise. A proxy, not segmentation.
    #[must_use]
    pub fn background_quality(quality: &QualityMetrics) -> Score {
        Score::mean_of(&[quality.color_balance_score, quality.noise_score])
    }

    /// Runs the numeric stage.
    #[must_use]
    pub fn score(&self, input: &ScoringInput<'_>) -> ScoreCard {
        let overall_quality = input.quality.overall();
        let composition_score = input.composition.overall();

        let mut attractiveness = AttractivenessBreakdown {
            face_symmetry: input.symmetry,
            facial_features: self.facial_features(input.primary_face, input.dimensions),
            lighting_quality: input.quality.lighting_score,
            composition: composition_score,
            background_quality: Self::background_quality(&input.quality),
            image_sharpness: input.quality.sharpness_score,
            color_balance: input.quality.color_balance_score,
            overall_score: 0.0,
        };
        attractiveness.overall_score = self.weighted_attractiveness(&attractiveness);

        let overall_rating = self.overall_rating(
            attractiveness.overall_score,
            overall_quality.value,
            composition_score.value,
            input.faces_detected,
        );

        ScoreCard {
            quality: input.quality,
            overall_quality,
            composition: input.composition,
            composition_score,
            attractiveness,
            overall_rating,
            faces_detected: input.faces_detected,
        }
    }

    fn weighted_attractiveness(&self, b: &AttractivenessBreakdown) -> f64 {
        let w = &self.config.attractiveness;
        clamp_score(
            w.face_symmetry * b.face_symmetry.value
                + w.facial_features * b.facial_features.value
                + w.lighting_quality * b.lighting_quality.value
                + w.composition * b.composition.value
                + w.background_quality * b.background_quality.value
                + w.image_sharpness * b.image_sharpness.value
                + w.color_balance * b.color_balance.value,
        )
    }

    /// Usability blend, computed independently of the attractiveness sum.
    #[must_use]
    pub fn overall_rating(
        &self,
        attractiveness: f64,
        quality: f64,
        composition: f64,
        faces_detected: usize,
    ) -> f64 {
        let w = &self.config.rating;
        let bonus = if faces_detected > 0 {
            self.config.face_present_bonus
        } else {
            self.config.face_absent_bonus
        };
        clamp_score(
            w.attractiveness * attractiveness
                + w.quality * quality
                + w.composition * composition
                + w.face_bonus * clamp_score(bonus),
        )
    }
}

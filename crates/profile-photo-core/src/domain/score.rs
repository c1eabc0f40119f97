//! Bounded scores with provenance.

use serde::{Deserialize, Serialize};

/// Lower bound of every score.
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score.
pub const SCORE_MAX: f64 = 100.0;

/// Neutral default used when a signal is missing.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Where a score value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrigin {
    /// Computed from the image or face data.
    Measured,
    /// Documented neutral default substituted for a missing signal.
    Fallback,
}

/// A score in `0.0..=100.0`, tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Score value in `0.0..=100.0`.
    pub value: f64,
    /// Whether the value was measured or substituted.
    pub origin: ScoreOrigin,
}

impl Score {
    /// Creates a measured score, clamped into range.
    #[must_use]
    pub fn measured(value: f64) -> Self {
        Self {
            value: clamp_score(value),
            origin: ScoreOrigin::Measured,
        }
    }

    /// Creates a fallback score, clamped into range.
    #[must_use]
    pub fn fallback(value: f64) -> Self {
        Self {
            value: clamp_score(value),
            origin: ScoreOrigin::Fallback,
        }
    }

    /// The neutral fallback (50).
    #[must_use]
    pub fn neutral() -> Self {
        Self::fallback(NEUTRAL_SCORE)
    }

    /// Returns true if the value is a substituted default.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.origin == ScoreOrigin::Fallback
    }

    /// Mean of several scores.
    ///
    /// The result is a fallback only when every input is a fallback.
    /// An empty slice yields the neutral fallback.
    #[must_use]
    pub fn mean_of(scores: &[Self]) -> Self {
        if scores.is_empty() {
            return Self::neutral();
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = scores.iter().map(|s| s.value).sum::<f64>() / scores.len() as f64;
        if scores.iter().all(Self::is_fallback) {
            Self::fallback(mean)
        } else {
            Self::measured(mean)
        }
    }

    /// Returns the score rounded to `decimals` places, keeping its origin.
    #[must_use]
    pub fn rounded(self, decimals: u8) -> Self {
        Self {
            value: round_to(self.value, decimals),
            origin: self.origin,
        }
    }
}

/// Clamps a value into `0.0..=100.0`. Non-finite values map to 0.
#[must_use]
pub fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(SCORE_MIN, SCORE_MAX)
    } else {
        SCORE_MIN
    }
}

/// Rounds half away from zero to `decimals` places.
#[must_use]
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (value * factor).round() / factor
}

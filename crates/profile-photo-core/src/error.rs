//! Error taxonomy for photo analysis.
//!
//! Only [`InvalidImageError`] ever reaches a caller of
//! [`PhotoAnalyzer::analyze_photo`](crate::PhotoAnalyzer::analyze_photo).
//! The other two are recovered inside the analyzer.

use thiserror::Error;

/// The photo buffer could not be turned into pixels.
#[derive(Debug, Error)]
pub enum InvalidImageError {
    /// The buffer holds no bytes.
    #[error("image buffer is empty")]
    Empty,
    /// The decoder rejected the buffer.
    #[error("failed to decode image buffer")]
    Undecodable {
        /// Source error from the `image` crate.
        #[source]
        source: image::ImageError,
    },
    /// The buffer decoded to an image with no pixels.
    #[error("decoded image has zero dimensions ({width}x{height})")]
    ZeroDimensions {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },
}

/// The face-detection backend could not be reached.
#[derive(Debug, Clone, Error)]
#[error("face detection backend `{backend}` unavailable: {reason}")]
pub struct FeatureUnavailableError {
    /// Name of the backend.
    pub backend: String,
    /// Why it is unavailable.
    pub reason: String,
}

impl FeatureUnavailableError {
    /// Creates a new error.
    #[must_use]
    pub fn new(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            reason: reason.into(),
        }
    }
}

/// A single sub-metric could not be computed.
#[derive(Debug, Clone, Error)]
#[error("failed to measure {metric}: {reason}")]
pub struct MeasurementError {
    /// Name of the metric.
    pub metric: &'static str,
    /// What went wrong.
    pub reason: String,
}

impl MeasurementError {
    /// Creates a new error.
    #[must_use]
    pub fn new(metric: &'static str, reason: impl Into<String>) -> Self {
        Self {
            metric,
            reason: reason.into(),
        }
    }
}

/// A scoring configuration failed validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A weight table does not sum to 1.0.
    #[error("{table} weights sum to {sum}, expected 1.0")]
    WeightSum {
        /// Name of the table.
        table: &'static str,
        /// Actual sum.
        sum: f64,
    },
    /// A weight is negative or not finite.
    #[error("{table} weight `{name}` is invalid: {value}")]
    InvalidWeight {
        /// Name of the table.
        table: &'static str,
        /// Name of the weight.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Tier thresholds are not strictly descending.
    #[error("quality tier thresholds must be strictly descending within 0-100")]
    TierOrder,
}

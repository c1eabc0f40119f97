//! Batch input and output records.

use serde::{Deserialize, Serialize};

use super::{DetectedFace, PhotoAnalysisResult};

/// Optional per-photo inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Face detections already produced by the external provider.
    ///
    /// `None` means the analyzer asks its own face detector.
    /// `Some(vec![])` means the provider ran and found nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faces: Option<Vec<DetectedFace>>,
}

impl PhotoMetadata {
    /// Metadata carrying pre-computed detections.
    #[must_use]
    pub const fn with_faces(faces: Vec<DetectedFace>) -> Self {
        Self { faces: Some(faces) }
    }
}

/// One encoded photo submitted for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoUpload {
    /// Caller-chosen identifier, echoed in the batch result.
    pub id: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// Optional inputs.
    pub metadata: PhotoMetadata,
}

impl PhotoUpload {
    /// Creates an upload without metadata.
    #[must_use]
    pub fn new(id: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            bytes,
            metadata: PhotoMetadata::default(),
        }
    }

    /// Attaches metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: PhotoMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Outcome for one photo in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Identifier of the upload.
    pub photo_id: String,
    /// Whether the photo was scored.
    pub success: bool,
    /// The analysis, when `success` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Box<PhotoAnalysisResult>>,
    /// The failure message, when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    /// A scored entry.
    #[must_use]
    pub fn scored(photo_id: impl Into<String>, result: PhotoAnalysisResult) -> Self {
        Self {
            photo_id: photo_id.into(),
            success: true,
            result: Some(Box::new(result)),
            error: None,
        }
    }

    /// A failed entry.
    #[must_use]
    pub fn failed(photo_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            photo_id: photo_id.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Attractiveness score of a scored entry.
    #[must_use]
    pub fn attractiveness_score(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.attractiveness.overall_score)
    }
}

/// Aggregates over the successful entries of a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of submitted photos.
    pub total: usize,
    /// Number of scored photos.
    pub successful: usize,
    /// Number of failed photos.
    pub failed: usize,
    /// Mean attractiveness score over scored photos, 0 if none.
    pub average_score: f64,
    /// Identifier of the highest-scoring photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_photo_id: Option<String>,
    /// Attractiveness score of the best photo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_photo_score: Option<f64>,
}

/// Ordered per-photo outcomes plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Entries in submission order.
    pub entries: Vec<BatchEntry>,
    /// Aggregates over successful entries.
    pub summary: BatchSummary,
}

//! Profile Photo Core - deterministic photo scoring
//!
//! Turns an encoded photo and optional face detections into bounded,
//! explainable quality, composition and attractiveness scores plus ordered
//! recommendations, and picks the best photo of a batch.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds value
//! records, [`modules`] the scoring components, and [`ports`] the traits for
//! decoding, face detection, filtering and batch I/O.
//!
//! ```no_run
//! use profile_photo_core::PhotoAnalyzer;
//!
//! let bytes = std::fs::read("photo.jpg")?;
//! let result = PhotoAnalyzer::default().analyze_photo(&bytes, None)?;
//! println!("{} ({})", result.attractiveness.overall_score, result.quality_tier);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod analyzer;
pub mod domain;
pub mod error;
pub mod modules;
pub mod ports;

pub use analyzer::PhotoAnalyzer;
pub use domain::{
    BatchEntry, BatchResult, BatchSummary, DetectedFace, PhotoAnalysisResult, PhotoMetadata,
    PhotoUpload, QualityTier, Score,
};
pub use error::{ConfigError, FeatureUnavailableError, InvalidImageError, MeasurementError};
pub use modules::ScoringConfig;
pub use ports::{ProgressEvent, ProgressSink, ResultOutput};

//! The photo analysis facade.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::domain::{
    BatchResult, DetectedFace, PhotoAnalysisResult, PhotoMetadata, PhotoUpload, RawImage,
};
use crate::error::{ConfigError, InvalidImageError};
use crate::modules::{
    face_summary, iso_timestamp, primary_face, BatchCoordinator, CompositeScoringEngine,
    FaceGeometryAnalyzer, GeometryConfig, ImageMeasurementExtractor, LifestyleContextClassifier,
    MeasurementConfig, RecommendationGenerator, ResultContext, ResultPresenter, ScoringConfig,
    ScoringInput,
};
use crate::ports::{
    ConvolutionFilter, FaceDetector, ImageCrateDecoder, ImageDecoder, ImageprocFilter, NoProgress,
    ProgressSink, UnavailableFaceDetector,
};

/// Scores photos.
///
/// Immutable after construction and safe to share between threads. Each call
/// works only on its own inputs.
#[derive(Clone)]
pub struct PhotoAnalyzer {
    decoder: Arc<dyn ImageDecoder>,
    detector: Arc<dyn FaceDetector>,
    measurement: ImageMeasurementExtractor,
    geometry: FaceGeometryAnalyzer,
    lifestyle: LifestyleContextClassifier,
    engine: CompositeScoringEngine,
    presenter: ResultPresenter,
    batch: BatchCoordinator,
}

impl std::fmt::Debug for PhotoAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoAnalyzer")
            .field("detector", &self.detector.name())
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

impl Default for PhotoAnalyzer {
    fn default() -> Self {
        Self::from_engine(CompositeScoringEngine::default())
    }
}

impl PhotoAnalyzer {
    /// Creates an analyzer with the default adapters and the given tables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the tables fail validation.
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigError> {
        CompositeScoringEngine::new(config).map(Self::from_engine)
    }

    fn from_engine(engine: CompositeScoringEngine) -> Self {
        let presenter =
            ResultPresenter::new(engine.config().tiers, RecommendationGenerator::default());
        Self {
            decoder: Arc::new(ImageCrateDecoder),
            detector: Arc::new(UnavailableFaceDetector),
            measurement: ImageMeasurementExtractor::new(
                MeasurementConfig::default(),
                Arc::new(ImageprocFilter),
            ),
            geometry: FaceGeometryAnalyzer::default(),
            lifestyle: LifestyleContextClassifier::default(),
            engine,
            presenter,
            batch: BatchCoordinator,
        }
    }

    /// Replaces the image decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Replaces the face detector.
    #[must_use]
    pub fn with_face_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = detector;
        self
    }

    /// Replaces the convolution filter backend.
    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn ConvolutionFilter>) -> Self {
        self.measurement =
            ImageMeasurementExtractor::new(self.measurement.config().clone(), filter);
        self
    }

    /// Replaces the geometry thresholds.
    #[must_use]
    pub fn with_geometry_config(mut self, config: GeometryConfig) -> Self {
        self.geometry = FaceGeometryAnalyzer::new(config);
        self
    }

    /// Returns the scoring tables in use.
    #[must_use]
    pub const fn scoring_config(&self) -> &ScoringConfig {
        self.engine.config()
    }

    /// Scores one encoded photo.
    ///
    /// Faces in `metadata` are used as-is; otherwise the face detector is
    /// asked. An unavailable detector degrades to the zero-face path and sets
    /// the result's `warning`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidImageError`] if the buffer cannot be decoded. No other
    /// failure reaches the caller.
    pub fn analyze_photo(
        &self,
        buffer: &[u8],
        metadata: Option<&PhotoMetadata>,
    ) -> Result<PhotoAnalysisResult, InvalidImageError> {
        let start = Instant::now();
        let image = self.decoder.decode(buffer)?;
        let dims = image.dimensions();
        debug!("Decoded {}x{} image ({} bytes)", dims.width, dims.height, buffer.len());

        let mut warnings = Vec::new();
        let faces = self.faces_for(&image, metadata, &mut warnings);

        let measurements = self.measurement.extract(&image);
        warnings.extend(measurements.errors.iter().map(ToString::to_string));

        let primary = primary_face(&faces);
        let symmetry = self
            .geometry
            .symmetry(primary.and_then(|f| f.landmarks.as_ref()));
        let composition = self.geometry.composition(
            primary,
            dims,
            &measurements.luma,
            measurements.edges.as_ref(),
        );

        let card = self.engine.score(&ScoringInput {
            quality: measurements.quality,
            composition,
            symmetry,
            primary_face: primary,
            faces_detected: faces.len(),
            dimensions: dims,
        });

        let context = ResultContext {
            dimensions: dims,
            channels: image.channels(),
            format: image.format_label(),
            byte_size: image.byte_size(),
            faces: face_summary(&faces),
            lifestyle_tags: self.lifestyle.classify(&measurements.stats, dims, &faces),
            warning: (!warnings.is_empty()).then(|| warnings.join("; ")),
            analyzed_at: iso_timestamp(),
            processing_time_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        Ok(self.presenter.present(&card, context))
    }

    fn faces_for(
        &self,
        image: &RawImage,
        metadata: Option<&PhotoMetadata>,
        warnings: &mut Vec<String>,
    ) -> Vec<DetectedFace> {
        if let Some(faces) = metadata.and_then(|m| m.faces.as_ref()) {
            debug!("Using {} pre-computed face(s)", faces.len());
            return faces.clone();
        }

        match self.detector.detect(image) {
            Ok(faces) => {
                debug!("Detector `{}` found {} face(s)", self.detector.name(), faces.len());
                faces
            }
            Err(e) => {
                warn!("{e}; continuing without faces");
                warnings.push(e.to_string());
                Vec::new()
            }
        }
    }

    /// Scores photos sequentially. Never fails; per-photo errors are entries.
    #[must_use]
    pub fn analyze_batch<I>(&self, photos: I) -> BatchResult
    where
        I: IntoIterator<Item = PhotoUpload>,
    {
        self.analyze_batch_with_progress(photos, &NoProgress)
    }

    /// Like [`PhotoAnalyzer::analyze_batch`], reporting progress events.
    #[must_use]
    pub fn analyze_batch_with_progress<I>(&self, photos: I, progress: &dyn ProgressSink) -> BatchResult
    where
        I: IntoIterator<Item = PhotoUpload>,
    {
        self.batch.run(photos, progress, |photo| {
            self.analyze_photo(&photo.bytes, Some(&photo.metadata))
        })
    }
}

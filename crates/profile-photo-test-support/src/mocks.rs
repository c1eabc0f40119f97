//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use image::GrayImage;
use profile_photo_core::domain::{BatchEntry, BatchSummary, DetectedFace, PhotoUpload, RawImage};
use profile_photo_core::error::{FeatureUnavailableError, MeasurementError};
use profile_photo_core::ports::{
    ConvolutionFilter, EdgeMap, FaceDetector, PhotoSource, ProgressEvent, ProgressSink,
    ResultOutput,
};

/// Mock implementation of `PhotoSource` for testing.
///
/// Yields pre-built uploads and tracks iteration for assertions.
pub struct MockPhotoSource {
    photos: Vec<PhotoUpload>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockPhotoSource {
    /// Creates a new mock source with the given uploads.
    #[must_use]
    pub fn new(photos: Vec<PhotoUpload>) -> Self {
        Self {
            photos,
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl PhotoSource for MockPhotoSource {
    fn photos(&self) -> Box<dyn Iterator<Item = anyhow::Result<PhotoUpload>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.photos.iter().cloned().map(Ok))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.photos.len())
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures entries and summaries for later assertions.
#[derive(Default)]
pub struct MockResultOutput {
    entries: Arc<Mutex<Vec<BatchEntry>>>,
    summaries: Arc<Mutex<Vec<BatchSummary>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured entries.
    #[must_use]
    pub fn entries(&self) -> Vec<BatchEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns all captured summaries.
    #[must_use]
    pub fn summaries(&self) -> Vec<BatchSummary> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultOutput for MockResultOutput {
    fn write_entry(&self, entry: &BatchEntry) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
        Ok(())
    }

    fn write_summary(&self, summary: &BatchSummary) -> anyhow::Result<()> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.flush_count.lock() {
            *c += 1;
        }
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
#[derive(Default)]
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Failed` events.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Failed { .. }))
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { successful, failed } => Some((*successful, *failed)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Mock face detector returning canned faces, or always unavailable.
pub struct MockFaceDetector {
    faces: Option<Vec<DetectedFace>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockFaceDetector {
    /// A detector that returns `faces` for every image.
    #[must_use]
    pub fn returning(faces: Vec<DetectedFace>) -> Self {
        Self {
            faces: Some(faces),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// A detector whose backend is unreachable.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            faces: None,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns how many times `detect` was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FaceDetector for MockFaceDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn detect(&self, _image: &RawImage) -> Result<Vec<DetectedFace>, FeatureUnavailableError> {
        if let Ok(mut c) = self.call_count.lock() {
            *c += 1;
        }
        self.faces
            .clone()
            .ok_or_else(|| FeatureUnavailableError::new(self.name(), "backend offline"))
    }
}

/// A convolution backend whose every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingFilter;

impl ConvolutionFilter for FailingFilter {
    fn edge_response(&self, _image: &GrayImage) -> Result<EdgeMap, MeasurementError> {
        Err(MeasurementError::new("edge response", "filter backend failed"))
    }

    fn median(&self, _image: &GrayImage, _radius: u32) -> Result<GrayImage, MeasurementError> {
        Err(MeasurementError::new("median", "filter backend failed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_photo_source_empty() {
        let source = MockPhotoSource::empty();
        assert_eq!(source.count_hint(), Some(0));
        assert_eq!(source.photos().count(), 0);
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_result_output() {
        let output = MockResultOutput::new();
        output
            .write_entry(&BatchEntry::failed("a.jpg", "broken"))
            .unwrap_or_default();
        output
            .write_summary(&BatchSummary::default())
            .unwrap_or_default();
        output.flush().unwrap_or_default();

        assert_eq!(output.entries().len(), 1);
        assert_eq!(output.summaries().len(), 1);
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();
        sink.on_event(ProgressEvent::Failed {
            photo_id: "a".into(),
            reason: "x".into(),
        });
        sink.on_event(ProgressEvent::Finished {
            successful: 0,
            failed: 1,
        });
        assert_eq!(sink.failed_count(), 1);
        assert_eq!(sink.finished_counts(), Some((0, 1)));
    }

    #[test]
    fn test_mock_face_detector() {
        let image = RawImage::from_image(image::DynamicImage::new_rgb8(4, 4));
        let detector = MockFaceDetector::unavailable();
        assert!(detector.detect(&image).is_err());
        assert_eq!(detector.call_count(), 1);

        let detector = MockFaceDetector::returning(vec![]);
        assert!(detector.detect(&image).is_ok_and(|f| f.is_empty()));
    }
}

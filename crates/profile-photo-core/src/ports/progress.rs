//! Progress reporting port for UI integration.

/// Events emitted during a batch for progress tracking.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// Analysis started for a photo.
    Started {
        /// Identifier of the photo.
        photo_id: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total photos in the batch.
        total: usize,
    },
    /// A photo was scored.
    Completed {
        /// Identifier of the photo.
        photo_id: String,
        /// Its attractiveness score.
        attractiveness: f64,
    },
    /// A photo could not be scored.
    Failed {
        /// Identifier of the photo.
        photo_id: String,
        /// Reason for the failure.
        reason: String,
    },
    /// All photos have been processed.
    Finished {
        /// Photos scored.
        successful: usize,
        /// Photos that failed.
        failed: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: ProgressEvent) {}
}

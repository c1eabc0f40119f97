//! Sequential batch scoring with per-photo isolation.

use std::error::Error;

use tracing::{info, warn};

use crate::domain::{BatchEntry, BatchResult, BatchSummary, PhotoAnalysisResult, PhotoUpload};
use crate::ports::{ProgressEvent, ProgressSink};

/// Runs photos one at a time and records failures as data.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchCoordinator;

impl BatchCoordinator {
    /// Scores every photo with `analyze`, in submission order.
    ///
    /// A failing photo becomes a failed entry; the remaining photos are
    /// still scored.
    pub fn run<I, F, E>(&self, photos: I, progress: &dyn ProgressSink, mut analyze: F) -> BatchResult
    where
        I: IntoIterator<Item = PhotoUpload>,
        F: FnMut(&PhotoUpload) -> Result<PhotoAnalysisResult, E>,
        E: Error,
    {
        let photos = photos.into_iter();
        let (lower, upper) = photos.size_hint();
        let total = upper.unwrap_or(lower);

        let mut entries = Vec::with_capacity(total);
        for (index, photo) in photos.enumerate() {
            progress.on_event(ProgressEvent::Started {
                photo_id: photo.id.clone(),
                index,
                total,
            });

            let entry = match analyze(&photo) {
                Ok(result) => {
                    progress.on_event(ProgressEvent::Completed {
                        photo_id: photo.id.clone(),
                        attractiveness: result.attractiveness.overall_score,
                    });
                    BatchEntry::scored(photo.id, result)
                }
                Err(e) => {
                    let reason = error_chain(&e);
                    warn!("Failed to score {}: {reason}", photo.id);
                    progress.on_event(ProgressEvent::Failed {
                        photo_id: photo.id.clone(),
                        reason: reason.clone(),
                    });
                    BatchEntry::failed(photo.id, reason)
                }
            };
            entries.push(entry);
        }

        let summary = summarize(&entries);
        progress.on_event(ProgressEvent::Finished {
            successful: summary.successful,
            failed: summary.failed,
        });
        info!(
            "Batch finished: {}/{} scored, average {:.1}",
            summary.successful, summary.total, summary.average_score
        );

        BatchResult { entries, summary }
    }
}

/// Aggregates the successful entries.
///
/// The best photo is the first entry holding the maximum score.
#[must_use]
pub fn summarize(entries: &[BatchEntry]) -> BatchSummary {
    let scored: Vec<(&str, f64)> = entries
        .iter()
        .filter_map(|e| e.attractiveness_score().map(|s| (e.photo_id.as_str(), s)))
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let average_score = if scored.is_empty() {
        0.0
    } else {
        scored.iter().map(|(_, s)| s).sum::<f64>() / scored.len() as f64
    };

    let best = scored
        .iter()
        .fold(None, |best: Option<(&str, f64)>, &(id, score)| match best {
            Some((_, b)) if b >= score => best,
            _ => Some((id, score)),
        });

    BatchSummary {
        total: entries.len(),
        successful: scored.len(),
        failed: entries.len() - scored.len(),
        average_score,
        best_photo_id: best.map(|(id, _)| id.to_string()),
        best_photo_score: best.map(|(_, s)| s),
    }
}

fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.average_score.abs() < f64::EPSILON);
        assert!(summary.best_photo_id.is_none());
    }

    #[test]
    fn test_summarize_all_failed() {
        let entries = vec![
            BatchEntry::failed("a", "broken"),
            BatchEntry::failed("b", "broken"),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.successful, 0);
        assert!(summary.average_score.abs() < f64::EPSILON);
        assert!(summary.best_photo_score.is_none());
    }

    #[test]
    fn test_error_chain_includes_sources() {
        let err = crate::error::InvalidImageError::Undecodable {
            source: image::ImageError::IoError(std::io::Error::other("eof")),
        };
        assert_eq!(error_chain(&err), "failed to decode image buffer: eof");
    }
}

//! Result output port for writing batch results.

use crate::domain::{BatchEntry, BatchSummary};

/// Port for outputting batch results.
pub trait ResultOutput: Send + Sync {
    /// Writes a single per-photo entry.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_entry(&self, entry: &BatchEntry) -> anyhow::Result<()>;

    /// Writes the batch summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_summary(&self, summary: &BatchSummary) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}

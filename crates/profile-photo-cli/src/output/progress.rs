//! Progress bar adapter using indicatif.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use profile_photo_core::{ProgressEvent, ProgressSink};

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of photos, if known
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise show per-photo status
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = if show_bar {
            let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);

            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }

            Some(bar)
        } else {
            None
        };

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started {
                photo_id,
                index,
                total,
            } => {
                if let Some(bar) = &self.bar {
                    bar.set_length(total as u64);
                    bar.set_position(index as u64);
                    bar.set_message(photo_id);
                }
            }
            ProgressEvent::Completed {
                photo_id,
                attractiveness,
            } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                } else {
                    eprintln!("{photo_id}: {attractiveness:.0}");
                }
            }
            ProgressEvent::Failed { photo_id, reason } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                    bar.suspend(|| eprintln!("WARN: Failed {photo_id}: {reason}"));
                } else {
                    eprintln!("WARN: Failed {photo_id}: {reason}");
                }
            }
            ProgressEvent::Finished { successful, failed } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!(
                        "Done: {successful} scored, {failed} failed"
                    ));
                }
            }
        }
    }
}

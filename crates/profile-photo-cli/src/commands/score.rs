//! Score command - analyze photos and summarize the batch.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use profile_photo_adapters::{FsPhotoSource, SidecarFaceLoader, DEFAULT_SIDECAR_SUFFIX};
use profile_photo_core::domain::{BatchResult, PhotoUpload};
use profile_photo_core::ports::PhotoSource;
use profile_photo_core::{PhotoAnalyzer, ResultOutput};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one entry per line, then the summary)
    #[default]
    Jsonl,
    /// Single JSON document holding entries and summary
    Json,
}

/// Shared arguments for photo scoring.
#[derive(Args, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ScoreArgs {
    /// Files or directories to score
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Suffix of the face-detection sidecar next to each photo
    #[arg(long, value_name = "SUFFIX")]
    pub sidecar_suffix: Option<String>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl ScoreArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        if args.sidecar_suffix.is_none() {
            args.sidecar_suffix.clone_from(&config.faces.sidecar_suffix);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        args.config = Some(config.clone());

        args
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Get sidecar suffix with fallback to `.faces.json`.
    fn sidecar_suffix(&self) -> &str {
        self.sidecar_suffix
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SIDECAR_SUFFIX)
    }

    /// Build the analyzer from the merged config.
    fn analyzer(&self) -> Result<PhotoAnalyzer> {
        let scoring = self
            .config
            .as_ref()
            .map(AppConfig::scoring_config_or_default)
            .unwrap_or_default();
        PhotoAnalyzer::new(scoring).context("Invalid scoring configuration")
    }
}

/// Run the score command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &ScoreArgs) -> Result<ExitCode> {
    info!("Running score command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsPhotoSource::new(args.paths.clone(), args.recursive)
        .with_sidecars(SidecarFaceLoader::new(args.sidecar_suffix()));
    let total = source.count_hint();
    debug!("Found {} photo files", total.unwrap_or(0));

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let analyzer = args.analyzer()?;
    let mut unreadable = 0usize;
    let photos = readable_photos(&source, &mut unreadable);
    let batch = analyzer.analyze_batch_with_progress(photos, &progress_bar);

    let output = JsonOutput::stdout();
    write_batch(&output, &batch, args.format(), args.pretty)?;

    info!(
        "Scored {} of {} photos ({unreadable} unreadable)",
        batch.summary.successful, batch.summary.total
    );

    if batch.summary.failed > 0 {
        Ok(ExitCode::PhotosFailed)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Streams uploads one at a time, skipping files that cannot be read.
fn readable_photos<'a>(
    source: &'a dyn PhotoSource,
    unreadable: &'a mut usize,
) -> impl Iterator<Item = PhotoUpload> + 'a {
    source.photos().filter_map(move |item| match item {
        Ok(photo) => Some(photo),
        Err(e) => {
            // The error carries the path via anyhow context.
            warn!("Skipping: {e:#}");
            *unreadable += 1;
            None
        }
    })
}

fn write_batch(
    output: &JsonOutput,
    batch: &BatchResult,
    format: OutputFormat,
    pretty: bool,
) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for entry in &batch.entries {
                output.write_entry(entry)?;
            }
            output.write_summary(&batch.summary)?;
        }
        OutputFormat::Json => output.write_batch(batch, pretty)?,
    }
    output.flush()
}

//! CLI command definitions and handlers.

pub mod score;

use clap::{Parser, Subcommand};

/// Profile photo scoring - quality, composition and attractiveness
#[derive(Parser)]
#[command(name = "profile-photo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared score arguments (paths, format, flags).
    #[command(flatten)]
    pub score: score::ScoreArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Score photos and summarize the batch
    Score(score::ScoreArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every photo was scored.
    Success = 0,
    /// At least one photo could not be scored.
    PhotosFailed = 1,
    /// Usage or I/O error.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

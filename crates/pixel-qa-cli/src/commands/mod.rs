//! CLI command definitions and handlers.

pub mod check;
pub mod config;

use clap::{Parser, Subcommand};

/// Pixel QA - Automated image quality checks
#[derive(Parser)]
#[command(name = "pixel-qa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared check arguments (paths, thresholds, flags).
    #[command(flatten)]
    pub check: check::CheckArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze images for quality issues
    Check(check::CheckArgs),
    /// Inspect presets and override keys
    Config(config::ConfigArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// No problematic images.
    Success,
    /// At least one image was flagged.
    IssuesFound,
    /// Invalid arguments, configuration or I/O failure.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::IssuesFound => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}

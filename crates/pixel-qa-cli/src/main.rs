//! Pixel QA CLI - Automated image quality checks for catalogs and uploads.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::check::CheckArgs;
use commands::{Cli, Commands, ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Some(Commands::Check(ref args)) => check(args),
        Some(Commands::Config(ref args)) => {
            or_error(commands::config::run(args).map(|()| ExitCode::Success))
        }
        // Bare `pixel-qa PATHS...` behaves like `pixel-qa check PATHS...`
        None if cli.check.paths.is_empty() => {
            eprintln!("error: No paths specified. Use --help for usage information.");
            ExitCode::Error
        }
        None => check(&cli.check),
    };

    exit_code.into()
}

/// Logs go to stderr; stdout is reserved for results.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::new(level))
        .init();
}

fn check(args: &CheckArgs) -> ExitCode {
    let args = CheckArgs::with_config(args.clone(), &config::AppConfig::load());
    or_error(commands::check::run(&args).map(|result| result.exit_code))
}

fn or_error(result: anyhow::Result<ExitCode>) -> ExitCode {
    result.unwrap_or_else(|e| {
        eprintln!("error: {e:#}");
        ExitCode::Error
    })
}

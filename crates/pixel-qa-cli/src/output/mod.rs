//! Result writers and progress reporting for the CLI.

mod csv;
mod json;
mod progress;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub use self::csv::CsvOutput;
pub use json::JsonOutput;
pub use progress::ProgressReporter;

/// Opens the destination for results: the given file, or stdout.
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn open_writer(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

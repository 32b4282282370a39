//! CSV output adapter.

use std::io::Write;
use std::sync::Mutex;

use anyhow::Result;
use pixel_qa_core::{ImageAnalysis, ResultOutput};
use serde::Serialize;

/// Column names, written once before any row.
const HEADER: [&str; 5] = ["file_path", "is_problematic", "width", "height", "issues"];

/// One row per analyzed image.
#[derive(Serialize)]
struct Row<'a> {
    file_path: &'a str,
    is_problematic: bool,
    width: u32,
    height: u32,
    /// Issue lines of problematic results, joined with `"; "`.
    issues: String,
}

/// Writes one CSV row per image, streaming.
pub struct CsvOutput {
    writer: Mutex<csv::Writer<Box<dyn Write + Send>>>,
}

impl CsvOutput {
    /// Creates a CSV output and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn new(writer: Box<dyn Write + Send>) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(HEADER)?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl ResultOutput for CsvOutput {
    fn write(&self, analysis: &ImageAnalysis) -> Result<()> {
        let row = Row {
            file_path: &analysis.file_path,
            is_problematic: analysis.is_problematic,
            width: analysis.width,
            height: analysis.height,
            issues: analysis.issues().collect::<Vec<_>>().join("; "),
        };
        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .serialize(row)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .flush()?;
        Ok(())
    }
}

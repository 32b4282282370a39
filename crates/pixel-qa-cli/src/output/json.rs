//! JSON output adapter.

use anyhow::Result;
use pixel_qa_core::{ImageAnalysis, ResultOutput};
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;

/// One output record: the analysis plus the time it was produced.
#[derive(Serialize)]
struct Record<'a> {
    #[serde(flatten)]
    analysis: &'a ImageAnalysis,
    timestamp: String,
}

/// JSON output adapter.
///
/// Writes one JSON object per line, or buffers records and writes a single
/// JSON array on `flush()` when array mode is enabled.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    array: Option<Mutex<Vec<serde_json::Value>>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, array: bool, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            array: array.then(|| Mutex::new(Vec::new())),
            pretty,
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, line: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{line}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    fn write(&self, analysis: &ImageAnalysis) -> Result<()> {
        let record = Record {
            analysis,
            timestamp: iso_timestamp(),
        };
        match &self.array {
            Some(buffer) => {
                let value = serde_json::to_value(&record)?;
                buffer
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                    .push(value);
                Ok(())
            }
            None => self.write_line(&serde_json::to_string(&record)?),
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        if let Some(buffer) = &self.array {
            let records = std::mem::take(
                &mut *buffer
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if self.pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            self.write_line(&json)?;
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

//! Progress reporting on stderr, backed by indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use pixel_qa_core::{ImageAnalysis, ProgressEvent, ProgressSink};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

enum Mode {
    /// Nothing but skip warnings is printed.
    Quiet,
    /// Interactive bar; flagged images are printed above it.
    Bar(ProgressBar),
    /// One line per issue, for pipes and CI logs.
    Lines,
}

/// Stderr progress sink for batch runs.
pub struct ProgressReporter {
    mode: Mode,
}

impl ProgressReporter {
    /// Creates a reporter.
    ///
    /// `quiet` wins over `show_bar`. `total` sizes the bar; without it a
    /// spinner is shown.
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        let mode = if quiet {
            Mode::Quiet
        } else if show_bar {
            let bar = total.map_or_else(ProgressBar::new_spinner, ProgressBar::new);
            if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
                bar.set_style(style.progress_chars("#>-"));
            }
            Mode::Bar(bar)
        } else {
            Mode::Lines
        };
        Self { mode }
    }

    fn flagged_lines(analysis: &ImageAnalysis) -> Vec<String> {
        analysis
            .detection_results
            .iter()
            .filter(|r| r.is_problematic)
            .flat_map(|r| {
                r.issues
                    .iter()
                    .map(move |issue| format!("{}: [{}] {issue}", analysis.file_path, r.detector_name))
            })
            .collect()
    }
}

impl ProgressSink for ProgressReporter {
    fn on_event(&self, event: ProgressEvent) {
        match (&self.mode, event) {
            (Mode::Bar(bar), ProgressEvent::Started { path, index, total }) => {
                if let Some(t) = total {
                    bar.set_length(t as u64);
                }
                bar.set_position(index as u64);
                bar.set_message(path);
            }
            (Mode::Bar(bar), ProgressEvent::Completed { analysis }) => {
                for line in Self::flagged_lines(&analysis) {
                    bar.println(line);
                }
                bar.inc(1);
            }
            (Mode::Lines, ProgressEvent::Completed { analysis }) => {
                for line in Self::flagged_lines(&analysis) {
                    eprintln!("{line}");
                }
            }
            (mode, ProgressEvent::Skipped { path, reason }) => {
                let line = format!("WARN: Skipping {path}: {reason}");
                match mode {
                    Mode::Bar(bar) => {
                        bar.println(line);
                        bar.inc(1);
                    }
                    Mode::Quiet | Mode::Lines => eprintln!("{line}"),
                }
            }
            (
                Mode::Bar(bar),
                ProgressEvent::Finished {
                    processed,
                    problematic,
                    skipped,
                },
            ) => {
                bar.finish_with_message(format!(
                    "{processed} processed, {problematic} problematic, {skipped} skipped"
                ));
            }
            _ => {}
        }
    }
}

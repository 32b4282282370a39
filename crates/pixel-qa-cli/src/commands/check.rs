//! Check command - analyze images for quality issues.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use pixel_qa_adapters::{EnvOverrides, FsImageSource};
use pixel_qa_core::{
    BatchReport, CompositeDetector, DetectionConfig, ImageSource, Preset, ProgressEvent,
    ProgressSink, ResultOutput,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{self, CsvOutput, JsonOutput, ProgressReporter};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
    /// Comma-separated values, one row per image
    Csv,
}

/// Parse and validate a fraction (0.0-1.0).
fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

/// Parse and validate a non-negative tolerance.
fn parse_tolerance(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{value} must be a non-negative number"))
    }
}

/// Shared arguments for image analysis.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// Files or directories to analyze
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Base preset (strict, default, lenient, photo, document)
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<Preset>,

    /// Disable border fill detection
    #[arg(long)]
    pub no_border_fill: bool,

    /// Disable uniform color detection
    #[arg(long)]
    pub no_uniform_color: bool,

    /// Disable background dominance detection
    #[arg(long)]
    pub no_background: bool,

    /// Disable aspect ratio and dimension checks
    #[arg(long)]
    pub no_ratio: bool,

    /// Black and white border fill threshold (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub border_fill_threshold: Option<f64>,

    /// Uniform color coverage threshold (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub uniform_threshold: Option<f64>,

    /// Background coverage threshold (0.0-1.0)
    #[arg(long, value_parser = parse_fraction)]
    pub background_threshold: Option<f64>,

    /// Color distance tolerance for uniform color and background detection
    #[arg(long, value_parser = parse_tolerance)]
    pub color_tolerance: Option<f64>,

    /// Relative aspect ratio tolerance
    #[arg(long, value_parser = parse_tolerance)]
    pub ratio_tolerance: Option<f64>,

    /// Minimum image width in pixels
    #[arg(long, value_name = "PX")]
    pub min_width: Option<u32>,

    /// Minimum image height in pixels
    #[arg(long, value_name = "PX")]
    pub min_height: Option<u32>,

    /// Accepted aspect ratios, e.g. "16:9,4:3,1:1"
    #[arg(long, value_name = "LIST")]
    pub target_ratios: Option<String>,

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

    /// Write results to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Output options and `recursive` are merged here. Detector settings
    /// are layered later by [`CheckArgs::detection_config`].
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        // Recursive: config applies only if CLI --recursive not passed
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        // Output format: CLI > config (accessor provides fallback)
        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    "csv" => Some(OutputFormat::Csv),
                    _ => None,
                });
        }

        // Boolean output options: CLI flag wins, then config
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
        self.format.unwrap_or(OutputFormat::Jsonl)
    }

    /// Override pairs derived from CLI flags, in schema key form.
    fn overrides(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: String| pairs.push((key.to_owned(), value));

        for (disabled, key) in [
            (self.no_border_fill, "DETECTOR_BORDER_FILL_ENABLED"),
            (self.no_uniform_color, "DETECTOR_UNIFORM_COLOR_ENABLED"),
            (self.no_background, "DETECTOR_BACKGROUND_ENABLED"),
            (self.no_ratio, "DETECTOR_RATIO_ENABLED"),
        ] {
            if disabled {
                push(key, "false".into());
            }
        }

        if let Some(t) = self.border_fill_threshold {
            push("BORDER_FILL_BLACK_FILL_THRESHOLD", t.to_string());
            push("BORDER_FILL_WHITE_FILL_THRESHOLD", t.to_string());
        }
        if let Some(t) = self.uniform_threshold {
            push("UNIFORM_COLOR_UNIFORM_COVERAGE_THRESHOLD", t.to_string());
        }
        if let Some(t) = self.background_threshold {
            push("BACKGROUND_BACKGROUND_COVERAGE_THRESHOLD", t.to_string());
        }
        if let Some(t) = self.color_tolerance {
            push("UNIFORM_COLOR_COLOR_DELTA_THRESHOLD", t.to_string());
            push("BACKGROUND_BACKGROUND_COLOR_TOLERANCE", t.to_string());
        }
        if let Some(t) = self.ratio_tolerance {
            push("RATIO_TOLERANCE", t.to_string());
        }
        if let Some(w) = self.min_width {
            push("RATIO_MINIMUM_WIDTH", w.to_string());
        }
        if let Some(h) = self.min_height {
            push("RATIO_MINIMUM_HEIGHT", h.to_string());
        }
        if let Some(ref ratios) = self.target_ratios {
            push("RATIO_TARGET_RATIOS", ratios.clone());
        }

        pairs
    }

    /// Resolves the detection configuration.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Preset (CLI `--preset`, else `PIXEL_QA_PRESET`, else config file)
    /// 2. Config file detector settings (XDG, then project-local)
    /// 3. `PIXEL_QA_*` environment variables
    /// 4. CLI flags
    ///
    /// # Errors
    ///
    /// Returns an error if the preset is unknown or any layer holds an
    /// invalid value.
    pub fn detection_config(&self, env: &EnvOverrides) -> Result<DetectionConfig> {
        let file = self.config.clone().unwrap_or_default();

        let preset = match (self.preset, env.preset(), file.general.preset.as_deref()) {
            (Some(p), _, _) => p,
            (None, Some(name), _) | (None, None, Some(name)) => name
                .parse()
                .with_context(|| format!("Invalid preset '{name}'"))?,
            (None, None, None) => Preset::default(),
        };
        debug!("Using preset: {preset}");

        let layered = file
            .overrides()
            .into_iter()
            .chain(env.overrides().map(|(k, v)| (k.to_owned(), v.to_owned())))
            .chain(self.overrides());

        DetectionConfig::from_preset(preset)
            .with_overrides(layered)
            .context("Invalid detection configuration")
    }
}

/// Result of running the check command.
#[allow(dead_code)] // Fields exposed for programmatic use
pub struct CheckResult {
    /// Batch counts and per-image analyses.
    pub report: BatchReport,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CheckArgs) -> Result<CheckResult> {
    info!("Running check command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let config = args.detection_config(&EnvOverrides::from_env())?;
    let engine = CompositeDetector::new(&config).context("Invalid detection configuration")?;

    // Initialize image source
    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    // Determine if we should show progress
    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());

    // Initialize progress reporting
    let progress = ProgressReporter::new(total.map(|t| t as u64), args.quiet, show_progress);

    // Initialize output adapter
    let writer = output::open_writer(args.output.as_deref())?;
    let output: Box<dyn ResultOutput> = match args.format() {
        OutputFormat::Csv => Box::new(CsvOutput::new(writer)?),
        format => Box::new(JsonOutput::new(
            writer,
            format == OutputFormat::Json,
            args.pretty,
        )),
    };

    if engine.is_empty() {
        warn!("All detectors disabled, images will only be decoded");
    }

    let report = process_images(&source, &engine, &*output, &progress)?;
    let summary = report.summary;

    if !args.quiet {
        eprintln!(
            "Summary: {} analyzed, {} problematic, {} passed, {} skipped",
            summary.total_images,
            summary.problematic_images,
            summary.passed_images,
            summary.failed_images
        );
    }

    // Determine exit code
    let exit_code = if summary.problematic_images > 0 {
        ExitCode::IssuesFound
    } else {
        ExitCode::Success
    };

    if let Some(path) = &args.output {
        info!("Results written to {}", path.display());
    }

    Ok(CheckResult { report, exit_code })
}

/// Process images through the detection engine.
///
/// Load and analysis failures are reported as skipped and never abort the
/// batch; only output failures do.
fn process_images(
    source: &dyn ImageSource,
    engine: &CompositeDetector,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
) -> Result<BatchReport> {
    let total = source.count_hint();
    let mut report = BatchReport::new();

    for (index, image_result) in source.images().enumerate() {
        let image = match image_result {
            Ok(img) => img,
            Err(e) => {
                // Note: error message contains the path via anyhow context
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("image {index}"),
                    reason: format!("{e:#}"),
                });
                report.record_failure();
                continue;
            }
        };

        progress.on_event(ProgressEvent::Started {
            path: image.path.clone(),
            index,
            total,
        });

        let analysis = match engine.analyze_image(&image) {
            Ok(analysis) => analysis,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    path: image.path,
                    reason: e.to_string(),
                });
                report.record_failure();
                continue;
            }
        };

        output.write(&analysis)?;

        report.push(analysis.clone());
        progress.on_event(ProgressEvent::Completed { analysis });
    }

    output.flush()?;

    let summary = report.summary;
    progress.on_event(ProgressEvent::Finished {
        processed: summary.total_images,
        problematic: summary.problematic_images,
        skipped: summary.failed_images,
    });

    Ok(report)
}

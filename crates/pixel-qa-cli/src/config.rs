//! Configuration file support for pixel-qa.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/pixel-qa/config.toml` (lowest priority)
//! - Project-local: `.pixel-qa.toml` (searched up directory tree)
//! - Environment and CLI flags (higher priority, applied separately)
//!
//! Detector tables hold plain field names (`[ratio] tolerance = 0.2`) and are
//! routed through the core override schema as `RATIO_TOLERANCE` etc.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pixel_qa_core::config::overrides;
use pixel_qa_core::Preset;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Name of the project-local config file.
const PROJECT_FILE: &str = ".pixel-qa.toml";

/// Raw values of one detector table.
pub type FieldTable = BTreeMap<String, toml::Value>;

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Detector enable switches.
    pub detectors: DetectorsConfig,
    /// Border fill settings.
    pub border_fill: FieldTable,
    /// Uniform color settings.
    pub uniform_color: FieldTable,
    /// Background dominance settings.
    pub background: FieldTable,
    /// Aspect ratio and dimension settings.
    pub ratio: FieldTable,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Base preset name.
    pub preset: Option<String>,
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Detector enable switches.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorsConfig {
    /// Enable/disable border fill detection.
    pub border_fill: Option<bool>,
    /// Enable/disable uniform color detection.
    pub uniform_color: Option<bool>,
    /// Enable/disable background dominance detection.
    pub background: Option<bool>,
    /// Enable/disable aspect ratio checks.
    pub ratio: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json", "jsonl" or "csv".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/pixel-qa/config.toml`
    /// 2. Project-local: `.pixel-qa.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate values that are not covered by the override schema.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref p) = self.general.preset {
            if p.parse::<Preset>().is_err() {
                return Err(format!("general.preset: unknown preset '{p}'"));
            }
        }

        if let Some(ref f) = self.output.format {
            if !["json", "jsonl", "csv"].contains(&f.as_str()) {
                return Err(format!(
                    "output.format must be 'json', 'jsonl' or 'csv', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.preset = other.general.preset.or_else(|| self.general.preset.take());
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Detectors
        self.detectors.border_fill = other.detectors.border_fill.or(self.detectors.border_fill);
        self.detectors.uniform_color = other
            .detectors
            .uniform_color
            .or(self.detectors.uniform_color);
        self.detectors.background = other.detectors.background.or(self.detectors.background);
        self.detectors.ratio = other.detectors.ratio.or(self.detectors.ratio);

        // Detector tables, key by key
        self.border_fill.extend(other.border_fill);
        self.uniform_color.extend(other.uniform_color);
        self.background.extend(other.background);
        self.ratio.extend(other.ratio);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }

    /// Flattens detector settings into override `(KEY, value)` pairs.
    ///
    /// Table keys that the override schema does not know are dropped with a
    /// warning.
    pub fn overrides(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        let switches = [
            ("BORDER_FILL", self.detectors.border_fill),
            ("UNIFORM_COLOR", self.detectors.uniform_color),
            ("BACKGROUND", self.detectors.background),
            ("RATIO", self.detectors.ratio),
        ];
        for (name, enabled) in switches {
            if let Some(enabled) = enabled {
                pairs.push((format!("DETECTOR_{name}_ENABLED"), enabled.to_string()));
            }
        }

        let tables = [
            ("BORDER_FILL", &self.border_fill),
            ("UNIFORM_COLOR", &self.uniform_color),
            ("BACKGROUND", &self.background),
            ("RATIO", &self.ratio),
        ];
        for (prefix, table) in tables {
            for (field, value) in table {
                let key = format!("{prefix}_{}", field.to_uppercase());
                if overrides::lookup(&key).is_none() {
                    warn!("Ignoring unknown config key {}.{field}", prefix.to_lowercase());
                    continue;
                }
                pairs.push((key, value_to_string(value)));
            }
        }

        pairs
    }
}

/// Renders a TOML value the way the override parser expects it.
///
/// Arrays become comma-separated lists, so `target_ratios = ["16:9", "4:3"]`
/// and `target_ratios = "16:9,4:3"` are equivalent.
fn value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pixel-qa").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.pixel-qa.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> AppConfig {
        toml::from_str(toml).expect("parse config")
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("");
        assert!(config.general.preset.is_none());
        assert!(config.overrides().is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[general]
preset = "strict"
recursive = true

[detectors]
background = false

[border_fill]
black_fill_threshold = 0.1

[uniform_color]
color_space = "LAB"

[ratio]
tolerance = 0.2
target_ratios = ["16:9", "4:3"]
minimum_width = 640

[output]
format = 'json'
pretty = true
progress = false
"#,
        );

        assert_eq!(config.general.preset.as_deref(), Some("strict"));
        assert_eq!(config.general.recursive, Some(true));
        assert_eq!(config.detectors.background, Some(false));
        assert_eq!(config.output.format.as_deref(), Some("json"));
        assert_eq!(config.output.pretty, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_use_schema_keys() {
        let config = parse(
            r#"
[detectors]
ratio = false

[ratio]
tolerance = 0.2
target_ratios = ["16:9", "4:3"]
minimum_width = 640

[background]
detection_method = "histogram"
"#,
        );

        let pairs = config.overrides();
        let get = |k: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("DETECTOR_RATIO_ENABLED"), Some("false"));
        assert_eq!(get("RATIO_TOLERANCE"), Some("0.2"));
        assert_eq!(get("RATIO_TARGET_RATIOS"), Some("16:9,4:3"));
        assert_eq!(get("RATIO_MINIMUM_WIDTH"), Some("640"));
        assert_eq!(get("BACKGROUND_DETECTION_METHOD"), Some("histogram"));
    }

    #[test]
    fn test_overrides_drop_unknown_fields() {
        let config = parse(
            r"
[border_fill]
not_a_field = 3
region_fraction = 0.2
",
        );
        let pairs = config.overrides();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "BORDER_FILL_REGION_FRACTION");
    }

    #[test]
    fn test_merge_configs() {
        let mut base = parse(
            r"
[general]
preset = 'lenient'

[ratio]
tolerance = 0.5
minimum_width = 10
",
        );

        let override_config = parse(
            r"
[ratio]
tolerance = 0.1

[detectors]
uniform_color = false
",
        );

        base.merge(override_config);

        // Preset preserved from base
        assert_eq!(base.general.preset.as_deref(), Some("lenient"));
        // Tolerance overridden, width preserved
        assert_eq!(base.ratio["tolerance"].as_float(), Some(0.1));
        assert_eq!(base.ratio["minimum_width"].as_integer(), Some(10));
        // Detector switch added from override
        assert_eq!(base.detectors.uniform_color, Some(false));
    }

    #[test]
    fn test_merge_empty_override_preserves_base() {
        let mut base = parse(
            r"
[output]
format = 'json'
",
        );
        base.merge(AppConfig::default());
        assert_eq!(base.output.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_invalid_field_type_handled() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
[output]
pretty = "yes please"
"#,
        );
        assert!(result.is_err(), "type mismatch should return error");
    }

    #[test]
    fn test_validate_rejects_unknown_preset() {
        let mut config = AppConfig::default();
        config.general.preset = Some("vivid".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("general.preset"), "{err}");
    }

    #[test]
    fn test_validate_output_format_invalid() {
        let mut config = AppConfig::default();
        config.output.format = Some("xml".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("output.format"), "{err}");
    }

    #[test]
    fn test_find_config_in_parents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp_dir.path().join(PROJECT_FILE), "").unwrap();

        let found = find_config_in_parents(&nested).expect("config found");
        assert_eq!(found, temp_dir.path().join(PROJECT_FILE));
    }
}

//! Flat string overrides, e.g. from environment variables or CLI flags.
//!
//! Every configurable field has one entry in a static schema table that
//! maps its key (plus any aliases) to a parser and setter. The same table
//! backs `pixel-qa config keys`.

use std::str::FromStr;

use tracing::debug;

use super::{fraction, half_fraction, non_negative, AspectRatio, DetectionConfig};
use crate::error::ConfigError;

type Apply = fn(&mut DetectionConfig, &str, &str) -> Result<(), ConfigError>;

/// Schema entry for one override key.
pub struct FieldSpec {
    /// Canonical uppercase key.
    pub key: &'static str,
    /// Alternative keys accepted for the same field.
    pub aliases: &'static [&'static str],
    /// Short description of accepted values.
    pub value_hint: &'static str,
    apply: Apply,
}

impl FieldSpec {
    /// True if `key` names this field, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        self.key.eq_ignore_ascii_case(key) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(key))
    }
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("aliases", &self.aliases)
            .field("value_hint", &self.value_hint)
            .finish_non_exhaustive()
    }
}

const FRACTION: &str = "number in 0.0..=1.0";
const DELTA: &str = "non-negative number";
const BOOL: &str = "true|false|1|0|yes|no|on|off";
const PIXELS: &str = "integer pixel count";

static FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "DETECTOR_BORDER_FILL_ENABLED",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.enable_border_fill = parse_bool(v);
            Ok(())
        },
    },
    FieldSpec {
        key: "DETECTOR_UNIFORM_COLOR_ENABLED",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.enable_uniform_color = parse_bool(v);
            Ok(())
        },
    },
    FieldSpec {
        key: "DETECTOR_BACKGROUND_ENABLED",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.enable_background = parse_bool(v);
            Ok(())
        },
    },
    FieldSpec {
        key: "DETECTOR_RATIO_ENABLED",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.enable_ratio = parse_bool(v);
            Ok(())
        },
    },
    // Border fill
    FieldSpec {
        key: "BORDER_FILL_BLACK_FILL_THRESHOLD",
        aliases: &[],
        value_hint: FRACTION,
        apply: |c, k, v| {
            c.border_fill.black_fill_threshold = parse_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BORDER_FILL_WHITE_FILL_THRESHOLD",
        aliases: &[],
        value_hint: FRACTION,
        apply: |c, k, v| {
            c.border_fill.white_fill_threshold = parse_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BORDER_FILL_UNIFORMITY_REQUIRED",
        aliases: &[],
        value_hint: FRACTION,
        apply: |c, k, v| {
            c.border_fill.uniformity_required = parse_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BORDER_FILL_REGION_FRACTION",
        aliases: &[],
        value_hint: FRACTION,
        apply: |c, k, v| {
            c.border_fill.region_fraction = parse_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BORDER_FILL_BLACK_LEVEL",
        aliases: &[],
        value_hint: "integer 0..=255",
        apply: |c, k, v| {
            c.border_fill.black_level = parse_number(k, v, "integer 0..=255")?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BORDER_FILL_WHITE_LEVEL",
        aliases: &[],
        value_hint: "integer 0..=255",
        apply: |c, k, v| {
            c.border_fill.white_level = parse_number(k, v, "integer 0..=255")?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BORDER_FILL_CHECK_TOP",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.border_fill.check_top = parse_bool(v);
            Ok(())
        },
    },
    FieldSpec {
        key: "BORDER_FILL_CHECK_BOTTOM",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.border_fill.check_bottom = parse_bool(v);
            Ok(())
        },
    },
    // Uniform color
    FieldSpec {
        key: "UNIFORM_COLOR_UNIFORM_COVERAGE_THRESHOLD",
        aliases: &["UNIFORM_COLOR_COVERAGE_THRESHOLD"],
        value_hint: FRACTION,
        apply: |c, k, v| {
            c.uniform_color.uniform_coverage_threshold = parse_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "UNIFORM_COLOR_COLOR_DELTA_THRESHOLD",
        aliases: &["UNIFORM_COLOR_DELTA_THRESHOLD"],
        value_hint: DELTA,
        apply: |c, k, v| {
            c.uniform_color.color_delta_threshold = parse_delta(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "UNIFORM_COLOR_COLOR_SPACE",
        aliases: &["UNIFORM_COLOR_SPACE"],
        value_hint: "RGB|HSV|LAB",
        apply: |c, k, v| {
            c.uniform_color.color_space = parse_enum(k, v, "color space (RGB, HSV, LAB)")?;
            Ok(())
        },
    },
    FieldSpec {
        key: "UNIFORM_COLOR_SAMPLE_SIZE",
        aliases: &[],
        value_hint: "positive integer",
        apply: |c, k, v| {
            let size: usize = parse_number(k, v, "positive integer")?;
            if size == 0 {
                return Err(ConfigError::OutOfRange {
                    key: k.to_owned(),
                    value: v.to_owned(),
                    range: ">= 1",
                });
            }
            c.uniform_color.sample_size = size;
            Ok(())
        },
    },
    FieldSpec {
        key: "UNIFORM_COLOR_IGNORE_EDGES",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.uniform_color.ignore_edges = parse_bool(v);
            Ok(())
        },
    },
    FieldSpec {
        key: "UNIFORM_COLOR_EDGE_IGNORE_FRACTION",
        aliases: &[],
        value_hint: "number in 0.0..0.5",
        apply: |c, k, v| {
            c.uniform_color.edge_ignore_fraction = parse_half_fraction(k, v)?;
            Ok(())
        },
    },
    // Background
    FieldSpec {
        key: "BACKGROUND_BACKGROUND_COVERAGE_THRESHOLD",
        aliases: &["BACKGROUND_COVERAGE_THRESHOLD"],
        value_hint: FRACTION,
        apply: |c, k, v| {
            c.background.background_coverage_threshold = parse_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BACKGROUND_BACKGROUND_COLOR_TOLERANCE",
        aliases: &["BACKGROUND_COLOR_TOLERANCE"],
        value_hint: DELTA,
        apply: |c, k, v| {
            c.background.background_color_tolerance = parse_delta(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BACKGROUND_DETECTION_METHOD",
        aliases: &["BACKGROUND_METHOD"],
        value_hint: "edge_based|corner_based|histogram_based",
        apply: |c, k, v| {
            c.background.detection_method = parse_enum(k, v, "background detection method")?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BACKGROUND_EDGE_SAMPLE_FRACTION",
        aliases: &[],
        value_hint: "number in 0.0..0.5",
        apply: |c, k, v| {
            c.background.edge_sample_fraction = parse_half_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BACKGROUND_CORNER_SAMPLE_FRACTION",
        aliases: &[],
        value_hint: "number in 0.0..0.5",
        apply: |c, k, v| {
            c.background.corner_sample_fraction = parse_half_fraction(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "BACKGROUND_HISTOGRAM_BINS",
        aliases: &[],
        value_hint: "integer 2..=256",
        apply: |c, k, v| {
            let bins: u16 = parse_number(k, v, "integer 2..=256")?;
            if !(2..=256).contains(&bins) {
                return Err(ConfigError::OutOfRange {
                    key: k.to_owned(),
                    value: v.to_owned(),
                    range: "2..=256",
                });
            }
            c.background.histogram_bins = bins;
            Ok(())
        },
    },
    // Ratio
    FieldSpec {
        key: "RATIO_TOLERANCE",
        aliases: &[],
        value_hint: DELTA,
        apply: |c, k, v| {
            c.ratio.tolerance = parse_delta(k, v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "RATIO_TARGET_RATIOS",
        aliases: &[],
        value_hint: "W:H[,W:H...]",
        apply: |c, _, v| {
            c.ratio.target_ratios = AspectRatio::parse_list(v)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "RATIO_MINIMUM_WIDTH",
        aliases: &["RATIO_MIN_WIDTH"],
        value_hint: PIXELS,
        apply: |c, k, v| {
            c.ratio.minimum_width = parse_number(k, v, PIXELS)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "RATIO_MINIMUM_HEIGHT",
        aliases: &["RATIO_MIN_HEIGHT"],
        value_hint: PIXELS,
        apply: |c, k, v| {
            c.ratio.minimum_height = parse_number(k, v, PIXELS)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "RATIO_CHECK_MINIMUM_DIMENSIONS",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.ratio.check_minimum_dimensions = parse_bool(v);
            Ok(())
        },
    },
    FieldSpec {
        key: "RATIO_CHECK_MAXIMUM_DIMENSIONS",
        aliases: &[],
        value_hint: BOOL,
        apply: |c, _, v| {
            c.ratio.check_maximum_dimensions = parse_bool(v);
            Ok(())
        },
    },
    FieldSpec {
        key: "RATIO_MAXIMUM_WIDTH",
        aliases: &["RATIO_MAX_WIDTH"],
        value_hint: PIXELS,
        apply: |c, k, v| {
            c.ratio.maximum_width = parse_number(k, v, PIXELS)?;
            Ok(())
        },
    },
    FieldSpec {
        key: "RATIO_MAXIMUM_HEIGHT",
        aliases: &["RATIO_MAX_HEIGHT"],
        value_hint: PIXELS,
        apply: |c, k, v| {
            c.ratio.maximum_height = parse_number(k, v, PIXELS)?;
            Ok(())
        },
    },
];

/// Returns the full override schema, in a stable order.
#[must_use]
pub fn fields() -> &'static [FieldSpec] {
    FIELDS
}

/// Finds the schema entry for a key or alias, ignoring ASCII case.
#[must_use]
pub fn lookup(key: &str) -> Option<&'static FieldSpec> {
    let key = key.trim();
    FIELDS.iter().find(|f| f.matches(key))
}

/// Applies one override. Unknown keys are ignored.
///
/// # Errors
///
/// Returns a [`ConfigError`] naming the key if the value is rejected.
pub fn apply(config: &mut DetectionConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let Some(field) = lookup(key) else {
        debug!(key, "ignoring unknown configuration key");
        return Ok(());
    };
    (field.apply)(config, key.trim(), value.trim())?;
    debug!(key = field.key, value, "applied configuration override");
    Ok(())
}

/// Parses a boolean override.
///
/// `true`, `1`, `yes`, `on` and `false`, `0`, `no`, `off` are recognized
/// case-insensitively. Anything else is treated as `true`.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    !["false", "0", "no", "off"]
        .iter()
        .any(|f| f.eq_ignore_ascii_case(value))
}

fn parse_number<T: FromStr>(key: &str, value: &str, expected: &'static str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_owned(),
        value: value.to_owned(),
        expected,
    })
}

fn parse_enum<T: FromStr>(key: &str, value: &str, expected: &'static str) -> Result<T, ConfigError> {
    parse_number(key, value, expected)
}

fn parse_fraction(key: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = parse_number(key, value, "number")?;
    fraction(key, parsed)?;
    Ok(parsed)
}

fn parse_half_fraction(key: &str, value: &str) -> Result<f64, ConfigError> {
    let parsed: f64 = parse_number(key, value, "number")?;
    half_fraction(key, parsed)?;
    Ok(parsed)
}

fn parse_delta<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + Into<f64> + std::fmt::Display + Copy,
{
    let parsed: T = parse_number(key, value, "number")?;
    non_negative(key, parsed)?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::color::ColorSpace;
    use crate::config::BackgroundMethod;

    #[test]
    fn test_parse_bool_quirk() {
        for yes in ["true", "1", "yes", "on", "YES", "On"] {
            assert!(parse_bool(yes), "{yes}");
        }
        for no in ["false", "0", "no", "off", "OFF", "False"] {
            assert!(!parse_bool(no), "{no}");
        }
        assert!(parse_bool("banana"));
        assert!(parse_bool(""));
    }

    #[test]
    fn test_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for field in fields() {
            assert!(seen.insert(field.key), "duplicate key {}", field.key);
            for alias in field.aliases {
                assert!(seen.insert(*alias), "duplicate alias {alias}");
            }
        }
    }

    #[test]
    fn test_custom_overrides() {
        let overrides = BTreeMap::from([
            ("BORDER_FILL_BLACK_FILL_THRESHOLD", "0.2"),
            ("uniform_color_space", "lab"),
            ("BACKGROUND_DETECTION_METHOD", "histogram"),
            ("RATIO_TARGET_RATIOS", "3:2,2:3"),
            ("DETECTOR_RATIO_ENABLED", "off"),
            ("SOMETHING_ELSE", "whatever"),
        ]);
        let Ok(config) = DetectionConfig::custom(&overrides) else {
            panic!("overrides should apply");
        };

        assert!((config.border_fill.black_fill_threshold - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.uniform_color.color_space, ColorSpace::Lab);
        assert_eq!(
            config.background.detection_method,
            BackgroundMethod::HistogramBased
        );
        assert_eq!(
            config.ratio.target_ratios,
            vec![AspectRatio::new(3, 2), AspectRatio::new(2, 3)]
        );
        assert!(!config.enable_ratio);
        // Untouched fields keep the default preset.
        assert_eq!(config.uniform_color.sample_size, 1000);
    }

    #[test]
    fn test_aliases() {
        let Ok(config) = DetectionConfig::custom([
            ("UNIFORM_COLOR_COVERAGE_THRESHOLD", "0.5"),
            ("UNIFORM_COLOR_DELTA_THRESHOLD", "7.5"),
            ("BACKGROUND_COVERAGE_THRESHOLD", "0.4"),
            ("BACKGROUND_COLOR_TOLERANCE", "12"),
        ]) else {
            panic!("aliases should apply");
        };
        assert!((config.uniform_color.uniform_coverage_threshold - 0.5).abs() < f64::EPSILON);
        assert!((config.uniform_color.color_delta_threshold - 7.5).abs() < f32::EPSILON);
        assert!((config.background.background_coverage_threshold - 0.4).abs() < f64::EPSILON);
        assert!((config.background.background_color_tolerance - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_out_of_range_names_key() {
        let err = DetectionConfig::custom([("BORDER_FILL_REGION_FRACTION", "2")]);
        assert_eq!(
            err,
            Err(ConfigError::OutOfRange {
                key: "BORDER_FILL_REGION_FRACTION".into(),
                value: "2".into(),
                range: "0.0..=1.0",
            })
        );
    }

    #[test]
    fn test_invalid_number() {
        let err = DetectionConfig::custom([("RATIO_MINIMUM_WIDTH", "wide")]);
        assert!(matches!(err, Err(ConfigError::InvalidValue { .. })), "{err:?}");
    }

    #[test]
    fn test_malformed_ratio() {
        let err = DetectionConfig::custom([("RATIO_TARGET_RATIOS", "16:9,sixteen")]);
        assert_eq!(err, Err(ConfigError::MalformedRatio("sixteen".into())));
    }

    #[test]
    fn test_empty_ratio_list() {
        let err = DetectionConfig::custom([("RATIO_TARGET_RATIOS", "")]);
        assert_eq!(err, Err(ConfigError::EmptyTargetRatios));
    }

    #[test]
    fn test_with_overrides_on_preset() {
        let base = DetectionConfig::from_preset(crate::config::Preset::Strict);
        let Ok(config) = base.with_overrides([("ratio_minimum_width", "640")]) else {
            panic!("override should apply");
        };
        assert_eq!(config.ratio.minimum_width, 640);
        assert_eq!(config.ratio.minimum_height, 200);
    }
}

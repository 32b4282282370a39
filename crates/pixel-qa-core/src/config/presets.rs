//! Named configuration presets.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{
    AspectRatio, BackgroundDetectionConfig, BackgroundMethod, BorderFillConfig, DetectionConfig,
    RatioConfig, UniformColorConfig,
};
use crate::color::ColorSpace;
use crate::error::ConfigError;

/// A named, read-only configuration bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Tight thresholds, flags more images.
    Strict,
    /// Balanced thresholds.
    #[default]
    Default,
    /// Loose thresholds, flags fewer images.
    Lenient,
    /// Tuned for photographs.
    Photo,
    /// Tuned for scanned documents.
    Document,
}

impl Preset {
    /// All presets in table order.
    pub const ALL: [Self; 5] = [
        Self::Strict,
        Self::Default,
        Self::Lenient,
        Self::Photo,
        Self::Document,
    ];

    /// Lowercase preset name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Default => "default",
            Self::Lenient => "lenient",
            Self::Photo => "photo",
            Self::Document => "document",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Strict => 0,
            Self::Default => 1,
            Self::Lenient => 2,
            Self::Photo => 3,
            Self::Document => 4,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownPreset(s.to_owned()))
    }
}

static PRESETS: Lazy<[DetectionConfig; 5]> = Lazy::new(|| {
    let default = DetectionConfig::default();

    let strict = DetectionConfig {
        border_fill: BorderFillConfig {
            black_fill_threshold: 0.03,
            white_fill_threshold: 0.03,
            uniformity_required: 0.95,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            uniform_coverage_threshold: 0.80,
            color_delta_threshold: 10.0,
            color_space: ColorSpace::Lab,
            ..UniformColorConfig::default()
        },
        background: BackgroundDetectionConfig {
            background_coverage_threshold: 0.65,
            background_color_tolerance: 15.0,
            ..BackgroundDetectionConfig::default()
        },
        ratio: RatioConfig {
            tolerance: 0.05,
            target_ratios: vec![
                AspectRatio::new(16, 9),
                AspectRatio::new(4, 3),
                AspectRatio::new(1, 1),
            ],
            minimum_width: 200,
            minimum_height: 200,
            ..RatioConfig::default()
        },
        ..default.clone()
    };

    let mut lenient_ratios = AspectRatio::COMMON.to_vec();
    lenient_ratios.push(AspectRatio::new(21, 9));
    let lenient = DetectionConfig {
        border_fill: BorderFillConfig {
            black_fill_threshold: 0.15,
            white_fill_threshold: 0.15,
            uniformity_required: 0.80,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            uniform_coverage_threshold: 0.95,
            color_delta_threshold: 30.0,
            ..UniformColorConfig::default()
        },
        background: BackgroundDetectionConfig {
            background_coverage_threshold: 0.85,
            background_color_tolerance: 35.0,
            ..BackgroundDetectionConfig::default()
        },
        ratio: RatioConfig {
            tolerance: 0.20,
            target_ratios: lenient_ratios,
            minimum_width: 50,
            minimum_height: 50,
            ..RatioConfig::default()
        },
        ..default.clone()
    };

    let photo = DetectionConfig {
        border_fill: BorderFillConfig {
            black_fill_threshold: 0.08,
            white_fill_threshold: 0.12,
            uniformity_required: 0.85,
            region_fraction: 0.05,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            uniform_coverage_threshold: 0.90,
            color_delta_threshold: 20.0,
            color_space: ColorSpace::Lab,
            ignore_edges: true,
            ..UniformColorConfig::default()
        },
        background: BackgroundDetectionConfig {
            background_coverage_threshold: 0.75,
            background_color_tolerance: 25.0,
            ..BackgroundDetectionConfig::default()
        },
        ratio: RatioConfig {
            minimum_width: 300,
            minimum_height: 300,
            ..RatioConfig::default()
        },
        ..default.clone()
    };

    // ISO 216 paper is 1:√2, approximated as 99:70 with the portrait 70:99
    // accepted as well.
    let document = DetectionConfig {
        border_fill: BorderFillConfig {
            black_fill_threshold: 0.02,
            white_fill_threshold: 0.30,
            uniformity_required: 0.95,
            ..BorderFillConfig::default()
        },
        uniform_color: UniformColorConfig {
            uniform_coverage_threshold: 0.95,
            color_delta_threshold: 25.0,
            ..UniformColorConfig::default()
        },
        background: BackgroundDetectionConfig {
            background_coverage_threshold: 0.80,
            background_color_tolerance: 30.0,
            detection_method: BackgroundMethod::HistogramBased,
            ..BackgroundDetectionConfig::default()
        },
        ratio: RatioConfig {
            tolerance: 0.05,
            target_ratios: vec![
                AspectRatio::new(4, 3),
                AspectRatio::new(1, 1),
                AspectRatio::new(3, 4),
                AspectRatio::new(99, 70),
                AspectRatio::new(70, 99),
            ],
            minimum_width: 500,
            minimum_height: 500,
            ..RatioConfig::default()
        },
        ..default.clone()
    };

    [strict, default, lenient, photo, document]
});

pub(super) fn get(preset: Preset) -> &'static DetectionConfig {
    &PRESETS[preset.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("STRICT".parse(), Ok(Preset::Strict));
        assert_eq!(" Photo ".parse(), Ok(Preset::Photo));
        assert_eq!(
            "fast".parse::<Preset>(),
            Err(ConfigError::UnknownPreset("fast".into()))
        );
    }

    #[test]
    fn test_table_order_matches_all() {
        for preset in Preset::ALL {
            assert_eq!(Preset::ALL[preset.index()], preset);
        }
    }

    #[test]
    fn test_strict_values() {
        let config = get(Preset::Strict);
        assert!((config.border_fill.black_fill_threshold - 0.03).abs() < f64::EPSILON);
        assert_eq!(config.uniform_color.color_space, ColorSpace::Lab);
        assert_eq!(config.ratio.minimum_width, 200);
        assert_eq!(config.ratio.target_ratios.len(), 3);
    }

    #[test]
    fn test_document_uses_histogram() {
        let config = get(Preset::Document);
        assert_eq!(
            config.background.detection_method,
            BackgroundMethod::HistogramBased
        );
        assert!(config.ratio.target_ratios.contains(&AspectRatio::new(70, 99)));
    }

    #[test]
    fn test_photo_ignores_edges() {
        let config = get(Preset::Photo);
        assert!(config.uniform_color.ignore_edges);
        assert!((config.border_fill.region_fraction - 0.05).abs() < f64::EPSILON);
        for preset in [Preset::Strict, Preset::Default, Preset::Lenient, Preset::Document] {
            assert!(!get(preset).uniform_color.ignore_edges, "{preset}");
        }
    }

    #[test]
    fn test_lenient_adds_ultrawide() {
        let config = get(Preset::Lenient);
        assert_eq!(config.ratio.target_ratios.last(), Some(&AspectRatio::new(21, 9)));
        assert_eq!(config.ratio.target_ratios.len(), 6);
    }

    #[test]
    fn test_shared_defaults() {
        for preset in Preset::ALL {
            let config = get(preset);
            assert_eq!(config.uniform_color.sample_size, 1000);
            assert_eq!(config.ratio.maximum_width, 10_000);
            assert!(!config.ratio.check_maximum_dimensions);
            assert!(config.enable_ratio);
        }
    }
}

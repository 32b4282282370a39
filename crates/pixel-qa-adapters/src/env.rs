//! Environment-variable adapter for configuration overrides.
//!
//! Variables named `PIXEL_QA_<KEY>` are turned into `<KEY>` overrides for
//! the core override schema, e.g. `PIXEL_QA_RATIO_TOLERANCE=0.2`.
//! `PIXEL_QA_PRESET` selects the base preset instead.

use tracing::debug;

/// Prefix shared by every recognized variable.
pub const PREFIX: &str = "PIXEL_QA_";

const PRESET_KEY: &str = "PRESET";

/// Overrides collected from the environment, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    preset: Option<String>,
    overrides: Vec<(String, String)>,
}

impl EnvOverrides {
    /// Reads the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Builds overrides from explicit `(name, value)` pairs.
    ///
    /// Names without the prefix are ignored; the prefix match is
    /// case-sensitive, as environment names usually are.
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut preset = None;
        let mut overrides = Vec::new();
        for (name, value) in vars {
            let Some(key) = name.as_ref().strip_prefix(PREFIX) else {
                continue;
            };
            if key.is_empty() {
                continue;
            }
            let value = value.into();
            debug!(key, value = value.as_str(), "environment override");
            if key.eq_ignore_ascii_case(PRESET_KEY) {
                preset = Some(value);
            } else {
                overrides.push((key.to_owned(), value));
            }
        }
        overrides.sort();
        Self { preset, overrides }
    }

    /// Preset requested via `PIXEL_QA_PRESET`, if any.
    #[must_use]
    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }

    /// Prefix-stripped `(key, value)` overrides.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True if no recognized variable was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preset.is_none() && self.overrides.is_empty()
    }
}

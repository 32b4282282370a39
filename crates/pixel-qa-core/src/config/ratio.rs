//! Aspect ratio values written as `W:H`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An integer aspect ratio such as 16:9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    /// Width component.
    pub width: u32,
    /// Height component.
    pub height: u32,
}

impl AspectRatio {
    /// 16:9, 4:3, 1:1, 3:4 and 9:16.
    pub const COMMON: [Self; 5] = [
        Self::new(16, 9),
        Self::new(4, 3),
        Self::new(1, 1),
        Self::new(3, 4),
        Self::new(9, 16),
    ];

    /// Creates a ratio. Components are not checked; see [`Self::is_valid`].
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if both components are positive.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width divided by height.
    #[must_use]
    pub fn value(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Parses a comma-separated `W:H,W:H` list. Blank entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedRatio`] for the first bad entry.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, ConfigError> {
        list.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatio {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ConfigError::MalformedRatio(s.to_owned());
        let (w, h) = s.trim().split_once(':').ok_or_else(malformed)?;
        let width = w.trim().parse::<u32>().map_err(|_| malformed())?;
        let height = h.trim().parse::<u32>().map_err(|_| malformed())?;
        let ratio = Self::new(width, height);
        if ratio.is_valid() {
            Ok(ratio)
        } else {
            Err(malformed())
        }
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(ratio: AspectRatio) -> Self {
        ratio.to_string()
    }
}

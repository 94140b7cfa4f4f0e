use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Board dimensions and scoring rules.
///
/// Missing fields take their default when deserialized, so a config file
/// only needs to name what it changes:
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "width": 12 }"#).unwrap();
/// assert_eq!(config.width, 12);
/// assert_eq!(config.height, GameConfig::DEFAULT_HEIGHT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Points per cleared line; there is no multi-line bonus.
    pub line_clear_score: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            line_clear_score: Self::DEFAULT_LINE_CLEAR_SCORE,
        }
    }
}

impl GameConfig {
    pub const DEFAULT_WIDTH: usize = 10;
    pub const DEFAULT_HEIGHT: usize = 20;
    pub const DEFAULT_LINE_CLEAR_SCORE: u64 = 100;

    // A flat I spawned at `width / 2 - 1` must fit horizontally.
    const WIDTH_RANGE: std::ops::RangeInclusive<usize> = 5..=1024;
    const HEIGHT_RANGE: std::ops::RangeInclusive<usize> = 4..=1024;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Self::WIDTH_RANGE.contains(&self.width) {
            return Err(ConfigError::Width(self.width));
        }
        if !Self::HEIGHT_RANGE.contains(&self.height) {
            return Err(ConfigError::Height(self.height));
        }
        Ok(())
    }
}

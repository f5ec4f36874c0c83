//! Configuration structures for parsing and splitting.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HoadonError, Result};

/// Main configuration for hoadon.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoadonConfig {
    /// Receipt parser configuration.
    pub parser: ParserConfig,

    /// Bill splitting configuration.
    pub split: SplitConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Receipt parser configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// UTC offset, in hours, applied to retailer timestamps without a zone
    /// and to the generic fallback's date.
    pub utc_offset_hours: i32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            // Asia/Ho_Chi_Minh, no DST
            utc_offset_hours: 7,
        }
    }
}

/// Bill splitting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Number of people sharing each invoice.
    pub people: u32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { people: 2 }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl HoadonConfig {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values no parser or split can work with.
    pub fn validate(&self) -> Result<()> {
        if !(-23..=23).contains(&self.parser.utc_offset_hours) {
            return Err(HoadonError::Config(format!(
                "parser.utc_offset_hours must be between -23 and 23, got {}",
                self.parser.utc_offset_hours
            )));
        }
        if self.split.people == 0 {
            return Err(HoadonError::Config(
                "split.people must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

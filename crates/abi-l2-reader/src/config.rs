//! Configuration for the ABI L2 reader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, ReaderResult};
use crate::platform::SENSOR;

/// Configuration for the ABI L2 reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Sensor name attached to decoded datasets.
    pub sensor: String,

    /// Decimals fixed-grid extents (meters) are rounded to.
    pub extent_decimals: u32,

    /// Additional platform shortname to name entries (e.g. `G20 -> GOES-20`).
    pub platform_names: BTreeMap<String, String>,

    /// Replace fill values with NaN when decoding.
    pub mask_fill: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            sensor: SENSOR.to_string(),
            extent_decimals: 6,
            platform_names: BTreeMap::new(),
            mask_fill: true,
        }
    }
}

impl ReaderConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ABI_SENSOR") {
            if !val.trim().is_empty() {
                config.sensor = val.trim().to_string();
            }
        }

        if let Ok(val) = std::env::var("ABI_EXTENT_DECIMALS") {
            if let Ok(decimals) = val.parse() {
                config.extent_decimals = decimals;
            }
        }

        if let Ok(val) = std::env::var("ABI_PLATFORM_NAMES") {
            config.platform_names.extend(parse_platform_list(&val));
        }

        if let Ok(val) = std::env::var("ABI_MASK_FILL") {
            config.mask_fill = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Load configuration from a YAML file. Missing keys take defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ReaderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ReaderResult<()> {
        if self.sensor.is_empty() {
            return Err(ReaderError::Config("sensor must not be empty".to_string()));
        }

        // 10^15 is the last power of ten an f64 holds exactly
        if self.extent_decimals > 15 {
            return Err(ReaderError::Config(
                "extent_decimals must be 0-15".to_string(),
            ));
        }

        if let Some((short, _)) = self
            .platform_names
            .iter()
            .find(|(short, name)| short.is_empty() || name.is_empty())
        {
            return Err(ReaderError::Config(format!(
                "empty platform name entry for '{}'",
                short
            )));
        }

        Ok(())
    }
}

/// Parse `G20=GOES-20,G21=GOES-21`. Malformed entries are skipped.
fn parse_platform_list(s: &str) -> BTreeMap<String, String> {
    s.split(',')
        .filter_map(|entry| entry.split_once('='))
        .map(|(short, name)| (short.trim().to_ascii_uppercase(), name.trim().to_string()))
        .filter(|(short, name)| !short.is_empty() && !name.is_empty())
        .collect()
}

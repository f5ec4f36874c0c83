//! Subcommands of the `hoadon` binary.

pub mod batch;
pub mod config;
pub mod output;
pub mod parse;
pub mod summary;

use std::path::{Path, PathBuf};

use hoadon_core::HoadonConfig;
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hoadon")
        .join("config.json")
}

/// Load the config named by `--config`, else the default file if present,
/// else built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<HoadonConfig> {
    if let Some(path) = config_path {
        return Ok(HoadonConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(HoadonConfig::from_file(&path)?)
    } else {
        Ok(HoadonConfig::default())
    }
}

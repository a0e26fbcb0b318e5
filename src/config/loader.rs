//! Configuration file loading and parsing.

use crate::errors::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML file.
///
/// Empty strings and missing numbers mean "keep the default".
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub database_path: PathBuf,

    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub research_model: String,

    #[serde(default)]
    pub extraction_model: String,

    #[serde(default)]
    pub timeout_ms: Option<u64>,

    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,
}

/// Default config file location: `<config dir>/astra/config.toml`.
pub fn default_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));

    config_dir.join("astra/config.toml")
}

/// Load configuration from a TOML file, if it exists.
pub fn read_config_file(config_path: &Path) -> Result<Option<ConfigFile>, Error> {
    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(config_path).map_err(|e| {
        Error::Config(format!(
            "Failed to read config file {}: {e}",
            config_path.display()
        ))
    })?;

    let config: ConfigFile = toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse config file {}: {e}",
            config_path.display()
        ))
    })?;

    Ok(Some(config))
}

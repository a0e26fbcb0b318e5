//! Configuration system for astra.

mod env_parser;
mod loader;
mod overrides;
mod paths;
mod validation;

#[cfg(test)]
mod tests_utils;
#[cfg(test)]
use tests_utils::ENV_MUTEX;

use crate::errors::Error;
use crate::session::{DEFAULT_EXTRACTION_MODEL, DEFAULT_RESEARCH_MODEL};
use std::fmt;
use std::path::{Path, PathBuf};

pub use loader::{default_config_path, ConfigFile};

/// Default Gemini REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration values with priority: defaults < config file < env vars.
#[derive(Clone)]
pub struct Config {
    /// Path to the SQLite database holding the memory slot.
    pub database_path: PathBuf,

    /// Base URL of the generative model API.
    pub endpoint: String,

    /// Model used for the grounded research call.
    pub research_model: String,

    /// Model used for fact extraction.
    pub extraction_model: String,

    /// Per-request timeout in milliseconds (0 disables it).
    pub timeout_ms: u64,

    /// Connect timeout in milliseconds (0 disables it).
    pub connect_timeout_ms: u64,

    /// API key. Only read from the environment.
    pub api_key: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("endpoint", &self.endpoint)
            .field("research_model", &self.research_model)
            .field("extraction_model", &self.extraction_model)
            .field("timeout_ms", &self.timeout_ms)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        // Use home directory with sensible fallback for systems without HOME
        let home = dirs::home_dir().unwrap_or_else(|| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
        });

        Self {
            database_path: home.join(".astra").join("memory.db"),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            research_model: DEFAULT_RESEARCH_MODEL.to_string(),
            extraction_model: DEFAULT_EXTRACTION_MODEL.to_string(),
            timeout_ms: 0,
            connect_timeout_ms: 10_000,
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&default_config_path())
    }

    /// Load configuration with defaults, values from `path` (if it exists),
    /// and environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let file_config = loader::read_config_file(path)?;

        let mut config = Config::default();

        if let Some(mut file) = file_config {
            paths::expand_tilde(&mut file.database_path);
            config.merge_from_file(file);
        }

        overrides::apply_env_overrides(&mut config)?;

        config.validate()?;

        Ok(config)
    }

    /// Merge configuration from a file into this config.
    fn merge_from_file(&mut self, file: ConfigFile) {
        if !file.database_path.as_os_str().is_empty() {
            self.database_path = file.database_path;
        }
        if !file.endpoint.is_empty() {
            self.endpoint = file.endpoint;
        }
        if !file.research_model.is_empty() {
            self.research_model = file.research_model;
        }
        if !file.extraction_model.is_empty() {
            self.extraction_model = file.extraction_model;
        }
        if let Some(timeout_ms) = file.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = file.connect_timeout_ms {
            self.connect_timeout_ms = connect_timeout_ms;
        }
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), Error> {
        let validator = validation::ConfigValidator {
            database_path: self.database_path.clone(),
            endpoint: self.endpoint.clone(),
            research_model: self.research_model.clone(),
            extraction_model: self.extraction_model.clone(),
        };

        validator.validate()
    }

    /// Ensure the parent directory of the database exists.
    pub fn ensure_directories(&self) -> Result<(), Error> {
        if let Some(parent) = self.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Config(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(())
    }
}

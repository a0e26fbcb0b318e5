//! Environment variable parsing utilities for configuration.

use crate::errors::Error;
use std::path::PathBuf;

use super::paths;

/// Parse environment variable value or return error if empty/whitespace.
fn parse_env_string(name: &str, value: &str) -> Result<String, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(value.trim().to_string())
}

/// Parse environment variable as a path, expanding tilde.
fn parse_env_path(name: &str, value: &str) -> Result<PathBuf, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(paths::expand_tilde_path(&PathBuf::from(value)))
}

/// Parse environment variable as a millisecond count.
fn parse_env_millis(name: &str, value: &str) -> Result<u64, Error> {
    if value.trim().is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Apply ASTRA_DATABASE_PATH environment variable override.
pub fn apply_database_path_override(database_path: &mut PathBuf) -> Result<(), Error> {
    if let Ok(val) = std::env::var("ASTRA_DATABASE_PATH") {
        *database_path = parse_env_path("ASTRA_DATABASE_PATH", &val)?;
    }
    Ok(())
}

/// Apply a string override from `name`, if set.
pub fn apply_string_override(name: &str, target: &mut String) -> Result<(), Error> {
    if let Ok(val) = std::env::var(name) {
        *target = parse_env_string(name, &val)?;
    }
    Ok(())
}

/// Apply a millisecond override from `name`, if set.
pub fn apply_millis_override(name: &str, target: &mut u64) -> Result<(), Error> {
    if let Ok(val) = std::env::var(name) {
        *target = parse_env_millis(name, &val)?;
    }
    Ok(())
}

/// Read the API key from ASTRA_API_KEY, falling back to GEMINI_API_KEY.
pub fn apply_api_key_override(api_key: &mut Option<String>) -> Result<(), Error> {
    for name in ["ASTRA_API_KEY", "GEMINI_API_KEY"] {
        if let Ok(val) = std::env::var(name) {
            *api_key = Some(parse_env_string(name, &val)?);
            return Ok(());
        }
    }
    Ok(())
}

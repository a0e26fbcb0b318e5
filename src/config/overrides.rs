//! Environment variable overrides for configuration.

use crate::errors::Error;

use super::env_parser;
use super::Config;

#[cfg(test)]
use super::tests_utils::{cleanup_env_vars, set_env, ENV_MUTEX};

/// Apply environment variable overrides to configuration.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), Error> {
    env_parser::apply_database_path_override(&mut config.database_path)?;
    env_parser::apply_string_override("ASTRA_ENDPOINT", &mut config.endpoint)?;
    env_parser::apply_string_override("ASTRA_RESEARCH_MODEL", &mut config.research_model)?;
    env_parser::apply_string_override("ASTRA_EXTRACTION_MODEL", &mut config.extraction_model)?;
    env_parser::apply_millis_override("ASTRA_TIMEOUT_MS", &mut config.timeout_ms)?;
    env_parser::apply_millis_override("ASTRA_CONNECT_TIMEOUT_MS", &mut config.connect_timeout_ms)?;
    env_parser::apply_api_key_override(&mut config.api_key)?;
    Ok(())
}

//! Configuration validation logic.

use crate::errors::Error;
use std::path::PathBuf;

/// Validates configuration values.
pub struct ConfigValidator {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,
    /// Base URL of the model API.
    pub endpoint: String,
    /// Research model identifier.
    pub research_model: String,
    /// Extraction model identifier.
    pub extraction_model: String,
}

impl ConfigValidator {
    /// Validate all configuration values for correctness and constraints.
    ///
    /// Checks that:
    /// - Database path is not empty
    /// - Endpoint is an http(s) URL
    /// - Neither model name is empty or contains a path separator
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any validation check fails.
    pub fn validate(&self) -> Result<(), Error> {
        self.validate_database_path()?;
        self.validate_endpoint()?;
        Self::validate_model("research_model", &self.research_model)?;
        Self::validate_model("extraction_model", &self.extraction_model)?;

        Ok(())
    }

    fn validate_database_path(&self) -> Result<(), Error> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        Ok(())
    }

    fn validate_endpoint(&self) -> Result<(), Error> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(Error::Config(format!(
                "Invalid endpoint: {endpoint:?} (must start with http:// or https://)"
            )));
        }

        Ok(())
    }

    fn validate_model(field: &str, model: &str) -> Result<(), Error> {
        if model.trim().is_empty() {
            return Err(Error::Config(format!("{field} cannot be empty")));
        }
        // The model name is interpolated into the request path.
        if model.contains('/') || model.contains('?') {
            return Err(Error::Config(format!(
                "Invalid {field}: {model:?} (must not contain '/' or '?')"
            )));
        }

        Ok(())
    }
}

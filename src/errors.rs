//! Error types for astra.

use thiserror::Error;

/// Main error type for astra operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error.
    #[error("SQLite error: {0}")]
    SQLite(#[from] rusqlite::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query was empty or whitespace-only.
    #[error("Query cannot be empty")]
    EmptyInput,

    /// A research session is already running.
    #[error("A research session is already in flight")]
    SessionInFlight,

    /// The generative model provider failed.
    #[error("Provider error during {operation}: {cause}")]
    Provider { operation: String, cause: String },

    /// Invalid input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn provider(operation: &str, cause: impl Into<String>) -> Self {
        Error::Provider {
            operation: operation.to_string(),
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = Error::provider("research", "connect error: refused");
        assert_eq!(
            err.to_string(),
            "Provider error during research: connect error: refused"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Json(_)));
    }
}

//! Generative model abstraction.
//!
//! The research and extraction stages talk to the model only through
//! [`GenerativeModel`], so tests and embedders can swap the provider.

mod gemini;

pub use gemini::GeminiClient;

use crate::errors::Result;
use std::time::Duration;

/// Trait for retrieval-augmented generative model providers.
pub trait GenerativeModel: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Run one generation request.
    ///
    /// # Errors
    ///
    /// Returns `Error::Provider` if the request cannot be completed.
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;
}

impl<T: GenerativeModel + ?Sized> GenerativeModel for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        (**self).generate(request)
    }
}

/// Tools the model may call while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Live web search used to ground the answer.
    GoogleSearch,
}

/// Constrains the response body to a MIME type and JSON schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFormat {
    pub mime_type: String,
    pub schema: serde_json::Value,
}

/// A single generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Model identifier, e.g. `gemini-3-pro-preview`.
    pub model: String,
    /// User-turn text.
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub tools: Vec<Tool>,
    pub response_format: Option<ResponseFormat>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
            tools: Vec::new(),
            response_format: None,
        }
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    #[must_use]
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    #[must_use]
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// A grounding citation as reported by the provider. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingChunk {
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub uri: Option<String>,
}

/// Provider response reduced to what the core consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Generated text, `None` when the provider produced none.
    pub text: Option<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

impl GenerateResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            grounding_chunks: Vec::new(),
        }
    }
}

/// HTTP client configuration for model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 0,
            connect_timeout_ms: 10_000,
        }
    }
}

impl LlmHttpConfig {
    /// Take timeouts from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            connect_timeout_ms: config.connect_timeout_ms,
        }
    }
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: LlmHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    // reqwest's blocking client defaults to a 30s timeout; only an explicit
    // `None` disables it.
    builder = if config.timeout_ms > 0 {
        builder.timeout(Duration::from_millis(config.timeout_ms))
    } else {
        builder.timeout(None)
    };
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

//! Google Gemini `generateContent` client.

use super::{
    build_http_client, GenerateRequest, GenerateResponse, GenerativeModel, GroundingChunk,
    LlmHttpConfig, Tool,
};
use crate::config::{Config, DEFAULT_ENDPOINT};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Gemini REST client.
pub struct GeminiClient {
    /// API key.
    api_key: Option<String>,
    /// API endpoint, without trailing slash.
    endpoint: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Creates a client with the default endpoint and no API key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: build_http_client(LlmHttpConfig::default()),
        }
    }

    /// Creates a client from loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let client = Self::new()
            .with_endpoint(config.endpoint.as_str())
            .with_http_config(LlmHttpConfig::from_config(config));
        match &config.api_key {
            Some(key) => client.with_api_key(key.as_str()),
            None => client,
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: LlmHttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    fn url_for(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, model)
    }

    fn api_key(&self) -> Result<&str> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::provider(
                "gemini_request",
                "API key not set (ASTRA_API_KEY or GEMINI_API_KEY)",
            )),
        }
    }

    fn request(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let api_key = self.api_key()?;

        tracing::info!(provider = "gemini", model = %request.model, "Making LLM request");

        let body = WireRequest::from_request(request);
        let response = self
            .client
            .post(self.url_for(&request.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    provider = "gemini",
                    model = %request.model,
                    error = %e,
                    error_kind = error_kind,
                    "LLM request failed"
                );
                Error::provider("gemini_request", format!("{error_kind} error: {e}"))
            })?;

        let status = response.status();
        let text = response.text().map_err(|e| {
            Error::provider("gemini_response", format!("failed to read body: {e}"))
        })?;

        if !status.is_success() {
            tracing::error!(
                provider = "gemini",
                model = %request.model,
                status = %status,
                body = %text,
                "LLM API returned error status"
            );
            return Err(Error::provider(
                "gemini_request",
                format!("API returned status: {status} - {text}"),
            ));
        }

        parse_response(&text)
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerativeModel for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.request(request)
    }
}

/// Decode a `generateContent` response body.
///
/// Text is the concatenation of the first candidate's non-thought parts.
/// Grounding chunks without web data are kept with every field empty.
pub(crate) fn parse_response(body: &str) -> Result<GenerateResponse> {
    let wire: WireResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(provider = "gemini", error = %e, "Failed to parse LLM response");
        Error::provider("gemini_response", e.to_string())
    })?;

    let Some(candidate) = wire.candidates.into_iter().next() else {
        return Ok(GenerateResponse::default());
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    let grounding_chunks = candidate
        .grounding_metadata
        .map(|m| m.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .map(|chunk| match chunk.web {
            Some(web) => GroundingChunk {
                title: web.title,
                snippet: web.snippet,
                uri: web.uri,
            },
            None => GroundingChunk::default(),
        })
        .collect();

    Ok(GenerateResponse {
        text: (!text.is_empty()).then_some(text),
        grounding_chunks,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig<'a>>,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a GenerateRequest) -> Self {
        Self {
            contents: vec![WireContent::user(&request.prompt)],
            system_instruction: request
                .system_instruction
                .as_deref()
                .map(|text| WireContent {
                    role: None,
                    parts: vec![WirePart { text }],
                }),
            tools: request.tools.iter().map(|t| WireTool::from(*t)).collect(),
            generation_config: request.response_format.as_ref().map(|format| {
                WireGenerationConfig {
                    response_mime_type: &format.mime_type,
                    response_schema: &format.schema,
                }
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<WirePart<'a>>,
}

impl<'a> WireContent<'a> {
    fn user(text: &'a str) -> Self {
        Self {
            role: Some("user"),
            parts: vec![WirePart { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool {
    #[serde(skip_serializing_if = "Option::is_none")]
    google_search: Option<EmptyObject>,
}

impl From<Tool> for WireTool {
    fn from(tool: Tool) -> Self {
        match tool {
            Tool::GoogleSearch => WireTool {
                google_search: Some(EmptyObject {}),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct EmptyObject {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireCandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<WireGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct WireCandidateContent {
    #[serde(default)]
    parts: Vec<WireResponsePart>,
}

#[derive(Debug, Deserialize)]
struct WireResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct WireGroundingChunk {
    #[serde(default)]
    web: Option<WireWebChunk>,
}

#[derive(Debug, Deserialize)]
struct WireWebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ResponseFormat;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let client = GeminiClient::new();
        assert_eq!(client.name(), "gemini");
        assert_eq!(client.endpoint, DEFAULT_ENDPOINT);
        assert!(client.api_key.is_none());
    }

    #[test]
    fn test_default_config_endpoint_matches_client() {
        let client = GeminiClient::from_config(&Config::default());
        assert_eq!(client.endpoint, GeminiClient::new().endpoint);
    }

    #[test]
    fn test_client_configuration() {
        let client = GeminiClient::new()
            .with_api_key("test-key")
            .with_endpoint("https://proxy.local/v1beta/");

        assert_eq!(client.api_key, Some("test-key".to_string()));
        assert_eq!(client.endpoint, "https://proxy.local/v1beta");
        assert_eq!(
            client.url_for("gemini-3-pro-preview"),
            "https://proxy.local/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn test_missing_api_key_is_provider_error() {
        let client = GeminiClient::new();
        let result = client.generate(&GenerateRequest::new("m", "q"));
        assert!(matches!(result, Err(Error::Provider { .. })));

        let blank = GeminiClient::new().with_api_key("   ");
        assert!(blank.api_key().is_err());
    }

    #[test]
    fn test_research_request_body() {
        let request = GenerateRequest::new("gemini-3-pro-preview", "User Query: rust")
            .with_system_instruction("Perform deep research.")
            .with_tool(Tool::GoogleSearch);

        let body = serde_json::to_value(WireRequest::from_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "User Query: rust" }] }],
                "systemInstruction": { "parts": [{ "text": "Perform deep research." }] },
                "tools": [{ "googleSearch": {} }]
            })
        );
    }

    #[test]
    fn test_structured_request_body() {
        let schema = json!({ "type": "OBJECT" });
        let request = GenerateRequest::new("m", "extract").with_response_format(ResponseFormat {
            mime_type: "application/json".to_string(),
            schema: schema.clone(),
        });

        let body = serde_json::to_value(WireRequest::from_request(&request)).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_text_and_grounding() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Quantum " }, { "text": "supremacy." }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://example.com/a", "title": "Example A" } },
                        { "web": { "uri": "https://example.com/b" } }
                    ]
                }
            }]
        })
        .to_string();

        let response = parse_response(&body).unwrap();
        assert_eq!(response.text.as_deref(), Some("Quantum supremacy."));
        assert_eq!(response.grounding_chunks.len(), 2);
        assert_eq!(response.grounding_chunks[0].title.as_deref(), Some("Example A"));
        assert_eq!(
            response.grounding_chunks[1].uri.as_deref(),
            Some("https://example.com/b")
        );
        assert_eq!(response.grounding_chunks[1].title, None);
    }

    #[test]
    fn test_parse_skips_thought_parts() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "answer" }
                ]}
            }]
        })
        .to_string();

        let response = parse_response(&body).unwrap();
        assert_eq!(response.text.as_deref(), Some("answer"));
        assert!(response.grounding_chunks.is_empty());
    }

    #[test]
    fn test_parse_no_candidates() {
        let response = parse_response("{}").unwrap();
        assert_eq!(response, GenerateResponse::default());
    }

    #[test]
    fn test_parse_non_web_chunk_kept_empty() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "x" }] },
                "groundingMetadata": { "groundingChunks": [{ "retrievedContext": {} }] }
            }]
        })
        .to_string();

        let response = parse_response(&body).unwrap();
        assert_eq!(response.grounding_chunks, vec![GroundingChunk::default()]);
    }

    #[test]
    fn test_parse_invalid_body_is_provider_error() {
        let result = parse_response("<html>bad gateway</html>");
        assert!(matches!(result, Err(Error::Provider { .. })));
    }
}

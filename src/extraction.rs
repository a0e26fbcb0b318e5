//! Secondary distillation call that turns an answer into durable facts.

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::llm::{GenerateRequest, GenerativeModel, ResponseFormat};

/// Maximum number of facts kept from one answer.
pub const MAX_FACTS: usize = 3;

/// Why a structured extraction response was rejected.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction response was empty")]
    Empty,
    #[error("extraction response is not valid JSON: {0}")]
    Malformed(serde_json::Error),
    #[error("extraction response has the wrong shape: {0}")]
    WrongShape(serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct MemoriesPayload {
    memories: Vec<String>,
}

/// Parse a `{ "memories": [string] }` body.
///
/// Blank entries are dropped and at most [`MAX_FACTS`] are kept.
pub fn parse_memories(text: &str) -> Result<Vec<String>, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(ExtractionError::Malformed)?;
    let payload: MemoriesPayload =
        serde_json::from_value(value).map_err(ExtractionError::WrongShape)?;

    Ok(payload
        .memories
        .into_iter()
        .map(|fact| fact.trim().to_string())
        .filter(|fact| !fact.is_empty())
        .take(MAX_FACTS)
        .collect())
}

fn memories_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "memories": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        },
        "required": ["memories"]
    })
}

/// Issues the distillation request and recovers from every failure.
pub struct FactExtractor<'a, M: GenerativeModel + ?Sized> {
    model: &'a M,
    model_name: &'a str,
}

impl<'a, M: GenerativeModel + ?Sized> FactExtractor<'a, M> {
    pub fn new(model: &'a M, model_name: &'a str) -> Self {
        Self { model, model_name }
    }

    pub fn build_request(&self, answer_text: &str) -> GenerateRequest {
        let prompt = format!(
            "Extract up to {MAX_FACTS} short, factual snippets for a memory system from this text. \
             Maintain the language of the source text: {answer_text}"
        );
        GenerateRequest::new(self.model_name, prompt).with_response_format(ResponseFormat {
            mime_type: "application/json".to_string(),
            schema: memories_schema(),
        })
    }

    /// Distill up to [`MAX_FACTS`] facts from `answer_text`.
    ///
    /// Never fails: provider errors and unusable responses yield an empty list.
    pub fn extract_facts(&self, answer_text: &str) -> Vec<String> {
        let request = self.build_request(answer_text);
        let response = match self.model.generate(&request) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    provider = self.model.name(),
                    error = %e,
                    "Fact extraction call failed, continuing without facts"
                );
                return Vec::new();
            }
        };

        match parse_memories(response.text.as_deref().unwrap_or_default()) {
            Ok(facts) => facts,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse memory extraction");
                Vec::new()
            }
        }
    }
}

//! Primary retrieval-augmented research call.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::llm::{GenerateRequest, GenerateResponse, GenerativeModel, GroundingChunk, Tool};

/// Answer used when the provider returns no text.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response generated.";
/// Citation title used when the provider omits one.
pub const DEFAULT_SOURCE_TITLE: &str = "Reference";
/// Citation link used when the provider omits one.
pub const DEFAULT_SOURCE_LINK: &str = "#";

const RESEARCH_SYSTEM_INSTRUCTION: &str = "Perform deep research. Provide a comprehensive summary, cite sources, and extract key facts. If the user asks in Thai, respond in Thai with professional and accurate information.";

/// A citation backing the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl From<GroundingChunk> for SearchResult {
    fn from(chunk: GroundingChunk) -> Self {
        Self {
            title: chunk
                .title
                .unwrap_or_else(|| DEFAULT_SOURCE_TITLE.to_string()),
            snippet: chunk.snippet.unwrap_or_default(),
            link: chunk.uri.unwrap_or_else(|| DEFAULT_SOURCE_LINK.to_string()),
        }
    }
}

/// Normalized result of the research call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResearchOutcome {
    /// Synthesized answer. Never empty.
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

impl From<GenerateResponse> for ResearchOutcome {
    fn from(response: GenerateResponse) -> Self {
        let answer = response
            .text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_RESPONSE_PLACEHOLDER.to_string());
        let sources = response
            .grounding_chunks
            .into_iter()
            .map(SearchResult::from)
            .collect();
        Self { answer, sources }
    }
}

/// Issues the grounded research request for a query.
pub struct ResearchInvoker<'a, M: GenerativeModel + ?Sized> {
    model: &'a M,
    model_name: &'a str,
}

impl<'a, M: GenerativeModel + ?Sized> ResearchInvoker<'a, M> {
    pub fn new(model: &'a M, model_name: &'a str) -> Self {
        Self { model, model_name }
    }

    /// Build the request sent for `query` with prior-knowledge `context`.
    pub fn build_request(&self, query: &str, context: &str) -> GenerateRequest {
        let prompt = format!(
            "You are an advanced AI Research Browser agent.\n\
             Recent Knowledge Context (Memory): {context}\n\
             User Query: {query}"
        );
        GenerateRequest::new(self.model_name, prompt)
            .with_system_instruction(RESEARCH_SYSTEM_INSTRUCTION)
            .with_tool(Tool::GoogleSearch)
    }

    /// Research `query` and normalize the provider's answer and citations.
    ///
    /// # Errors
    ///
    /// Provider failures propagate unchanged.
    pub fn research(&self, query: &str, context: &str) -> Result<ResearchOutcome> {
        let request = self.build_request(query, context);
        let response = self.model.generate(&request)?;
        let outcome = ResearchOutcome::from(response);
        tracing::debug!(
            provider = self.model.name(),
            sources = outcome.sources.len(),
            answer_chars = outcome.answer.chars().count(),
            "Research call completed"
        );
        Ok(outcome)
    }
}

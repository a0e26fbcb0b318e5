//! Research session orchestration.
//!
//! One session runs context assembly, the research call, fact extraction and
//! memory persistence in that order. At most one session is in flight per
//! orchestrator; a second caller is turned away instead of queued.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::context::build_context;
use crate::errors::{Error, Result};
use crate::extraction::FactExtractor;
use crate::llm::GenerativeModel;
use crate::memory::MemoryStore;
use crate::memory_types::MemoryItem;
use crate::research::{ResearchInvoker, SearchResult};
use crate::slots::SlotStore;

/// Number of accepted queries remembered by [`Orchestrator::recent_queries`].
pub const RECENT_QUERY_LIMIT: usize = 5;

/// Default model for the grounded research call.
pub const DEFAULT_RESEARCH_MODEL: &str = "gemini-3-pro-preview";
/// Default model for fact extraction.
pub const DEFAULT_EXTRACTION_MODEL: &str = "gemini-3-flash-preview";

/// The finished result of one research session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSession {
    pub id: String,
    pub query: String,
    /// Synthesized answer. Never empty.
    pub answer: String,
    pub sources: Vec<SearchResult>,
    /// Facts distilled from the answer (0 to 3).
    pub extracted_memory: Vec<String>,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Lifecycle of a research session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Idle,
    AssemblingContext,
    InvokingResearch,
    ExtractingFacts,
    PersistingMemory,
    Complete,
    /// Terminal; reached only when the research call fails.
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AssemblingContext => "assembling-context",
            SessionState::InvokingResearch => "invoking-research",
            SessionState::ExtractingFacts => "extracting-facts",
            SessionState::PersistingMemory => "persisting-memory",
            SessionState::Complete => "complete",
            SessionState::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single-slot execution gate, released when the guard drops.
struct SessionGuard<'a> {
    busy: &'a AtomicBool,
}

impl<'a> SessionGuard<'a> {
    fn acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { busy })
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives research sessions against a model and a memory store.
///
/// The memory store is owned here and guarded by a mutex, so the
/// load-then-append cycle is serialized even when the orchestrator is shared
/// between threads.
pub struct Orchestrator<M: GenerativeModel, S: SlotStore> {
    model: M,
    store: Mutex<MemoryStore<S>>,
    research_model: String,
    extraction_model: String,
    busy: AtomicBool,
    state: Mutex<SessionState>,
    recent: Mutex<VecDeque<String>>,
}

impl<M: GenerativeModel, S: SlotStore> Orchestrator<M, S> {
    /// Create an orchestrator using the default model names.
    pub fn new(model: M, store: MemoryStore<S>) -> Self {
        Self {
            model,
            store: Mutex::new(store),
            research_model: DEFAULT_RESEARCH_MODEL.to_string(),
            extraction_model: DEFAULT_EXTRACTION_MODEL.to_string(),
            busy: AtomicBool::new(false),
            state: Mutex::new(SessionState::Idle),
            recent: Mutex::new(VecDeque::with_capacity(RECENT_QUERY_LIMIT)),
        }
    }

    /// Create an orchestrator with model names taken from configuration.
    pub fn from_config(model: M, store: MemoryStore<S>, config: &Config) -> Self {
        Self::new(model, store).with_models(&config.research_model, &config.extraction_model)
    }

    #[must_use]
    pub fn with_models(mut self, research: &str, extraction: &str) -> Self {
        self.research_model = research.to_string();
        self.extraction_model = extraction.to_string();
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// State of the current or most recent session.
    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// Whether a session is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The last accepted queries, newest first.
    pub fn recent_queries(&self) -> Vec<String> {
        lock(&self.recent).iter().cloned().collect()
    }

    /// Load every stored fact, most recent first.
    pub fn load_memory(&self) -> Result<Vec<MemoryItem>> {
        lock(&self.store).load()
    }

    /// Delete every stored fact.
    pub fn clear_memory(&self) -> Result<()> {
        lock(&self.store).clear()
    }

    /// The context string the next session would send.
    pub fn context(&self) -> Result<String> {
        Ok(build_context(&self.load_memory()?))
    }

    /// Run one research session for `query`.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyInput` if the query is blank
    /// - `Error::SessionInFlight` if another session is running
    /// - `Error::Provider` if the research call fails; memory is left untouched
    ///
    /// Extraction failures and memory write failures are logged and do not
    /// fail the session.
    pub fn run_research(&self, query: &str) -> Result<ResearchSession> {
        if query.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        let _guard = SessionGuard::acquire(&self.busy).ok_or(Error::SessionInFlight)?;

        let session_id = Uuid::new_v4().to_string();
        self.remember_query(query);

        self.transition(&session_id, SessionState::AssemblingContext);
        let context = self.snapshot_context();

        self.transition(&session_id, SessionState::InvokingResearch);
        let invoker = ResearchInvoker::new(&self.model, &self.research_model);
        let outcome = match invoker.research(query, &context) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(session = %session_id, error = %e, "Research call failed");
                self.transition(&session_id, SessionState::Failed);
                return Err(e);
            }
        };

        self.transition(&session_id, SessionState::ExtractingFacts);
        let extractor = FactExtractor::new(&self.model, &self.extraction_model);
        let facts = extractor.extract_facts(&outcome.answer);

        self.transition(&session_id, SessionState::PersistingMemory);
        if !facts.is_empty() {
            if let Err(e) = lock(&self.store).append(&facts, query) {
                tracing::error!(
                    session = %session_id,
                    error = %e,
                    "Failed to persist extracted facts"
                );
            }
        }

        self.transition(&session_id, SessionState::Complete);
        Ok(ResearchSession {
            id: session_id,
            query: query.to_string(),
            answer: outcome.answer,
            sources: outcome.sources,
            extracted_memory: facts,
            timestamp: Utc::now().timestamp_millis(),
        })
    }

    fn snapshot_context(&self) -> String {
        match self.load_memory() {
            Ok(items) => build_context(&items),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read memory, continuing without context");
                String::new()
            }
        }
    }

    fn remember_query(&self, query: &str) {
        let mut recent = lock(&self.recent);
        recent.push_front(query.to_string());
        recent.truncate(RECENT_QUERY_LIMIT);
    }

    fn transition(&self, session_id: &str, next: SessionState) {
        let mut state = lock(&self.state);
        let from = *state;
        tracing::debug!(session = %session_id, %from, to = %next, "Session transition");
        *state = next;
    }
}

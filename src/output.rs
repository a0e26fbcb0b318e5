//! JSON response types and formatting for CLI output.

use serde::Serialize;

use crate::memory_types::MemoryItem;
use crate::session::ResearchSession;

/// Response for a completed research session.
#[derive(Serialize)]
pub struct ResearchResponse<'a> {
    pub status: &'static str,
    pub session: &'a ResearchSession,
    /// Facts stored after this session.
    pub memory_count: usize,
}

/// Response for listing memory.
#[derive(Serialize)]
pub struct MemoryListResponse {
    /// Total stored facts, before any display limit.
    pub count: usize,
    pub capacity: usize,
    pub memories: Vec<MemoryItem>,
}

/// Response for the assembled context.
#[derive(Serialize)]
pub struct ContextResponse {
    pub context: String,
    pub chars: usize,
}

/// Response for clearing memory.
#[derive(Serialize)]
pub struct ClearResponse {
    pub status: String,
}

/// Response for errors.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Print a value as formatted JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

//! astra - A research assistant that remembers what it learns.
//!
//! A query is answered by a retrieval-augmented model call, the answer is
//! distilled into a few durable facts, and those facts are kept in a small
//! capacity-bounded memory that becomes context for later queries.
//! All operations are synchronous (no async/await required).
//!
//! # Example
//!
//! ```no_run
//! use astra::{Config, Database, GeminiClient, MemoryStore, Orchestrator};
//!
//! let config = Config::load().expect("Failed to load config");
//! config.ensure_directories().expect("Failed to create directories");
//!
//! let db = Database::open(&config.database_path).expect("Failed to open database");
//! let orchestrator = Orchestrator::from_config(
//!     GeminiClient::from_config(&config),
//!     MemoryStore::new(db),
//!     &config,
//! );
//!
//! match orchestrator.run_research("Explain Quantum Supremacy") {
//!     Ok(session) => {
//!         println!("{}", session.answer);
//!         for fact in &session.extracted_memory {
//!             println!("learned: {}", fact);
//!         }
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Failure policy
//!
//! Only a failed research call is an error for the caller. A bad extraction
//! response yields no facts, and a corrupt memory payload reads as empty.

pub mod commands;
pub mod config;
pub mod context;
pub mod errors;
pub mod extraction;
pub mod llm;
pub mod memory;
pub mod memory_types;
pub mod output;
pub mod research;
pub mod session;
pub mod slots;
pub mod sqlite;
pub mod telemetry;

// Re-export public API
pub use config::Config;
pub use context::{build_context, MAX_CONTEXT_CHARS};
pub use errors::{Error, Result};
pub use extraction::{FactExtractor, MAX_FACTS};
pub use llm::{GeminiClient, GenerateRequest, GenerateResponse, GenerativeModel, GroundingChunk};
pub use memory::{MemoryStore, MEMORY_SLOT};
pub use memory_types::{MemoryItem, AUTO_EXTRACTED_TAG, MEMORY_CAPACITY};
pub use research::{ResearchInvoker, ResearchOutcome, SearchResult};
pub use session::{Orchestrator, ResearchSession, SessionState};
pub use slots::{InMemorySlots, SlotStore};
pub use sqlite::Database;

//! Command handlers for the astra CLI.

use crate::errors::Error;
use crate::llm::GenerativeModel;
use crate::memory_types::MEMORY_CAPACITY;
use crate::output::*;
use crate::session::Orchestrator;
use crate::slots::SlotStore;
use std::process::ExitCode;

/// Exit code used when a command is refused rather than failed.
const EXIT_REFUSED: u8 = 2;

/// Commands supported by the astra CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Research a question and remember what was learned
    Research {
        /// Question to research
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List remembered facts, newest first
    Memory {
        /// Maximum number of facts to show (default: 20)
        #[arg(short = 'l', long, default_value = "20")]
        limit: usize,
    },
    /// Show the context the next research session would send
    Context,
    /// Forget every remembered fact
    Clear {
        /// Confirm clearing memory
        #[arg(long)]
        yes: bool,
    },
    Version,
}

/// Execute a CLI command.
pub fn execute<M: GenerativeModel, S: SlotStore>(
    command: &Commands,
    orchestrator: &Orchestrator<M, S>,
    json: bool,
) -> Result<ExitCode, Error> {
    match command {
        Commands::Research { query } => handle_research(orchestrator, &query.join(" "), json),
        Commands::Memory { limit } => handle_memory(orchestrator, *limit, json),
        Commands::Context => handle_context(orchestrator, json),
        Commands::Clear { yes } => handle_clear(orchestrator, *yes, json),
        Commands::Version => version(json),
    }
}

fn handle_research<M: GenerativeModel, S: SlotStore>(
    orchestrator: &Orchestrator<M, S>,
    query: &str,
    json: bool,
) -> Result<ExitCode, Error> {
    let session = orchestrator.run_research(query)?;
    let memory_count = match orchestrator.load_memory() {
        Ok(items) => items.len(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not count stored facts after research");
            session.extracted_memory.len()
        }
    };

    if json {
        print_json(&ResearchResponse {
            status: orchestrator.state().as_str(),
            session: &session,
            memory_count,
        });
    } else {
        println!("{}\n", session.answer);
        if !session.sources.is_empty() {
            println!("Sources:");
            for (i, source) in session.sources.iter().enumerate() {
                println!("  [{}] {} - {}", i + 1, source.title, source.link);
            }
            println!();
        }
        if !session.extracted_memory.is_empty() {
            println!("Learned ({} facts in memory):", memory_count);
            for fact in &session.extracted_memory {
                println!("  - {}", fact);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_memory<M: GenerativeModel, S: SlotStore>(
    orchestrator: &Orchestrator<M, S>,
    limit: usize,
    json: bool,
) -> Result<ExitCode, Error> {
    if limit == 0 {
        return Err(Error::InvalidInput("limit must be at least 1".to_string()));
    }

    let memories = orchestrator.load_memory()?;
    let count = memories.len();
    let shown: Vec<_> = memories.into_iter().take(limit).collect();

    if json {
        print_json(&MemoryListResponse {
            count,
            capacity: MEMORY_CAPACITY,
            memories: shown,
        });
    } else {
        println!("{}/{} facts", count, MEMORY_CAPACITY);
        for item in shown {
            let when = chrono::DateTime::from_timestamp_millis(item.timestamp)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| item.timestamp.to_string());
            println!("{}: {}", item.id, item.content);
            println!("    from \"{}\" at {}", item.source, when);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_context<M: GenerativeModel, S: SlotStore>(
    orchestrator: &Orchestrator<M, S>,
    json: bool,
) -> Result<ExitCode, Error> {
    let context = orchestrator.context()?;
    if json {
        let chars = context.chars().count();
        print_json(&ContextResponse { context, chars });
    } else if context.is_empty() {
        println!("(no prior knowledge)");
    } else {
        println!("{}", context);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_clear<M: GenerativeModel, S: SlotStore>(
    orchestrator: &Orchestrator<M, S>,
    yes: bool,
    json: bool,
) -> Result<ExitCode, Error> {
    if !yes {
        if json {
            print_json(&ClearResponse {
                status: "refused".to_string(),
            });
        } else {
            eprintln!("Refusing to clear memory without --yes");
        }
        return Ok(ExitCode::from(EXIT_REFUSED));
    }

    orchestrator.clear_memory()?;
    if json {
        print_json(&ClearResponse {
            status: "cleared".to_string(),
        });
    } else {
        println!("Memory cleared");
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the crate name and version.
pub fn version(json: bool) -> Result<ExitCode, Error> {
    if json {
        print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "name": env!("CARGO_PKG_NAME")
        }));
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }
    Ok(ExitCode::SUCCESS)
}

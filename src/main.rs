use std::path::PathBuf;
use std::process::ExitCode;

use astra::commands::{self, Commands};
use astra::output::{print_json, ErrorResponse};
use astra::{telemetry, Config, Database, Error, GeminiClient, MemoryStore, Orchestrator};
use clap::Parser;

/// astra - A research assistant that remembers what it learns
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (default: <config dir>/astra/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.json, telemetry::level_for(cli.verbose));

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                print_json(&ErrorResponse {
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    if let Commands::Version = cli.command {
        return commands::version(cli.json);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.ensure_directories()?;
    tracing::debug!(?config, "Loaded configuration");

    let db = Database::open(&config.database_path)?;
    let model = GeminiClient::from_config(&config);
    let orchestrator = Orchestrator::from_config(model, MemoryStore::new(db), &config);

    commands::execute(&cli.command, &orchestrator, cli.json)
}

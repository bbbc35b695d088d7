//! Fabula CLI binary.
//!
//! This binary provides command-line access to a story session:
//! - Create, load, and continue stories
//! - Show turns with normalized metrics, or replay them over time
//! - Follow turns pushed over the story socket

use clap::Parser;
use fabula::FabulaConfig;
use fabula::observability::{ObservabilityConfig, init_observability_with_config};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, handle_command};

    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut observability = ObservabilityConfig::new("fabula").with_json_logs(cli.json);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability_with_config(observability)?;

    let config = match &cli.config {
        Some(path) => FabulaConfig::from_file(path)?,
        None => FabulaConfig::load()?,
    };

    if let Err(e) = handle_command(cli.command, &config).await {
        eprintln!("Error: {}", e.kind().message());
        std::process::exit(1);
    }

    Ok(())
}

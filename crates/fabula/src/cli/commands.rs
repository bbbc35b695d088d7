//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use fabula_core::StoryMode;
use std::path::PathBuf;

/// Fabula - collaborative story sessions from the terminal
#[derive(Parser, Debug)]
#[command(name = "fabula")]
#[command(about = "Collaborative story sessions with live metrics and replay", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read configuration from this file instead of the usual locations
    #[arg(long, global = true, env = "FABULA_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a new story, unless one is already active
    Create,

    /// Replace the active story with an existing one
    Load {
        /// Story to load
        story_id: String,
    },

    /// Add to the story and print the new turns
    Continue {
        /// Text to contribute
        text: String,

        /// Number of generated rounds (1-10)
        #[arg(long)]
        rounds: Option<u32>,

        /// Continuation mode: human_ai, ai_only, or human_only
        #[arg(long)]
        mode: Option<StoryMode>,
    },

    /// Print the active story with its normalized metrics
    Show {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Reveal the story one turn at a time
    Replay {
        /// Milliseconds between turns, overriding the configured interval
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Follow turns pushed for the active story
    Listen {
        /// Prompt to send once connected
        #[arg(long)]
        prompt: Option<String>,

        /// Rounds for the prompt
        #[arg(long)]
        rounds: Option<u32>,

        /// Mode for the prompt
        #[arg(long)]
        mode: Option<StoryMode>,
    },

    /// Print the static reference data set
    StaticData,

    /// Print comparison metrics for the active story
    Compare,

    /// Forget the saved session
    Reset,
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

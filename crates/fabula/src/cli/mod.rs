//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the fabula binary.

mod commands;
mod run;

pub use commands::{Cli, Commands, OutputFormat};
pub use run::handle_command;

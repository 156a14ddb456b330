//! CLI commands

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Condense - estimate and compact LLM conversation histories
#[derive(Parser, Debug)]
#[command(name = "condense")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (defaults to ~/.config/condense/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model to evaluate against (e.g., gpt-5.2, gpt-4.1)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Estimate the token count of a history file
    Estimate {
        /// JSON file with a message array or {"messages": [...], "instructions": "..."}
        file: PathBuf,
    },

    /// Show whether a history would be compacted
    Check {
        file: PathBuf,

        /// System instructions (overrides any in the file)
        #[arg(short, long)]
        instructions: Option<String>,
    },

    /// Compact a history through the remote endpoint
    Compact {
        file: PathBuf,

        /// System instructions (overrides any in the file)
        #[arg(short, long)]
        instructions: Option<String>,
    },
}

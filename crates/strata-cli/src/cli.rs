//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// Strata - versioned, transactional schema migrations for DuckDB
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override database path (or ":memory:")
    #[arg(short, long, global = true, env = "STRATA_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations in version order
    Up(UpArgs),

    /// Roll back the most recently applied migration
    Down(DownArgs),

    /// Show current version, applied and pending migrations
    Status(StatusArgs),

    /// List recorded migration attempts, newest first
    History(HistoryArgs),

    /// Create a new migration script pair
    New(NewArgs),
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Proceed even if the schema is marked dirty
    #[arg(long)]
    pub force: bool,

    /// Stop after applying this version
    #[arg(long, value_name = "VERSION")]
    pub to: Option<String>,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Proceed even if the schema is marked dirty
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print status as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Show at most this many entries
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print history as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Migration name, e.g. "add users table"
    pub name: String,

    /// Only create the up script
    #[arg(long)]
    pub no_down: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

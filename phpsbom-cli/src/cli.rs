//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use uuid::Uuid;

/// phpsbom -- SBOM extractor for PHP Composer projects.
///
/// Use `phpsbom <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "phpsbom", version, about, long_about = None)]
pub struct Cli {
    /// Path to the phpsbom.toml configuration file.
    #[arg(short, long, default_value = "phpsbom.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a Composer project directory.
    Analyze(AnalyzeArgs),

    /// Handle an analysis request message.
    Dispatch(DispatchArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Run a one-shot SBOM analysis on a project directory.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Project root (default: current directory).
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Analysis run identifier (default: random).
    #[arg(long)]
    pub analysis_id: Option<Uuid>,

    /// Store the result under `output.results_dir`.
    #[arg(long)]
    pub save: bool,
}

// ---- dispatch ----

/// Decode an analysis request and run it through the plugin dispatcher.
#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Path to the request JSON (`{"analysis_id": ..., "config": {...}}`).
    pub message: PathBuf,
}

// ---- config ----

/// Manage phpsbom configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, analysis, output).
        #[arg(long)]
        section: Option<String>,
    },
}

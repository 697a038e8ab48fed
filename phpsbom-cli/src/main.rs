//! phpsbom -- command-line front end for the Composer SBOM extractor.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod sink;

use clap::Parser;
use colored::Colorize;

use phpsbom_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    // `config` reports load failures itself, so the error is held until a command needs it
    let config = commands::load_effective_config(&cli.config);
    let general = config
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_default();
    init_logging(&general, cli.log_level.as_deref());
    phpsbom_core::metrics::describe_all();
    tracing::debug!(config = %cli.config.display(), "phpsbom starting");

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &config?, &writer),
        Commands::Dispatch(args) => commands::dispatch::execute(args, &config?, &writer),
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer),
    }
}

fn init_logging(general: &GeneralConfig, level: Option<&str>) {
    if let Err(e) = logging::init_tracing(general, level) {
        eprintln!("{} {:#}", "warning:".yellow().bold(), e);
    }
}

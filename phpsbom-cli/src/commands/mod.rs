//! Command handlers -- one module per subcommand

pub mod analyze;
pub mod config;
pub mod dispatch;

use std::path::Path;

use tracing::debug;

use phpsbom_composer::{ComposerSbomAnalyzer, ComposerSbomAnalyzerBuilder, ComposerSbomConfig};
use phpsbom_core::config::PhpSbomConfig;
use phpsbom_core::error::PhpSbomError;

use crate::error::CliError;

/// Load the configuration used by `analyze` and `dispatch`.
///
/// A missing file falls back to defaults with environment overrides applied.
pub fn load_effective_config(path: &Path) -> Result<PhpSbomConfig, PhpSbomError> {
    if path.exists() {
        return PhpSbomConfig::load(path);
    }

    debug!(path = %path.display(), "config file not found, using defaults");
    let mut config = PhpSbomConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Build the composer analyzer from the `[analysis]` section.
pub fn build_analyzer(config: &PhpSbomConfig) -> Result<ComposerSbomAnalyzer, CliError> {
    let analyzer = ComposerSbomAnalyzerBuilder::new()
        .config(ComposerSbomConfig::from_core(&config.analysis))
        .build()?;
    Ok(analyzer)
}

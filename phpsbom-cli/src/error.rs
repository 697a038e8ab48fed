//! CLI-specific error types and exit code mapping

use phpsbom_core::error::{ConfigError, PhpSbomError};

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The analysis ran but produced a failure output.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from phpsbom-core.
    #[error("{0}")]
    Core(#[from] PhpSbomError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                  |
    /// |------|--------------------------|
    /// | 0    | Success                  |
    /// | 1    | General / command error  |
    /// | 2    | Configuration error      |
    /// | 4    | Analysis status failure  |
    /// | 10   | IO error                 |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(PhpSbomError::Config(_)) => 2,
            Self::AnalysisFailed(_) => 4,
            Self::Io(_) | Self::Core(PhpSbomError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) => 1,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Core(PhpSbomError::Config(e))
    }
}

impl From<phpsbom_composer::ComposerSbomError> for CliError {
    fn from(e: phpsbom_composer::ComposerSbomError) -> Self {
        Self::Core(e.into())
    }
}

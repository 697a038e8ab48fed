//! `phpsbom dispatch` command handler

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use phpsbom_composer::{AnalysisRequest, AnalysisSummary, PluginDispatcher};
use phpsbom_core::config::PhpSbomConfig;
use phpsbom_core::types::AnalysisStatus;

use crate::cli::DispatchArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::sink::FileResultSink;

/// Execute the `dispatch` command.
pub fn execute(
    args: DispatchArgs,
    config: &PhpSbomConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let request = read_request(&args.message)?;
    info!(
        message = %args.message.display(),
        analysis_id = %request.analysis_id,
        "dispatching analysis request"
    );

    let sink = Arc::new(FileResultSink::from_config(&config.output));
    let dispatcher = PluginDispatcher::new(super::build_analyzer(config)?, sink);
    let summary = dispatcher.dispatch(&request)?;

    let report = DispatchReport {
        analysis_id: request.analysis_id,
        summary,
    };
    writer.render(&report)?;

    if report.summary.status == AnalysisStatus::Failure {
        return Err(CliError::AnalysisFailed(format!(
            "result stored at {}",
            report.summary.sbom_key
        )));
    }

    Ok(())
}

/// Decode a request message file.
pub fn read_request(path: &Path) -> Result<AnalysisRequest, CliError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::Command(format!(
            "invalid analysis request {}: {}",
            path.display(),
            e
        ))
    })
}

/// Dispatch result for rendering.
#[derive(Serialize)]
pub struct DispatchReport {
    pub analysis_id: Uuid,
    #[serde(flatten)]
    pub summary: AnalysisSummary,
}

impl Render for DispatchReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Dispatch: {}", self.analysis_id.to_string().bold())?;
        let status = match self.summary.status {
            AnalysisStatus::Success => "SUCCESS".green().bold(),
            AnalysisStatus::Failure => "FAILURE".red().bold(),
        };
        writeln!(w, "  Status:    {}", status)?;
        if !self.summary.framework.is_empty() {
            writeln!(w, "  Framework: {}", self.summary.framework)?;
        }
        writeln!(w, "  Packages:  {}", self.summary.package_count)?;
        writeln!(w, "  Result:    {}", self.summary.sbom_key)?;
        Ok(())
    }
}

//! `phpsbom analyze` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use phpsbom_core::config::PhpSbomConfig;
use phpsbom_core::pipeline::ResultSink;
use phpsbom_core::types::Output;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};
use crate::sink::FileResultSink;

/// Execute the `analyze` command.
///
/// # Errors
///
/// `CliError::AnalysisFailed` when the output status is failure. The output is
/// rendered (and saved with `--save`) before the error is returned.
pub fn execute(
    args: AnalyzeArgs,
    config: &PhpSbomConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let analyzer = super::build_analyzer(config)?;
    let analysis_id = args.analysis_id.unwrap_or_else(Uuid::new_v4);

    info!(path = %args.path.display(), %analysis_id, "starting analysis");
    let output = analyzer.analyze(&args.path, analysis_id);

    let saved_to = if args.save {
        let sink = FileResultSink::from_config(&config.output);
        Some(sink.store(analysis_id, &output)?)
    } else {
        None
    };

    let report = AnalysisReport {
        analysis_id,
        saved_to,
        output,
    };
    writer.render(&report)?;

    if !report.output.is_success() {
        let reason = report
            .output
            .analysis_info
            .errors
            .first()
            .map(|e| e.private.description.clone())
            .unwrap_or_else(|| "unknown error".to_owned());
        return Err(CliError::AnalysisFailed(reason));
    }

    Ok(())
}

/// Analysis result for rendering.
///
/// JSON output is exactly the SBOM `Output`.
#[derive(Serialize)]
pub struct AnalysisReport {
    #[serde(skip)]
    pub analysis_id: Uuid,
    #[serde(skip)]
    pub saved_to: Option<String>,
    #[serde(flatten)]
    pub output: Output,
}

impl Render for AnalysisReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let info = &self.output.analysis_info;
        let stats = &info.extra.statistics;

        writeln!(w, "Analysis: {}", self.analysis_id.to_string().bold())?;
        let status = if self.output.is_success() {
            "SUCCESS".green().bold()
        } else {
            "FAILURE".red().bold()
        };
        writeln!(w, "  Status:     {}", status)?;

        if self.output.is_success() {
            writeln!(w, "  Project:    {}", info.project_name)?;
            writeln!(w, "  Directory:  {}", info.working_directory)?;
            writeln!(w, "  Framework:  {}", info.extra.framework)?;
            if !info.extra.php_version.is_empty() {
                writeln!(w, "  PHP:        {}", info.extra.php_version)?;
            }
            writeln!(w, "  Workspaces: {}", self.output.workspaces.len())?;
            writeln!(
                w,
                "  Packages:   {} (direct {}, transitive {}, dev {})",
                self.output.package_count(),
                stats.direct_packages,
                stats.transitive_packages,
                stats.dev_packages
            )?;
        }

        if !info.errors.is_empty() {
            writeln!(w)?;
            writeln!(w, "Errors:")?;
            for record in &info.errors {
                writeln!(
                    w,
                    "  [{}] {}",
                    record.private.error_type.yellow(),
                    record.private.description
                )?;
            }
        }

        for (key, workspace) in &self.output.workspaces {
            if workspace.dependencies.is_empty() {
                continue;
            }
            writeln!(w)?;
            writeln!(w, "Workspace {}:", key.bold())?;
            writeln!(
                w,
                "  {:<45} {:<20} {:<6} {:<10}",
                "Package", "Version", "Scope", "Relation"
            )?;
            writeln!(w, "  {}", "-".repeat(84))?;
            for (name, versions) in &workspace.dependencies {
                for (version, entry) in versions {
                    let scope = if entry.dev { "dev" } else { "prod" };
                    let relation = if entry.direct { "direct" } else { "transitive" };
                    let version = if version.is_empty() { "-" } else { version.as_str() };
                    writeln!(
                        w,
                        "  {:<45} {:<20} {:<6} {:<10}",
                        name, version, scope, relation
                    )?;
                }
            }
        }

        if let Some(path) = &self.saved_to {
            writeln!(w)?;
            writeln!(w, "Saved: {}", path)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpsbom_composer::ComposerSbomAnalyzerBuilder;

    fn report_for(dir: &std::path::Path) -> AnalysisReport {
        let analyzer = ComposerSbomAnalyzerBuilder::new()
            .build()
            .expect("default analyzer should build");
        AnalysisReport {
            analysis_id: Uuid::nil(),
            saved_to: None,
            output: analyzer.analyze(dir, Uuid::nil()),
        }
    }

    #[test]
    fn test_analysis_report_text_success() {
        // Given: a manifest-only project
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::write(
            dir.path().join("composer.json"),
            r#"{"name": "acme/app", "require": {"php": "^8.2", "laravel/framework": "^11.0"}}"#,
        )
        .expect("should write manifest");

        // When: rendering the text report
        let mut buffer = Vec::new();
        report_for(dir.path())
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        // Then: summary and package table are present
        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("SUCCESS"));
        assert!(output.contains("acme/app"));
        assert!(output.contains("Laravel"));
        assert!(output.contains("laravel/framework"));
        assert!(output.contains("direct"));
        assert!(!output.contains("Errors:"));
    }

    #[test]
    fn test_analysis_report_text_failure() {
        let mut buffer = Vec::new();
        report_for(std::path::Path::new("/nonexistent/project"))
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("FAILURE"));
        assert!(output.contains("SourceDirectoryMissing"));
        assert!(!output.contains("Workspace"));
    }

    #[test]
    fn test_analysis_report_json_is_plain_output() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        std::fs::write(dir.path().join("composer.json"), "{}").expect("should write manifest");

        let mut report = report_for(dir.path());
        report.saved_to = Some("/tmp/result.json".to_owned());

        let json = serde_json::to_value(&report).expect("JSON serialization should succeed");
        let keys: Vec<_> = json.as_object().expect("object").keys().cloned().collect();
        assert_eq!(keys, vec!["analysis_info".to_owned(), "workspaces".to_owned()]);
    }

    #[test]
    fn test_execute_failure_returns_exit_code_4() {
        let config = PhpSbomConfig::default();
        let writer = OutputWriter::new(crate::cli::OutputFormat::Json);
        let args = AnalyzeArgs {
            path: "/nonexistent/project".into(),
            analysis_id: None,
            save: false,
        };

        let err = execute(args, &config, &writer).expect_err("analysis should fail");
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_execute_save_writes_result() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let project = dir.path().join("app");
        std::fs::create_dir(&project).expect("should create project dir");
        std::fs::write(project.join("composer.json"), "{}").expect("should write manifest");

        let mut config = PhpSbomConfig::default();
        config.output.results_dir = dir.path().join("results").display().to_string();
        let id = Uuid::new_v4();
        let args = AnalyzeArgs {
            path: project,
            analysis_id: Some(id),
            save: true,
        };

        execute(args, &config, &OutputWriter::new(crate::cli::OutputFormat::Json))
            .expect("analysis should succeed");
        assert!(dir.path().join("results").join(format!("{id}.json")).is_file());
    }
}

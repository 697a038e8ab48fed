//! File-backed result sink
//!
//! Stores each output as `<results_dir>/<analysis_id>.json` and returns that path
//! as the result key.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use phpsbom_core::config::OutputConfig;
use phpsbom_core::error::{PhpSbomError, SinkError};
use phpsbom_core::pipeline::ResultSink;
use phpsbom_core::types::Output;

pub struct FileResultSink {
    results_dir: PathBuf,
    pretty: bool,
}

impl FileResultSink {
    pub fn new(results_dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            results_dir: results_dir.into(),
            pretty,
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.results_dir, config.pretty)
    }

    /// Target file for an analysis run.
    pub fn result_path(&self, analysis_id: Uuid) -> PathBuf {
        self.results_dir.join(format!("{analysis_id}.json"))
    }
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> SinkError {
    SinkError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

impl ResultSink for FileResultSink {
    fn store(&self, analysis_id: Uuid, output: &Output) -> Result<String, PhpSbomError> {
        let body = if self.pretty {
            serde_json::to_vec_pretty(output)
        } else {
            serde_json::to_vec(output)
        }
        .map_err(|e| SinkError::Serialize(e.to_string()))?;

        std::fs::create_dir_all(&self.results_dir)
            .map_err(|e| write_error(&self.results_dir, e))?;

        let path = self.result_path(analysis_id);
        std::fs::write(&path, body).map_err(|e| write_error(&path, e))?;

        debug!(path = %path.display(), "wrote analysis result");
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_writes_json_file() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let sink = FileResultSink::new(dir.path().join("results"), false);
        let id = Uuid::new_v4();

        let key = sink.store(id, &Output::default()).expect("store should succeed");

        assert_eq!(key, sink.result_path(id).display().to_string());
        let content = std::fs::read_to_string(&key).expect("result file should exist");
        assert!(!content.contains('\n'), "compact output should be a single line");
        let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");
        assert_eq!(parsed["analysis_info"]["status"], "failure");
    }

    #[test]
    fn test_store_pretty_output() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let sink = FileResultSink::from_config(&OutputConfig {
            results_dir: dir.path().display().to_string(),
            pretty: true,
        });

        let key = sink
            .store(Uuid::nil(), &Output::default())
            .expect("store should succeed");
        assert!(key.ends_with("00000000-0000-0000-0000-000000000000.json"));
        let content = std::fs::read_to_string(&key).expect("result file should exist");
        assert!(content.contains('\n'), "pretty output should be indented");
    }

    #[test]
    fn test_store_reports_unwritable_dir() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").expect("should write blocker file");

        let sink = FileResultSink::new(&blocker, true);
        let result = sink.store(Uuid::nil(), &Output::default());
        assert!(matches!(result, Err(PhpSbomError::Sink(SinkError::Write { .. }))));
    }
}

//! 플러그인 디스패처 -- 분석 요청 메시지를 받아 분석하고 결과를 저장
//!
//! 요청의 `config` 맵에서 `config[plugin_name]["project"]`를 읽어
//! `download_path` 아래의 프로젝트 경로를 만듭니다. 경로가 없으면 분석을 실행하지 않고
//! `ConfigurationMissing` 레코드를 담은 실패 출력을 저장합니다.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use phpsbom_core::error::PhpSbomError;
use phpsbom_core::pipeline::ResultSink;
use phpsbom_core::types::{AnalysisStatus, Output};

use crate::analyzer::{ComposerSbomAnalyzer, failure_output};
use crate::error::ComposerSbomError;

/// 프로젝트 경로를 담는 플러그인 설정 키
const PROJECT_KEY: &str = "project";

/// 분석 요청 메시지
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// 분석 실행 식별자
    pub analysis_id: Uuid,
    /// 플러그인 이름 → 플러그인별 설정
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
}

impl AnalysisRequest {
    /// 지정 플러그인의 프로젝트 경로를 반환합니다. 비어 있으면 `None`.
    pub fn project(&self, plugin_name: &str) -> Option<&str> {
        self.config
            .get(plugin_name)?
            .get(PROJECT_KEY)?
            .as_str()
            .filter(|p| !p.is_empty())
    }
}

/// 디스패치 결과 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// 저장소가 반환한 결과 키
    pub sbom_key: String,
    /// 전체 워크스페이스의 패키지 수
    pub package_count: usize,
    /// 감지된 프레임워크 (실패 시 빈 문자열)
    pub framework: String,
    pub status: AnalysisStatus,
}

impl AnalysisSummary {
    fn from_output(sbom_key: String, output: &Output) -> Self {
        Self {
            sbom_key,
            package_count: output.package_count(),
            framework: output.analysis_info.extra.framework.clone(),
            status: output.analysis_info.status,
        }
    }
}

/// 분석 요청 디스패처
pub struct PluginDispatcher {
    analyzer: ComposerSbomAnalyzer,
    sink: Arc<dyn ResultSink>,
}

impl PluginDispatcher {
    pub fn new(analyzer: ComposerSbomAnalyzer, sink: Arc<dyn ResultSink>) -> Self {
        Self { analyzer, sink }
    }

    /// 요청이 가리키는 프로젝트 디렉토리를 계산합니다.
    pub fn resolve_project(&self, request: &AnalysisRequest) -> Option<PathBuf> {
        let config = self.analyzer.config();
        request
            .project(&config.plugin_name)
            .map(|project| Path::new(&config.download_path).join(project))
    }

    /// 요청을 처리합니다.
    ///
    /// # Errors
    ///
    /// 결과 저장 실패 시 에러를 반환합니다. 분석 실패는 요약의 `status`로 표현됩니다.
    pub fn dispatch(&self, request: &AnalysisRequest) -> Result<AnalysisSummary, PhpSbomError> {
        let analysis_id = request.analysis_id;

        let output = match self.resolve_project(request) {
            Some(root) => {
                info!(%analysis_id, root = %root.display(), "dispatching composer analysis");
                self.analyzer.analyze(&root, analysis_id)
            }
            None => {
                let err = ComposerSbomError::ConfigurationMissing {
                    field: PROJECT_KEY.to_owned(),
                };
                warn!(
                    %analysis_id,
                    plugin = %self.analyzer.config().plugin_name,
                    error = %err,
                    "analysis request has no project path"
                );
                failure_output(Utc::now(), vec![err.to_record()])
            }
        };

        let sbom_key = self.sink.store(analysis_id, &output)?;
        info!(%analysis_id, sbom_key = %sbom_key, status = %output.analysis_info.status, "stored analysis result");

        Ok(AnalysisSummary::from_output(sbom_key, &output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use phpsbom_core::error::SinkError;

    use crate::analyzer::ComposerSbomAnalyzerBuilder;
    use crate::config::ComposerSbomConfigBuilder;

    #[derive(Default)]
    struct MemorySink {
        stored: Mutex<Vec<(Uuid, Output)>>,
    }

    impl ResultSink for MemorySink {
        fn store(&self, analysis_id: Uuid, output: &Output) -> Result<String, PhpSbomError> {
            self.stored
                .lock()
                .map_err(|e| SinkError::Serialize(e.to_string()))?
                .push((analysis_id, output.clone()));
            Ok(format!("mem/{analysis_id}"))
        }
    }

    struct BrokenSink;

    impl ResultSink for BrokenSink {
        fn store(&self, _analysis_id: Uuid, _output: &Output) -> Result<String, PhpSbomError> {
            Err(SinkError::Write {
                path: "/dev/full".to_owned(),
                reason: "no space left".to_owned(),
            }
            .into())
        }
    }

    fn dispatcher(download_path: &Path, sink: Arc<dyn ResultSink>) -> PluginDispatcher {
        let config = ComposerSbomConfigBuilder::new()
            .download_path(download_path.display().to_string())
            .build()
            .unwrap();
        let analyzer = ComposerSbomAnalyzerBuilder::new()
            .config(config)
            .build()
            .unwrap();
        PluginDispatcher::new(analyzer, sink)
    }

    fn request(config: serde_json::Value) -> AnalysisRequest {
        serde_json::from_value(serde_json::json!({
            "analysis_id": "6f1c3c2e-6a43-4a57-9d0a-2a4f0c1e9b11",
            "config": config,
        }))
        .unwrap()
    }

    #[test]
    fn request_project_lookup() {
        let req = request(serde_json::json!({"php-sbom": {"project": "acme"}}));
        assert_eq!(req.project("php-sbom"), Some("acme"));
        assert_eq!(req.project("js-sbom"), None);

        let req = request(serde_json::json!({"php-sbom": {"project": ""}}));
        assert_eq!(req.project("php-sbom"), None);

        let req = request(serde_json::json!({"php-sbom": {"project": 42}}));
        assert_eq!(req.project("php-sbom"), None);
    }

    #[test]
    fn missing_project_stores_failure() {
        let sink = Arc::new(MemorySink::default());
        let dispatcher = dispatcher(Path::new("/tmp"), sink.clone());

        let summary = dispatcher
            .dispatch(&request(serde_json::json!({})))
            .unwrap();

        assert_eq!(summary.status, AnalysisStatus::Failure);
        assert_eq!(summary.package_count, 0);
        assert!(summary.framework.is_empty());

        let stored = sink.stored.lock().unwrap();
        assert_eq!(stored.len(), 1);
        let errors = &stored[0].1.analysis_info.errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].private.error_type, "ConfigurationMissing");
        assert_eq!(
            errors[0].public.description,
            "Project path not provided in analysis configuration"
        );
    }

    #[test]
    fn project_is_joined_onto_download_path() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("acme");
        std::fs::create_dir(&project).unwrap();
        std::fs::write(
            project.join("composer.json"),
            r#"{"name": "acme/site", "require": {"slim/slim": "^4.0"}}"#,
        )
        .unwrap();

        let sink = Arc::new(MemorySink::default());
        let dispatcher = dispatcher(dir.path(), sink.clone());
        let req = request(serde_json::json!({"php-sbom": {"project": "acme"}}));

        assert_eq!(dispatcher.resolve_project(&req), Some(project));

        let summary = dispatcher.dispatch(&req).unwrap();
        assert_eq!(summary.status, AnalysisStatus::Success);
        assert_eq!(summary.framework, "Slim");
        assert_eq!(summary.package_count, 1);
        assert_eq!(summary.sbom_key, format!("mem/{}", req.analysis_id));
    }

    #[test]
    fn sink_failure_is_an_error() {
        let dispatcher = dispatcher(Path::new("/tmp"), Arc::new(BrokenSink));
        let result = dispatcher.dispatch(&request(serde_json::json!({})));
        assert!(matches!(result, Err(PhpSbomError::Sink(_))));
    }
}

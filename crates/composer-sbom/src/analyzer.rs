//! 분석기 -- 탐색, 파싱, 그래프 구성, 출력 조립을 하나로 묶는 오케스트레이터
//!
//! [`ComposerSbomAnalyzer::analyze`]는 어떤 입력에도 잘 구성된 [`Output`]을 반환합니다.
//! 루트 디렉토리가 없거나, manifest가 없거나, 루트 manifest가 깨졌으면
//! `status=failure`, 빈 `workspaces`, 에러 레코드 하나를 담은 출력이 됩니다.
//!
//! # 사용 예시
//!
//! ```no_run
//! use std::path::Path;
//! use phpsbom_composer::ComposerSbomAnalyzerBuilder;
//!
//! let analyzer = ComposerSbomAnalyzerBuilder::new().build().unwrap();
//! let output = analyzer.analyze(Path::new("/srv/app"), uuid::Uuid::new_v4());
//! println!("{} packages", output.package_count());
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use phpsbom_core::diagnostics::{ErrorCollector, ErrorRecord};
use phpsbom_core::metrics as m;
use phpsbom_core::pipeline::{KnowledgeSource, SbomAnalyzer};
use phpsbom_core::types::{
    AnalysisInfo, AnalysisStatus, AnalysisTime, DEFAULT_WORKSPACE_CHARACTER, Extra, Output,
    Paths, Workspaces,
};

use crate::config::ComposerSbomConfig;
use crate::error::ComposerSbomError;
use crate::graph::{build_workspace, compute_statistics};
use crate::locator::{Project, ProjectLocator, relative_path};
use crate::phar::summarize_all;

/// 출력의 `package_manager` 값
pub const PACKAGE_MANAGER: &str = "composer";

/// Composer 생태계 lockfile 버전 표기
const LOCK_FILE_VERSION: u32 = 1;

/// Composer SBOM 분석기
pub struct ComposerSbomAnalyzer {
    config: ComposerSbomConfig,
    locator: ProjectLocator,
    knowledge: Option<Arc<dyn KnowledgeSource>>,
}

impl fmt::Debug for ComposerSbomAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposerSbomAnalyzer")
            .field("config", &self.config)
            .field("knowledge", &self.knowledge.as_ref().map(|k| k.name().to_owned()))
            .finish()
    }
}

impl ComposerSbomAnalyzer {
    /// 현재 설정을 반환합니다.
    pub fn config(&self) -> &ComposerSbomConfig {
        &self.config
    }

    /// 루트 디렉토리를 분석합니다.
    pub fn analyze(&self, root: &Path, analysis_id: Uuid) -> Output {
        let started_at = Utc::now();
        let timer = Instant::now();

        info!(%analysis_id, root = %root.display(), "starting composer sbom analysis");
        if let Some(knowledge) = &self.knowledge {
            debug!(source = knowledge.name(), "knowledge source attached, not consulted");
        }

        let output = match self.locator.locate(root) {
            Ok(project) => assemble(project, started_at),
            Err(e) => {
                info!(%analysis_id, error = %e, kind = e.kind(), "composer sbom analysis failed");
                failure_output(started_at, vec![e.to_record()])
            }
        };

        let result = if output.is_success() {
            "success"
        } else {
            "failure"
        };
        metrics::counter!(m::ANALYSES_TOTAL, m::LABEL_RESULT => result).increment(1);
        metrics::counter!(m::PACKAGES_TOTAL).increment(output.package_count() as u64);
        metrics::counter!(m::WORKSPACES_TOTAL).increment(output.workspaces.len() as u64);
        metrics::histogram!(m::ANALYSIS_DURATION_SECONDS).record(timer.elapsed().as_secs_f64());

        if output.is_success() {
            info!(
                %analysis_id,
                project = %output.analysis_info.project_name,
                packages = output.package_count(),
                workspaces = output.workspaces.len(),
                framework = %output.analysis_info.extra.framework,
                "composer sbom analysis completed"
            );
        }

        output
    }
}

impl SbomAnalyzer for ComposerSbomAnalyzer {
    fn name(&self) -> &str {
        PACKAGE_MANAGER
    }

    fn analyze(&self, root: &Path, analysis_id: Uuid) -> Output {
        ComposerSbomAnalyzer::analyze(self, root, analysis_id)
    }
}

/// 실패 출력을 생성합니다.
///
/// 워크스페이스와 경로는 비어 있고, `extra`에는 구분자만 들어갑니다.
pub fn failure_output(started_at: DateTime<Utc>, errors: Vec<ErrorRecord>) -> Output {
    Output {
        workspaces: BTreeMap::new(),
        analysis_info: AnalysisInfo {
            status: AnalysisStatus::Failure,
            project_name: String::new(),
            working_directory: String::new(),
            package_manager: PACKAGE_MANAGER.to_owned(),
            time: AnalysisTime::between(started_at, Utc::now()),
            errors,
            paths: Paths::default(),
            workspaces: Workspaces::default(),
            extra: Extra::default(),
        },
    }
}

fn assemble(project: Project, started_at: DateTime<Utc>) -> Output {
    let mut errors = ErrorCollector::new();
    if let Some(e) = &project.lockfile_error {
        errors.push(e.to_record());
    }

    let root_workspace = build_workspace(&project.manifest, project.lockfile.as_ref());
    let statistics = compute_statistics(&root_workspace);

    let mut workspaces = BTreeMap::new();
    workspaces.insert(DEFAULT_WORKSPACE_CHARACTER.to_owned(), root_workspace);
    for ws in &project.workspaces {
        debug!(key = %ws.key, name = %ws.name, "building secondary workspace");
        workspaces.insert(
            ws.key.clone(),
            build_workspace(&ws.manifest, ws.lockfile.as_ref()),
        );
    }

    let display = |p: &Path| p.display().to_string();
    let paths = Paths {
        lockfile: project.lockfile_path.as_deref().map(display).unwrap_or_default(),
        package_file: display(&project.manifest_path),
        workspace_package_files: project
            .workspaces
            .iter()
            .map(|ws| (ws.key.clone(), display(&ws.manifest_path)))
            .collect(),
        relative_lockfile: project
            .lockfile_path
            .as_deref()
            .map(|lock| relative_path(&project.root_dir, lock))
            .unwrap_or_default(),
        relative_package_file: relative_path(&project.root_dir, &project.manifest_path),
    };

    let mut extra = Extra {
        lock_file_version: LOCK_FILE_VERSION,
        php_version: project.manifest.php_constraint().to_owned(),
        framework: project.framework.to_owned(),
        statistics,
        phar_files: summarize_all(&project.phar_files),
        has_vendor_directory: project.has_vendor_directory,
        ..Extra::default()
    };
    if let Some(lock) = &project.lockfile {
        extra.minimum_stability = lock.minimum_stability.clone();
        extra.prefer_stable = lock.prefer_stable;
        extra.plugin_api_version = lock.plugin_api_version.clone();
        extra.content_hash = lock.content_hash.clone();
        extra.platform = lock.platform.clone();
    }

    Output {
        workspaces,
        analysis_info: AnalysisInfo {
            status: AnalysisStatus::Success,
            project_name: project.manifest.project_name().to_owned(),
            working_directory: display(project.manifest_dir()),
            package_manager: PACKAGE_MANAGER.to_owned(),
            time: AnalysisTime::between(started_at, Utc::now()),
            errors: errors.into_records(),
            paths,
            workspaces: Workspaces {
                workspaces_used: project.is_monorepo,
                ..Workspaces::default()
            },
            extra,
        },
    }
}

/// [`ComposerSbomAnalyzer`] 빌더
#[derive(Default)]
pub struct ComposerSbomAnalyzerBuilder {
    config: ComposerSbomConfig,
    knowledge: Option<Arc<dyn KnowledgeSource>>,
}

impl ComposerSbomAnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 분석기 설정을 지정합니다.
    pub fn config(mut self, config: ComposerSbomConfig) -> Self {
        self.config = config;
        self
    }

    /// 외부 지식 소스 핸들을 붙입니다 (보관만 하고 조회하지 않음).
    pub fn knowledge_source(mut self, source: Arc<dyn KnowledgeSource>) -> Self {
        self.knowledge = Some(source);
        self
    }

    /// 분석기를 빌드합니다.
    ///
    /// # Errors
    ///
    /// 설정 검증 실패 시 `ComposerSbomError::Config`
    pub fn build(self) -> Result<ComposerSbomAnalyzer, ComposerSbomError> {
        self.config.validate()?;
        Ok(ComposerSbomAnalyzer {
            locator: ProjectLocator::new(&self.config),
            config: self.config,
            knowledge: self.knowledge,
        })
    }
}

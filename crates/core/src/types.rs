//! 도메인 타입 -- 생태계 공통 SBOM 출력 스키마
//!
//! 다른 생태계의 SBOM 생성기(JavaScript)와 필드명, 구분자, 워크스페이스 규칙이
//! 동일해야 하는 출력 구조를 정의합니다. PHP 고유 정보는 `Versions`의 부가 필드와
//! [`Extra`]에만 담습니다.
//!
//! # JSON 최상위 구조
//!
//! ```text
//! {
//!   "workspaces":    { ".": { "dependencies": {...}, "start": {...} }, ... },
//!   "analysis_info": { "status": "success", "time": {...}, "extra": {...}, ... }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::diagnostics::ErrorRecord;

/// 기본(루트) 워크스페이스 키
pub const DEFAULT_WORKSPACE_CHARACTER: &str = ".";
/// 자체 관리 워크스페이스 이름
pub const SELF_MANAGED_WORKSPACE_CHARACTER: &str = "self-managed";
/// `name@version` 복합 키 구분자
pub const VERSION_SEPARATOR: &str = "@";
/// import 경로 구분자
pub const IMPORT_PATH_SEPARATOR: &str = "/";

/// 패키지 이름 → 버전 문자열 → 버전 레코드
pub type DependencyMap = BTreeMap<String, BTreeMap<String, Versions>>;

/// 분석 결과 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    /// 분석 성공
    Success,
    /// 분석 실패 (워크스페이스 비어 있음)
    #[default]
    Failure,
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// SBOM 분석 결과 전체
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Output {
    /// 워크스페이스 키 → 워크스페이스
    #[serde(rename = "workspaces")]
    pub workspaces: BTreeMap<String, WorkSpace>,
    /// 분석 메타데이터
    pub analysis_info: AnalysisInfo,
}

impl Output {
    /// 분석이 성공했는지 반환합니다.
    pub fn is_success(&self) -> bool {
        self.analysis_info.status == AnalysisStatus::Success
    }

    /// 모든 워크스페이스의 의존성 패키지 수 합계를 반환합니다.
    pub fn package_count(&self) -> usize {
        self.workspaces.values().map(|ws| ws.dependencies.len()).sum()
    }

    /// 기본 워크스페이스(`.`)를 반환합니다.
    pub fn default_workspace(&self) -> Option<&WorkSpace> {
        self.workspaces.get(DEFAULT_WORKSPACE_CHARACTER)
    }
}

/// 단일 워크스페이스의 의존성 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkSpace {
    /// 해석된 전체 의존성
    pub dependencies: DependencyMap,
    /// manifest에 직접 선언된 의존성
    pub start: Start,
}

/// 버전 레코드
///
/// `dev`/`prod`, `direct`/`transitive` 쌍은 항상 정확히 하나만 참입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Versions {
    /// `name@version`
    pub key: String,
    pub requires: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, String>,
    pub optional: bool,
    pub bundled: bool,
    pub dev: bool,
    pub prod: bool,
    pub direct: bool,
    pub transitive: bool,
    pub licenses: Vec<String>,
    // --- PHP 고유 필드 ---
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub php_version: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub package_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Versions {
    /// `name@version` 복합 키를 생성합니다.
    pub fn make_key(name: &str, version: &str) -> String {
        format!("{name}{VERSION_SEPARATOR}{version}")
    }
}

/// 직접 의존성 목록
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Start {
    pub dependencies: Vec<WorkSpaceDependency>,
    pub dev_dependencies: Vec<WorkSpaceDependency>,
}

/// 직접 의존성 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSpaceDependency {
    pub name: String,
    /// 해석된 버전 (lockfile이 없으면 빈 문자열)
    pub version: String,
    /// manifest에 선언된 제약 조건
    pub constraint: String,
}

/// 패키지 작성자
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
}

/// 분석 메타데이터
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInfo {
    pub status: AnalysisStatus,
    pub project_name: String,
    pub working_directory: String,
    pub package_manager: String,
    pub time: AnalysisTime,
    pub errors: Vec<ErrorRecord>,
    pub paths: Paths,
    pub workspaces: Workspaces,
    pub extra: Extra,
}

/// 분석 시간 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisTime {
    /// RFC 3339 시작 시각
    pub analysis_start_time: String,
    /// RFC 3339 종료 시각
    pub analysis_end_time: String,
    /// 경과 시간 (초)
    pub analysis_delta_time: f64,
}

impl AnalysisTime {
    /// 시작/종료 시각으로 시간 정보를 생성합니다.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let delta = end
            .signed_duration_since(start)
            .num_nanoseconds()
            .unwrap_or(i64::MAX) as f64
            / 1e9;

        Self {
            analysis_start_time: start.to_rfc3339_opts(SecondsFormat::Secs, true),
            analysis_end_time: end.to_rfc3339_opts(SecondsFormat::Secs, true),
            analysis_delta_time: delta.max(0.0),
        }
    }
}

/// 파일 경로 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paths {
    #[serde(rename = "lock_file_path")]
    pub lockfile: String,
    #[serde(rename = "package_file_path")]
    pub package_file: String,
    /// 워크스페이스 키 → manifest 경로
    #[serde(rename = "work_space_package_file_paths")]
    pub workspace_package_files: BTreeMap<String, String>,
    #[serde(rename = "relative_lock_file_path")]
    pub relative_lockfile: String,
    #[serde(rename = "relative_package_file_path")]
    pub relative_package_file: String,
}

/// 워크스페이스 명명 규칙
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspaces {
    pub default_workspace_name: String,
    pub self_managed_workspace_name: String,
    #[serde(rename = "work_spaces_used")]
    pub workspaces_used: bool,
}

impl Default for Workspaces {
    fn default() -> Self {
        Self {
            default_workspace_name: DEFAULT_WORKSPACE_CHARACTER.to_owned(),
            self_managed_workspace_name: SELF_MANAGED_WORKSPACE_CHARACTER.to_owned(),
            workspaces_used: false,
        }
    }
}

/// 생태계 고유 부가 정보
///
/// 필드명의 `seperator` 철자는 형제 생성기와의 호환을 위해 유지합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    pub version_seperator: String,
    pub import_path_seperator: String,
    pub lock_file_version: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub php_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub framework: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub minimum_stability: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prefer_stable: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plugin_api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_hash: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub platform: BTreeMap<String, String>,
    #[serde(default)]
    pub statistics: Statistics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phar_files: Vec<PharInfo>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_vendor_directory: bool,
}

impl Default for Extra {
    fn default() -> Self {
        Self {
            version_seperator: VERSION_SEPARATOR.to_owned(),
            import_path_seperator: IMPORT_PATH_SEPARATOR.to_owned(),
            lock_file_version: 0,
            php_version: String::new(),
            framework: String::new(),
            minimum_stability: String::new(),
            prefer_stable: false,
            plugin_api_version: String::new(),
            content_hash: String::new(),
            platform: BTreeMap::new(),
            statistics: Statistics::default(),
            phar_files: Vec::new(),
            has_vendor_directory: false,
        }
    }
}

/// PHAR 아카이브 요약 (파일 메타데이터만)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PharInfo {
    pub path: String,
    pub name: String,
    pub size: u64,
    pub modified: String,
    pub signature: String,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub main_script: String,
    pub is_executable: bool,
}

/// 의존성 통계
///
/// `vulnerable_packages`, `outdated_packages`는 예약 필드로 항상 0입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_packages: usize,
    pub direct_packages: usize,
    pub transitive_packages: usize,
    pub dev_packages: usize,
    pub unique_authors: usize,
    pub unique_licenses: usize,
    pub license_breakdown: BTreeMap<String, usize>,
    pub type_breakdown: BTreeMap<String, usize>,
    pub vulnerable_packages: usize,
    pub outdated_packages: usize,
}

//! 에러 타입 -- 도메인별 에러 정의

/// phpsbom 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum PhpSbomError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 분석 파이프라인 에러
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// 결과 저장 에러
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 필수 설정 값 누락
    #[error("missing config value: {field}")]
    Missing { field: String },
}

/// 분석 파이프라인 에러
///
/// 생태계별 분석기의 도메인 에러가 변환되어 들어옵니다.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// 프로젝트 탐색 실패 (디렉토리 없음, manifest 없음)
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// manifest / lockfile 파싱 실패
    #[error("parse failed: {0}")]
    ParseFailed(String),
}

/// 결과 저장 에러
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// 직렬화 실패
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// 저장소 쓰기 실패
    #[error("write failed: {path}: {reason}")]
    Write { path: String, reason: String },
}

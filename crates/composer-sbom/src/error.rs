//! Composer SBOM 분석기 에러 타입
//!
//! [`ComposerSbomError`]는 분석기 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! 분석 자체는 실패하지 않으므로 대부분의 에러는 [`ComposerSbomError::to_record`]를 거쳐
//! 출력의 `analysis_info.errors`에 기록됩니다.
//! `From<ComposerSbomError> for PhpSbomError` 구현으로 `?` 전파도 가능합니다.
//!
//! # 에러 카테고리
//!
//! - **프로젝트 탐색**: `SourceDirectoryMissing`, `NoManifestFound`
//! - **파일 파싱**: `MalformedManifest`, `MalformedLockfile`
//! - **호출자 설정**: `ConfigurationMissing`, `Config`
//! - **파일 I/O**: `Io`, `FileTooBig`

use phpsbom_core::diagnostics::{ErrorRecord, ErrorType};
use phpsbom_core::error::{AnalysisError, ConfigError, PhpSbomError};

/// Composer SBOM 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ComposerSbomError {
    /// 분석 대상 디렉토리가 없음
    #[error("source directory does not exist: {path}")]
    SourceDirectoryMissing {
        /// 요청된 루트 경로
        path: String,
    },

    /// 가지치기 후 composer.json이 하나도 없음
    #[error("no composer.json found under {path}")]
    NoManifestFound {
        /// 탐색 루트 경로
        path: String,
    },

    /// composer.json 읽기/디코딩 실패
    #[error("malformed manifest: {path}: {reason}")]
    MalformedManifest {
        /// manifest 경로
        path: String,
        /// 원인 (I/O 또는 JSON 구문 에러)
        reason: String,
    },

    /// composer.lock 읽기/디코딩 실패
    #[error("malformed lockfile: {path}: {reason}")]
    MalformedLockfile {
        /// lockfile 경로
        path: String,
        /// 원인 (I/O 또는 JSON 구문 에러)
        reason: String,
    },

    /// 분석 요청에 필수 설정이 없음
    #[error("configuration missing: {field}")]
    ConfigurationMissing {
        /// 누락된 설정 키
        field: String,
    },

    /// 분석기 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },

    /// 파일 크기 초과
    #[error("file too large: {path}: {size} bytes (max: {max})")]
    FileTooBig {
        /// 파일 경로
        path: String,
        /// 실제 파일 크기 (바이트)
        size: u64,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },
}

impl ComposerSbomError {
    /// 출력 레코드의 `private.type`에 쓰이는 에러 종류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceDirectoryMissing { .. } => "SourceDirectoryMissing",
            Self::NoManifestFound { .. } => "NoManifestFound",
            Self::MalformedManifest { .. } => "MalformedManifest",
            Self::MalformedLockfile { .. } => "MalformedLockfile",
            Self::ConfigurationMissing { .. } => "ConfigurationMissing",
            Self::Config { .. } => "ConfigurationInvalid",
            Self::Io { .. } => "IoError",
            Self::FileTooBig { .. } => "FileTooBig",
        }
    }

    fn public_type(&self) -> ErrorType {
        match self {
            Self::NoManifestFound { .. } => ErrorType::UnsupportedLanguageRequested,
            _ => ErrorType::GenericError,
        }
    }

    fn public_description(&self) -> &'static str {
        match self {
            Self::SourceDirectoryMissing { .. } => "Source directory not found",
            Self::NoManifestFound { .. } => "No PHP project found in the source directory",
            Self::MalformedManifest { .. } => "The root composer.json could not be parsed",
            Self::MalformedLockfile { .. } => "The composer.lock file could not be parsed",
            Self::ConfigurationMissing { .. } => {
                "Project path not provided in analysis configuration"
            }
            Self::Config { .. } => "Invalid analyzer configuration",
            Self::Io { .. } | Self::FileTooBig { .. } => "A project file could not be read",
        }
    }

    /// 출력에 기록할 에러 레코드로 변환합니다.
    ///
    /// `public`에는 사용자용 요약, `private`에는 종류 이름과 상세 메시지가 들어갑니다.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::new(
            self.public_type(),
            self.public_description(),
            self.kind(),
            self.to_string(),
        )
    }
}

impl From<ComposerSbomError> for PhpSbomError {
    fn from(err: ComposerSbomError) -> Self {
        match err {
            ComposerSbomError::SourceDirectoryMissing { .. }
            | ComposerSbomError::NoManifestFound { .. } => {
                PhpSbomError::Analysis(AnalysisError::ProjectNotFound(err.to_string()))
            }
            ComposerSbomError::MalformedManifest { .. }
            | ComposerSbomError::MalformedLockfile { .. } => {
                PhpSbomError::Analysis(AnalysisError::ParseFailed(err.to_string()))
            }
            ComposerSbomError::ConfigurationMissing { field } => {
                PhpSbomError::Config(ConfigError::Missing { field })
            }
            ComposerSbomError::Config { field, reason } => {
                PhpSbomError::Config(ConfigError::InvalidValue { field, reason })
            }
            ComposerSbomError::Io { source, .. } => PhpSbomError::Io(source),
            ComposerSbomError::FileTooBig { .. } => {
                PhpSbomError::Analysis(AnalysisError::ParseFailed(err.to_string()))
            }
        }
    }
}

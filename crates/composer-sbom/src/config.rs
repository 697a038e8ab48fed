//! Composer 분석기 설정
//!
//! [`ComposerSbomConfig`]는 core의 [`AnalysisConfig`]에서 파생되며,
//! 탐색 정책(가지치기 디렉토리, 파일 크기 제한)과 디스패치 정보(플러그인 이름,
//! 다운로드 경로)를 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use phpsbom_composer::{ComposerSbomConfig, ComposerSbomConfigBuilder};
//!
//! let config = ComposerSbomConfig::default();
//! config.validate().unwrap();
//!
//! let config = ComposerSbomConfigBuilder::new()
//!     .scan_phar(false)
//!     .pruned_dirs(vec!["vendor".to_owned(), "node_modules".to_owned(), "var".to_owned()])
//!     .build()
//!     .unwrap();
//! assert!(!config.scan_phar);
//! ```

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use phpsbom_core::config::{AnalysisConfig, MAX_FILE_SIZE_LIMIT};

use crate::error::ComposerSbomError;

/// Composer 분석기 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposerSbomConfig {
    /// 분석 요청 설정 맵에서 읽을 플러그인 섹션 이름
    pub plugin_name: String,
    /// 요청의 `project`가 붙는 기준 디렉토리
    pub download_path: String,
    /// manifest/lockfile 최대 허용 크기 (바이트)
    pub max_file_size: usize,
    /// 탐색 중 내려가지 않는 추가 디렉토리 이름 (`vendor`, `node_modules`는 항상 제외)
    pub pruned_dirs: Vec<String>,
    /// PHAR 아카이브 요약 수집 여부
    pub scan_phar: bool,
}

impl Default for ComposerSbomConfig {
    fn default() -> Self {
        Self::from_core(&AnalysisConfig::default())
    }
}

impl ComposerSbomConfig {
    /// core의 `AnalysisConfig`에서 분석기 설정을 생성합니다.
    pub fn from_core(core: &AnalysisConfig) -> Self {
        Self {
            plugin_name: core.plugin_name.clone(),
            download_path: core.download_path.clone(),
            max_file_size: core.max_file_size,
            pruned_dirs: core.pruned_dirs.clone(),
            scan_phar: core.scan_phar,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), ComposerSbomError> {
        if self.plugin_name.trim().is_empty() {
            return Err(ComposerSbomError::Config {
                field: "plugin_name".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if self.max_file_size == 0 || self.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(ComposerSbomError::Config {
                field: "max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE_LIMIT}"),
            });
        }

        for dir in &self.pruned_dirs {
            let mut components = Path::new(dir).components();
            let single_normal = matches!(
                (components.next(), components.next()),
                (Some(Component::Normal(_)), None)
            );
            if !single_normal {
                return Err(ComposerSbomError::Config {
                    field: "pruned_dirs".to_owned(),
                    reason: format!("'{dir}' must be a single directory name"),
                });
            }
        }

        if Path::new(&self.download_path)
            .components()
            .any(|c| c == Component::ParentDir)
        {
            return Err(ComposerSbomError::Config {
                field: "download_path".to_owned(),
                reason: "download_path contains path traversal pattern '..'".to_owned(),
            });
        }

        Ok(())
    }
}

/// [`ComposerSbomConfig`] 빌더
#[derive(Default)]
pub struct ComposerSbomConfigBuilder {
    config: ComposerSbomConfig,
}

impl ComposerSbomConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plugin_name(mut self, name: impl Into<String>) -> Self {
        self.config.plugin_name = name.into();
        self
    }

    pub fn download_path(mut self, path: impl Into<String>) -> Self {
        self.config.download_path = path.into();
        self
    }

    pub fn max_file_size(mut self, size: usize) -> Self {
        self.config.max_file_size = size;
        self
    }

    pub fn pruned_dirs(mut self, dirs: Vec<String>) -> Self {
        self.config.pruned_dirs = dirs;
        self
    }

    pub fn scan_phar(mut self, enabled: bool) -> Self {
        self.config.scan_phar = enabled;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `ComposerSbomError::Config` 반환
    pub fn build(self) -> Result<ComposerSbomConfig, ComposerSbomError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

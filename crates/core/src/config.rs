//! 설정 관리 -- phpsbom.toml 파싱 및 런타임 설정
//!
//! [`PhpSbomConfig`]는 로깅, 분석, 결과 저장 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`PHPSBOM_ANALYSIS_DOWNLOAD_PATH=/data` 형식, 레거시 `DOWNLOAD_PATH` 포함)
//! 3. 설정 파일 (`phpsbom.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), phpsbom_core::error::PhpSbomError> {
//! use phpsbom_core::config::PhpSbomConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = PhpSbomConfig::load("phpsbom.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = PhpSbomConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, PhpSbomError};

/// 단일 manifest/lockfile 최대 크기 상한 (256MB)
pub const MAX_FILE_SIZE_LIMIT: usize = 256 * 1024 * 1024;

/// 레거시 다운로드 경로 환경변수
pub const LEGACY_DOWNLOAD_PATH_ENV: &str = "DOWNLOAD_PATH";

/// phpsbom 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhpSbomConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분석 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 결과 저장 설정
    #[serde(default)]
    pub output: OutputConfig,
}

impl PhpSbomConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhpSbomError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PhpSbomError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PhpSbomError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                PhpSbomError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, PhpSbomError> {
        toml::from_str(toml_str).map_err(|e| {
            PhpSbomError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `PHPSBOM_{SECTION}_{FIELD}`.
    /// `DOWNLOAD_PATH`는 `PHPSBOM_ANALYSIS_DOWNLOAD_PATH`보다 먼저 적용되므로
    /// 둘 다 있으면 후자가 이깁니다.
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "PHPSBOM_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "PHPSBOM_GENERAL_LOG_FORMAT");

        // Analysis
        override_string(
            &mut self.analysis.plugin_name,
            "PHPSBOM_ANALYSIS_PLUGIN_NAME",
        );
        override_string(&mut self.analysis.download_path, LEGACY_DOWNLOAD_PATH_ENV);
        override_string(
            &mut self.analysis.download_path,
            "PHPSBOM_ANALYSIS_DOWNLOAD_PATH",
        );
        override_usize(
            &mut self.analysis.max_file_size,
            "PHPSBOM_ANALYSIS_MAX_FILE_SIZE",
        );
        override_csv(
            &mut self.analysis.pruned_dirs,
            "PHPSBOM_ANALYSIS_PRUNED_DIRS",
        );
        override_bool(&mut self.analysis.scan_phar, "PHPSBOM_ANALYSIS_SCAN_PHAR");

        // Output
        override_string(&mut self.output.results_dir, "PHPSBOM_OUTPUT_RESULTS_DIR");
        override_bool(&mut self.output.pretty, "PHPSBOM_OUTPUT_PRETTY");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), PhpSbomError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.analysis.plugin_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "analysis.plugin_name".to_owned(),
                reason: "plugin name must not be empty".to_owned(),
            }
            .into());
        }

        if self.analysis.max_file_size == 0 || self.analysis.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "analysis.max_file_size".to_owned(),
                reason: format!("must be between 1 and {MAX_FILE_SIZE_LIMIT}"),
            }
            .into());
        }

        for dir in &self.analysis.pruned_dirs {
            if dir.is_empty() || dir.contains('/') || dir.contains('\\') || dir == ".." {
                return Err(ConfigError::InvalidValue {
                    field: "analysis.pruned_dirs".to_owned(),
                    reason: format!("'{dir}' must be a single directory name"),
                }
                .into());
            }
        }

        reject_parent_traversal("analysis.download_path", &self.analysis.download_path)?;
        reject_parent_traversal("output.results_dir", &self.output.results_dir)?;

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 분석 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 분석 요청의 설정 맵에서 이 플러그인 섹션을 찾을 때 쓰는 이름
    pub plugin_name: String,
    /// 요청의 `project` 상대 경로가 붙는 기준 디렉토리
    pub download_path: String,
    /// manifest/lockfile 최대 크기 (바이트)
    pub max_file_size: usize,
    /// 탐색 시 내려가지 않는 디렉토리 이름 (`vendor`, `node_modules`는 목록과 무관하게 항상 제외)
    pub pruned_dirs: Vec<String>,
    /// PHAR 아카이브 요약 수집 여부
    pub scan_phar: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            plugin_name: "php-sbom".to_owned(),
            download_path: "/private".to_owned(),
            max_file_size: 16 * 1024 * 1024, // 16MB
            pruned_dirs: vec!["vendor".to_owned(), "node_modules".to_owned()],
            scan_phar: true,
        }
    }
}

/// 결과 저장 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 결과 JSON을 저장할 디렉토리
    pub results_dir: String,
    /// 저장 시 pretty-print 여부
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: "./phpsbom-results".to_owned(),
            pretty: true,
        }
    }
}

fn reject_parent_traversal(field: &str, value: &str) -> Result<(), PhpSbomError> {
    if Path::new(value)
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(ConfigError::InvalidValue {
            field: field.to_owned(),
            reason: "path must not contain '..'".to_owned(),
        }
        .into());
    }
    Ok(())
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = PhpSbomConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.analysis.plugin_name, "php-sbom");
        assert_eq!(config.analysis.download_path, "/private");
        assert_eq!(config.analysis.pruned_dirs, vec!["vendor", "node_modules"]);
        assert!(config.analysis.scan_phar);
        assert!(config.output.pretty);
    }

    #[test]
    fn default_config_passes_validation() {
        PhpSbomConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = PhpSbomConfig::parse("").unwrap();
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.analysis.max_file_size, 16 * 1024 * 1024);
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[analysis]
download_path = "/data/downloads"
scan_phar = false
"#;
        let config = PhpSbomConfig::parse(toml).unwrap();
        assert_eq!(config.analysis.download_path, "/data/downloads");
        assert!(!config.analysis.scan_phar);
        // plugin_name은 기본값 유지
        assert_eq!(config.analysis.plugin_name, "php-sbom");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = PhpSbomConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            PhpSbomError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = PhpSbomConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let mut config = PhpSbomConfig::default();
        config.analysis.max_file_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_file_size"));
    }

    #[test]
    fn validate_rejects_empty_plugin_name() {
        let mut config = PhpSbomConfig::default();
        config.analysis.plugin_name = "  ".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_parent_traversal() {
        let mut config = PhpSbomConfig::default();
        config.output.results_dir = "/var/lib/../../etc".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("results_dir"));
    }

    #[test]
    fn validate_rejects_nested_pruned_dir() {
        let mut config = PhpSbomConfig::default();
        config.analysis.pruned_dirs.push("a/b".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pruned_dirs"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: #[serial]로 환경변수 조작 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_PHPSBOM_STR", "overridden") };
        override_string(&mut val, "TEST_PHPSBOM_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_PHPSBOM_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: #[serial]로 환경변수 조작 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_PHPSBOM_BOOL_BAD", "yes-please") };
        override_bool(&mut val, "TEST_PHPSBOM_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_PHPSBOM_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_csv_skips_blanks() {
        let mut val = vec!["vendor".to_owned()];
        // SAFETY: #[serial]로 환경변수 조작 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_PHPSBOM_CSV", "vendor, ,build") };
        override_csv(&mut val, "TEST_PHPSBOM_CSV");
        assert_eq!(val, vec!["vendor", "build"]);
        unsafe { std::env::remove_var("TEST_PHPSBOM_CSV") };
    }

    #[test]
    #[serial]
    fn legacy_download_path_is_overridden_by_prefixed_var() {
        let mut config = PhpSbomConfig::default();
        // SAFETY: #[serial]로 환경변수 조작 테스트를 직렬화합니다.
        unsafe {
            std::env::set_var(LEGACY_DOWNLOAD_PATH_ENV, "/legacy");
            std::env::set_var("PHPSBOM_ANALYSIS_DOWNLOAD_PATH", "/prefixed");
        }
        config.apply_env_overrides();
        assert_eq!(config.analysis.download_path, "/prefixed");

        unsafe { std::env::remove_var("PHPSBOM_ANALYSIS_DOWNLOAD_PATH") };
        let mut config = PhpSbomConfig::default();
        config.apply_env_overrides();
        assert_eq!(config.analysis.download_path, "/legacy");
        unsafe { std::env::remove_var(LEGACY_DOWNLOAD_PATH_ENV) };
    }

    #[test]
    fn from_file_not_found() {
        let err = PhpSbomConfig::from_file("/nonexistent/path/phpsbom.toml").unwrap_err();
        assert!(matches!(
            err,
            PhpSbomError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = PhpSbomConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = PhpSbomConfig::parse(&toml_str).unwrap();
        assert_eq!(config.analysis.pruned_dirs, parsed.analysis.pruned_dirs);
        assert_eq!(config.output.results_dir, parsed.output.results_dir);
    }
}

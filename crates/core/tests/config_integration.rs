//! phpsbom.toml 통합 설정 테스트
//!
//! - phpsbom.toml.example 파싱 테스트
//! - 부분 설정 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 파일 로딩 에러 테스트

use std::io::Write;

use phpsbom_core::config::PhpSbomConfig;
use phpsbom_core::error::{ConfigError, PhpSbomError};

const EXAMPLE: &str = include_str!("../../../phpsbom.toml.example");

// =============================================================================
// phpsbom.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_and_validates() {
    let config = PhpSbomConfig::parse(EXAMPLE).expect("example config should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let example = PhpSbomConfig::parse(EXAMPLE).expect("should parse");
    let defaults = PhpSbomConfig::default();

    assert_eq!(example.general.log_level, defaults.general.log_level);
    assert_eq!(example.general.log_format, defaults.general.log_format);
    assert_eq!(example.analysis.plugin_name, defaults.analysis.plugin_name);
    assert_eq!(example.analysis.download_path, defaults.analysis.download_path);
    assert_eq!(example.analysis.max_file_size, defaults.analysis.max_file_size);
    assert_eq!(example.analysis.pruned_dirs, defaults.analysis.pruned_dirs);
    assert_eq!(example.analysis.scan_phar, defaults.analysis.scan_phar);
    assert_eq!(example.output.results_dir, defaults.output.results_dir);
    assert_eq!(example.output.pretty, defaults.output.pretty);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_output_only() {
    let config = PhpSbomConfig::parse(
        r#"
[output]
results_dir = "/var/lib/phpsbom/results"
pretty = false
"#,
    )
    .expect("should parse");

    assert_eq!(config.output.results_dir, "/var/lib/phpsbom/results");
    assert!(!config.output.pretty);
    assert_eq!(config.analysis.plugin_name, "php-sbom");
    assert_eq!(config.general.log_level, "info");
}

#[test]
fn partial_config_pruned_dirs_replaces_default_list() {
    let config = PhpSbomConfig::parse(
        r#"
[analysis]
pruned_dirs = ["vendor", "node_modules", "storage"]
"#,
    )
    .expect("should parse");

    assert_eq!(
        config.analysis.pruned_dirs,
        vec!["vendor", "node_modules", "storage"]
    );
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let original = std::env::var("PHPSBOM_GENERAL_LOG_LEVEL").ok();

    // SAFETY: serial_test로 환경변수 조작을 직렬화합니다.
    unsafe {
        std::env::set_var("PHPSBOM_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = PhpSbomConfig::parse("[general]\nlog_level = \"debug\"").unwrap();
    config.apply_env_overrides();
    assert_eq!(config.general.log_level, "error");

    unsafe {
        match original {
            Some(val) => std::env::set_var("PHPSBOM_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("PHPSBOM_GENERAL_LOG_LEVEL"),
        }
    }
}

#[test]
#[serial_test::serial]
fn env_override_bool_and_usize_fields() {
    // SAFETY: serial_test로 환경변수 조작을 직렬화합니다.
    unsafe {
        std::env::set_var("PHPSBOM_ANALYSIS_SCAN_PHAR", "false");
        std::env::set_var("PHPSBOM_ANALYSIS_MAX_FILE_SIZE", "1024");
    }

    let mut config = PhpSbomConfig::default();
    config.apply_env_overrides();
    assert!(!config.analysis.scan_phar);
    assert_eq!(config.analysis.max_file_size, 1024);

    unsafe {
        std::env::remove_var("PHPSBOM_ANALYSIS_SCAN_PHAR");
        std::env::remove_var("PHPSBOM_ANALYSIS_MAX_FILE_SIZE");
    }
}

#[test]
#[serial_test::serial]
fn load_applies_env_then_validates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[general]\nlog_level = \"warn\"").unwrap();

    // SAFETY: serial_test로 환경변수 조작을 직렬화합니다.
    unsafe {
        std::env::set_var("PHPSBOM_GENERAL_LOG_FORMAT", "xml");
    }

    let err = PhpSbomConfig::load(file.path()).unwrap_err();
    assert!(err.to_string().contains("log_format"));

    unsafe {
        std::env::remove_var("PHPSBOM_GENERAL_LOG_FORMAT");
    }

    let config = PhpSbomConfig::load(file.path()).expect("should load");
    assert_eq!(config.general.log_level, "warn");
}

// =============================================================================
// 에러 테스트
// =============================================================================

#[test]
fn from_file_with_invalid_toml_is_parse_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[analysis\nplugin_name = ").unwrap();

    let err = PhpSbomConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        PhpSbomError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn from_file_with_invalid_value_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[analysis]\nmax_file_size = 0").unwrap();

    let err = PhpSbomConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        PhpSbomError::Config(ConfigError::InvalidValue { .. })
    ));
}

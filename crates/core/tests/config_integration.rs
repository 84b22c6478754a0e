//! invscan.toml 통합 설정 테스트
//!
//! - invscan.toml.example 파싱 테스트
//! - INVSCAN_CONFIG 기반 로딩 테스트
//! - 환경변수 우선순위 테스트

use std::io::Write;

use invscan_core::config::{CONFIG_PATH_ENV, InvscanConfig};
use invscan_core::error::{ConfigError, InvscanError};
use serial_test::serial;

// =============================================================================
// invscan.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../invscan.toml.example");
    let config = InvscanConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
    assert_eq!(config.engine.vuln_db_path, "/var/lib/invscan/vuln-db");
    assert_eq!(config.engine.max_file_size, 10_485_760);
    assert_eq!(config.engine.skip_dirs, vec!["/proc", "/sys", "/dev"]);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../invscan.toml.example");
    let config = InvscanConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

// =============================================================================
// 파일 / 환경변수 로딩 테스트
// =============================================================================

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write config");
    file
}

#[test]
#[serial]
fn from_env_without_config_path_uses_defaults() {
    // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };
    let config = InvscanConfig::from_env().expect("defaults should load");
    assert_eq!(config.engine.min_severity, "low");
}

#[test]
#[serial]
fn from_env_reads_file_named_by_env_var() {
    let file = write_config("[engine]\nmin_severity = \"high\"\n");
    // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var(CONFIG_PATH_ENV, file.path()) };
    let config = InvscanConfig::from_env().expect("config should load");
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

    assert_eq!(config.engine.min_severity, "high");
}

#[test]
#[serial]
fn from_env_missing_file_is_config_error() {
    // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var(CONFIG_PATH_ENV, "/nonexistent/invscan.toml") };
    let err = InvscanConfig::from_env().unwrap_err();
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };

    assert!(matches!(
        err,
        InvscanError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[test]
#[serial]
fn env_var_overrides_file_value() {
    let file = write_config("[engine]\nvuln_db_path = \"/from/file\"\n");
    // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("INVSCAN_ENGINE_VULN_DB_PATH", "/from/env") };
    let config = InvscanConfig::load(file.path()).expect("config should load");
    unsafe { std::env::remove_var("INVSCAN_ENGINE_VULN_DB_PATH") };

    assert_eq!(config.engine.vuln_db_path, "/from/env");
}

#[test]
#[serial]
fn env_override_is_validated() {
    // SAFETY: serial 테스트이므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::remove_var(CONFIG_PATH_ENV) };
    unsafe { std::env::set_var("INVSCAN_GENERAL_LOG_FORMAT", "xml") };
    let result = InvscanConfig::from_env();
    unsafe { std::env::remove_var("INVSCAN_GENERAL_LOG_FORMAT") };

    let err = result.unwrap_err();
    assert!(err.to_string().contains("log_format"));
}

#[test]
fn invalid_file_content_is_parse_error() {
    let file = write_config("[engine\nbroken");
    let err = InvscanConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(
        err,
        InvscanError::Config(ConfigError::ParseFailed { .. })
    ));
}

//! 설정 관리 -- invscan.toml 파싱 및 런타임 설정
//!
//! [`InvscanConfig`]는 엔진과 FFI 경계가 공유하는 최상위 설정 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`INVSCAN_ENGINE_VULN_DB_PATH=/opt/db` 형식)
//! 2. 설정 파일 (`INVSCAN_CONFIG`가 가리키는 TOML 파일)
//! 3. 기본값 (`Default` 구현)
//!
//! FFI 요청 구조체에는 설정 파일 경로 필드가 없으므로, 호출 측 런타임은
//! 환경변수로만 엔진 기본값을 바꿀 수 있습니다.
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), invscan_core::error::InvscanError> {
//! use invscan_core::config::InvscanConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = InvscanConfig::load("invscan.toml")?;
//!
//! // INVSCAN_CONFIG 환경변수 기준으로 로드 (없으면 기본값)
//! let config = InvscanConfig::from_env()?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = InvscanConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, InvscanError};

/// 설정 파일 경로를 지정하는 환경변수
pub const CONFIG_PATH_ENV: &str = "INVSCAN_CONFIG";

/// 추출 파일 크기 상한 (1 GiB)
const MAX_FILE_SIZE_LIMIT: u64 = 1024 * 1024 * 1024;

/// invscan 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvscanConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 스캔 엔진 설정
    #[serde(default)]
    pub engine: EngineConfig,
}

impl InvscanConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InvscanError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// `INVSCAN_CONFIG` 환경변수가 가리키는 파일에서 설정을 로드합니다.
    ///
    /// 환경변수가 없거나 비어 있으면 기본값에 환경변수 오버라이드만 적용합니다.
    pub fn from_env() -> Result<Self, InvscanError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path.trim()),
            _ => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InvscanError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InvscanError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                InvscanError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, InvscanError> {
        toml::from_str(toml_str).map_err(|e| {
            InvscanError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `INVSCAN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "INVSCAN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "INVSCAN_GENERAL_LOG_FORMAT");

        // Engine
        override_string(&mut self.engine.vuln_db_path, "INVSCAN_ENGINE_VULN_DB_PATH");
        override_string(&mut self.engine.min_severity, "INVSCAN_ENGINE_MIN_SEVERITY");
        override_u64(&mut self.engine.max_file_size, "INVSCAN_ENGINE_MAX_FILE_SIZE");
        override_csv(&mut self.engine.skip_dirs, "INVSCAN_ENGINE_SKIP_DIRS");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), InvscanError> {
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

        let valid_severities = ["info", "low", "medium", "high", "critical"];
        if !valid_severities.contains(&self.engine.min_severity.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "engine.min_severity".to_owned(),
                reason: format!("must be one of: {}", valid_severities.join(", ")),
            }
            .into());
        }

        if self.engine.max_file_size == 0 || self.engine.max_file_size > MAX_FILE_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_file_size".to_owned(),
                reason: format!("must be 1-{MAX_FILE_SIZE_LIMIT}"),
            }
            .into());
        }

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

/// 스캔 엔진 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// 로컬 취약점 DB 디렉토리
    pub vuln_db_path: String,
    /// 결과에 포함할 최소 심각도 (info, low, medium, high, critical)
    pub min_severity: String,
    /// 요청에서 지정하지 않았을 때의 추출 파일 크기 상한 (바이트)
    pub max_file_size: u64,
    /// 파일시스템 순회에서 제외할 디렉토리
    pub skip_dirs: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vuln_db_path: "/var/lib/invscan/vuln-db".to_owned(),
            min_severity: "low".to_owned(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            skip_dirs: vec!["/proc".to_owned(), "/sys".to_owned(), "/dev".to_owned()],
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
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

    #[test]
    fn default_config_has_sane_values() {
        let config = InvscanConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.engine.min_severity, "low");
        assert_eq!(config.engine.max_file_size, 10 * 1024 * 1024);
        assert!(config.engine.skip_dirs.contains(&"/proc".to_owned()));
    }

    #[test]
    fn default_config_passes_validation() {
        InvscanConfig::default().validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = InvscanConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.engine.vuln_db_path, "/var/lib/invscan/vuln-db");
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[engine]
vuln_db_path = "/opt/invscan/db"
"#;
        let config = InvscanConfig::parse(toml).unwrap();
        assert_eq!(config.engine.vuln_db_path, "/opt/invscan/db");
        // 나머지 필드는 기본값 유지
        assert_eq!(config.engine.min_severity, "low");
        assert_eq!(config.general.log_format, "pretty");
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let err = InvscanConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            InvscanError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = InvscanConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_min_severity() {
        let mut config = InvscanConfig::default();
        config.engine.min_severity = "urgent".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_severity"));
    }

    #[test]
    fn validate_rejects_zero_max_file_size() {
        let mut config = InvscanConfig::default();
        config.engine.max_file_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_file_size"));
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 고유한 키를 사용하므로 다른 테스트와 경합하지 않습니다.
        unsafe { std::env::set_var("TEST_INVSCAN_STR", "overridden") };
        override_string(&mut val, "TEST_INVSCAN_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_INVSCAN_STR") };
    }

    #[test]
    fn env_override_u64_invalid_keeps_original() {
        let mut val = 42;
        // SAFETY: 고유한 키를 사용하므로 다른 테스트와 경합하지 않습니다.
        unsafe { std::env::set_var("TEST_INVSCAN_U64_BAD", "lots") };
        override_u64(&mut val, "TEST_INVSCAN_U64_BAD");
        assert_eq!(val, 42);
        unsafe { std::env::remove_var("TEST_INVSCAN_U64_BAD") };
    }

    #[test]
    fn env_override_csv_drops_empty_items() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: 고유한 키를 사용하므로 다른 테스트와 경합하지 않습니다.
        unsafe { std::env::set_var("TEST_INVSCAN_CSV", "/proc, ,/mnt") };
        override_csv(&mut val, "TEST_INVSCAN_CSV");
        assert_eq!(val, vec!["/proc", "/mnt"]);
        unsafe { std::env::remove_var("TEST_INVSCAN_CSV") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_INVSCAN_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = InvscanConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = InvscanConfig::parse(&toml_str).unwrap();
        assert_eq!(config.engine.skip_dirs, parsed.engine.skip_dirs);
        assert_eq!(config.engine.max_file_size, parsed.engine.max_file_size);
    }

    #[test]
    fn from_file_not_found() {
        let err = InvscanConfig::from_file("/nonexistent/path/invscan.toml").unwrap_err();
        assert!(matches!(
            err,
            InvscanError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}

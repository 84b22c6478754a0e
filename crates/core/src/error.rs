//! 에러 타입 -- 도메인별 에러 정의

/// invscan 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum InvscanError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 스캔 엔진 에러
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

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
}

/// 스캔 엔진 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 플러그인 이름 해석 실패
    #[error("plugin resolution failed: {0}")]
    PluginResolution(String),

    /// 파일 추출(lockfile 파싱) 실패
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// 취약점 DB 로딩/파싱 실패
    #[error("vulnerability db error: {0}")]
    VulnDb(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_to_invscan_error() {
        let err: InvscanError = ConfigError::FileNotFound {
            path: "/etc/invscan/invscan.toml".to_owned(),
        }
        .into();
        assert!(matches!(err, InvscanError::Config(_)));
        assert!(err.to_string().contains("/etc/invscan/invscan.toml"));
    }

    #[test]
    fn scan_error_display_keeps_reason() {
        let err: InvscanError = ScanError::PluginResolution("unknown plugin \"x\"".to_owned()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("scan error:"));
        assert!(msg.contains("unknown plugin"));
    }

    #[test]
    fn invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "engine.min_severity".to_owned(),
            reason: "must be one of: info, low".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("engine.min_severity"));
        assert!(msg.contains("must be one of"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: InvscanError = io.into();
        assert!(matches!(err, InvscanError::Io(_)));
    }
}

//! 스캔 엔진 에러 타입
//!
//! [`EngineError`]는 엔진 모듈 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<EngineError> for InvscanError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **플러그인 해석**: `UnknownPlugin`, `InvalidPluginName`
//! - **Lockfile 파싱**: `LockfileParse`
//! - **취약점 DB**: `VulnDbLoad`, `VulnDbParse`
//! - **파일 I/O**: `Io`, `FileTooBig`

use invscan_core::error::{InvscanError, ScanError};

/// 스캔 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// 레지스트리에 없는 플러그인 이름
    #[error("unknown plugin \"{0}\"")]
    UnknownPlugin(String),

    /// 비어 있거나 형식이 잘못된 플러그인 이름
    #[error("invalid plugin name \"{name}\": {reason}")]
    InvalidPluginName {
        /// 요청된 이름 (원문)
        name: String,
        /// 거부 사유
        reason: String,
    },

    /// Lockfile 파싱 실패
    #[error("lockfile parse error: {path}: {reason}")]
    LockfileParse {
        /// 파싱 대상 파일 경로
        path: String,
        /// 파싱 실패 사유
        reason: String,
    },

    /// 취약점 DB 로딩 실패
    #[error("vulnerability db load error: {path}: {reason}")]
    VulnDbLoad {
        /// DB 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 취약점 DB 파싱 실패
    #[error("vulnerability db parse error: {0}")]
    VulnDbParse(String),

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
        max: u64,
    },
}

impl From<EngineError> for InvscanError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::UnknownPlugin(_) | EngineError::InvalidPluginName { .. } => {
                InvscanError::Scan(ScanError::PluginResolution(message))
            }
            EngineError::LockfileParse { .. } | EngineError::FileTooBig { .. } => {
                InvscanError::Scan(ScanError::Extraction(message))
            }
            EngineError::VulnDbLoad { .. } | EngineError::VulnDbParse(_) => {
                InvscanError::Scan(ScanError::VulnDb(message))
            }
            EngineError::Io { source, .. } => InvscanError::Io(source),
        }
    }
}

//! 경계 실패 클래스
//!
//! 각 변형은 C 호출자에게 전달되는 고정 상태 코드를 가집니다.
//!
//! | 클래스 | 코드 |
//! |---|---|
//! | `InvalidArgument` | 1 |
//! | `PluginResolution` | 2 |
//! | `EmptyResult` | 3 |
//! | `Serialization` | 4 |
//! | `ConfigLoad` | 5 |
//! | `Internal` | 6 |

use std::ffi::c_int;

use invscan_core::error::InvscanError;
use invscan_engine::EngineError;

/// 성공 상태 코드
pub const STATUS_OK: c_int = 0;

/// FFI 경계 에러
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    /// 요청 포인터가 null
    #[error("{0}")]
    InvalidArgument(String),

    /// 플러그인 이름 해석 실패
    #[error("failed to load plugins: {0}")]
    PluginResolution(#[source] EngineError),

    /// 엔진이 결과 객체를 만들지 못함
    #[error("scan returned nil result")]
    EmptyResult,

    /// 결과 JSON 인코딩 실패
    #[error("failed to marshal result: {0}")]
    Serialization(#[source] serde_json::Error),

    /// `INVSCAN_CONFIG` 설정 로딩 실패
    #[error("failed to load config: {0}")]
    ConfigLoad(#[source] InvscanError),

    /// 경계 내부에서 잡힌 panic
    #[error("internal error: {0}")]
    Internal(String),
}

impl BoundaryError {
    /// C 호출자에게 전달할 상태 코드
    pub fn status_code(&self) -> c_int {
        match self {
            Self::InvalidArgument(_) => 1,
            Self::PluginResolution(_) => 2,
            Self::EmptyResult => 3,
            Self::Serialization(_) => 4,
            Self::ConfigLoad(_) => 5,
            Self::Internal(_) => 6,
        }
    }

    /// 메트릭 레이블용 이름
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::PluginResolution(_) => "plugin_resolution_failed",
            Self::EmptyResult => "empty_result",
            Self::Serialization(_) => "serialization_failed",
            Self::ConfigLoad(_) => "config_load_failed",
            Self::Internal(_) => "internal_error",
        }
    }

    /// null 요청 에러
    pub fn null_request() -> Self {
        Self::InvalidArgument("config cannot be null".to_owned())
    }
}

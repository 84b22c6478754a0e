//! tracing 구독자 설치
//!
//! 라이브러리는 호스트 프로세스 안에서 실행되므로, 구독자는 프로세스당 한 번만
//! `try_init`으로 설치합니다. 호스트가 이미 구독자를 설치했다면 그대로 둡니다.
//!
//! 필터는 `INVSCAN_LOG` 환경변수가 우선이고, 없으면 `general.log_level`을 씁니다.
//! 출력은 stderr로 보내며 ANSI 색상 코드는 쓰지 않습니다.
//!
//! 경계와 엔진의 진단 로그는 모두 `debug` 레벨입니다. 기본 `info` 필터에서는
//! `verbose` 요청의 "scan requested" 한 줄만 출력됩니다.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use invscan_core::config::GeneralConfig;

/// 로그 필터 환경변수
pub const LOG_FILTER_ENV: &str = "INVSCAN_LOG";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// 구독자 설치를 시도합니다. 두 번째 호출부터는 아무 일도 하지 않습니다.
pub fn init(config: &GeneralConfig) {
    INSTALLED.get_or_init(|| install(config).is_ok());
}

/// 이 라이브러리가 구독자를 직접 설치했는지 여부
///
/// 아직 `init`이 호출되지 않았으면 `None`입니다.
pub fn installed_by_us() -> Option<bool> {
    INSTALLED.get().copied()
}

fn install(config: &GeneralConfig) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let config = GeneralConfig::default();
        init(&config);
        let first = installed_by_us();
        init(&GeneralConfig {
            log_format: "json".to_owned(),
            ..GeneralConfig::default()
        });
        assert!(first.is_some());
        assert_eq!(installed_by_us(), first);
    }
}

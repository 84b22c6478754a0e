#![doc = include_str!("../README.md")]
//!
//! # 모듈 구조
//!
//! - [`abi`]: `#[repr(C)]` 요청/응답 구조체
//! - [`error`]: 실패 클래스와 상태 코드 (`BoundaryError`)
//! - [`marshal`]: 요청 디코딩 (`marshal_request`)
//! - [`response`]: 응답 생성과 해제 (`ResponseBuilder`)
//! - [`logging`]: tracing 구독자 설치
//!
//! # 호출 흐름
//!
//! ```text
//! invscan_scan --> 요청 검증 --> 설정 로드 --> 플러그인 해석 --> ScanConfig
//!                                                                 |
//!              응답 <-- ResponseBuilder <-- ScanOutcome <-- ScanEngine
//! ```
//!
//! 어느 단계든 실패하면 곧바로 실패 응답을 만듭니다. 재시도는 없습니다.
//!
//! # 메모리 소유권
//!
//! 반환되는 응답과 문자열은 Rust 할당자로 할당됩니다.
//! 반드시 [`invscan_free_scan_result`] / [`invscan_free_string`]으로 해제해야 하며
//! C의 `free()`로 해제하면 안 됩니다.

pub mod abi;
pub mod error;
pub mod logging;
pub mod marshal;
pub mod response;

use std::any::Any;
use std::ffi::c_char;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use tracing::debug;

use invscan_core::config::{GeneralConfig, InvscanConfig};
use invscan_core::metrics as m;
use invscan_engine::{ScanConfig, ScanEngine, ScanOutcome, Scanner};

pub use abi::{ABI_VERSION, InvscanScanConfig, InvscanScanResult};
pub use error::BoundaryError;
pub use response::ResponseBuilder;

static METRICS_DESCRIBED: Once = Once::new();

/// 라이브러리 버전 문자열을 반환합니다.
///
/// 호출마다 새 복사본을 반환하며 `invscan_free_string`으로 해제해야 합니다.
#[unsafe(no_mangle)]
pub extern "C" fn invscan_version() -> *mut c_char {
    response::into_c_string(env!("CARGO_PKG_VERSION"))
}

/// 요청/응답 구조체의 레이아웃 버전을 반환합니다.
#[unsafe(no_mangle)]
pub extern "C" fn invscan_abi_version() -> u32 {
    ABI_VERSION
}

/// 요청 구조체로 전체 스캔을 실행합니다.
///
/// 항상 non-null 응답을 반환하며 `invscan_free_scan_result`로 해제해야 합니다.
///
/// # Safety
///
/// `config`는 null이거나 [`InvscanScanConfig`]의 조건을 만족해야 합니다.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn invscan_scan(config: *const InvscanScanConfig) -> *mut InvscanScanResult {
    unsafe {
        run_pipeline(config, |settings, scan_config| {
            Scanner::from_core(&settings.engine).run_scan(scan_config)
        })
    }
}

/// 루트 경로 하나로 스캔합니다. 나머지 필드는 모두 기본값입니다.
///
/// # Safety
///
/// `path`는 null이거나 NUL로 끝나는 유효한 C 문자열이어야 합니다.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn invscan_scan_path(path: *const c_char) -> *mut InvscanScanResult {
    let request = Box::into_raw(Box::new(InvscanScanConfig {
        root_path: path,
        ..InvscanScanConfig::default()
    }));
    let result = unsafe { invscan_scan(request) };
    // SAFETY: 위에서 Box::into_raw로 만든 포인터이며 하위 할당이 없음
    drop(unsafe { Box::from_raw(request) });
    result
}

/// `invscan_version` 등이 반환한 문자열을 해제합니다. null은 무시합니다.
///
/// # Safety
///
/// `s`는 null이거나 이 라이브러리가 반환한 뒤 아직 해제되지 않은 문자열이어야 합니다.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn invscan_free_string(s: *mut c_char) {
    unsafe { response::free_c_string(s) }
}

/// 스캔 응답과 그 문자열들을 해제합니다. null은 무시합니다.
///
/// # Safety
///
/// `result`는 null이거나 이 라이브러리가 반환한 뒤 아직 해제되지 않은 응답이어야 합니다.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn invscan_free_scan_result(result: *mut InvscanScanResult) {
    unsafe { response::free_response(result) }
}

/// 주어진 엔진으로 경계 파이프라인 전체를 실행합니다.
///
/// `invscan_scan`과 같은 검증, 설정 로딩, 응답 규칙을 따릅니다.
///
/// # Safety
///
/// [`invscan_scan`]과 같습니다.
pub unsafe fn scan_with_engine<E: ScanEngine + ?Sized>(
    engine: &E,
    request: *const InvscanScanConfig,
) -> *mut InvscanScanResult {
    unsafe { run_pipeline(request, |_, scan_config| engine.run_scan(scan_config)) }
}

/// 요청 검증부터 응답 생성까지
unsafe fn run_pipeline<F>(request: *const InvscanScanConfig, invoke: F) -> *mut InvscanScanResult
where
    F: FnOnce(&InvscanConfig, &ScanConfig) -> Option<ScanOutcome>,
{
    let builder = ResponseBuilder::allocate();

    let result = panic::catch_unwind(AssertUnwindSafe(|| -> Result<String, BoundaryError> {
        if request.is_null() {
            return Err(BoundaryError::null_request());
        }

        let settings = match InvscanConfig::from_env() {
            Ok(settings) => settings,
            Err(e) => {
                logging::init(&GeneralConfig::default());
                return Err(BoundaryError::ConfigLoad(e));
            }
        };
        logging::init(&settings.general);
        METRICS_DESCRIBED.call_once(m::describe_all);

        let scan_config = unsafe { marshal::marshal_request(request, &settings) }?;
        debug!(plugins = ?scan_config.plugins.names(), "invoking scan engine");

        let outcome = invoke(&settings, &scan_config);
        response::encode(outcome.as_ref())
    }))
    .unwrap_or_else(|payload| Err(BoundaryError::Internal(panic_message(payload.as_ref()))));

    let label = match &result {
        Ok(_) => "success",
        Err(e) => {
            debug!(status_code = e.status_code(), error = %e, "scan request failed");
            e.label()
        }
    };
    metrics::counter!(m::FFI_SCANS_TOTAL, m::LABEL_RESULT => label).increment(1);

    builder.finish(result)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during scan".to_owned()
    }
}

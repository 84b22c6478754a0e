//! 요청 디코딩 -- C 요청 구조체를 엔진 `ScanConfig`로 변환
//!
//! 기본값 치환은 모두 여기서 명시적으로 처리합니다.
//!
//! | 필드 | 기본값 |
//! |---|---|
//! | `root_path` null 또는 빈 문자열 | `/` |
//! | `plugins_count <= 0` | `default` 플러그인 집합 |
//! | `paths_count <= 0` | 제한 없음 |
//! | `max_file_size <= 0` | 설정 파일의 `engine.max_file_size` |
//!
//! 엔진은 호출하지 않으며, 이미 로드된 설정만 읽습니다.

use std::ffi::{CStr, c_char, c_int};
use std::path::PathBuf;

use tracing::info;

use invscan_core::config::InvscanConfig;
use invscan_engine::plugin::filter_by_capabilities;
use invscan_engine::plugin::list::{self, PluginConfig};
use invscan_engine::{Capabilities, Network, ScanConfig};

use crate::abi::InvscanScanConfig;
use crate::error::BoundaryError;

/// 루트 경로가 비어 있을 때 쓰는 기본값
pub const DEFAULT_ROOT: &str = "/";

/// `(base, count)` 배열의 경계 검사된 보기
///
/// 개수가 0 이하이거나 `base`가 null이면 포인터를 읽지 않고 빈 보기가 됩니다.
#[derive(Debug, Clone, Copy)]
pub struct CArrayView<'a> {
    slots: &'a [*const c_char],
}

impl<'a> CArrayView<'a> {
    /// # Safety
    ///
    /// `count > 0`이고 `base`가 null이 아니면, `base`는 `count`개의
    /// 연속된 `*const c_char` 슬롯을 `'a` 동안 읽을 수 있어야 합니다.
    pub unsafe fn new(base: *const *const c_char, count: c_int) -> Self {
        let slots = match usize::try_from(count) {
            Ok(len) if len > 0 && !base.is_null() => {
                // SAFETY: 호출자가 `len`개 슬롯의 유효성을 보장
                unsafe { std::slice::from_raw_parts(base, len) }
            }
            _ => &[],
        };
        Self { slots }
    }

    /// 원소 수
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 모든 원소를 문자열로 디코딩합니다.
    ///
    /// # Safety
    ///
    /// non-null 원소는 모두 NUL로 끝나는 유효한 C 문자열이어야 합니다.
    pub unsafe fn decode(&self) -> Vec<String> {
        self.slots
            .iter()
            .map(|&ptr| unsafe { decode_string(ptr) })
            .collect()
    }
}

/// C 문자열 하나를 디코딩합니다.
///
/// null은 빈 문자열, UTF-8이 아닌 바이트는 대체 문자로 디코딩합니다.
///
/// # Safety
///
/// `ptr`은 null이거나 NUL로 끝나는 유효한 C 문자열이어야 합니다.
pub unsafe fn decode_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: 호출자가 NUL 종료 문자열임을 보장
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// `(base, count)` 문자열 배열을 디코딩합니다.
///
/// # Safety
///
/// [`CArrayView::new`]와 [`CArrayView::decode`]의 조건을 따릅니다.
pub unsafe fn decode_string_array(base: *const *const c_char, count: c_int) -> Vec<String> {
    unsafe { CArrayView::new(base, count).decode() }
}

/// 요청 구조체를 엔진 설정으로 변환합니다.
///
/// # Errors
///
/// - null 요청: [`BoundaryError::InvalidArgument`]
/// - 플러그인 해석 실패: [`BoundaryError::PluginResolution`]
///
/// # Safety
///
/// `request`는 null이거나 [`InvscanScanConfig`]의 조건을 만족하는 구조체를 가리켜야 합니다.
pub unsafe fn marshal_request(
    request: *const InvscanScanConfig,
    config: &InvscanConfig,
) -> Result<ScanConfig, BoundaryError> {
    // SAFETY: null이 아니면 호출자가 유효성을 보장
    let Some(request) = (unsafe { request.as_ref() }) else {
        return Err(BoundaryError::null_request());
    };

    let root = unsafe { decode_string(request.root_path) };
    let root = if root.is_empty() {
        DEFAULT_ROOT.to_owned()
    } else {
        root
    };
    let plugin_names = unsafe { decode_string_array(request.plugins, request.plugins_count) };
    let paths = unsafe { decode_string_array(request.paths_to_extract, request.paths_count) };
    let offline = request.offline != 0;

    if request.verbose != 0 {
        info!(
            root = %root,
            plugins = ?plugin_names,
            paths = ?paths,
            max_file_size = request.max_file_size,
            offline,
            "scan requested"
        );
    }

    let plugins = list::from_names(plugin_names.as_slice(), &PluginConfig::from_core(&config.engine))
        .map_err(BoundaryError::PluginResolution)?;

    let capabilities = Capabilities {
        network: if offline {
            Network::Offline
        } else {
            Network::Online
        },
        direct_fs: true,
        running_system: true,
    };

    Ok(ScanConfig {
        scan_roots: vec![PathBuf::from(root)],
        plugins: filter_by_capabilities(plugins, &capabilities),
        paths_to_extract: paths.into_iter().map(PathBuf::from).collect(),
        max_file_size: u64::try_from(request.max_file_size).ok().filter(|&n| n > 0),
        capabilities,
        ..ScanConfig::from_core(&config.engine)
    })
}

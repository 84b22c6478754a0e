//! C ABI 구조체
//!
//! 필드 순서와 크기는 `include/invscan.h`와 일치해야 하며,
//! 레이아웃이 바뀌면 [`ABI_VERSION`]을 올립니다.

use std::ffi::{c_char, c_int};
use std::ptr;

/// 요청/응답 구조체 레이아웃 버전
pub const ABI_VERSION: u32 = 1;

/// 스캔 요청 (호출자 소유, 읽기 전용)
///
/// # Safety
///
/// - 문자열 포인터는 null이거나 NUL로 끝나는 유효한 C 문자열이어야 합니다.
/// - `plugins_count`/`paths_count`가 양수이면 해당 배열은 그 개수만큼 읽을 수 있어야 합니다.
///   개수가 0 이하이면 배열 포인터는 읽지 않습니다.
/// - 모든 포인터는 호출이 끝날 때까지만 유효하면 됩니다.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct InvscanScanConfig {
    /// 스캔 루트 (null 또는 빈 문자열이면 `/`)
    pub root_path: *const c_char,
    /// 플러그인 이름 배열
    pub plugins: *const *const c_char,
    /// `plugins` 원소 수
    pub plugins_count: c_int,
    /// 추출 대상 경로 배열
    pub paths_to_extract: *const *const c_char,
    /// `paths_to_extract` 원소 수
    pub paths_count: c_int,
    /// 파일 크기 상한 (바이트, 0 이하이면 기본값)
    pub max_file_size: c_int,
    /// 0이 아니면 요청 내용을 info 로그로 남김
    pub verbose: c_int,
    /// 0이 아니면 네트워크 없이 실행
    pub offline: c_int,
}

impl Default for InvscanScanConfig {
    fn default() -> Self {
        Self {
            root_path: ptr::null(),
            plugins: ptr::null(),
            plugins_count: 0,
            paths_to_extract: ptr::null(),
            paths_count: 0,
            max_file_size: 0,
            verbose: 0,
            offline: 0,
        }
    }
}

/// 스캔 응답 (경계가 할당, 호출자 소유)
///
/// `invscan_free_scan_result`로만 해제해야 합니다.
/// 호출이 끝난 응답은 `json_result`와 `error_message` 중 정확히 하나만 non-null이고,
/// `status_code == 0`이면 `json_result`가 non-null입니다.
#[repr(C)]
#[derive(Debug)]
pub struct InvscanScanResult {
    /// 성공 시 들여쓰기된 JSON
    pub json_result: *mut c_char,
    /// 실패 시 에러 메시지
    pub error_message: *mut c_char,
    /// 0은 성공, 그 외는 실패 클래스 코드
    pub status_code: c_int,
}

impl InvscanScanResult {
    pub(crate) fn empty() -> Self {
        Self {
            json_result: ptr::null_mut(),
            error_message: ptr::null_mut(),
            status_code: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    #[test]
    fn request_layout_matches_c_header() {
        let ptr = size_of::<*const c_char>();
        let int = size_of::<c_int>();
        // root_path, plugins, plugins_count(+패딩), paths_to_extract, paths_count, 정수 3개
        let expected_min = 3 * ptr + 5 * int;
        assert!(size_of::<InvscanScanConfig>() >= expected_min);
        assert_eq!(size_of::<InvscanScanConfig>() % align_of::<*const c_char>(), 0);
    }

    #[test]
    fn response_layout_matches_c_header() {
        let ptr = size_of::<*mut c_char>();
        assert_eq!(
            size_of::<InvscanScanResult>(),
            (2 * ptr + size_of::<c_int>()).next_multiple_of(align_of::<*mut c_char>())
        );
    }

    #[test]
    fn header_declares_same_abi_version() {
        let header = include_str!("../../../include/invscan.h");
        assert!(header.contains(&format!("#define INVSCAN_ABI_VERSION {ABI_VERSION}")));
    }

    #[test]
    fn default_request_is_all_null() {
        let req = InvscanScanConfig::default();
        assert!(req.root_path.is_null());
        assert!(req.plugins.is_null());
        assert_eq!(req.plugins_count, 0);
        assert_eq!(req.offline, 0);
    }
}

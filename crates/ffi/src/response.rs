//! 응답 생성과 해제
//!
//! [`ResponseBuilder`]는 다른 작업보다 먼저 빈 응답을 할당하고,
//! 결과에 따라 필드를 채운 뒤 소유권을 호출자에게 넘깁니다.
//! 반환되는 문자열은 모두 새로 할당한 복사본입니다.

use std::ffi::{CString, c_char};
use std::ptr;

use serde::Serialize;

use crate::abi::InvscanScanResult;
use crate::error::{BoundaryError, STATUS_OK};

/// 응답 구조체 빌더
#[derive(Debug)]
pub struct ResponseBuilder {
    response: Box<InvscanScanResult>,
}

impl ResponseBuilder {
    /// 두 문자열이 null이고 상태 코드가 0인 응답을 할당합니다.
    pub fn allocate() -> Self {
        Self {
            response: Box::new(InvscanScanResult::empty()),
        }
    }

    /// 엔진 결과를 JSON으로 인코딩해 응답을 완성합니다.
    ///
    /// `None`이면 `EmptyResult` 실패가 됩니다.
    pub fn build<T: Serialize + ?Sized>(self, outcome: Option<&T>) -> *mut InvscanScanResult {
        self.finish(encode(outcome))
    }

    /// 인코딩된 JSON 또는 실패로 응답을 완성합니다.
    pub fn finish(self, result: Result<String, BoundaryError>) -> *mut InvscanScanResult {
        match result {
            Ok(json) => self.succeed(&json),
            Err(err) => self.fail(&err),
        }
    }

    /// 성공 응답
    pub fn succeed(mut self, json: &str) -> *mut InvscanScanResult {
        self.response.json_result = into_c_string(json);
        self.response.status_code = STATUS_OK;
        Box::into_raw(self.response)
    }

    /// 실패 응답
    pub fn fail(mut self, err: &BoundaryError) -> *mut InvscanScanResult {
        self.response.error_message = into_c_string(&err.to_string());
        self.response.status_code = err.status_code();
        Box::into_raw(self.response)
    }
}

/// 결과를 두 칸 들여쓰기 JSON으로 인코딩합니다.
pub fn encode<T: Serialize + ?Sized>(outcome: Option<&T>) -> Result<String, BoundaryError> {
    let outcome = outcome.ok_or(BoundaryError::EmptyResult)?;
    serde_json::to_string_pretty(outcome).map_err(BoundaryError::Serialization)
}

/// 호출자 소유 C 문자열을 만듭니다.
///
/// C 문자열에 담을 수 없는 내부 NUL 바이트는 제거합니다.
pub fn into_c_string(text: &str) -> *mut c_char {
    let bytes: Vec<u8> = text.bytes().filter(|&b| b != 0).collect();
    CString::new(bytes).unwrap_or_default().into_raw()
}

/// [`into_c_string`]으로 만든 문자열을 해제합니다. null은 무시합니다.
///
/// # Safety
///
/// `ptr`은 null이거나 이 크레이트가 반환한 뒤 아직 해제되지 않은 문자열이어야 합니다.
pub unsafe fn free_c_string(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: 호출자가 `CString::into_raw`로 만든 포인터임을 보장
    drop(unsafe { CString::from_raw(ptr) });
}

/// 응답과 두 문자열을 해제합니다. null은 무시합니다.
///
/// # Safety
///
/// `response`는 null이거나 [`ResponseBuilder`]가 반환한 뒤 아직 해제되지 않은 응답이어야 합니다.
pub unsafe fn free_response(response: *mut InvscanScanResult) {
    if response.is_null() {
        return;
    }
    // SAFETY: 호출자가 `Box::into_raw`로 만든 포인터임을 보장
    let mut response = unsafe { Box::from_raw(response) };
    unsafe {
        free_c_string(response.json_result);
        free_c_string(response.error_message);
    }
    response.json_result = ptr::null_mut();
    response.error_message = ptr::null_mut();
}

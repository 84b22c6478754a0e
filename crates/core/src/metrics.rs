//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 엔진과 FFI 경계는 이 상수로 `metrics::counter!()` 매크로를 호출합니다.
//! 익스포터는 설치하지 않으며, 호스트 프로세스가 레코더를 설치했을 때만 수집됩니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `invscan_`
//! - 모듈명: `engine_`, `ffi_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 심각도 레이블 키 (info, low, medium, high, critical)
pub const LABEL_SEVERITY: &str = "severity";

/// 에코시스템 레이블 키 (cargo, npm, pip)
pub const LABEL_ECOSYSTEM: &str = "ecosystem";

/// 결과 레이블 키 (success 또는 실패 클래스 이름)
pub const LABEL_RESULT: &str = "result";

// ─── Engine 메트릭 ──────────────────────────────────────────────────

/// Engine: 추출된 패키지 수 (counter, label: ecosystem)
pub const ENGINE_PACKAGES_EXTRACTED_TOTAL: &str = "invscan_engine_packages_extracted_total";

/// Engine: 발견된 취약점 수 (counter, label: severity)
pub const ENGINE_FINDINGS_TOTAL: &str = "invscan_engine_findings_total";

/// Engine: 스캔 소요 시간 (histogram, 초)
pub const ENGINE_SCAN_DURATION_SECONDS: &str = "invscan_engine_scan_duration_seconds";

// ─── FFI 메트릭 ─────────────────────────────────────────────────────

/// FFI: 경계 호출 수 (counter, label: result)
pub const FFI_SCANS_TOTAL: &str = "invscan_ffi_scans_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        ENGINE_PACKAGES_EXTRACTED_TOTAL,
        "Packages extracted from lockfiles, per ecosystem"
    );
    describe_counter!(
        ENGINE_FINDINGS_TOTAL,
        "Vulnerability findings reported, per severity"
    );
    describe_histogram!(
        ENGINE_SCAN_DURATION_SECONDS,
        "Wall-clock duration of a full engine scan in seconds"
    );
    describe_counter!(
        FFI_SCANS_TOTAL,
        "Scan calls handled by the C ABI boundary, per result"
    );
}

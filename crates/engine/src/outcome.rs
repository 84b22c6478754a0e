//! 스캔 결과 -- 엔진이 반환하는 네이티브 결과 타입
//!
//! [`ScanOutcome`]은 한 번의 스캔 전체 결과입니다.
//! 모든 필드가 `Serialize`를 구현하므로 FFI 경계는 이 값을 그대로 JSON으로 인코딩합니다.
//!
//! 취약점이 하나도 없는 스캔도 정상 결과(`Succeeded`, 빈 `findings`)입니다.
//! 엔진이 결과 객체 자체를 만들지 못한 경우만 `ScanEngine::run_scan`이 `None`을 반환합니다.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use invscan_core::types::{Severity, Vulnerability};

use crate::plugin::Capabilities;
use crate::types::{Ecosystem, Package};

/// 스캔 또는 플러그인 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// 모든 작업 성공
    Succeeded,
    /// 일부 플러그인이 실패했지만 결과는 유효
    PartiallySucceeded,
    /// 스캔 실패
    Failed,
}

/// 상태와 실패 사유
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStatus {
    /// 상태
    pub status: StatusKind,
    /// 실패 사유 (성공 시 없음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl ScanStatus {
    /// 성공 상태
    pub fn succeeded() -> Self {
        Self {
            status: StatusKind::Succeeded,
            failure_reason: None,
        }
    }

    /// 사유를 가진 실패/부분 성공 상태
    pub fn with_reason(status: StatusKind, reason: impl Into<String>) -> Self {
        Self {
            status,
            failure_reason: Some(reason.into()),
        }
    }
}

/// 플러그인별 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStatus {
    /// 플러그인 이름
    pub name: String,
    /// 플러그인 버전
    pub version: u32,
    /// 실행 상태
    pub status: ScanStatus,
}

/// 취약점 탐지 결과 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// 취약점 정보 (core 타입)
    pub vulnerability: Vulnerability,
    /// 매칭된 패키지 PURL
    pub package_purl: String,
    /// 매칭된 패키지 생태계
    pub ecosystem: Ecosystem,
    /// 매칭된 패키지가 발견된 파일
    pub location: String,
    /// 보고한 탐지기 이름
    pub detector: String,
}

/// 추출된 패키지와 탐지 결과
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// 추출된 패키지 목록 (발견 순서)
    pub packages: Vec<Package>,
    /// 탐지된 취약점 목록
    pub findings: Vec<Finding>,
}

impl Inventory {
    /// 심각도별 취약점 수를 반환합니다.
    pub fn severity_counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for finding in &self.findings {
            match finding.vulnerability.severity {
                Severity::Critical => counts.critical += 1,
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts
    }
}

/// 심각도별 취약점 개수
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    /// 전체 취약점 수를 반환합니다.
    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

/// 스캔 전체 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// 결과를 만든 엔진 버전
    pub version: String,
    /// 스캔 고유 ID (UUID v4)
    pub scan_id: String,
    /// 스캔 시작 시각
    pub start_time: SystemTime,
    /// 스캔 종료 시각
    pub end_time: SystemTime,
    /// 스캔 루트 목록
    pub scan_roots: Vec<String>,
    /// 스캔에 적용된 역량
    pub capabilities: Capabilities,
    /// 전체 상태
    pub status: ScanStatus,
    /// 플러그인별 상태
    pub plugin_status: Vec<PluginStatus>,
    /// 인벤토리
    pub inventory: Inventory,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(severity: Severity) -> Finding {
        Finding {
            vulnerability: Vulnerability {
                cve_id: "CVE-1".to_owned(),
                package: "a".to_owned(),
                affected_version: "1.0".to_owned(),
                fixed_version: None,
                severity,
                description: String::new(),
            },
            package_purl: "pkg:cargo/a@1.0".to_owned(),
            ecosystem: Ecosystem::Cargo,
            location: "Cargo.lock".to_owned(),
            detector: "vulnmatch/localdb".to_owned(),
        }
    }

    #[test]
    fn severity_counts_calculation() {
        let inventory = Inventory {
            packages: vec![],
            findings: vec![finding(Severity::Critical), finding(Severity::High)],
        };

        let counts = inventory.severity_counts();
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.high, 1);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn empty_inventory_has_no_counts() {
        assert_eq!(Inventory::default().severity_counts().total(), 0);
    }

    #[test]
    fn succeeded_status_omits_reason() {
        let json = serde_json::to_value(ScanStatus::succeeded()).unwrap();
        assert_eq!(json["status"], "SUCCEEDED");
        assert!(json.get("failure_reason").is_none());
    }

    #[test]
    fn failed_status_keeps_reason() {
        let status = ScanStatus::with_reason(StatusKind::Failed, "scan root does not exist");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "FAILED");
        assert_eq!(json["failure_reason"], "scan root does not exist");
    }
}

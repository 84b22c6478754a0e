//! 로컬 JSON 취약점 DB 탐지기 (`vulnmatch/localdb`)

use std::path::PathBuf;

use tracing::debug;

use invscan_core::types::{Severity, Vulnerability};

use crate::error::EngineError;
use crate::outcome::{Finding, Inventory};
use crate::plugin::{Capabilities, Detector, Plugin};

use super::db::VulnDb;
use super::version;

/// 인벤토리를 로컬 취약점 DB와 대조하는 탐지기
///
/// DB는 `detect` 호출 시점에 로드합니다. 레지스트리 해석 단계에서는
/// 파일시스템에 접근하지 않습니다.
#[derive(Debug, Clone)]
pub struct LocalDbDetector {
    vuln_db_path: PathBuf,
    min_severity: Severity,
}

impl LocalDbDetector {
    /// 레지스트리 이름
    pub const NAME: &'static str = "vulnmatch/localdb";

    /// 새 탐지기를 생성합니다.
    pub fn new(vuln_db_path: impl Into<PathBuf>, min_severity: Severity) -> Self {
        Self {
            vuln_db_path: vuln_db_path.into(),
            min_severity,
        }
    }

    /// 보고할 최소 심각도
    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    /// 이미 로드된 DB로 인벤토리를 대조합니다.
    pub fn match_inventory(&self, db: &VulnDb, inventory: &Inventory) -> Vec<Finding> {
        let mut findings = Vec::new();

        for package in &inventory.packages {
            for entry in db.lookup(&package.name, package.ecosystem) {
                if !version::is_affected(&package.version, &entry.affected_ranges) {
                    continue;
                }

                if entry.severity < self.min_severity {
                    continue;
                }

                findings.push(Finding {
                    vulnerability: Vulnerability {
                        cve_id: entry.cve_id.clone(),
                        package: package.name.clone(),
                        affected_version: package.version.clone(),
                        fixed_version: entry.fixed_version.clone(),
                        severity: entry.severity,
                        description: entry.description.clone(),
                    },
                    package_purl: package.purl.clone(),
                    ecosystem: package.ecosystem,
                    location: package.location.clone(),
                    detector: Self::NAME.to_owned(),
                });
            }
        }

        findings
    }
}

impl Plugin for LocalDbDetector {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn version(&self) -> u32 {
        1
    }

    fn requirements(&self) -> Capabilities {
        Capabilities {
            direct_fs: true,
            ..Capabilities::default()
        }
    }
}

impl Detector for LocalDbDetector {
    fn detect(&self, inventory: &Inventory) -> Result<Vec<Finding>, EngineError> {
        let db = VulnDb::load_from_dir(&self.vuln_db_path)?;
        debug!(
            path = %self.vuln_db_path.display(),
            entries = db.entry_count(),
            packages = inventory.packages.len(),
            "matching inventory against local vuln db"
        );
        Ok(self.match_inventory(&db, inventory))
    }
}

//! 취약점 데이터베이스 -- 로컬 JSON DB 로딩 및 조회
//!
//! [`VulnDb`]는 로컬 파일시스템의 JSON 파일에서 취약점 데이터를 로드합니다.
//!
//! # DB 디렉토리 구조
//!
//! ```text
//! /var/lib/invscan/vuln-db/
//!   cargo.json     # Cargo 생태계 취약점
//!   npm.json       # NPM 생태계 취약점
//!   pip.json       # PyPI 생태계 취약점
//! ```
//!
//! # JSON 형식
//!
//! ```json
//! [
//!   {
//!     "cve_id": "CVE-2024-1234",
//!     "package": "openssl",
//!     "ecosystem": "Cargo",
//!     "affected_ranges": [{ "introduced": "0.10.0", "fixed": "0.10.55" }],
//!     "fixed_version": "0.10.55",
//!     "severity": "Critical",
//!     "description": "Buffer overflow in...",
//!     "published": "2024-01-15"
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use invscan_core::types::Severity;

use crate::error::EngineError;
use crate::types::Ecosystem;

/// 취약점 DB 파일 최대 크기 (50 MB)
const MAX_VULN_DB_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// 전체 취약점 DB 엔트리 최대 개수
const MAX_VULN_DB_ENTRIES: usize = 1_000_000;

/// 취약점 DB 엔트리
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnDbEntry {
    /// CVE ID (예: CVE-2024-1234)
    pub cve_id: String,
    /// 영향받는 패키지명
    pub package: String,
    /// 패키지 생태계
    pub ecosystem: Ecosystem,
    /// 영향받는 버전 범위
    pub affected_ranges: Vec<VersionRange>,
    /// 수정된 버전 (있을 경우)
    #[serde(default)]
    pub fixed_version: Option<String>,
    /// 심각도
    pub severity: Severity,
    /// 취약점 설명
    #[serde(default)]
    pub description: String,
    /// 공개 일자 (ISO 8601)
    #[serde(default)]
    pub published: String,
}

/// 영향받는 버전 범위
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRange {
    /// 도입 버전 (이 버전부터 영향)
    #[serde(default)]
    pub introduced: Option<String>,
    /// 수정 버전 (None이면 미수정)
    #[serde(default)]
    pub fixed: Option<String>,
}

/// 취약점 데이터베이스
///
/// `(package_name, ecosystem)` 쌍으로 인덱싱되어 조회가 O(1)입니다.
#[derive(Debug, Default)]
pub struct VulnDb {
    entries: Vec<VulnDbEntry>,
    index: HashMap<(String, Ecosystem), Vec<usize>>,
}

impl VulnDb {
    /// 빈 데이터베이스를 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    fn build_index(entries: &[VulnDbEntry]) -> HashMap<(String, Ecosystem), Vec<usize>> {
        let mut index: HashMap<(String, Ecosystem), Vec<usize>> = HashMap::new();
        for (idx, entry) in entries.iter().enumerate() {
            index
                .entry((entry.package.clone(), entry.ecosystem))
                .or_default()
                .push(idx);
        }
        index
    }

    /// 엔트리 목록으로 데이터베이스를 생성합니다.
    pub fn from_entries(entries: Vec<VulnDbEntry>) -> Self {
        let index = Self::build_index(&entries);
        Self { entries, index }
    }

    /// JSON 문자열(`VulnDbEntry` 배열)에서 데이터베이스를 파싱합니다.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let entries: Vec<VulnDbEntry> = serde_json::from_str(json)
            .map_err(|e| EngineError::VulnDbParse(format!("failed to parse vuln db JSON: {e}")))?;
        Ok(Self::from_entries(entries))
    }

    /// 디렉토리에서 모든 생태계의 취약점 DB를 로드합니다.
    ///
    /// 각 파일은 [`Ecosystem::db_file_name`] 이름이어야 하며, 없는 파일은 건너뜁니다.
    /// 디렉토리 자체가 없으면 빈 DB를 반환합니다.
    ///
    /// # 보안 제한
    ///
    /// - 파일당 최대 50MB
    /// - 전체 엔트리 최대 1,000,000개 (초과분은 잘라냄)
    pub fn load_from_dir(dir_path: &Path) -> Result<Self, EngineError> {
        if !dir_path.is_dir() {
            debug!(path = %dir_path.display(), "vuln db directory not found, using empty db");
            return Ok(Self::empty());
        }

        let mut all_entries = Vec::new();

        for ecosystem in Ecosystem::all() {
            let file_path = dir_path.join(ecosystem.db_file_name());

            let metadata = match std::fs::metadata(&file_path) {
                Ok(m) => m,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %file_path.display(), "vuln db file not found, skipping");
                    continue;
                }
                Err(e) => {
                    return Err(EngineError::VulnDbLoad {
                        path: file_path.display().to_string(),
                        reason: e.to_string(),
                    });
                }
            };

            if metadata.len() > MAX_VULN_DB_FILE_SIZE {
                return Err(EngineError::VulnDbLoad {
                    path: file_path.display().to_string(),
                    reason: format!(
                        "file size {} bytes exceeds maximum {} bytes",
                        metadata.len(),
                        MAX_VULN_DB_FILE_SIZE
                    ),
                });
            }

            let content =
                std::fs::read_to_string(&file_path).map_err(|e| EngineError::VulnDbLoad {
                    path: file_path.display().to_string(),
                    reason: e.to_string(),
                })?;

            let entries: Vec<VulnDbEntry> = serde_json::from_str(&content).map_err(|e| {
                EngineError::VulnDbParse(format!("failed to parse {}: {e}", file_path.display()))
            })?;

            if all_entries.len() + entries.len() > MAX_VULN_DB_ENTRIES {
                debug!(
                    current = all_entries.len(),
                    new = entries.len(),
                    max = MAX_VULN_DB_ENTRIES,
                    "vulnerability database entry limit reached, truncating"
                );
                let remaining = MAX_VULN_DB_ENTRIES.saturating_sub(all_entries.len());
                all_entries.extend(entries.into_iter().take(remaining));
                break;
            }

            debug!(
                path = %file_path.display(),
                entries = entries.len(),
                "loaded vuln db file"
            );
            all_entries.extend(entries);
        }

        Ok(Self::from_entries(all_entries))
    }

    /// 전체 엔트리 수
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// 패키지 이름과 생태계로 취약점을 조회합니다.
    pub fn lookup(&self, package: &str, ecosystem: Ecosystem) -> Vec<&VulnDbEntry> {
        self.index
            .get(&(package.to_owned(), ecosystem))
            .map(|indices| indices.iter().filter_map(|&i| self.entries.get(i)).collect())
            .unwrap_or_default()
    }

    /// 전체 엔트리
    pub fn entries(&self) -> &[VulnDbEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARGO_DB: &str = r#"[
        {
            "cve_id": "CVE-2024-0001",
            "package": "smallvec",
            "ecosystem": "Cargo",
            "affected_ranges": [{ "introduced": "1.0.0", "fixed": "1.6.1" }],
            "fixed_version": "1.6.1",
            "severity": "High",
            "description": "buffer overflow in insert_many",
            "published": "2021-01-08"
        }
    ]"#;

    fn entry(cve: &str, package: &str, ecosystem: Ecosystem) -> VulnDbEntry {
        VulnDbEntry {
            cve_id: cve.to_owned(),
            package: package.to_owned(),
            ecosystem,
            affected_ranges: vec![],
            fixed_version: None,
            severity: Severity::Medium,
            description: String::new(),
            published: String::new(),
        }
    }

    #[test]
    fn empty_db_finds_nothing() {
        let db = VulnDb::empty();
        assert_eq!(db.entry_count(), 0);
        assert!(db.lookup("anything", Ecosystem::Cargo).is_empty());
    }

    #[test]
    fn lookup_by_package_and_ecosystem() {
        let db = VulnDb::from_entries(vec![
            entry("CVE-1", "lodash", Ecosystem::Npm),
            entry("CVE-2", "lodash", Ecosystem::Npm),
            entry("CVE-3", "requests", Ecosystem::Pip),
        ]);

        assert_eq!(db.lookup("lodash", Ecosystem::Npm).len(), 2);
        assert_eq!(db.lookup("requests", Ecosystem::Pip)[0].cve_id, "CVE-3");
        assert!(db.lookup("lodash", Ecosystem::Cargo).is_empty());
    }

    #[test]
    fn from_json_valid() {
        let db = VulnDb::from_json(CARGO_DB).unwrap();
        assert_eq!(db.entry_count(), 1);
        assert_eq!(db.entries()[0].fixed_version.as_deref(), Some("1.6.1"));
    }

    #[test]
    fn from_json_optional_fields_default() {
        let json = r#"[{
            "cve_id": "CVE-2024-9",
            "package": "x",
            "ecosystem": "Pip",
            "affected_ranges": [{ "fixed": "2.0" }],
            "severity": "Low"
        }]"#;
        let db = VulnDb::from_json(json).unwrap();
        let e = &db.entries()[0];
        assert!(e.fixed_version.is_none());
        assert!(e.affected_ranges[0].introduced.is_none());
        assert_eq!(e.description, "");
    }

    #[test]
    fn from_json_invalid_is_parse_error() {
        assert!(matches!(
            VulnDb::from_json("not json"),
            Err(EngineError::VulnDbParse(_))
        ));
    }

    #[test]
    fn from_json_invalid_severity() {
        let json = CARGO_DB.replace("\"High\"", "\"Apocalyptic\"");
        assert!(VulnDb::from_json(&json).is_err());
    }

    #[test]
    fn load_from_dir_missing_directory_is_empty() {
        let db = VulnDb::load_from_dir(Path::new("/nonexistent/invscan/vuln-db")).unwrap();
        assert_eq!(db.entry_count(), 0);
    }

    #[test]
    fn load_from_dir_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("cargo.json"), CARGO_DB).unwrap();

        let db = VulnDb::load_from_dir(dir.path()).unwrap();
        assert_eq!(db.entry_count(), 1);
        assert_eq!(db.lookup("smallvec", Ecosystem::Cargo).len(), 1);
    }

    #[test]
    fn load_from_dir_invalid_json_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("npm.json"), "invalid json").unwrap();

        match VulnDb::load_from_dir(dir.path()) {
            Err(EngineError::VulnDbParse(msg)) => assert!(msg.contains("npm.json")),
            other => panic!("expected VulnDbParse error, got {other:?}"),
        }
    }
}

//! package-lock.json 추출기
//!
//! [`NpmLockExtractor`]는 NPM의 package-lock.json (v2/v3) 파일을 파싱합니다.
//!
//! # package-lock.json v3 형식 예시
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "lockfileVersion": 3,
//!   "packages": {
//!     "": { "name": "my-app", "version": "1.0.0" },
//!     "node_modules/lodash": { "version": "4.17.21", "resolved": "...", "integrity": "sha512-..." }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::EngineError;
use crate::plugin::{Capabilities, Extractor, Plugin};
use crate::types::{Ecosystem, Package};

/// package-lock.json 추출기
pub struct NpmLockExtractor;

impl NpmLockExtractor {
    /// 레지스트리 이름
    pub const NAME: &'static str = "javascript/packagelockjson";
}

/// package-lock.json 구조 (파싱용)
///
/// 출력 순서를 고정하기 위해 `BTreeMap`을 사용합니다.
#[derive(Deserialize)]
struct NpmLockFile {
    #[serde(default)]
    packages: BTreeMap<String, NpmPackageEntry>,
}

/// package-lock.json 내 개별 패키지 (파싱용)
#[derive(Deserialize)]
struct NpmPackageEntry {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    integrity: Option<String>,
    #[serde(default)]
    dependencies: Option<BTreeMap<String, String>>,
}

impl Plugin for NpmLockExtractor {
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

impl Extractor for NpmLockExtractor {
    fn file_required(&self, path: &Path) -> bool {
        super::file_name(path).is_some_and(|name| name == "package-lock.json")
    }

    fn extract(&self, content: &str, source_path: &str) -> Result<Vec<Package>, EngineError> {
        let lock_file: NpmLockFile =
            serde_json::from_str(content).map_err(|e| EngineError::LockfileParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let mut packages = Vec::new();

        for (key, entry) in &lock_file.packages {
            // 루트 프로젝트는 키가 빈 문자열
            if key.is_empty() {
                continue;
            }

            let Some(version) = entry.version.clone() else {
                continue; // 버전 없는 항목(링크 등)은 건너뜀
            };

            let name = extract_package_name(key);
            let dependencies = entry
                .dependencies
                .as_ref()
                .map(|d| d.keys().cloned().collect())
                .unwrap_or_default();

            packages.push(Package {
                purl: Package::make_purl(&Ecosystem::Npm, &name, &version),
                name,
                version,
                ecosystem: Ecosystem::Npm,
                // integrity를 checksum으로 사용
                checksum: entry.integrity.clone(),
                dependencies,
                location: source_path.to_owned(),
                extractor: Self::NAME.to_owned(),
            });
        }

        Ok(packages)
    }
}

/// "node_modules/@scope/name" 또는 "node_modules/name" 에서 패키지명 추출
fn extract_package_name(key: &str) -> String {
    // 마지막 "node_modules/" 이후의 부분을 패키지명으로 사용
    match key.rfind("node_modules/") {
        Some(pos) => key[pos + "node_modules/".len()..].to_owned(),
        None => key.to_owned(),
    }
}

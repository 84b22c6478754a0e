//! Cargo.lock 추출기
//!
//! [`CargoLockExtractor`]는 Cargo의 lockfile(v1~v4, TOML)을 파싱합니다.
//!
//! # Cargo.lock 형식 예시
//!
//! ```toml
//! version = 3
//!
//! [[package]]
//! name = "serde"
//! version = "1.0.204"
//! source = "registry+https://github.com/rust-lang/crates.io-index"
//! checksum = "bc76f558e0cbb2a839d37354c575f1dc3fdc6546b5be373ba43d95f231bf7c12"
//! dependencies = ["serde_derive"]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::EngineError;
use crate::plugin::{Capabilities, Extractor, Plugin};
use crate::types::{Ecosystem, Package};

/// Cargo.lock 추출기
pub struct CargoLockExtractor;

impl CargoLockExtractor {
    /// 레지스트리 이름
    pub const NAME: &'static str = "cargo/cargolock";
}

/// Cargo.lock 구조 (파싱용)
#[derive(Deserialize)]
struct CargoLockFile {
    #[serde(default)]
    package: Vec<CargoPackageEntry>,
}

/// Cargo.lock 내 개별 패키지 (파싱용)
#[derive(Deserialize)]
struct CargoPackageEntry {
    name: String,
    version: String,
    #[serde(default)]
    checksum: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
}

impl Plugin for CargoLockExtractor {
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

impl Extractor for CargoLockExtractor {
    fn file_required(&self, path: &Path) -> bool {
        super::file_name(path).is_some_and(|name| name == "Cargo.lock")
    }

    fn extract(&self, content: &str, source_path: &str) -> Result<Vec<Package>, EngineError> {
        let lock_file: CargoLockFile =
            toml::from_str(content).map_err(|e| EngineError::LockfileParse {
                path: source_path.to_owned(),
                reason: e.to_string(),
            })?;

        let packages = lock_file
            .package
            .into_iter()
            .map(|entry| {
                // v1/v2 의존성은 "name version (source)" 형식이므로 이름만 남김
                let dependencies = entry
                    .dependencies
                    .iter()
                    .filter_map(|dep| dep.split_whitespace().next())
                    .map(str::to_owned)
                    .collect();

                Package {
                    purl: Package::make_purl(&Ecosystem::Cargo, &entry.name, &entry.version),
                    name: entry.name,
                    version: entry.version,
                    ecosystem: Ecosystem::Cargo,
                    checksum: entry.checksum,
                    dependencies,
                    location: source_path.to_owned(),
                    extractor: Self::NAME.to_owned(),
                }
            })
            .collect();

        Ok(packages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CARGO_LOCK: &str = r#"
version = 3

[[package]]
name = "app"
version = "0.1.0"
dependencies = ["serde", "tokio 1.38.0 (registry+https://github.com/rust-lang/crates.io-index)"]

[[package]]
name = "serde"
version = "1.0.204"
source = "registry+https://github.com/rust-lang/crates.io-index"
checksum = "abc123"

[[package]]
name = "tokio"
version = "1.38.0"
source = "registry+https://github.com/rust-lang/crates.io-index"
"#;

    #[test]
    fn file_required_matches_cargo_lock_only() {
        let extractor = CargoLockExtractor;
        assert!(extractor.file_required(Path::new("Cargo.lock")));
        assert!(extractor.file_required(Path::new("/project/Cargo.lock")));
        assert!(!extractor.file_required(Path::new("/project/Cargo.toml")));
        assert!(!extractor.file_required(Path::new("")));
    }

    #[test]
    fn extract_sample_cargo_lock() {
        let packages = CargoLockExtractor
            .extract(SAMPLE_CARGO_LOCK, "/project/Cargo.lock")
            .unwrap();

        assert_eq!(packages.len(), 3);

        let serde = packages.iter().find(|p| p.name == "serde").unwrap();
        assert_eq!(serde.version, "1.0.204");
        assert_eq!(serde.purl, "pkg:cargo/serde@1.0.204");
        assert_eq!(serde.checksum.as_deref(), Some("abc123"));
        assert_eq!(serde.location, "/project/Cargo.lock");
        assert_eq!(serde.extractor, "cargo/cargolock");
    }

    #[test]
    fn extract_strips_legacy_dependency_suffix() {
        let packages = CargoLockExtractor
            .extract(SAMPLE_CARGO_LOCK, "Cargo.lock")
            .unwrap();
        let app = packages.iter().find(|p| p.name == "app").unwrap();
        assert_eq!(app.dependencies, vec!["serde", "tokio"]);
    }

    #[test]
    fn extract_empty_lockfile() {
        let packages = CargoLockExtractor.extract("version = 3\n", "Cargo.lock").unwrap();
        assert!(packages.is_empty());
    }

    #[test]
    fn extract_invalid_toml_returns_error() {
        let err = CargoLockExtractor
            .extract("[[package]\nname=", "Cargo.lock")
            .unwrap_err();
        assert!(matches!(err, EngineError::LockfileParse { .. }));
    }
}

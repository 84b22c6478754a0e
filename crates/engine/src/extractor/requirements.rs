//! requirements.txt 추출기
//!
//! [`RequirementsExtractor`]는 pip requirements 파일에서 버전이 고정된(`==`)
//! 항목만 패키지로 추출합니다. 범위 지정(`>=`, `~=`)이나 URL/경로 항목은
//! 정확한 버전을 알 수 없으므로 건너뜁니다.
//!
//! ```text
//! # 주석
//! requests==2.31.0
//! urllib3==1.26.5 ; python_version >= "3.7"
//! flask>=2.0          # 건너뜀
//! -r other.txt        # 건너뜀
//! ```

use std::path::Path;

use crate::error::EngineError;
use crate::plugin::{Capabilities, Extractor, Plugin};
use crate::types::{Ecosystem, Package};

/// requirements.txt 추출기
pub struct RequirementsExtractor;

impl RequirementsExtractor {
    /// 레지스트리 이름
    pub const NAME: &'static str = "python/requirements";
}

impl Plugin for RequirementsExtractor {
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

impl Extractor for RequirementsExtractor {
    /// `requirements.txt`, `requirements-dev.txt`, `requirements_test.txt` 등
    fn file_required(&self, path: &Path) -> bool {
        super::file_name(path)
            .is_some_and(|name| name.starts_with("requirements") && name.ends_with(".txt"))
    }

    fn extract(&self, content: &str, source_path: &str) -> Result<Vec<Package>, EngineError> {
        let mut packages = Vec::new();

        for (line_no, raw_line) in content.lines().enumerate() {
            let Some((name, version)) = parse_pinned(raw_line) else {
                continue;
            };

            if name.is_empty() || version.is_empty() {
                return Err(EngineError::LockfileParse {
                    path: source_path.to_owned(),
                    reason: format!("line {}: malformed pinned requirement", line_no + 1),
                });
            }

            let name = normalize_name(name);
            packages.push(Package {
                purl: Package::make_purl(&Ecosystem::Pip, &name, version),
                name,
                version: version.to_owned(),
                ecosystem: Ecosystem::Pip,
                checksum: hash_option(raw_line),
                dependencies: Vec::new(),
                location: source_path.to_owned(),
                extractor: Self::NAME.to_owned(),
            });
        }

        Ok(packages)
    }
}

/// `name==version` 형식이면 (이름, 버전)을 반환합니다.
fn parse_pinned(raw_line: &str) -> Option<(&str, &str)> {
    // 주석, 환경 마커, 해시 옵션 제거
    let line = raw_line.split('#').next().unwrap_or_default();
    let line = line.split(';').next().unwrap_or_default();
    let line = line.split(" --").next().unwrap_or_default().trim();

    if line.is_empty() || line.starts_with('-') {
        return None;
    }

    let (name, version) = line.split_once("==")?;
    // "===" (arbitrary equality) 는 그대로 버전 앞에 '='가 남으므로 제거
    let version = version.trim_start_matches('=').trim();
    // extras 제거: requests[security]==2.31.0
    let name = name.split('[').next().unwrap_or_default().trim();
    Some((name, version))
}

/// PEP 503 이름 정규화 (소문자, `_`/`.` -> `-`)
fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '.'], "-")
}

/// `--hash=sha256:...` 옵션이 있으면 첫 번째 해시를 반환합니다.
fn hash_option(raw_line: &str) -> Option<String> {
    let pos = raw_line.find("--hash=")?;
    raw_line[pos + "--hash=".len()..]
        .split_whitespace()
        .next()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_REQUIREMENTS: &str = r#"
# production deps
requests==2.31.0
urllib3==1.26.5 ; python_version >= "3.7"
Flask_Login==0.6.3 --hash=sha256:deadbeef
flask>=2.0
-r dev-requirements.txt
requests[security]==2.31.0
"#;

    #[test]
    fn file_required_matches_requirement_variants() {
        let extractor = RequirementsExtractor;
        assert!(extractor.file_required(Path::new("requirements.txt")));
        assert!(extractor.file_required(Path::new("/app/requirements-dev.txt")));
        assert!(!extractor.file_required(Path::new("/app/requirements.in")));
        assert!(!extractor.file_required(Path::new("/app/constraints.txt")));
    }

    #[test]
    fn extract_only_pinned_requirements() {
        let packages = RequirementsExtractor
            .extract(SAMPLE_REQUIREMENTS, "requirements.txt")
            .unwrap();

        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["requests", "urllib3", "flask-login", "requests"]);
        assert_eq!(packages[1].version, "1.26.5");
        assert_eq!(packages[0].purl, "pkg:pypi/requests@2.31.0");
    }

    #[test]
    fn extract_keeps_hash_as_checksum() {
        let packages = RequirementsExtractor
            .extract(SAMPLE_REQUIREMENTS, "requirements.txt")
            .unwrap();
        let login = packages.iter().find(|p| p.name == "flask-login").unwrap();
        assert_eq!(login.checksum.as_deref(), Some("sha256:deadbeef"));
    }

    #[test]
    fn extract_malformed_pin_returns_error() {
        let err = RequirementsExtractor
            .extract("==1.0.0\n", "requirements.txt")
            .unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn extract_empty_file() {
        let packages = RequirementsExtractor.extract("", "requirements.txt").unwrap();
        assert!(packages.is_empty());
    }
}

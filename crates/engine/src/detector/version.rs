//! 버전 범위 매칭 -- SemVer 우선, 문자열 비교 fallback
//!
//! PyPI처럼 `1.26`, `2` 같은 짧은 버전을 쓰는 생태계가 있으므로
//! 부족한 구성요소를 `0`으로 채운 뒤 SemVer로 파싱합니다.
//! 그래도 파싱되지 않는 버전(`1.0.post1`, `2024a` 등)은 문자열 비교로 판정합니다.

use semver::Version;

use super::db::VersionRange;

/// 주어진 버전이 영향 범위 중 하나에 포함되는지 확인합니다.
///
/// - `introduced`가 없으면 하한 없음
/// - `fixed`가 없으면 상한 없음 (미수정)
/// - `introduced <= version < fixed`이면 영향받음
///
/// 범위 목록이 비어 있으면 `false`입니다.
pub fn is_affected(version: &str, ranges: &[VersionRange]) -> bool {
    ranges.iter().any(|range| is_in_range(version, range))
}

fn is_in_range(version: &str, range: &VersionRange) -> bool {
    match parse_lenient(version) {
        Some(parsed) => is_in_range_semver(&parsed, range),
        None => is_in_range_string(version, range),
    }
}

/// `1`, `1.2`, `v1.2.3` 형태도 받아들이는 SemVer 파서
pub fn parse_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim().trim_start_matches('v');
    if let Ok(v) = Version::parse(trimmed) {
        return Some(v);
    }

    // 프리릴리스/빌드 메타데이터가 없는 짧은 숫자 버전만 보정
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.is_empty()
        || parts.len() > 3
        || !parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    Version::parse(&padded).ok()
}

fn is_in_range_semver(version: &Version, range: &VersionRange) -> bool {
    if let Some(introduced) = range.introduced.as_deref()
        && let Some(intro) = parse_lenient(introduced)
        && version < &intro
    {
        return false;
    }

    if let Some(fixed) = range.fixed.as_deref()
        && let Some(fix) = parse_lenient(fixed)
        && version >= &fix
    {
        return false;
    }

    true
}

fn is_in_range_string(version: &str, range: &VersionRange) -> bool {
    if let Some(introduced) = range.introduced.as_deref()
        && version < introduced
    {
        return false;
    }

    if let Some(fixed) = range.fixed.as_deref()
        && version >= fixed
    {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(introduced: Option<&str>, fixed: Option<&str>) -> VersionRange {
        VersionRange {
            introduced: introduced.map(str::to_owned),
            fixed: fixed.map(str::to_owned),
        }
    }

    #[test]
    fn affected_inside_half_open_range() {
        let ranges = [range(Some("1.0.0"), Some("1.0.5"))];
        assert!(is_affected("1.0.0", &ranges));
        assert!(is_affected("1.0.4", &ranges));
        assert!(!is_affected("1.0.5", &ranges));
        assert!(!is_affected("0.9.9", &ranges));
    }

    #[test]
    fn open_bounds() {
        assert!(is_affected("99.0.0", &[range(Some("1.0.0"), None)]));
        assert!(is_affected("0.0.1", &[range(None, Some("1.0.0"))]));
        assert!(is_affected("0.0.1", &[range(None, None)]));
    }

    #[test]
    fn empty_ranges_never_match() {
        assert!(!is_affected("1.0.0", &[]));
    }

    #[test]
    fn any_of_multiple_ranges() {
        let ranges = [
            range(Some("1.0.0"), Some("1.0.5")),
            range(Some("2.0.0"), Some("2.0.3")),
        ];
        assert!(is_affected("2.0.1", &ranges));
        assert!(!is_affected("1.5.0", &ranges));
    }

    #[test]
    fn short_versions_are_padded() {
        assert_eq!(parse_lenient("1.26"), Some(Version::new(1, 26, 0)));
        assert_eq!(parse_lenient("2"), Some(Version::new(2, 0, 0)));
        assert_eq!(parse_lenient("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert!(parse_lenient("1.0.post1").is_none());

        // 문자열 비교였다면 "1.9" >= "1.26"이 되어 잘못 판정됨
        assert!(is_affected("1.9", &[range(None, Some("1.26"))]));
    }

    #[test]
    fn prerelease_precedes_release() {
        assert!(is_affected("1.0.3-alpha", &[range(Some("1.0.0"), Some("1.0.5"))]));
        assert!(!is_affected("1.0.5-rc.1", &[range(Some("1.0.5"), None)]));
    }

    #[test]
    fn non_semver_falls_back_to_string_comparison() {
        let ranges = [range(Some("2024a"), Some("2024f"))];
        assert!(is_affected("2024c", &ranges));
        assert!(!is_affected("2023z", &ranges));
        assert!(!is_affected("2024g", &ranges));
    }
}

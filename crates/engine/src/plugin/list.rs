//! 플러그인 레지스트리 -- 이름으로 플러그인 집합 해석
//!
//! | 이름 | 종류 |
//! |---|---|
//! | `cargo/cargolock` | 추출기 |
//! | `javascript/packagelockjson` | 추출기 |
//! | `python/requirements` | 추출기 |
//! | `vulnmatch/localdb` | 탐지기 |
//!
//! 별칭: `default`, `all` (전체), `extractors` (추출기 전체), `detectors` (탐지기 전체).
//! 이름 목록이 비어 있으면 `default`로 해석합니다.

use std::path::PathBuf;
use std::sync::Arc;

use invscan_core::config::EngineConfig;
use invscan_core::types::Severity;

use crate::detector::LocalDbDetector;
use crate::error::EngineError;
use crate::extractor::{CargoLockExtractor, NpmLockExtractor, RequirementsExtractor};

use super::{Detector, Extractor, PluginSet};

/// 기본 플러그인 집합 별칭
pub const DEFAULT_ALIAS: &str = "default";

/// 플러그인 이름 최대 길이
const MAX_PLUGIN_NAME_LEN: usize = 128;

/// 플러그인 생성에 필요한 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// 로컬 취약점 DB 디렉토리
    pub vuln_db_path: PathBuf,
    /// 탐지기가 보고할 최소 심각도
    pub min_severity: Severity,
}

impl PluginConfig {
    /// core 엔진 설정에서 플러그인 설정을 만듭니다.
    ///
    /// `min_severity`는 `validate()`를 통과한 값이라고 가정하고,
    /// 해석할 수 없으면 `Info`로 둡니다.
    pub fn from_core(config: &EngineConfig) -> Self {
        Self {
            vuln_db_path: PathBuf::from(&config.vuln_db_path),
            min_severity: Severity::from_str_loose(&config.min_severity).unwrap_or_default(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self::from_core(&EngineConfig::default())
    }
}

/// 레지스트리에 등록된 플러그인 이름 전체 (등록 순서)
pub fn registered_names() -> [&'static str; 4] {
    [
        CargoLockExtractor::NAME,
        NpmLockExtractor::NAME,
        RequirementsExtractor::NAME,
        LocalDbDetector::NAME,
    ]
}

/// 이름 목록을 플러그인 집합으로 해석합니다.
///
/// 이름은 앞뒤 공백을 제거하고 대소문자를 구분하지 않습니다.
/// 같은 플러그인은 처음 등장한 순서로 한 번만 포함됩니다.
///
/// # Errors
///
/// - 빈 이름 또는 너무 긴 이름: [`EngineError::InvalidPluginName`]
/// - 레지스트리에 없는 이름: [`EngineError::UnknownPlugin`]
pub fn from_names<S: AsRef<str>>(
    names: &[S],
    config: &PluginConfig,
) -> Result<PluginSet, EngineError> {
    let mut set = PluginSet::default();

    if names.is_empty() {
        add_by_name(&mut set, DEFAULT_ALIAS, DEFAULT_ALIAS, config)?;
        return Ok(set);
    }

    for raw in names {
        let raw = raw.as_ref();
        let name = validate_name(raw)?;
        add_by_name(&mut set, &name, raw, config)?;
    }

    Ok(set)
}

fn validate_name(raw: &str) -> Result<String, EngineError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(EngineError::InvalidPluginName {
            name: raw.to_owned(),
            reason: "name is empty".to_owned(),
        });
    }

    if trimmed.len() > MAX_PLUGIN_NAME_LEN {
        return Err(EngineError::InvalidPluginName {
            name: raw.to_owned(),
            reason: format!("name exceeds {MAX_PLUGIN_NAME_LEN} bytes"),
        });
    }

    Ok(trimmed.to_lowercase())
}

fn add_by_name(
    set: &mut PluginSet,
    name: &str,
    requested: &str,
    config: &PluginConfig,
) -> Result<(), EngineError> {
    match name {
        "default" | "all" => {
            add_all_extractors(set);
            add_all_detectors(set, config);
        }
        "extractors" => add_all_extractors(set),
        "detectors" => add_all_detectors(set, config),
        CargoLockExtractor::NAME => push_extractor(set, Arc::new(CargoLockExtractor)),
        NpmLockExtractor::NAME => push_extractor(set, Arc::new(NpmLockExtractor)),
        RequirementsExtractor::NAME => push_extractor(set, Arc::new(RequirementsExtractor)),
        LocalDbDetector::NAME => push_detector(set, local_db(config)),
        _ => return Err(EngineError::UnknownPlugin(requested.trim().to_owned())),
    }
    Ok(())
}

fn add_all_extractors(set: &mut PluginSet) {
    push_extractor(set, Arc::new(CargoLockExtractor));
    push_extractor(set, Arc::new(NpmLockExtractor));
    push_extractor(set, Arc::new(RequirementsExtractor));
}

fn add_all_detectors(set: &mut PluginSet, config: &PluginConfig) {
    push_detector(set, local_db(config));
}

fn local_db(config: &PluginConfig) -> Arc<dyn Detector> {
    Arc::new(LocalDbDetector::new(
        config.vuln_db_path.clone(),
        config.min_severity,
    ))
}

fn push_extractor(set: &mut PluginSet, extractor: Arc<dyn Extractor>) {
    if !set.contains(extractor.name()) {
        set.extractors.push(extractor);
    }
}

fn push_detector(set: &mut PluginSet, detector: Arc<dyn Detector>) {
    if !set.contains(detector.name()) {
        set.detectors.push(detector);
    }
}

//! 플러그인 인터페이스 -- 추출기(Extractor)와 탐지기(Detector)
//!
//! 모든 플러그인은 [`Plugin`] trait으로 이름, 버전, 요구 역량을 노출합니다.
//!
//! - [`Extractor`]: 파일 하나를 읽어 패키지 목록을 만듭니다 (예: `Cargo.lock`).
//! - [`Detector`]: 추출이 끝난 인벤토리 전체를 보고 취약점을 보고합니다.
//!
//! 스캔 호출자는 [`Capabilities`]로 실행 환경이 제공하는 역량을 선언하고,
//! [`filter_by_capabilities`]가 요구 역량을 만족하지 못하는 플러그인을 제외합니다.
//!
//! # 레지스트리
//!
//! 이름으로 플러그인을 찾는 방법은 [`list`] 모듈을 참고하세요.

pub mod list;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::outcome::{Finding, Inventory};
use crate::types::Package;

/// 네트워크 접근 역량
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    /// 요구 사항으로 쓰일 때: 네트워크 상태와 무관
    #[default]
    Any,
    /// 네트워크 접근 불가
    Offline,
    /// 네트워크 접근 가능
    Online,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::Offline => write!(f, "offline"),
            Self::Online => write!(f, "online"),
        }
    }
}

/// 실행 환경 역량 (또는 플러그인의 요구 역량)
///
/// 같은 구조체를 두 용도로 씁니다.
/// 스캔 설정에 있을 때는 "제공되는 역량", 플러그인이 반환할 때는 "필요한 역량"입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// 네트워크 접근
    pub network: Network,
    /// 실제 파일시스템 직접 접근
    pub direct_fs: bool,
    /// 현재 실행 중인 시스템을 스캔하는지 여부
    pub running_system: bool,
}

impl Capabilities {
    /// `required` 요구 역량을 이 역량이 만족하는지 확인합니다.
    ///
    /// 만족하지 못하면 사유를 반환합니다.
    pub fn check(&self, required: &Capabilities) -> Result<(), String> {
        match (required.network, self.network) {
            (Network::Online, provided) if provided != Network::Online => {
                return Err("requires network access".to_owned());
            }
            (Network::Offline, Network::Online) => {
                return Err("must run offline".to_owned());
            }
            _ => {}
        }

        if required.direct_fs && !self.direct_fs {
            return Err("requires direct filesystem access".to_owned());
        }

        if required.running_system && !self.running_system {
            return Err("requires scanning the running system".to_owned());
        }

        Ok(())
    }
}

/// 모든 플러그인의 공통 인터페이스
pub trait Plugin: Send + Sync {
    /// 레지스트리에 등록된 고유 이름 (예: `cargo/cargolock`)
    fn name(&self) -> &str;

    /// 플러그인 구현 버전
    fn version(&self) -> u32;

    /// 실행에 필요한 역량
    fn requirements(&self) -> Capabilities;
}

/// 파일 단위 패키지 추출기
pub trait Extractor: Plugin {
    /// 주어진 경로의 파일이 이 추출기의 대상인지 확인합니다.
    ///
    /// 파일 이름 패턴으로 판별합니다 (예: "Cargo.lock", "package-lock.json").
    fn file_required(&self, path: &Path) -> bool;

    /// 파일 내용에서 패키지 목록을 추출합니다.
    ///
    /// # Arguments
    ///
    /// - `content`: 파일 내용 (UTF-8 문자열)
    /// - `source_path`: 원본 파일 경로 (패키지 위치 및 에러 메시지용)
    fn extract(&self, content: &str, source_path: &str) -> Result<Vec<Package>, EngineError>;
}

/// 인벤토리 단위 취약점 탐지기
pub trait Detector: Plugin {
    /// 추출된 인벤토리에서 취약점을 찾습니다.
    fn detect(&self, inventory: &Inventory) -> Result<Vec<Finding>, EngineError>;
}

/// 해석된 플러그인 집합
///
/// 레지스트리 순서를 유지하며, 같은 플러그인은 한 번만 포함됩니다.
#[derive(Clone, Default)]
pub struct PluginSet {
    /// 추출기 목록
    pub extractors: Vec<Arc<dyn Extractor>>,
    /// 탐지기 목록
    pub detectors: Vec<Arc<dyn Detector>>,
}

impl PluginSet {
    /// 포함된 플러그인 수
    pub fn len(&self) -> usize {
        self.extractors.len() + self.detectors.len()
    }

    /// 플러그인이 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 추출기, 탐지기 순서로 플러그인 이름을 반환합니다.
    pub fn names(&self) -> Vec<String> {
        self.extractors
            .iter()
            .map(|e| e.name().to_owned())
            .chain(self.detectors.iter().map(|d| d.name().to_owned()))
            .collect()
    }

    /// 이름이 같은 플러그인이 이미 있는지 확인합니다.
    pub fn contains(&self, name: &str) -> bool {
        self.extractors.iter().any(|e| e.name() == name)
            || self.detectors.iter().any(|d| d.name() == name)
    }
}

impl fmt::Debug for PluginSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginSet")
            .field("plugins", &self.names())
            .finish()
    }
}

/// 제공 역량으로 실행할 수 없는 플러그인을 제외합니다.
pub fn filter_by_capabilities(set: PluginSet, capabilities: &Capabilities) -> PluginSet {
    PluginSet {
        extractors: set
            .extractors
            .into_iter()
            .filter(|e| is_runnable(e.as_ref(), capabilities))
            .collect(),
        detectors: set
            .detectors
            .into_iter()
            .filter(|d| is_runnable(d.as_ref(), capabilities))
            .collect(),
    }
}

fn is_runnable<P: Plugin + ?Sized>(plugin: &P, capabilities: &Capabilities) -> bool {
    match capabilities.check(&plugin.requirements()) {
        Ok(()) => true,
        Err(reason) => {
            debug!(plugin = plugin.name(), reason = %reason, "plugin disabled by capabilities");
            false
        }
    }
}

#![doc = include_str!("../README.md")]
//!
//! # 모듈 구조
//!
//! - [`error`]: 도메인 에러 (`EngineError`)
//! - [`types`]: `Package`, `Ecosystem`
//! - [`plugin`]: `Plugin` / `Extractor` / `Detector` trait, 역량 필터링, 레지스트리
//! - [`extractor`]: lockfile 추출기
//! - [`detector`]: 취약점 DB 로딩, 버전 매칭, 로컬 DB 탐지기
//! - [`config`]: 실행 설정 (`ScanConfig`)
//! - [`outcome`]: 결과 (`ScanOutcome`, `Inventory`, `Finding`)
//! - [`scanner`]: 순회와 실행 (`Scanner`, `ScanEngine`)
//!
//! # 구조
//!
//! ```text
//! scan_roots --> walk --> Extractor --> Inventory.packages
//!                                            |
//!                                        Detector --> Inventory.findings
//!                                            |
//!                                       ScanOutcome
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod outcome;
pub mod plugin;
pub mod scanner;
pub mod types;

// --- 주요 타입 re-export ---

// 스캐너
pub use scanner::{ScanEngine, Scanner};

// 설정
pub use config::ScanConfig;

// 에러
pub use error::EngineError;

// 결과
pub use outcome::{
    Finding, Inventory, PluginStatus, ScanOutcome, ScanStatus, SeverityCounts, StatusKind,
};

// 플러그인
pub use plugin::list::PluginConfig;
pub use plugin::{Capabilities, Detector, Extractor, Network, Plugin, PluginSet};

// 타입
pub use types::{Ecosystem, Package};

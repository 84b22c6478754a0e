//! 도메인 타입 -- 인벤토리 전용 데이터 구조
//!
//! 패키지, 생태계 등 추출 결과의 핵심 타입을 정의합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 패키지 생태계 (언어/패키지 관리자)
///
/// 각 lockfile 형식에 대응하는 패키지 생태계를 나타냅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    /// Rust (Cargo.lock)
    Cargo,
    /// JavaScript/TypeScript (package-lock.json)
    Npm,
    /// Python (requirements.txt)
    Pip,
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cargo => write!(f, "cargo"),
            Self::Npm => write!(f, "npm"),
            Self::Pip => write!(f, "pip"),
        }
    }
}

impl Ecosystem {
    /// 생태계에 대응하는 Package URL 타입을 반환합니다.
    ///
    /// 예: Cargo -> "cargo", Pip -> "pypi"
    pub fn purl_type(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Npm => "npm",
            Self::Pip => "pypi",
        }
    }

    /// 취약점 DB 디렉토리에서 이 생태계의 파일명
    pub fn db_file_name(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo.json",
            Self::Npm => "npm.json",
            Self::Pip => "pip.json",
        }
    }

    /// 지원하는 모든 생태계
    pub fn all() -> [Self; 3] {
        [Self::Cargo, Self::Npm, Self::Pip]
    }
}

/// 소프트웨어 패키지 정보
///
/// lockfile에서 추출된 단일 패키지의 메타데이터를 나타냅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// 패키지 이름
    pub name: String,
    /// 패키지 버전
    pub version: String,
    /// 패키지 생태계
    pub ecosystem: Ecosystem,
    /// Package URL (예: `pkg:cargo/serde@1.0.204`)
    pub purl: String,
    /// 체크섬 (있을 경우)
    pub checksum: Option<String>,
    /// 직접 의존하는 패키지 이름 목록
    pub dependencies: Vec<String>,
    /// 패키지를 발견한 파일 경로
    pub location: String,
    /// 패키지를 추출한 플러그인 이름
    pub extractor: String,
}

impl Package {
    /// 패키지 이름과 버전으로 PURL을 생성합니다.
    pub fn make_purl(ecosystem: &Ecosystem, name: &str, version: &str) -> String {
        format!("pkg:{}/{}@{}", ecosystem.purl_type(), name, version)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.name, self.version, self.ecosystem)
    }
}

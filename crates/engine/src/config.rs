//! 스캔 실행 설정
//!
//! [`ScanConfig`]는 엔진 한 번 실행에 필요한 모든 입력을 담습니다.
//! FFI 경계는 [`ScanConfig::from_core`]로 설정 파일 값을 채운 뒤
//! 요청 구조체의 값으로 필드를 덮어씁니다.

use std::path::PathBuf;

use invscan_core::config::EngineConfig;

use crate::plugin::{Capabilities, PluginSet};

/// 엔진 실행 설정
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// 스캔 루트 목록
    pub scan_roots: Vec<PathBuf>,
    /// 실행할 플러그인 (역량 필터링이 끝난 집합)
    pub plugins: PluginSet,
    /// 비어 있지 않으면 이 경로들만 추출 대상으로 삼습니다.
    pub paths_to_extract: Vec<PathBuf>,
    /// 추출 파일 크기 상한 (바이트). `None`이면 엔진 기본값
    pub max_file_size: Option<u64>,
    /// 실행 환경이 제공하는 역량
    pub capabilities: Capabilities,
    /// 순회에서 제외할 디렉토리
    pub skip_dirs: Vec<PathBuf>,
}

impl ScanConfig {
    /// core 엔진 설정에서 기본값을 채웁니다.
    ///
    /// 루트와 플러그인은 비어 있으므로 호출자가 채워야 합니다.
    pub fn from_core(config: &EngineConfig) -> Self {
        Self {
            skip_dirs: config.skip_dirs.iter().map(PathBuf::from).collect(),
            ..Self::default()
        }
    }
}

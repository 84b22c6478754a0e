//! 스캐너 -- 파일시스템 순회, 추출, 탐지
//!
//! [`Scanner`]는 [`ScanEngine`]의 기본 구현입니다.
//!
//! # 스캔 흐름
//!
//! 1. 스캔 루트 존재 확인 (없으면 `Failed` 결과)
//! 2. 루트(또는 `paths_to_extract`)를 깊이 우선으로 순회하며 추출기 실행
//! 3. 완성된 인벤토리로 탐지기 실행
//! 4. 플러그인별 상태와 전체 상태 집계
//!
//! 순회는 심볼릭 링크를 따라가지 않으며, 디렉토리 항목은 이름순으로 방문합니다.
//! 플러그인 하나가 실패해도 나머지 파일과 플러그인은 계속 처리됩니다.

use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use tracing::debug;

use invscan_core::config::EngineConfig;
use invscan_core::metrics as m;

use crate::config::ScanConfig;
use crate::outcome::{Inventory, PluginStatus, ScanOutcome, ScanStatus, StatusKind};
use crate::plugin::{Extractor, Plugin};

/// 요청과 설정 모두 크기 상한을 지정하지 않았을 때의 기본값 (10 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// 디렉토리 순회 최대 깊이
const MAX_WALK_DEPTH: usize = 64;

/// 스캔 엔진 인터페이스
///
/// FFI 경계는 이 trait만 알고 있으므로 테스트에서 엔진을 바꿔 끼울 수 있습니다.
pub trait ScanEngine {
    /// 스캔을 실행합니다.
    ///
    /// 결과 객체 자체를 만들 수 없을 때만 `None`을 반환합니다.
    /// 스캔 중 발생한 실패는 결과의 `status`에 담깁니다.
    fn run_scan(&self, config: &ScanConfig) -> Option<ScanOutcome>;
}

/// 기본 스캔 엔진
#[derive(Debug, Clone)]
pub struct Scanner {
    default_max_file_size: u64,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl Scanner {
    /// 요청에 크기 상한이 없을 때 쓸 기본값으로 스캐너를 생성합니다.
    pub fn new(default_max_file_size: u64) -> Self {
        Self {
            default_max_file_size,
        }
    }

    /// core 엔진 설정으로 스캐너를 생성합니다.
    pub fn from_core(config: &EngineConfig) -> Self {
        Self::new(config.max_file_size)
    }

    /// 요청에 크기 상한이 없을 때 쓰는 기본값
    pub fn default_max_file_size(&self) -> u64 {
        self.default_max_file_size
    }

    /// 스캔을 실행하고 결과를 반환합니다.
    pub fn scan(&self, config: &ScanConfig) -> ScanOutcome {
        let started = Instant::now();
        let start_time = SystemTime::now();
        let scan_id = uuid::Uuid::new_v4().to_string();

        let mut outcome = ScanOutcome {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            scan_id,
            start_time,
            end_time: start_time,
            scan_roots: config
                .scan_roots
                .iter()
                .map(|r| r.display().to_string())
                .collect(),
            capabilities: config.capabilities,
            status: ScanStatus::succeeded(),
            plugin_status: Vec::new(),
            inventory: Inventory::default(),
        };

        if config.scan_roots.is_empty() {
            outcome.status = ScanStatus::with_reason(StatusKind::Failed, "no scan roots given");
            outcome.end_time = SystemTime::now();
            return outcome;
        }

        if let Some(missing) = config.scan_roots.iter().find(|r| !r.exists()) {
            debug!(root = %missing.display(), "scan root does not exist");
            outcome.status = ScanStatus::with_reason(
                StatusKind::Failed,
                format!("scan root does not exist: {}", missing.display()),
            );
            outcome.end_time = SystemTime::now();
            return outcome;
        }

        let max_file_size = config.max_file_size.unwrap_or(self.default_max_file_size);
        let mut walk = Walk::new(config, max_file_size);

        for target in extraction_targets(config) {
            walk.visit_target(&target);
        }

        let Walk {
            inventory,
            extractor_failures,
            files_visited,
            ..
        } = walk;
        outcome.inventory = inventory;

        for (extractor, failure) in config.plugins.extractors.iter().zip(extractor_failures) {
            outcome
                .plugin_status
                .push(plugin_status(extractor.as_ref(), failure));
        }

        for detector in &config.plugins.detectors {
            let failure = match detector.detect(&outcome.inventory) {
                Ok(findings) => {
                    debug!(
                        detector = detector.name(),
                        findings = findings.len(),
                        "detector finished"
                    );
                    outcome.inventory.findings.extend(findings);
                    None
                }
                Err(e) => {
                    debug!(detector = detector.name(), error = %e, "detector failed");
                    Some(e.to_string())
                }
            };
            outcome
                .plugin_status
                .push(plugin_status(detector.as_ref(), failure));
        }

        for finding in &outcome.inventory.findings {
            metrics::counter!(
                m::ENGINE_FINDINGS_TOTAL,
                m::LABEL_SEVERITY => finding.vulnerability.severity.as_label()
            )
            .increment(1);
        }

        let failed: Vec<&str> = outcome
            .plugin_status
            .iter()
            .filter(|p| p.status.status == StatusKind::Failed)
            .map(|p| p.name.as_str())
            .collect();
        if !failed.is_empty() {
            outcome.status = ScanStatus::with_reason(
                StatusKind::PartiallySucceeded,
                format!("{} plugin(s) failed: {}", failed.len(), failed.join(", ")),
            );
        }

        outcome.end_time = SystemTime::now();
        metrics::histogram!(m::ENGINE_SCAN_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        let counts = outcome.inventory.severity_counts();
        debug!(
            scan_id = %outcome.scan_id,
            files = files_visited,
            packages = outcome.inventory.packages.len(),
            findings = counts.total(),
            critical = counts.critical,
            high = counts.high,
            status = ?outcome.status.status,
            "scan completed"
        );

        outcome
    }
}

impl ScanEngine for Scanner {
    fn run_scan(&self, config: &ScanConfig) -> Option<ScanOutcome> {
        Some(self.scan(config))
    }
}

fn plugin_status<P: Plugin + ?Sized>(plugin: &P, failure: Option<String>) -> PluginStatus {
    PluginStatus {
        name: plugin.name().to_owned(),
        version: plugin.version(),
        status: match failure {
            None => ScanStatus::succeeded(),
            Some(reason) => ScanStatus::with_reason(StatusKind::Failed, reason),
        },
    }
}

/// 순회 시작점을 계산합니다.
///
/// `paths_to_extract`가 비어 있으면 스캔 루트 자체, 아니면 각 경로입니다.
/// 상대 경로는 모든 스캔 루트에 대해 결합합니다.
fn extraction_targets(config: &ScanConfig) -> Vec<PathBuf> {
    if config.paths_to_extract.is_empty() {
        return config.scan_roots.clone();
    }

    let mut targets = Vec::new();
    for path in &config.paths_to_extract {
        if path.is_absolute() {
            targets.push(path.clone());
        } else {
            targets.extend(config.scan_roots.iter().map(|root| root.join(path)));
        }
    }
    targets
}

/// 한 번의 스캔 동안 유지되는 순회 상태
struct Walk<'a> {
    extractors: &'a [Arc<dyn Extractor>],
    skip_dirs: &'a [PathBuf],
    max_file_size: u64,
    visited: HashSet<PathBuf>,
    files_visited: usize,
    inventory: Inventory,
    /// `extractors`와 같은 순서. 첫 번째 실패 사유만 보관
    extractor_failures: Vec<Option<String>>,
}

impl<'a> Walk<'a> {
    fn new(config: &'a ScanConfig, max_file_size: u64) -> Self {
        Self {
            extractors: &config.plugins.extractors,
            skip_dirs: &config.skip_dirs,
            max_file_size,
            visited: HashSet::new(),
            files_visited: 0,
            inventory: Inventory::default(),
            extractor_failures: vec![None; config.plugins.extractors.len()],
        }
    }

    /// 스캔 루트나 추출 대상 경로에서 순회를 시작합니다.
    ///
    /// 시작 경로 자체가 심볼릭 링크면 따라갑니다. 순회 중 만난 링크는 따라가지 않습니다.
    fn visit_target(&mut self, path: &Path) {
        match std::fs::metadata(path) {
            Ok(metadata) => self.visit_with(path, &metadata, 0),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "failed to read metadata, skipping");
            }
        }
    }

    fn visit(&mut self, path: &Path, depth: usize) {
        match std::fs::symlink_metadata(path) {
            Ok(metadata) => self.visit_with(path, &metadata, depth),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "failed to read metadata, skipping");
            }
        }
    }

    fn visit_with(&mut self, path: &Path, metadata: &Metadata, depth: usize) {
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            debug!(path = %path.display(), "not following symlink");
        } else if file_type.is_dir() {
            self.visit_dir(path, depth);
        } else if file_type.is_file() {
            self.visit_file(path, metadata);
        }
    }

    fn visit_dir(&mut self, dir: &Path, depth: usize) {
        if self.skip_dirs.iter().any(|skip| skip == dir) {
            debug!(dir = %dir.display(), "skipping excluded directory");
            return;
        }

        if depth >= MAX_WALK_DEPTH {
            debug!(dir = %dir.display(), max = MAX_WALK_DEPTH, "maximum walk depth reached");
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "failed to read directory, skipping");
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(e) => Some(e.path()),
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "failed to read directory entry");
                    None
                }
            })
            .collect();
        paths.sort();

        for path in paths {
            self.visit(&path, depth + 1);
        }
    }

    fn visit_file(&mut self, path: &Path, metadata: &Metadata) {
        let wanted: Vec<usize> = self
            .extractors
            .iter()
            .enumerate()
            .filter(|(_, e)| e.file_required(path))
            .map(|(i, _)| i)
            .collect();
        if wanted.is_empty() || !self.visited.insert(path.to_path_buf()) {
            return;
        }

        if metadata.len() > self.max_file_size {
            debug!(
                path = %path.display(),
                size = metadata.len(),
                max = self.max_file_size,
                "file too large, skipping"
            );
            return;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "failed to read file, skipping");
                return;
            }
        };
        self.files_visited += 1;

        let source = path.display().to_string();
        for idx in wanted {
            let Some(extractor) = self.extractors.get(idx) else {
                continue;
            };
            match extractor.extract(&content, &source) {
                Ok(packages) => {
                    debug!(
                        extractor = extractor.name(),
                        path = %source,
                        packages = packages.len(),
                        "extracted packages"
                    );
                    for package in &packages {
                        metrics::counter!(
                            m::ENGINE_PACKAGES_EXTRACTED_TOTAL,
                            m::LABEL_ECOSYSTEM => package.ecosystem.to_string()
                        )
                        .increment(1);
                    }
                    self.inventory.packages.extend(packages);
                }
                Err(e) => {
                    debug!(extractor = extractor.name(), path = %source, error = %e, "extraction failed");
                    if let Some(slot) = self.extractor_failures.get_mut(idx)
                        && slot.is_none()
                    {
                        *slot = Some(e.to_string());
                    }
                }
            }
        }
    }
}

//! 의존성 파일 추출기 -- Cargo.lock, package-lock.json, requirements.txt
//!
//! 각 추출기는 [`Extractor`](crate::plugin::Extractor) trait을 구현하며,
//! 레지스트리([`crate::plugin::list`])에 이름으로 등록됩니다.
//!
//! # 지원 형식
//!
//! | 플러그인 이름 | 파일 | 구현 |
//! |---|---|---|
//! | `cargo/cargolock` | `Cargo.lock` (TOML) | [`CargoLockExtractor`] |
//! | `javascript/packagelockjson` | `package-lock.json` (JSON v2/v3) | [`NpmLockExtractor`] |
//! | `python/requirements` | `requirements*.txt` | [`RequirementsExtractor`] |

pub mod cargo;
pub mod npm;
pub mod requirements;

use std::path::Path;

pub use cargo::CargoLockExtractor;
pub use npm::NpmLockExtractor;
pub use requirements::RequirementsExtractor;

/// 경로의 파일 이름을 반환합니다 (UTF-8이 아니면 `None`).
fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

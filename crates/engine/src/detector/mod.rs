//! 취약점 탐지기 -- 인벤토리를 로컬 취약점 DB와 대조
//!
//! # 사용 흐름
//!
//! 1. 추출기들이 [`Inventory`](crate::outcome::Inventory)를 채웁니다.
//! 2. [`LocalDbDetector::detect`]가 `vuln_db_path`에서 [`VulnDb`]를 로드합니다.
//! 3. 각 패키지를 (이름, 생태계)로 조회하고 [`version::is_affected`]로 범위를 확인합니다.
//! 4. `min_severity` 이상인 항목만 [`Finding`](crate::outcome::Finding)으로 보고합니다.

pub mod db;
pub mod localdb;
pub mod version;

pub use db::{VersionRange, VulnDb, VulnDbEntry};
pub use localdb::LocalDbDetector;

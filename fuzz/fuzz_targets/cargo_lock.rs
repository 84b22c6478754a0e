#![no_main]

use invscan_engine::Extractor;
use invscan_engine::extractor::CargoLockExtractor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let _ = CargoLockExtractor.extract(content, "fuzz/Cargo.lock");
    }
});

#![no_main]

use invscan_engine::Extractor;
use invscan_engine::extractor::RequirementsExtractor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let content = String::from_utf8_lossy(data);
    if let Ok(packages) = RequirementsExtractor.extract(&content, "fuzz/requirements.txt") {
        for package in packages {
            assert!(!package.name.is_empty());
            assert!(!package.version.is_empty());
        }
    }
});

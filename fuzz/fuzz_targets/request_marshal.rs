#![no_main]

//! 임의의 요청 필드로 요청 디코딩을 퍼징합니다.
//! 개수 필드는 실제 배열 길이를 넘지 않게 맞추고, 음수와 0도 그대로 넣습니다.

use std::ffi::{CString, c_char, c_int};

use arbitrary::Arbitrary;
use invscan_core::config::InvscanConfig;
use invscan_ffi::InvscanScanConfig;
use invscan_ffi::marshal::marshal_request;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    root: Option<Vec<u8>>,
    plugins: Vec<Option<Vec<u8>>>,
    plugins_count: i8,
    paths: Vec<Option<Vec<u8>>>,
    paths_count: i8,
    max_file_size: c_int,
    verbose: c_int,
    offline: c_int,
}

fn to_cstrings(items: &[Option<Vec<u8>>]) -> Vec<Option<CString>> {
    items
        .iter()
        .map(|item| {
            item.as_ref().map(|bytes| {
                let bytes: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
                CString::new(bytes).unwrap_or_default()
            })
        })
        .collect()
}

fn to_ptrs(items: &[Option<CString>]) -> Vec<*const c_char> {
    items
        .iter()
        .map(|item| item.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()))
        .collect()
}

fn clamp_count(requested: i8, len: usize) -> c_int {
    let requested = c_int::from(requested);
    requested.min(c_int::try_from(len).unwrap_or(c_int::MAX))
}

fuzz_target!(|input: Input| {
    let root = input.root.as_ref().map(|bytes| {
        let bytes: Vec<u8> = bytes.iter().copied().filter(|&b| b != 0).collect();
        CString::new(bytes).unwrap_or_default()
    });
    let plugins = to_cstrings(&input.plugins);
    let plugin_ptrs = to_ptrs(&plugins);
    let paths = to_cstrings(&input.paths);
    let path_ptrs = to_ptrs(&paths);

    let request = InvscanScanConfig {
        root_path: root.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()),
        plugins: plugin_ptrs.as_ptr(),
        plugins_count: clamp_count(input.plugins_count, plugin_ptrs.len()),
        paths_to_extract: path_ptrs.as_ptr(),
        paths_count: clamp_count(input.paths_count, path_ptrs.len()),
        max_file_size: input.max_file_size,
        verbose: input.verbose,
        offline: input.offline,
    };

    let _ = unsafe { marshal_request(&request, &InvscanConfig::default()) };
});

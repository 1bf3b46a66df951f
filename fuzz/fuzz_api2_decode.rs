//! Fuzz target for legacy-generation envelope decoding.
//!
//! Run with: cargo +nightly fuzz run fuzz_api2_decode
//!
//! Exercises `envelope::decode_api2()` with arbitrary byte sequences to find
//! panics or unbounded error output in the `cpanelresult` unwrapping path.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = panelgate_core::envelope::decode_api2(data);
});

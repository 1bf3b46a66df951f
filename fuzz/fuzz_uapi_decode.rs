//! Fuzz target for unified-generation envelope decoding.
//!
//! Run with: cargo +nightly fuzz run fuzz_uapi_decode
//!
//! Exercises `envelope::decode_uapi()` with arbitrary byte sequences to find
//! panics or unbounded error output in the envelope parsing pipeline.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any input must produce either an inner payload or an error value,
    // never a panic.
    let _ = panelgate_core::envelope::decode_uapi(data);
});

// crates/contract-fuzzer-core/tests/hashing.rs
// ============================================================================
// Module: Hashing Tests
// Description: Canonical JSON and raw byte digests.
// ============================================================================
//! ## Overview
//! Validates that digests are stable under key reordering.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use contract_fuzzer_core::DEFAULT_HASH_ALGORITHM;
use contract_fuzzer_core::hashing::hash_bytes;
use contract_fuzzer_core::hashing::hash_canonical_json;
use serde_json::json;

/// Tests canonical json hash ignores key order.
#[test]
fn test_canonical_json_hash_ignores_key_order() {
    let value_a = json!({"b": 1, "a": [true, null]});
    let value_b = json!({"a": [true, null], "b": 1});

    let hash_a = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &value_a).unwrap();
    let hash_b = hash_canonical_json(DEFAULT_HASH_ALGORITHM, &value_b).unwrap();

    assert_eq!(hash_a, hash_b);
}

/// Tests raw byte hashing matches the published SHA-256 vector.
#[test]
fn test_hash_bytes_matches_known_vector() {
    let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, b"abc");
    assert_eq!(digest.value, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    assert_eq!(digest.to_string(), format!("sha256:{}", digest.value));
}

// crates/contract-fuzzer-config/src/lib.rs
// ============================================================================
// Module: Contract Fuzzer Config Library
// Description: Configuration model and validation for the fuzzer.
// Purpose: Single source of truth for contract-fuzzer.toml semantics.
// Dependencies: contract-fuzzer-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `contract-fuzzer-config` loads `contract-fuzzer.toml`, validates every
//! section fail-closed, and builds the runtime inputs the engine needs: the
//! contract catalog, generator policy, and engine limits.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;

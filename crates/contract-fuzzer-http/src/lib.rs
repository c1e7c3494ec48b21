// crates/contract-fuzzer-http/src/lib.rs
// ============================================================================
// Module: Contract Fuzzer HTTP Library
// Description: Network-facing adapters for the contract fuzzing engine.
// Purpose: Provide the production case executor and audit event sinks.
// Dependencies: contract-fuzzer-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! This crate holds everything that touches the outside world on behalf of
//! the pure core: [`HttpExecutor`] issues the generated requests, and the
//! audit sinks write engine events as JSON lines.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod executor;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::StderrAuditSink;
pub use executor::Credential;
pub use executor::ExecutorBuildError;
pub use executor::HttpExecutor;
pub use executor::HttpExecutorConfig;

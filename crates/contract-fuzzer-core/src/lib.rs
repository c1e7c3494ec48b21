// crates/contract-fuzzer-core/src/lib.rs
// ============================================================================
// Module: Contract Fuzzer Core Library
// Description: Public API surface for the contract fuzzing engine.
// Purpose: Expose core types, executor interfaces, and runtime components.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Contract Fuzzer core turns an explicit per-endpoint contract into a
//! deterministic plan of adversarial requests, drives them through an
//! executor with bounded concurrency, and judges every observed outcome
//! against a fixed policy table. Network access is isolated behind
//! [`CaseExecutor`]; everything else in this crate is pure.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::CaseExecutor;
pub use interfaces::FuzzEvent;
pub use interfaces::FuzzEventSink;
pub use interfaces::NoopEventSink;
pub use runtime::CaseGenerator;
pub use runtime::CasePlan;
pub use runtime::CatalogError;
pub use runtime::ContractCatalog;
pub use runtime::EngineConfig;
pub use runtime::EngineError;
pub use runtime::FuzzEngine;
pub use runtime::FuzzRun;
pub use runtime::GeneratorError;
pub use runtime::GeneratorPolicy;
pub use runtime::InvocationReport;
pub use runtime::ReportError;
pub use runtime::RunReporter;
pub use runtime::RunSummary;
pub use runtime::TargetOutcome;
pub use runtime::judge;

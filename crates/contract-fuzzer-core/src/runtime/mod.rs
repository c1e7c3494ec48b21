// crates/contract-fuzzer-core/src/runtime/mod.rs
// ============================================================================
// Module: Contract Fuzzer Runtime
// Description: Catalog, generator, judge, reporter, and engine.
// Purpose: Drive contracts through the fuzzing pipeline.
// Dependencies: crate::{core, interfaces}, tokio
// ============================================================================

//! ## Overview
//! The runtime wires the pipeline together: the catalog resolves targets,
//! the generator plans cases, the engine executes them with bounded
//! concurrency, the judge decides each verdict, and the reporter assembles
//! results in plan order. Only the engine touches an executor.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod engine;
pub mod generator;
pub mod judge;
pub mod reporter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::CatalogError;
pub use catalog::ContractCatalog;
pub use catalog::TargetPartition;
pub use engine::EngineConfig;
pub use engine::EngineError;
pub use engine::FuzzEngine;
pub use generator::CaseGenerator;
pub use generator::CasePlan;
pub use generator::GeneratorError;
pub use generator::GeneratorPolicy;
pub use judge::Verdict;
pub use reporter::FuzzRun;
pub use reporter::InvocationReport;
pub use reporter::ReportError;
pub use reporter::RunEntry;
pub use reporter::RunReporter;
pub use reporter::RunSummary;
pub use reporter::TargetOutcome;

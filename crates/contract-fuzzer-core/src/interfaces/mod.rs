// crates/contract-fuzzer-core/src/interfaces/mod.rs
// ============================================================================
// Module: Contract Fuzzer Interfaces
// Description: Executor and event sink boundaries for the fuzzing runtime.
// Purpose: Keep network access and log routing outside the pure core.
// Dependencies: async-trait, serde, crate::core
// ============================================================================

//! ## Overview
//! The runtime talks to the outside world through two seams. A
//! [`CaseExecutor`] turns one [`TestCase`] into one [`ExecutionOutcome`] and
//! must never fail in any other way. A [`FuzzEventSink`] receives structured
//! progress events; sinks own timestamps and output routing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Serialize;

use crate::core::CaseId;
use crate::core::ContractSpec;
use crate::core::EndpointSignature;
use crate::core::ExecutionOutcome;
use crate::core::FailureKind;
use crate::core::HashDigest;
use crate::core::TestCase;

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Executes generated cases against a live target.
///
/// # Invariants
/// - Every call resolves to exactly one terminal [`ExecutionOutcome`].
/// - Implementations retry only connection-level failures, and at most once.
/// - Concurrent calls share no mutable state observable by the runtime.
#[async_trait]
pub trait CaseExecutor: Send + Sync {
    /// Issues the request described by `case` for the endpoint in `contract`.
    async fn execute(&self, contract: &ContractSpec, case: &TestCase) -> ExecutionOutcome;
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Structured progress event emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FuzzEvent {
    /// Target signature could not be resolved or planned.
    TargetRejected {
        /// Requested target.
        target: String,
        /// Rejection reason.
        error: String,
    },
    /// Case plan generated; execution is about to begin.
    RunStarted {
        /// Endpoint signature.
        target: EndpointSignature,
        /// Number of planned cases.
        case_count: usize,
        /// Plan fingerprint.
        plan_hash: HashDigest,
    },
    /// One case was executed and judged.
    CaseCompleted {
        /// Endpoint signature.
        target: EndpointSignature,
        /// Case identifier.
        case_id: CaseId,
        /// HTTP status when a response was received.
        http_status: Option<u16>,
        /// Verdict.
        passed: bool,
        /// Failure kind when the case failed.
        failure: Option<FailureKind>,
        /// Elapsed latency in milliseconds.
        latency_ms: u64,
        /// Attempts made by the executor.
        attempts: u8,
    },
    /// All cases for a target were judged.
    RunFinished {
        /// Endpoint signature.
        target: EndpointSignature,
        /// Total cases.
        total: usize,
        /// Passed cases.
        passed: usize,
        /// Failed cases.
        failed: usize,
    },
}

impl FuzzEvent {
    /// Returns the stable event label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::TargetRejected {
                ..
            } => "target_rejected",
            Self::RunStarted {
                ..
            } => "run_started",
            Self::CaseCompleted {
                ..
            } => "case_completed",
            Self::RunFinished {
                ..
            } => "run_finished",
        }
    }
}

/// Receives engine progress events.
pub trait FuzzEventSink: Send + Sync {
    /// Records a single event.
    fn record(&self, event: &FuzzEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl FuzzEventSink for NoopEventSink {
    fn record(&self, _event: &FuzzEvent) {}
}

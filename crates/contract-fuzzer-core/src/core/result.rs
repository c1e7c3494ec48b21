// crates/contract-fuzzer-core/src/core/result.rs
// ============================================================================
// Module: Test Results
// Description: Judged results for executed cases.
// Purpose: Record the verdict and its reason alongside the observed outcome.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TestResult`] is the judge's verdict on one case. It keeps a compact
//! [`CaseRef`] rather than the full request so that reports stay small even
//! when the plan contains megabyte-sized bodies.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::case::ExpectedOutcomeClass;
use crate::core::case::TestCase;
use crate::core::identifiers::CaseId;
use crate::core::outcome::TransportErrorKind;
use crate::core::outcome::TransportFailure;

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Reason a case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Target could not be reached.
    Unreachable,
    /// Per-request deadline elapsed.
    Timeout,
    /// Response was malformed at the transport level.
    ProtocolViolation,
    /// Status fell outside the range permitted for the expected class.
    ContractViolation,
    /// Injection probe was echoed back unescaped.
    ProbeReflected,
}

impl FailureKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unreachable => "Unreachable",
            Self::Timeout => "Timeout",
            Self::ProtocolViolation => "ProtocolViolation",
            Self::ContractViolation => "ContractViolation",
            Self::ProbeReflected => "ProbeReflected",
        }
    }
}

impl From<TransportErrorKind> for FailureKind {
    fn from(value: TransportErrorKind) -> Self {
        match value {
            TransportErrorKind::Unreachable => Self::Unreachable,
            TransportErrorKind::Timeout => Self::Timeout,
            TransportErrorKind::ProtocolViolation => Self::ProtocolViolation,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reason with detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Failure classification.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub detail: String,
}

impl Failure {
    /// Creates a failure reason.
    #[must_use]
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

// ============================================================================
// SECTION: Results
// ============================================================================

/// Compact reference to the case a result belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRef {
    /// Case identifier.
    pub id: CaseId,
    /// Strategy name.
    pub strategy: String,
    /// Expected outcome class.
    pub expected: ExpectedOutcomeClass,
    /// Case carried an injection probe.
    pub probed: bool,
}

impl From<&TestCase> for CaseRef {
    fn from(case: &TestCase) -> Self {
        Self {
            id: case.id.clone(),
            strategy: case.strategy_name().to_string(),
            expected: case.expected,
            probed: case.probe.is_some(),
        }
    }
}

/// Judged result for one executed case.
///
/// # Invariants
/// - At most one of `http_status` and `transport_error` is set.
/// - `failure` is `None` exactly when `passed` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Case the result belongs to.
    pub case: CaseRef,
    /// HTTP status when a response was received.
    pub http_status: Option<u16>,
    /// Transport failure when no response was received.
    pub transport_error: Option<TransportFailure>,
    /// Elapsed latency in milliseconds.
    pub latency_ms: u64,
    /// Attempts made by the executor.
    pub attempts: u8,
    /// Verdict.
    pub passed: bool,
    /// Failure reason when the case failed.
    pub failure: Option<Failure>,
}

// crates/contract-fuzzer-core/src/runtime/judge.rs
// ============================================================================
// Module: Judge
// Description: Pass/fail policy for executed cases.
// Purpose: Map a case and its observed outcome to exactly one verdict.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The judge is a pure, total function. Every `(case, outcome)` pair yields
//! a [`Verdict`]; there is no undecided state and no panic path. Rules apply
//! in a fixed order:
//!
//! 1. Transport failures fail with their own kind.
//! 2. A status outside 100-599 is a protocol violation.
//! 3. A 5xx always fails, whatever the expected class.
//! 4. A 2xx to an injection case fails only if the probe is echoed back.
//! 5. Otherwise the expected class decides.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CaseRef;
use crate::core::ExecutionOutcome;
use crate::core::ExpectedOutcomeClass;
use crate::core::Failure;
use crate::core::FailureKind;
use crate::core::TestCase;
use crate::core::TestResult;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Judge decision for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Case passed.
    Pass,
    /// Case failed with a reason.
    Fail(Failure),
}

impl Verdict {
    /// Returns true when the case passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns the failure reason, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Pass => None,
            Self::Fail(failure) => Some(failure),
        }
    }

    /// Builds a failing verdict.
    fn fail(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Fail(Failure::new(kind, detail))
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Decides the verdict for a case and its observed outcome.
#[must_use]
pub fn evaluate(case: &TestCase, outcome: &ExecutionOutcome) -> Verdict {
    let response = match outcome {
        ExecutionOutcome::Transport(failure) => {
            return Verdict::fail(FailureKind::from(failure.kind), failure.detail.clone());
        }
        ExecutionOutcome::Response(response) => response,
    };
    let status = response.status;

    if !(100 ..= 599).contains(&status) {
        return Verdict::fail(
            FailureKind::ProtocolViolation,
            format!("status {status} outside 100-599"),
        );
    }
    if (500 ..= 599).contains(&status) {
        return Verdict::fail(FailureKind::ContractViolation, format!("server error {status}"));
    }
    if let Some(probe) = case.probe.as_deref()
        && (200 ..= 299).contains(&status)
    {
        if contains_bytes(&response.body, probe.as_bytes()) {
            return Verdict::fail(
                FailureKind::ProbeReflected,
                format!("probe echoed unescaped in {status} response"),
            );
        }
        return Verdict::Pass;
    }
    if class_accepts(case.expected, status) {
        Verdict::Pass
    } else {
        Verdict::fail(
            FailureKind::ContractViolation,
            format!("expected {} for {}, got {status}", class_range(case.expected), case.expected.as_str()),
        )
    }
}

/// Judges a case and packages the verdict as a [`TestResult`].
#[must_use]
pub fn adjudicate(case: &TestCase, outcome: &ExecutionOutcome) -> TestResult {
    let verdict = evaluate(case, outcome);
    let transport_error = match outcome {
        ExecutionOutcome::Transport(failure) => Some(failure.clone()),
        ExecutionOutcome::Response(_) => None,
    };
    TestResult {
        case: CaseRef::from(case),
        http_status: outcome.status(),
        transport_error,
        latency_ms: outcome.latency_ms(),
        attempts: outcome.attempts(),
        passed: verdict.passed(),
        failure: verdict.failure().cloned(),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the status satisfies the expected class.
const fn class_accepts(class: ExpectedOutcomeClass, status: u16) -> bool {
    match class {
        ExpectedOutcomeClass::RejectedAsMalformed => status >= 400 && status <= 499,
        ExpectedOutcomeClass::RejectedAsUnauthorized => status == 401 || status == 403,
        ExpectedOutcomeClass::NeverSucceedWithServerError => status < 500,
    }
}

/// Returns the accepted status range for a class.
const fn class_range(class: ExpectedOutcomeClass) -> &'static str {
    match class {
        ExpectedOutcomeClass::RejectedAsMalformed => "4xx",
        ExpectedOutcomeClass::RejectedAsUnauthorized => "401 or 403",
        ExpectedOutcomeClass::NeverSucceedWithServerError => "non-5xx",
    }
}

/// Returns true when `needle` occurs in `haystack`.
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::contains_bytes;

    #[test]
    fn contains_bytes_handles_empty_and_short_inputs() {
        assert!(!contains_bytes(b"", b"x"));
        assert!(!contains_bytes(b"abc", b""));
        assert!(!contains_bytes(b"ab", b"abc"));
        assert!(contains_bytes(b"xxabcxx", b"abc"));
    }
}

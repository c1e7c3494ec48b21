// crates/contract-fuzzer-core/src/runtime/reporter.rs
// ============================================================================
// Module: Run Reporter
// Description: Aggregation of judged results into per-target runs.
// Purpose: Enforce one result per planned case and present runs in plan order.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`RunReporter`] owns one slot per planned case. Results may arrive in
//! any order; [`RunReporter::finish`] only succeeds once every slot is
//! filled, and the resulting [`FuzzRun`] lists results in plan order. The
//! reporter aggregates and never judges.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

use crate::core::CaseId;
use crate::core::EndpointSignature;
use crate::core::FailureKind;
use crate::core::HashDigest;
use crate::core::TestResult;
use crate::core::Timestamp;
use crate::runtime::engine::EngineError;
use crate::runtime::generator::CasePlan;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reporter errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// A planned case has no recorded result.
    #[error("missing result for case {case_id} at index {index}")]
    MissingResult {
        /// Plan index.
        index: usize,
        /// Case identifier.
        case_id: CaseId,
    },
    /// A result was recorded for an index outside the plan.
    #[error("result index {index} out of range for {len} cases")]
    IndexOutOfRange {
        /// Offending index.
        index: usize,
        /// Plan length.
        len: usize,
    },
    /// A second result was recorded for the same case.
    #[error("duplicate result for case {0}")]
    DuplicateResult(CaseId),
}

// ============================================================================
// SECTION: Runs
// ============================================================================

/// Judged results for one target in one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuzzRun {
    /// Endpoint signature.
    pub target: EndpointSignature,
    /// Caller-supplied start time.
    pub started_at: Timestamp,
    /// Plan fingerprint.
    pub plan_hash: HashDigest,
    /// Results in plan order.
    pub results: Vec<TestResult>,
}

/// Caller-facing projection of one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunEntry {
    /// Case identifier.
    pub test_case: CaseId,
    /// HTTP status, if a response was received.
    pub status: Option<u16>,
    /// Verdict.
    pub passed: bool,
    /// Failure reason, if the case failed.
    pub error: Option<String>,
}

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Total cases.
    pub total: usize,
    /// Passed cases.
    pub passed: usize,
    /// Failed cases.
    pub failed: usize,
    /// Failed cases per failure kind.
    pub by_failure: BTreeMap<FailureKind, usize>,
}

impl RunSummary {
    /// Returns true when no case failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl FuzzRun {
    /// Returns true when every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|result| result.passed)
    }

    /// Returns aggregate counts.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.results.len(),
            ..RunSummary::default()
        };
        for result in &self.results {
            if result.passed {
                summary.passed += 1;
                continue;
            }
            summary.failed += 1;
            if let Some(failure) = &result.failure {
                *summary.by_failure.entry(failure.kind).or_insert(0) += 1;
            }
        }
        summary
    }

    /// Projects results into caller-facing entries.
    #[must_use]
    pub fn entries(&self) -> Vec<RunEntry> {
        self.results
            .iter()
            .map(|result| RunEntry {
                test_case: result.case.id.clone(),
                status: result.http_status,
                passed: result.passed,
                error: result.failure.as_ref().map(ToString::to_string),
            })
            .collect()
    }
}

// ============================================================================
// SECTION: Reporter
// ============================================================================

/// Collects results for one case plan.
#[derive(Debug)]
pub struct RunReporter {
    /// Endpoint signature.
    target: EndpointSignature,
    /// Caller-supplied start time.
    started_at: Timestamp,
    /// Plan fingerprint.
    plan_hash: HashDigest,
    /// Case identifiers in plan order.
    case_ids: Vec<CaseId>,
    /// Result slots in plan order.
    slots: Vec<Option<TestResult>>,
}

impl RunReporter {
    /// Creates a reporter with one empty slot per planned case.
    #[must_use]
    pub fn new(plan: &CasePlan, started_at: Timestamp) -> Self {
        Self {
            target: plan.signature.clone(),
            started_at,
            plan_hash: plan.plan_hash.clone(),
            case_ids: plan.case_ids(),
            slots: vec![None; plan.len()],
        }
    }

    /// Returns the number of recorded results.
    #[must_use]
    pub fn recorded(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true when the slot at `index` holds a result.
    #[must_use]
    pub fn is_recorded(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(Option::is_some)
    }

    /// Records the result for the case at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::IndexOutOfRange`] for an index outside the plan
    /// and [`ReportError::DuplicateResult`] when the slot is already filled.
    pub fn record(&mut self, index: usize, result: TestResult) -> Result<(), ReportError> {
        let len = self.slots.len();
        let slot = self.slots.get_mut(index).ok_or(ReportError::IndexOutOfRange {
            index,
            len,
        })?;
        if slot.is_some() {
            return Err(ReportError::DuplicateResult(result.case.id));
        }
        *slot = Some(result);
        Ok(())
    }

    /// Completes the run.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingResult`] for the first empty slot.
    pub fn finish(self) -> Result<FuzzRun, ReportError> {
        let mut results = Vec::with_capacity(self.slots.len());
        for (index, (slot, case_id)) in self.slots.into_iter().zip(self.case_ids).enumerate() {
            let result = slot.ok_or(ReportError::MissingResult {
                index,
                case_id,
            })?;
            results.push(result);
        }
        Ok(FuzzRun {
            target: self.target,
            started_at: self.started_at,
            plan_hash: self.plan_hash,
            results,
        })
    }
}

// ============================================================================
// SECTION: Invocation Report
// ============================================================================

/// Outcome for one requested target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TargetOutcome {
    /// Target was fuzzed.
    Completed(FuzzRun),
    /// Target was rejected before any request was sent.
    Rejected {
        /// Requested target.
        target: String,
        /// Rejection reason.
        #[serde(serialize_with = "serialize_display")]
        error: EngineError,
    },
}

impl TargetOutcome {
    /// Returns true when the target completed with every case passing.
    #[must_use]
    pub fn passed(&self) -> bool {
        match self {
            Self::Completed(run) => run.all_passed(),
            Self::Rejected {
                ..
            } => false,
        }
    }
}

/// Per-target outcomes for one invocation, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvocationReport {
    /// Target outcomes in request order.
    pub outcomes: Vec<TargetOutcome>,
}

impl InvocationReport {
    /// Returns true when every target completed and every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(TargetOutcome::passed)
    }

    /// Iterates completed runs.
    pub fn runs(&self) -> impl Iterator<Item = &FuzzRun> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            TargetOutcome::Completed(run) => Some(run),
            TargetOutcome::Rejected {
                ..
            } => None,
        })
    }

    /// Returns the number of rejected targets.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, TargetOutcome::Rejected { .. }))
            .count()
    }
}

/// Serializes a value through its [`Display`] form.
fn serialize_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

// crates/contract-fuzzer-core/src/runtime/engine.rs
// ============================================================================
// Module: Fuzz Engine
// Description: Bounded-concurrency execution of case plans.
// Purpose: Turn target signatures into judged, ordered fuzz runs.
// Dependencies: crate::{core, interfaces}, thiserror, tokio
// ============================================================================

//! ## Overview
//! The engine resolves and plans every requested target before sending a
//! single request, then processes targets one at a time. Within a target,
//! cases run as independent tasks gated by a semaphore. Each task tags its
//! result with the plan index, so the report follows plan order regardless
//! of completion order. A task that fails to join still yields a failed
//! result for its case.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::CaseRef;
use crate::core::ContractSpec;
use crate::core::EndpointSignature;
use crate::core::Failure;
use crate::core::FailureKind;
use crate::core::TestResult;
use crate::core::Timestamp;
use crate::interfaces::CaseExecutor;
use crate::interfaces::FuzzEvent;
use crate::interfaces::FuzzEventSink;
use crate::runtime::catalog::CatalogError;
use crate::runtime::catalog::ContractCatalog;
use crate::runtime::generator::CaseGenerator;
use crate::runtime::generator::CasePlan;
use crate::runtime::generator::GeneratorError;
use crate::runtime::judge;
use crate::runtime::reporter::FuzzRun;
use crate::runtime::reporter::InvocationReport;
use crate::runtime::reporter::ReportError;
use crate::runtime::reporter::RunReporter;
use crate::runtime::reporter::TargetOutcome;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default number of requests in flight per target.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
/// Upper bound on requests in flight per target.
pub const MAX_CONCURRENCY_LIMIT: usize = 8;

/// Failure detail recorded when a case task does not complete.
const TASK_ABORTED_DETAIL: &str = "executor task aborted";

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum requests in flight per target.
    pub max_concurrency: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl EngineConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when concurrency is out of range.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_concurrency == 0 || self.max_concurrency > MAX_CONCURRENCY_LIMIT {
            return Err(EngineError::InvalidConfig(format!(
                "max_concurrency must be between 1 and {MAX_CONCURRENCY_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Run-level engine errors. Case-level failures are never reported here.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Target could not be resolved.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Case plan could not be generated.
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    /// Results could not be assembled.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Engine configuration is invalid.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Drives case plans through an executor and the judge.
pub struct FuzzEngine<E, S> {
    /// Read-only contract catalog.
    catalog: Arc<ContractCatalog>,
    /// Case generator.
    generator: CaseGenerator,
    /// Shared executor.
    executor: Arc<E>,
    /// Event sink.
    sink: S,
    /// Engine configuration.
    config: EngineConfig,
}

impl<E, S> FuzzEngine<E, S>
where
    E: CaseExecutor + 'static,
    S: FuzzEventSink,
{
    /// Creates an engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when the configuration is rejected.
    pub fn new(
        catalog: Arc<ContractCatalog>,
        generator: CaseGenerator,
        executor: E,
        sink: S,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            catalog,
            generator,
            executor: Arc::new(executor),
            sink,
            config,
        })
    }

    /// Returns the contract catalog.
    #[must_use]
    pub fn catalog(&self) -> &ContractCatalog {
        &self.catalog
    }

    /// Resolves a target and generates its case plan without executing it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the target is unknown or planning fails.
    pub fn plan(&self, target: &str) -> Result<(Arc<ContractSpec>, CasePlan), EngineError> {
        let contract = self.catalog.resolve(target)?;
        let plan = self.generator.plan(&contract)?;
        Ok((contract, plan))
    }

    /// Fuzzes a single target.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the target is unknown or planning fails.
    pub async fn fuzz_target(
        &self,
        target: &str,
        started_at: Timestamp,
    ) -> Result<FuzzRun, EngineError> {
        let (contract, plan) = self.plan(target)?;
        self.run_plan(contract, plan, started_at).await
    }

    /// Fuzzes every target in order.
    ///
    /// All targets are resolved and planned before the first request is
    /// sent. Rejected targets are reported in place and never stop the
    /// remaining targets. `clock` supplies the start time of each run.
    pub async fn fuzz_targets<T, F>(&self, targets: &[T], mut clock: F) -> InvocationReport
    where
        T: AsRef<str>,
        F: FnMut() -> Timestamp,
    {
        let mut prepared = Vec::with_capacity(targets.len());
        for (target, resolved) in self.catalog.resolve_all(targets) {
            let planned = resolved.map_err(EngineError::from).and_then(|contract| {
                let plan = self.generator.plan(&contract)?;
                Ok((contract, plan))
            });
            if let Err(err) = &planned {
                self.sink.record(&FuzzEvent::TargetRejected {
                    target: target.clone(),
                    error: err.to_string(),
                });
            }
            prepared.push((target, planned));
        }

        let mut report = InvocationReport::default();
        for (target, planned) in prepared {
            let outcome = match planned {
                Ok((contract, plan)) => match self.run_plan(contract, plan, clock()).await {
                    Ok(run) => TargetOutcome::Completed(run),
                    Err(error) => TargetOutcome::Rejected {
                        target,
                        error,
                    },
                },
                Err(error) => TargetOutcome::Rejected {
                    target,
                    error,
                },
            };
            report.outcomes.push(outcome);
        }
        report
    }

    /// Executes a prepared plan and assembles the run.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Report`] when results cannot be assembled.
    pub async fn run_plan(
        &self,
        contract: Arc<ContractSpec>,
        plan: CasePlan,
        started_at: Timestamp,
    ) -> Result<FuzzRun, EngineError> {
        let target = plan.signature.clone();
        self.sink.record(&FuzzEvent::RunStarted {
            target: target.clone(),
            case_count: plan.len(),
            plan_hash: plan.plan_hash.clone(),
        });

        let mut reporter = RunReporter::new(&plan, started_at);
        let case_refs: Vec<CaseRef> = plan.cases.iter().map(CaseRef::from).collect();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut tasks = JoinSet::new();

        for (index, case) in plan.cases.into_iter().enumerate() {
            let permit = Arc::clone(&semaphore).acquire_owned().await.ok();
            let executor = Arc::clone(&self.executor);
            let contract = Arc::clone(&contract);
            tasks.spawn(async move {
                let outcome = executor.execute(&contract, &case).await;
                drop(permit);
                (index, judge::adjudicate(&case, &outcome))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Ok((index, result)) = joined {
                self.emit_case(&target, &result);
                reporter.record(index, result)?;
            }
        }

        for (index, case) in case_refs.into_iter().enumerate() {
            if reporter.is_recorded(index) {
                continue;
            }
            let result = aborted_result(case);
            self.emit_case(&target, &result);
            reporter.record(index, result)?;
        }

        let run = reporter.finish()?;
        let summary = run.summary();
        self.sink.record(&FuzzEvent::RunFinished {
            target,
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
        });
        Ok(run)
    }

    /// Emits a case completion event.
    fn emit_case(&self, target: &EndpointSignature, result: &TestResult) {
        self.sink.record(&FuzzEvent::CaseCompleted {
            target: target.clone(),
            case_id: result.case.id.clone(),
            http_status: result.http_status,
            passed: result.passed,
            failure: result.failure.as_ref().map(|failure| failure.kind),
            latency_ms: result.latency_ms,
            attempts: result.attempts,
        });
    }
}

/// Builds the failed result for a case whose task did not complete.
fn aborted_result(case: CaseRef) -> TestResult {
    TestResult {
        case,
        http_status: None,
        transport_error: None,
        latency_ms: 0,
        attempts: 0,
        passed: false,
        failure: Some(Failure::new(FailureKind::ProtocolViolation, TASK_ABORTED_DETAIL)),
    }
}

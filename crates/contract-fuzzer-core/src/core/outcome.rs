// crates/contract-fuzzer-core/src/core/outcome.rs
// ============================================================================
// Module: Execution Outcomes
// Description: Terminal executor observations for a single case.
// Purpose: Carry exactly one of a response or a transport failure to the judge.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Executors report an [`ExecutionOutcome`] for every case. The enum makes
//! "status xor transport error" structural: no outcome can carry both, and
//! no case can reach the judge without one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Transport Failures
// ============================================================================

/// Transport-level failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// Connection could not be established or was reset.
    Unreachable,
    /// Per-request deadline elapsed.
    Timeout,
    /// Response was malformed at the transport or parsing level.
    ProtocolViolation,
}

impl TransportErrorKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::Timeout => "timeout",
            Self::ProtocolViolation => "protocol_violation",
        }
    }
}

/// Transport failure observed while executing a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportFailure {
    /// Failure classification.
    pub kind: TransportErrorKind,
    /// Human-readable detail.
    pub detail: String,
    /// Elapsed time across all attempts, in milliseconds.
    pub latency_ms: u64,
    /// Number of attempts made.
    pub attempts: u8,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// HTTP response observed while executing a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, bounded by the executor's size limit.
    pub body: Vec<u8>,
    /// Body was cut at the size limit.
    pub body_truncated: bool,
    /// Elapsed time across all attempts, in milliseconds.
    pub latency_ms: u64,
    /// Number of attempts made.
    pub attempts: u8,
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Terminal executor outcome for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// A response was received.
    Response(ObservedResponse),
    /// No usable response was received.
    Transport(TransportFailure),
}

impl ExecutionOutcome {
    /// Returns the HTTP status when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(response) => Some(response.status),
            Self::Transport(_) => None,
        }
    }

    /// Returns the elapsed latency in milliseconds.
    #[must_use]
    pub const fn latency_ms(&self) -> u64 {
        match self {
            Self::Response(response) => response.latency_ms,
            Self::Transport(failure) => failure.latency_ms,
        }
    }

    /// Returns the number of attempts made.
    #[must_use]
    pub const fn attempts(&self) -> u8 {
        match self {
            Self::Response(response) => response.attempts,
            Self::Transport(failure) => failure.attempts,
        }
    }
}

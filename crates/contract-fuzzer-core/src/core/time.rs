// crates/contract-fuzzer-core/src/core/time.rs
// ============================================================================
// Module: Contract Fuzzer Time Model
// Description: Canonical timestamp representation for fuzz runs.
// Purpose: Keep the engine free of wall-clock reads.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The engine never reads wall-clock time directly; callers stamp each run
//! with a [`Timestamp`] so that replays against a deterministic target yield
//! identical reports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used in fuzz run reports.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }
}

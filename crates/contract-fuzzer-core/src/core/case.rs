// crates/contract-fuzzer-core/src/core/case.rs
// ============================================================================
// Module: Fuzz Cases
// Description: Mutation strategies, expected outcome classes, and test cases.
// Purpose: Represent generated requests as a closed set of tagged variants.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every generated request is a [`TestCase`] tagged with the
//! [`MutationStrategy`] that produced it. The strategy determines both the
//! stable case identifier and the [`ExpectedOutcomeClass`], so adding a new
//! strategy forces a decision about how it is judged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::CaseId;
use crate::core::identifiers::FieldName;

// ============================================================================
// SECTION: Expected Outcomes
// ============================================================================

/// Outcome class a case is expected to provoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedOutcomeClass {
    /// Request must be rejected with a 4xx status.
    RejectedAsMalformed,
    /// Request must be rejected with 401 or 403.
    RejectedAsUnauthorized,
    /// Any response except a 5xx is acceptable.
    NeverSucceedWithServerError,
}

impl ExpectedOutcomeClass {
    /// Returns a stable label for the class.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RejectedAsMalformed => "rejected_as_malformed",
            Self::RejectedAsUnauthorized => "rejected_as_unauthorized",
            Self::NeverSucceedWithServerError => "never_succeed_with_server_error",
        }
    }
}

// ============================================================================
// SECTION: Strategy Parameters
// ============================================================================

/// Boundary values applied to typed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    /// Empty string.
    EmptyString,
    /// String one past the declared maximum, or at the policy ceiling.
    MaxLengthString,
    /// Numeric zero.
    Zero,
    /// Negative number.
    NegativeNumber,
}

impl BoundaryKind {
    /// Returns a stable label for the boundary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyString => "empty_string",
            Self::MaxLengthString => "max_length_string",
            Self::Zero => "zero",
            Self::NegativeNumber => "negative_number",
        }
    }
}

/// Syntactic defects applied to the encoded request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingDefect {
    /// JSON document cut off before its closing delimiter.
    TruncatedStructure,
    /// Body bytes that are not valid UTF-8.
    InvalidUtf8,
}

impl EncodingDefect {
    /// Returns a stable label for the defect.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TruncatedStructure => "truncated_structure",
            Self::InvalidUtf8 => "invalid_utf8",
        }
    }
}

/// Injection probes placed into string fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// HTML script element.
    ScriptTag,
    /// SQL quote breakout.
    SqlQuote,
    /// Relative path traversal.
    PathTraversal,
    /// Embedded NUL byte.
    NullByte,
}

impl ProbeKind {
    /// All probes in generation order.
    pub const ALL: [Self; 4] = [Self::ScriptTag, Self::SqlQuote, Self::PathTraversal, Self::NullByte];

    /// Returns a stable label for the probe.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScriptTag => "script_tag",
            Self::SqlQuote => "sql_quote",
            Self::PathTraversal => "path_traversal",
            Self::NullByte => "null_byte",
        }
    }

    /// Returns the raw probe string injected into the field.
    #[must_use]
    pub const fn payload(self) -> &'static str {
        match self {
            Self::ScriptTag => "<script>alert('contract-fuzzer')</script>",
            Self::SqlQuote => "' OR '1'='1' --",
            Self::PathTraversal => "../../../../etc/passwd",
            Self::NullByte => "contract-fuzzer\u{0}probe",
        }
    }
}

// ============================================================================
// SECTION: Mutation Strategies
// ============================================================================

/// Mutation strategy that produced a case.
///
/// # Invariants
/// - Each variant maps to exactly one expected outcome class.
/// - Case identifiers are derived solely from the variant and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum MutationStrategy {
    /// Well-formed request derived from the contract.
    Baseline,
    /// Required field omitted.
    MissingField {
        /// Omitted field.
        field: FieldName,
    },
    /// Typed field replaced with an incompatible type.
    WrongType {
        /// Mutated field.
        field: FieldName,
    },
    /// Typed field set to a boundary value.
    BoundaryValue {
        /// Mutated field.
        field: FieldName,
        /// Applied boundary.
        kind: BoundaryKind,
    },
    /// Body padded past the oversized ceiling.
    OversizedPayload,
    /// Body made syntactically invalid.
    MalformedEncoding {
        /// Applied defect.
        defect: EncodingDefect,
    },
    /// String field carrying an injection probe.
    InjectionProbe {
        /// Mutated field.
        field: FieldName,
        /// Injected probe.
        probe: ProbeKind,
    },
    /// Credentials omitted on an endpoint that requires them.
    Unauthenticated,
}

impl MutationStrategy {
    /// Returns the stable strategy name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::MissingField {
                ..
            } => "missing_field",
            Self::WrongType {
                ..
            } => "wrong_type",
            Self::BoundaryValue {
                ..
            } => "boundary",
            Self::OversizedPayload => "oversized_payload",
            Self::MalformedEncoding {
                ..
            } => "malformed_encoding",
            Self::InjectionProbe {
                ..
            } => "injection",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    /// Returns the outcome class this strategy must provoke.
    #[must_use]
    pub const fn expected_outcome(&self) -> ExpectedOutcomeClass {
        match self {
            Self::Baseline => ExpectedOutcomeClass::NeverSucceedWithServerError,
            Self::Unauthenticated => ExpectedOutcomeClass::RejectedAsUnauthorized,
            Self::MissingField {
                ..
            }
            | Self::WrongType {
                ..
            }
            | Self::BoundaryValue {
                ..
            }
            | Self::OversizedPayload
            | Self::MalformedEncoding {
                ..
            }
            | Self::InjectionProbe {
                ..
            } => ExpectedOutcomeClass::RejectedAsMalformed,
        }
    }

    /// Returns the stable case identifier for this strategy.
    #[must_use]
    pub fn case_id(&self) -> CaseId {
        let name = self.name();
        match self {
            Self::Baseline | Self::OversizedPayload | Self::Unauthenticated => CaseId::new(name),
            Self::MissingField {
                field,
            }
            | Self::WrongType {
                field,
            } => CaseId::new(format!("{name}.{field}")),
            Self::BoundaryValue {
                field,
                kind,
            } => CaseId::new(format!("{name}.{field}.{}", kind.as_str())),
            Self::MalformedEncoding {
                defect,
            } => CaseId::new(format!("{name}.{}", defect.as_str())),
            Self::InjectionProbe {
                field,
                probe,
            } => CaseId::new(format!("{name}.{field}.{}", probe.as_str())),
        }
    }
}

// ============================================================================
// SECTION: Test Case
// ============================================================================

/// One concrete request derived from a contract by a mutation strategy.
///
/// # Invariants
/// - `expected` equals `strategy.expected_outcome()`.
/// - `probe` is set only for [`MutationStrategy::InjectionProbe`].
/// - Consumed exactly once by an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Stable case identifier.
    pub id: CaseId,
    /// Strategy that produced the case.
    pub strategy: MutationStrategy,
    /// Expected outcome class.
    pub expected: ExpectedOutcomeClass,
    /// Request headers, excluding credentials.
    pub headers: BTreeMap<String, String>,
    /// Encoded request body.
    pub body: Vec<u8>,
    /// Executor attaches configured credentials.
    pub with_credentials: bool,
    /// Raw injection probe carried by the body.
    pub probe: Option<String>,
}

impl TestCase {
    /// Returns the stable strategy name.
    #[must_use]
    pub const fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

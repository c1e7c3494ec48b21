// crates/contract-fuzzer-core/src/runtime/generator.rs
// ============================================================================
// Module: Case Generator
// Description: Deterministic mutation of contracts into test cases.
// Purpose: Produce an ordered, reproducible case plan per contract.
// Dependencies: crate::core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Generation is pure. A contract always yields the same ordered cases with
//! the same identifiers, and the plan hash fingerprints the whole sequence
//! so two sessions can be compared without diffing megabyte bodies.
//!
//! Strategy order: baseline, missing field, wrong type, boundary value,
//! oversized payload, malformed encoding, injection probe, unauthenticated.
//! Fields are visited in lexicographic order within each strategy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::BoundaryKind;
use crate::core::CaseId;
use crate::core::ContractSpec;
use crate::core::DEFAULT_HASH_ALGORITHM;
use crate::core::EncodingDefect;
use crate::core::EndpointSignature;
use crate::core::ExpectedOutcomeClass;
use crate::core::FieldName;
use crate::core::HashDigest;
use crate::core::MutationStrategy;
use crate::core::ProbeKind;
use crate::core::TestCase;
use crate::core::TypeTag;
use crate::core::hashing::hash_bytes;
use crate::core::hashing::hash_canonical_json;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default ceiling for generated maximum-length strings.
pub const DEFAULT_MAX_STRING_BYTES: usize = 1024 * 1024;
/// Default size an oversized payload must exceed.
pub const DEFAULT_OVERSIZED_BODY_BYTES: usize = 4 * 1024 * 1024;
/// Content type declared on every generated body.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Body key used to pad oversized payloads.
pub const PADDING_FIELD: &str = "contract_fuzzer_padding";

/// Placeholder text used for synthesized string fields.
const SAMPLE_STRING: &str = "contract-fuzzer";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Generator errors. These abort the run for one target.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// Policy values are inconsistent.
    #[error("invalid generator policy: {0}")]
    InvalidPolicy(String),
    /// A request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encoding(String),
    /// The plan fingerprint could not be computed.
    #[error("failed to fingerprint case plan: {0}")]
    Fingerprint(String),
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Size policy applied during generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorPolicy {
    /// Length of the maximum-length string when a field declares no maximum.
    pub max_string_bytes: usize,
    /// Size the oversized payload body must exceed.
    pub oversized_body_bytes: usize,
}

impl Default for GeneratorPolicy {
    fn default() -> Self {
        Self {
            max_string_bytes: DEFAULT_MAX_STRING_BYTES,
            oversized_body_bytes: DEFAULT_OVERSIZED_BODY_BYTES,
        }
    }
}

impl GeneratorPolicy {
    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidPolicy`] when a limit is zero or the
    /// oversized ceiling does not exceed the string ceiling.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.max_string_bytes == 0 {
            return Err(GeneratorError::InvalidPolicy(
                "max_string_bytes must be greater than zero".to_string(),
            ));
        }
        if self.oversized_body_bytes <= self.max_string_bytes {
            return Err(GeneratorError::InvalidPolicy(
                "oversized_body_bytes must be greater than max_string_bytes".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Case Plan
// ============================================================================

/// Ordered cases generated for one contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePlan {
    /// Endpoint signature the plan targets.
    pub signature: EndpointSignature,
    /// Cases in execution and report order.
    pub cases: Vec<TestCase>,
    /// Canonical digest over case fingerprints.
    pub plan_hash: HashDigest,
}

impl CasePlan {
    /// Returns the number of planned cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when the plan contains no cases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns case identifiers in plan order.
    #[must_use]
    pub fn case_ids(&self) -> Vec<CaseId> {
        self.cases.iter().map(|case| case.id.clone()).collect()
    }
}

/// Hashed projection of a case.
#[derive(Serialize)]
struct CaseFingerprint<'a> {
    /// Case identifier.
    id: &'a CaseId,
    /// Strategy name.
    strategy: &'static str,
    /// Expected outcome class.
    expected: ExpectedOutcomeClass,
    /// Credentials flag.
    with_credentials: bool,
    /// Raw probe, if any.
    probe: Option<&'a str>,
    /// Digest of the encoded body.
    body_hash: HashDigest,
}

/// Hashed projection of a plan.
#[derive(Serialize)]
struct PlanFingerprint<'a> {
    /// Endpoint signature.
    signature: String,
    /// Case fingerprints in plan order.
    cases: Vec<CaseFingerprint<'a>>,
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Deterministic case generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseGenerator {
    /// Size policy.
    policy: GeneratorPolicy,
}

impl CaseGenerator {
    /// Creates a generator with a validated policy.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidPolicy`] when the policy is rejected.
    pub fn new(policy: GeneratorPolicy) -> Result<Self, GeneratorError> {
        policy.validate()?;
        Ok(Self {
            policy,
        })
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> GeneratorPolicy {
        self.policy
    }

    /// Generates the ordered case plan for a contract.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] when a body cannot be encoded or the plan
    /// cannot be fingerprinted.
    pub fn plan(&self, contract: &ContractSpec) -> Result<CasePlan, GeneratorError> {
        let baseline = baseline_body(contract);
        let baseline_bytes = encode(&baseline)?;
        let authed = contract.requires_auth;
        let mut cases = Vec::new();

        cases.push(build_case(MutationStrategy::Baseline, baseline_bytes.clone(), authed, None));

        for field in &contract.required_fields {
            let mut body = baseline.clone();
            body.remove(field.as_str());
            let strategy = MutationStrategy::MissingField {
                field: field.clone(),
            };
            cases.push(build_case(strategy, encode(&body)?, authed, None));
        }

        for (field, tag) in &contract.field_types {
            let body = with_field(&baseline, field, wrong_type_value(*tag));
            let strategy = MutationStrategy::WrongType {
                field: field.clone(),
            };
            cases.push(build_case(strategy, encode(&body)?, authed, None));
        }

        for (field, tag) in &contract.field_types {
            for kind in tag.rejected_boundaries() {
                let value = self.boundary_value(*tag, kind);
                let body = with_field(&baseline, field, value);
                let strategy = MutationStrategy::BoundaryValue {
                    field: field.clone(),
                    kind,
                };
                cases.push(build_case(strategy, encode(&body)?, authed, None));
            }
        }

        let padding = Value::String("x".repeat(self.policy.oversized_body_bytes));
        let oversized = with_field(&baseline, &FieldName::new(PADDING_FIELD), padding);
        cases.push(build_case(MutationStrategy::OversizedPayload, encode(&oversized)?, authed, None));

        for defect in [EncodingDefect::TruncatedStructure, EncodingDefect::InvalidUtf8] {
            let strategy = MutationStrategy::MalformedEncoding {
                defect,
            };
            cases.push(build_case(strategy, malformed_body(&baseline_bytes, defect), authed, None));
        }

        for (field, tag) in &contract.field_types {
            if !matches!(tag, TypeTag::String { .. }) {
                continue;
            }
            for probe in ProbeKind::ALL {
                let payload = probe.payload();
                let body = with_field(&baseline, field, Value::String(payload.to_string()));
                let strategy = MutationStrategy::InjectionProbe {
                    field: field.clone(),
                    probe,
                };
                cases.push(build_case(strategy, encode(&body)?, authed, Some(payload)));
            }
        }

        if contract.requires_auth {
            cases.push(build_case(MutationStrategy::Unauthenticated, baseline_bytes, false, None));
        }

        let plan_hash = fingerprint(&contract.signature, &cases)?;
        Ok(CasePlan {
            signature: contract.signature.clone(),
            cases,
            plan_hash,
        })
    }

    /// Returns the boundary value for a typed field.
    fn boundary_value(&self, tag: TypeTag, kind: BoundaryKind) -> Value {
        let float = matches!(tag, TypeTag::Number { .. });
        match kind {
            BoundaryKind::EmptyString => Value::String(String::new()),
            BoundaryKind::MaxLengthString => {
                let length = match tag {
                    TypeTag::String {
                        max_length: Some(max),
                        ..
                    } => max.saturating_add(1),
                    _ => self.policy.max_string_bytes,
                };
                Value::String("a".repeat(length))
            }
            BoundaryKind::Zero if float => json!(0.0),
            BoundaryKind::Zero => json!(0),
            BoundaryKind::NegativeNumber if float => json!(-1.5),
            BoundaryKind::NegativeNumber => json!(-1),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a case from its strategy and encoded body.
fn build_case(
    strategy: MutationStrategy,
    body: Vec<u8>,
    with_credentials: bool,
    probe: Option<&str>,
) -> TestCase {
    let mut headers = BTreeMap::new();
    headers.insert("content-type".to_string(), JSON_CONTENT_TYPE.to_string());
    TestCase {
        id: strategy.case_id(),
        expected: strategy.expected_outcome(),
        strategy,
        headers,
        body,
        with_credentials,
        probe: probe.map(ToString::to_string),
    }
}

/// Returns the well-formed baseline body for a contract.
fn baseline_body(contract: &ContractSpec) -> Map<String, Value> {
    let mut body = contract.sample_body.clone().unwrap_or_default();
    for (field, tag) in &contract.field_types {
        if !body.contains_key(field.as_str()) {
            body.insert(field.as_str().to_string(), sample_value(*tag));
        }
    }
    for field in &contract.required_fields {
        if !body.contains_key(field.as_str()) {
            body.insert(field.as_str().to_string(), Value::String(SAMPLE_STRING.to_string()));
        }
    }
    body
}

/// Returns a value the type accepts without hitting a rejected boundary.
fn sample_value(tag: TypeTag) -> Value {
    match tag {
        TypeTag::String {
            max_length,
            ..
        } => {
            let limit = max_length.unwrap_or(SAMPLE_STRING.len());
            Value::String(SAMPLE_STRING.chars().take(limit).collect())
        }
        TypeTag::Integer {
            ..
        } => json!(1),
        TypeTag::Number {
            ..
        } => json!(1.5),
        TypeTag::Boolean => Value::Bool(true),
        TypeTag::Array => Value::Array(Vec::new()),
        TypeTag::Object => Value::Object(Map::new()),
    }
}

/// Returns a value of a type incompatible with the tag.
fn wrong_type_value(tag: TypeTag) -> Value {
    match tag {
        TypeTag::String {
            ..
        } => json!(12345),
        TypeTag::Integer {
            ..
        }
        | TypeTag::Number {
            ..
        } => Value::String("not-a-number".to_string()),
        TypeTag::Boolean => Value::String("not-a-boolean".to_string()),
        TypeTag::Array => Value::Object(Map::new()),
        TypeTag::Object => Value::Array(Vec::new()),
    }
}

/// Returns a copy of the body with one field replaced.
fn with_field(body: &Map<String, Value>, field: &FieldName, value: Value) -> Map<String, Value> {
    let mut body = body.clone();
    body.insert(field.as_str().to_string(), value);
    body
}

/// Encodes a JSON object body.
fn encode(body: &Map<String, Value>) -> Result<Vec<u8>, GeneratorError> {
    serde_json::to_vec(body).map_err(|err| GeneratorError::Encoding(err.to_string()))
}

/// Applies a syntactic defect to an encoded baseline object.
fn malformed_body(baseline: &[u8], defect: EncodingDefect) -> Vec<u8> {
    match defect {
        EncodingDefect::TruncatedStructure => match baseline.split_last() {
            Some((_, head)) if !head.is_empty() => head.to_vec(),
            _ => b"{".to_vec(),
        },
        EncodingDefect::InvalidUtf8 => {
            let mut body = b"{\"".to_vec();
            body.extend_from_slice(&[0xff, 0xfe]);
            body.extend_from_slice(b"\":0");
            match baseline.get(1 ..) {
                Some(rest) if rest.len() > 1 => {
                    body.push(b',');
                    body.extend_from_slice(rest);
                }
                _ => body.push(b'}'),
            }
            body
        }
    }
}

/// Computes the plan hash.
fn fingerprint(
    signature: &EndpointSignature,
    cases: &[TestCase],
) -> Result<HashDigest, GeneratorError> {
    let fingerprint = PlanFingerprint {
        signature: signature.to_string(),
        cases: cases
            .iter()
            .map(|case| CaseFingerprint {
                id: &case.id,
                strategy: case.strategy_name(),
                expected: case.expected,
                with_credentials: case.with_credentials,
                probe: case.probe.as_deref(),
                body_hash: hash_bytes(DEFAULT_HASH_ALGORITHM, &case.body),
            })
            .collect(),
    };
    hash_canonical_json(DEFAULT_HASH_ALGORITHM, &fingerprint)
        .map_err(|err| GeneratorError::Fingerprint(err.to_string()))
}

// crates/contract-fuzzer-core/tests/generator.rs
// ============================================================================
// Module: Case Generator Tests
// Description: Strategy coverage, ordering, and determinism of case plans.
// Purpose: Ensure every applicable strategy is generated exactly once per target.
// ============================================================================

//! Case generator tests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;

use contract_fuzzer_core::CaseGenerator;
use contract_fuzzer_core::CasePlan;
use contract_fuzzer_core::ContractSpec;
use contract_fuzzer_core::ExpectedOutcomeClass;
use contract_fuzzer_core::FieldName;
use contract_fuzzer_core::GeneratorError;
use contract_fuzzer_core::GeneratorPolicy;
use contract_fuzzer_core::MutationStrategy;
use contract_fuzzer_core::ProbeKind;
use contract_fuzzer_core::TestCase;
use contract_fuzzer_core::TypeTag;
use proptest::prelude::*;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const POLICY: GeneratorPolicy = GeneratorPolicy {
    max_string_bytes: 64,
    oversized_body_bytes: 256,
};

fn generator() -> CaseGenerator {
    CaseGenerator::new(POLICY).unwrap()
}

fn contract(signature: &str, required: &[&str]) -> ContractSpec {
    let mut contract = ContractSpec::new(signature.parse().unwrap());
    contract.required_fields = required.iter().copied().map(FieldName::from).collect();
    contract
}

fn typed_contract() -> ContractSpec {
    let mut contract = contract("POST /api/v1/chat/generate", &["name"]);
    contract.field_types.insert(
        FieldName::from("name"),
        TypeTag::String {
            allow_empty: false,
            max_length: Some(8),
        },
    );
    contract.field_types.insert(
        FieldName::from("count"),
        TypeTag::Integer {
            allow_zero: true,
            allow_negative: false,
        },
    );
    contract.field_types.insert(FieldName::from("flag"), TypeTag::Boolean);
    contract.requires_auth = true;
    contract
}

fn ids(plan: &CasePlan) -> Vec<&str> {
    plan.cases.iter().map(|case| case.id.as_str()).collect()
}

fn case<'a>(plan: &'a CasePlan, id: &str) -> &'a TestCase {
    plan.cases.iter().find(|case| case.id.as_str() == id).unwrap()
}

fn json_body(case: &TestCase) -> Map<String, Value> {
    match serde_json::from_slice(&case.body).unwrap() {
        Value::Object(map) => map,
        other => panic!("expected object body, got {other}"),
    }
}

// ============================================================================
// SECTION: Strategy Coverage
// ============================================================================

#[test]
fn one_missing_field_case_per_required_field() {
    let plan = generator().plan(&contract("POST /x", &["a", "b"])).unwrap();
    let missing: Vec<&TestCase> = plan
        .cases
        .iter()
        .filter(|case| matches!(case.strategy, MutationStrategy::MissingField { .. }))
        .collect();

    assert_eq!(missing.len(), 2);
    for (case, field) in missing.iter().zip(["a", "b"]) {
        assert_eq!(case.id.as_str(), format!("missing_field.{field}"));
        assert_eq!(case.expected, ExpectedOutcomeClass::RejectedAsMalformed);
        let body = json_body(case);
        assert!(!body.contains_key(field));
        assert_eq!(body.len(), 1);
    }
}

#[test]
fn plan_follows_strategy_order_and_excludes_allowed_boundaries() {
    let plan = generator().plan(&typed_contract()).unwrap();
    assert_eq!(
        ids(&plan),
        vec![
            "baseline",
            "missing_field.name",
            "wrong_type.count",
            "wrong_type.flag",
            "wrong_type.name",
            "boundary.count.negative_number",
            "boundary.name.empty_string",
            "boundary.name.max_length_string",
            "oversized_payload",
            "malformed_encoding.truncated_structure",
            "malformed_encoding.invalid_utf8",
            "injection.name.script_tag",
            "injection.name.sql_quote",
            "injection.name.path_traversal",
            "injection.name.null_byte",
            "unauthenticated",
        ]
    );
    let unique: BTreeSet<&str> = ids(&plan).into_iter().collect();
    assert_eq!(unique.len(), plan.len());
}

#[test]
fn expected_classes_follow_strategies() {
    let plan = generator().plan(&typed_contract()).unwrap();
    for case in &plan.cases {
        assert_eq!(case.expected, case.strategy.expected_outcome());
    }
    assert_eq!(case(&plan, "baseline").expected, ExpectedOutcomeClass::NeverSucceedWithServerError);
    assert_eq!(case(&plan, "unauthenticated").expected, ExpectedOutcomeClass::RejectedAsUnauthorized);
}

#[test]
fn wrong_type_substitutes_incompatible_values() {
    let plan = generator().plan(&typed_contract()).unwrap();
    assert!(json_body(case(&plan, "wrong_type.name"))["name"].is_number());
    assert!(json_body(case(&plan, "wrong_type.count"))["count"].is_string());
    assert!(json_body(case(&plan, "wrong_type.flag"))["flag"].is_string());
}

#[test]
fn max_length_string_exceeds_declared_maximum() {
    let plan = generator().plan(&typed_contract()).unwrap();
    let body = json_body(case(&plan, "boundary.name.max_length_string"));
    assert_eq!(body["name"].as_str().unwrap().len(), 9);
    let empty = json_body(case(&plan, "boundary.name.empty_string"));
    assert_eq!(empty["name"], json!(""));
}

#[test]
fn max_length_string_uses_policy_ceiling_without_declared_maximum() {
    let mut contract = contract("PUT /notes", &[]);
    contract.field_types.insert(
        FieldName::from("text"),
        TypeTag::String {
            allow_empty: true,
            max_length: None,
        },
    );
    let plan = generator().plan(&contract).unwrap();
    assert!(plan.cases.iter().all(|case| case.id.as_str() != "boundary.text.empty_string"));
    let body = json_body(case(&plan, "boundary.text.max_length_string"));
    assert_eq!(body["text"].as_str().unwrap().len(), POLICY.max_string_bytes);
}

#[test]
fn numeric_boundaries_cover_zero_and_negative() {
    let mut contract = contract("POST /rates", &[]);
    contract.field_types.insert(
        FieldName::from("rate"),
        TypeTag::Number {
            allow_zero: false,
            allow_negative: false,
        },
    );
    let plan = generator().plan(&contract).unwrap();
    assert_eq!(json_body(case(&plan, "boundary.rate.zero"))["rate"].as_f64(), Some(0.0));
    assert!(json_body(case(&plan, "boundary.rate.negative_number"))["rate"].as_f64().unwrap() < 0.0);
}

#[test]
fn oversized_payload_exceeds_ceiling() {
    let plan = generator().plan(&contract("POST /x", &["a"])).unwrap();
    let oversized = case(&plan, "oversized_payload");
    assert!(oversized.body.len() > POLICY.oversized_body_bytes);
    assert!(json_body(oversized).contains_key("a"));
}

#[test]
fn malformed_encodings_are_not_parseable() {
    let plan = generator().plan(&contract("POST /x", &["a"])).unwrap();
    let truncated = case(&plan, "malformed_encoding.truncated_structure");
    assert!(serde_json::from_slice::<Value>(&truncated.body).is_err());
    let invalid = case(&plan, "malformed_encoding.invalid_utf8");
    assert!(std::str::from_utf8(&invalid.body).is_err());
}

#[test]
fn malformed_encodings_handle_empty_baseline() {
    let plan = generator().plan(&contract("DELETE /session", &[])).unwrap();
    assert_eq!(case(&plan, "malformed_encoding.truncated_structure").body, b"{".to_vec());
    assert!(std::str::from_utf8(&case(&plan, "malformed_encoding.invalid_utf8").body).is_err());
}

#[test]
fn injection_cases_carry_raw_probe() {
    let plan = generator().plan(&typed_contract()).unwrap();
    for probe in ProbeKind::ALL {
        let id = format!("injection.name.{}", probe.as_str());
        let injected = case(&plan, &id);
        assert_eq!(injected.probe.as_deref(), Some(probe.payload()));
        assert_eq!(json_body(injected)["name"], json!(probe.payload()));
    }
    assert!(plan.cases.iter().filter(|case| case.probe.is_some()).count() == ProbeKind::ALL.len());
}

#[test]
fn only_unauthenticated_case_omits_credentials() {
    let plan = generator().plan(&typed_contract()).unwrap();
    for case in &plan.cases {
        assert_eq!(case.with_credentials, case.id.as_str() != "unauthenticated");
    }
    let unauthenticated = case(&plan, "unauthenticated");
    assert_eq!(unauthenticated.body, case(&plan, "baseline").body);
}

#[test]
fn no_unauthenticated_case_without_auth_requirement() {
    let plan = generator().plan(&contract("POST /x", &["a"])).unwrap();
    assert!(plan.cases.iter().all(|case| case.id.as_str() != "unauthenticated"));
    assert!(plan.cases.iter().all(|case| !case.with_credentials));
}

#[test]
fn sample_body_is_used_as_baseline() {
    let mut contract = contract("POST /x", &["a"]);
    let mut sample = Map::new();
    sample.insert("a".to_string(), json!("hello"));
    sample.insert("extra".to_string(), json!([1, 2]));
    contract.sample_body = Some(sample.clone());
    let plan = generator().plan(&contract).unwrap();
    assert_eq!(json_body(case(&plan, "baseline")), sample);
}

#[test]
fn every_body_declares_json_content_type() {
    let plan = generator().plan(&typed_contract()).unwrap();
    for case in &plan.cases {
        assert_eq!(case.headers.get("content-type").map(String::as_str), Some("application/json"));
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

#[test]
fn policy_requires_oversized_ceiling_above_string_ceiling() {
    let err = CaseGenerator::new(GeneratorPolicy {
        max_string_bytes: 64,
        oversized_body_bytes: 64,
    })
    .unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidPolicy(_)));

    let err = CaseGenerator::new(GeneratorPolicy {
        max_string_bytes: 0,
        oversized_body_bytes: 64,
    })
    .unwrap_err();
    assert!(matches!(err, GeneratorError::InvalidPolicy(_)));
}

#[test]
fn default_policy_is_valid() {
    assert!(GeneratorPolicy::default().validate().is_ok());
}

// ============================================================================
// SECTION: Determinism
// ============================================================================

#[test]
fn plan_is_deterministic() {
    let contract = typed_contract();
    let first = generator().plan(&contract).unwrap();
    let second = generator().plan(&contract).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.plan_hash, second.plan_hash);
}

#[test]
fn plan_hash_tracks_contract_changes() {
    let mut contract = typed_contract();
    let first = generator().plan(&contract).unwrap();
    contract.requires_auth = false;
    let second = generator().plan(&contract).unwrap();
    assert_ne!(first.plan_hash, second.plan_hash);
}

fn type_tag_strategy() -> impl Strategy<Value = TypeTag> {
    prop_oneof![
        (any::<bool>(), proptest::option::of(1usize .. 32)).prop_map(|(allow_empty, max_length)| {
            TypeTag::String {
                allow_empty,
                max_length,
            }
        }),
        (any::<bool>(), any::<bool>()).prop_map(|(allow_zero, allow_negative)| TypeTag::Integer {
            allow_zero,
            allow_negative,
        }),
        (any::<bool>(), any::<bool>()).prop_map(|(allow_zero, allow_negative)| TypeTag::Number {
            allow_zero,
            allow_negative,
        }),
        Just(TypeTag::Boolean),
        Just(TypeTag::Array),
        Just(TypeTag::Object),
    ]
}

proptest! {
    #[test]
    fn random_contracts_plan_deterministically(
        required in prop::collection::btree_set("[a-z]{1,6}", 0 .. 4),
        types in prop::collection::btree_map("[a-z]{1,6}", type_tag_strategy(), 0 .. 4),
        requires_auth in any::<bool>(),
    ) {
        let mut contract = ContractSpec::new("POST /random".parse().unwrap());
        contract.required_fields = required.iter().map(|name| FieldName::from(name.as_str())).collect();
        contract.field_types = types
            .into_iter()
            .map(|(name, tag)| (FieldName::from(name), tag))
            .collect();
        contract.requires_auth = requires_auth;

        let first = generator().plan(&contract).unwrap();
        let second = generator().plan(&contract).unwrap();
        prop_assert_eq!(&first, &second);

        let missing = first
            .cases
            .iter()
            .filter(|case| matches!(case.strategy, MutationStrategy::MissingField { .. }))
            .count();
        prop_assert_eq!(missing, contract.required_fields.len());

        let unique: BTreeSet<&str> = first.cases.iter().map(|case| case.id.as_str()).collect();
        prop_assert_eq!(unique.len(), first.len());
        prop_assert_eq!(first.cases[0].id.as_str(), "baseline");
    }
}

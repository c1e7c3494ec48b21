// crates/contract-fuzzer-core/tests/catalog.rs
// ============================================================================
// Module: Contract Catalog Tests
// Description: Catalog construction, validation, and target resolution.
// Purpose: Ensure bad contracts and unknown targets are caught before fuzzing.
// ============================================================================

//! Contract catalog tests.

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

use std::sync::Arc;

use contract_fuzzer_core::BoundaryKind;
use contract_fuzzer_core::CatalogError;
use contract_fuzzer_core::ContractCatalog;
use contract_fuzzer_core::ContractError;
use contract_fuzzer_core::ContractSpec;
use contract_fuzzer_core::FieldName;
use contract_fuzzer_core::MAX_DECLARED_STRING_LENGTH;
use contract_fuzzer_core::SignatureError;
use contract_fuzzer_core::TypeTag;
use serde_json::Map;
use serde_json::json;

fn contract(signature: &str) -> ContractSpec {
    let mut contract = ContractSpec::new(signature.parse().unwrap());
    contract.required_fields.insert(FieldName::from("prompt"));
    contract
}

fn catalog() -> ContractCatalog {
    ContractCatalog::new([
        contract("POST /api/v1/chat/generate"),
        contract("GET /api/v1/models"),
        contract("DELETE /api/v1/session"),
    ])
    .unwrap()
}

#[test]
fn resolves_registered_signature() {
    let catalog = catalog();
    let resolved = catalog.resolve("POST /api/v1/chat/generate").unwrap();
    assert_eq!(resolved.signature.to_string(), "POST /api/v1/chat/generate");
    let again = catalog.resolve(" POST  /api/v1/chat/generate ").unwrap();
    assert!(Arc::ptr_eq(&resolved, &again));
}

#[test]
fn unknown_signature_is_rejected() {
    let err = catalog().resolve("POST /api/v1/unknown").unwrap_err();
    assert_eq!(err, CatalogError::UnknownContract("POST /api/v1/unknown".to_string()));
}

#[test]
fn malformed_target_is_rejected() {
    let err = catalog().resolve("post /api/v1/chat/generate").unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidTarget {
            source: SignatureError::UnsupportedMethod(_),
            ..
        }
    ));
}

#[test]
fn duplicate_signatures_are_rejected() {
    let err = ContractCatalog::new([contract("GET /a"), contract("GET /a")]).unwrap_err();
    assert_eq!(err, CatalogError::DuplicateContract("GET /a".parse().unwrap()));
}

#[test]
fn invalid_contracts_are_rejected() {
    let mut empty_field = contract("POST /a");
    empty_field.required_fields.insert(FieldName::from(""));
    let err = ContractCatalog::new([empty_field]).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidContract {
            source: ContractError::EmptyFieldName,
            ..
        }
    ));

    let mut zero_max = contract("POST /b");
    zero_max.field_types.insert(
        FieldName::from("prompt"),
        TypeTag::String {
            allow_empty: false,
            max_length: Some(0),
        },
    );
    let err = ContractCatalog::new([zero_max]).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidContract {
            source: ContractError::InvalidMaxLength(_),
            ..
        }
    ));

    let mut sample_missing = contract("POST /c");
    sample_missing.sample_body = Some(Map::new());
    let err = ContractCatalog::new([sample_missing]).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidContract {
            source: ContractError::SampleMissingField(_),
            ..
        }
    ));

    let mut sample_mismatch = contract("POST /d");
    sample_mismatch.field_types.insert(FieldName::from("prompt"), TypeTag::Boolean);
    let mut sample = Map::new();
    sample.insert("prompt".to_string(), json!("text"));
    sample_mismatch.sample_body = Some(sample);
    let err = ContractCatalog::new([sample_mismatch]).unwrap_err();
    assert!(matches!(
        err,
        CatalogError::InvalidContract {
            source: ContractError::SampleTypeMismatch { .. },
            ..
        }
    ));
}

#[test]
fn oversized_max_length_is_rejected() {
    for max in [MAX_DECLARED_STRING_LENGTH, usize::MAX] {
        let mut huge = contract("POST /a");
        huge.field_types.insert(
            FieldName::from("prompt"),
            TypeTag::String {
                allow_empty: false,
                max_length: Some(max),
            },
        );
        let err = ContractCatalog::new([huge]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidContract {
                source: ContractError::MaxLengthTooLarge { limit: MAX_DECLARED_STRING_LENGTH, .. },
                ..
            }
        ));
    }

    let mut largest = contract("POST /b");
    largest.field_types.insert(
        FieldName::from("prompt"),
        TypeTag::String {
            allow_empty: false,
            max_length: Some(MAX_DECLARED_STRING_LENGTH - 1),
        },
    );
    assert!(ContractCatalog::new([largest]).is_ok());
}

fn sample_violation(tag: TypeTag, value: serde_json::Value) -> Option<BoundaryKind> {
    let mut spec = contract("POST /a");
    spec.field_types.insert(FieldName::from("prompt"), tag);
    let mut sample = Map::new();
    sample.insert("prompt".to_string(), value);
    spec.sample_body = Some(sample);
    match ContractCatalog::new([spec]) {
        Ok(_) => None,
        Err(CatalogError::InvalidContract {
            source: ContractError::SampleOutOfBounds { boundary, .. },
            ..
        }) => Some(boundary),
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sample_body_must_respect_declared_boundaries() {
    let strict_string = TypeTag::String {
        allow_empty: false,
        max_length: Some(4),
    };
    let strict_integer = TypeTag::Integer {
        allow_zero: false,
        allow_negative: false,
    };
    let strict_number = TypeTag::Number {
        allow_zero: false,
        allow_negative: false,
    };

    assert_eq!(sample_violation(strict_string, json!("")), Some(BoundaryKind::EmptyString));
    assert_eq!(sample_violation(strict_string, json!("hello")), Some(BoundaryKind::MaxLengthString));
    assert_eq!(sample_violation(strict_string, json!("héll")), None);
    assert_eq!(sample_violation(strict_integer, json!(0)), Some(BoundaryKind::Zero));
    assert_eq!(sample_violation(strict_integer, json!(-3)), Some(BoundaryKind::NegativeNumber));
    assert_eq!(sample_violation(strict_integer, json!(7)), None);
    assert_eq!(sample_violation(strict_number, json!(0.0)), Some(BoundaryKind::Zero));
    assert_eq!(sample_violation(strict_number, json!(-0.5)), Some(BoundaryKind::NegativeNumber));
}

#[test]
fn allowed_boundaries_are_accepted_in_sample_body() {
    let lenient_string = TypeTag::String {
        allow_empty: true,
        max_length: None,
    };
    let lenient_integer = TypeTag::Integer {
        allow_zero: true,
        allow_negative: true,
    };

    assert_eq!(sample_violation(lenient_string, json!("")), None);
    assert_eq!(sample_violation(lenient_integer, json!(0)), None);
    assert_eq!(sample_violation(lenient_integer, json!(-3)), None);
}

#[test]
fn partition_preserves_request_order() {
    let catalog = catalog();
    let partition = catalog.partition_targets(&[
        "GET /api/v1/models",
        "GET /missing",
        "POST /api/v1/chat/generate",
        "nonsense",
    ]);
    let resolved: Vec<String> =
        partition.resolved.iter().map(|contract| contract.signature.to_string()).collect();
    assert_eq!(resolved, vec!["GET /api/v1/models", "POST /api/v1/chat/generate"]);
    let rejected: Vec<&str> = partition.rejected.iter().map(|(target, _)| target.as_str()).collect();
    assert_eq!(rejected, vec!["GET /missing", "nonsense"]);
}

#[test]
fn signatures_are_listed_in_canonical_order() {
    let catalog = catalog();
    let listed: Vec<String> = catalog.signatures().iter().map(ToString::to_string).collect();
    assert_eq!(
        listed,
        vec!["GET /api/v1/models", "POST /api/v1/chat/generate", "DELETE /api/v1/session"]
    );
    assert_eq!(catalog.len(), 3);
    assert!(!catalog.is_empty());
}

#[test]
fn contract_round_trips_through_toml_shaped_json() {
    let value = json!({
        "signature": "POST /api/v1/chat/generate",
        "required_fields": ["prompt"],
        "field_types": {
            "prompt": { "type": "string", "max_length": 4096 },
            "temperature": { "type": "number", "allow_zero": true }
        },
        "requires_auth": true
    });
    let contract: ContractSpec = serde_json::from_value(value).unwrap();
    assert!(contract.requires_auth);
    assert_eq!(
        contract.field_types.get(&FieldName::from("prompt")),
        Some(&TypeTag::String {
            allow_empty: false,
            max_length: Some(4096),
        })
    );
    let catalog = ContractCatalog::new([contract]).unwrap();
    assert!(catalog.get(&"POST /api/v1/chat/generate".parse().unwrap()).is_some());
}

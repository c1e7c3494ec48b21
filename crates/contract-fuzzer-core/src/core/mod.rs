// crates/contract-fuzzer-core/src/core/mod.rs
// ============================================================================
// Module: Contract Fuzzer Core Types
// Description: Canonical contract, case, outcome, and result structures.
// Purpose: Provide stable, serializable types shared by every pipeline stage.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe what an endpoint accepts ([`ContractSpec`]), what the
//! generator derives from it ([`TestCase`]), what the executor observed
//! ([`ExecutionOutcome`]), and what the judge decided ([`TestResult`]).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod case;
pub mod contract;
pub mod hashing;
pub mod identifiers;
pub mod outcome;
pub mod result;
pub mod signature;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use case::BoundaryKind;
pub use case::EncodingDefect;
pub use case::ExpectedOutcomeClass;
pub use case::MutationStrategy;
pub use case::ProbeKind;
pub use case::TestCase;
pub use contract::ContractError;
pub use contract::ContractSpec;
pub use contract::MAX_DECLARED_STRING_LENGTH;
pub use contract::TypeTag;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use hashing::HashError;
pub use identifiers::CaseId;
pub use identifiers::FieldName;
pub use outcome::ExecutionOutcome;
pub use outcome::ObservedResponse;
pub use outcome::TransportErrorKind;
pub use outcome::TransportFailure;
pub use result::CaseRef;
pub use result::Failure;
pub use result::FailureKind;
pub use result::TestResult;
pub use signature::EndpointSignature;
pub use signature::HttpMethod;
pub use signature::SignatureError;
pub use time::Timestamp;

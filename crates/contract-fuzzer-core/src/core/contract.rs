// crates/contract-fuzzer-core/src/core/contract.rs
// ============================================================================
// Module: Endpoint Contracts
// Description: Declared request shape for one endpoint signature.
// Purpose: Provide the immutable input the case generator mutates.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A [`ContractSpec`] names the fields a well-formed request must carry, the
//! type of each typed field, and whether the endpoint requires credentials.
//! Contracts are validated once when they enter the catalog and are never
//! mutated afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::num::FpCategory;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::case::BoundaryKind;
use crate::core::identifiers::FieldName;
use crate::core::signature::EndpointSignature;
use crate::core::signature::HttpMethod;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum field name length in bytes.
pub const MAX_FIELD_NAME_LENGTH: usize = 256;
/// Upper bound for a declared string `max_length`.
pub const MAX_DECLARED_STRING_LENGTH: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Type Tags
// ============================================================================

/// Declared type of a request field.
///
/// # Invariants
/// - `allow_*` flags mark boundary values the type explicitly accepts; the
///   generator never emits a boundary case for an allowed boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeTag {
    /// UTF-8 string.
    String {
        /// Empty strings are valid for this field.
        #[serde(default)]
        allow_empty: bool,
        /// Declared maximum length in characters.
        #[serde(default)]
        max_length: Option<usize>,
    },
    /// Integral number.
    Integer {
        /// Zero is valid for this field.
        #[serde(default)]
        allow_zero: bool,
        /// Negative values are valid for this field.
        #[serde(default)]
        allow_negative: bool,
    },
    /// Arbitrary JSON number.
    Number {
        /// Zero is valid for this field.
        #[serde(default)]
        allow_zero: bool,
        /// Negative values are valid for this field.
        #[serde(default)]
        allow_negative: bool,
    },
    /// JSON boolean.
    Boolean,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl TypeTag {
    /// Returns a stable label for the type.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::String {
                ..
            } => "string",
            Self::Integer {
                ..
            } => "integer",
            Self::Number {
                ..
            } => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Returns the boundary kinds that apply to this type and are not
    /// explicitly allowed, in generation order.
    #[must_use]
    pub fn rejected_boundaries(self) -> Vec<BoundaryKind> {
        match self {
            Self::String {
                allow_empty,
                ..
            } => {
                let mut kinds = Vec::with_capacity(2);
                if !allow_empty {
                    kinds.push(BoundaryKind::EmptyString);
                }
                kinds.push(BoundaryKind::MaxLengthString);
                kinds
            }
            Self::Integer {
                allow_zero,
                allow_negative,
            }
            | Self::Number {
                allow_zero,
                allow_negative,
            } => {
                let mut kinds = Vec::with_capacity(2);
                if !allow_zero {
                    kinds.push(BoundaryKind::Zero);
                }
                if !allow_negative {
                    kinds.push(BoundaryKind::NegativeNumber);
                }
                kinds
            }
            Self::Boolean | Self::Array | Self::Object => Vec::new(),
        }
    }

    /// Returns true when the JSON value is an instance of this type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String {
                ..
            } => value.is_string(),
            Self::Integer {
                ..
            } => value.is_i64() || value.is_u64(),
            Self::Number {
                ..
            } => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }

    /// Returns the first rejected boundary the value falls on, if any.
    ///
    /// Values of the wrong JSON type never match a boundary.
    #[must_use]
    pub fn violated_boundary(self, value: &Value) -> Option<BoundaryKind> {
        match self {
            Self::String {
                allow_empty,
                max_length,
            } => {
                let text = value.as_str()?;
                if text.is_empty() && !allow_empty {
                    return Some(BoundaryKind::EmptyString);
                }
                match max_length {
                    Some(max) if text.chars().count() > max => Some(BoundaryKind::MaxLengthString),
                    _ => None,
                }
            }
            Self::Integer {
                allow_zero,
                allow_negative,
            }
            | Self::Number {
                allow_zero,
                allow_negative,
            } => {
                let number = value.as_f64()?;
                if number.classify() == FpCategory::Zero && !allow_zero {
                    Some(BoundaryKind::Zero)
                } else if number < 0.0 && !allow_negative {
                    Some(BoundaryKind::NegativeNumber)
                } else {
                    None
                }
            }
            Self::Boolean | Self::Array | Self::Object => None,
        }
    }
}

// ============================================================================
// SECTION: Contract Specification
// ============================================================================

/// Declared request contract for one endpoint signature.
///
/// # Invariants
/// - Immutable once loaded into a catalog.
/// - `sample_body`, when present, satisfies the contract itself: it carries
///   every required field and each typed value sits inside its declared
///   boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractSpec {
    /// Endpoint signature (method and path).
    pub signature: EndpointSignature,
    /// Fields that a well-formed request must carry.
    #[serde(default)]
    pub required_fields: BTreeSet<FieldName>,
    /// Declared types for typed fields.
    #[serde(default)]
    pub field_types: BTreeMap<FieldName, TypeTag>,
    /// Endpoint requires credentials.
    #[serde(default)]
    pub requires_auth: bool,
    /// Optional well-formed request body used as the mutation baseline.
    #[serde(default)]
    pub sample_body: Option<Map<String, Value>>,
}

impl ContractSpec {
    /// Creates a contract with no fields and no auth requirement.
    #[must_use]
    pub const fn new(signature: EndpointSignature) -> Self {
        Self {
            signature,
            required_fields: BTreeSet::new(),
            field_types: BTreeMap::new(),
            requires_auth: false,
            sample_body: None,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.signature.method()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.signature.path()
    }

    /// Validates the contract for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError`] when a field name, type tag, or sample body is invalid.
    pub fn validate(&self) -> Result<(), ContractError> {
        for field in self.required_fields.iter().chain(self.field_types.keys()) {
            validate_field_name(field)?;
        }
        for (field, tag) in &self.field_types {
            if let TypeTag::String {
                max_length: Some(max),
                ..
            } = tag
            {
                if *max == 0 {
                    return Err(ContractError::InvalidMaxLength(field.clone()));
                }
                if *max >= MAX_DECLARED_STRING_LENGTH {
                    return Err(ContractError::MaxLengthTooLarge {
                        field: field.clone(),
                        limit: MAX_DECLARED_STRING_LENGTH,
                    });
                }
            }
        }
        if let Some(sample) = &self.sample_body {
            for field in &self.required_fields {
                if !sample.contains_key(field.as_str()) {
                    return Err(ContractError::SampleMissingField(field.clone()));
                }
            }
            for (field, tag) in &self.field_types {
                let Some(value) = sample.get(field.as_str()) else {
                    continue;
                };
                if !tag.accepts(value) {
                    return Err(ContractError::SampleTypeMismatch {
                        field: field.clone(),
                        expected: tag.label(),
                    });
                }
                if let Some(boundary) = tag.violated_boundary(value) {
                    return Err(ContractError::SampleOutOfBounds {
                        field: field.clone(),
                        boundary,
                    });
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Contract validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A field name is empty.
    #[error("field name must be non-empty")]
    EmptyFieldName,
    /// A field name exceeds the length limit.
    #[error("field name exceeds max length: {0}")]
    FieldNameTooLong(FieldName),
    /// A string field declares a zero maximum length.
    #[error("string field max_length must be positive: {0}")]
    InvalidMaxLength(FieldName),
    /// A string field declares a maximum length at or above the hard limit.
    #[error("string field max_length must be below {limit}: {field}")]
    MaxLengthTooLarge {
        /// Offending field.
        field: FieldName,
        /// Exclusive upper bound.
        limit: usize,
    },
    /// The sample body omits a required field.
    #[error("sample_body missing required field: {0}")]
    SampleMissingField(FieldName),
    /// The sample body value does not match the declared type.
    #[error("sample_body field {field} must be {expected}")]
    SampleTypeMismatch {
        /// Offending field.
        field: FieldName,
        /// Declared type label.
        expected: &'static str,
    },
    /// The sample body value sits on a boundary the type rejects.
    #[error("sample_body field {field} violates boundary {}", boundary.as_str())]
    SampleOutOfBounds {
        /// Offending field.
        field: FieldName,
        /// Rejected boundary the value falls on.
        boundary: BoundaryKind,
    },
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a single field name.
fn validate_field_name(field: &FieldName) -> Result<(), ContractError> {
    let name = field.as_str();
    if name.trim().is_empty() {
        return Err(ContractError::EmptyFieldName);
    }
    if name.len() > MAX_FIELD_NAME_LENGTH {
        return Err(ContractError::FieldNameTooLong(field.clone()));
    }
    Ok(())
}

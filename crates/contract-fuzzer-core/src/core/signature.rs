// crates/contract-fuzzer-core/src/core/signature.rs
// ============================================================================
// Module: Endpoint Signatures
// Description: Parsed "METHOD /path" endpoint signatures.
// Purpose: Replace free-form endpoint strings with a validated, typed key.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! An [`EndpointSignature`] is the catalog key for a contract. It parses from
//! and displays as the canonical `"METHOD /path"` form, so signatures from
//! config files and the command line compare equal after parsing.
//! Invariants:
//! - Methods are uppercase tokens from a closed set.
//! - Paths start with `/` and carry no whitespace, query, or fragment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted path length in bytes.
pub const MAX_PATH_LENGTH: usize = 2048;

// ============================================================================
// SECTION: HTTP Method
// ============================================================================

/// HTTP methods accepted in endpoint signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
    /// PUT request.
    Put,
    /// PATCH request.
    Patch,
    /// DELETE request.
    Delete,
    /// HEAD request.
    Head,
    /// OPTIONS request.
    Options,
}

impl HttpMethod {
    /// Returns the canonical method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = SignatureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            other => Err(SignatureError::UnsupportedMethod(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Endpoint Signature
// ============================================================================

/// Endpoint signature identifying one contract: method plus path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EndpointSignature {
    /// HTTP method.
    method: HttpMethod,
    /// Absolute request path.
    path: String,
}

impl EndpointSignature {
    /// Creates a signature from a method and path.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the path is not a bare absolute path.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Result<Self, SignatureError> {
        let path = path.into();
        validate_path(&path)?;
        Ok(Self {
            method,
            path,
        })
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for EndpointSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

impl FromStr for EndpointSignature {
    type Err = SignatureError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut parts = trimmed.split_whitespace();
        let (Some(method), Some(path), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(SignatureError::Malformed(trimmed.to_string()));
        };
        Self::new(method.parse()?, path)
    }
}

impl TryFrom<String> for EndpointSignature {
    type Error = SignatureError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EndpointSignature> for String {
    fn from(value: EndpointSignature) -> Self {
        value.to_string()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing endpoint signatures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// Signature is not of the form `METHOD /path`.
    #[error("endpoint signature must be \"METHOD /path\": {0}")]
    Malformed(String),
    /// Method token is not supported.
    #[error("unsupported http method: {0}")]
    UnsupportedMethod(String),
    /// Path is not a bare absolute path.
    #[error("invalid endpoint path: {0}")]
    InvalidPath(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates that a path is absolute and free of query, fragment, and whitespace.
fn validate_path(path: &str) -> Result<(), SignatureError> {
    if !path.starts_with('/') || path.len() > MAX_PATH_LENGTH {
        return Err(SignatureError::InvalidPath(path.to_string()));
    }
    if path.chars().any(|ch| ch.is_whitespace() || ch.is_control() || ch == '?' || ch == '#') {
        return Err(SignatureError::InvalidPath(path.to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::EndpointSignature;
    use super::HttpMethod;
    use super::SignatureError;

    #[test]
    fn parses_and_displays_canonical_form() {
        let signature: EndpointSignature = "POST /api/v1/chat/generate".parse().unwrap();
        assert_eq!(signature.method(), HttpMethod::Post);
        assert_eq!(signature.path(), "/api/v1/chat/generate");
        assert_eq!(signature.to_string(), "POST /api/v1/chat/generate");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let signature: EndpointSignature = "  GET   /health ".parse().unwrap();
        assert_eq!(signature.to_string(), "GET /health");
    }

    #[test]
    fn lowercase_method_is_rejected() {
        let err = "post /x".parse::<EndpointSignature>().unwrap_err();
        assert_eq!(err, SignatureError::UnsupportedMethod("post".to_string()));
    }

    #[test]
    fn relative_and_query_paths_are_rejected() {
        assert!(matches!(
            "GET x".parse::<EndpointSignature>(),
            Err(SignatureError::InvalidPath(_))
        ));
        assert!(matches!(
            "GET /x?debug=1".parse::<EndpointSignature>(),
            Err(SignatureError::InvalidPath(_))
        ));
    }

    #[test]
    fn extra_tokens_are_malformed() {
        assert!(matches!(
            "GET /x HTTP/1.1".parse::<EndpointSignature>(),
            Err(SignatureError::Malformed(_))
        ));
        assert!(matches!("GET".parse::<EndpointSignature>(), Err(SignatureError::Malformed(_))));
    }

    #[test]
    fn serde_uses_string_form() {
        let signature: EndpointSignature =
            serde_json::from_str("\"DELETE /items/1\"").unwrap();
        assert_eq!(serde_json::to_string(&signature).unwrap(), "\"DELETE /items/1\"");
    }
}

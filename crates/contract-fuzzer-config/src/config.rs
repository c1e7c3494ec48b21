// crates/contract-fuzzer-config/src/config.rs
// ============================================================================
// Module: Contract Fuzzer Configuration
// Description: Configuration loading and validation for the fuzzer.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: contract-fuzzer-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section has defaults except the contracts themselves; anything
//! out of range is rejected with a field-specific [`ConfigError::Invalid`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use contract_fuzzer_core::ContractCatalog;
use contract_fuzzer_core::ContractSpec;
use contract_fuzzer_core::EndpointSignature;
use contract_fuzzer_core::EngineConfig;
use contract_fuzzer_core::GeneratorPolicy;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "contract-fuzzer.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONTRACT_FUZZER_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of default targets.
pub(crate) const MAX_TARGETS: usize = 256;
/// Maximum number of contracts.
pub(crate) const MAX_CONTRACTS: usize = 256;
/// Maximum length of header names, schemes, and env var names.
pub(crate) const MAX_HEADER_TOKEN_LENGTH: usize = 128;
/// Maximum user agent length in bytes.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;
/// Default per-request timeout in milliseconds.
pub(crate) const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Minimum per-request timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum per-request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 60_000;
/// Default maximum requests in flight.
pub(crate) const DEFAULT_MAX_CONCURRENCY: usize = 4;
/// Maximum requests in flight.
pub(crate) const MAX_CONCURRENCY: usize = 8;
/// Default maximum response body bytes retained.
pub(crate) const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Maximum response body bytes retained.
pub(crate) const MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;
/// Default user agent.
pub(crate) const DEFAULT_USER_AGENT: &str = "contract-fuzzer/0.1";
/// Default maximum-length string ceiling.
pub(crate) const DEFAULT_MAX_STRING_BYTES: usize = 1024 * 1024;
/// Upper bound for the maximum-length string ceiling.
pub(crate) const MAX_STRING_BYTES: usize = 16 * 1024 * 1024;
/// Default oversized payload ceiling.
pub(crate) const DEFAULT_OVERSIZED_BODY_BYTES: usize = 4 * 1024 * 1024;
/// Upper bound for the oversized payload ceiling.
pub(crate) const MAX_OVERSIZED_BODY_BYTES: usize = 64 * 1024 * 1024;
/// Default credential header.
pub(crate) const DEFAULT_AUTH_HEADER: &str = "Authorization";
/// Default credential scheme.
pub(crate) const DEFAULT_AUTH_SCHEME: &str = "Bearer";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Contract fuzzer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FuzzerConfig {
    /// Target service configuration.
    #[serde(default)]
    pub target: TargetConfig,
    /// Executor limits.
    #[serde(default)]
    pub executor: ExecutorConfig,
    /// Generator size policy.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Audit event logging.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Default invocation targets (`"METHOD /path"`).
    #[serde(default)]
    pub targets: Vec<String>,
    /// Endpoint contracts.
    #[serde(default)]
    pub contracts: Vec<ContractSpec>,
}

impl FuzzerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit path, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.target.validate()?;
        self.executor.validate()?;
        self.generator.validate()?;
        self.audit.validate()?;
        if self.targets.len() > MAX_TARGETS {
            return Err(ConfigError::Invalid("too many targets".to_string()));
        }
        for (index, target) in self.targets.iter().enumerate() {
            target.parse::<EndpointSignature>().map_err(|err| {
                ConfigError::Invalid(format!("targets[{index}] is not a valid signature: {err}"))
            })?;
        }
        if self.contracts.len() > MAX_CONTRACTS {
            return Err(ConfigError::Invalid("too many contracts".to_string()));
        }
        self.catalog()?;
        Ok(())
    }

    /// Builds the contract catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a contract is invalid or duplicated.
    pub fn catalog(&self) -> Result<ContractCatalog, ConfigError> {
        ContractCatalog::new(self.contracts.iter().cloned())
            .map_err(|err| ConfigError::Invalid(format!("contracts: {err}")))
    }

    /// Returns the generator policy.
    #[must_use]
    pub const fn generator_policy(&self) -> GeneratorPolicy {
        GeneratorPolicy {
            max_string_bytes: self.generator.max_string_bytes,
            oversized_body_bytes: self.generator.oversized_body_bytes,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_concurrency: self.executor.max_concurrency,
        }
    }
}

/// Target service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Base URL of the target service; may be overridden by the caller.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Optional credential source.
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

impl TargetConfig {
    /// Validates target configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base_url) = &self.base_url {
            parse_base_url(base_url)?;
        }
        if let Some(auth) = &self.auth {
            auth.validate()?;
        }
        Ok(())
    }

    /// Returns the configured base URL, parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no base URL is configured or it
    /// fails validation.
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let Some(base_url) = &self.base_url else {
            return Err(ConfigError::Invalid("target.base_url must be set".to_string()));
        };
        parse_base_url(base_url)
    }
}

/// Credential source for endpoints that require auth.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Header that carries the credential.
    #[serde(default = "default_auth_header")]
    pub header: String,
    /// Scheme prefix placed before the token; empty sends the raw token.
    #[serde(default = "default_auth_scheme")]
    pub scheme: String,
    /// Environment variable holding the token.
    pub token_env: String,
}

impl AuthConfig {
    /// Validates the credential source without reading the environment.
    fn validate(&self) -> Result<(), ConfigError> {
        if !is_header_token(&self.header) {
            return Err(ConfigError::Invalid(
                "target.auth.header must be a valid header name".to_string(),
            ));
        }
        if self.scheme.len() > MAX_HEADER_TOKEN_LENGTH || self.scheme.chars().any(char::is_whitespace)
        {
            return Err(ConfigError::Invalid(
                "target.auth.scheme must be a single token".to_string(),
            ));
        }
        let token_env = self.token_env.trim();
        if token_env.is_empty() {
            return Err(ConfigError::Invalid("target.auth.token_env must be non-empty".to_string()));
        }
        if token_env.len() > MAX_HEADER_TOKEN_LENGTH || token_env.contains('=') {
            return Err(ConfigError::Invalid(
                "target.auth.token_env is not a valid variable name".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolves the credential header from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the variable is unset, empty, or
    /// not a valid header value.
    pub fn resolve(&self) -> Result<AuthHeader, ConfigError> {
        let name = self.token_env.trim();
        let token = env::var(name).map_err(|_| {
            ConfigError::Invalid(format!("target.auth.token_env {name} is not set"))
        })?;
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::Invalid(format!("target.auth.token_env {name} is empty")));
        }
        if token.chars().any(char::is_control) {
            return Err(ConfigError::Invalid(format!(
                "target.auth.token_env {name} contains control characters"
            )));
        }
        let value = if self.scheme.is_empty() {
            token.to_string()
        } else {
            format!("{} {token}", self.scheme)
        };
        Ok(AuthHeader {
            name: self.header.clone(),
            value,
        })
    }
}

/// Resolved credential header.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Header name.
    pub name: String,
    /// Header value including the scheme.
    pub value: String,
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeader").field("name", &self.name).field("value", &"<redacted>").finish()
    }
}

/// Executor limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum requests in flight per target.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Maximum response body bytes retained per case.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Retry once on connection refused or reset.
    #[serde(default = "default_retry_transient")]
    pub retry_transient: bool,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_concurrency: default_max_concurrency(),
            max_response_bytes: default_max_response_bytes(),
            retry_transient: default_retry_transient(),
            user_agent: default_user_agent(),
        }
    }
}

impl ExecutorConfig {
    /// Validates executor limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "executor.timeout_ms must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
            )));
        }
        if !(1 ..= MAX_CONCURRENCY).contains(&self.max_concurrency) {
            return Err(ConfigError::Invalid(format!(
                "executor.max_concurrency must be between 1 and {MAX_CONCURRENCY}"
            )));
        }
        if !(1 ..= MAX_RESPONSE_BYTES).contains(&self.max_response_bytes) {
            return Err(ConfigError::Invalid(
                "executor.max_response_bytes out of range".to_string(),
            ));
        }
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() {
            return Err(ConfigError::Invalid("executor.user_agent must be non-empty".to_string()));
        }
        if self.user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid("executor.user_agent too long".to_string()));
        }
        if !self.user_agent.chars().all(|ch| ch.is_ascii() && !ch.is_ascii_control()) {
            return Err(ConfigError::Invalid(
                "executor.user_agent must be printable ascii".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generator size policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Maximum-length string ceiling for fields without a declared maximum.
    #[serde(default = "default_max_string_bytes")]
    pub max_string_bytes: usize,
    /// Size the oversized payload must exceed.
    #[serde(default = "default_oversized_body_bytes")]
    pub oversized_body_bytes: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_string_bytes: default_max_string_bytes(),
            oversized_body_bytes: default_oversized_body_bytes(),
        }
    }
}

impl GeneratorConfig {
    /// Validates generator limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1 ..= MAX_STRING_BYTES).contains(&self.max_string_bytes) {
            return Err(ConfigError::Invalid("generator.max_string_bytes out of range".to_string()));
        }
        if self.oversized_body_bytes > MAX_OVERSIZED_BODY_BYTES {
            return Err(ConfigError::Invalid(
                "generator.oversized_body_bytes out of range".to_string(),
            ));
        }
        if self.oversized_body_bytes <= self.max_string_bytes {
            return Err(ConfigError::Invalid(
                "generator.oversized_body_bytes must be greater than generator.max_string_bytes"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Audit event logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Emit JSON-lines audit events.
    #[serde(default)]
    pub enabled: bool,
    /// Optional audit log path; stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses and validates a target base URL.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the URL is malformed, not http or
/// https, lacks a host, or embeds credentials.
pub fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|err| ConfigError::Invalid(format!("target.base_url is invalid: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid("target.base_url must use http or https".to_string()));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid("target.base_url must include a host".to_string()));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ConfigError::Invalid(
            "target.base_url must not embed credentials".to_string(),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::Invalid(
            "target.base_url must not include a query or fragment".to_string(),
        ));
    }
    Ok(url)
}

/// Returns true when the value is a valid HTTP header name.
fn is_header_token(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_HEADER_TOKEN_LENGTH
        && value.bytes().all(|byte| byte.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&byte))
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Default credential header.
fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}

/// Default credential scheme.
fn default_auth_scheme() -> String {
    DEFAULT_AUTH_SCHEME.to_string()
}

/// Default per-request timeout.
const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Default concurrency.
const fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

/// Default response body limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Default transient retry flag.
const fn default_retry_transient() -> bool {
    true
}

/// Default user agent.
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Default string ceiling.
const fn default_max_string_bytes() -> usize {
    DEFAULT_MAX_STRING_BYTES
}

/// Default oversized ceiling.
const fn default_oversized_body_bytes() -> usize {
    DEFAULT_OVERSIZED_BODY_BYTES
}

// ============================================================================
// SECTION: Tests
// ============================================================================

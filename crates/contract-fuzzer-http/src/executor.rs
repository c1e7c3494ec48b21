// crates/contract-fuzzer-http/src/executor.rs
// ============================================================================
// Module: HTTP Case Executor
// Description: reqwest-backed executor for generated test cases.
// Purpose: Issue one bounded request per case and classify the outcome.
// Dependencies: contract-fuzzer-core, reqwest, tokio
// ============================================================================

//! ## Overview
//! [`HttpExecutor`] sends each [`TestCase`] to `base_url + path` with a fixed
//! timeout, redirects disabled, and a hard cap on retained response bytes.
//! Every call resolves to exactly one [`ExecutionOutcome`]. Connection-level
//! failures may be retried once; HTTP responses, including 5xx, never are.
//! Security posture: the target is adversary-controlled; response bodies are
//! bounded and credentials are attached only to cases that ask for them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use contract_fuzzer_core::CaseExecutor;
use contract_fuzzer_core::ContractSpec;
use contract_fuzzer_core::ExecutionOutcome;
use contract_fuzzer_core::HttpMethod;
use contract_fuzzer_core::ObservedResponse;
use contract_fuzzer_core::TestCase;
use contract_fuzzer_core::TransportErrorKind;
use contract_fuzzer_core::TransportFailure;
use reqwest::Client;
use reqwest::Method;
use reqwest::Response;
use reqwest::Url;
use reqwest::redirect::Policy;
use thiserror::Error;
use tokio::time::Instant;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Default cap on retained response body bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;
/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "contract-fuzzer/0.1";

/// Configuration for the HTTP executor.
///
/// # Invariants
/// - `timeout_ms` applies to the full request lifecycle, body included.
/// - `max_response_bytes` bounds the retained body; longer bodies are cut.
/// - `retry_transient` permits at most one retry of refused/reset connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpExecutorConfig {
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response body bytes retained per case.
    pub max_response_bytes: usize,
    /// Retry once on connection refused or reset.
    pub retry_transient: bool,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            retry_transient: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Credential header attached to cases that run with credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Header name.
    pub header: String,
    /// Full header value.
    pub value: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("header", &self.header)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Errors raised while constructing an [`HttpExecutor`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorBuildError {
    /// Base URL is not usable as a request prefix.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Executor limits are out of range.
    #[error("invalid executor config: {0}")]
    InvalidConfig(String),
    /// The reqwest client could not be built.
    #[error("http client build failed: {0}")]
    Client(String),
}

// ============================================================================
// SECTION: Executor
// ============================================================================

/// Production [`CaseExecutor`] backed by an async reqwest client.
///
/// # Invariants
/// - Redirects are not followed.
/// - At most two attempts are made per case.
/// - Exactly one outcome is produced per call.
pub struct HttpExecutor {
    /// Shared HTTP client.
    client: Client,
    /// Request prefix; endpoint paths are appended verbatim.
    base_url: Url,
    /// Optional credential header.
    credential: Option<Credential>,
    /// Retry policy flag.
    retry_transient: bool,
    /// Retained body cap.
    max_response_bytes: usize,
}

impl HttpExecutor {
    /// Creates a new executor for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorBuildError`] when the base URL is unusable, limits
    /// are zero, or the client cannot be built.
    pub fn new(
        base_url: Url,
        config: &HttpExecutorConfig,
        credential: Option<Credential>,
    ) -> Result<Self, ExecutorBuildError> {
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ExecutorBuildError::InvalidBaseUrl(format!(
                "unsupported scheme {}",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() || base_url.host_str().is_none() {
            return Err(ExecutorBuildError::InvalidBaseUrl("base url requires a host".to_string()));
        }
        if base_url.query().is_some() || base_url.fragment().is_some() {
            return Err(ExecutorBuildError::InvalidBaseUrl(
                "base url must not carry a query or fragment".to_string(),
            ));
        }
        if config.timeout_ms == 0 {
            return Err(ExecutorBuildError::InvalidConfig("timeout_ms must be positive".to_string()));
        }
        if config.max_response_bytes == 0 {
            return Err(ExecutorBuildError::InvalidConfig(
                "max_response_bytes must be positive".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .no_proxy()
            .build()
            .map_err(|err| ExecutorBuildError::Client(err.to_string()))?;
        Ok(Self {
            client,
            base_url,
            credential,
            retry_transient: config.retry_transient,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the request URL for an endpoint path.
    fn endpoint_url(&self, path: &str) -> Result<Url, String> {
        let prefix = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{prefix}{path}")).map_err(|err| format!("invalid request url: {err}"))
    }

    /// Sends a single attempt for `case`.
    async fn send_once(
        &self,
        method: Method,
        url: Url,
        case: &TestCase,
    ) -> Result<Response, reqwest::Error> {
        let mut request = self.client.request(method, url);
        for (name, value) in &case.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if case.with_credentials
            && let Some(credential) = &self.credential
        {
            request = request.header(credential.header.as_str(), credential.value.as_str());
        }
        request.body(case.body.clone()).send().await
    }
}

#[async_trait]
impl CaseExecutor for HttpExecutor {
    async fn execute(&self, contract: &ContractSpec, case: &TestCase) -> ExecutionOutcome {
        let started = Instant::now();
        let url = match self.endpoint_url(contract.path()) {
            Ok(url) => url,
            Err(detail) => {
                return transport_failure(
                    TransportErrorKind::ProtocolViolation,
                    detail,
                    started,
                    0,
                );
            }
        };
        let method = reqwest_method(contract.method());
        let mut attempts: u8 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            match self.send_once(method.clone(), url.clone(), case).await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    return match read_body_limited(response, self.max_response_bytes).await {
                        Ok((body, body_truncated)) => ExecutionOutcome::Response(ObservedResponse {
                            status,
                            body,
                            body_truncated,
                            latency_ms: elapsed_ms(started),
                            attempts,
                        }),
                        Err(err) => transport_failure(
                            classify_error(&err),
                            format!("failed to read response body: {}", error_chain(&err)),
                            started,
                            attempts,
                        ),
                    };
                }
                Err(err) => {
                    if self.retry_transient && attempts == 1 && is_transient(&err) {
                        continue;
                    }
                    return transport_failure(
                        classify_error(&err),
                        error_chain(&err),
                        started,
                        attempts,
                    );
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps an endpoint method onto the reqwest method type.
fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

/// Reads at most `max_bytes` of the response body.
///
/// Returns the retained bytes and whether the body was cut short.
async fn read_body_limited(
    mut response: Response,
    max_bytes: usize,
) -> Result<(Vec<u8>, bool), reqwest::Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let remaining = max_bytes.saturating_sub(buf.len());
        if chunk.len() > remaining {
            buf.extend_from_slice(&chunk[.. remaining]);
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok((buf, false))
}

/// Classifies a reqwest failure into a transport error kind.
fn classify_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() || io_kind_in_chain(err, is_connection_drop) {
        TransportErrorKind::Unreachable
    } else {
        TransportErrorKind::ProtocolViolation
    }
}

/// Returns true when a failed attempt may be retried.
///
/// Only refused or reset connections qualify. Resolution and TLS failures
/// are connect errors too but fail the case on the first attempt.
fn is_transient(err: &reqwest::Error) -> bool {
    !err.is_timeout() && io_kind_in_chain(err, is_connection_drop)
}

/// Returns true for refused or reset connections.
const fn is_connection_drop(kind: io::ErrorKind) -> bool {
    matches!(kind, io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset)
}

/// Walks the source chain looking for an I/O error matching `predicate`.
fn io_kind_in_chain(err: &reqwest::Error, predicate: fn(io::ErrorKind) -> bool) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(current) = source {
        if let Some(io_err) = current.downcast_ref::<io::Error>()
            && predicate(io_err.kind())
        {
            return true;
        }
        source = current.source();
    }
    false
}

/// Renders an error and its sources as a single line.
fn error_chain(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(current) = source {
        let message = current.to_string();
        if !detail.contains(&message) {
            detail.push_str(": ");
            detail.push_str(&message);
        }
        source = current.source();
    }
    detail
}

/// Milliseconds elapsed since `started`, saturating.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Builds a transport failure outcome.
fn transport_failure(
    kind: TransportErrorKind,
    detail: String,
    started: Instant,
    attempts: u8,
) -> ExecutionOutcome {
    ExecutionOutcome::Transport(TransportFailure {
        kind,
        detail,
        latency_ms: elapsed_ms(started),
        attempts,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

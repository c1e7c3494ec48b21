//! Config validation tests for contract-fuzzer-config.
// crates/contract-fuzzer-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Defaults, range checks, and cross-field invariants.
// Purpose: Ensure every section fails closed on out-of-range values.
// =============================================================================

#![allow(
    clippy::use_debug,
    reason = "Debug output is used in failure messages."
)]

use contract_fuzzer_config::ConfigError;
use contract_fuzzer_config::FuzzerConfig;
use contract_fuzzer_config::parse_base_url;

type TestResult = Result<(), String>;

fn assert_invalid(content: &str, needle: &str) -> TestResult {
    match FuzzerConfig::from_toml_str(content) {
        Err(ConfigError::Invalid(message)) => {
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Err(other) => Err(format!("expected invalid config, got {other}")),
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = FuzzerConfig::from_toml_str("").map_err(|err| err.to_string())?;
    if config.executor.timeout_ms != 5_000
        || config.executor.max_concurrency != 4
        || config.executor.max_response_bytes != 1024 * 1024
        || !config.executor.retry_transient
        || config.executor.user_agent != "contract-fuzzer/0.1"
    {
        return Err("executor defaults not applied".to_string());
    }
    let policy = config.generator_policy();
    if policy.max_string_bytes != 1024 * 1024 || policy.oversized_body_bytes != 4 * 1024 * 1024 {
        return Err("generator defaults not applied".to_string());
    }
    if config.engine_config().max_concurrency != 4 {
        return Err("engine config not derived".to_string());
    }
    if config.audit.enabled || config.target.base_url.is_some() {
        return Err("optional sections should be off".to_string());
    }
    if !config.catalog().map_err(|err| err.to_string())?.is_empty() {
        return Err("catalog should be empty".to_string());
    }
    Ok(())
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    match FuzzerConfig::from_toml_str("[executor]\ntimeout = 10\n") {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn executor_ranges_are_enforced() -> TestResult {
    assert_invalid("[executor]\ntimeout_ms = 99\n", "executor.timeout_ms")?;
    assert_invalid("[executor]\ntimeout_ms = 60001\n", "executor.timeout_ms")?;
    assert_invalid("[executor]\nmax_concurrency = 0\n", "executor.max_concurrency")?;
    assert_invalid("[executor]\nmax_concurrency = 9\n", "executor.max_concurrency")?;
    assert_invalid("[executor]\nmax_response_bytes = 0\n", "executor.max_response_bytes")?;
    assert_invalid("[executor]\nmax_response_bytes = 16777217\n", "executor.max_response_bytes")?;
    assert_invalid("[executor]\nuser_agent = \"  \"\n", "executor.user_agent")?;
    assert_invalid(&format!("[executor]\nuser_agent = \"{}\"\n", "a".repeat(257)), "too long")?;
    FuzzerConfig::from_toml_str("[executor]\ntimeout_ms = 100\nmax_concurrency = 8\n")
        .map_err(|err| err.to_string())?;
    Ok(())
}

#[test]
fn generator_ceilings_are_enforced() -> TestResult {
    assert_invalid("[generator]\nmax_string_bytes = 0\n", "generator.max_string_bytes")?;
    assert_invalid(
        "[generator]\nmax_string_bytes = 1024\noversized_body_bytes = 1024\n",
        "must be greater than",
    )?;
    assert_invalid("[generator]\noversized_body_bytes = 67108865\n", "out of range")?;
    Ok(())
}

#[test]
fn base_url_is_validated() -> TestResult {
    assert_invalid("[target]\nbase_url = \"ftp://example.com\"\n", "http or https")?;
    assert_invalid("[target]\nbase_url = \"not a url\"\n", "target.base_url is invalid")?;
    assert_invalid("[target]\nbase_url = \"http://user:pw@example.com\"\n", "credentials")?;
    assert_invalid("[target]\nbase_url = \"http://example.com/?q=1\"\n", "query")?;
    let url = parse_base_url("https://api.example.com/base").map_err(|err| err.to_string())?;
    if url.path() != "/base" {
        return Err("base path not preserved".to_string());
    }
    Ok(())
}

#[test]
fn missing_base_url_is_reported_on_use() -> TestResult {
    let config = FuzzerConfig::from_toml_str("").map_err(|err| err.to_string())?;
    match config.target.parsed_base_url() {
        Err(ConfigError::Invalid(message)) if message.contains("target.base_url must be set") => {
            Ok(())
        }
        other => Err(format!("expected missing base url, got {other:?}")),
    }
}

#[test]
fn auth_section_is_validated() -> TestResult {
    assert_invalid("[target.auth]\ntoken_env = \"\"\n", "token_env must be non-empty")?;
    assert_invalid(
        "[target.auth]\nheader = \"Bad Header\"\ntoken_env = \"TOKEN\"\n",
        "valid header name",
    )?;
    assert_invalid(
        "[target.auth]\nscheme = \"Two Words\"\ntoken_env = \"TOKEN\"\n",
        "single token",
    )?;
    match FuzzerConfig::from_toml_str("[target.auth]\nheader = \"X-Api-Key\"\n") {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("token_env should be required, got {other:?}")),
    }
}

#[test]
fn auth_resolves_from_environment() -> TestResult {
    let config = FuzzerConfig::from_toml_str(
        "[target.auth]\nheader = \"X-Api-Key\"\nscheme = \"\"\ntoken_env = \"CARGO_PKG_NAME\"\n",
    )
    .map_err(|err| err.to_string())?;
    let auth = config.target.auth.as_ref().ok_or("auth missing")?;
    let header = auth.resolve().map_err(|err| err.to_string())?;
    if header.name != "X-Api-Key" || header.value != "contract-fuzzer-config" {
        return Err("credential header not resolved".to_string());
    }

    let config = FuzzerConfig::from_toml_str(
        "[target.auth]\ntoken_env = \"CONTRACT_FUZZER_TEST_TOKEN_THAT_IS_NEVER_SET\"\n",
    )
    .map_err(|err| err.to_string())?;
    let auth = config.target.auth.as_ref().ok_or("auth missing")?;
    match auth.resolve() {
        Err(ConfigError::Invalid(message)) if message.contains("is not set") => Ok(()),
        other => Err(format!("expected unset token error, got {other:?}")),
    }
}

#[test]
fn targets_must_be_signatures() -> TestResult {
    assert_invalid("targets = [\"GET /ok\", \"fetch /bad\"]\n", "targets[1]")?;
    assert_invalid("targets = [\"GET relative\"]\n", "targets[0]")?;
    Ok(())
}

#[test]
fn contracts_are_validated_through_catalog() -> TestResult {
    assert_invalid(
        r#"
[[contracts]]
signature = "GET /a"

[[contracts]]
signature = "GET /a"
"#,
        "duplicate contract",
    )?;
    assert_invalid(
        r#"
[[contracts]]
signature = "POST /a"
required_fields = ["prompt"]
sample_body = { other = 1 }
"#,
        "sample_body missing required field",
    )?;
    assert_invalid(
        r#"
[[contracts]]
signature = "POST /a"

[contracts.field_types]
prompt = { type = "string", max_length = 0 }
"#,
        "max_length",
    )?;
    match FuzzerConfig::from_toml_str("[[contracts]]\nsignature = \"post /a\"\n") {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("malformed signature should fail to parse, got {other:?}")),
    }
}

#[test]
fn huge_string_max_length_is_rejected() -> TestResult {
    assert_invalid(
        r#"
[[contracts]]
signature = "POST /a"

[contracts.field_types]
prompt = { type = "string", max_length = 9223372036854775807 }
"#,
        "max_length must be below",
    )?;
    assert_invalid(
        r#"
[[contracts]]
signature = "POST /a"

[contracts.field_types]
prompt = { type = "string", max_length = 10000000000 }
"#,
        "max_length must be below",
    )
}

#[test]
fn sample_body_outside_boundaries_is_rejected() -> TestResult {
    assert_invalid(
        r#"
[[contracts]]
signature = "POST /a"
required_fields = ["count"]
sample_body = { count = 0 }

[contracts.field_types]
count = { type = "integer" }
"#,
        "violates boundary zero",
    )
}

#[test]
fn audit_path_is_validated() -> TestResult {
    assert_invalid("[audit]\nenabled = true\npath = \"  \"\n", "audit.path")?;
    let config = FuzzerConfig::from_toml_str("[audit]\nenabled = true\npath = \"fuzz.jsonl\"\n")
        .map_err(|err| err.to_string())?;
    if !config.audit.enabled {
        return Err("audit not enabled".to_string());
    }
    Ok(())
}

//! Config loading tests for contract-fuzzer-config.
// crates/contract-fuzzer-config/tests/config_load.rs
// =============================================================================
// Module: Config Loading Tests
// Description: File loading, size limits, and path handling.
// Purpose: Ensure configuration files load fail-closed from disk.
// =============================================================================

#![allow(
    clippy::use_debug,
    reason = "Debug output is used in failure messages."
)]

use std::fs;

use contract_fuzzer_config::ConfigError;
use contract_fuzzer_config::FuzzerConfig;
use tempfile::TempDir;

type TestResult = Result<(), String>;

const SAMPLE: &str = r#"
targets = ["POST /api/v1/chat/generate"]

[target]
base_url = "http://127.0.0.1:8080"

[target.auth]
token_env = "FUZZ_TOKEN"

[executor]
timeout_ms = 2000
max_concurrency = 2

[[contracts]]
signature = "POST /api/v1/chat/generate"
required_fields = ["prompt"]
requires_auth = true
sample_body = { prompt = "hello", max_tokens = 16 }

[contracts.field_types]
prompt = { type = "string", max_length = 4096 }
max_tokens = { type = "integer" }
"#;

fn write_config(dir: &TempDir, content: &[u8]) -> Result<std::path::PathBuf, String> {
    let path = dir.path().join("contract-fuzzer.toml");
    fs::write(&path, content).map_err(|err| err.to_string())?;
    Ok(path)
}

#[test]
fn loads_sample_config_from_disk() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, SAMPLE.as_bytes())?;
    let config = FuzzerConfig::load(Some(&path)).map_err(|err| err.to_string())?;

    if config.executor.timeout_ms != 2000 || config.executor.max_concurrency != 2 {
        return Err("executor overrides were not applied".to_string());
    }
    if config.targets != vec!["POST /api/v1/chat/generate".to_string()] {
        return Err("targets not loaded".to_string());
    }
    let catalog = config.catalog().map_err(|err| err.to_string())?;
    let contract = catalog.resolve("POST /api/v1/chat/generate").map_err(|err| err.to_string())?;
    if !contract.requires_auth || contract.field_types.len() != 2 {
        return Err("contract fields not loaded".to_string());
    }
    let sample = contract.sample_body.clone().ok_or("sample_body missing")?;
    if sample.get("max_tokens") != Some(&serde_json::json!(16)) {
        return Err("sample_body not loaded".to_string());
    }
    let auth = config.target.auth.as_ref().ok_or("auth missing")?;
    if auth.header != "Authorization" || auth.scheme != "Bearer" {
        return Err("auth defaults not applied".to_string());
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    match FuzzerConfig::load(Some(&path)) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {other:?}")),
    }
}

#[test]
fn oversized_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let mut content = b"# padding\n".to_vec();
    content.resize(1024 * 1024 + 1, b'#');
    let path = write_config(&dir, &content)?;
    match FuzzerConfig::load(Some(&path)) {
        Err(ConfigError::Invalid(message)) if message.contains("size limit") => Ok(()),
        other => Err(format!("expected size limit error, got {other:?}")),
    }
}

#[test]
fn non_utf8_file_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, &[0xff, 0xfe, 0x00])?;
    match FuzzerConfig::load(Some(&path)) {
        Err(ConfigError::Invalid(message)) if message.contains("utf-8") => Ok(()),
        other => Err(format!("expected utf-8 error, got {other:?}")),
    }
}

#[test]
fn malformed_toml_is_parse_error() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = write_config(&dir, b"[executor\ntimeout_ms = 1")?;
    match FuzzerConfig::load(Some(&path)) {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {other:?}")),
    }
}

#[test]
fn overlong_path_component_is_rejected() -> TestResult {
    let dir = TempDir::new().map_err(|err| err.to_string())?;
    let path = dir.path().join("c".repeat(300));
    match FuzzerConfig::load(Some(&path)) {
        Err(ConfigError::Invalid(message)) if message.contains("component") => Ok(()),
        other => Err(format!("expected path error, got {other:?}")),
    }
}

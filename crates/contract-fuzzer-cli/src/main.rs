// crates/contract-fuzzer-cli/src/main.rs
// ============================================================================
// Module: Contract Fuzzer CLI Entry Point
// Description: Command dispatcher for contract fuzzing runs and plan inspection.
// Purpose: Wire configuration, executor, and engine together at the binary edge.
// Dependencies: clap, contract-fuzzer-config, contract-fuzzer-core,
//               contract-fuzzer-http, serde, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The `contract-fuzzer` binary loads `contract-fuzzer.toml`, builds the
//! contract catalog, and either runs the fuzzing pipeline against a live
//! target or prints the deterministic case plan. The process exits 0 only
//! when every requested target completed with every case passing. All output
//! goes through explicit stdout/stderr writers.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use contract_fuzzer_config::FuzzerConfig;
use contract_fuzzer_config::parse_base_url;
use contract_fuzzer_core::CaseGenerator;
use contract_fuzzer_core::CaseId;
use contract_fuzzer_core::CasePlan;
use contract_fuzzer_core::EngineConfig;
use contract_fuzzer_core::ExpectedOutcomeClass;
use contract_fuzzer_core::FuzzEngine;
use contract_fuzzer_core::HashDigest;
use contract_fuzzer_core::InvocationReport;
use contract_fuzzer_core::TargetOutcome;
use contract_fuzzer_core::Timestamp;
use contract_fuzzer_http::AuditSink;
use contract_fuzzer_http::Credential;
use contract_fuzzer_http::HttpExecutor;
use contract_fuzzer_http::HttpExecutorConfig;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "contract-fuzzer", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fuzz one or more endpoints against a live target.
    Run(RunCommand),
    /// Print the generated case plan for one endpoint without sending requests.
    Cases(CasesCommand),
    /// Contract catalog utilities.
    Catalog {
        /// Selected catalog subcommand.
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Output rendering format.
#[derive(ValueEnum, Copy, Clone, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Canonical JSON.
    Json,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Optional config file path (defaults to contract-fuzzer.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Target base URL (overrides `target.base_url`).
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Endpoint signature to fuzz, e.g. "POST /api/v1/items" (repeatable).
    #[arg(long = "target", value_name = "SIGNATURE")]
    targets: Vec<String>,
    /// Maximum requests in flight per target (overrides `executor.max_concurrency`).
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Arguments for the `cases` command.
#[derive(Args, Debug)]
struct CasesCommand {
    /// Endpoint signature to plan.
    #[arg(long, value_name = "SIGNATURE")]
    target: String,
    /// Optional config file path (defaults to contract-fuzzer.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List registered endpoint signatures.
    List(ConfigPathArgs),
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate the configuration file.
    Validate(ConfigPathArgs),
}

/// Shared config path argument.
#[derive(Args, Debug)]
struct ConfigPathArgs {
    /// Optional config file path (defaults to contract-fuzzer.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper carrying a user-facing message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(command) => command_run(command).await,
        Commands::Cases(command) => command_cases(&command),
        Commands::Catalog {
            command,
        } => command_catalog(command),
        Commands::Config {
            command,
        } => command_config(command),
    }
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Executes the `run` command.
async fn command_run(command: RunCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let targets = select_targets(&command.targets, &config.targets)?;

    let base_url = match &command.base_url {
        Some(value) => parse_base_url(value),
        None => config.target.parsed_base_url(),
    }
    .map_err(|err| CliError::new(format!("invalid base url: {err}")))?;

    let credential = match &config.target.auth {
        Some(auth) => {
            let header = auth
                .resolve()
                .map_err(|err| CliError::new(format!("credential resolution failed: {err}")))?;
            Some(Credential {
                header: header.name,
                value: header.value,
            })
        }
        None => None,
    };
    let executor_config = HttpExecutorConfig {
        timeout_ms: config.executor.timeout_ms,
        max_response_bytes: config.executor.max_response_bytes,
        retry_transient: config.executor.retry_transient,
        user_agent: config.executor.user_agent.clone(),
    };
    let executor = HttpExecutor::new(base_url, &executor_config, credential)
        .map_err(|err| CliError::new(err.to_string()))?;

    let sink = AuditSink::open(config.audit.enabled, config.audit.path.as_deref().map(Path::new))
        .map_err(|err| CliError::new(format!("failed to open audit log: {err}")))?;

    let engine_config = resolve_engine_config(config.engine_config(), command.concurrency);
    let catalog = config.catalog().map_err(|err| CliError::new(err.to_string()))?;
    let generator = CaseGenerator::new(config.generator_policy())
        .map_err(|err| CliError::new(err.to_string()))?;
    let engine = FuzzEngine::new(Arc::new(catalog), generator, executor, sink, engine_config)
        .map_err(|err| CliError::new(err.to_string()))?;

    let report = engine.fuzz_targets(&targets, unix_now).await;
    match command.format {
        OutputFormat::Text => write_stdout_text(&render_report_text(&report))?,
        OutputFormat::Json => write_json(&report)?,
    }
    Ok(report_exit_code(&report))
}

/// Chooses command-line targets over configured defaults.
fn select_targets(requested: &[String], configured: &[String]) -> CliResult<Vec<String>> {
    let targets = if requested.is_empty() { configured } else { requested };
    if targets.is_empty() {
        return Err(CliError::new(
            "no targets: pass --target or set targets in the config".to_string(),
        ));
    }
    Ok(targets.to_vec())
}

/// Applies the `--concurrency` override.
const fn resolve_engine_config(base: EngineConfig, concurrency: Option<usize>) -> EngineConfig {
    match concurrency {
        Some(max_concurrency) => EngineConfig {
            max_concurrency,
        },
        None => base,
    }
}

/// Maps an invocation report to the process exit code.
fn report_exit_code(report: &InvocationReport) -> ExitCode {
    if report.all_passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

/// Reads the wall clock as a run start timestamp.
fn unix_now() -> Timestamp {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    Timestamp::UnixMillis(i64::try_from(millis).unwrap_or(i64::MAX))
}

/// Renders the invocation report as console lines.
fn render_report_text(report: &InvocationReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        match outcome {
            TargetOutcome::Completed(run) => {
                let _ = writeln!(out, "== {} (plan {})", run.target, run.plan_hash);
                for entry in run.entries() {
                    let verdict = if entry.passed { "PASS" } else { "FAIL" };
                    let status =
                        entry.status.map_or_else(|| "none".to_string(), |status| status.to_string());
                    let _ = write!(out, "{verdict} {} status={status}", entry.test_case);
                    if let Some(error) = &entry.error {
                        let _ = write!(out, " error={error}");
                    }
                    out.push('\n');
                }
                let summary = run.summary();
                let _ = writeln!(
                    out,
                    "-- total={} passed={} failed={} all_passed={}",
                    summary.total,
                    summary.passed,
                    summary.failed,
                    summary.all_passed()
                );
            }
            TargetOutcome::Rejected {
                target,
                error,
            } => {
                let _ = writeln!(out, "REJECTED {target}: {error}");
            }
        }
    }
    let _ = writeln!(
        out,
        "targets={} rejected={} all_passed={}",
        report.outcomes.len(),
        report.rejected_count(),
        report.all_passed()
    );
    out
}

// ============================================================================
// SECTION: Cases Command
// ============================================================================

/// One planned case as printed by `cases`.
#[derive(Debug, Serialize)]
struct CaseListing {
    /// Case identifier.
    id: CaseId,
    /// Strategy name.
    strategy: &'static str,
    /// Expected outcome class.
    expected: ExpectedOutcomeClass,
    /// Encoded body size in bytes.
    body_bytes: usize,
    /// Whether credentials are attached.
    with_credentials: bool,
    /// Injection probe, if any.
    probe: Option<String>,
}

/// Case plan as printed by `cases`.
#[derive(Debug, Serialize)]
struct PlanListing {
    /// Endpoint signature.
    target: String,
    /// Plan fingerprint.
    plan_hash: HashDigest,
    /// Planned cases in order.
    cases: Vec<CaseListing>,
}

impl From<&CasePlan> for PlanListing {
    fn from(plan: &CasePlan) -> Self {
        Self {
            target: plan.signature.to_string(),
            plan_hash: plan.plan_hash.clone(),
            cases: plan
                .cases
                .iter()
                .map(|case| CaseListing {
                    id: case.id.clone(),
                    strategy: case.strategy_name(),
                    expected: case.expected,
                    body_bytes: case.body.len(),
                    with_credentials: case.with_credentials,
                    probe: case.probe.clone(),
                })
                .collect(),
        }
    }
}

/// Executes the `cases` command.
fn command_cases(command: &CasesCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let catalog = config.catalog().map_err(|err| CliError::new(err.to_string()))?;
    let contract = catalog.resolve(&command.target).map_err(|err| CliError::new(err.to_string()))?;
    let generator = CaseGenerator::new(config.generator_policy())
        .map_err(|err| CliError::new(err.to_string()))?;
    let plan = generator.plan(&contract).map_err(|err| CliError::new(err.to_string()))?;
    let listing = PlanListing::from(&plan);
    match command.format {
        OutputFormat::Text => write_stdout_text(&render_plan_text(&listing))?,
        OutputFormat::Json => write_json(&listing)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders a case plan as console lines.
fn render_plan_text(listing: &PlanListing) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} (plan {})", listing.target, listing.plan_hash);
    for case in &listing.cases {
        let _ = writeln!(
            out,
            "{} strategy={} expected={} body_bytes={} credentials={}",
            case.id,
            case.strategy,
            case.expected.as_str(),
            case.body_bytes,
            case.with_credentials
        );
    }
    let _ = writeln!(out, "-- cases={}", listing.cases.len());
    out
}

// ============================================================================
// SECTION: Catalog and Config Commands
// ============================================================================

/// Dispatches catalog subcommands.
fn command_catalog(command: CatalogCommand) -> CliResult<ExitCode> {
    match command {
        CatalogCommand::List(args) => command_catalog_list(&args),
    }
}

/// Lists the registered endpoint signatures.
fn command_catalog_list(args: &ConfigPathArgs) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let catalog = config.catalog().map_err(|err| CliError::new(err.to_string()))?;
    let mut out = String::new();
    for contract in catalog.contracts() {
        let auth = if contract.requires_auth { " (auth)" } else { "" };
        let _ = writeln!(out, "{}{auth}", contract.signature);
    }
    write_stdout_text(&out)?;
    Ok(ExitCode::SUCCESS)
}

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(args) => command_config_validate(&args),
    }
}

/// Executes the config validation command.
fn command_config_validate(args: &ConfigPathArgs) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    write_stdout_text(&format!(
        "config ok: {} contracts, {} targets\n",
        config.contracts.len(),
        config.targets.len()
    ))?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates the configuration file.
fn load_config(path: Option<&Path>) -> CliResult<FuzzerConfig> {
    FuzzerConfig::load(path).map_err(|err| CliError::new(format!("config load failed: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes pre-rendered text to stdout.
fn write_stdout_text(text: &str) -> CliResult<()> {
    let mut stdout = std::io::stdout();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes canonical JSON followed by a newline to stdout.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(format!("json serialization failed: {err}")))?;
    bytes.push(b'\n');
    let mut stdout = std::io::stdout();
    stdout
        .write_all(&bytes)
        .and_then(|()| stdout.flush())
        .map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output stream error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(&format!("error: {message}"));
    ExitCode::FAILURE
}

// crates/contract-fuzzer-http/src/audit.rs
// ============================================================================
// Module: Fuzz Audit Logging
// Description: JSON-lines sinks for engine progress events.
// Purpose: Route fuzz events to stderr or an append-only file.
// Dependencies: contract-fuzzer-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The engine emits [`FuzzEvent`]s through the [`FuzzEventSink`] seam and
//! never reads the wall clock. Sinks in this module stamp each event with
//! `timestamp_ms` and write one JSON object per line. Write failures are
//! swallowed so logging can never change a run's outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use contract_fuzzer_core::FuzzEvent;
use contract_fuzzer_core::FuzzEventSink;
use serde::Serialize;

// ============================================================================
// SECTION: Record Envelope
// ============================================================================

/// Timestamped envelope written for each event.
#[derive(Debug, Serialize)]
struct AuditRecord<'a> {
    /// Wall-clock time the sink observed the event (ms since epoch).
    timestamp_ms: u128,
    /// Event payload, flattened into the envelope.
    #[serde(flatten)]
    event: &'a FuzzEvent,
}

/// Serializes `event` into a single JSON line payload.
fn render(event: &FuzzEvent) -> Option<String> {
    let timestamp_ms =
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    serde_json::to_string(&AuditRecord {
        timestamp_ms,
        event,
    })
    .ok()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that writes JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl FuzzEventSink for StderrAuditSink {
    fn record(&self, event: &FuzzEvent) {
        if let Some(payload) = render(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle guarded for concurrent writers.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens (or creates) the audit log at `path` in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl FuzzEventSink for FileAuditSink {
    fn record(&self, event: &FuzzEvent) {
        if let Some(payload) = render(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// Runtime-selected audit sink.
pub enum AuditSink {
    /// Auditing disabled.
    Disabled,
    /// JSON lines on stderr.
    Stderr(StderrAuditSink),
    /// JSON lines appended to a file.
    File(FileAuditSink),
}

impl AuditSink {
    /// Builds the sink for the given audit settings.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when a file sink cannot be opened.
    pub fn open(enabled: bool, path: Option<&Path>) -> io::Result<Self> {
        if !enabled {
            return Ok(Self::Disabled);
        }
        match path {
            Some(path) => Ok(Self::File(FileAuditSink::new(path)?)),
            None => Ok(Self::Stderr(StderrAuditSink)),
        }
    }
}

impl FuzzEventSink for AuditSink {
    fn record(&self, event: &FuzzEvent) {
        match self {
            Self::Disabled => {}
            Self::Stderr(sink) => sink.record(event),
            Self::File(sink) => sink.record(event),
        }
    }
}

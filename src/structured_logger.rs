//! Structured JSONL logger for debugging and session reconstruction.
//!
//! Each line carries:
//! - a monotonic sequence number for ordering
//! - an ISO 8601 timestamp with microsecond precision
//! - the session id and the signing round (`run_id`)
//! - structured event data in JSON format

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::state_machine::{WorkflowCommand, WorkflowEvent};

/// Structured JSONL logger for a single signing session.
pub struct StructuredLogger {
    session_id: String,
    run_id: AtomicU64,
    seq: AtomicU64,
    log_file: Mutex<File>,
    log_path: PathBuf,
}

/// A single log entry in JSONL format.
#[derive(Serialize, serde::Deserialize)]
pub struct LogEntry {
    /// Monotonic sequence number (unique across entire session)
    pub seq: u64,
    /// ISO 8601 timestamp with microseconds
    pub ts: String,
    pub session_id: String,
    /// Signing round, incremented each time the session is reset
    pub run_id: u64,
    /// Component that emitted the log
    pub component: String,
    pub event: Value,
}

impl StructuredLogger {
    /// Creates a logger writing to `<logs_dir>/events.jsonl`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The logs directory cannot be created
    /// - The log file cannot be opened
    pub fn new(session_id: &str, logs_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(logs_dir)?;
        let log_path = logs_dir.join("events.jsonl");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            session_id: session_id.to_string(),
            run_id: AtomicU64::new(1),
            seq: AtomicU64::new(0),
            log_file: Mutex::new(file),
            log_path,
        })
    }

    /// Starts a new signing round.
    pub fn increment_run_id(&self) {
        self.run_id.fetch_add(1, Ordering::SeqCst);
    }

    /// The current signing round, starting at 1.
    pub fn run_id(&self) -> u64 {
        self.run_id.load(Ordering::SeqCst)
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Logs a structured event as a single JSON line.
    pub fn log(&self, component: &str, event: impl Serialize) {
        let entry = LogEntry {
            seq: self.next_seq(),
            ts: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            session_id: self.session_id.clone(),
            run_id: self.run_id.load(Ordering::SeqCst),
            component: component.to_string(),
            event: serde_json::to_value(event).unwrap_or(Value::Null),
        };

        if let Ok(mut file) = self.log_file.lock() {
            if let Ok(line) = serde_json::to_string(&entry) {
                let _ = writeln!(file, "{}", line);
                let _ = file.flush();
            }
        }
    }

    pub fn log_startup(&self, build: &str, mode: &str) {
        self.log(
            "App",
            serde_json::json!({
                "type": "Startup",
                "build": build,
                "mode": mode
            }),
        );
    }

    pub fn log_command(&self, version: u64, command: &WorkflowCommand) {
        self.log(
            "Workflow",
            serde_json::json!({
                "type": "Command",
                "version": version,
                "command": command
            }),
        );
    }

    pub fn log_event(&self, version: u64, event: &WorkflowEvent) {
        self.log(
            "Workflow",
            serde_json::json!({
                "type": "Event",
                "version": version,
                "event": event
            }),
        );
    }

    /// Logs one pointer operation on the signature surface.
    pub fn log_pointer(&self, action: &str, accepted: bool) {
        self.log(
            "Surface",
            serde_json::json!({
                "type": "Pointer",
                "action": action,
                "accepted": accepted
            }),
        );
    }

    pub fn log_export(&self, dir: &Path) {
        self.log(
            "Receipt",
            serde_json::json!({
                "type": "Exported",
                "dir": dir.display().to_string()
            }),
        );
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
#[path = "tests/structured_logger_tests.rs"]
mod tests;

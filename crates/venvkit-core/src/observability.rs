//! Observability: tracing init and the JSONL audit log.
//!
//! Uses config::ObservabilityConfig for VENVKIT_QUIET, LOG_LEVEL, LOG_JSON, AUDIT_LOG.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

static AUDIT_PATH: Mutex<Option<String>> = Mutex::new(None);

/// Initialize tracing. Call once at process startup.
/// When VENVKIT_QUIET=1 only WARN and above are logged; RUST_LOG overrides both.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "venvkit=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn get_audit_path() -> Option<String> {
    {
        let guard = AUDIT_PATH.lock().ok()?;
        if let Some(ref p) = *guard {
            return Some(p.clone());
        }
    }
    let path = ObservabilityConfig::from_env().audit_log.clone()?;
    if let Some(parent) = Path::new(&path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    {
        let mut guard = AUDIT_PATH.lock().ok()?;
        *guard = Some(path.clone());
    }
    Some(path)
}

fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn append_jsonl(path: &str, record: &serde_json::Value) {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut f) => {
            if let Ok(line) = serde_json::to_string(record) {
                let _ = writeln!(f, "{}", line);
            }
        }
        Err(e) => tracing::debug!(path = %path, error = %e, "Audit log not writable"),
    }
}

fn audit(record: serde_json::Value) {
    if let Some(path) = get_audit_path() {
        append_jsonl(&path, &record);
    }
}

/// Audit: bootstrap_started
pub fn audit_bootstrap_started(project_dir: &str, venv_dir: &str, python: &str) {
    audit(json!({
        "ts": now_ts(),
        "event": "bootstrap_started",
        "project_dir": project_dir,
        "venv_dir": venv_dir,
        "python": python,
    }));
}

/// Audit: venv_created (only when the directory did not exist before)
pub fn audit_venv_created(venv_dir: &str, python: &str, duration_ms: u64) {
    audit(json!({
        "ts": now_ts(),
        "event": "venv_created",
        "venv_dir": venv_dir,
        "python": python,
        "duration_ms": duration_ms,
    }));
}

/// Audit: install_completed
pub fn audit_install_completed(
    manifest: &str,
    manifest_sha256: Option<&str>,
    requirements: usize,
    exit_code: i32,
    duration_ms: u64,
) {
    audit(json!({
        "ts": now_ts(),
        "event": "install_completed",
        "manifest": manifest,
        "manifest_sha256": manifest_sha256,
        "requirements": requirements,
        "exit_code": exit_code,
        "duration_ms": duration_ms,
        "success": exit_code == 0,
    }));
}

/// Audit: bootstrap_completed
pub fn audit_bootstrap_completed(venv_dir: &str, created: bool, python_version: &str, duration_ms: u64) {
    audit(json!({
        "ts": now_ts(),
        "event": "bootstrap_completed",
        "venv_dir": venv_dir,
        "created": created,
        "python_version": python_version,
        "duration_ms": duration_ms,
    }));
}

/// Audit: bootstrap_failed
pub fn audit_bootstrap_failed(error: &str, exit_code: i32) {
    audit(json!({
        "ts": now_ts(),
        "event": "bootstrap_failed",
        "error": error,
        "exit_code": exit_code,
    }));
}

/// Audit: venv_removed (`venvkit clean`)
pub fn audit_venv_removed(venv_dir: &str, freed_bytes: u64) {
    audit(json!({
        "ts": now_ts(),
        "event": "venv_removed",
        "venv_dir": venv_dir,
        "freed_bytes": freed_bytes,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_jsonl_appends_one_record_per_line() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("audit.jsonl");
        let path = path.to_string_lossy().to_string();

        append_jsonl(&path, &json!({"event": "a", "n": 1}));
        append_jsonl(&path, &json!({"event": "b", "n": 2}));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "b");
        assert_eq!(second["n"], 2);
    }

    #[test]
    fn test_timestamp_is_rfc3339_utc() {
        let ts = now_ts();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}

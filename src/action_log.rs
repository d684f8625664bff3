//! Action logging for Taskpet commands.
//!
//! Every command invocation is appended as one JSON line to
//! `<data-root>/action.log`. Arguments are sanitized first: passwords and
//! tokens are redacted and email addresses are masked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the log file under the data root.
pub const ACTION_LOG_FILE: &str = "action.log";

const MAX_STRING_LEN: usize = 100;

/// A single action log entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionLog {
    /// When the command finished
    pub timestamp: DateTime<Utc>,

    /// Workspace the command ran against
    pub workspace: String,

    /// Command name (e.g., "login", "quest create")
    pub command: String,

    /// Sanitized command arguments
    pub args: serde_json::Value,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub duration_ms: u64,

    /// OS user who ran the command
    pub user: String,
}

impl ActionLog {
    /// Build an entry, sanitizing `args`.
    pub fn new(
        workspace: &Path,
        command: &str,
        args: &serde_json::Value,
        success: bool,
        error: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            workspace: workspace.to_string_lossy().to_string(),
            command: command.to_string(),
            args: sanitize_args(args),
            success,
            error,
            duration_ms,
            user: get_current_user(),
        }
    }
}

/// Path of the action log under a data root.
pub fn log_path(data_root: &Path) -> PathBuf {
    data_root.join(ACTION_LOG_FILE)
}

/// Append an entry to the action log.
///
/// Never fails the caller: write errors are reported as warnings and
/// swallowed.
pub fn log_action(data_root: &Path, entry: &ActionLog) {
    let path = log_path(data_root);
    if let Err(e) = write_log_entry(&path, entry) {
        tracing::warn!(path = %path.display(), error = %e, "failed to write action log");
    }
}

fn write_log_entry(path: &Path, entry: &ActionLog) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string(entry)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)?;

    Ok(())
}

/// Sanitize arguments to remove sensitive data.
pub fn sanitize_args(args: &serde_json::Value) -> serde_json::Value {
    match args {
        serde_json::Value::Object(map) => {
            let mut sanitized = serde_json::Map::new();
            for (key, value) in map {
                let key_lower = key.to_lowercase();
                if key_lower.contains("password")
                    || key_lower.contains("token")
                    || key_lower.contains("secret")
                {
                    sanitized.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    sanitized.insert(key.clone(), sanitize_args(value));
                }
            }
            serde_json::Value::Object(sanitized)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(sanitize_args).collect())
        }
        serde_json::Value::String(s) => serde_json::Value::String(sanitize_string(s)),
        _ => args.clone(),
    }
}

fn sanitize_string(s: &str) -> String {
    let masked = match s.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            let first: String = local.chars().take(1).collect();
            format!("{}***@{}", first, domain)
        }
        _ => s.to_string(),
    };

    let len = masked.chars().count();
    if len > MAX_STRING_LEN {
        let head: String = masked.chars().take(MAX_STRING_LEN - 3).collect();
        format!("{}... ({} chars)", head, len)
    } else {
        masked
    }
}

fn get_current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

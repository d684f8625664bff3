//! Storage layer for Taskpet data.
//!
//! Runtime state lives in a flat string-to-string key-value store, one per
//! workspace, at `~/.local/share/taskpet/<workspace-hash>/store.db` (or
//! under `TP_DATA_DIR` when set). List-valued keys hold JSON arrays; see
//! [`keys`] for the key names.
//!
//! The session-level `config.kdl` lives next to the store.

pub mod keys;

use crate::config::TaskpetConfig;
use crate::{Error, Result};
use kdl::KdlDocument;
use rusqlite::{Connection, OptionalExtension, params};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "TP_DATA_DIR";

/// Environment variable overriding the system config directory.
pub const CONFIG_DIR_ENV: &str = "TP_CONFIG_DIR";

/// Key-value store for a single workspace.
pub struct Storage {
    /// Directory holding this workspace's data
    pub root: PathBuf,
    conn: Connection,
}

impl Storage {
    /// Open the store for a workspace, creating it on first use.
    pub fn open(workspace: &Path) -> Result<Self> {
        let data_root = get_data_root()?;
        Self::open_with_data_dir(workspace, &data_root)
    }

    /// Open the store for a workspace under an explicit data root.
    pub fn open_with_data_dir(workspace: &Path, data_root: &Path) -> Result<Self> {
        let root = get_storage_dir(workspace, data_root)?;
        fs::create_dir_all(&root)?;

        let db_path = root.join("store.db");
        let conn = Connection::open(&db_path)?;
        Self::init_schema(&conn)?;
        tracing::debug!(path = %db_path.display(), "opened store");

        Ok(Self { root, conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // === Key-value Operations ===

    /// Get the value stored under `key`.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        tracing::trace!(key, "set item");
        Ok(())
    }

    /// Remove `key`. Removing a missing key is not an error.
    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        tracing::trace!(key, "removed item");
        Ok(())
    }

    /// Remove every key.
    pub fn clear(&mut self) -> Result<()> {
        let removed = self.conn.execute("DELETE FROM kv", [])?;
        tracing::debug!(removed, "cleared store");
        Ok(())
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }

    // === Config Files ===

    /// Path to the session-level config.kdl.
    pub fn config_kdl_path(&self) -> PathBuf {
        self.root.join("config.kdl")
    }

    /// Read the session-level config (empty when the file is absent).
    pub fn read_config(&self) -> Result<TaskpetConfig> {
        let doc = read_kdl(&self.config_kdl_path())?;
        Ok(TaskpetConfig::from_kdl(&doc))
    }

    /// Write the session-level config.
    pub fn write_config(&self, config: &TaskpetConfig) -> Result<()> {
        config.validate().map_err(Error::Config)?;
        fs::write(self.config_kdl_path(), config.to_kdl().to_string())?;
        Ok(())
    }

    /// Path to the system-level config.kdl, if a config directory is known.
    pub fn system_config_kdl_path() -> Option<PathBuf> {
        get_system_config_dir().map(|dir| dir.join("config.kdl"))
    }

    /// Read the system-level config (empty when absent).
    pub fn read_system_config() -> Result<TaskpetConfig> {
        match Self::system_config_kdl_path() {
            Some(path) => Ok(TaskpetConfig::from_kdl(&read_kdl(&path)?)),
            None => Ok(TaskpetConfig::new()),
        }
    }
}

fn read_kdl(path: &Path) -> Result<KdlDocument> {
    if !path.exists() {
        return Ok(KdlDocument::new());
    }
    let content = fs::read_to_string(path)?;
    content
        .parse::<KdlDocument>()
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
}

/// Data root: `TP_DATA_DIR` if set, otherwise `<XDG data dir>/taskpet`.
pub fn get_data_root() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("taskpet"))
}

/// System config directory: `TP_CONFIG_DIR` if set, otherwise
/// `<XDG config dir>/taskpet`.
pub fn get_system_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::config_dir().map(|d| d.join("taskpet"))
}

/// Get the storage directory for a workspace.
///
/// Uses a hash of the canonical workspace path so that every directory gets
/// its own store, the way every browser origin gets its own local storage.
pub fn get_storage_dir(workspace: &Path, data_root: &Path) -> Result<PathBuf> {
    let canonical = workspace
        .canonicalize()
        .map_err(|e| Error::Other(format!("Could not canonicalize workspace path: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());

    Ok(data_root.join(&hash_hex[..12]))
}

//! Common test utilities for taskpet integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/taskpet/` directory.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
pub use tempfile::TempDir;

pub const USERS_JSON: &str = r#"{
    "users": [
        {"id": "user-1", "email": "lead@example.com", "password": "lead123", "name": "Lena", "role": "leader"},
        {"id": "user-2", "email": "mem@example.com", "password": "mem123", "name": "Milo", "role": "member"},
        {"id": "user-3", "email": "other@example.com", "password": "other123", "name": "Ova", "role": "member"}
    ]
}"#;

pub const PROJECTS_JSON: &str = r#"{
    "projects": [
        {"id": "proj-1", "name": "Garden", "description": "Grow things", "leader_id": "user-1", "members": ["user-1", "user-2"], "created_at": "2024-01-01T00:00:00Z"},
        {"id": "proj-2", "name": "Workshop", "description": "", "leader_id": "user-1", "members": ["user-1", "user-3"], "created_at": "2024-01-02T00:00:00Z"}
    ]
}"#;

pub const QUESTS_JSON: &str = r#"{
    "quests": [
        {"id": "quest-1", "project_id": "proj-1", "title": "Water plants", "description": "Daily", "xp_reward": 20, "status": "open", "created_by": "user-1", "created_at": "2024-01-03T00:00:00Z"},
        {"id": "quest-2", "project_id": "proj-1", "title": "Pull weeds", "description": "", "xp_reward": 40, "status": "closed", "created_by": "user-1", "created_at": "2024-01-04T00:00:00Z"},
        {"id": "quest-3", "project_id": "proj-2", "title": "Sharpen saw", "description": "Carefully", "xp_reward": 30, "status": "open", "created_by": "user-1", "created_at": "2024-01-05T00:00:00Z"}
    ]
}"#;

/// A test environment with isolated storage and fixtures.
///
/// Each `TestEnv` creates three temporary directories:
/// - `workspace`: The directory `tp` runs in; fixtures live in `data/`
/// - `data_dir`: Holds the store and action log (via `TP_DATA_DIR`)
/// - `config_dir`: System config directory (via `TP_CONFIG_DIR`)
///
/// The `tp()` method sets these per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub workspace: TempDir,
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with the default fixtures written.
    pub fn new() -> Self {
        let env = Self {
            workspace: TempDir::new().unwrap(),
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        };
        env.write_fixtures(USERS_JSON, PROJECTS_JSON, QUESTS_JSON);
        env
    }

    /// Create an environment and log in as the given fixture user.
    pub fn login(email: &str, password: &str) -> Self {
        let env = Self::new();
        env.tp().args(["login", email, password]).assert().success();
        env
    }

    /// Logged in as Lena, the leader.
    pub fn leader() -> Self {
        Self::login("lead@example.com", "lead123")
    }

    /// Logged in as Milo, a member of proj-1.
    pub fn member() -> Self {
        Self::login("mem@example.com", "mem123")
    }

    pub fn write_fixtures(&self, users: &str, projects: &str, quests: &str) {
        let dir = self.workspace.path().join("data");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("users.json"), users).unwrap();
        fs::write(dir.join("projects.json"), projects).unwrap();
        fs::write(dir.join("quests.json"), quests).unwrap();
    }

    /// Get a Command for the tp binary with isolated directories.
    pub fn tp(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tp"));
        cmd.current_dir(self.workspace.path());
        cmd.env("TP_DATA_DIR", self.data_dir.path());
        cmd.env("TP_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("TP_WORKSPACE");
        cmd.env_remove("TP_FIXTURES");
        cmd.env_remove("TP_PROJECT");
        cmd.env_remove("TP_LOG");
        cmd
    }

    /// Run a command that must succeed and parse its stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.tp().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "tp {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Log out, keeping runtime data, and log in as someone else.
    pub fn switch_user(&self, email: &str, password: &str) {
        self.tp().args(["logout", "--keep-data"]).assert().success();
        self.tp().args(["login", email, password]).assert().success();
    }

    pub fn path(&self) -> &std::path::Path {
        self.workspace.path()
    }

    pub fn data_path(&self) -> &std::path::Path {
        self.data_dir.path()
    }

    pub fn config_path(&self) -> &std::path::Path {
        self.config_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

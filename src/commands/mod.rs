//! Command implementations for the Taskpet CLI.
//!
//! This module contains the business logic for each CLI command, organized
//! by view:
//! - `auth` - Login, logout and the current session
//! - `project` - Project list, creation and deletion
//! - `leader` - Quest authoring for one project
//! - `member` - Quest acceptance and progress for one project
//! - `pet` - Experience, level and recent completions
//! - `config` - Showing and editing config.kdl
//!
//! Every command returns a result type implementing [`Output`].

pub mod auth;
pub mod config;
pub mod leader;
pub mod member;
pub mod pet;
pub mod project;

use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to a JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Serialize a result, falling back to an empty object.
pub(crate) fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

/// Result of a destructive command the user declined to confirm.
#[derive(Debug, Serialize)]
pub struct Cancelled {
    pub cancelled: bool,
    pub action: String,
}

impl Cancelled {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            cancelled: true,
            action: action.into(),
        }
    }
}

impl Output for Cancelled {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Cancelled: {}", self.action)
    }
}

/// Text shown for an empty description.
pub(crate) fn description_or_default(description: &str) -> &str {
    if description.trim().is_empty() {
        "No description"
    } else {
        description
    }
}

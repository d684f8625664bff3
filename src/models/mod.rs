//! Data models for Taskpet entities.
//!
//! This module defines the core data structures:
//! - `User` - Fixture-only accounts with a role
//! - `Project` - A named group of members led by one leader
//! - `Quest` - A unit of work with an XP reward, scoped to a project
//! - `Progress` - Per-user, per-quest acceptance and completion state
//! - `Session` - The logged-in user as recorded in the store
//!
//! Field names follow the JSON shape of the fixture files and of the lists
//! kept in the store, so every model round-trips through serde unchanged.

pub mod pet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// User role, controlling quest-authoring vs quest-consuming views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Leader,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "leader",
            Role::Member => "member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a role string as stored in the session.
pub fn parse_role(s: &str) -> Result<Role> {
    match s {
        "leader" => Ok(Role::Leader),
        "member" => Ok(Role::Member),
        _ => Err(Error::InvalidInput(format!("Invalid role: {}", s))),
    }
}

/// A fixture account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    /// Plaintext, as in the fixture file
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// A project grouping members under a leader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier (e.g., "proj-1700000000000")
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub leader_id: String,

    /// Member user IDs (the leader is normally one of them)
    #[serde(default)]
    pub members: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    /// Create a new project led by `leader_id`, who is also its sole member.
    pub fn new(id: String, name: String, description: String, leader_id: String) -> Self {
        Self {
            id,
            name,
            description,
            members: vec![leader_id.clone()],
            leader_id,
            created_at: Some(Utc::now()),
        }
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }
}

/// Quest availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    #[default]
    Open,
    Closed,
}

impl QuestStatus {
    /// The status a toggle switches to.
    pub fn toggled(self) -> Self {
        match self {
            QuestStatus::Open => QuestStatus::Closed,
            QuestStatus::Closed => QuestStatus::Open,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Open => "open",
            QuestStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a quest status string (case-insensitive).
pub fn parse_quest_status(s: &str) -> Result<QuestStatus> {
    match s.to_lowercase().as_str() {
        "open" => Ok(QuestStatus::Open),
        "closed" => Ok(QuestStatus::Closed),
        _ => Err(Error::InvalidInput(format!(
            "Invalid quest status: {} (expected open or closed)",
            s
        ))),
    }
}

/// A unit of work with an XP reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    /// Unique identifier (e.g., "quest-1700000000000")
    pub id: String,

    /// Owning project, by convention only (never checked)
    pub project_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Experience awarded on completion
    #[serde(default)]
    pub xp_reward: u32,

    #[serde(default)]
    pub status: QuestStatus,

    #[serde(default)]
    pub created_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Quest {
    /// Create a new quest in `project_id` authored by `created_by`.
    pub fn new(
        id: String,
        project_id: String,
        title: String,
        xp_reward: u32,
        created_by: String,
    ) -> Self {
        Self {
            id,
            project_id,
            title,
            description: String::new(),
            xp_reward,
            status: QuestStatus::default(),
            created_by,
            created_at: Some(Utc::now()),
        }
    }
}

/// Progress record status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    #[default]
    InProgress,
    Completed,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatus::InProgress => write!(f, "in_progress"),
            ProgressStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Placeholder title used when a quest cannot be resolved at acceptance.
pub const UNKNOWN_QUEST_TITLE: &str = "Unknown Quest";

/// A member's acceptance of a quest. Identity is (user_id, quest_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub user_id: String,

    pub quest_id: String,

    /// Quest title captured at acceptance
    pub quest_title: String,

    #[serde(default)]
    pub status: ProgressStatus,

    /// Percentage, 0-100
    #[serde(default)]
    pub progress: u8,

    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Progress {
    /// Start a fresh, in-progress record at 0%.
    pub fn new(user_id: String, quest_id: String, quest_title: String) -> Self {
        Self {
            user_id,
            quest_id,
            quest_title,
            status: ProgressStatus::InProgress,
            progress: 0,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn matches(&self, user_id: &str, quest_id: &str) -> bool {
        self.user_id == user_id && self.quest_id == quest_id
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProgressStatus::Completed
    }

    /// Mark as completed now.
    pub fn complete(&mut self) {
        self.status = ProgressStatus::Completed;
        self.progress = 100;
        self.completed_at = Some(Utc::now());
    }
}

/// The logged-in user, as recorded in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque marker derived from the user id; not a real credential
    pub token: String,
    pub user_id: String,
    pub user_name: String,
    pub role: Role,
}

impl Session {
    /// Build the session written at login.
    pub fn for_user(user: &User) -> Self {
        Self {
            token: format!("mock-jwt-{}", user.id),
            user_id: user.id.clone(),
            user_name: user.name.clone(),
            role: user.role,
        }
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }
}

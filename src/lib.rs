//! Taskpet - a gamified quest tracker.
//!
//! Leaders create projects and quests, members accept quests and report
//! progress, and every completed quest feeds experience into a pet that
//! levels up. This library provides the core functionality for the `tp` CLI.

pub mod action_log;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fixtures;
pub mod models;
pub mod state;
pub mod storage;


/// Library-level error type for Taskpet operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not logged in: run `tp login <email> <password>` first")]
    NotAuthenticated,

    #[error("Already logged in as {0}: run `tp logout` first")]
    AlreadyAuthenticated(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("You already accepted this quest")]
    AlreadyAccepted,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Error loading {file}: {reason}")]
    Fixture { file: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Taskpet operations.
pub type Result<T> = std::result::Result<T, Error>;

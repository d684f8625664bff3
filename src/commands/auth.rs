//! Login, logout and session inspection.

use serde::Serialize;

use super::{Output, json_of};
use crate::models::{Role, Session};
use crate::state::AppState;
use crate::{Error, Result};

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub logged_in: bool,
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

impl Output for LoginResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Logged in as {} ({})\nNext: tp project list",
            self.name, self.role
        )
    }
}

/// Check `email` and `password` against the fixture users and start a session.
///
/// The match is exact on both fields. A visitor who already holds a session
/// is turned away before any credentials are checked.
pub fn login(state: &mut AppState, email: &str, password: &str) -> Result<LoginResult> {
    if let Some(session) = state.session()? {
        return Err(Error::AlreadyAuthenticated(session.user_name));
    }

    let users = state.static_users()?;
    let user = users
        .iter()
        .find(|u| u.email == email && u.password == password)
        .ok_or(Error::InvalidCredentials)?;

    let session = Session::for_user(user);
    state.set_session(&session)?;
    tracing::info!(user_id = %user.id, role = %user.role, "logged in");

    Ok(LoginResult {
        logged_in: true,
        user_id: session.user_id,
        name: session.user_name,
        role: session.role,
    })
}

#[derive(Debug, Serialize)]
pub struct LogoutResult {
    pub logged_out: bool,
    /// Whether runtime projects, quests and progress were wiped too
    pub cleared_data: bool,
}

impl Output for LogoutResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match (self.logged_out, self.cleared_data) {
            (true, true) => "Logged out (store cleared)".to_string(),
            (true, false) => "Logged out".to_string(),
            (false, true) => "Not logged in (store cleared)".to_string(),
            (false, false) => "Not logged in".to_string(),
        }
    }
}

/// End the session.
///
/// Logging out empties the whole store, runtime data included, unless
/// `keep_data` is set, in which case only the session keys are removed.
pub fn logout(state: &mut AppState, keep_data: bool) -> Result<LogoutResult> {
    let had_session = state.has_session()?;

    if keep_data {
        state.clear_session()?;
    } else {
        state.clear_all()?;
    }
    tracing::info!(keep_data, "logged out");

    Ok(LogoutResult {
        logged_out: had_session,
        cleared_data: !keep_data,
    })
}

#[derive(Debug, Serialize)]
pub struct WhoamiResult {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Output for WhoamiResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match (&self.name, &self.role) {
            (Some(name), Some(role)) => format!("{} ({})", name, role),
            _ => "Not logged in".to_string(),
        }
    }
}

pub fn whoami(state: &AppState) -> Result<WhoamiResult> {
    Ok(match state.session()? {
        Some(session) => WhoamiResult {
            logged_in: true,
            user_id: Some(session.user_id),
            name: Some(session.user_name),
            role: Some(session.role),
        },
        None => WhoamiResult {
            logged_in: false,
            user_id: None,
            name: None,
            role: None,
        },
    })
}

//! Store key names.
//!
//! These match the keys of the browser store the data was first kept in, so
//! an exported store can be loaded as-is.

pub const TOKEN: &str = "token";
pub const USER_ID: &str = "userId";
pub const USER_NAME: &str = "userName";
pub const ROLE: &str = "role";

/// Runtime-created projects (JSON array)
pub const PROJECTS: &str = "projects";
/// Runtime-created quests (JSON array)
pub const QUESTS: &str = "quests";
/// All progress records for all users (JSON array)
pub const USER_PROGRESS: &str = "userProgress";

/// Session keys, in the order they are written at login.
pub const SESSION_KEYS: [&str; 4] = [TOKEN, USER_ID, USER_NAME, ROLE];

/// Key holding the manual quest order of one project (JSON array of ids).
pub fn quest_order(project_id: &str) -> String {
    format!("questOrder-{}", project_id)
}

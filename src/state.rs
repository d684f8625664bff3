//! Application state: the static fixtures plus the runtime store.
//!
//! Every read of a list goes through here, so the points where static and
//! runtime data meet are explicit:
//!
//! | Data | Static (fixtures) | Runtime (store key) |
//! |---|---|---|
//! | users | `users.json` | - |
//! | projects | `projects.json` | `projects` |
//! | quests | `quests.json` | `quests` |
//! | progress | - | `userProgress` |
//! | manual quest order | - | `questOrder-<project>` |
//!
//! A missing list key reads as an empty list. A present but malformed value
//! is an error.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::fixtures::Fixtures;
use crate::models::{Progress, Project, Quest, Session, User, parse_role};
use crate::storage::{Storage, keys};
use crate::{Error, Result};

pub struct AppState {
    storage: Storage,
    fixtures: Fixtures,
}

impl AppState {
    pub fn new(storage: Storage, fixtures: Fixtures) -> Self {
        Self { storage, fixtures }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    // === Session ===

    /// The current session, if a token is present.
    pub fn session(&self) -> Result<Option<Session>> {
        let Some(token) = self.storage.get_item(keys::TOKEN)? else {
            return Ok(None);
        };

        let user_id = self.storage.get_item(keys::USER_ID)?.unwrap_or_default();
        let user_name = self.storage.get_item(keys::USER_NAME)?.unwrap_or_default();
        let role = match self.storage.get_item(keys::ROLE)? {
            Some(role) => parse_role(&role)?,
            None => Default::default(),
        };

        Ok(Some(Session {
            token,
            user_id,
            user_name,
            role,
        }))
    }

    /// Whether a session token is stored, without reading the rest of the
    /// session.
    pub fn has_session(&self) -> Result<bool> {
        Ok(self.storage.get_item(keys::TOKEN)?.is_some())
    }

    /// The current session, or `NotAuthenticated`.
    pub fn require_session(&self) -> Result<Session> {
        self.session()?.ok_or(Error::NotAuthenticated)
    }

    /// The current session, which must belong to a leader.
    pub fn require_leader(&self) -> Result<Session> {
        let session = self.require_session()?;
        if !session.is_leader() {
            return Err(Error::Forbidden(format!(
                "{} is a {}, this requires a leader",
                session.user_name, session.role
            )));
        }
        Ok(session)
    }

    pub fn set_session(&mut self, session: &Session) -> Result<()> {
        self.storage.set_item(keys::TOKEN, &session.token)?;
        self.storage.set_item(keys::USER_ID, &session.user_id)?;
        self.storage.set_item(keys::USER_NAME, &session.user_name)?;
        self.storage.set_item(keys::ROLE, session.role.as_str())?;
        Ok(())
    }

    /// Remove only the session keys.
    pub fn clear_session(&mut self) -> Result<()> {
        for key in keys::SESSION_KEYS {
            self.storage.remove_item(key)?;
        }
        Ok(())
    }

    /// Remove the session and all runtime data.
    pub fn clear_all(&mut self) -> Result<()> {
        self.storage.clear()
    }

    // === Static lists ===

    pub fn static_users(&self) -> Result<Vec<User>> {
        self.fixtures.users()
    }

    pub fn static_projects(&self) -> Result<Vec<Project>> {
        self.fixtures.projects()
    }

    pub fn static_quests(&self) -> Result<Vec<Quest>> {
        self.fixtures.quests()
    }

    // === Runtime lists ===

    pub fn runtime_projects(&self) -> Result<Vec<Project>> {
        self.read_list(keys::PROJECTS)
    }

    pub fn set_runtime_projects(&mut self, projects: &[Project]) -> Result<()> {
        self.write_list(keys::PROJECTS, projects)
    }

    pub fn runtime_quests(&self) -> Result<Vec<Quest>> {
        self.read_list(keys::QUESTS)
    }

    pub fn set_runtime_quests(&mut self, quests: &[Quest]) -> Result<()> {
        self.write_list(keys::QUESTS, quests)
    }

    /// Progress records of every user.
    pub fn progress(&self) -> Result<Vec<Progress>> {
        self.read_list(keys::USER_PROGRESS)
    }

    pub fn set_progress(&mut self, progress: &[Progress]) -> Result<()> {
        self.write_list(keys::USER_PROGRESS, progress)
    }

    /// Stored manual order of a project's quests (empty if never reordered).
    pub fn quest_order(&self, project_id: &str) -> Result<Vec<String>> {
        self.read_list(&keys::quest_order(project_id))
    }

    pub fn set_quest_order(&mut self, project_id: &str, order: &[String]) -> Result<()> {
        self.write_list(&keys::quest_order(project_id), order)
    }

    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.storage.get_item(key)? {
            Some(value) => serde_json::from_str(&value).map_err(|e| {
                Error::Other(format!("Stored value for '{}' is not a valid list: {}", key, e))
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write_list<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.storage.set_item(key, &json)
    }
}

/// Generate a timestamp-derived ID (`<prefix>-<unix millis>`) not already
/// in `existing`.
pub fn generate_id<'a>(prefix: &str, existing: impl Iterator<Item = &'a str> + Clone) -> String {
    let mut millis = Utc::now().timestamp_millis();
    loop {
        let id = format!("{}-{}", prefix, millis);
        if !existing.clone().any(|e| e == id) {
            return id;
        }
        millis += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_utils::TestEnv;

    fn leader_session() -> Session {
        Session {
            token: "mock-jwt-user-1".to_string(),
            user_id: "user-1".to_string(),
            user_name: "Lena".to_string(),
            role: Role::Leader,
        }
    }

    #[test]
    fn test_no_session_by_default() {
        let env = TestEnv::new();
        let state = env.state();
        assert!(state.session().unwrap().is_none());
        assert!(matches!(
            state.require_session(),
            Err(Error::NotAuthenticated)
        ));
    }

    #[test]
    fn test_session_roundtrip() {
        let env = TestEnv::new();
        let mut state = env.state();
        state.set_session(&leader_session()).unwrap();

        assert_eq!(state.session().unwrap(), Some(leader_session()));
        assert!(state.require_leader().is_ok());
    }

    #[test]
    fn test_require_leader_rejects_member() {
        let env = TestEnv::new();
        let mut state = env.state();
        let mut session = leader_session();
        session.role = Role::Member;
        state.set_session(&session).unwrap();

        assert!(matches!(state.require_leader(), Err(Error::Forbidden(_))));
    }

    #[test]
    fn test_clear_session_keeps_runtime_lists() {
        let env = TestEnv::new();
        let mut state = env.state();
        state.set_session(&leader_session()).unwrap();
        state
            .set_quest_order("proj-1", &["quest-2".to_string()])
            .unwrap();

        state.clear_session().unwrap();

        assert!(state.session().unwrap().is_none());
        assert_eq!(state.quest_order("proj-1").unwrap(), vec!["quest-2"]);
    }

    #[test]
    fn test_clear_all_wipes_runtime_lists() {
        let env = TestEnv::new();
        let mut state = env.state();
        state.set_session(&leader_session()).unwrap();
        state
            .set_quest_order("proj-1", &["quest-2".to_string()])
            .unwrap();

        state.clear_all().unwrap();

        assert!(state.session().unwrap().is_none());
        assert!(state.quest_order("proj-1").unwrap().is_empty());
    }

    #[test]
    fn test_missing_lists_read_empty() {
        let env = TestEnv::new();
        let state = env.state();
        assert!(state.runtime_projects().unwrap().is_empty());
        assert!(state.runtime_quests().unwrap().is_empty());
        assert!(state.progress().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_list_is_error() {
        let env = TestEnv::new();
        let mut storage = env.open_storage();
        storage.set_item(keys::QUESTS, "{not a list").unwrap();
        let state = env.state();

        assert!(state.runtime_quests().is_err());
    }

    #[test]
    fn test_runtime_quests_roundtrip() {
        let env = TestEnv::new();
        let mut state = env.state();
        let quest = Quest::new(
            "quest-9".to_string(),
            "proj-1".to_string(),
            "Dig".to_string(),
            15,
            "user-1".to_string(),
        );
        state.set_runtime_quests(std::slice::from_ref(&quest)).unwrap();

        let quests = state.runtime_quests().unwrap();
        assert_eq!(quests.len(), 1);
        assert_eq!(quests[0].title, "Dig");
        assert_eq!(quests[0].xp_reward, 15);
    }

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("quest", std::iter::empty());
        assert!(id.starts_with("quest-"));
        assert!(id["quest-".len()..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_id_skips_existing() {
        let first = generate_id("proj", std::iter::empty());
        let existing = [first.as_str()];
        let second = generate_id("proj", existing.iter().copied());
        assert_ne!(first, second);
    }
}

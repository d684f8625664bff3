//! Quest acceptance and progress reporting.
//!
//! Members only see open quests from the fixtures; quests created at runtime
//! by a leader never appear on this board. A progress record is keyed by
//! (user, quest) and there is at most one per pair.

use serde::Serialize;

use super::project::project_name;
use super::{Output, description_or_default, json_of};
use crate::models::{Progress, ProgressStatus, Quest, QuestStatus, UNKNOWN_QUEST_TITLE};
use crate::state::AppState;
use crate::{Error, Result};

#[derive(Debug, Serialize)]
pub struct MemberBoard {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Open fixture quests of the project
    pub available: Vec<Quest>,
    /// The user's progress on the project's fixture quests
    pub my_progress: Vec<Progress>,
}

impl Output for MemberBoard {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref name) = self.project_name {
            lines.push(format!("Project: {}\n", name));
        }

        lines.push("Available quests:".to_string());
        if self.available.is_empty() {
            lines.push("  No open quests.".to_string());
        }
        for quest in &self.available {
            lines.push(format!("  {}  {}  ({} XP)", quest.id, quest.title, quest.xp_reward));
            lines.push(format!("      {}", description_or_default(&quest.description)));
        }

        lines.push(String::new());
        lines.push("My progress:".to_string());
        if self.my_progress.is_empty() {
            lines.push("  You haven't accepted any quests yet.".to_string());
        }
        for p in &self.my_progress {
            lines.push(format_progress(p));
        }
        lines.join("\n")
    }
}

fn format_progress(p: &Progress) -> String {
    match p.status {
        ProgressStatus::Completed => format!("  {}  {}  completed", p.quest_id, p.quest_title),
        ProgressStatus::InProgress => format!(
            "  {}  {}  {}%  (tp member progress {} <0-100> | tp member complete {})",
            p.quest_id, p.quest_title, p.progress, p.quest_id, p.quest_id
        ),
    }
}

/// The member board of `project_id`.
pub fn list(state: &AppState, project_id: &str) -> Result<MemberBoard> {
    let session = state.require_session()?;

    let project_quests: Vec<Quest> = state
        .static_quests()?
        .into_iter()
        .filter(|q| q.project_id == project_id)
        .collect();

    let my_progress: Vec<Progress> = state
        .progress()?
        .into_iter()
        .filter(|p| p.user_id == session.user_id)
        .filter(|p| project_quests.iter().any(|q| q.id == p.quest_id))
        .collect();

    let available = project_quests
        .into_iter()
        .filter(|q| q.status == QuestStatus::Open)
        .collect();

    Ok(MemberBoard {
        project_id: project_id.to_string(),
        project_name: project_name(state, project_id),
        available,
        my_progress,
    })
}

#[derive(Debug, Serialize)]
pub struct ProgressResult {
    pub progress: Progress,
}

impl Output for ProgressResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let p = &self.progress;
        match p.status {
            ProgressStatus::Completed => format!("Completed {} \"{}\"", p.quest_id, p.quest_title),
            ProgressStatus::InProgress => {
                format!("{} \"{}\": {}%", p.quest_id, p.quest_title, p.progress)
            }
        }
    }
}

/// Accept a quest for the current user.
///
/// The stored title comes from the runtime quest list, falling back to
/// "Unknown Quest". Accepting the same quest twice is refused, as is
/// accepting a known quest that is closed.
pub fn accept(state: &mut AppState, quest_id: &str) -> Result<ProgressResult> {
    let session = state.require_session()?;

    let runtime_quests = state.runtime_quests()?;
    let closed = state
        .static_quests()?
        .iter()
        .chain(runtime_quests.iter())
        .any(|q| q.id == quest_id && q.status == QuestStatus::Closed);
    if closed {
        return Err(Error::InvalidInput(format!(
            "Quest {} is closed and cannot be accepted",
            quest_id
        )));
    }

    let title = runtime_quests
        .into_iter()
        .find(|q| q.id == quest_id)
        .map(|q| q.title)
        .unwrap_or_else(|| UNKNOWN_QUEST_TITLE.to_string());

    let mut records = state.progress()?;
    if records.iter().any(|p| p.matches(&session.user_id, quest_id)) {
        return Err(Error::AlreadyAccepted);
    }

    let progress = Progress::new(session.user_id, quest_id.to_string(), title);
    records.push(progress.clone());
    state.set_progress(&records)?;
    tracing::info!(quest_id, user_id = %progress.user_id, "accepted quest");

    Ok(ProgressResult { progress })
}

/// Set the completion percentage of an accepted quest. Status is unchanged,
/// even at 100%.
pub fn update_progress(state: &mut AppState, quest_id: &str, percent: u8) -> Result<ProgressResult> {
    if percent > 100 {
        return Err(Error::InvalidInput(format!(
            "Progress must be between 0 and 100, got {}",
            percent
        )));
    }
    modify(state, quest_id, |p| p.progress = percent)
}

/// Mark an accepted quest completed at 100%, stamping the completion time.
pub fn complete(state: &mut AppState, quest_id: &str) -> Result<ProgressResult> {
    modify(state, quest_id, Progress::complete)
}

fn modify(
    state: &mut AppState,
    quest_id: &str,
    change: impl FnOnce(&mut Progress),
) -> Result<ProgressResult> {
    let session = state.require_session()?;
    let mut records = state.progress()?;

    let record = records
        .iter_mut()
        .find(|p| p.matches(&session.user_id, quest_id))
        .ok_or_else(|| {
            Error::NotFound(format!(
                "No accepted quest {} (run `tp member accept {}` first)",
                quest_id, quest_id
            ))
        })?;

    if record.is_completed() {
        return Err(Error::InvalidInput(format!(
            "Quest {} is already completed",
            quest_id
        )));
    }

    change(record);
    let progress = record.clone();
    state.set_progress(&records)?;
    tracing::info!(quest_id, status = %progress.status, percent = progress.progress, "progress updated");

    Ok(ProgressResult { progress })
}

#[derive(Debug, Serialize)]
pub struct MyProgress {
    pub progress: Vec<Progress>,
    pub count: usize,
}

impl Output for MyProgress {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.progress.is_empty() {
            return "You haven't accepted any quests yet.".to_string();
        }
        self.progress
            .iter()
            .map(format_progress)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// All of the current user's progress records, across projects.
pub fn mine(state: &AppState) -> Result<MyProgress> {
    let session = state.require_session()?;
    let progress: Vec<Progress> = state
        .progress()?
        .into_iter()
        .filter(|p| p.user_id == session.user_id)
        .collect();

    Ok(MyProgress {
        count: progress.len(),
        progress,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::{login, logout};
    use crate::commands::leader;
    use crate::test_utils::TestEnv;

    fn member() -> (TestEnv, AppState) {
        let env = TestEnv::new();
        let mut state = env.state();
        login(&mut state, "mem@example.com", "mem123").unwrap();
        (env, state)
    }

    #[test]
    fn test_board_shows_open_fixture_quests_only() {
        let (_env, state) = member();
        let board = list(&state, "proj-1").unwrap();

        let ids: Vec<&str> = board.available.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["quest-1"]);
        assert!(board.my_progress.is_empty());
    }

    #[test]
    fn test_runtime_quests_not_on_member_board() {
        let env = TestEnv::new();
        let mut state = env.state();
        login(&mut state, "lead@example.com", "lead123").unwrap();
        leader::create(
            &mut state,
            "proj-1",
            "Runtime".into(),
            String::new(),
            10,
            QuestStatus::Open,
        )
        .unwrap();
        logout(&mut state, true).unwrap();
        login(&mut state, "mem@example.com", "mem123").unwrap();

        let board = list(&state, "proj-1").unwrap();
        assert_eq!(board.available.len(), 1);
    }

    #[test]
    fn test_accept_creates_record() {
        let (_env, mut state) = member();
        let result = accept(&mut state, "quest-1").unwrap();

        assert_eq!(result.progress.status, ProgressStatus::InProgress);
        assert_eq!(result.progress.progress, 0);
        // Fixture quests are not in the runtime list
        assert_eq!(result.progress.quest_title, UNKNOWN_QUEST_TITLE);

        let board = list(&state, "proj-1").unwrap();
        assert_eq!(board.my_progress.len(), 1);
    }

    #[test]
    fn test_accept_twice_is_rejected() {
        let (_env, mut state) = member();
        accept(&mut state, "quest-1").unwrap();

        let err = accept(&mut state, "quest-1").unwrap_err();
        assert!(matches!(err, Error::AlreadyAccepted));
        assert_eq!(state.progress().unwrap().len(), 1);
    }

    #[test]
    fn test_accept_uses_runtime_title() {
        let env = TestEnv::new();
        let mut state = env.state();
        login(&mut state, "lead@example.com", "lead123").unwrap();
        let quest = leader::create(
            &mut state,
            "proj-1",
            "Runtime quest".into(),
            String::new(),
            10,
            QuestStatus::Open,
        )
        .unwrap()
        .quest;

        let result = accept(&mut state, &quest.id).unwrap();
        assert_eq!(result.progress.quest_title, "Runtime quest");
    }

    #[test]
    fn test_progress_100_does_not_complete() {
        let (_env, mut state) = member();
        accept(&mut state, "quest-1").unwrap();

        let result = update_progress(&mut state, "quest-1", 100).unwrap();

        assert_eq!(result.progress.progress, 100);
        assert_eq!(result.progress.status, ProgressStatus::InProgress);
        assert!(result.progress.completed_at.is_none());
    }

    #[test]
    fn test_progress_out_of_range() {
        let (_env, mut state) = member();
        accept(&mut state, "quest-1").unwrap();
        assert!(matches!(
            update_progress(&mut state, "quest-1", 101),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_complete_sets_status_and_timestamp() {
        let (_env, mut state) = member();
        accept(&mut state, "quest-1").unwrap();
        update_progress(&mut state, "quest-1", 30).unwrap();

        let result = complete(&mut state, "quest-1").unwrap();

        assert_eq!(result.progress.status, ProgressStatus::Completed);
        assert_eq!(result.progress.progress, 100);
        assert!(result.progress.completed_at.is_some());
    }

    #[test]
    fn test_completed_record_is_frozen() {
        let (_env, mut state) = member();
        accept(&mut state, "quest-1").unwrap();
        let first = complete(&mut state, "quest-1").unwrap().progress;

        assert!(matches!(
            update_progress(&mut state, "quest-1", 30),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(complete(&mut state, "quest-1"), Err(Error::InvalidInput(_))));

        let stored = &state.progress().unwrap()[0];
        assert_eq!(stored.status, ProgressStatus::Completed);
        assert_eq!(stored.progress, 100);
        assert_eq!(stored.completed_at, first.completed_at);
    }

    #[test]
    fn test_closed_quest_cannot_be_accepted() {
        let (_env, mut state) = member();

        assert!(matches!(
            accept(&mut state, "quest-2"),
            Err(Error::InvalidInput(_))
        ));
        assert!(state.progress().unwrap().is_empty());
        assert!(list(&state, "proj-1").unwrap().my_progress.is_empty());
    }

    #[test]
    fn test_closed_runtime_quest_cannot_be_accepted() {
        let env = TestEnv::new();
        let mut state = env.state();
        login(&mut state, "lead@example.com", "lead123").unwrap();
        let quest = leader::create(
            &mut state,
            "proj-1",
            "Shelved".into(),
            String::new(),
            10,
            QuestStatus::Closed,
        )
        .unwrap()
        .quest;

        assert!(matches!(
            accept(&mut state, &quest.id),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_unknown_quest_can_be_accepted() {
        let (_env, mut state) = member();
        let result = accept(&mut state, "quest-404").unwrap();
        assert_eq!(result.progress.quest_title, UNKNOWN_QUEST_TITLE);
    }

    #[test]
    fn test_update_without_acceptance_is_not_found() {
        let (_env, mut state) = member();
        assert!(matches!(
            update_progress(&mut state, "quest-1", 10),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(complete(&mut state, "quest-1"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_records_are_per_user() {
        let env = TestEnv::new();
        let mut state = env.state();
        login(&mut state, "mem@example.com", "mem123").unwrap();
        accept(&mut state, "quest-1").unwrap();
        logout(&mut state, true).unwrap();

        login(&mut state, "other@example.com", "other123").unwrap();
        assert!(mine(&state).unwrap().progress.is_empty());
        accept(&mut state, "quest-1").unwrap();

        assert_eq!(state.progress().unwrap().len(), 2);
        assert_eq!(mine(&state).unwrap().count, 1);
    }
}

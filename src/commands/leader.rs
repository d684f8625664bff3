//! Quest authoring for a single project.
//!
//! The board shows fixture quests followed by runtime quests, filtered to the
//! project, then rearranged by the stored manual order. Status changes and
//! deletions only ever touch the runtime list, so a fixture quest cannot be
//! toggled or removed.

use serde::Serialize;

use super::project::project_name;
use super::{Output, description_or_default, json_of};
use crate::models::{Quest, QuestStatus};
use crate::state::{AppState, generate_id};
use crate::{Error, Result};

#[derive(Debug, Serialize)]
pub struct QuestBoard {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub quests: Vec<Quest>,
    /// Whether a stored manual order was applied
    pub ordered: bool,
}

impl Output for QuestBoard {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref name) = self.project_name {
            lines.push(format!("Project: {}\n", name));
        }
        if self.quests.is_empty() {
            lines.push("No quests yet.".to_string());
            return lines.join("\n");
        }
        for (i, quest) in self.quests.iter().enumerate() {
            lines.push(format!("{}. {}  {}", i + 1, quest.id, quest.title));
            lines.push(format!("    {}", description_or_default(&quest.description)));
            lines.push(format!("    XP: {}  Status: {}", quest.xp_reward, quest.status));
        }
        lines.join("\n")
    }
}

/// Quests of `project_id` in display order.
pub fn list(state: &AppState, project_id: &str) -> Result<QuestBoard> {
    state.require_leader()?;
    let (quests, ordered) = board_quests(state, project_id)?;

    Ok(QuestBoard {
        project_id: project_id.to_string(),
        project_name: project_name(state, project_id),
        quests,
        ordered,
    })
}

fn board_quests(state: &AppState, project_id: &str) -> Result<(Vec<Quest>, bool)> {
    let mut quests = state.static_quests()?;
    quests.extend(state.runtime_quests()?);
    quests.retain(|q| q.project_id == project_id);

    let order = state.quest_order(project_id)?;
    let ordered = !order.is_empty();
    Ok((apply_order(quests, &order), ordered))
}

/// Arrange `quests` by `order`: listed ids first, in that order, then the
/// rest in their original order. Unknown ids in `order` are skipped.
pub fn apply_order(quests: Vec<Quest>, order: &[String]) -> Vec<Quest> {
    let mut remaining: Vec<Option<Quest>> = quests.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(remaining.len());

    for id in order {
        let slot = remaining
            .iter_mut()
            .find(|q| q.as_ref().is_some_and(|q| &q.id == id));
        if let Some(quest) = slot.and_then(Option::take) {
            result.push(quest);
        }
    }
    result.extend(remaining.into_iter().flatten());
    result
}

/// Drag `dragged` onto `target` within `ids`.
///
/// Dragging downward lands after the target, dragging upward lands before
/// it. Returns `None` when nothing moves.
pub fn drop_onto(ids: &[String], dragged: &str, target: &str) -> Option<Vec<String>> {
    let from = ids.iter().position(|id| id == dragged)?;
    let to = ids.iter().position(|id| id == target)?;
    if from == to {
        return None;
    }

    let mut result = ids.to_vec();
    let moved = result.remove(from);
    let target_index = result.iter().position(|id| id == target)?;
    if from < to {
        result.insert(target_index + 1, moved);
    } else {
        result.insert(target_index, moved);
    }
    Some(result)
}

#[derive(Debug, Serialize)]
pub struct QuestCreated {
    pub created: bool,
    pub quest: Quest,
}

impl Output for QuestCreated {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Created quest {} \"{}\" ({} XP, {})",
            self.quest.id, self.quest.title, self.quest.xp_reward, self.quest.status
        )
    }
}

/// Add a runtime quest to `project_id`.
pub fn create(
    state: &mut AppState,
    project_id: &str,
    title: String,
    description: String,
    xp_reward: u32,
    status: QuestStatus,
) -> Result<QuestCreated> {
    let session = state.require_leader()?;
    if title.trim().is_empty() {
        return Err(Error::InvalidInput("Quest title must not be empty".to_string()));
    }

    let mut quests = state.runtime_quests()?;
    let id = generate_id("quest", quests.iter().map(|q| q.id.as_str()));

    let mut quest = Quest::new(id, project_id.to_string(), title, xp_reward, session.user_id);
    quest.description = description;
    quest.status = status;

    quests.push(quest.clone());
    state.set_runtime_quests(&quests)?;
    tracing::info!(quest_id = %quest.id, project_id, xp_reward, "created quest");

    Ok(QuestCreated {
        created: true,
        quest,
    })
}

#[derive(Debug, Serialize)]
pub struct QuestStatusChanged {
    pub id: String,
    /// False when the quest is not in the runtime list
    pub updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuestStatus>,
}

impl Output for QuestStatusChanged {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        match (self.updated, self.status) {
            (true, Some(status)) => format!("Quest {} is now {}", self.id, status),
            _ => format!(
                "Quest {} unchanged (fixture quests cannot be modified)",
                self.id
            ),
        }
    }
}

/// Flip a runtime quest between open and closed.
pub fn toggle(state: &mut AppState, id: &str) -> Result<QuestStatusChanged> {
    update_status(state, id, QuestStatus::toggled)
}

/// Set a runtime quest's status.
pub fn set_status(state: &mut AppState, id: &str, status: QuestStatus) -> Result<QuestStatusChanged> {
    update_status(state, id, |_| status)
}

fn update_status(
    state: &mut AppState,
    id: &str,
    next: impl FnOnce(QuestStatus) -> QuestStatus,
) -> Result<QuestStatusChanged> {
    state.require_leader()?;
    let mut quests = state.runtime_quests()?;

    let Some(quest) = quests.iter_mut().find(|q| q.id == id) else {
        tracing::debug!(quest_id = id, "status change on non-runtime quest ignored");
        return Ok(QuestStatusChanged {
            id: id.to_string(),
            updated: false,
            status: None,
        });
    };

    quest.status = next(quest.status);
    let status = quest.status;
    state.set_runtime_quests(&quests)?;
    tracing::info!(quest_id = id, %status, "quest status changed");

    Ok(QuestStatusChanged {
        id: id.to_string(),
        updated: true,
        status: Some(status),
    })
}

#[derive(Debug, Serialize)]
pub struct QuestDeleted {
    pub id: String,
    pub deleted: bool,
}

impl Output for QuestDeleted {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.deleted {
            format!("Deleted quest {}", self.id)
        } else {
            format!("No runtime quest {} (fixture quests cannot be deleted)", self.id)
        }
    }
}

/// Remove a quest from the runtime list. Progress records referencing it stay.
pub fn delete(state: &mut AppState, id: &str) -> Result<QuestDeleted> {
    state.require_leader()?;
    let mut quests = state.runtime_quests()?;

    let before = quests.len();
    quests.retain(|q| q.id != id);
    let deleted = quests.len() != before;

    state.set_runtime_quests(&quests)?;
    tracing::info!(quest_id = id, deleted, "delete quest");

    Ok(QuestDeleted {
        id: id.to_string(),
        deleted,
    })
}

#[derive(Debug, Serialize)]
pub struct QuestMoved {
    pub project_id: String,
    pub moved: bool,
    /// Stored order after the move
    pub order: Vec<String>,
}

impl Output for QuestMoved {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let verb = if self.moved { "New order" } else { "Order unchanged" };
        format!("{}: {}", verb, self.order.join(", "))
    }
}

/// Drag quest `id` onto `target` (the last card when `None`) and store the
/// resulting order under `questOrder-<project>`.
pub fn move_quest(
    state: &mut AppState,
    project_id: &str,
    id: &str,
    target: Option<&str>,
) -> Result<QuestMoved> {
    state.require_leader()?;
    let (quests, _) = board_quests(state, project_id)?;
    let ids: Vec<String> = quests.into_iter().map(|q| q.id).collect();

    if !ids.iter().any(|q| q == id) {
        return Err(Error::NotFound(format!(
            "Quest {} is not on the board of project {}",
            id, project_id
        )));
    }
    let target = match target {
        Some(t) if !ids.iter().any(|q| q == t) => {
            return Err(Error::NotFound(format!(
                "Quest {} is not on the board of project {}",
                t, project_id
            )));
        }
        Some(t) => t.to_string(),
        None => ids.last().cloned().unwrap_or_default(),
    };

    match drop_onto(&ids, id, &target) {
        Some(order) => {
            state.set_quest_order(project_id, &order)?;
            tracing::info!(project_id, quest_id = id, target = %target, "reordered quests");
            Ok(QuestMoved {
                project_id: project_id.to_string(),
                moved: true,
                order,
            })
        }
        None => Ok(QuestMoved {
            project_id: project_id.to_string(),
            moved: false,
            order: ids,
        }),
    }
}

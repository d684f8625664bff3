//! Project list, creation, deletion and navigation.
//!
//! The list shows fixture projects only. Projects created here go to the
//! runtime list, and only runtime projects can be deleted.

use serde::Serialize;

use super::{Output, description_or_default, json_of};
use crate::models::{Project, Role};
use crate::state::{AppState, generate_id};
use crate::Result;

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub role: Role,
    pub projects: Vec<Project>,
    pub count: usize,
}

impl Output for ProjectList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No projects available.".to_string();
        }

        let action = match self.role {
            Role::Leader => "tp quest list",
            Role::Member => "tp member quests",
        };

        let mut lines = vec![format!("{} project(s):\n", self.count)];
        for project in &self.projects {
            lines.push(format!("{}  {}", project.id, project.name));
            lines.push(format!("    {}", description_or_default(&project.description)));
            lines.push(format!(
                "    Members: {}  ->  {} --project {}",
                project.members.len(),
                action,
                project.id
            ));
        }
        lines.join("\n")
    }
}

/// Fixture projects visible to the current user.
///
/// Leaders see every project; members see those listing them as a member.
pub fn list(state: &AppState) -> Result<ProjectList> {
    let session = state.require_session()?;
    let mut projects = state.static_projects()?;

    if session.role == Role::Member {
        projects.retain(|p| p.has_member(&session.user_id));
    }

    Ok(ProjectList {
        role: session.role,
        count: projects.len(),
        projects,
    })
}

#[derive(Debug, Serialize)]
pub struct ProjectCreated {
    pub created: bool,
    pub project: Project,
}

impl Output for ProjectCreated {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Created project {} \"{}\"", self.project.id, self.project.name)
    }
}

/// Create a project led by the current leader, who becomes its sole member.
pub fn create(state: &mut AppState, name: String, description: String) -> Result<ProjectCreated> {
    let session = state.require_leader()?;
    let mut projects = state.runtime_projects()?;

    let id = generate_id("proj", projects.iter().map(|p| p.id.as_str()));
    let project = Project::new(id, name, description, session.user_id);

    projects.push(project.clone());
    state.set_runtime_projects(&projects)?;
    tracing::info!(project_id = %project.id, "created project");

    Ok(ProjectCreated {
        created: true,
        project,
    })
}

#[derive(Debug, Serialize)]
pub struct ProjectDeleted {
    pub id: String,
    /// False when no runtime project had this id
    pub deleted: bool,
}

impl Output for ProjectDeleted {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.deleted {
            format!("Deleted project {}", self.id)
        } else {
            format!("No runtime project {} (fixture projects cannot be deleted)", self.id)
        }
    }
}

/// Remove a project from the runtime list. Its quests and progress stay.
pub fn delete(state: &mut AppState, id: &str) -> Result<ProjectDeleted> {
    state.require_leader()?;
    let mut projects = state.runtime_projects()?;

    let before = projects.len();
    projects.retain(|p| p.id != id);
    let deleted = projects.len() != before;

    state.set_runtime_projects(&projects)?;
    tracing::info!(project_id = id, deleted, "delete project");

    Ok(ProjectDeleted {
        id: id.to_string(),
        deleted,
    })
}

#[derive(Debug, Serialize)]
pub struct ProjectOpened {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// "leader" or "member"
    pub dashboard: Role,
    pub command: String,
}

impl Output for ProjectOpened {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let name = self.project_name.as_deref().unwrap_or(&self.project_id);
        format!("Project: {}\nRun: {}", name, self.command)
    }
}

/// Resolve which dashboard the current user lands on for a project.
pub fn open(state: &AppState, id: &str) -> Result<ProjectOpened> {
    let session = state.require_session()?;
    let project_name = project_name(state, id);

    let command = match session.role {
        Role::Leader => format!("tp quest list --project {}", id),
        Role::Member => format!("tp member quests --project {}", id),
    };

    Ok(ProjectOpened {
        project_id: id.to_string(),
        project_name,
        dashboard: session.role,
        command,
    })
}

/// Name of a fixture project, for dashboard headers. Lookup failures are
/// logged and treated as "unknown".
pub(crate) fn project_name(state: &AppState, id: &str) -> Option<String> {
    match state.static_projects() {
        Ok(projects) => projects.into_iter().find(|p| p.id == id).map(|p| p.name),
        Err(e) => {
            tracing::warn!(error = %e, "error loading project");
            None
        }
    }
}

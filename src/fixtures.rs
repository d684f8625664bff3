//! Static fixture files.
//!
//! Users, projects and quests ship as three read-only JSON files, each a
//! single object wrapping a named list:
//!
//! ```json
//! { "users": [ { "id": "user-1", "email": "...", ... } ] }
//! ```
//!
//! Every read goes back to disk; nothing is cached between calls.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Project, Quest, User};
use crate::{Error, Result};

pub const USERS_FILE: &str = "users.json";
pub const PROJECTS_FILE: &str = "projects.json";
pub const QUESTS_FILE: &str = "quests.json";

/// Default fixtures directory, relative to the workspace.
pub const DEFAULT_FIXTURES_DIR: &str = "data";

#[derive(Deserialize)]
struct UsersFile {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct ProjectsFile {
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct QuestsFile {
    quests: Vec<Quest>,
}

/// Reader for the fixture directory.
#[derive(Debug, Clone)]
pub struct Fixtures {
    dir: PathBuf,
}

impl Fixtures {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All fixture users.
    pub fn users(&self) -> Result<Vec<User>> {
        Ok(self.load::<UsersFile>(USERS_FILE)?.users)
    }

    /// All fixture projects.
    pub fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.load::<ProjectsFile>(PROJECTS_FILE)?.projects)
    }

    /// All fixture quests.
    pub fn quests(&self) -> Result<Vec<Quest>> {
        Ok(self.load::<QuestsFile>(QUESTS_FILE)?.quests)
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        tracing::debug!(path = %path.display(), "loading fixture");

        let content = fs::read_to_string(&path).map_err(|e| Error::Fixture {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| Error::Fixture {
            file: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (and their environment variables, e.g. `TP_FIXTURES`)
//! 2. Session config.kdl (`~/.local/share/taskpet/<workspace-hash>/config.kdl`)
//! 3. System config.kdl (`~/.config/taskpet/config.kdl`)
//! 4. Built-in defaults

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::config::{OutputFormat, TaskpetConfig};
use crate::fixtures::DEFAULT_FIXTURES_DIR;
use crate::storage::Storage;

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from session-level config
    Session,
    /// Value from system-level config
    System,
    /// Value from CLI flag or its environment variable
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Session => write!(f, "session"),
            ValueSource::System => write!(f, "system"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub output_format: Resolved<OutputFormat>,
    pub fixtures_dir: Resolved<PathBuf>,
    pub action_log: Resolved<bool>,
}

impl ResolvedConfig {
    /// Defaults for a workspace: JSON output, `<workspace>/data`, logging on.
    pub fn defaults(workspace: &Path) -> Self {
        Self {
            output_format: Resolved::new(OutputFormat::Json, ValueSource::Default),
            fixtures_dir: Resolved::new(
                workspace.join(DEFAULT_FIXTURES_DIR),
                ValueSource::Default,
            ),
            action_log: Resolved::new(true, ValueSource::Default),
        }
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format.value
    }

    pub fn fixtures_dir(&self) -> &Path {
        &self.fixtures_dir.value
    }

    pub fn action_log_enabled(&self) -> bool {
        self.action_log.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_format: Option<OutputFormat>,
    pub fixtures_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = Some(dir.into());
        self
    }
}

/// Resolve configuration for a workspace, reading both config files.
pub fn resolve_config(
    storage: &Storage,
    workspace: &Path,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig> {
    let system_config = Storage::read_system_config()?;
    let session_config = storage.read_config()?;
    Ok(resolve_layers(
        workspace,
        &system_config,
        &session_config,
        overrides,
    ))
}

/// Resolve already-loaded config layers. Relative fixture paths resolve
/// against the workspace.
pub fn resolve_layers(
    workspace: &Path,
    system: &TaskpetConfig,
    session: &TaskpetConfig,
    overrides: &ConfigOverrides,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::defaults(workspace);

    if let Some(ref format) = overrides.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::CliFlag);
    } else if let Some(ref format) = session.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::Session);
    } else if let Some(ref format) = system.output_format {
        result.output_format = Resolved::new(format.clone(), ValueSource::System);
    }

    if let Some(ref dir) = overrides.fixtures_dir {
        result.fixtures_dir = Resolved::new(workspace.join(dir), ValueSource::CliFlag);
    } else if let Some(ref dir) = session.fixtures_dir {
        result.fixtures_dir = Resolved::new(workspace.join(dir), ValueSource::Session);
    } else if let Some(ref dir) = system.fixtures_dir {
        result.fixtures_dir = Resolved::new(workspace.join(dir), ValueSource::System);
    }

    if let Some(enabled) = session.action_log {
        result.action_log = Resolved::new(enabled, ValueSource::Session);
    } else if let Some(enabled) = system.action_log {
        result.action_log = Resolved::new(enabled, ValueSource::System);
    }

    result
}

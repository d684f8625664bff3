//! Showing and editing config.kdl.

use serde::Serialize;
use std::path::PathBuf;

use super::{Output, json_of};
use crate::config::ResolvedConfig;
use crate::storage::Storage;
use crate::{Error, Result};

#[derive(Debug, Serialize)]
pub struct ConfigShow {
    #[serde(flatten)]
    pub resolved: ResolvedConfig,
    pub session_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_path: Option<PathBuf>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let r = &self.resolved;
        let mut lines = vec![
            format!(
                "output-format = {} ({})",
                r.output_format.value, r.output_format.source
            ),
            format!(
                "fixtures-dir  = {} ({})",
                r.fixtures_dir.value.display(),
                r.fixtures_dir.source
            ),
            format!("action-log    = {} ({})", r.action_log.value, r.action_log.source),
            String::new(),
            format!("Session config: {}", self.session_path.display()),
        ];
        if let Some(ref path) = self.system_path {
            lines.push(format!("System config:  {}", path.display()));
        }
        lines.join("\n")
    }
}

pub fn show(storage: &Storage, resolved: ResolvedConfig) -> Result<ConfigShow> {
    Ok(ConfigShow {
        resolved,
        session_path: storage.config_kdl_path(),
        system_path: Storage::system_config_kdl_path(),
    })
}

#[derive(Debug, Serialize)]
pub struct ConfigSet {
    pub key: String,
    pub value: String,
    pub path: PathBuf,
}

impl Output for ConfigSet {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Set {} = {} in {}", self.key, self.value, self.path.display())
    }
}

/// Set a key in the session config.kdl.
pub fn set(storage: &Storage, key: &str, value: &str) -> Result<ConfigSet> {
    let mut config = storage.read_config()?;
    config.set(key, value).map_err(Error::Config)?;
    storage.write_config(&config)?;
    tracing::info!(key, value, "config updated");

    Ok(ConfigSet {
        key: key.to_string(),
        value: value.to_string(),
        path: storage.config_kdl_path(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_set_persists_to_session_config() {
        let env = TestEnv::new();
        let storage = env.open_storage();

        set(&storage, "output-format", "human").unwrap();
        set(&storage, "action-log", "false").unwrap();

        let config = storage.read_config().unwrap();
        assert_eq!(config.output_format, Some(OutputFormat::Human));
        assert_eq!(config.action_log, Some(false));
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let env = TestEnv::new();
        let storage = env.open_storage();

        let err = set(&storage, "colour", "blue").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!storage.config_kdl_path().exists());
    }

    #[test]
    fn test_show_flattens_resolved_values() {
        let env = TestEnv::new();
        let storage = env.open_storage();
        let shown = show(&storage, ResolvedConfig::defaults(env.path())).unwrap();

        let json: serde_json::Value = serde_json::from_str(&shown.to_json()).unwrap();
        assert_eq!(json["output_format"]["value"], "json");
        assert_eq!(json["action_log"]["value"], true);
        assert!(json["session_path"].as_str().unwrap().ends_with("config.kdl"));
    }
}

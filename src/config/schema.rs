//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation and key-based updates for `tp config set`

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keys accepted by config.kdl and `tp config set`.
pub const CONFIG_KEYS: [&str; 3] = ["output-format", "fixtures-dir", "action-log"];

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// output-format "human"     // or "json"
/// fixtures-dir "data"       // relative paths resolve against the workspace
/// action-log #false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskpetConfig {
    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Directory holding users.json, projects.json and quests.json
    pub fixtures_dir: Option<String>,

    /// Whether commands are recorded in the action log
    pub action_log: Option<bool>,
}

impl TaskpetConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref dir) = self.fixtures_dir {
            if dir.trim().is_empty() {
                return Err("fixtures-dir must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown or mistyped nodes are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(s) = first_string(doc, "output-format") {
            config.output_format = OutputFormat::parse(s);
        }

        if let Some(s) = first_string(doc, "fixtures-dir") {
            config.fixtures_dir = Some(s.to_string());
        }

        if let Some(node) = doc.get("action-log") {
            if let Some(entry) = node.entries().first() {
                config.action_log = entry.value().as_bool();
            }
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref format) = self.output_format {
            let mut node = KdlNode::new("output-format");
            node.push(KdlEntry::new(KdlValue::String(format.as_str().to_string())));
            doc.nodes_mut().push(node);
        }

        if let Some(ref dir) = self.fixtures_dir {
            let mut node = KdlNode::new("fixtures-dir");
            node.push(KdlEntry::new(KdlValue::String(dir.clone())));
            doc.nodes_mut().push(node);
        }

        if let Some(enabled) = self.action_log {
            let mut node = KdlNode::new("action-log");
            node.push(KdlEntry::new(KdlValue::Bool(enabled)));
            doc.nodes_mut().push(node);
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &TaskpetConfig) {
        if other.output_format.is_some() {
            self.output_format = other.output_format.clone();
        }
        if other.fixtures_dir.is_some() {
            self.fixtures_dir = other.fixtures_dir.clone();
        }
        if other.action_log.is_some() {
            self.action_log = other.action_log;
        }
    }

    /// Set one key from its string form, as given to `tp config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "output-format" => {
                let format = OutputFormat::parse(value).ok_or_else(|| {
                    format!("output-format must be json or human, got {}", value)
                })?;
                self.output_format = Some(format);
            }
            "fixtures-dir" => {
                self.fixtures_dir = Some(value.to_string());
            }
            "action-log" => {
                let enabled = parse_bool(value)
                    .ok_or_else(|| format!("action-log must be true or false, got {}", value))?;
                self.action_log = Some(enabled);
            }
            _ => {
                return Err(format!(
                    "Unknown config key: {} (expected one of: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                ));
            }
        }
        self.validate()
    }
}

fn first_string<'a>(doc: &'a KdlDocument, name: &str) -> Option<&'a str> {
    doc.get(name)?.entries().first()?.value().as_string()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }

    #[test]
    fn test_kdl_roundtrip() {
        let config = TaskpetConfig {
            output_format: Some(OutputFormat::Human),
            fixtures_dir: Some("/srv/fixtures".to_string()),
            action_log: Some(false),
        };

        let text = config.to_kdl().to_string();
        let doc: KdlDocument = text.parse().unwrap();

        assert_eq!(TaskpetConfig::from_kdl(&doc), config);
    }

    #[test]
    fn test_from_kdl_ignores_invalid_values() {
        let doc: KdlDocument = "output-format \"yaml\"\nunknown 1\n".parse().unwrap();
        let config = TaskpetConfig::from_kdl(&doc);
        assert_eq!(config, TaskpetConfig::new());
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = TaskpetConfig {
            output_format: Some(OutputFormat::Json),
            fixtures_dir: Some("a".to_string()),
            action_log: None,
        };
        let other = TaskpetConfig {
            output_format: None,
            fixtures_dir: Some("b".to_string()),
            action_log: Some(true),
        };
        base.merge(&other);
        assert_eq!(base.output_format, Some(OutputFormat::Json));
        assert_eq!(base.fixtures_dir.as_deref(), Some("b"));
        assert_eq!(base.action_log, Some(true));
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = TaskpetConfig::new();
        config.set("output-format", "human").unwrap();
        config.set("action-log", "off").unwrap();
        config.set("fixtures-dir", "fx").unwrap();
        assert_eq!(config.output_format, Some(OutputFormat::Human));
        assert_eq!(config.action_log, Some(false));
        assert_eq!(config.fixtures_dir.as_deref(), Some("fx"));

        assert!(config.set("output-format", "xml").is_err());
        assert!(config.set("action-log", "maybe").is_err());
        assert!(config.set("fixtures-dir", "  ").is_err());
        assert!(config.set("editor", "vim").is_err());
    }
}

//! Configuration for Taskpet.
//!
//! ## config.kdl - User preferences
//!
//! Located at:
//! - System: `~/.config/taskpet/config.kdl` (or `$TP_CONFIG_DIR/config.kdl`)
//! - Session: `~/.local/share/taskpet/<workspace-hash>/config.kdl`
//!
//! Contains:
//! - `output-format` - "json" or "human"
//! - `fixtures-dir` - Directory with the static fixture files
//! - `action-log` - Whether commands are recorded in the action log
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config, resolve_layers,
};
pub use schema::{CONFIG_KEYS, OutputFormat, TaskpetConfig};

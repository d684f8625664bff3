//! CLI argument definitions for Taskpet.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskpet - complete quests, grow your pet.
///
/// Start with `tp login <email> <password>`, then `tp project list`.
#[derive(Parser, Debug)]
#[command(name = "tp")]
#[command(author, version, about = "A gamified quest tracker with a pet that levels up", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Run as if tp was started in <path>. Each workspace has its own store.
    /// Can also be set via TP_WORKSPACE environment variable.
    #[arg(short = 'C', long = "workspace", global = true, env = "TP_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Directory holding users.json, projects.json and quests.json
    /// (default: <workspace>/data)
    #[arg(long = "fixtures", global = true, env = "TP_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with a fixture account
    Login {
        email: String,
        password: String,
    },

    /// Log out. Clears the whole store unless --keep-data is given
    Logout {
        /// Only remove the session, keep runtime projects, quests and progress
        #[arg(long)]
        keep_data: bool,
    },

    /// Show the logged-in user
    Whoami,

    /// Project commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Quest authoring commands (leaders)
    Quest {
        #[command(subcommand)]
        command: QuestCommands,
    },

    /// Quest progress commands (members)
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// Show your pet: level, XP and recent completions
    Pet,

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects visible to you
    List,

    /// Create a project (leaders only)
    Create {
        name: String,

        /// Project description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a project you created (leaders only)
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show which quest view a project opens in
    Open { id: String },
}

/// Quest subcommands
#[derive(Subcommand, Debug)]
pub enum QuestCommands {
    /// List a project's quests in board order
    List {
        /// Project ID
        #[arg(short, long, env = "TP_PROJECT")]
        project: String,
    },

    /// Create a quest
    Create {
        title: String,

        /// Project ID
        #[arg(short, long, env = "TP_PROJECT")]
        project: String,

        /// Quest description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Experience reward
        #[arg(short = 'x', long)]
        xp: u32,

        /// Initial status (open, closed)
        #[arg(short, long, default_value = "open")]
        status: String,
    },

    /// Flip a quest between open and closed
    Toggle { id: String },

    /// Set a quest's status
    Status {
        id: String,

        /// New status (open, closed)
        status: String,
    },

    /// Delete a quest
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Move a quest on the board, as if dragged onto another quest
    Move {
        id: String,

        /// Project ID
        #[arg(short, long, env = "TP_PROJECT")]
        project: String,

        /// Quest to drop onto (default: the last quest on the board)
        #[arg(long)]
        onto: Option<String>,
    },
}

/// Member subcommands
#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// List open quests and your progress in a project
    Quests {
        /// Project ID
        #[arg(short, long, env = "TP_PROJECT")]
        project: String,
    },

    /// Accept a quest
    Accept { quest_id: String },

    /// Report progress on an accepted quest
    Progress {
        quest_id: String,

        /// Percent complete (0-100)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        percent: u8,
    },

    /// Mark an accepted quest complete
    Complete { quest_id: String },

    /// List all your accepted quests
    Mine,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved configuration and where each value came from
    Show,

    /// Set a value in this workspace's config.kdl
    Set {
        /// One of: output-format, fixtures-dir, action-log
        key: String,
        value: String,
    },
}

//! Taskpet CLI - a gamified quest tracker.

use clap::Parser;
use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use taskpet::action_log::{self, ActionLog};
use taskpet::cli::{
    Cli, Commands, ConfigCommands, MemberCommands, ProjectCommands, QuestCommands,
};
use taskpet::commands::{self, Cancelled, Output};
use taskpet::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use taskpet::fixtures::Fixtures;
use taskpet::models::parse_quest_status;
use taskpet::state::AppState;
use taskpet::storage::{self, Storage};

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let workspace = resolve_workspace(cli.workspace, cli.human_readable);

    let storage = match Storage::open(&workspace) {
        Ok(storage) => storage,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };

    let mut overrides = ConfigOverrides::new();
    if cli.human_readable {
        overrides = overrides.with_output_format(OutputFormat::Human);
    }
    if let Some(dir) = cli.fixtures {
        overrides = overrides.with_fixtures_dir(dir);
    }
    let config = match resolve_config(&storage, &workspace, &overrides) {
        Ok(config) => config,
        Err(e) => exit_with_error(&e, cli.human_readable),
    };
    let human = *config.output_format() == OutputFormat::Human;

    let (cmd_name, args_json) = serialize_command(&cli.command);
    let start = Instant::now();

    let mut state = AppState::new(storage, Fixtures::new(config.fixtures_dir()));
    let result = run_command(cli.command, &mut state, &config, human);

    let duration = start.elapsed().as_millis() as u64;
    if config.action_log_enabled() {
        if let Ok(data_root) = storage::get_data_root() {
            let error = result.as_ref().err().map(|e| e.to_string());
            let entry = ActionLog::new(
                &workspace,
                &cmd_name,
                &args_json,
                result.is_ok(),
                error,
                duration,
            );
            action_log::log_action(&data_root, &entry);
        }
    }

    if let Err(e) = result {
        exit_with_error(&e, human);
    }
}

/// Tracing goes to stderr so stdout stays parseable. `TP_LOG` sets the filter.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Resolve the workspace: --workspace flag / TP_WORKSPACE, else the current
/// directory. An explicit path must exist.
fn resolve_workspace(explicit_path: Option<PathBuf>, human: bool) -> PathBuf {
    match explicit_path {
        Some(path) => {
            if !path.exists() {
                let err = taskpet::Error::NotFound(format!(
                    "Specified workspace does not exist: {}",
                    path.display()
                ));
                exit_with_error(&err, human);
            }
            path
        }
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

fn exit_with_error(e: &taskpet::Error, human: bool) -> ! {
    if human {
        eprintln!("Error: {}", e);
    } else {
        eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
    }
    process::exit(1);
}

fn run_command(
    command: Commands,
    state: &mut AppState,
    config: &ResolvedConfig,
    human: bool,
) -> Result<(), taskpet::Error> {
    match command {
        Commands::Login { email, password } => {
            let result = commands::auth::login(state, &email, &password)?;
            output(&result, human);
        }

        Commands::Logout { keep_data } => {
            let result = commands::auth::logout(state, keep_data)?;
            output(&result, human);
        }

        Commands::Whoami => {
            let result = commands::auth::whoami(state)?;
            output(&result, human);
        }

        Commands::Project { command } => match command {
            ProjectCommands::List => {
                let result = commands::project::list(state)?;
                output(&result, human);
            }
            ProjectCommands::Create { name, description } => {
                let result = commands::project::create(state, name, description)?;
                output(&result, human);
            }
            ProjectCommands::Delete { id, yes } => {
                if !yes && !confirm("Delete this project?") {
                    output(&Cancelled::new(format!("delete project {}", id)), human);
                    return Ok(());
                }
                let result = commands::project::delete(state, &id)?;
                output(&result, human);
            }
            ProjectCommands::Open { id } => {
                let result = commands::project::open(state, &id)?;
                output(&result, human);
            }
        },

        Commands::Quest { command } => match command {
            QuestCommands::List { project } => {
                let result = commands::leader::list(state, &project)?;
                output(&result, human);
            }
            QuestCommands::Create {
                title,
                project,
                description,
                xp,
                status,
            } => {
                let status = parse_quest_status(&status)?;
                let result =
                    commands::leader::create(state, &project, title, description, xp, status)?;
                output(&result, human);
            }
            QuestCommands::Toggle { id } => {
                let result = commands::leader::toggle(state, &id)?;
                output(&result, human);
            }
            QuestCommands::Status { id, status } => {
                let status = parse_quest_status(&status)?;
                let result = commands::leader::set_status(state, &id, status)?;
                output(&result, human);
            }
            QuestCommands::Delete { id, yes } => {
                if !yes && !confirm("Delete this quest?") {
                    output(&Cancelled::new(format!("delete quest {}", id)), human);
                    return Ok(());
                }
                let result = commands::leader::delete(state, &id)?;
                output(&result, human);
            }
            QuestCommands::Move { id, project, onto } => {
                let result = commands::leader::move_quest(state, &project, &id, onto.as_deref())?;
                output(&result, human);
            }
        },

        Commands::Member { command } => match command {
            MemberCommands::Quests { project } => {
                let result = commands::member::list(state, &project)?;
                output(&result, human);
            }
            MemberCommands::Accept { quest_id } => {
                let result = commands::member::accept(state, &quest_id)?;
                output(&result, human);
            }
            MemberCommands::Progress { quest_id, percent } => {
                let result = commands::member::update_progress(state, &quest_id, percent)?;
                output(&result, human);
            }
            MemberCommands::Complete { quest_id } => {
                let result = commands::member::complete(state, &quest_id)?;
                output(&result, human);
            }
            MemberCommands::Mine => {
                let result = commands::member::mine(state)?;
                output(&result, human);
            }
        },

        Commands::Pet => {
            let result = commands::pet::stats(state)?;
            output(&result, human);
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config::show(state.storage(), config.clone())?;
                output(&result, human);
            }
            ConfigCommands::Set { key, value } => {
                let result = commands::config::set(state.storage(), &key, &value)?;
                output(&result, human);
            }
        },
    }

    Ok(())
}

/// Ask a yes/no question on stderr. Anything but y/yes (including EOF) is no.
fn confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    let _ = io::stderr().flush();

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Serialize a command for the action log.
fn serialize_command(command: &Commands) -> (String, serde_json::Value) {
    use serde_json::json;

    match command {
        Commands::Login { email, password } => (
            "login".to_string(),
            json!({ "email": email, "password": password }),
        ),
        Commands::Logout { keep_data } => {
            ("logout".to_string(), json!({ "keep_data": keep_data }))
        }
        Commands::Whoami => ("whoami".to_string(), json!({})),

        Commands::Project { command } => match command {
            ProjectCommands::List => ("project list".to_string(), json!({})),
            ProjectCommands::Create { name, description } => (
                "project create".to_string(),
                json!({ "name": name, "description": description }),
            ),
            ProjectCommands::Delete { id, yes } => (
                "project delete".to_string(),
                json!({ "id": id, "yes": yes }),
            ),
            ProjectCommands::Open { id } => ("project open".to_string(), json!({ "id": id })),
        },

        Commands::Quest { command } => match command {
            QuestCommands::List { project } => {
                ("quest list".to_string(), json!({ "project": project }))
            }
            QuestCommands::Create {
                title,
                project,
                description,
                xp,
                status,
            } => (
                "quest create".to_string(),
                json!({
                    "title": title,
                    "project": project,
                    "description": description,
                    "xp": xp,
                    "status": status,
                }),
            ),
            QuestCommands::Toggle { id } => ("quest toggle".to_string(), json!({ "id": id })),
            QuestCommands::Status { id, status } => (
                "quest status".to_string(),
                json!({ "id": id, "status": status }),
            ),
            QuestCommands::Delete { id, yes } => {
                ("quest delete".to_string(), json!({ "id": id, "yes": yes }))
            }
            QuestCommands::Move { id, project, onto } => (
                "quest move".to_string(),
                json!({ "id": id, "project": project, "onto": onto }),
            ),
        },

        Commands::Member { command } => match command {
            MemberCommands::Quests { project } => {
                ("member quests".to_string(), json!({ "project": project }))
            }
            MemberCommands::Accept { quest_id } => {
                ("member accept".to_string(), json!({ "quest_id": quest_id }))
            }
            MemberCommands::Progress { quest_id, percent } => (
                "member progress".to_string(),
                json!({ "quest_id": quest_id, "percent": percent }),
            ),
            MemberCommands::Complete { quest_id } => {
                ("member complete".to_string(), json!({ "quest_id": quest_id }))
            }
            MemberCommands::Mine => ("member mine".to_string(), json!({})),
        },

        Commands::Pet => ("pet".to_string(), json!({})),

        Commands::Config { command } => match command {
            ConfigCommands::Show => ("config show".to_string(), json!({})),
            ConfigCommands::Set { key, value } => (
                "config set".to_string(),
                json!({ "key": key, "value": value }),
            ),
        },
    }
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

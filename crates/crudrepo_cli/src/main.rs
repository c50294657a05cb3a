//! Role administration CLI.
//!
//! # Responsibility
//! - Drive the role repository against a SQLite file from the shell.
//! - Print one JSON document per invocation: the result value or the
//!   `OperationError`.
//!
//! # Exit codes
//! - `0` success, `1` operation error, `2` usage or bootstrap error.

use clap::{Parser, Subcommand};
use crudrepo_core::db::open_shared_db;
use crudrepo_core::{
    core_version, init_logging, init_stderr_logging, role_repository, CrudRepository, CrudService,
    FindOptions, OperationResult, ResourceActions, Role, RoleRepository, Settings, SortDirection,
};
use log::info;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_OPERATION_ERROR: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Parser)]
#[command(name = "crudrepo", version, about = "Manage roles through the CRUD repository")]
struct Cli {
    /// SQLite database file; overrides CRUDREPO_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the core version
    Version,
    #[command(flatten)]
    Role(RoleCommand),
}

/// Commands that need the role store.
#[derive(Subcommand)]
enum RoleCommand {
    /// Create a role
    Create {
        name: String,
        /// Role id; a v4 UUID is generated when omitted
        #[arg(long)]
        id: Option<String>,
        /// Resource actions as JSON, e.g. '[{"resourceId":"r","actions":[]}]'
        #[arg(long, default_value = "[]")]
        actions: String,
    },
    /// Show one role
    Get { id: String },
    /// List roles
    List {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        take: Option<u32>,
        /// Field to sort by (id, name, resource_actions, created_at)
        #[arg(long)]
        order_by: Option<String>,
        #[arg(long)]
        desc: bool,
    },
    /// Change the name of an existing role
    Rename { id: String, name: String },
    /// Delete a role
    Delete { id: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(EXIT_USAGE)
        }
    }
}

fn run(cli: Cli) -> Result<u8, String> {
    let mut settings = Settings::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }

    match settings.log_dir.as_ref() {
        Some(dir) => init_logging(settings.log_level, &dir.to_string_lossy())?,
        None => init_stderr_logging(settings.log_level)?,
    }

    let outcome = match cli.command {
        Command::Version => Ok(Value::String(core_version().to_string())),
        Command::Role(command) => execute(command, &open_service(&settings)?)?,
    };
    let (document, code) = render(outcome)?;
    println!("{document}");
    Ok(code)
}

fn open_service(settings: &Settings) -> Result<CrudService<RoleRepository>, String> {
    info!(
        "event=cli_open module=cli status=start db_path={}",
        settings.db_path.display()
    );
    let conn = open_shared_db(&settings.db_path)
        .map_err(|err| format!("database open failed: {err}"))?;
    let repo = role_repository(conn).map_err(|err| format!("role repository init failed: {err}"))?;
    Ok(CrudService::new(repo))
}

/// Runs one role command. The outer error is a usage failure, the inner one
/// an operation failure reported as JSON.
fn execute(
    command: RoleCommand,
    service: &impl CrudRepository<Record = Role>,
) -> Result<OperationResult<Value>, String> {
    match command {
        RoleCommand::Create { name, id, actions } => {
            let resource_actions: Vec<ResourceActions> = serde_json::from_str(&actions)
                .map_err(|err| format!("invalid --actions json: {err}"))?;
            let role = match id {
                Some(id) => Role::with_id(id, name, resource_actions),
                None => Role::new(name, resource_actions),
            };
            json_outcome(service.create(&role))
        }
        RoleCommand::Get { id } => json_outcome(service.find_one(&id)),
        RoleCommand::List {
            skip,
            take,
            order_by,
            desc,
        } => {
            let mut options = FindOptions {
                skip,
                take,
                order_by: None,
            };
            if let Some(field) = order_by {
                let direction = if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                options = options.ordered_by(field, direction);
            }
            json_outcome(service.find(&options))
        }
        RoleCommand::Rename { id, name } => {
            json_outcome(service.find_one(&id).and_then(|mut role| {
                role.name = name;
                service.update(&role)
            }))
        }
        RoleCommand::Delete { id } => json_outcome(service.delete(&id)),
    }
}

fn to_json(value: impl Serialize) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|err| format!("json encoding failed: {err}"))
}

fn json_outcome<T: Serialize>(result: OperationResult<T>) -> Result<OperationResult<Value>, String> {
    match result {
        Ok(value) => to_json(value).map(Ok),
        Err(err) => Ok(Err(err)),
    }
}

/// Renders the stdout document and exit code for one outcome.
fn render(outcome: OperationResult<Value>) -> Result<(String, u8), String> {
    match outcome {
        Ok(value) => Ok((format!("{value:#}"), 0)),
        Err(err) => Ok((format!("{:#}", to_json(&err)?), EXIT_OPERATION_ERROR)),
    }
}

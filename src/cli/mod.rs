//! Command-line interface for checkoff
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule and calls exactly
//! one checklist entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::checklist::Checklist;
use crate::config::{self, Config, CONFIG_FILE};
use crate::error::Result;
use crate::model::{CompletionPolicy, ListOutcome, ResetInterval, Task};
use crate::output::OutputOptions;
use crate::store::FileStore;

mod list;
mod overview;
mod task;

/// checkoff - tasks and checklists that clean up after themselves
///
/// Tasks can delete themselves or reset to incomplete some time after being
/// completed. Lists are complete when every task in them is.
#[derive(Parser, Debug)]
#[command(name = "checkoff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the store and config (defaults to the platform data dir)
    #[arg(long, global = true, env = "CHECKOFF_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to config.toml in the data dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// List management
    #[command(subcommand)]
    List(ListCommands),

    /// Loose tasks (incomplete first) and lists
    Overview {
        /// Include lists that are already complete
        #[arg(long)]
        show_completed: bool,
    },

    /// Delete every task and list and restart ids
    ResetDb {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Put the task in this list
        #[arg(long)]
        list: Option<u64>,

        /// Delete the task once it is completed
        #[arg(long, conflicts_with = "reset_on_complete")]
        delete_on_complete: bool,

        /// Reset the task to incomplete some time after completion
        #[arg(long)]
        reset_on_complete: bool,

        /// Reset interval: hour, day, week, month, year
        #[arg(long)]
        interval: Option<String>,
    },

    /// List tasks (unassigned ones by default)
    Ls {
        /// Include tasks that belong to lists
        #[arg(long, conflicts_with = "list")]
        all: bool,

        /// Only tasks in this list
        #[arg(long)]
        list: Option<u64>,
    },

    /// Show one task
    Show {
        /// Task id
        id: u64,
    },

    /// Toggle a task's completion
    Complete {
        /// Task id
        id: u64,
    },

    /// Update task fields
    Update {
        /// Task id
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Set completion (true/false)
        #[arg(long)]
        completed: Option<bool>,

        /// Move the task into this list
        #[arg(long, conflicts_with = "unassign")]
        list: Option<u64>,

        /// Take the task out of its list
        #[arg(long)]
        unassign: bool,

        /// Enable or disable delete-on-complete
        #[arg(long)]
        delete_on_complete: Option<bool>,

        /// Enable or disable reset-on-complete
        #[arg(long)]
        reset_on_complete: Option<bool>,

        /// Reset interval: hour, day, week, month, year
        #[arg(long)]
        interval: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: u64,
    },
}

/// List subcommands
#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a list
    Add {
        /// List title
        title: String,

        /// Delete the list and its tasks once every task is completed
        #[arg(long, conflicts_with = "reset_on_complete")]
        delete_on_complete: bool,

        /// Reset every task in the list some time after the list completes
        #[arg(long)]
        reset_on_complete: bool,

        /// Reset interval: hour, day, week, month, year
        #[arg(long)]
        interval: Option<String>,
    },

    /// Show all lists with their tasks
    Ls,

    /// Show one list with its tasks
    Show {
        /// List id
        id: u64,
    },

    /// Update list fields
    Update {
        /// List id
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// Enable or disable delete-on-complete
        #[arg(long)]
        delete_on_complete: Option<bool>,

        /// Enable or disable reset-on-complete
        #[arg(long)]
        reset_on_complete: Option<bool>,

        /// Reset interval: hour, day, week, month, year
        #[arg(long)]
        interval: Option<String>,
    },

    /// Delete a list and every task in it
    Rm {
        /// List id
        id: u64,
    },

    /// Mark every task in the list incomplete
    Reset {
        /// List id
        id: u64,
    },
}

/// Where to find the store, and how to print
#[derive(Debug, Clone)]
pub struct Env {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl Env {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// Load the config and open the store it points at.
    pub fn open(&self) -> Result<(Config, Checklist<FileStore>)> {
        let data_dir = config::resolve_data_dir(self.data_dir.as_deref())?;
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join(CONFIG_FILE));
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(&config_path)?,
        };

        let store_path = config.store_path(&data_dir);
        debug!(store = %store_path.display(), config = %config_path.display(), "opening store");
        let store = FileStore::with_lock_timeout(store_path, config.store.lock_timeout_ms);
        Ok((config, Checklist::new(store)))
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let env = Env {
            data_dir: self.data_dir,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    list,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                } => task::run_add(task::AddOptions {
                    title,
                    list,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                    env,
                }),
                TaskCommands::Ls { all, list } => task::run_ls(task::LsOptions { all, list, env }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions { id, env }),
                TaskCommands::Complete { id } => {
                    task::run_complete(task::CompleteOptions { id, env })
                }
                TaskCommands::Update {
                    id,
                    title,
                    completed,
                    list,
                    unassign,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                } => task::run_update(task::UpdateOptions {
                    id,
                    title,
                    completed,
                    list,
                    unassign,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                    env,
                }),
                TaskCommands::Rm { id } => task::run_rm(task::RmOptions { id, env }),
            },
            Commands::List(cmd) => match cmd {
                ListCommands::Add {
                    title,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                } => list::run_add(list::AddOptions {
                    title,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                    env,
                }),
                ListCommands::Ls => list::run_ls(env),
                ListCommands::Show { id } => list::run_show(list::IdOptions { id, env }),
                ListCommands::Update {
                    id,
                    title,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                } => list::run_update(list::UpdateOptions {
                    id,
                    title,
                    delete_on_complete,
                    reset_on_complete,
                    interval,
                    env,
                }),
                ListCommands::Rm { id } => list::run_rm(list::IdOptions { id, env }),
                ListCommands::Reset { id } => list::run_reset(list::IdOptions { id, env }),
            },
            Commands::Overview { show_completed } => {
                overview::run_overview(overview::OverviewOptions {
                    show_completed,
                    env,
                })
            }
            Commands::ResetDb { yes } => overview::run_reset_db(overview::ResetDbOptions { yes, env }),
        }
    }
}

/// Parse an optional `--interval` value.
fn parse_interval(raw: Option<&str>) -> Result<Option<ResetInterval>> {
    raw.map(str::parse).transpose()
}

/// One-line rendering of a task: `[x] #3 Buy milk (resets daily at ...)`.
fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] #{} {}", task.id, task.title);
    if let Some(policy) = policy_label(&task.policy) {
        line.push_str(&format!(" ({policy})"));
    }
    line
}

/// Human description of a completion policy, if any is enabled.
fn policy_label(policy: &CompletionPolicy) -> Option<String> {
    if policy.delete_on_complete {
        return Some("deletes on complete".to_string());
    }
    if !policy.reset_on_complete {
        return None;
    }
    let interval = policy.effective_interval();
    Some(match policy.reset_at {
        Some(at) => format!("resets every {interval}, next {}", at.to_rfc3339()),
        None => format!("resets every {interval}"),
    })
}

/// Human description of what happened to a list after a mutation.
fn list_outcome_label(outcome: &ListOutcome) -> String {
    match outcome {
        ListOutcome::Updated { list_id } => format!("list #{list_id} updated"),
        ListOutcome::Completed { list_id } => format!("list #{list_id} complete"),
        ListOutcome::Reopened { list_id } => format!("list #{list_id} no longer complete"),
        ListOutcome::Deleted { list_id } => {
            format!("list #{list_id} complete and deleted with its tasks")
        }
        ListOutcome::ScheduledReset { list_id, reset_at } => format!(
            "list #{list_id} complete, resets at {}",
            reset_at.to_rfc3339()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListId, TaskId};
    use chrono::{TimeZone, Utc};

    fn task(completed: bool, policy: CompletionPolicy) -> Task {
        Task {
            id: TaskId(3),
            title: "Buy milk".to_string(),
            completed,
            list_id: None,
            policy,
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "checkoff", "task", "add", "Buy milk", "--json", "--data-dir", "/tmp/x",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(
            cli.command,
            Commands::Task(TaskCommands::Add { ref title, .. }) if title == "Buy milk"
        ));
    }

    #[test]
    fn conflicting_policy_flags_rejected_by_parser() {
        let parsed = Cli::try_parse_from([
            "checkoff",
            "task",
            "add",
            "x",
            "--delete-on-complete",
            "--reset-on-complete",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn task_line_marks_completion_and_policy() {
        assert_eq!(
            task_line(&task(false, CompletionPolicy::default())),
            "[ ] #3 Buy milk"
        );
        let deleting = CompletionPolicy {
            delete_on_complete: true,
            ..CompletionPolicy::default()
        };
        assert_eq!(
            task_line(&task(true, deleting)),
            "[x] #3 Buy milk (deletes on complete)"
        );
    }

    #[test]
    fn policy_label_includes_schedule() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let policy = CompletionPolicy {
            reset_on_complete: true,
            reset_interval: Some(ResetInterval::Day),
            reset_at: Some(at),
            ..CompletionPolicy::default()
        };
        assert_eq!(
            policy_label(&policy).unwrap(),
            "resets every day, next 2024-03-01T12:00:00+00:00"
        );
    }

    #[test]
    fn interval_parse_errors_are_user_errors() {
        assert_eq!(parse_interval(None).unwrap(), None);
        assert_eq!(
            parse_interval(Some("week")).unwrap(),
            Some(ResetInterval::Week)
        );
        assert!(parse_interval(Some("fortnight")).is_err());
        assert_eq!(
            list_outcome_label(&ListOutcome::Completed { list_id: ListId(2) }),
            "list #2 complete"
        );
    }
}

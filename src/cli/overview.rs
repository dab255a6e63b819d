//! checkoff overview and reset-db commands.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};

use super::list::list_line;
use super::{task_line, Env};

pub struct OverviewOptions {
    pub show_completed: bool,
    pub env: Env,
}

pub struct ResetDbOptions {
    pub yes: bool,
    pub env: Env,
}

#[derive(Serialize)]
struct ResetDbReport {
    reset: bool,
}

pub fn run_overview(options: OverviewOptions) -> Result<()> {
    let (config, mut checklist) = options.env.open()?;
    let hide_completed = config.display.hide_completed_lists && !options.show_completed;
    let overview = checklist.overview(hide_completed)?;

    let mut human = HumanOutput::new(format!(
        "checkoff overview: {} task(s), {} list(s)",
        overview.tasks.len(),
        overview.lists.len()
    ));
    for task in &overview.tasks {
        human.push_detail(task_line(task));
    }
    for list in &overview.lists {
        human.push_detail(list_line(list));
    }
    if overview.tasks.is_empty() && overview.lists.is_empty() {
        human.push_next_step("checkoff task add <title>");
        human.push_next_step("checkoff list add <title>");
    }

    emit_success(options.env.output(), "overview", &overview, Some(&human))
}

pub fn run_reset_db(options: ResetDbOptions) -> Result<()> {
    if !options.yes {
        return Err(Error::InvalidArgument(
            "reset-db deletes every task and list; pass --yes to confirm".to_string(),
        ));
    }

    let (_, mut checklist) = options.env.open()?;
    checklist.reset_database()?;

    let human = HumanOutput::new("checkoff reset-db: all tasks and lists deleted");
    emit_success(
        options.env.output(),
        "reset-db",
        &ResetDbReport { reset: true },
        Some(&human),
    )
}

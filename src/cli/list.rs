//! checkoff list command implementations.

use serde::Serialize;

use crate::error::Result;
use crate::model::{ListDisplay, ListId, ListOutcome, ListPatch, PolicyPatch, PolicyRequest};
use crate::output::{emit_success, HumanOutput};

use super::{list_outcome_label, parse_interval, policy_label, task_line, Env};

pub struct AddOptions {
    pub title: String,
    pub delete_on_complete: bool,
    pub reset_on_complete: bool,
    pub interval: Option<String>,
    pub env: Env,
}

pub struct IdOptions {
    pub id: u64,
    pub env: Env,
}

pub struct UpdateOptions {
    pub id: u64,
    pub title: Option<String>,
    pub delete_on_complete: Option<bool>,
    pub reset_on_complete: Option<bool>,
    pub interval: Option<String>,
    pub env: Env,
}

#[derive(Serialize)]
struct ListRemoveReport {
    id: ListId,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let request = PolicyRequest {
        delete_on_complete: options.delete_on_complete,
        reset_on_complete: options.reset_on_complete,
        reset_interval: parse_interval(options.interval.as_deref())?,
    };

    let (_, mut checklist) = options.env.open()?;
    let list = checklist.add_list(&options.title, request)?;

    let mut human = HumanOutput::new(format!("checkoff list add: created list #{}", list.id));
    human.push_summary("title", list.title.clone());
    if let Some(policy) = policy_label(&list.policy) {
        human.push_summary("policy", policy);
    }
    human.push_next_step(format!("checkoff task add <title> --list {}", list.id));

    emit_success(options.env.output(), "list add", &list, Some(&human))
}

pub fn run_ls(env: Env) -> Result<()> {
    let (_, mut checklist) = env.open()?;
    let lists = checklist.get_all_lists()?;

    let mut human = HumanOutput::new(format!("checkoff list ls: {} list(s)", lists.len()));
    for list in &lists {
        human.push_detail(list_line(list));
    }
    if lists.is_empty() {
        human.push_next_step("checkoff list add <title>");
    }

    emit_success(env.output(), "list ls", &lists, Some(&human))
}

pub fn run_show(options: IdOptions) -> Result<()> {
    let (_, mut checklist) = options.env.open()?;
    let list = checklist.get_list_by_id(ListId(options.id))?;

    let human = list_human("checkoff list show", &list);
    emit_success(options.env.output(), "list show", &list, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let id = ListId(options.id);
    let patch = ListPatch {
        title: options.title,
        policy: PolicyPatch {
            delete_on_complete: options.delete_on_complete,
            reset_on_complete: options.reset_on_complete,
            reset_interval: parse_interval(options.interval.as_deref())?,
        },
    };

    let (_, mut checklist) = options.env.open()?;
    let outcome = checklist.update_list(id, patch)?;

    let mut human = HumanOutput::new(format!("checkoff list update: {}", list_outcome_label(&outcome)));
    if !matches!(outcome, ListOutcome::Deleted { .. }) {
        let list = checklist.get_list_by_id(id)?;
        human.push_summary("title", list.list.title.clone());
        if let Some(policy) = policy_label(&list.list.policy) {
            human.push_summary("policy", policy);
        }
    }

    emit_success(options.env.output(), "list update", &outcome, Some(&human))
}

pub fn run_rm(options: IdOptions) -> Result<()> {
    let id = ListId(options.id);
    let (_, mut checklist) = options.env.open()?;
    checklist.delete_list(id)?;

    let human = HumanOutput::new(format!("checkoff list rm: #{id} removed with its tasks"));
    emit_success(
        options.env.output(),
        "list rm",
        &ListRemoveReport { id },
        Some(&human),
    )
}

pub fn run_reset(options: IdOptions) -> Result<()> {
    let (_, mut checklist) = options.env.open()?;
    let list = checklist.mark_list_incomplete(ListId(options.id))?;

    let human = list_human("checkoff list reset", &list);
    emit_success(options.env.output(), "list reset", &list, Some(&human))
}

/// `[x] #2 Packing 3/3 (deletes on complete)`
pub(super) fn list_line(list: &ListDisplay) -> String {
    let mark = if list.completed() { "x" } else { " " };
    let mut line = format!(
        "[{mark}] #{} {} {}/{}",
        list.id(),
        list.list.title,
        list.completed_tasks,
        list.total_tasks
    );
    if let Some(policy) = policy_label(&list.list.policy) {
        line.push_str(&format!(" ({policy})"));
    }
    line
}

fn list_human(command: &str, list: &ListDisplay) -> HumanOutput {
    let mut human = HumanOutput::new(format!("{command}: {}", list_line(list)));
    for task in &list.tasks {
        human.push_detail(task_line(task));
    }
    if list.tasks.is_empty() {
        human.push_next_step(format!("checkoff task add <title> --list {}", list.id()));
    }
    human
}

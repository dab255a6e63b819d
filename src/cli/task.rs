//! checkoff task command implementations.

use serde::Serialize;

use crate::error::Result;
use crate::model::{ListId, PolicyPatch, PolicyRequest, Task, TaskId, TaskOutcome, TaskPatch};
use crate::output::{emit_success, HumanOutput};

use super::{list_outcome_label, parse_interval, policy_label, task_line, Env};

pub struct AddOptions {
    pub title: String,
    pub list: Option<u64>,
    pub delete_on_complete: bool,
    pub reset_on_complete: bool,
    pub interval: Option<String>,
    pub env: Env,
}

pub struct LsOptions {
    pub all: bool,
    pub list: Option<u64>,
    pub env: Env,
}

pub struct ShowOptions {
    pub id: u64,
    pub env: Env,
}

pub struct CompleteOptions {
    pub id: u64,
    pub env: Env,
}

pub struct UpdateOptions {
    pub id: u64,
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub list: Option<u64>,
    pub unassign: bool,
    pub delete_on_complete: Option<bool>,
    pub reset_on_complete: Option<bool>,
    pub interval: Option<String>,
    pub env: Env,
}

pub struct RmOptions {
    pub id: u64,
    pub env: Env,
}

#[derive(Serialize)]
struct TaskRemoveReport {
    id: TaskId,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let request = PolicyRequest {
        delete_on_complete: options.delete_on_complete,
        reset_on_complete: options.reset_on_complete,
        reset_interval: parse_interval(options.interval.as_deref())?,
    };
    let list_id = options.list.map(ListId);
    let suppressed = list_id.is_some() && request != PolicyRequest::none();

    let (_, mut checklist) = options.env.open()?;
    let task = checklist.add_task(&options.title, list_id, request)?;

    let mut human = HumanOutput::new(format!("checkoff task add: created task #{}", task.id));
    push_task_summary(&mut human, &task);
    if suppressed {
        human.push_warning("completion behavior is set on the list, task flags ignored");
    }
    human.push_next_step(format!("checkoff task complete {}", task.id));

    emit_success(options.env.output(), "task add", &task, Some(&human))
}

pub fn run_ls(options: LsOptions) -> Result<()> {
    let (_, mut checklist) = options.env.open()?;
    let (tasks, scope) = match (options.all, options.list) {
        (_, Some(list)) => (
            checklist.get_tasks_for_list(ListId(list))?,
            format!("list #{list}"),
        ),
        (true, None) => (checklist.get_all_tasks()?, "all".to_string()),
        (false, None) => (checklist.get_unassigned_tasks()?, "unassigned".to_string()),
    };

    let mut human = HumanOutput::new(format!("checkoff task ls: {} task(s), {scope}", tasks.len()));
    for task in &tasks {
        human.push_detail(task_line(task));
    }
    if tasks.is_empty() {
        human.push_next_step("checkoff task add <title>");
    }

    emit_success(options.env.output(), "task ls", &tasks, Some(&human))
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let (_, mut checklist) = options.env.open()?;
    let task = checklist.get_task(TaskId(options.id))?;

    let mut human = HumanOutput::new(format!("checkoff task show: #{}", task.id));
    push_task_summary(&mut human, &task);

    emit_success(options.env.output(), "task show", &task, Some(&human))
}

pub fn run_complete(options: CompleteOptions) -> Result<()> {
    let (_, mut checklist) = options.env.open()?;
    let result = checklist.complete_task(TaskId(options.id))?;

    let header = match &result.task {
        TaskOutcome::Deleted { id } => format!("checkoff task complete: #{id} done and deleted"),
        TaskOutcome::ScheduledReset { task, reset_at } => format!(
            "checkoff task complete: #{} done, resets at {}",
            task.id,
            reset_at.to_rfc3339()
        ),
        TaskOutcome::Updated { task } if task.completed => {
            format!("checkoff task complete: #{} done", task.id)
        }
        TaskOutcome::Updated { task } => {
            format!("checkoff task complete: #{} reopened", task.id)
        }
    };
    let mut human = HumanOutput::new(header);
    if let Some(task) = result.task.task() {
        human.push_detail(task_line(task));
    }
    if let Some(list) = &result.list {
        human.push_summary("list", list_outcome_label(list));
    }

    emit_success(options.env.output(), "task complete", &result, Some(&human))
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let list_id = if options.unassign {
        Some(None)
    } else {
        options.list.map(|id| Some(ListId(id)))
    };
    let patch = TaskPatch {
        title: options.title,
        completed: options.completed,
        list_id,
        policy: PolicyPatch {
            delete_on_complete: options.delete_on_complete,
            reset_on_complete: options.reset_on_complete,
            reset_interval: parse_interval(options.interval.as_deref())?,
        },
    };

    let (_, mut checklist) = options.env.open()?;
    let result = checklist.update_task(TaskId(options.id), patch)?;

    let mut human = match result.task.task() {
        Some(task) => {
            let mut human = HumanOutput::new(format!("checkoff task update: #{}", task.id));
            push_task_summary(&mut human, task);
            human
        }
        None => HumanOutput::new(format!(
            "checkoff task update: #{} completed and deleted",
            options.id
        )),
    };
    if let Some(list) = &result.list {
        human.push_summary("list outcome", list_outcome_label(list));
    }

    emit_success(options.env.output(), "task update", &result, Some(&human))
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let id = TaskId(options.id);
    let (_, mut checklist) = options.env.open()?;
    checklist.delete_task(id)?;

    let human = HumanOutput::new(format!("checkoff task rm: #{id} removed"));
    emit_success(
        options.env.output(),
        "task rm",
        &TaskRemoveReport { id },
        Some(&human),
    )
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("title", task.title.clone());
    human.push_summary("completed", task.completed.to_string());
    if let Some(list_id) = task.list_id {
        human.push_summary("list", format!("#{list_id}"));
    }
    if let Some(policy) = policy_label(&task.policy) {
        human.push_summary("policy", policy);
    }
}

//! Completion policy engine.
//!
//! Pure functions that decide what the next persisted state of a task or list
//! is. Every mutating entry point funnels its policy fields through
//! [`enforce`], so the invariants below hold after any write:
//!
//! - `deleteOnComplete` and `resetOnComplete` are never both true.
//! - List members carry no policy of their own.
//! - `resetInterval` is set iff `resetOnComplete` is (defaulting to `hour`).
//! - `resetAt` is set only while the record is completed with reset enabled.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{
    CompletionPolicy, List, ListId, NewList, NewTask, PolicyPatch, PolicyRequest, Task, TaskPatch,
};

/// Where a policy lives, which decides what it may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyScope {
    /// A task without a list.
    Unassigned,
    /// A task owned by a list; the list's policy supersedes its own.
    ListMember,
    /// A list.
    List,
}

impl PolicyScope {
    pub fn for_task(list_id: Option<ListId>) -> Self {
        match list_id {
            Some(_) => PolicyScope::ListMember,
            None => PolicyScope::Unassigned,
        }
    }
}

/// Side effect owed once a completion value has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEffect {
    None,
    Delete,
    ScheduleReset(DateTime<Utc>),
}

/// Trim a title and reject it when nothing is left.
pub fn normalize_title(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid("title cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Bring a policy in line with its scope and the record's completion.
pub fn enforce(
    mut policy: CompletionPolicy,
    scope: PolicyScope,
    completed: bool,
) -> Result<CompletionPolicy> {
    if scope == PolicyScope::ListMember {
        return Ok(CompletionPolicy::default());
    }
    if policy.delete_on_complete && policy.reset_on_complete {
        return Err(Error::invalid(
            "deleteOnComplete and resetOnComplete cannot both be enabled",
        ));
    }
    if policy.reset_on_complete {
        policy.reset_interval.get_or_insert_with(Default::default);
    } else {
        policy.reset_interval = None;
        policy.reset_at = None;
    }
    if !completed {
        policy.reset_at = None;
    }
    Ok(policy)
}

/// Policy for a freshly created record.
pub fn policy_from_request(request: PolicyRequest, scope: PolicyScope) -> Result<CompletionPolicy> {
    let policy = CompletionPolicy {
        delete_on_complete: request.delete_on_complete,
        reset_on_complete: request.reset_on_complete,
        reset_interval: request.reset_interval,
        reset_at: None,
    };
    enforce(policy, scope, false)
}

/// Merge a partial policy update over the stored one.
///
/// Enabling one post-completion behavior disables the other and discards its
/// interval and schedule. Asking for both in the same patch is rejected unless
/// the scope suppresses them anyway.
pub fn merge_policy(
    current: &CompletionPolicy,
    patch: &PolicyPatch,
    scope: PolicyScope,
    completed: bool,
) -> Result<CompletionPolicy> {
    if scope == PolicyScope::ListMember {
        return Ok(CompletionPolicy::default());
    }
    if patch.delete_on_complete == Some(true) && patch.reset_on_complete == Some(true) {
        return Err(Error::invalid(
            "deleteOnComplete and resetOnComplete cannot both be enabled",
        ));
    }

    let mut merged = current.clone();
    if let Some(delete) = patch.delete_on_complete {
        merged.delete_on_complete = delete;
        if delete {
            merged.reset_on_complete = false;
        }
    }
    if let Some(reset) = patch.reset_on_complete {
        if reset && !merged.reset_on_complete {
            merged.reset_interval = None;
            merged.reset_at = None;
        }
        merged.reset_on_complete = reset;
        if reset {
            merged.delete_on_complete = false;
        }
    }
    if let Some(interval) = patch.reset_interval {
        merged.reset_interval = Some(interval);
    }

    enforce(merged, scope, completed)
}

/// Decide the side effect of a persisted completion value.
pub fn completion_effect(
    policy: &CompletionPolicy,
    completed: bool,
    now: DateTime<Utc>,
) -> CompletionEffect {
    if !completed {
        return CompletionEffect::None;
    }
    if policy.delete_on_complete {
        CompletionEffect::Delete
    } else if policy.reset_on_complete {
        CompletionEffect::ScheduleReset(now + policy.effective_interval().duration())
    } else {
        CompletionEffect::None
    }
}

/// Compute the effect and record a scheduled reset on the policy itself.
pub fn apply_completion(
    policy: &mut CompletionPolicy,
    completed: bool,
    now: DateTime<Utc>,
) -> CompletionEffect {
    let effect = completion_effect(policy, completed, now);
    match effect {
        CompletionEffect::ScheduleReset(at) => policy.reset_at = Some(at),
        CompletionEffect::None if !completed => policy.reset_at = None,
        _ => {}
    }
    effect
}

/// Validate an add-task request into a row ready for insertion.
pub fn prepare_task(
    title: &str,
    list_id: Option<ListId>,
    request: PolicyRequest,
) -> Result<NewTask> {
    let title = normalize_title(title)?;
    let policy = policy_from_request(request, PolicyScope::for_task(list_id))?;
    Ok(NewTask {
        title,
        completed: false,
        list_id,
        policy,
    })
}

/// Validate an add-list request into a row ready for insertion.
pub fn prepare_list(title: &str, request: PolicyRequest) -> Result<NewList> {
    let title = normalize_title(title)?;
    let policy = policy_from_request(request, PolicyScope::List)?;
    Ok(NewList {
        title,
        completed: false,
        policy,
    })
}

/// Merge a task patch over the stored task, re-applying every invariant.
pub fn merge_task(current: &Task, patch: &TaskPatch) -> Result<Task> {
    let title = match patch.title.as_deref() {
        Some(title) => normalize_title(title)?,
        None => current.title.clone(),
    };
    let completed = patch.completed.unwrap_or(current.completed);
    let list_id = patch.list_id.unwrap_or(current.list_id);
    let policy = merge_policy(
        &current.policy,
        &patch.policy,
        PolicyScope::for_task(list_id),
        completed,
    )?;

    Ok(Task {
        id: current.id,
        title,
        completed,
        list_id,
        policy,
    })
}

/// Merge a list patch over the stored list. `completed` is the derived value.
pub fn merge_list(
    current: &List,
    title: Option<&str>,
    patch: &PolicyPatch,
    completed: bool,
) -> Result<List> {
    let title = match title {
        Some(title) => normalize_title(title)?,
        None => current.title.clone(),
    };
    let policy = merge_policy(&current.policy, patch, PolicyScope::List, completed)?;

    Ok(List {
        id: current.id,
        title,
        completed,
        policy,
    })
}

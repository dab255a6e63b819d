//! Lazy reset sweeper.
//!
//! There is no timer. Every read path calls the sweeper first, which applies
//! any scheduled reset whose time has passed before the caller sees data.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{List, ListId, Task, TaskId};

/// Records reset by one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub tasks_reset: Vec<TaskId>,
    pub lists_reset: Vec<ListId>,
    /// Records whose reset could not be persisted; retried on the next read.
    pub skipped: usize,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.tasks_reset.is_empty() && self.lists_reset.is_empty() && self.skipped == 0
    }
}

/// The task after its scheduled reset, or `None` when nothing is due.
///
/// The task keeps `resetOnComplete`, so completing it again schedules a new reset.
pub fn sweep_task(task: &Task, now: DateTime<Utc>) -> Option<Task> {
    if !task.policy.reset_due(task.completed, now) {
        return None;
    }
    let mut reset = task.clone();
    reset.completed = false;
    reset.policy.reset_at = None;
    Some(reset)
}

/// The list row after its scheduled reset, or `None` when nothing is due.
///
/// List resets fire once: the policy is switched off along with the schedule.
/// Member tasks are reset separately by the caller.
pub fn sweep_list(list: &List, now: DateTime<Utc>) -> Option<List> {
    if !list.policy.reset_due(list.completed, now) {
        return None;
    }
    let mut reset = list.clone();
    reset.completed = false;
    reset.policy.reset_on_complete = false;
    reset.policy.reset_interval = None;
    reset.policy.reset_at = None;
    Some(reset)
}

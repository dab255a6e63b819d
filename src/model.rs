//! Records and value types shared by every layer.
//!
//! Field names on the wire follow the persisted layout: the policy columns are
//! camelCase (`deleteOnComplete`, `resetOnComplete`, `resetInterval`, `resetAt`)
//! and the list reference is `list_id`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

macro_rules! record_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                s.trim().parse::<u64>().map($name).map_err(|_| {
                    Error::InvalidArgument(format!(concat!("invalid ", $label, " id '{}'"), s))
                })
            }
        }
    };
}

record_id!(TaskId, "task");
record_id!(ListId, "list");

/// How long after completion a reset-enabled record reverts to incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResetInterval {
    #[default]
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl ResetInterval {
    pub const ALL: [ResetInterval; 5] = [
        ResetInterval::Hour,
        ResetInterval::Day,
        ResetInterval::Week,
        ResetInterval::Month,
        ResetInterval::Year,
    ];

    /// Fixed offset for this interval.
    ///
    /// Months are always 30 days and years always 365 days. There is no
    /// calendar arithmetic here: a "month" reset scheduled on January 31st
    /// fires on March 2nd (or 1st in a leap year), not on the last day of
    /// February.
    pub fn duration(self) -> Duration {
        let seconds = match self {
            ResetInterval::Hour => SECONDS_PER_HOUR,
            ResetInterval::Day => SECONDS_PER_DAY,
            ResetInterval::Week => 7 * SECONDS_PER_DAY,
            ResetInterval::Month => 30 * SECONDS_PER_DAY,
            ResetInterval::Year => 365 * SECONDS_PER_DAY,
        };
        Duration::seconds(seconds)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResetInterval::Hour => "hour",
            ResetInterval::Day => "day",
            ResetInterval::Week => "week",
            ResetInterval::Month => "month",
            ResetInterval::Year => "year",
        }
    }
}

impl fmt::Display for ResetInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResetInterval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        ResetInterval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == normalized)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "invalid reset interval '{s}' (expected hour|day|week|month|year)"
                ))
            })
    }
}

/// Post-completion behavior shared by tasks and lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPolicy {
    #[serde(rename = "deleteOnComplete", default)]
    pub delete_on_complete: bool,
    #[serde(rename = "resetOnComplete", default)]
    pub reset_on_complete: bool,
    #[serde(rename = "resetInterval", default)]
    pub reset_interval: Option<ResetInterval>,
    #[serde(rename = "resetAt", default)]
    pub reset_at: Option<DateTime<Utc>>,
}

impl CompletionPolicy {
    /// Interval used when scheduling a reset.
    pub fn effective_interval(&self) -> ResetInterval {
        self.reset_interval.unwrap_or_default()
    }

    /// True when a scheduled reset exists and its time has come.
    pub fn reset_due(&self, completed: bool, now: DateTime<Utc>) -> bool {
        self.reset_on_complete && completed && self.reset_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
    #[serde(flatten)]
    pub policy: CompletionPolicy,
}

impl Task {
    pub fn is_unassigned(&self) -> bool {
        self.list_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub title: String,
    /// Cached completion. Only [`ListDisplay`] carries the authoritative value.
    #[serde(default)]
    pub completed: bool,
    #[serde(flatten)]
    pub policy: CompletionPolicy,
}

/// A task row before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    pub list_id: Option<ListId>,
    pub policy: CompletionPolicy,
}

impl NewTask {
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            completed: self.completed,
            list_id: self.list_id,
            policy: self.policy,
        }
    }
}

/// A list row before the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    pub title: String,
    pub completed: bool,
    pub policy: CompletionPolicy,
}

impl NewList {
    pub fn into_list(self, id: ListId) -> List {
        List {
            id,
            title: self.title,
            completed: self.completed,
            policy: self.policy,
        }
    }
}

/// Policy flags requested by a caller when creating a task or list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyRequest {
    pub delete_on_complete: bool,
    pub reset_on_complete: bool,
    pub reset_interval: Option<ResetInterval>,
}

impl PolicyRequest {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            delete_on_complete: true,
            ..Self::default()
        }
    }

    pub fn reset(interval: Option<ResetInterval>) -> Self {
        Self {
            reset_on_complete: true,
            reset_interval: interval,
            ..Self::default()
        }
    }
}

/// Partial update of policy flags; `None` leaves the stored value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyPatch {
    pub delete_on_complete: Option<bool>,
    pub reset_on_complete: Option<bool>,
    pub reset_interval: Option<ResetInterval>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    /// `Some(None)` unassigns the task, `Some(Some(id))` moves it into a list.
    pub list_id: Option<Option<ListId>>,
    pub policy: PolicyPatch,
}

impl TaskPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn list(mut self, list_id: Option<ListId>) -> Self {
        self.list_id = Some(list_id);
        self
    }

    pub fn delete_on_complete(mut self, enabled: bool) -> Self {
        self.policy.delete_on_complete = Some(enabled);
        self
    }

    pub fn reset_on_complete(mut self, enabled: bool) -> Self {
        self.policy.reset_on_complete = Some(enabled);
        self
    }

    pub fn reset_interval(mut self, interval: ResetInterval) -> Self {
        self.policy.reset_interval = Some(interval);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub title: Option<String>,
    pub policy: PolicyPatch,
}

impl ListPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn delete_on_complete(mut self, enabled: bool) -> Self {
        self.policy.delete_on_complete = Some(enabled);
        self
    }

    pub fn reset_on_complete(mut self, enabled: bool) -> Self {
        self.policy.reset_on_complete = Some(enabled);
        self
    }

    pub fn reset_interval(mut self, interval: ResetInterval) -> Self {
        self.policy.reset_interval = Some(interval);
        self
    }
}

/// A list together with its member tasks and freshly derived counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListDisplay {
    #[serde(flatten)]
    pub list: List,
    #[serde(rename = "totalTasks")]
    pub total_tasks: usize,
    #[serde(rename = "completedTasks")]
    pub completed_tasks: usize,
    pub tasks: Vec<Task>,
}

impl ListDisplay {
    pub fn id(&self) -> ListId {
        self.list.id
    }

    /// Derived completion; the embedded `list.completed` is overwritten with it.
    pub fn completed(&self) -> bool {
        self.list.completed
    }
}

/// What happened to the task touched by a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TaskOutcome {
    Updated { task: Task },
    Deleted { id: TaskId },
    ScheduledReset { task: Task, reset_at: DateTime<Utc> },
}

impl TaskOutcome {
    pub fn task(&self) -> Option<&Task> {
        match self {
            TaskOutcome::Updated { task } | TaskOutcome::ScheduledReset { task, .. } => Some(task),
            TaskOutcome::Deleted { .. } => None,
        }
    }
}

/// What happened to a list as a consequence of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ListOutcome {
    Updated { list_id: ListId },
    Completed { list_id: ListId },
    Reopened { list_id: ListId },
    Deleted { list_id: ListId },
    ScheduledReset { list_id: ListId, reset_at: DateTime<Utc> },
}

/// Result of completing or updating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskMutationResult {
    pub task: TaskOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListOutcome>,
}

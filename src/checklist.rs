//! Checklist façade.
//!
//! Every entry point the presentation layer uses lives here. Writes go through
//! the policy engine before touching the store; reads run the sweeper first and
//! derive list completion from members on the way out.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::{derive_list_view, is_list_complete, partition_by_completion};
use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::model::{
    List, ListDisplay, ListId, ListOutcome, ListPatch, PolicyRequest, Task, TaskId,
    TaskMutationResult, TaskOutcome, TaskPatch,
};
use crate::policy::{self, CompletionEffect, PolicyScope};
use crate::store::{RecordStore, TaskFilter};
use crate::sweep::{sweep_list, sweep_task, SweepReport};

/// Home screen composition: loose tasks and lists.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    /// Unassigned tasks, incomplete ones first.
    pub tasks: Vec<Task>,
    pub lists: Vec<ListDisplay>,
}

pub struct Checklist<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: RecordStore> Checklist<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> Checklist<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    /// Create a task, unassigned or inside an existing list.
    ///
    /// Policy flags are ignored for list members.
    pub fn add_task(
        &mut self,
        title: &str,
        list_id: Option<ListId>,
        request: PolicyRequest,
    ) -> Result<Task> {
        if let Some(list_id) = list_id {
            self.require_list(list_id)?;
        }
        let row = policy::prepare_task(title, list_id, request)?;
        let task = self.store.insert_task(row)?;
        info!(task = %task.id, list = ?task.list_id, "task created");

        if let Some(list_id) = task.list_id {
            self.refresh_list(list_id, false)?;
        }
        Ok(task)
    }

    /// Merge `patch` over the stored task and apply completion side effects.
    pub fn update_task(&mut self, id: TaskId, patch: TaskPatch) -> Result<TaskMutationResult> {
        let current = self.require_task(id)?;
        if let Some(Some(list_id)) = patch.list_id {
            self.require_list(list_id)?;
        }
        let next = policy::merge_task(&current, &patch)?;
        self.persist_task(current, next)
    }

    /// Flip a task's completion.
    pub fn complete_task(&mut self, id: TaskId) -> Result<TaskMutationResult> {
        let current = self.require_task(id)?;
        let patch = TaskPatch::default().completed(!current.completed);
        let next = policy::merge_task(&current, &patch)?;
        self.persist_task(current, next)
    }

    /// Remove a task. Deleting a missing id is not an error.
    pub fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let existing = self.store.task(id)?;
        if self.store.delete_task(id)? {
            debug!(task = %id, "task deleted");
        }
        if let Some(list_id) = existing.and_then(|task| task.list_id) {
            self.refresh_list(list_id, false)?;
        }
        Ok(())
    }

    pub fn get_task(&mut self, id: TaskId) -> Result<Task> {
        self.sweep();
        self.require_task(id)
    }

    /// Tasks without a list.
    pub fn get_unassigned_tasks(&mut self) -> Result<Vec<Task>> {
        self.sweep();
        self.store.scan_tasks(TaskFilter::Unassigned)
    }

    pub fn get_all_tasks(&mut self) -> Result<Vec<Task>> {
        self.sweep();
        self.store.scan_tasks(TaskFilter::All)
    }

    pub fn get_tasks_for_list(&mut self, list_id: ListId) -> Result<Vec<Task>> {
        self.sweep();
        self.require_list(list_id)?;
        self.store.scan_tasks(TaskFilter::InList(list_id))
    }

    // =========================================================================
    // Lists
    // =========================================================================

    pub fn add_list(&mut self, title: &str, request: PolicyRequest) -> Result<List> {
        let row = policy::prepare_list(title, request)?;
        let list = self.store.insert_list(row)?;
        info!(list = %list.id, "list created");
        Ok(list)
    }

    /// Merge `patch` over the stored list.
    ///
    /// When the list is complete (derived from members) its delete or reset
    /// policy is applied right away.
    pub fn update_list(&mut self, id: ListId, patch: ListPatch) -> Result<ListOutcome> {
        let current = self.require_list(id)?;
        let members = self.store.scan_tasks(TaskFilter::InList(id))?;
        let completed = is_list_complete(&members);
        let next = policy::merge_list(&current, patch.title.as_deref(), &patch.policy, completed)?;
        let fallback = match (current.completed, completed) {
            (false, true) => ListOutcome::Completed { list_id: id },
            (true, false) => ListOutcome::Reopened { list_id: id },
            _ => ListOutcome::Updated { list_id: id },
        };
        self.persist_list(next, fallback)
    }

    /// Remove a list and every task in it. Deleting a missing id is not an error.
    pub fn delete_list(&mut self, id: ListId) -> Result<()> {
        let removed_tasks = self.store.delete_tasks(TaskFilter::InList(id))?;
        if self.store.delete_list(id)? {
            info!(list = %id, removed_tasks, "list deleted");
        }
        Ok(())
    }

    pub fn get_list_by_id(&mut self, id: ListId) -> Result<ListDisplay> {
        self.sweep();
        let list = self.require_list(id)?;
        self.view(list)
    }

    pub fn get_all_lists(&mut self) -> Result<Vec<ListDisplay>> {
        self.sweep();
        self.store
            .lists()?
            .into_iter()
            .map(|list| self.view(list))
            .collect()
    }

    /// True iff the list has at least one task and all of them are completed.
    pub fn check_if_list_complete(&self, id: ListId) -> Result<bool> {
        let members = self.store.scan_tasks(TaskFilter::InList(id))?;
        Ok(is_list_complete(&members))
    }

    /// Mark every member incomplete.
    ///
    /// The list's cached completion follows its members; its policy flags are
    /// left alone.
    pub fn reset_list_tasks(&mut self, id: ListId) -> Result<usize> {
        self.require_list(id)?;
        let mut reset = 0;
        for mut task in self.store.scan_tasks(TaskFilter::InList(id))? {
            if !task.completed {
                continue;
            }
            task.completed = false;
            task.policy.reset_at = None;
            self.write_task(&task)?;
            reset += 1;
        }
        self.refresh_list(id, false)?;
        debug!(list = %id, reset, "list tasks reset");
        Ok(reset)
    }

    /// Reset every member and clear the list's completion and schedule.
    pub fn mark_list_incomplete(&mut self, id: ListId) -> Result<ListDisplay> {
        self.reset_list_tasks(id)?;
        let mut list = self.require_list(id)?;
        list.completed = false;
        list.policy.reset_at = None;
        self.write_list(&list)?;
        self.view(list)
    }

    // =========================================================================
    // Composite reads and maintenance
    // =========================================================================

    pub fn overview(&mut self, hide_completed_lists: bool) -> Result<Overview> {
        let (mut tasks, done) = partition_by_completion(self.get_unassigned_tasks()?);
        tasks.extend(done);
        let mut lists = self.get_all_lists()?;
        if hide_completed_lists {
            lists.retain(|list| !list.completed());
        }
        Ok(Overview { tasks, lists })
    }

    /// Drop and recreate both relations.
    pub fn reset_database(&mut self) -> Result<()> {
        self.store.reset()?;
        warn!("database reset");
        Ok(())
    }

    /// Apply every scheduled reset whose time has passed.
    ///
    /// Never fails: records that cannot be reset are left for the next read.
    pub fn sweep(&mut self) -> SweepReport {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        match self.store.scan_tasks(TaskFilter::All) {
            Ok(tasks) => {
                for task in tasks {
                    let Some(reset) = sweep_task(&task, now) else {
                        continue;
                    };
                    match self.store.update_task(&reset) {
                        Ok(_) => report.tasks_reset.push(task.id),
                        Err(err) => {
                            warn!(task = %task.id, error = %err, "task reset skipped");
                            report.skipped += 1;
                        }
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "sweep could not scan tasks");
                report.skipped += 1;
            }
        }

        match self.store.lists() {
            Ok(lists) => {
                for list in lists {
                    let Some(reset) = sweep_list(&list, now) else {
                        continue;
                    };
                    let applied = self
                        .reset_list_tasks(list.id)
                        .and_then(|_| self.store.update_list(&reset));
                    match applied {
                        Ok(_) => report.lists_reset.push(list.id),
                        Err(err) => {
                            warn!(list = %list.id, error = %err, "list reset skipped");
                            report.skipped += 1;
                        }
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "sweep could not scan lists");
                report.skipped += 1;
            }
        }

        if !report.is_empty() {
            info!(
                tasks = report.tasks_reset.len(),
                lists = report.lists_reset.len(),
                skipped = report.skipped,
                "sweep applied scheduled resets"
            );
        }
        report
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require_task(&self, id: TaskId) -> Result<Task> {
        self.store.task(id)?.ok_or(Error::TaskNotFound(id))
    }

    fn require_list(&self, id: ListId) -> Result<List> {
        self.store.list(id)?.ok_or(Error::ListNotFound(id))
    }

    fn write_task(&mut self, task: &Task) -> Result<()> {
        if self.store.update_task(task)? {
            Ok(())
        } else {
            Err(Error::TaskNotFound(task.id))
        }
    }

    fn write_list(&mut self, list: &List) -> Result<()> {
        if self.store.update_list(list)? {
            Ok(())
        } else {
            Err(Error::ListNotFound(list.id))
        }
    }

    fn view(&self, list: List) -> Result<ListDisplay> {
        let members = self.store.scan_tasks(TaskFilter::InList(list.id))?;
        Ok(derive_list_view(list, members))
    }

    fn persist_task(&mut self, previous: Task, mut next: Task) -> Result<TaskMutationResult> {
        let now = self.clock.now();
        let mut outcome = match policy::apply_completion(&mut next.policy, next.completed, now) {
            CompletionEffect::Delete => {
                self.write_task(&next)?;
                self.store.delete_task(next.id)?;
                info!(task = %next.id, "task deleted on completion");
                TaskOutcome::Deleted { id: next.id }
            }
            CompletionEffect::ScheduleReset(reset_at) => {
                self.write_task(&next)?;
                debug!(task = %next.id, %reset_at, "task reset scheduled");
                TaskOutcome::ScheduledReset {
                    task: next.clone(),
                    reset_at,
                }
            }
            CompletionEffect::None => {
                self.write_task(&next)?;
                TaskOutcome::Updated { task: next.clone() }
            }
        };

        if previous.list_id != next.list_id {
            if let Some(old_list) = previous.list_id {
                self.refresh_list(old_list, false)?;
            }
        }
        let list = match next.list_id {
            Some(list_id) => {
                let toggled = previous.completed != next.completed;
                self.refresh_list(list_id, toggled)?
            }
            None => None,
        };
        if let Some(ListOutcome::Deleted { .. }) = list {
            outcome = TaskOutcome::Deleted { id: next.id };
        }

        Ok(TaskMutationResult {
            task: outcome,
            list,
        })
    }

    /// Persist a list row and apply its completion effect.
    fn persist_list(&mut self, mut list: List, fallback: ListOutcome) -> Result<ListOutcome> {
        let now = self.clock.now();
        match policy::apply_completion(&mut list.policy, list.completed, now) {
            CompletionEffect::Delete => {
                self.delete_list(list.id)?;
                info!(list = %list.id, "list deleted on completion");
                Ok(ListOutcome::Deleted { list_id: list.id })
            }
            CompletionEffect::ScheduleReset(reset_at) => {
                self.write_list(&list)?;
                debug!(list = %list.id, %reset_at, "list reset scheduled");
                Ok(ListOutcome::ScheduledReset {
                    list_id: list.id,
                    reset_at,
                })
            }
            CompletionEffect::None => {
                self.write_list(&list)?;
                Ok(fallback)
            }
        }
    }

    /// Bring the cached completion of a list in line with its members.
    ///
    /// With `fire_policy`, a transition to complete triggers the list's own
    /// delete or reset behavior.
    fn refresh_list(&mut self, id: ListId, fire_policy: bool) -> Result<Option<ListOutcome>> {
        let Some(mut list) = self.store.list(id)? else {
            return Ok(None);
        };
        let members = self.store.scan_tasks(TaskFilter::InList(id))?;
        let completed = is_list_complete(&members);
        if completed == list.completed {
            return Ok(None);
        }

        list.completed = completed;
        list.policy = policy::enforce(list.policy, PolicyScope::List, completed)?;

        if completed && fire_policy {
            let outcome = self.persist_list(list, ListOutcome::Completed { list_id: id })?;
            return Ok(Some(outcome));
        }

        self.write_list(&list)?;
        Ok(Some(if completed {
            ListOutcome::Completed { list_id: id }
        } else {
            ListOutcome::Reopened { list_id: id }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::{CompletionPolicy, NewList, NewTask, ResetInterval};
    use crate::store::MemoryStore;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap()
    }

    fn checklist() -> Checklist<MemoryStore, ManualClock> {
        Checklist::with_clock(MemoryStore::new(), ManualClock::new(start()))
    }

    #[test]
    fn add_task_round_trips_with_defaults() {
        let mut c = checklist();
        let task = c.add_task("  x  ", None, PolicyRequest::none()).unwrap();
        let fetched = c.get_task(task.id).unwrap();
        assert_eq!(fetched.title, "x");
        assert!(!fetched.completed);
        assert_eq!(fetched.list_id, None);
        assert!(!fetched.policy.delete_on_complete);
        assert!(!fetched.policy.reset_on_complete);
    }

    #[test]
    fn add_task_rejects_blank_title_and_leaves_store_untouched() {
        let mut c = checklist();
        let err = c.add_task("   ", None, PolicyRequest::none()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(c.get_all_tasks().unwrap().is_empty());
    }

    #[test]
    fn add_task_into_missing_list_fails() {
        let mut c = checklist();
        let err = c
            .add_task("orphan", Some(ListId(42)), PolicyRequest::none())
            .unwrap_err();
        assert!(matches!(err, Error::ListNotFound(ListId(42))));
    }

    #[test]
    fn completing_delete_on_complete_task_removes_it() {
        let mut c = checklist();
        let task = c.add_task("Take out trash", None, PolicyRequest::delete()).unwrap();

        let result = c.complete_task(task.id).unwrap();
        assert_eq!(result.task, TaskOutcome::Deleted { id: task.id });
        assert!(matches!(c.get_task(task.id), Err(Error::TaskNotFound(_))));
    }

    #[test]
    fn completing_reset_task_schedules_and_sweeps() {
        let mut c = checklist();
        let task = c
            .add_task("Drink water", None, PolicyRequest::reset(Some(ResetInterval::Hour)))
            .unwrap();

        let result = c.complete_task(task.id).unwrap();
        let expected = start() + Duration::hours(1);
        assert!(matches!(
            result.task,
            TaskOutcome::ScheduledReset { reset_at, .. } if reset_at == expected
        ));

        c.clock().advance(Duration::minutes(59));
        assert!(c.get_task(task.id).unwrap().completed);

        c.clock().advance(Duration::minutes(1));
        let swept = c.get_task(task.id).unwrap();
        assert!(!swept.completed);
        assert_eq!(swept.policy.reset_at, None);
        assert!(swept.policy.reset_on_complete);
    }

    #[test]
    fn uncompleting_clears_schedule() {
        let mut c = checklist();
        let task = c
            .add_task("Meditate", None, PolicyRequest::reset(Some(ResetInterval::Day)))
            .unwrap();
        c.complete_task(task.id).unwrap();
        let result = c.complete_task(task.id).unwrap();
        let task = result.task.task().cloned().expect("still present");
        assert!(!task.completed);
        assert_eq!(task.policy.reset_at, None);
    }

    #[test]
    fn complete_missing_task_is_not_found() {
        let mut c = checklist();
        assert!(matches!(
            c.complete_task(TaskId(5)),
            Err(Error::TaskNotFound(TaskId(5)))
        ));
        assert!(matches!(
            c.update_task(TaskId(5), TaskPatch::default().title("x")),
            Err(Error::TaskNotFound(_))
        ));
    }

    #[test]
    fn delete_task_is_idempotent() {
        let mut c = checklist();
        let task = c.add_task("Once", None, PolicyRequest::none()).unwrap();
        c.delete_task(task.id).unwrap();
        c.delete_task(task.id).unwrap();
        assert!(c.get_all_tasks().unwrap().is_empty());
    }

    #[test]
    fn update_rejects_both_flags_without_writing() {
        let mut c = checklist();
        let task = c.add_task("Laundry", None, PolicyRequest::none()).unwrap();
        let patch = TaskPatch::default()
            .title("Changed")
            .delete_on_complete(true)
            .reset_on_complete(true);
        assert!(matches!(
            c.update_task(task.id, patch),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(c.get_task(task.id).unwrap().title, "Laundry");
    }

    #[test]
    fn update_marking_completed_applies_delete() {
        let mut c = checklist();
        let task = c.add_task("Pay rent", None, PolicyRequest::none()).unwrap();
        c.update_task(task.id, TaskPatch::default().delete_on_complete(true))
            .unwrap();
        let result = c
            .update_task(task.id, TaskPatch::default().completed(true))
            .unwrap();
        assert_eq!(result.task, TaskOutcome::Deleted { id: task.id });
    }

    #[test]
    fn list_completion_is_derived_from_members() {
        let mut c = checklist();
        let list = c.add_list("Trip", PolicyRequest::none()).unwrap();
        let a = c.add_task("A", Some(list.id), PolicyRequest::none()).unwrap();
        let b = c.add_task("B", Some(list.id), PolicyRequest::none()).unwrap();
        c.complete_task(a.id).unwrap();
        let result = c.complete_task(b.id).unwrap();
        assert_eq!(result.list, Some(ListOutcome::Completed { list_id: list.id }));

        let view = c.get_list_by_id(list.id).unwrap();
        assert!(view.completed());
        assert_eq!((view.completed_tasks, view.total_tasks), (2, 2));

        c.add_task("C", Some(list.id), PolicyRequest::none()).unwrap();
        let view = c.get_list_by_id(list.id).unwrap();
        assert!(!view.completed());
        assert_eq!((view.completed_tasks, view.total_tasks), (2, 3));
    }

    #[test]
    fn list_member_policy_is_suppressed_on_update() {
        let mut c = checklist();
        let list = c.add_list("Errands", PolicyRequest::none()).unwrap();
        let task = c.add_task("Bank", Some(list.id), PolicyRequest::delete()).unwrap();
        assert!(!task.policy.delete_on_complete);

        let result = c
            .update_task(task.id, TaskPatch::default().reset_on_complete(true))
            .unwrap();
        let task = result.task.task().cloned().unwrap();
        assert!(!task.policy.reset_on_complete);
        assert!(!task.policy.delete_on_complete);
    }

    #[test]
    fn completing_last_member_deletes_delete_on_complete_list() {
        let mut c = checklist();
        let list = c.add_list("Packing", PolicyRequest::delete()).unwrap();
        let a = c.add_task("Socks", Some(list.id), PolicyRequest::none()).unwrap();
        let b = c.add_task("Shoes", Some(list.id), PolicyRequest::none()).unwrap();

        let first = c.complete_task(a.id).unwrap();
        assert_eq!(first.list, None);
        let second = c.complete_task(b.id).unwrap();
        assert_eq!(second.list, Some(ListOutcome::Deleted { list_id: list.id }));
        assert_eq!(second.task, TaskOutcome::Deleted { id: b.id });

        assert!(matches!(c.get_list_by_id(list.id), Err(Error::ListNotFound(_))));
        assert!(matches!(c.get_task(a.id), Err(Error::TaskNotFound(_))));
        assert!(matches!(c.get_task(b.id), Err(Error::TaskNotFound(_))));
    }

    #[test]
    fn list_reset_fires_once() {
        let mut c = checklist();
        let list = c
            .add_list("Morning", PolicyRequest::reset(Some(ResetInterval::Day)))
            .unwrap();
        let a = c.add_task("Coffee", Some(list.id), PolicyRequest::none()).unwrap();

        let result = c.complete_task(a.id).unwrap();
        let expected = start() + Duration::days(1);
        assert_eq!(
            result.list,
            Some(ListOutcome::ScheduledReset {
                list_id: list.id,
                reset_at: expected
            })
        );

        c.clock().advance(Duration::days(1));
        let view = c.get_list_by_id(list.id).unwrap();
        assert!(!view.completed());
        assert!(!view.tasks[0].completed);
        assert!(!view.list.policy.reset_on_complete);
        assert_eq!(view.list.policy.reset_at, None);
    }

    #[test]
    fn reopening_member_clears_list_schedule() {
        let mut c = checklist();
        let list = c
            .add_list("Evening", PolicyRequest::reset(Some(ResetInterval::Hour)))
            .unwrap();
        let a = c.add_task("Dishes", Some(list.id), PolicyRequest::none()).unwrap();
        c.complete_task(a.id).unwrap();

        let result = c.complete_task(a.id).unwrap();
        assert_eq!(result.list, Some(ListOutcome::Reopened { list_id: list.id }));
        let stored = c.store().list(list.id).unwrap().unwrap();
        assert!(!stored.completed);
        assert_eq!(stored.policy.reset_at, None);
        assert!(stored.policy.reset_on_complete);
    }

    #[test]
    fn update_list_on_complete_list_schedules_reset() {
        let mut c = checklist();
        let list = c.add_list("Gym", PolicyRequest::none()).unwrap();
        let a = c.add_task("Squats", Some(list.id), PolicyRequest::none()).unwrap();
        c.complete_task(a.id).unwrap();

        let outcome = c
            .update_list(
                list.id,
                ListPatch::default()
                    .reset_on_complete(true)
                    .reset_interval(ResetInterval::Week),
            )
            .unwrap();
        assert_eq!(
            outcome,
            ListOutcome::ScheduledReset {
                list_id: list.id,
                reset_at: start() + Duration::weeks(1)
            }
        );
        assert!(c.get_list_by_id(list.id).unwrap().tasks[0].completed);
    }

    #[test]
    fn reset_list_tasks_reopens_cached_completion() {
        let mut c = checklist();
        let list = c
            .add_list("Daily", PolicyRequest::reset(Some(ResetInterval::Day)))
            .unwrap();
        let a = c.add_task("Walk", Some(list.id), PolicyRequest::none()).unwrap();
        c.complete_task(a.id).unwrap();

        assert_eq!(c.reset_list_tasks(list.id).unwrap(), 1);
        let stored = c.store().list(list.id).unwrap().unwrap();
        assert!(!stored.completed);
        assert_eq!(stored.policy.reset_at, None);
        assert!(stored.policy.reset_on_complete);

        c.clock().advance(Duration::days(2));
        assert!(c.sweep().lists_reset.is_empty());
        let again = c.complete_task(a.id).unwrap();
        assert_eq!(
            again.list,
            Some(ListOutcome::ScheduledReset {
                list_id: list.id,
                reset_at: start() + Duration::days(3)
            })
        );
    }

    #[test]
    fn update_list_reports_cache_transition() {
        let mut store = MemoryStore::new();
        let list = store
            .insert_list(NewList {
                title: "Imported".to_string(),
                completed: false,
                policy: CompletionPolicy::default(),
            })
            .unwrap();
        store
            .insert_task(NewTask {
                title: "Already done".to_string(),
                completed: true,
                list_id: Some(list.id),
                policy: CompletionPolicy::default(),
            })
            .unwrap();
        let mut c = Checklist::with_clock(store, ManualClock::new(start()));

        let outcome = c
            .update_list(list.id, ListPatch::default().title("Renamed"))
            .unwrap();
        assert_eq!(outcome, ListOutcome::Completed { list_id: list.id });
        assert!(c.store().list(list.id).unwrap().unwrap().completed);

        let again = c
            .update_list(list.id, ListPatch::default().title("Renamed twice"))
            .unwrap();
        assert_eq!(again, ListOutcome::Updated { list_id: list.id });
    }

    #[test]
    fn delete_list_cascades_and_is_idempotent() {
        let mut c = checklist();
        let list = c.add_list("Old", PolicyRequest::none()).unwrap();
        let a = c.add_task("A", Some(list.id), PolicyRequest::none()).unwrap();
        let loose = c.add_task("Loose", None, PolicyRequest::none()).unwrap();

        c.delete_list(list.id).unwrap();
        c.delete_list(list.id).unwrap();

        assert!(matches!(c.get_task(a.id), Err(Error::TaskNotFound(_))));
        assert_eq!(c.get_all_tasks().unwrap(), vec![loose]);
    }

    #[test]
    fn mark_list_incomplete_resets_members() {
        let mut c = checklist();
        let list = c.add_list("Weekly", PolicyRequest::none()).unwrap();
        let a = c.add_task("Plan", Some(list.id), PolicyRequest::none()).unwrap();
        c.complete_task(a.id).unwrap();

        let view = c.mark_list_incomplete(list.id).unwrap();
        assert!(!view.completed());
        assert_eq!(view.completed_tasks, 0);
        assert!(!c.check_if_list_complete(list.id).unwrap());
    }

    #[test]
    fn overview_puts_incomplete_first_and_hides_done_lists() {
        let mut c = checklist();
        let done = c.add_task("Done", None, PolicyRequest::none()).unwrap();
        let open = c.add_task("Open", None, PolicyRequest::none()).unwrap();
        c.complete_task(done.id).unwrap();

        let finished = c.add_list("Finished", PolicyRequest::none()).unwrap();
        let member = c.add_task("m", Some(finished.id), PolicyRequest::none()).unwrap();
        c.complete_task(member.id).unwrap();
        c.add_list("Empty", PolicyRequest::none()).unwrap();

        let overview = c.overview(true).unwrap();
        let ids: Vec<TaskId> = overview.tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![open.id, done.id]);
        assert_eq!(overview.lists.len(), 1);
        assert_eq!(overview.lists[0].list.title, "Empty");

        assert_eq!(c.overview(false).unwrap().lists.len(), 2);
    }

    #[test]
    fn moving_task_between_lists_refreshes_both() {
        let mut c = checklist();
        let from = c.add_list("From", PolicyRequest::none()).unwrap();
        let to = c.add_list("To", PolicyRequest::none()).unwrap();
        let done = c.add_task("done", Some(from.id), PolicyRequest::none()).unwrap();
        let open = c.add_task("open", Some(from.id), PolicyRequest::none()).unwrap();
        c.complete_task(done.id).unwrap();

        c.update_task(open.id, TaskPatch::default().list(Some(to.id)))
            .unwrap();

        assert!(c.store().list(from.id).unwrap().unwrap().completed);
        assert!(!c.store().list(to.id).unwrap().unwrap().completed);
        assert!(matches!(
            c.update_task(open.id, TaskPatch::default().list(Some(ListId(77)))),
            Err(Error::ListNotFound(_))
        ));
    }

    #[test]
    fn reset_database_restarts_ids() {
        let mut c = checklist();
        c.add_list("L", PolicyRequest::none()).unwrap();
        c.add_task("T", None, PolicyRequest::none()).unwrap();
        c.reset_database().unwrap();

        assert!(c.get_all_lists().unwrap().is_empty());
        let task = c.add_task("T2", None, PolicyRequest::none()).unwrap();
        assert_eq!(task.id, TaskId(1));
    }

    #[test]
    fn sweep_reports_what_it_reset() {
        let mut c = checklist();
        let task = c
            .add_task("Vitamins", None, PolicyRequest::reset(None))
            .unwrap();
        c.complete_task(task.id).unwrap();
        assert!(c.sweep().is_empty());

        c.clock().advance(Duration::hours(2));
        let report = c.sweep();
        assert_eq!(report.tasks_reset, vec![task.id]);
        assert!(c.sweep().is_empty());
    }
}

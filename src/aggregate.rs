//! List aggregation.
//!
//! A list's completion is derived from its members every time it is asked
//! for. The `completed` column stored on a list row is a cache and is never
//! read back as truth.

use crate::model::{List, ListDisplay, Task};

/// True iff there is at least one task and every task is completed.
pub fn is_list_complete(members: &[Task]) -> bool {
    !members.is_empty() && members.iter().all(|task| task.completed)
}

/// Build the display form of a list from its current members.
pub fn derive_list_view(list: List, members: Vec<Task>) -> ListDisplay {
    let total_tasks = members.len();
    let completed_tasks = members.iter().filter(|task| task.completed).count();
    let mut list = list;
    list.completed = total_tasks > 0 && total_tasks == completed_tasks;

    ListDisplay {
        list,
        total_tasks,
        completed_tasks,
        tasks: members,
    }
}

/// Split tasks into `(incomplete, completed)`, each keeping its input order.
pub fn partition_by_completion(tasks: Vec<Task>) -> (Vec<Task>, Vec<Task>) {
    tasks.into_iter().partition(|task| !task.completed)
}

//! Record store for tasks and lists.
//!
//! The core logic only needs keyed rows with insert, point lookup, predicate
//! scan, update-by-id and delete-by-id. [`MemoryStore`] keeps the rows in
//! memory; [`FileStore`] persists them as a single JSON document guarded by a
//! file lock.
//!
//! Ids are autoincrement per relation and are never reused until [`RecordStore::reset`].

mod file;
mod memory;
mod tables;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use tables::{Tables, STORE_SCHEMA_VERSION};

use crate::error::Result;
use crate::model::{List, ListId, NewList, NewTask, Task, TaskId};

/// Predicate for scanning the task relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFilter {
    All,
    /// Tasks with no `list_id`.
    Unassigned,
    /// Tasks owned by one list.
    InList(ListId),
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Unassigned => task.is_unassigned(),
            TaskFilter::InList(list_id) => task.list_id == Some(list_id),
        }
    }
}

pub trait RecordStore {
    fn insert_task(&mut self, row: NewTask) -> Result<Task>;
    fn task(&self, id: TaskId) -> Result<Option<Task>>;
    fn scan_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>>;
    /// Replace a stored task. Returns `false` when the id is absent.
    fn update_task(&mut self, task: &Task) -> Result<bool>;
    /// Returns `false` when the id was already absent.
    fn delete_task(&mut self, id: TaskId) -> Result<bool>;
    fn delete_tasks(&mut self, filter: TaskFilter) -> Result<usize>;

    fn insert_list(&mut self, row: NewList) -> Result<List>;
    fn list(&self, id: ListId) -> Result<Option<List>>;
    fn lists(&self) -> Result<Vec<List>>;
    /// Replace a stored list. Returns `false` when the id is absent.
    fn update_list(&mut self, list: &List) -> Result<bool>;
    /// Delete a list row only; members are the caller's concern.
    fn delete_list(&mut self, id: ListId) -> Result<bool>;

    /// Drop and recreate both relations, restarting id sequences.
    fn reset(&mut self) -> Result<()>;
}

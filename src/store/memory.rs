use crate::error::Result;
use crate::model::{List, ListId, NewList, NewTask, Task, TaskId};

use super::{RecordStore, Tables, TaskFilter};

/// Non-durable store, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn insert_task(&mut self, row: NewTask) -> Result<Task> {
        Ok(self.tables.insert_task(row))
    }

    fn task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.tables.task(id).cloned())
    }

    fn scan_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        Ok(self.tables.scan_tasks(filter))
    }

    fn update_task(&mut self, task: &Task) -> Result<bool> {
        Ok(self.tables.update_task(task))
    }

    fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        Ok(self.tables.delete_task(id))
    }

    fn delete_tasks(&mut self, filter: TaskFilter) -> Result<usize> {
        Ok(self.tables.delete_tasks(filter))
    }

    fn insert_list(&mut self, row: NewList) -> Result<List> {
        Ok(self.tables.insert_list(row))
    }

    fn list(&self, id: ListId) -> Result<Option<List>> {
        Ok(self.tables.list(id).cloned())
    }

    fn lists(&self) -> Result<Vec<List>> {
        Ok(self.tables.lists.clone())
    }

    fn update_list(&mut self, list: &List) -> Result<bool> {
        Ok(self.tables.update_list(list))
    }

    fn delete_list(&mut self, id: ListId) -> Result<bool> {
        Ok(self.tables.delete_list(id))
    }

    fn reset(&mut self) -> Result<()> {
        self.tables = Tables::default();
        Ok(())
    }
}

//! In-memory form of the two relations, shared by both store backends.

use serde::{Deserialize, Serialize};

use crate::model::{List, ListId, NewList, NewTask, Task, TaskId};

use super::TaskFilter;

pub const STORE_SCHEMA_VERSION: &str = "checkoff.store.v1";

fn default_schema_version() -> String {
    STORE_SCHEMA_VERSION.to_string()
}

fn first_id() -> u64 {
    1
}

/// Both relations plus their id sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default = "first_id")]
    pub next_task_id: u64,
    #[serde(default = "first_id")]
    pub next_list_id: u64,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            next_task_id: first_id(),
            next_list_id: first_id(),
            lists: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

impl Tables {
    pub fn insert_task(&mut self, row: NewTask) -> Task {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        let task = row.into_task(id);
        self.tasks.push(task.clone());
        task
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn scan_tasks(&self, filter: TaskFilter) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect()
    }

    pub fn update_task(&mut self, task: &Task) -> bool {
        match self.tasks.iter_mut().find(|stored| stored.id == task.id) {
            Some(stored) => {
                *stored = task.clone();
                true
            }
            None => false,
        }
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn delete_tasks(&mut self, filter: TaskFilter) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !filter.matches(task));
        before - self.tasks.len()
    }

    pub fn insert_list(&mut self, row: NewList) -> List {
        let id = ListId(self.next_list_id);
        self.next_list_id += 1;
        let list = row.into_list(id);
        self.lists.push(list.clone());
        list
    }

    pub fn list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub fn update_list(&mut self, list: &List) -> bool {
        match self.lists.iter_mut().find(|stored| stored.id == list.id) {
            Some(stored) => {
                *stored = list.clone();
                true
            }
            None => false,
        }
    }

    pub fn delete_list(&mut self, id: ListId) -> bool {
        let before = self.lists.len();
        self.lists.retain(|list| list.id != id);
        self.lists.len() != before
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::model::{List, ListId, NewList, NewTask, Task, TaskId};

use super::{RecordStore, Tables, TaskFilter, STORE_SCHEMA_VERSION};

/// Durable store: both relations in one JSON document.
///
/// Every call takes an exclusive lock on `<path>.lock`, reads the document,
/// and for writes replaces it atomically before releasing the lock. A missing
/// file reads as an empty store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_lock_timeout(path, DEFAULT_LOCK_TIMEOUT_MS)
    }

    pub fn with_lock_timeout(path: impl Into<PathBuf>, lock_timeout_ms: u64) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document without holding the lock afterwards.
    pub fn snapshot(&self) -> Result<Tables> {
        self.read(|tables| tables.clone())
    }

    fn load(&self) -> Result<Tables> {
        if !self.path.exists() {
            return Ok(Tables::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Tables::default());
        }
        let tables: Tables = serde_json::from_str(&content)?;
        if tables.schema_version != STORE_SCHEMA_VERSION {
            return Err(Error::Storage(format!(
                "unsupported store schema '{}' in {} (expected {STORE_SCHEMA_VERSION})",
                tables.schema_version,
                self.path.display()
            )));
        }
        Ok(tables)
    }

    fn save(&self, tables: &Tables) -> Result<()> {
        let json = serde_json::to_string_pretty(tables)?;
        lock::write_atomic(&self.path, json.as_bytes())
    }

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tables) -> T,
    {
        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        let tables = self.load()?;
        Ok(f(&tables))
    }

    fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> T,
    {
        let _lock = FileLock::acquire(lock::lock_path_for(&self.path), self.lock_timeout_ms)?;
        let mut tables = self.load()?;
        let result = f(&mut tables);
        self.save(&tables)?;
        Ok(result)
    }
}

impl RecordStore for FileStore {
    fn insert_task(&mut self, row: NewTask) -> Result<Task> {
        self.update(|tables| tables.insert_task(row))
    }

    fn task(&self, id: TaskId) -> Result<Option<Task>> {
        self.read(|tables| tables.task(id).cloned())
    }

    fn scan_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        self.read(|tables| tables.scan_tasks(filter))
    }

    fn update_task(&mut self, task: &Task) -> Result<bool> {
        self.update(|tables| tables.update_task(task))
    }

    fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        self.update(|tables| tables.delete_task(id))
    }

    fn delete_tasks(&mut self, filter: TaskFilter) -> Result<usize> {
        self.update(|tables| tables.delete_tasks(filter))
    }

    fn insert_list(&mut self, row: NewList) -> Result<List> {
        self.update(|tables| tables.insert_list(row))
    }

    fn list(&self, id: ListId) -> Result<Option<List>> {
        self.read(|tables| tables.list(id).cloned())
    }

    fn lists(&self) -> Result<Vec<List>> {
        self.read(|tables| tables.lists.clone())
    }

    fn update_list(&mut self, list: &List) -> Result<bool> {
        self.update(|tables| tables.update_list(list))
    }

    fn delete_list(&mut self, id: ListId) -> Result<bool> {
        self.update(|tables| tables.delete_list(id))
    }

    fn reset(&mut self) -> Result<()> {
        debug!(store = %self.path.display(), "recreating store");
        self.update(|tables| *tables = Tables::default())
    }
}

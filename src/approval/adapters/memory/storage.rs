//! In-memory task storage for workflow tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::approval::{
    domain::{Task, TaskId},
    ports::{TaskStorage, TaskStorageError, TaskStorageResult},
};

/// Thread-safe in-memory task storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStorage {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskStorage {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskStorageError {
    TaskStorageError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStorage for InMemoryTaskStorage {
    async fn insert(&self, task: &Task) -> TaskStorageResult<()> {
        let mut tasks = self.tasks.write().map_err(lock_error)?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskStorageError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskStorageResult<()> {
        let mut tasks = self.tasks.write().map_err(lock_error)?;
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskStorageResult<()> {
        let mut tasks = self.tasks.write().map_err(lock_error)?;
        tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskStorageError::NotFound(id))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStorageResult<Option<Task>> {
        let tasks = self.tasks.read().map_err(lock_error)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_all(&self) -> TaskStorageResult<Vec<Task>> {
        let tasks = self.tasks.read().map_err(lock_error)?;
        let mut all: Vec<Task> = tasks.values().cloned().collect();
        all.sort_by_key(|task| (task.created_at(), task.id().into_inner()));
        Ok(all)
    }
}

//! Storage port for task aggregates.

use crate::approval::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task storage operations.
pub type TaskStorageResult<T> = Result<T, TaskStorageError>;

/// Durable keyed store for task aggregates.
#[async_trait]
pub trait TaskStorage: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStorageError::DuplicateTask`] when the task ID already
    /// exists.
    async fn insert(&self, task: &Task) -> TaskStorageResult<()>;

    /// Writes every field of `task`, creating the record when it is absent.
    async fn update(&self, task: &Task) -> TaskStorageResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStorageError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskStorageResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStorageResult<Option<Task>>;

    /// Returns every stored task.
    async fn list_all(&self) -> TaskStorageResult<Vec<Task>>;
}

/// Errors returned by task storage implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStorageError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted task data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStorageError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

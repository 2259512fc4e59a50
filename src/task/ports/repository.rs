//! Repository ports for task persistence and history retrieval.

use crate::task::domain::{ActorId, HistoryEntry, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// `create` and `update` persist the task mutation and its history entries
/// as one atomic unit: a history-write failure must abort the task
/// mutation, so the trail can never fall out of step with the record.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task together with its creation history entry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn create(&self, task: &Task, history: &[HistoryEntry]) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task together with the history
    /// entries recorded for this save.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &Task, history: &[HistoryEntry]) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks owned by the given actor, ordered by list
    /// position, then creation time.
    async fn list_for_owner(&self, owner: ActorId) -> TaskRepositoryResult<Vec<Task>>;

    /// Removes a task; its history entries cascade with it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for history repository operations.
pub type HistoryRepositoryResult<T> = Result<T, HistoryRepositoryError>;

/// History retrieval contract.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Returns every history entry recorded for the given task.
    ///
    /// Implementations return entries in a deterministic order, but
    /// callers re-sort by creation time at read time and must not rely on
    /// storage order.
    async fn list_for_task(&self, task_id: TaskId) -> HistoryRepositoryResult<Vec<HistoryEntry>>;
}

/// Errors returned by history repository implementations.
#[derive(Debug, Clone, Error)]
pub enum HistoryRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl HistoryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! Service layer for change-tracked task mutation.
//!
//! Interception is explicit: the operations below are the only code paths
//! that persist task mutations, and each one computes and writes the audit
//! entries for its save inside the same repository transaction. There is
//! no lifecycle-hook magic and no ambient current user; the acting actor
//! is a parameter on every mutating call.

use crate::task::{
    domain::{
        Actor, ActorId, CategoryId, HistoryEntry, NewTaskData, Task, TaskDomainError, TaskId,
        TaskPatch, TaskPriority, TaskTitle, extract_changes,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: Option<TaskPriority>,
    due_date: Option<NaiveDate>,
    category_id: Option<CategoryId>,
    position: i32,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            due_date: None,
            category_id: None,
            position: 0,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the task priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the category reference.
    #[must_use]
    pub const fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the list position.
    #[must_use]
    pub const fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }
}

/// Result of one change-tracked task update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdateOutcome {
    task: Task,
    recorded: Vec<HistoryEntry>,
}

impl TaskUpdateOutcome {
    /// Returns the task as persisted by the update.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the history entries recorded for the update, in declared
    /// field order.
    #[must_use]
    pub fn recorded(&self) -> &[HistoryEntry] {
        &self.recorded
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The task to update does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Change-tracked task orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task owned by the acting actor.
    ///
    /// Records exactly one creation entry ([`HistoryEntry::creation`])
    /// alongside the task, in the same storage transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when title validation fails or the
    /// repository rejects persistence; on any error nothing is persisted.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
        actor: &Actor,
    ) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let mut data = NewTaskData::new(actor.id(), title).with_position(request.position);
        if let Some(description) = request.description {
            data = data.with_description(description);
        }
        if let Some(priority) = request.priority {
            data = data.with_priority(priority);
        }
        if let Some(due_date) = request.due_date {
            data = data.with_due_date(due_date);
        }
        if let Some(category_id) = request.category_id {
            data = data.with_category(category_id);
        }

        let task = Task::create(data, &*self.clock);
        let entry = HistoryEntry::creation(&task, actor.id(), &*self.clock);
        self.repository
            .create(&task, std::slice::from_ref(&entry))
            .await?;
        Ok(task)
    }

    /// Applies a patch to an existing task.
    ///
    /// Extracts the tracked-field changes between the stored task and the
    /// patched task, and persists the new task state together with one
    /// history entry per change as one atomic save. Changes to untracked
    /// fields save the task without recording entries.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist, or [`TaskLifecycleError::Repository`] when persistence
    /// fails; a failed save records neither the mutation nor any entries.
    pub async fn update_task(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        actor: &Actor,
    ) -> TaskLifecycleResult<TaskUpdateOutcome> {
        let before = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(id))?;

        let mut task = before.clone();
        task.apply(patch, &*self.clock);

        let recorded: Vec<HistoryEntry> = extract_changes(&before, &task)
            .iter()
            .map(|change| HistoryEntry::field_change(id, actor.id(), change, &*self.clock))
            .collect();

        self.repository.update(&task, &recorded).await?;
        Ok(TaskUpdateOutcome { task, recorded })
    }

    /// Deletes a task; its history entries cascade with it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task does not
    /// exist or persistence fails.
    pub async fn delete_task(&self, id: TaskId) -> TaskLifecycleResult<()> {
        let result: TaskRepositoryResult<()> = self.repository.delete(id).await;
        Ok(result?)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_task(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        let result: TaskRepositoryResult<Option<Task>> = self.repository.find_by_id(id).await;
        Ok(result?)
    }

    /// Lists the tasks owned by an actor, ordered by list position, then
    /// creation time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_tasks_for_owner(&self, owner: ActorId) -> TaskLifecycleResult<Vec<Task>> {
        let result: TaskRepositoryResult<Vec<Task>> = self.repository.list_for_owner(owner).await;
        Ok(result?)
    }
}

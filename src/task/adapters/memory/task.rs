//! In-memory task store for tests and embedding without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ActorId, HistoryEntry, Task, TaskId},
    ports::{
        HistoryRepository, HistoryRepositoryError, HistoryRepositoryResult, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};

/// Thread-safe in-memory task and history store.
///
/// Task writes and their history entries share one lock, so a save is
/// all-or-nothing exactly like the transactional database adapter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    history: HashMap<TaskId, Vec<HistoryEntry>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn append_history(state: &mut InMemoryTaskState, task_id: TaskId, history: &[HistoryEntry]) {
    state
        .history
        .entry(task_id)
        .or_default()
        .extend(history.iter().cloned());
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn create(&self, task: &Task, history: &[HistoryEntry]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        append_history(&mut state, task.id(), history);
        Ok(())
    }

    async fn update(&self, task: &Task, history: &[HistoryEntry]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        append_history(&mut state, task.id(), history);
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list_for_owner(&self, owner: ActorId) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.owner() == owner)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.position()
                .cmp(&b.position())
                .then_with(|| a.created_at().cmp(&b.created_at()))
        });
        Ok(tasks)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.remove(&id).is_none() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        state.history.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryTaskStore {
    async fn list_for_task(&self, task_id: TaskId) -> HistoryRepositoryResult<Vec<HistoryEntry>> {
        let state = self.state.read().map_err(|err| {
            HistoryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.history.get(&task_id).cloned().unwrap_or_default())
    }
}

//! Read-side service assembling history entries into view models.

use crate::task::{
    domain::{
        ActionKind, Actor, ActorId, HistoryEntry, HistoryEntryId, TaskId, human_readable_change,
    },
    ports::{
        ActorDirectory, ActorDirectoryError, HistoryRepository, HistoryRepositoryError,
    },
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// User attribution embedded in a history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorView {
    /// Actor identifier.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl From<Actor> for ActorView {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id(),
            name: actor.name().to_owned(),
            email: actor.email().to_owned(),
        }
    }
}

/// One history entry prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntryView {
    /// Entry identifier.
    pub id: HistoryEntryId,
    /// Changed field name.
    pub field_name: String,
    /// Serialized value before the change, if any.
    pub old_value: Option<String>,
    /// Serialized value after the change, if any.
    pub new_value: Option<String>,
    /// Action kind.
    pub action: ActionKind,
    /// When the change was recorded.
    pub created_at: DateTime<Utc>,
    /// Rendered sentence describing the change.
    pub human_readable_change: String,
    /// The acting user.
    pub user: ActorView,
}

impl HistoryEntryView {
    fn from_entry(entry: &HistoryEntry, user: ActorView) -> Self {
        Self {
            id: entry.id(),
            field_name: entry.field_name().to_owned(),
            old_value: entry.old_value().map(str::to_owned),
            new_value: entry.new_value().map(str::to_owned),
            action: entry.action(),
            created_at: entry.created_at(),
            human_readable_change: human_readable_change(entry),
            user,
        }
    }
}

/// Service-level errors for history queries.
#[derive(Debug, Error)]
pub enum HistoryQueryError {
    /// History retrieval failed.
    #[error(transparent)]
    Repository(#[from] HistoryRepositoryError),
    /// Actor lookup failed.
    #[error(transparent)]
    Directory(#[from] ActorDirectoryError),
    /// A recorded actor has no identity in the directory.
    #[error("unknown actor: {0}")]
    UnknownActor(ActorId),
}

/// Result type for history query service operations.
pub type HistoryQueryResult<T> = Result<T, HistoryQueryError>;

/// Read-side history service.
#[derive(Clone)]
pub struct HistoryQueryService<H, A>
where
    H: HistoryRepository,
    A: ActorDirectory,
{
    history: Arc<H>,
    actors: Arc<A>,
}

impl<H, A> HistoryQueryService<H, A>
where
    H: HistoryRepository,
    A: ActorDirectory,
{
    /// Creates a new history query service.
    #[must_use]
    pub const fn new(history: Arc<H>, actors: Arc<A>) -> Self {
        Self { history, actors }
    }

    /// Returns a task's history as view models, newest first.
    ///
    /// The listing re-sorts by creation time at read time; entries sharing
    /// a timestamp keep the repository's deterministic order. Pagination,
    /// if any, is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryQueryError`] when retrieval fails or an entry's
    /// actor cannot be resolved.
    pub async fn history_for_task(
        &self,
        task_id: TaskId,
    ) -> HistoryQueryResult<Vec<HistoryEntryView>> {
        let mut entries = self.history.list_for_task(task_id).await?;
        // Stable sort: within equal timestamps the repository order (one
        // save's declared field order) is preserved.
        entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        let actors = self.resolve_actors(&entries).await?;
        entries
            .iter()
            .map(|entry| {
                let user = actors
                    .get(&entry.actor_id())
                    .cloned()
                    .ok_or(HistoryQueryError::UnknownActor(entry.actor_id()))?;
                Ok(HistoryEntryView::from_entry(entry, user))
            })
            .collect()
    }

    async fn resolve_actors(
        &self,
        entries: &[HistoryEntry],
    ) -> HistoryQueryResult<HashMap<ActorId, ActorView>> {
        let mut resolved = HashMap::new();
        for entry in entries {
            let actor_id = entry.actor_id();
            if resolved.contains_key(&actor_id) {
                continue;
            }
            let actor = self
                .actors
                .find(actor_id)
                .await?
                .ok_or(HistoryQueryError::UnknownActor(actor_id))?;
            resolved.insert(actor_id, ActorView::from(actor));
        }
        Ok(resolved)
    }
}

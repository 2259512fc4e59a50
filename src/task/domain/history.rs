//! Immutable audit entries for task field changes.

use super::diff::FieldChange;
use super::{ActorId, HistoryEntryId, ParseActionKindError, Task, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Categorical tag on a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// The task was created.
    Created,
    /// A tracked field other than status or priority changed.
    Updated,
    /// The task was removed.
    Deleted,
    /// The workflow status changed.
    StatusChanged,
    /// The priority changed.
    PriorityChanged,
}

impl ActionKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::StatusChanged => "status_changed",
            Self::PriorityChanged => "priority_changed",
        }
    }
}

impl TryFrom<&str> for ActionKind {
    type Error = ParseActionKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            "status_changed" => Ok(Self::StatusChanged),
            "priority_changed" => Ok(Self::PriorityChanged),
            _ => Err(ParseActionKindError(value.to_owned())),
        }
    }
}

/// One immutable audit fact: a single field's change on a single task save.
///
/// Entries are written exactly once by the lifecycle service and never
/// mutated; they disappear only when their task is deleted. Every distinct
/// field change is its own entry — no deduplication is attempted, so the
/// trail supports chronological field-level queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: HistoryEntryId,
    task_id: TaskId,
    actor_id: ActorId,
    field_name: String,
    old_value: Option<String>,
    new_value: Option<String>,
    action: ActionKind,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedHistoryEntryData {
    /// Persisted entry identifier.
    pub id: HistoryEntryId,
    /// Persisted task identifier.
    pub task_id: TaskId,
    /// Persisted acting user identifier.
    pub actor_id: ActorId,
    /// Persisted field name.
    pub field_name: String,
    /// Persisted serialized old value, if any.
    pub old_value: Option<String>,
    /// Persisted serialized new value, if any.
    pub new_value: Option<String>,
    /// Persisted action kind.
    pub action: ActionKind,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Synthesizes the single entry recorded when a task is created.
    ///
    /// The entry carries the initial title as its new value and no old
    /// value. [`ActionKind::Created`] is reserved for this constructor.
    #[must_use]
    pub fn creation(task: &Task, actor_id: ActorId, clock: &impl Clock) -> Self {
        Self {
            id: HistoryEntryId::new(),
            task_id: task.id(),
            actor_id,
            field_name: "title".to_owned(),
            old_value: None,
            new_value: Some(task.title().as_str().to_owned()),
            action: ActionKind::Created,
            created_at: clock.utc(),
        }
    }

    /// Creates the entry recording one tracked-field change.
    ///
    /// The action kind comes from the tracked-field table: status changes
    /// are tagged [`ActionKind::StatusChanged`], priority changes
    /// [`ActionKind::PriorityChanged`], everything else
    /// [`ActionKind::Updated`].
    #[must_use]
    pub fn field_change(
        task_id: TaskId,
        actor_id: ActorId,
        change: &FieldChange,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: HistoryEntryId::new(),
            task_id,
            actor_id,
            field_name: change.field.field_name().to_owned(),
            old_value: change.old_value.clone(),
            new_value: change.new_value.clone(),
            action: change.field.action_kind(),
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedHistoryEntryData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            actor_id: data.actor_id,
            field_name: data.field_name,
            old_value: data.old_value,
            new_value: data.new_value,
            action: data.action,
            created_at: data.created_at,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> HistoryEntryId {
        self.id
    }

    /// Returns the audited task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the acting user identifier.
    #[must_use]
    pub const fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    /// Returns the changed field's name.
    #[must_use]
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the serialized value before the change, if any.
    #[must_use]
    pub fn old_value(&self) -> Option<&str> {
        self.old_value.as_deref()
    }

    /// Returns the serialized value after the change, if any.
    #[must_use]
    pub fn new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    /// Returns the action kind.
    #[must_use]
    pub const fn action(&self) -> ActionKind {
        self.action
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//! Task aggregate root.

use super::{ActorId, CategoryId, TaskId, TaskPatch, TaskPriority, TaskStatus, TaskTitle};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
///
/// Tasks are mutable records whose tracked fields are subject to audit
/// logging. `position` orders a task within its owner's list and is an
/// internal field, never audited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: ActorId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    category_id: Option<CategoryId>,
    completed: bool,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    owner: ActorId,
    title: TaskTitle,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    category_id: Option<CategoryId>,
    position: i32,
}

impl NewTaskData {
    /// Creates task input with required fields and defaults for the rest.
    ///
    /// New tasks start as [`TaskStatus::Pending`], not completed, with
    /// [`TaskPriority::Medium`] priority and position `0`.
    #[must_use]
    pub const fn new(owner: ActorId, title: TaskTitle) -> Self {
        Self {
            owner,
            title,
            description: None,
            priority: TaskPriority::Medium,
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
        self.priority = priority;
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

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identifier.
    pub owner: ActorId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted category reference, if any.
    pub category_id: Option<CategoryId>,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted list position.
    pub position: i32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from validated input.
    #[must_use]
    pub fn create(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: TaskStatus::Pending,
            priority: data.priority,
            due_date: data.due_date,
            category_id: data.category_id,
            completed: false,
            position: data.position,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            due_date: data.due_date,
            category_id: data.category_id,
            completed: data.completed,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning actor identifier.
    #[must_use]
    pub const fn owner(&self) -> ActorId {
        self.owner
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the category reference, if any.
    #[must_use]
    pub const fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    /// Returns the completion flag.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the list position.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a patch to this task.
    ///
    /// Fields the patch does not mention keep their current value. Applying
    /// a non-empty patch refreshes `updated_at` from the clock; an empty
    /// patch leaves the task untouched. Returns `true` when any field was
    /// written.
    pub fn apply(&mut self, patch: &TaskPatch, clock: &impl Clock) -> bool {
        if patch.is_empty() {
            return false;
        }
        if let Some(title) = patch.title() {
            self.title = title.clone();
        }
        patch.description().apply_to(&mut self.description);
        if let Some(status) = patch.status() {
            self.status = status;
        }
        if let Some(priority) = patch.priority() {
            self.priority = priority;
        }
        patch.due_date().apply_to(&mut self.due_date);
        patch.category_id().apply_to(&mut self.category_id);
        if let Some(completed) = patch.completed() {
            self.completed = completed;
        }
        if let Some(position) = patch.position() {
            self.position = position;
        }
        self.updated_at = clock.utc();
        true
    }
}

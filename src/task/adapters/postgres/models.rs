//! Diesel row models for task and history persistence.

use super::schema::{actors, task_history, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for actor records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = actors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActorRow {
    /// Actor identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Insert model for actor records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = actors)]
pub struct NewActorRow {
    /// Actor identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning actor.
    pub owner_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority level.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional category reference.
    pub category_id: Option<uuid::Uuid>,
    /// Completion flag.
    pub completed: bool,
    /// List position.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning actor.
    pub owner_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority level.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional category reference.
    pub category_id: Option<uuid::Uuid>,
    /// Completion flag.
    pub completed: bool,
    /// List position.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for task records.
///
/// `treat_none_as_null` makes `None` clear nullable columns; a patch that
/// clears the due date must persist the clear, not silently skip it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Priority level.
    pub priority: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Optional category reference.
    pub category_id: Option<uuid::Uuid>,
    /// Completion flag.
    pub completed: bool,
    /// List position.
    pub position: i32,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for history entries.
///
/// The `seq` tie-breaker column participates in ordering only and is not
/// read back.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct HistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Audited task.
    pub task_id: uuid::Uuid,
    /// Acting user.
    pub actor_id: uuid::Uuid,
    /// Changed field name.
    pub field_name: String,
    /// Serialized old value.
    pub old_value: Option<String>,
    /// Serialized new value.
    pub new_value: Option<String>,
    /// Action kind.
    pub action: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for history entries.
///
/// `seq` is omitted; the database assigns it from its identity sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_history)]
pub struct NewHistoryRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Audited task.
    pub task_id: uuid::Uuid,
    /// Acting user.
    pub actor_id: uuid::Uuid,
    /// Changed field name.
    pub field_name: String,
    /// Serialized old value.
    pub old_value: Option<String>,
    /// Serialized new value.
    pub new_value: Option<String>,
    /// Action kind.
    pub action: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

//! Domain model for change-tracked task management.
//!
//! The domain models task records, patch-style mutation, the tracked-field
//! audit policy, and immutable history entries, keeping all infrastructure
//! concerns outside of the domain boundary.

mod actor;
pub mod diff;
mod error;
pub mod format;
mod history;
mod ids;
mod patch;
mod priority;
mod status;
mod task;

pub use actor::Actor;
pub use diff::{FieldChange, TRACKED_FIELDS, TrackedField, TrackedFieldSpec, extract_changes};
pub use error::{
    ParseActionKindError, ParseTaskPriorityError, ParseTaskStatusError, TaskDomainError,
};
pub use format::human_readable_change;
pub use history::{ActionKind, HistoryEntry, PersistedHistoryEntryData};
pub use ids::{ActorId, CategoryId, HistoryEntryId, TaskId, TaskTitle};
pub use patch::{PatchField, TaskPatch};
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use task::{NewTaskData, PersistedTaskData, Task};

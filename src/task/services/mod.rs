//! Application services for change-tracked task management.

mod history;
mod lifecycle;

pub use history::{
    ActorView, HistoryEntryView, HistoryQueryError, HistoryQueryResult, HistoryQueryService,
};
pub use lifecycle::{
    CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
    TaskUpdateOutcome,
};

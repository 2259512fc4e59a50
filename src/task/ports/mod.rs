//! Port contracts for change-tracked task management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod actors;
pub mod repository;

pub use actors::{ActorDirectory, ActorDirectoryError, ActorDirectoryResult};
pub use repository::{
    HistoryRepository, HistoryRepositoryError, HistoryRepositoryResult, TaskRepository,
    TaskRepositoryError, TaskRepositoryResult,
};

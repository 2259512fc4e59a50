//! `PostgreSQL` adapters for task persistence ports.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresActorDirectory, PostgresTaskStore, TaskPgPool};

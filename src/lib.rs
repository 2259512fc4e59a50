//! Tasktrail: field-level audit history for task records.
//!
//! This crate provides the change-tracking core of a task management
//! backend: applying validated mutations to task records and recording an
//! immutable, per-field audit trail attributed to the acting user.
//!
//! # Architecture
//!
//! Tasktrail follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`task`]: Task records, tracked-field diffing, and audit history

pub mod task;

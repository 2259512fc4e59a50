//! Task records and their field-level audit history.
//!
//! This module implements change-tracked task persistence: creating task
//! records, applying patch-style updates, recording one immutable history
//! entry per changed tracked field, and serving the history back as
//! human-readable view models. Interception is an explicit service call
//! wrapped in one storage transaction, never an implicit lifecycle hook,
//! and the acting user is passed into every mutating operation. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

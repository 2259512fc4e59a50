//! Directory port resolving actor identifiers to identities.

use crate::task::domain::{Actor, ActorId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for actor directory operations.
pub type ActorDirectoryResult<T> = Result<T, ActorDirectoryError>;

/// Lookup contract for actor identities.
///
/// The surrounding application owns user management; this port is the
/// narrow slice needed to attribute history views to a user.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    /// Records or refreshes an actor identity.
    async fn record(&self, actor: &Actor) -> ActorDirectoryResult<()>;

    /// Resolves an actor identifier.
    ///
    /// Returns `None` when the directory holds no identity for the id.
    async fn find(&self, id: ActorId) -> ActorDirectoryResult<Option<Actor>>;
}

/// Errors returned by actor directory implementations.
#[derive(Debug, Clone, Error)]
pub enum ActorDirectoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActorDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

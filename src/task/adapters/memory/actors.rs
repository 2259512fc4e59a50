//! In-memory actor directory for tests and embedding without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Actor, ActorId},
    ports::{ActorDirectory, ActorDirectoryError, ActorDirectoryResult},
};

/// Thread-safe in-memory actor directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActorDirectory {
    state: Arc<RwLock<HashMap<ActorId, Actor>>>,
}

impl InMemoryActorDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActorDirectory for InMemoryActorDirectory {
    async fn record(&self, actor: &Actor) -> ActorDirectoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            ActorDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.insert(actor.id(), actor.clone());
        Ok(())
    }

    async fn find(&self, id: ActorId) -> ActorDirectoryResult<Option<Actor>> {
        let state = self.state.read().map_err(|err| {
            ActorDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.get(&id).cloned())
    }
}

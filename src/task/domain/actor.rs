//! Acting user identity passed into mutating operations.

use super::ActorId;
use serde::{Deserialize, Serialize};

/// Authenticated user on whose behalf a task mutation runs.
///
/// Actor identity is supplied explicitly by the request-handling layer;
/// there is no ambient current-user state anywhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: ActorId,
    name: String,
    email: String,
}

impl Actor {
    /// Creates an actor from identity data owned by the caller.
    #[must_use]
    pub fn new(id: ActorId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

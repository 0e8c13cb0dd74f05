//! Session Store port - live dialogue sessions keyed by actor.
//!
//! Modeled as an injected abstraction rather than ambient per-handler maps
//! so the "at most one live session per actor" invariant is enforced in one
//! place and testable. Sessions are in-memory by design: a crash loses
//! in-flight sessions, never persisted listings.

use async_trait::async_trait;

use crate::domain::dialogue::DialogueSession;
use crate::domain::foundation::ActorId;

/// Errors from session store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// The actor already has a live session; it must be finished or
    /// cancelled before a new one can start.
    #[error("Actor {0} already has an active session")]
    AlreadyActive(ActorId),
}

/// Port for tracking live dialogue sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Registers a fresh session. Rejects if the actor already has one.
    async fn begin(&self, session: DialogueSession) -> Result<(), SessionStoreError>;

    /// Returns the actor's live session, if any.
    async fn get(&self, actor: ActorId) -> Option<DialogueSession>;

    /// Stores the updated session state for its actor.
    async fn put(&self, session: DialogueSession);

    /// Discards the actor's session, if any.
    async fn remove(&self, actor: ActorId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn SessionStore) {}

    #[test]
    fn already_active_names_the_actor() {
        let err = SessionStoreError::AlreadyActive(ActorId::from_i64(42));
        assert!(err.to_string().contains("42"));
    }
}

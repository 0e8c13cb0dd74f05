//! In-Memory Session Store Adapter
//!
//! The only session store this system needs: sessions are ephemeral by
//! design and die with the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::DialogueSession;
use crate::domain::foundation::ActorId;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory implementation of [`SessionStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ActorId, DialogueSession>>>,
}

impl InMemorySessionStore {
    /// Creates an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live sessions (for test assertions).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn begin(&self, session: DialogueSession) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.actor_id) {
            return Err(SessionStoreError::AlreadyActive(session.actor_id));
        }
        sessions.insert(session.actor_id, session);
        Ok(())
    }

    async fn get(&self, actor: ActorId) -> Option<DialogueSession> {
        self.sessions.read().await.get(&actor).cloned()
    }

    async fn put(&self, session: DialogueSession) {
        self.sessions.write().await.insert(session.actor_id, session);
    }

    async fn remove(&self, actor: ActorId) {
        self.sessions.write().await.remove(&actor);
    }
}

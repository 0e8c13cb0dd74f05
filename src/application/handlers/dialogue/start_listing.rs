//! StartListing command handler.
//!
//! Opens a dialogue session for an actor and allocates the draft listing it
//! will fill in. The first schema prompt is returned for rendering.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::dialogue::{DialogueSession, Reply};
use crate::domain::foundation::{ActorHandle, ActorId};
use crate::domain::schema;
use crate::ports::{AccessChecker, ListingRepository, SessionStore, StoreError};

/// Command to start a new listing intake dialogue.
#[derive(Debug, Clone)]
pub struct StartListingCommand {
    pub actor_id: ActorId,
    pub actor_handle: ActorHandle,
}

/// Errors that can occur when starting a dialogue.
#[derive(Debug, Error)]
pub enum StartListingError {
    /// The actor is not on the allow-list. The transport must stay silent.
    #[error("Actor is not allowed")]
    NotAuthorized,

    /// The actor already has a live session; it must be finished or
    /// cancelled first. The existing session is untouched.
    #[error("Actor {0} already has an active session")]
    SessionAlreadyActive(ActorId),

    /// Storage failure; fatal for this operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handler for [`StartListingCommand`].
pub struct StartListingHandler {
    listings: Arc<dyn ListingRepository>,
    sessions: Arc<dyn SessionStore>,
    access: Arc<dyn AccessChecker>,
}

impl StartListingHandler {
    /// Creates the handler over its ports.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        sessions: Arc<dyn SessionStore>,
        access: Arc<dyn AccessChecker>,
    ) -> Self {
        Self {
            listings,
            sessions,
            access,
        }
    }

    /// Opens the session and returns the first field prompt.
    pub async fn handle(&self, cmd: StartListingCommand) -> Result<Reply, StartListingError> {
        if !self.access.is_allowed(cmd.actor_id).await {
            warn!(actor = %cmd.actor_id, "dropping start request from disallowed actor");
            return Err(StartListingError::NotAuthorized);
        }

        if self.sessions.get(cmd.actor_id).await.is_some() {
            return Err(StartListingError::SessionAlreadyActive(cmd.actor_id));
        }

        let listing = self
            .listings
            .create_listing(cmd.actor_id, cmd.actor_handle.clone())
            .await?;

        let session = DialogueSession::open(cmd.actor_id, cmd.actor_handle, listing.id());
        if let Err(_already) = self.sessions.begin(session).await {
            // Lost the race for this actor; drop the just-created draft.
            let _ = self.listings.delete_listing(listing.id()).await;
            return Err(StartListingError::SessionAlreadyActive(cmd.actor_id));
        }

        info!(actor = %cmd.actor_id, listing = %listing.id(), "listing intake started");
        Ok(Reply::prompt_for(&schema::ordered()[0]))
    }
}

//! ChangeStatus command handler.
//!
//! Status changes arrive from the shared channel's controls and may come
//! from any allowed actor, not just the listing's creator. The store update
//! is the operation; the channel re-render afterwards is best-effort.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::foundation::{ActorHandle, ActorId, ListingId};
use crate::domain::listing::{Listing, ListingStatus, StatusEvent};
use crate::ports::{AccessChecker, ListingRepository, PublicationGateway, StoreError};

/// Command to assign a status to a published listing.
#[derive(Debug, Clone)]
pub struct ChangeStatusCommand {
    pub listing_id: ListingId,
    pub status: ListingStatus,
    pub actor_id: ActorId,
    pub actor_handle: ActorHandle,
}

/// Errors that can occur when changing a status.
#[derive(Debug, Error)]
pub enum ChangeStatusError {
    /// The actor is not on the allow-list. The transport must stay silent.
    #[error("Actor is not allowed")]
    NotAuthorized,

    /// Unknown or unpublished listing.
    #[error("Listing not found: {0}")]
    NotFound(ListingId),

    /// The target status is outside the workflow's reachable set.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ListingStatus,
        to: ListingStatus,
    },

    /// Storage failure; fatal for this operation.
    #[error(transparent)]
    Store(StoreError),
}

/// Result of a successful status change.
#[derive(Debug, Clone)]
pub struct ChangeStatusResult {
    /// The logged event (always a new entry, even for a re-issued status).
    pub event: StatusEvent,
    /// The listing after the change.
    pub listing: Listing,
}

/// Handler for [`ChangeStatusCommand`].
pub struct ChangeStatusHandler {
    listings: Arc<dyn ListingRepository>,
    gateway: Arc<dyn PublicationGateway>,
    access: Arc<dyn AccessChecker>,
}

impl ChangeStatusHandler {
    /// Creates the handler over its ports.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        gateway: Arc<dyn PublicationGateway>,
        access: Arc<dyn AccessChecker>,
    ) -> Self {
        Self {
            listings,
            gateway,
            access,
        }
    }

    /// Validates, records and re-renders a status change.
    pub async fn handle(
        &self,
        cmd: ChangeStatusCommand,
    ) -> Result<ChangeStatusResult, ChangeStatusError> {
        if !self.access.is_allowed(cmd.actor_id).await {
            warn!(actor = %cmd.actor_id, "dropping status change from disallowed actor");
            return Err(ChangeStatusError::NotAuthorized);
        }

        let event = self
            .listings
            .record_status_change(cmd.listing_id, cmd.status, cmd.actor_id, cmd.actor_handle)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(id) => ChangeStatusError::NotFound(id),
                StoreError::InvalidTransition { from, to } => {
                    ChangeStatusError::InvalidTransition { from, to }
                }
                other => ChangeStatusError::Store(other),
            })?;

        let listing = self
            .listings
            .get_listing(cmd.listing_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(id) => ChangeStatusError::NotFound(id),
                other => ChangeStatusError::Store(other),
            })?;

        info!(
            listing = %cmd.listing_id,
            status = %cmd.status,
            actor = %cmd.actor_id,
            "status changed"
        );

        // The store already holds the truth; a failed re-render only leaves
        // the channel stale until the next update.
        if let Some(publication) = listing.publication() {
            if let Err(e) = self.gateway.update_published(publication, &listing).await {
                warn!(listing = %cmd.listing_id, error = %e, "channel re-render failed");
            }
        }

        Ok(ChangeStatusResult { event, listing })
    }
}

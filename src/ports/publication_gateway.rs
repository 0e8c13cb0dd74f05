//! Publication Gateway port - the shared channel where listings appear.
//!
//! The gateway renders a listing for public consumption and returns an
//! opaque reference used for later in-place updates. Delivery is not
//! exactly-once; the store remains the source of truth even when a gateway
//! call fails, so re-sending a rendering must be safe.

use async_trait::async_trait;

use crate::domain::listing::{Listing, PublicationRef};

/// Errors from publication gateway calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// A transient delivery failure (network, rate limit). Reported to the
    /// actor who triggered the action; never corrupts store state.
    #[error("Transient gateway failure: {0}")]
    Transient(String),
}

/// Port for publishing listings to the shared channel.
#[async_trait]
pub trait PublicationGateway: Send + Sync {
    /// Sends the listing's fields and photos as a human-readable rendering
    /// with status-change controls; returns the reference for later edits.
    async fn publish(&self, listing: &Listing) -> Result<PublicationRef, GatewayError>;

    /// Re-renders an already-published listing in place.
    async fn update_published(
        &self,
        publication: &PublicationRef,
        listing: &Listing,
    ) -> Result<(), GatewayError>;
}

//! Listing Store port - persistence for listings and their event log.
//!
//! The store is the sole shared mutable resource. Every mutating operation
//! is atomic with respect to other mutations on the same listing, and every
//! successful mutation is durable before the call returns - that is what
//! lets the dialogue engine stay stateless beyond the current step.

use async_trait::async_trait;

use crate::domain::foundation::{ActorHandle, ActorId, ListingId, Timestamp};
use crate::domain::listing::{Listing, ListingStatus, PhotoRef, PublicationRef, StatusEvent};
use crate::domain::schema::FieldKey;

/// Errors from listing store operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Listing not found: {0}")]
    NotFound(ListingId),

    /// A wire name decoded from storage or a callback does not belong to
    /// the field schema. Unreachable through the typed API.
    #[error("Unknown field key: {0}")]
    InvalidField(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ListingStatus,
        to: ListingStatus,
    },

    #[error("Listing {0} is already published")]
    AlreadyPublished(ListingId),

    #[error("Listing {0} is published and cannot be deleted")]
    DeletePublished(ListingId),

    /// Storage unavailable or corrupt. Fatal for the in-flight operation;
    /// never retried silently.
    #[error("Storage error: {0}")]
    Io(String),
}

impl StoreError {
    /// Returns true for "already done" conditions reported to the actor
    /// rather than treated as failures.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::AlreadyPublished(_) | StoreError::DeletePublished(_)
        )
    }
}

/// Port for persisting listings, photos and status events.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Allocates the next listing id, initializes every schema field to the
    /// empty string and logs the initial `Unknown` status event attributed
    /// to the creator.
    async fn create_listing(
        &self,
        creator_id: ActorId,
        creator_handle: ActorHandle,
    ) -> Result<Listing, StoreError>;

    /// Overwrites one field value.
    async fn set_field(
        &self,
        id: ListingId,
        key: FieldKey,
        value: &str,
    ) -> Result<(), StoreError>;

    /// Appends a photo reference. Duplicates are accepted; order is
    /// preserved verbatim.
    async fn append_photo(&self, id: ListingId, photo: PhotoRef) -> Result<(), StoreError>;

    /// Fetches a consistent snapshot of one listing.
    async fn get_listing(&self, id: ListingId) -> Result<Listing, StoreError>;

    /// Validates the transition against the status workflow, then atomically
    /// updates the current status and appends a [`StatusEvent`].
    ///
    /// Unpublished listings are invisible to status changes and report
    /// [`StoreError::NotFound`]. Re-issuing the current status is accepted
    /// and still logs a new event.
    async fn record_status_change(
        &self,
        id: ListingId,
        status: ListingStatus,
        actor_id: ActorId,
        actor_handle: ActorHandle,
    ) -> Result<StatusEvent, StoreError>;

    /// Removes an unpublished draft and its status events. Published
    /// listings cannot be deleted.
    async fn delete_listing(&self, id: ListingId) -> Result<(), StoreError>;

    /// Marks the listing published and stores the channel reference.
    /// Publication is single-use per listing.
    async fn mark_published(
        &self,
        id: ListingId,
        publication: PublicationRef,
    ) -> Result<(), StoreError>;

    /// Returns the status events with `start <= occurred_at < end`, ordered
    /// by timestamp with arrival order preserved for equal stamps.
    async fn events_in_range(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<StatusEvent>, StoreError>;
}

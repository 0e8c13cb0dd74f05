//! In-Memory Listing Store Adapter
//!
//! Keeps listings and the status event log behind a single `RwLock`, so
//! mutations on any listing serialize and reads observe consistent
//! snapshots. Useful for testing and development; the SQLite adapter is the
//! durable implementation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ActorHandle, ActorId, ListingId, StateMachine, Timestamp};
use crate::domain::listing::{Listing, ListingStatus, PhotoRef, PublicationRef, StatusEvent};
use crate::domain::schema::FieldKey;
use crate::ports::{ListingRepository, StoreError};

#[derive(Debug, Default)]
struct StoreState {
    next_id: i64,
    listings: HashMap<ListingId, Listing>,
    /// Append-only; kept in arrival order.
    events: Vec<StatusEvent>,
}

/// In-memory implementation of [`ListingRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryListingStore {
    /// Creates an empty store; ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored listings (for test assertions).
    pub async fn listing_count(&self) -> usize {
        self.state.read().await.listings.len()
    }

    /// Number of logged status events (for test assertions).
    pub async fn event_count(&self) -> usize {
        self.state.read().await.events.len()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingStore {
    async fn create_listing(
        &self,
        creator_id: ActorId,
        creator_handle: ActorHandle,
    ) -> Result<Listing, StoreError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let id = ListingId::from_i64(state.next_id);
        let now = Timestamp::now();
        let listing = Listing::new(id, now, creator_id, creator_handle.clone());
        state.events.push(StatusEvent::record(
            id,
            ListingStatus::Unknown,
            creator_id,
            creator_handle,
            now,
        ));
        state.listings.insert(id, listing.clone());
        Ok(listing)
    }

    async fn set_field(
        &self,
        id: ListingId,
        key: FieldKey,
        value: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let listing = state
            .listings
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        listing.set_field(key, value);
        Ok(())
    }

    async fn append_photo(&self, id: ListingId, photo: PhotoRef) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let listing = state
            .listings
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        listing.append_photo(photo);
        Ok(())
    }

    async fn get_listing(&self, id: ListingId) -> Result<Listing, StoreError> {
        let state = self.state.read().await;
        state
            .listings
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn record_status_change(
        &self,
        id: ListingId,
        status: ListingStatus,
        actor_id: ActorId,
        actor_handle: ActorHandle,
    ) -> Result<StatusEvent, StoreError> {
        let mut state = self.state.write().await;
        let listing = state
            .listings
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        // Unpublished drafts are invisible to status changes; publication
        // marks the listing first and records `Active` after.
        if !listing.is_published() {
            return Err(StoreError::NotFound(id));
        }

        let current = listing.status();
        if !current.can_transition_to(&status) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        listing.set_status(status);
        let event = StatusEvent::record(id, status, actor_id, actor_handle, Timestamp::now());
        state.events.push(event.clone());
        Ok(event)
    }

    async fn delete_listing(&self, id: ListingId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let listing = state.listings.get(&id).ok_or(StoreError::NotFound(id))?;
        if listing.is_published() {
            return Err(StoreError::DeletePublished(id));
        }
        state.listings.remove(&id);
        state.events.retain(|e| e.listing_id != id);
        Ok(())
    }

    async fn mark_published(
        &self,
        id: ListingId,
        publication: PublicationRef,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let listing = state
            .listings
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        if listing.is_published() {
            return Err(StoreError::AlreadyPublished(id));
        }
        listing.mark_published(publication);
        Ok(())
    }

    async fn events_in_range(
        &self,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<StatusEvent>, StoreError> {
        let state = self.state.read().await;
        let mut events: Vec<StatusEvent> = state
            .events
            .iter()
            .filter(|e| start <= e.occurred_at && e.occurred_at < end)
            .cloned()
            .collect();
        // Stable sort: arrival order survives for equal timestamps.
        events.sort_by_key(|e| e.occurred_at);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> (ActorId, ActorHandle) {
        (ActorId::from_i64(10), ActorHandle::new("creator"))
    }

    async fn store_with_listing() -> (InMemoryListingStore, ListingId) {
        let store = InMemoryListingStore::new();
        let (id, handle) = creator();
        let listing = store.create_listing(id, handle).await.unwrap();
        (store, listing.id())
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let store = InMemoryListingStore::new();
        let (id, handle) = creator();
        let a = store.create_listing(id, handle.clone()).await.unwrap();
        let b = store.create_listing(id, handle).await.unwrap();
        assert!(a.id() < b.id());
    }

    #[tokio::test]
    async fn create_logs_the_initial_unknown_event() {
        let (store, _) = store_with_listing().await;
        assert_eq!(store.event_count().await, 1);
        let events = store
            .events_in_range(Timestamp::now().add_days(-1), Timestamp::now().add_days(1))
            .await
            .unwrap();
        assert_eq!(events[0].status, ListingStatus::Unknown);
    }

    #[tokio::test]
    async fn set_field_on_missing_listing_is_not_found() {
        let store = InMemoryListingStore::new();
        let err = store
            .set_field(ListingId::from_i64(99), FieldKey::City, "Kosice")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_change_on_unpublished_draft_is_not_found() {
        let (store, id) = store_with_listing().await;
        let (actor, handle) = creator();
        let err = store
            .record_status_change(id, ListingStatus::Reserved, actor, handle)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn publish_then_reserve_updates_status_and_log() {
        let (store, id) = store_with_listing().await;
        let (actor, handle) = creator();
        store
            .mark_published(id, PublicationRef::new(-100, 1))
            .await
            .unwrap();
        store
            .record_status_change(id, ListingStatus::Active, actor, handle.clone())
            .await
            .unwrap();
        store
            .record_status_change(id, ListingStatus::Reserved, actor, handle)
            .await
            .unwrap();

        let listing = store.get_listing(id).await.unwrap();
        assert_eq!(listing.status(), ListingStatus::Reserved);
        assert_eq!(store.event_count().await, 3);
    }

    #[tokio::test]
    async fn double_publish_conflicts() {
        let (store, id) = store_with_listing().await;
        store
            .mark_published(id, PublicationRef::new(-100, 1))
            .await
            .unwrap();
        let err = store
            .mark_published(id, PublicationRef::new(-100, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyPublished(_)));
    }

    #[tokio::test]
    async fn delete_unpublished_removes_listing_and_events() {
        let (store, id) = store_with_listing().await;
        store.delete_listing(id).await.unwrap();
        assert_eq!(store.listing_count().await, 0);
        assert_eq!(store.event_count().await, 0);
    }

    #[tokio::test]
    async fn delete_after_publish_conflicts() {
        let (store, id) = store_with_listing().await;
        store
            .mark_published(id, PublicationRef::new(-100, 1))
            .await
            .unwrap();
        let err = store.delete_listing(id).await.unwrap_err();
        assert!(matches!(err, StoreError::DeletePublished(_)));
    }

    #[tokio::test]
    async fn events_in_range_is_half_open() {
        let (store, _id) = store_with_listing().await;
        let events = store
            .events_in_range(Timestamp::now().add_days(-1), Timestamp::now().add_days(1))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        let at = events[0].occurred_at;
        // An event exactly at `end` is excluded.
        let excluded = store.events_in_range(at.add_days(-1), at).await.unwrap();
        assert!(excluded.is_empty());
    }
}

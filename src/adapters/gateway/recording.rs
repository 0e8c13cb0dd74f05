//! Recording gateway for tests and development.
//!
//! Renders listings like a real channel gateway would but keeps the
//! messages in memory. Supports injected transient failures so publish
//! error paths can be exercised deterministically.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::listing::{Listing, PublicationRef};
use crate::ports::{GatewayError, PublicationGateway};

use super::render::render_listing;

/// In-memory implementation of [`PublicationGateway`].
#[derive(Debug)]
pub struct RecordingGateway {
    channel_id: i64,
    next_message_id: AtomicI64,
    fail_next: AtomicBool,
    messages: Arc<RwLock<HashMap<(i64, i64), String>>>,
}

impl RecordingGateway {
    /// Creates a gateway posting into the given channel.
    pub fn new(channel_id: i64) -> Self {
        Self {
            channel_id,
            next_message_id: AtomicI64::new(0),
            fail_next: AtomicBool::new(false),
            messages: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Makes the next gateway call fail with a transient error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of messages currently in the channel (for test assertions).
    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }

    /// The rendered body behind a publication reference.
    pub async fn rendering(&self, publication: &PublicationRef) -> Option<String> {
        self.messages
            .read()
            .await
            .get(&(publication.channel_id, publication.message_id))
            .cloned()
    }

    fn take_injected_failure(&self) -> Result<(), GatewayError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            Err(GatewayError::Transient("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PublicationGateway for RecordingGateway {
    async fn publish(&self, listing: &Listing) -> Result<PublicationRef, GatewayError> {
        self.take_injected_failure()?;
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;
        let publication = PublicationRef::new(self.channel_id, message_id);
        self.messages
            .write()
            .await
            .insert((self.channel_id, message_id), render_listing(listing));
        Ok(publication)
    }

    async fn update_published(
        &self,
        publication: &PublicationRef,
        listing: &Listing,
    ) -> Result<(), GatewayError> {
        self.take_injected_failure()?;
        let mut messages = self.messages.write().await;
        match messages.get_mut(&(publication.channel_id, publication.message_id)) {
            Some(body) => {
                *body = render_listing(listing);
                Ok(())
            }
            None => Err(GatewayError::Transient(format!(
                "no message {} in channel {}",
                publication.message_id, publication.channel_id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ActorHandle, ActorId, ListingId, Timestamp};
    use crate::domain::schema::FieldKey;

    fn listing() -> Listing {
        Listing::new(
            ListingId::from_i64(1),
            Timestamp::now(),
            ActorId::from_i64(1),
            ActorHandle::new("creator"),
        )
    }

    #[tokio::test]
    async fn publish_returns_a_targetable_reference() {
        let gateway = RecordingGateway::new(-100);
        let publication = gateway.publish(&listing()).await.unwrap();
        assert_eq!(publication.channel_id, -100);
        assert!(gateway.rendering(&publication).await.is_some());
    }

    #[tokio::test]
    async fn update_rerenders_in_place() {
        let gateway = RecordingGateway::new(-100);
        let mut l = listing();
        let publication = gateway.publish(&l).await.unwrap();

        l.set_field(FieldKey::City, "Trnava");
        gateway.update_published(&publication, &l).await.unwrap();

        assert_eq!(gateway.message_count().await, 1);
        let body = gateway.rendering(&publication).await.unwrap();
        assert!(body.contains("Trnava"));
    }

    #[tokio::test]
    async fn injected_failure_hits_exactly_one_call() {
        let gateway = RecordingGateway::new(-100);
        gateway.fail_next();
        assert!(gateway.publish(&listing()).await.is_err());
        assert!(gateway.publish(&listing()).await.is_ok());
    }

    #[tokio::test]
    async fn update_of_unknown_reference_fails() {
        let gateway = RecordingGateway::new(-100);
        let err = gateway
            .update_published(&PublicationRef::new(-100, 42), &listing())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Transient(_)));
    }
}

//! Integration tests for the intake dialogue.
//!
//! Drives the full guided flow end-to-end over in-memory adapters:
//! schema walk -> custom branches -> photo collection -> review ->
//! publish / edit / cancel.

use std::sync::Arc;

use listing_desk::adapters::{
    AllowList, InMemoryListingStore, InMemorySessionStore, RecordingGateway,
};
use listing_desk::application::handlers::dialogue::{
    SignalCommand, SignalHandler, StartListingCommand, StartListingError, StartListingHandler,
};
use listing_desk::domain::dialogue::{actions, DialogueConfig, Reply, Signal};
use listing_desk::domain::foundation::{ActorHandle, ActorId, ListingId, Timestamp};
use listing_desk::domain::listing::{ListingStatus, PhotoRef};
use listing_desk::domain::schema::{self, FieldKey};
use listing_desk::ports::{ListingRepository, SessionStore};

// =============================================================================
// Test Harness
// =============================================================================

struct Harness {
    start: StartListingHandler,
    signals: SignalHandler,
    listings: Arc<InMemoryListingStore>,
    sessions: Arc<InMemorySessionStore>,
    gateway: Arc<RecordingGateway>,
}

fn harness() -> Harness {
    listing_desk::telemetry::init_tracing();
    let listings = Arc::new(InMemoryListingStore::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let gateway = Arc::new(RecordingGateway::new(-100));
    let access = Arc::new(AllowList::new([1, 2]));
    Harness {
        start: StartListingHandler::new(listings.clone(), sessions.clone(), access.clone()),
        signals: SignalHandler::new(
            listings.clone(),
            sessions.clone(),
            gateway.clone(),
            access,
            DialogueConfig::default(),
        ),
        listings,
        sessions,
        gateway,
    }
}

fn broker() -> (ActorId, ActorHandle) {
    (ActorId::from_i64(1), ActorHandle::new("broker_anna"))
}

impl Harness {
    async fn start_intake(&self) -> ListingId {
        let (actor_id, actor_handle) = broker();
        self.start
            .handle(StartListingCommand {
                actor_id,
                actor_handle,
            })
            .await
            .expect("start should succeed");
        self.sessions
            .get(actor_id)
            .await
            .expect("session should exist")
            .listing_id
    }

    async fn send(&self, signal: Signal) -> Reply {
        let (actor_id, actor_handle) = broker();
        self.signals
            .handle(SignalCommand {
                actor_id,
                actor_handle,
                signal,
            })
            .await
            .expect("signal should be handled")
    }

    /// Answers all 13 schema fields with valid values.
    async fn fill_all_fields(&self) {
        for def in schema::ordered() {
            let answer = if def.has_choices() {
                def.choices[0].to_string()
            } else {
                match def.key {
                    FieldKey::Rent => "300".to_string(),
                    FieldKey::Deposit => "300".to_string(),
                    FieldKey::Commission => "150".to_string(),
                    FieldKey::Broker => "agency_anna".to_string(),
                    _ => format!("{} value", def.key.wire_name()),
                }
            };
            self.send(Signal::Advance(answer)).await;
        }
    }

    async fn reach_review(&self, photos: usize) {
        self.fill_all_fields().await;
        for i in 0..photos {
            self.send(Signal::Photo(format!("photo-{i}"))).await;
        }
        self.send(Signal::Complete).await;
    }
}

// =============================================================================
// Full intake scenario
// =============================================================================

#[tokio::test]
async fn full_intake_publishes_with_two_events_and_ordered_photos() {
    let h = harness();
    let listing_id = h.start_intake().await;

    h.fill_all_fields().await;
    h.send(Signal::Photo("photo-a".to_string())).await;
    h.send(Signal::Photo("photo-b".to_string())).await;
    h.send(Signal::Complete).await;

    let reply = h.send(Signal::Advance(actions::PUBLISH.to_string())).await;
    let publication = match reply {
        Reply::Published {
            listing_id: id,
            publication,
        } => {
            assert_eq!(id, listing_id);
            publication
        }
        other => panic!("expected Published, got {other:?}"),
    };

    let listing = h.listings.get_listing(listing_id).await.unwrap();
    assert!(listing.is_published());
    assert_eq!(listing.status(), ListingStatus::Active);
    assert!(listing.all_fields_set());
    let refs: Vec<&str> = listing.photos().iter().map(PhotoRef::as_str).collect();
    assert_eq!(refs, vec!["photo-a", "photo-b"]);

    // Exactly two events: Unknown at creation, Active at publish.
    let events = h
        .listings
        .events_in_range(Timestamp::now().add_days(-1), Timestamp::now().add_days(1))
        .await
        .unwrap();
    let statuses: Vec<ListingStatus> = events.iter().map(|e| e.status).collect();
    assert_eq!(statuses, vec![ListingStatus::Unknown, ListingStatus::Active]);

    // The channel holds the rendering and the session is gone.
    assert!(h.gateway.rendering(&publication).await.is_some());
    assert!(h.sessions.get(broker().0).await.is_none());
}

// =============================================================================
// Schema walk details
// =============================================================================

#[tokio::test]
async fn every_field_is_populated_in_schema_order() {
    let h = harness();
    let listing_id = h.start_intake().await;
    h.fill_all_fields().await;

    let listing = h.listings.get_listing(listing_id).await.unwrap();
    for def in schema::ordered() {
        assert!(
            !listing.field(def.key).is_empty(),
            "{} left unset",
            def.key
        );
    }
}

#[tokio::test]
async fn custom_choice_then_text_advances_exactly_one_step() {
    let h = harness();
    let listing_id = h.start_intake().await;

    // Custom escape on Category keeps the step index.
    let reply = h.send(Signal::Advance("__custom__".to_string())).await;
    assert!(matches!(
        reply,
        Reply::PromptCustomValue {
            key: FieldKey::Category,
            ..
        }
    ));

    // Free text lands in Category and moves to PropertyKind only.
    let reply = h.send(Signal::CustomText("Short-term".to_string())).await;
    match reply {
        Reply::PromptField { key, .. } => assert_eq!(key, FieldKey::PropertyKind),
        other => panic!("expected PropertyKind prompt, got {other:?}"),
    }
    let listing = h.listings.get_listing(listing_id).await.unwrap();
    assert_eq!(listing.field(FieldKey::Category), "Short-term");
    assert_eq!(listing.field(FieldKey::PropertyKind), "");
}

#[tokio::test]
async fn invalid_amount_reprompts_without_losing_progress() {
    let h = harness();
    let listing_id = h.start_intake().await;

    // Walk to the Rent step.
    for def in schema::ordered() {
        if def.key == FieldKey::Rent {
            break;
        }
        let answer = if def.has_choices() {
            def.choices[0].to_string()
        } else {
            "value".to_string()
        };
        h.send(Signal::Advance(answer)).await;
    }

    let reply = h.send(Signal::Advance("cheap".to_string())).await;
    assert!(matches!(
        reply,
        Reply::RejectedInput {
            key: FieldKey::Rent,
            ..
        }
    ));

    // Earlier answers survived, and a valid retry advances.
    let listing = h.listings.get_listing(listing_id).await.unwrap();
    assert_eq!(listing.field(FieldKey::Street), "value");
    let reply = h.send(Signal::Advance("450".to_string())).await;
    match reply {
        Reply::PromptField { key, .. } => assert_eq!(key, FieldKey::Deposit),
        other => panic!("expected Deposit prompt, got {other:?}"),
    }
}

// =============================================================================
// Photo phase
// =============================================================================

#[tokio::test]
async fn photos_report_a_running_count_and_gate_completion() {
    let h = harness();
    h.start_intake().await;
    h.fill_all_fields().await;

    // Completion with zero photos is refused.
    let reply = h.send(Signal::Complete).await;
    assert!(matches!(reply, Reply::PhotosRequired));

    let reply = h.send(Signal::Photo("p1".to_string())).await;
    assert!(matches!(reply, Reply::PhotoAccepted { count: 1 }));
    let reply = h.send(Signal::Photo("p2".to_string())).await;
    assert!(matches!(reply, Reply::PhotoAccepted { count: 2 }));

    let reply = h.send(Signal::Complete).await;
    assert!(matches!(reply, Reply::Review { .. }));
}

#[tokio::test]
async fn typing_a_completion_keyword_finishes_the_photo_phase() {
    let h = harness();
    h.start_intake().await;
    h.fill_all_fields().await;
    h.send(Signal::Photo("p1".to_string())).await;

    let reply = h.send(Signal::Advance("Done".to_string())).await;
    assert!(matches!(reply, Reply::Review { .. }));
}

// =============================================================================
// Review: edit and cancel
// =============================================================================

#[tokio::test]
async fn editing_rent_updates_one_field_and_returns_to_review() {
    let h = harness();
    let listing_id = h.start_intake().await;
    h.reach_review(1).await;

    let before = h.listings.get_listing(listing_id).await.unwrap();
    assert_eq!(before.field(FieldKey::Rent), "300");

    h.send(Signal::Advance(actions::EDIT.to_string())).await;
    let reply = h.send(Signal::Advance("rent".to_string())).await;
    assert!(matches!(
        reply,
        Reply::PromptField {
            key: FieldKey::Rent,
            ..
        }
    ));

    let reply = h.send(Signal::Advance("350".to_string())).await;
    match reply {
        Reply::Review { listing } => assert_eq!(listing.field(FieldKey::Rent), "350"),
        other => panic!("expected Review, got {other:?}"),
    }

    // Only the edited field changed, and the session is back in review,
    // not at the first step.
    let after = h.listings.get_listing(listing_id).await.unwrap();
    for def in schema::ordered() {
        if def.key != FieldKey::Rent {
            assert_eq!(after.field(def.key), before.field(def.key));
        }
    }
    let reply = h.send(Signal::Advance("noise".to_string())).await;
    assert!(matches!(reply, Reply::Review { .. }));
}

#[tokio::test]
async fn editing_a_choice_field_supports_the_custom_escape() {
    let h = harness();
    let listing_id = h.start_intake().await;
    h.reach_review(1).await;

    h.send(Signal::Advance(actions::EDIT.to_string())).await;
    h.send(Signal::Advance("property_kind".to_string())).await;
    h.send(Signal::Advance("__custom__".to_string())).await;
    let reply = h.send(Signal::CustomText("Houseboat".to_string())).await;
    assert!(matches!(reply, Reply::Review { .. }));

    let listing = h.listings.get_listing(listing_id).await.unwrap();
    assert_eq!(listing.field(FieldKey::PropertyKind), "Houseboat");
}

#[tokio::test]
async fn cancel_deletes_the_draft_and_frees_the_actor() {
    let h = harness();
    let listing_id = h.start_intake().await;
    h.fill_all_fields().await;
    h.send(Signal::Photo("p1".to_string())).await;

    let reply = h.send(Signal::Cancel).await;
    assert!(matches!(
        reply,
        Reply::Cancelled {
            draft_deleted: true,
            ..
        }
    ));

    assert!(h.listings.get_listing(listing_id).await.is_err());
    assert_eq!(h.listings.event_count().await, 0);

    // The actor can start over immediately.
    h.start_intake().await;
}

// =============================================================================
// Session exclusivity
// =============================================================================

#[tokio::test]
async fn a_second_intake_is_rejected_while_one_is_live() {
    let h = harness();
    h.start_intake().await;

    let (actor_id, actor_handle) = broker();
    let err = h
        .start
        .handle(StartListingCommand {
            actor_id,
            actor_handle,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StartListingError::SessionAlreadyActive(_)));

    // The live session is untouched and still at the first step.
    let session = h.sessions.get(actor_id).await.unwrap();
    assert_eq!(
        session.phase,
        listing_desk::domain::dialogue::DialoguePhase::Step(0)
    );
}

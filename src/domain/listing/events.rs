//! Append-only status event log entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActorHandle, ActorId, EventId, ListingId, Timestamp};

use super::ListingStatus;

/// One immutable log entry recording a status assignment.
///
/// Events are never mutated or deleted (except together with an unpublished
/// draft). Re-issuing an unchanged status still produces a new event: the
/// log measures how many times a status was assigned, not net changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub event_id: EventId,
    pub listing_id: ListingId,
    pub occurred_at: Timestamp,
    pub actor_id: ActorId,
    pub actor_handle: ActorHandle,
    /// The status in effect after this assignment.
    pub status: ListingStatus,
}

impl StatusEvent {
    /// Records a status assignment at the given moment.
    pub fn record(
        listing_id: ListingId,
        status: ListingStatus,
        actor_id: ActorId,
        actor_handle: ActorHandle,
        occurred_at: Timestamp,
    ) -> Self {
        Self {
            event_id: EventId::new(),
            listing_id,
            occurred_at,
            actor_id,
            actor_handle,
            status,
        }
    }
}

//! Ephemeral per-actor dialogue session state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActorHandle, ActorId, ListingId};

use super::DialoguePhase;

/// Progress of one actor through the intake dialogue.
///
/// Keyed by actor identity; at most one live session per actor. Never
/// persisted beyond process lifetime - a crash loses in-flight sessions,
/// which is accepted since every answered field is already flushed to the
/// listing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueSession {
    pub actor_id: ActorId,
    pub actor_handle: ActorHandle,
    /// The draft listing this session is filling in.
    pub listing_id: ListingId,
    pub phase: DialoguePhase,
    /// Running count of photos collected this session, reported back to the
    /// actor after each upload.
    pub photos_collected: usize,
}

impl DialogueSession {
    /// Opens a session at the first schema step.
    pub fn open(actor_id: ActorId, actor_handle: ActorHandle, listing_id: ListingId) -> Self {
        Self {
            actor_id,
            actor_handle,
            listing_id,
            phase: DialoguePhase::start(),
            photos_collected: 0,
        }
    }

    /// Moves the session to another phase.
    pub fn advance_to(&mut self, phase: DialoguePhase) {
        self.phase = phase;
    }

    /// Marks the session terminal.
    pub fn close(&mut self) {
        self.phase = DialoguePhase::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DialogueSession {
        DialogueSession::open(
            ActorId::from_i64(1),
            ActorHandle::new("broker_anna"),
            ListingId::from_i64(9),
        )
    }

    #[test]
    fn open_starts_at_step_zero_with_no_photos() {
        let s = session();
        assert_eq!(s.phase, DialoguePhase::Step(0));
        assert_eq!(s.photos_collected, 0);
    }

    #[test]
    fn close_is_terminal() {
        let mut s = session();
        s.close();
        assert!(s.phase.is_closed());
    }
}

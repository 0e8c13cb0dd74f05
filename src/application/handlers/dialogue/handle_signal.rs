//! HandleSignal command handler - one turn of the intake dialogue.
//!
//! Receives one transport-mapped [`Signal`] for the actor's live session,
//! performs the store writes the current phase calls for, advances the
//! phase and returns the next [`Reply`] to render.
//!
//! Validation failures and wrong-signal-for-phase inputs are replies, not
//! errors: the session never advances past an unanswered question and never
//! drops the actor's progress. A vanished backing listing collapses the
//! session and reports the loss.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::dialogue::{actions, DialogueConfig, DialoguePhase, DialogueSession, Reply, Signal};
use crate::domain::foundation::{ActorHandle, ActorId};
use crate::domain::listing::ListingStatus;
use crate::domain::schema::{self, FieldDefinition, FieldKey};
use crate::ports::{
    AccessChecker, GatewayError, ListingRepository, PublicationGateway, SessionStore, StoreError,
};

const CHOOSE_OPTION: &str = "Choose one of the offered options.";

/// One actor input for the dialogue engine.
#[derive(Debug, Clone)]
pub struct SignalCommand {
    pub actor_id: ActorId,
    pub actor_handle: ActorHandle,
    pub signal: Signal,
}

/// Errors that can occur while handling a signal.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The actor is not on the allow-list. The transport must stay silent.
    #[error("Actor is not allowed")]
    NotAuthorized,

    /// No live session for this actor; nothing to advance.
    #[error("Actor {0} has no active session")]
    NoActiveSession(ActorId),

    /// Storage failure; fatal for this operation, surfaced unretried.
    #[error(transparent)]
    Store(StoreError),
}

/// Outcome of a store call that may reveal the listing is gone.
enum StoreOutcome<T> {
    Ok(T),
    Lost,
}

/// Handler for [`SignalCommand`].
pub struct SignalHandler {
    listings: Arc<dyn ListingRepository>,
    sessions: Arc<dyn SessionStore>,
    gateway: Arc<dyn PublicationGateway>,
    access: Arc<dyn AccessChecker>,
    config: DialogueConfig,
}

impl SignalHandler {
    /// Creates the handler over its ports.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        sessions: Arc<dyn SessionStore>,
        gateway: Arc<dyn PublicationGateway>,
        access: Arc<dyn AccessChecker>,
        config: DialogueConfig,
    ) -> Self {
        Self {
            listings,
            sessions,
            gateway,
            access,
            config,
        }
    }

    /// Processes one signal for the actor's live session.
    pub async fn handle(&self, cmd: SignalCommand) -> Result<Reply, SignalError> {
        if !self.access.is_allowed(cmd.actor_id).await {
            warn!(actor = %cmd.actor_id, "dropping signal from disallowed actor");
            return Err(SignalError::NotAuthorized);
        }

        let session = self
            .sessions
            .get(cmd.actor_id)
            .await
            .ok_or(SignalError::NoActiveSession(cmd.actor_id))?;

        debug!(actor = %cmd.actor_id, phase = ?session.phase, signal = ?cmd.signal, "dialogue turn");

        if matches!(cmd.signal, Signal::Cancel) {
            return self.cancel(session).await;
        }

        match session.phase {
            DialoguePhase::Step(index) => self.answer_step(session, index, cmd.signal).await,
            DialoguePhase::AwaitingCustom(index) => {
                self.custom_value(session, index, cmd.signal).await
            }
            DialoguePhase::Photos => self.photos(session, cmd.signal).await,
            DialoguePhase::Review => self.review(session, cmd.signal).await,
            DialoguePhase::SelectingField => self.select_field(session, cmd.signal).await,
            DialoguePhase::EditingField(key) => self.edit_field(session, key, cmd.signal).await,
            DialoguePhase::EditingCustom(key) => self.edit_custom(session, key, cmd.signal).await,
            // Closed sessions are removed from the store, so this only
            // happens if a stale clone leaked; treat it as no session.
            DialoguePhase::Closed => Err(SignalError::NoActiveSession(cmd.actor_id)),
        }
    }

    // === Phase: Step(i) ===

    async fn answer_step(
        &self,
        session: DialogueSession,
        index: usize,
        signal: Signal,
    ) -> Result<Reply, SignalError> {
        let def = &schema::ordered()[index];
        match signal {
            Signal::Advance(value) => {
                if def.has_choices() {
                    if def.allows_custom && self.config.is_custom_sentinel(&value) {
                        return self
                            .move_to(session, DialoguePhase::AwaitingCustom(index), || {
                                Reply::prompt_custom(def)
                            })
                            .await;
                    }
                    if def.is_choice(&value) {
                        return self.write_and_advance(session, index, &value).await;
                    }
                    Ok(Reply::RejectedInput {
                        key: def.key,
                        message: CHOOSE_OPTION.to_string(),
                    })
                } else {
                    self.validated_write(session, index, def, &value).await
                }
            }
            Signal::CustomText(value) => {
                if def.has_choices() {
                    Ok(Reply::RejectedInput {
                        key: def.key,
                        message: CHOOSE_OPTION.to_string(),
                    })
                } else {
                    self.validated_write(session, index, def, &value).await
                }
            }
            // Photos and completion belong to a later phase; ask again.
            Signal::Photo(_) | Signal::Complete => Ok(Reply::prompt_for(def)),
            Signal::Cancel => unreachable!("cancel handled before phase dispatch"),
        }
    }

    async fn validated_write(
        &self,
        session: DialogueSession,
        index: usize,
        def: &FieldDefinition,
        value: &str,
    ) -> Result<Reply, SignalError> {
        match def.validate(value) {
            Ok(()) => self.write_and_advance(session, index, value).await,
            Err(message) => Ok(Reply::RejectedInput {
                key: def.key,
                message: message.to_string(),
            }),
        }
    }

    /// Writes the answer for step `index` and advances exactly one logical
    /// step (the next field, or the photo phase after the last field).
    async fn write_and_advance(
        &self,
        mut session: DialogueSession,
        index: usize,
        value: &str,
    ) -> Result<Reply, SignalError> {
        let def = &schema::ordered()[index];
        match self.set_field(&session, def.key, value).await? {
            StoreOutcome::Ok(()) => {}
            StoreOutcome::Lost => return self.lose(session).await,
        }

        let next = DialoguePhase::after_step(index);
        session.advance_to(next);
        self.sessions.put(session).await;
        match next {
            DialoguePhase::Step(next_index) => {
                Ok(Reply::prompt_for(&schema::ordered()[next_index]))
            }
            DialoguePhase::Photos => Ok(Reply::PromptPhotos { count: 0 }),
            _ => unreachable!("after_step yields Step or Photos"),
        }
    }

    // === Phase: AwaitingCustom(i) ===

    async fn custom_value(
        &self,
        session: DialogueSession,
        index: usize,
        signal: Signal,
    ) -> Result<Reply, SignalError> {
        let def = &schema::ordered()[index];
        match signal {
            Signal::CustomText(value) | Signal::Advance(value) => {
                self.validated_write(session, index, def, &value).await
            }
            Signal::Photo(_) | Signal::Complete => Ok(Reply::prompt_custom(def)),
            Signal::Cancel => unreachable!("cancel handled before phase dispatch"),
        }
    }

    // === Phase: Photos ===

    async fn photos(&self, session: DialogueSession, signal: Signal) -> Result<Reply, SignalError> {
        match signal {
            Signal::Photo(reference) => self.collect_photo(session, reference).await,
            Signal::Complete => self.finish_photos(session).await,
            Signal::Advance(text) if self.config.is_completion_keyword(&text) => {
                self.finish_photos(session).await
            }
            Signal::Advance(_) | Signal::CustomText(_) => Ok(Reply::PromptPhotos {
                count: session.photos_collected,
            }),
            Signal::Cancel => unreachable!("cancel handled before phase dispatch"),
        }
    }

    async fn collect_photo(
        &self,
        mut session: DialogueSession,
        reference: String,
    ) -> Result<Reply, SignalError> {
        let append = self
            .listings
            .append_photo(session.listing_id, crate::domain::listing::PhotoRef::new(reference))
            .await;
        match append {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => return self.lose(session).await,
            Err(e) => return Err(SignalError::Store(e)),
        }
        session.photos_collected += 1;
        let count = session.photos_collected;
        self.sessions.put(session).await;
        Ok(Reply::PhotoAccepted { count })
    }

    /// Completion requires at least one collected photo: publication without
    /// visual material is refused, the phase does not change.
    async fn finish_photos(&self, mut session: DialogueSession) -> Result<Reply, SignalError> {
        let listing = match self.get_listing(&session).await? {
            StoreOutcome::Ok(listing) => listing,
            StoreOutcome::Lost => return self.lose(session).await,
        };
        if listing.photo_count() == 0 {
            return Ok(Reply::PhotosRequired);
        }
        session.advance_to(DialoguePhase::Review);
        self.sessions.put(session).await;
        Ok(Reply::Review { listing })
    }

    // === Phase: Review ===

    async fn review(&self, session: DialogueSession, signal: Signal) -> Result<Reply, SignalError> {
        match signal {
            Signal::Advance(action) if action == actions::PUBLISH => self.publish(session).await,
            Signal::Advance(action) if action == actions::EDIT => {
                self.move_to(session, DialoguePhase::SelectingField, Reply::select_field)
                    .await
            }
            // Anything else re-renders the review so the actor can decide.
            _ => {
                let listing = match self.get_listing(&session).await? {
                    StoreOutcome::Ok(listing) => listing,
                    StoreOutcome::Lost => return self.lose(session).await,
                };
                Ok(Reply::Review { listing })
            }
        }
    }

    /// Publication order matters: the gateway renders first, then the store
    /// is marked published and the `Active` event recorded. A gateway
    /// failure therefore leaves the draft fully intact for a retry, while a
    /// store failure after a successful send can at worst duplicate the
    /// channel message (delivery is not exactly-once).
    async fn publish(&self, session: DialogueSession) -> Result<Reply, SignalError> {
        let listing = match self.get_listing(&session).await? {
            StoreOutcome::Ok(listing) => listing,
            StoreOutcome::Lost => return self.lose(session).await,
        };

        let publication = match self.gateway.publish(&listing).await {
            Ok(publication) => publication,
            Err(GatewayError::Transient(reason)) => {
                warn!(listing = %listing.id(), %reason, "publish rejected by gateway");
                return Ok(Reply::PublicationFailed {
                    listing_id: listing.id(),
                    reason,
                });
            }
        };

        match self.listings.mark_published(listing.id(), publication).await {
            Ok(()) => {}
            Err(StoreError::AlreadyPublished(id)) => {
                self.sessions.remove(session.actor_id).await;
                return Ok(Reply::AlreadyPublished { listing_id: id });
            }
            Err(StoreError::NotFound(_)) => return self.lose(session).await,
            Err(e) => return Err(SignalError::Store(e)),
        }

        self.listings
            .record_status_change(
                listing.id(),
                ListingStatus::Active,
                session.actor_id,
                session.actor_handle.clone(),
            )
            .await
            .map_err(SignalError::Store)?;

        info!(listing = %listing.id(), actor = %session.actor_id, "listing published");
        self.sessions.remove(session.actor_id).await;
        Ok(Reply::Published {
            listing_id: listing.id(),
            publication,
        })
    }

    // === Phase: SelectingField ===

    async fn select_field(
        &self,
        session: DialogueSession,
        signal: Signal,
    ) -> Result<Reply, SignalError> {
        match signal {
            Signal::Advance(value) => match value.parse::<FieldKey>() {
                Ok(key) => {
                    self.move_to(session, DialoguePhase::EditingField(key), || {
                        Reply::prompt_for(schema::by_key(key))
                    })
                    .await
                }
                Err(_) => Ok(Reply::select_field()),
            },
            _ => Ok(Reply::select_field()),
        }
    }

    // === Phase: EditingField(key) ===

    async fn edit_field(
        &self,
        session: DialogueSession,
        key: FieldKey,
        signal: Signal,
    ) -> Result<Reply, SignalError> {
        let def = schema::by_key(key);
        match signal {
            Signal::Advance(value) => {
                if def.has_choices() {
                    if def.allows_custom && self.config.is_custom_sentinel(&value) {
                        return self
                            .move_to(session, DialoguePhase::EditingCustom(key), || {
                                Reply::prompt_custom(def)
                            })
                            .await;
                    }
                    if def.is_choice(&value) {
                        return self.write_and_review(session, key, &value).await;
                    }
                    Ok(Reply::RejectedInput {
                        key,
                        message: CHOOSE_OPTION.to_string(),
                    })
                } else {
                    self.validated_edit(session, key, def, &value).await
                }
            }
            Signal::CustomText(value) => {
                if def.has_choices() {
                    Ok(Reply::RejectedInput {
                        key,
                        message: CHOOSE_OPTION.to_string(),
                    })
                } else {
                    self.validated_edit(session, key, def, &value).await
                }
            }
            Signal::Photo(_) | Signal::Complete => Ok(Reply::prompt_for(def)),
            Signal::Cancel => unreachable!("cancel handled before phase dispatch"),
        }
    }

    // === Phase: EditingCustom(key) ===

    async fn edit_custom(
        &self,
        session: DialogueSession,
        key: FieldKey,
        signal: Signal,
    ) -> Result<Reply, SignalError> {
        let def = schema::by_key(key);
        match signal {
            Signal::CustomText(value) | Signal::Advance(value) => {
                self.validated_edit(session, key, def, &value).await
            }
            Signal::Photo(_) | Signal::Complete => Ok(Reply::prompt_custom(def)),
            Signal::Cancel => unreachable!("cancel handled before phase dispatch"),
        }
    }

    async fn validated_edit(
        &self,
        session: DialogueSession,
        key: FieldKey,
        def: &FieldDefinition,
        value: &str,
    ) -> Result<Reply, SignalError> {
        match def.validate(value) {
            Ok(()) => self.write_and_review(session, key, value).await,
            Err(message) => Ok(Reply::RejectedInput {
                key,
                message: message.to_string(),
            }),
        }
    }

    /// Exactly one edit input is accepted, then the session returns to
    /// review with the refreshed listing so the actor sees the effect.
    async fn write_and_review(
        &self,
        mut session: DialogueSession,
        key: FieldKey,
        value: &str,
    ) -> Result<Reply, SignalError> {
        match self.set_field(&session, key, value).await? {
            StoreOutcome::Ok(()) => {}
            StoreOutcome::Lost => return self.lose(session).await,
        }
        let listing = match self.get_listing(&session).await? {
            StoreOutcome::Ok(listing) => listing,
            StoreOutcome::Lost => return self.lose(session).await,
        };
        session.advance_to(DialoguePhase::Review);
        self.sessions.put(session).await;
        Ok(Reply::Review { listing })
    }

    // === Cancel, loss and small helpers ===

    async fn cancel(&self, mut session: DialogueSession) -> Result<Reply, SignalError> {
        let draft_deleted = match self.listings.delete_listing(session.listing_id).await {
            Ok(()) => true,
            // Already published or already gone: nothing left to delete.
            Err(StoreError::DeletePublished(_)) | Err(StoreError::NotFound(_)) => false,
            Err(e) => return Err(SignalError::Store(e)),
        };
        session.close();
        self.sessions.remove(session.actor_id).await;
        info!(actor = %session.actor_id, listing = %session.listing_id, draft_deleted, "session cancelled");
        Ok(Reply::Cancelled {
            listing_id: session.listing_id,
            draft_deleted,
        })
    }

    /// The backing listing vanished out-of-band; terminal for the session.
    async fn lose(&self, mut session: DialogueSession) -> Result<Reply, SignalError> {
        warn!(actor = %session.actor_id, listing = %session.listing_id, "backing listing lost, closing session");
        session.close();
        self.sessions.remove(session.actor_id).await;
        Ok(Reply::SessionLost)
    }

    async fn move_to(
        &self,
        mut session: DialogueSession,
        phase: DialoguePhase,
        reply: impl FnOnce() -> Reply,
    ) -> Result<Reply, SignalError> {
        session.advance_to(phase);
        self.sessions.put(session).await;
        Ok(reply())
    }

    async fn set_field(
        &self,
        session: &DialogueSession,
        key: FieldKey,
        value: &str,
    ) -> Result<StoreOutcome<()>, SignalError> {
        match self.listings.set_field(session.listing_id, key, value).await {
            Ok(()) => Ok(StoreOutcome::Ok(())),
            Err(StoreError::NotFound(_)) => Ok(StoreOutcome::Lost),
            Err(e) => Err(SignalError::Store(e)),
        }
    }

    async fn get_listing(
        &self,
        session: &DialogueSession,
    ) -> Result<StoreOutcome<crate::domain::listing::Listing>, SignalError> {
        match self.listings.get_listing(session.listing_id).await {
            Ok(listing) => Ok(StoreOutcome::Ok(listing)),
            Err(StoreError::NotFound(_)) => Ok(StoreOutcome::Lost),
            Err(e) => Err(SignalError::Store(e)),
        }
    }
}

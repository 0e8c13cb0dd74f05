//! Replies the engine hands back to the transport for rendering.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ListingId;
use crate::domain::listing::{Listing, PublicationRef};
use crate::domain::schema::{FieldDefinition, FieldKey};

/// What the transport should present to the actor next.
///
/// The engine never formats chat messages; it states intent and the
/// transport owns wording, buttons and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    /// Ask the current schema field's question.
    PromptField {
        key: FieldKey,
        label: String,
        choices: Vec<String>,
        allows_custom: bool,
    },
    /// Ask for the free-text custom value of a choice field.
    PromptCustomValue { key: FieldKey, label: String },
    /// The input failed validation; same question again with the reason.
    RejectedInput { key: FieldKey, message: String },
    /// A photo was stored; report the running count.
    PhotoAccepted { count: usize },
    /// Remind the actor the engine is waiting for photos or completion.
    PromptPhotos { count: usize },
    /// Completion refused: publication requires at least one photo.
    PhotosRequired,
    /// Show the accumulated listing with publish/edit/cancel actions.
    Review { listing: Listing },
    /// Ask which field to edit; display order follows the schema.
    SelectField { fields: Vec<FieldKey> },
    /// The listing went out to the shared channel.
    Published {
        listing_id: ListingId,
        publication: PublicationRef,
    },
    /// The gateway rejected the publish attempt; the draft is intact and the
    /// actor may retry from review.
    PublicationFailed { listing_id: ListingId, reason: String },
    /// The listing was already published ("already done", not a crash).
    AlreadyPublished { listing_id: ListingId },
    /// The session ended on the actor's cancel.
    Cancelled {
        listing_id: ListingId,
        draft_deleted: bool,
    },
    /// The backing listing disappeared; the session was discarded.
    SessionLost,
}

impl Reply {
    /// Builds the prompt for a schema field.
    pub fn prompt_for(def: &FieldDefinition) -> Self {
        Reply::PromptField {
            key: def.key,
            label: def.label.to_string(),
            choices: def.choices.iter().map(|c| c.to_string()).collect(),
            allows_custom: def.allows_custom,
        }
    }

    /// Builds the custom-value prompt for a choice field.
    pub fn prompt_custom(def: &FieldDefinition) -> Self {
        Reply::PromptCustomValue {
            key: def.key,
            label: def.label.to_string(),
        }
    }

    /// Builds the edit menu over the full schema.
    pub fn select_field() -> Self {
        Reply::SelectField {
            fields: FieldKey::all().to_vec(),
        }
    }
}

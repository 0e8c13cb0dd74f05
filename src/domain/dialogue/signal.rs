//! The closed set of inputs the dialogue engine understands.
//!
//! The transport is responsible for mapping its native events (button
//! callbacks, text messages, photo uploads) into this set before handing
//! control to the engine, keeping the engine free of transport-specific
//! string matching.

use serde::{Deserialize, Serialize};

/// One actor input, already stripped of transport detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Signal {
    /// A discrete selection or plain text answering the current prompt:
    /// a preset choice, a free-text field answer, a review action or an
    /// edit-menu field pick.
    Advance(String),
    /// Free text supplied after the "custom value" escape was chosen.
    CustomText(String),
    /// One collected photo reference.
    Photo(String),
    /// The explicit photo-collection completion signal (dedicated button).
    Complete,
    /// Abort the session.
    Cancel,
}

/// Review-phase action carried in [`Signal::Advance`].
pub mod actions {
    pub const PUBLISH: &str = "publish";
    pub const EDIT: &str = "edit";
}

//! Dialogue phases - where a session currently waits.

use serde::{Deserialize, Serialize};

use crate::domain::schema::{self, FieldKey};

/// Current position of a dialogue session.
///
/// The intake walks `Step(0) .. Step(N-1)` in schema order, collects photos,
/// then offers review. `AwaitingCustom` is the nested free-text wait entered
/// when the "custom value" escape is picked; it stays on the same logical
/// step. `SelectingField`, `EditingField` and `EditingCustom` form the
/// single-field edit sub-flow reachable only from `Review`. `Closed` is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "at", rename_all = "snake_case")]
pub enum DialoguePhase {
    Step(usize),
    AwaitingCustom(usize),
    Photos,
    Review,
    SelectingField,
    EditingField(FieldKey),
    EditingCustom(FieldKey),
    Closed,
}

impl DialoguePhase {
    /// The first phase of a fresh session.
    pub fn start() -> Self {
        DialoguePhase::Step(0)
    }

    /// Returns the phase after a successful answer to step `index`.
    pub fn after_step(index: usize) -> Self {
        if index + 1 < schema::ordered().len() {
            DialoguePhase::Step(index + 1)
        } else {
            DialoguePhase::Photos
        }
    }

    /// Returns true once the session can be discarded.
    pub fn is_closed(&self) -> bool {
        matches!(self, DialoguePhase::Closed)
    }
}

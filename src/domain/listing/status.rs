//! ListingStatus enum and its lifecycle state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of a listing.
///
/// `Unknown` is the pre-publication state assigned at creation. Publication
/// moves a listing to `Active` exactly once; afterwards any of the four
/// public states may follow any other, in any direction, including
/// re-issuing the current state (which still logs an event). There is no way
/// back to `Unknown`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Unknown,
    Active,
    Reserved,
    Removed,
    Closed,
}

impl ListingStatus {
    /// Returns all statuses, used to zero-fill statistics buckets.
    pub fn all() -> &'static [ListingStatus] {
        &[
            ListingStatus::Unknown,
            ListingStatus::Active,
            ListingStatus::Reserved,
            ListingStatus::Removed,
            ListingStatus::Closed,
        ]
    }

    /// Returns true for the states a published listing can carry.
    pub fn is_public(&self) -> bool {
        !matches!(self, ListingStatus::Unknown)
    }

    /// Returns the stable wire name persisted in the store.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ListingStatus::Unknown => "unknown",
            ListingStatus::Active => "active",
            ListingStatus::Reserved => "reserved",
            ListingStatus::Removed => "removed",
            ListingStatus::Closed => "closed",
        }
    }
}

impl StateMachine for ListingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ListingStatus::*;
        match (self, target) {
            (_, Unknown) => false,
            (Unknown, Active) => true,
            (Unknown, _) => false,
            // Any public state may follow any public state, itself included.
            (_, _) => true,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ListingStatus::*;
        match self {
            Unknown => vec![Active],
            _ => vec![Active, Reserved, Removed, Closed],
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListingStatus::Unknown => "Unknown",
            ListingStatus::Active => "Active",
            ListingStatus::Reserved => "Reserved",
            ListingStatus::Removed => "Removed",
            ListingStatus::Closed => "Closed",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ListingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|st| st.wire_name() == s)
            .copied()
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Error returned when a wire name does not map to any status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing status: {0}")]
pub struct UnknownStatus(pub String);

//! FieldKey enum representing the 13 intake fields in dialogue order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The intake fields, in the order the dialogue walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Category,
    PropertyKind,
    Street,
    City,
    District,
    Advantages,
    Rent,
    Deposit,
    Commission,
    Parking,
    MoveInFrom,
    ViewingsFrom,
    Broker,
}

impl FieldKey {
    /// Returns all field keys in canonical dialogue order.
    pub fn all() -> &'static [FieldKey] {
        &[
            FieldKey::Category,
            FieldKey::PropertyKind,
            FieldKey::Street,
            FieldKey::City,
            FieldKey::District,
            FieldKey::Advantages,
            FieldKey::Rent,
            FieldKey::Deposit,
            FieldKey::Commission,
            FieldKey::Parking,
            FieldKey::MoveInFrom,
            FieldKey::ViewingsFrom,
            FieldKey::Broker,
        ]
    }

    /// Returns the 0-based position of this field in the canonical order.
    ///
    /// Display numbering for edit menus is derived from this, never
    /// maintained by hand.
    pub fn order_index(&self) -> usize {
        Self::all()
            .iter()
            .position(|k| k == self)
            .expect("FieldKey must be in all() array")
    }

    /// Returns the next field in dialogue order, if any.
    pub fn next(&self) -> Option<FieldKey> {
        Self::all().get(self.order_index() + 1).copied()
    }

    /// Returns the stable wire name used in persistence and callbacks.
    pub fn wire_name(&self) -> &'static str {
        match self {
            FieldKey::Category => "category",
            FieldKey::PropertyKind => "property_kind",
            FieldKey::Street => "street",
            FieldKey::City => "city",
            FieldKey::District => "district",
            FieldKey::Advantages => "advantages",
            FieldKey::Rent => "rent",
            FieldKey::Deposit => "deposit",
            FieldKey::Commission => "commission",
            FieldKey::Parking => "parking",
            FieldKey::MoveInFrom => "move_in_from",
            FieldKey::ViewingsFrom => "viewings_from",
            FieldKey::Broker => "broker",
        }
    }

    /// Returns the display name shown in prompts and edit menus.
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldKey::Category => "Category",
            FieldKey::PropertyKind => "Property kind",
            FieldKey::Street => "Street",
            FieldKey::City => "City",
            FieldKey::District => "District",
            FieldKey::Advantages => "Advantages",
            FieldKey::Rent => "Rent",
            FieldKey::Deposit => "Deposit",
            FieldKey::Commission => "Commission",
            FieldKey::Parking => "Parking",
            FieldKey::MoveInFrom => "Move-in from",
            FieldKey::ViewingsFrom => "Viewings from",
            FieldKey::Broker => "Broker",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for FieldKey {
    type Err = UnknownFieldKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|k| k.wire_name() == s)
            .copied()
            .ok_or_else(|| UnknownFieldKey(s.to_string()))
    }
}

/// Error returned when a wire name does not map to any schema field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field key: {0}")]
pub struct UnknownFieldKey(pub String);

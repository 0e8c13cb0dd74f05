//! Field Schema - the static ordered intake form.
//!
//! Pure data consumed by the dialogue engine, the listing store and the
//! gateway rendering. No side effects; the closed [`FieldKey`] enum makes
//! "key not found" unrepresentable for typed callers.

mod definition;
mod field_key;

pub use definition::{by_key, ordered, FieldDefinition, FieldValidator};
pub use field_key::{FieldKey, UnknownFieldKey};

//! The Listing record and its publication reference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::{ActorHandle, ActorId, ListingId, Timestamp};
use crate::domain::schema::FieldKey;

use super::ListingStatus;

/// Opaque photo reference assigned by the transport platform.
///
/// Order of collection is preserved verbatim; duplicates are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(String);

impl PhotoRef {
    /// Wraps a platform-assigned reference string.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the published rendering in the shared channel, set exactly
/// once at publish time and used to target later in-place updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRef {
    pub channel_id: i64,
    pub message_id: i64,
}

impl PublicationRef {
    /// Creates a reference from channel and message identifiers.
    pub fn new(channel_id: i64, message_id: i64) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

/// A single real-estate offer record.
///
/// Invariants maintained by the listing store:
/// - `fields` always contains every schema key (empty string = unset);
/// - `publication` is set if and only if `is_published` is true;
/// - `status` changes only through the status workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    id: ListingId,
    created_at: Timestamp,
    creator_id: ActorId,
    creator_handle: ActorHandle,
    fields: BTreeMap<FieldKey, String>,
    photos: Vec<PhotoRef>,
    status: ListingStatus,
    is_published: bool,
    publication: Option<PublicationRef>,
}

impl Listing {
    /// Creates a fresh draft with every field unset and status `Unknown`.
    pub fn new(
        id: ListingId,
        created_at: Timestamp,
        creator_id: ActorId,
        creator_handle: ActorHandle,
    ) -> Self {
        let fields = FieldKey::all()
            .iter()
            .map(|k| (*k, String::new()))
            .collect();
        Self {
            id,
            created_at,
            creator_id,
            creator_handle,
            fields,
            photos: Vec::new(),
            status: ListingStatus::Unknown,
            is_published: false,
            publication: None,
        }
    }

    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn creator_id(&self) -> ActorId {
        self.creator_id
    }

    pub fn creator_handle(&self) -> &ActorHandle {
        &self.creator_handle
    }

    /// Returns the stored value for a field; empty string means unset.
    pub fn field(&self, key: FieldKey) -> &str {
        self.fields
            .get(&key)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Overwrites one field value.
    pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) {
        self.fields.insert(key, value.into());
    }

    /// Returns true once every schema field holds a non-empty value.
    pub fn all_fields_set(&self) -> bool {
        FieldKey::all().iter().all(|k| !self.field(*k).is_empty())
    }

    /// The broker handle shown publicly; falls back to the creator's handle
    /// when the broker field was left pointing at the creator.
    pub fn broker_handle(&self) -> &str {
        let broker = self.field(FieldKey::Broker);
        if broker.is_empty() {
            self.creator_handle.as_str()
        } else {
            broker
        }
    }

    pub fn photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }

    /// Appends a photo reference, preserving insertion order.
    pub fn append_photo(&mut self, photo: PhotoRef) {
        self.photos.push(photo);
    }

    pub fn status(&self) -> ListingStatus {
        self.status
    }

    /// Sets the current status. Callers must have validated the transition
    /// through the status workflow first.
    pub(crate) fn set_status(&mut self, status: ListingStatus) {
        self.status = status;
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn publication(&self) -> Option<&PublicationRef> {
        self.publication.as_ref()
    }

    /// Marks the listing published, recording the channel reference.
    pub(crate) fn mark_published(&mut self, publication: PublicationRef) {
        self.is_published = true;
        self.publication = Some(publication);
    }

    /// Restores a record from persisted parts. Used by store adapters only.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ListingId,
        created_at: Timestamp,
        creator_id: ActorId,
        creator_handle: ActorHandle,
        fields: BTreeMap<FieldKey, String>,
        photos: Vec<PhotoRef>,
        status: ListingStatus,
        publication: Option<PublicationRef>,
    ) -> Self {
        let mut full_fields: BTreeMap<FieldKey, String> = FieldKey::all()
            .iter()
            .map(|k| (*k, String::new()))
            .collect();
        full_fields.extend(fields);
        Self {
            id,
            created_at,
            creator_id,
            creator_handle,
            fields: full_fields,
            photos,
            status,
            is_published: publication.is_some(),
            publication,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Listing {
        Listing::new(
            ListingId::from_i64(1),
            Timestamp::now(),
            ActorId::from_i64(10),
            ActorHandle::new("creator"),
        )
    }

    #[test]
    fn new_listing_has_every_field_key_empty() {
        let listing = draft();
        for key in FieldKey::all() {
            assert_eq!(listing.field(*key), "");
        }
        assert!(!listing.all_fields_set());
    }

    #[test]
    fn new_listing_starts_unknown_and_unpublished() {
        let listing = draft();
        assert_eq!(listing.status(), ListingStatus::Unknown);
        assert!(!listing.is_published());
        assert!(listing.publication().is_none());
    }

    #[test]
    fn set_field_overwrites_value() {
        let mut listing = draft();
        listing.set_field(FieldKey::Rent, "300");
        listing.set_field(FieldKey::Rent, "350");
        assert_eq!(listing.field(FieldKey::Rent), "350");
    }

    #[test]
    fn photos_keep_insertion_order_and_duplicates() {
        let mut listing = draft();
        listing.append_photo(PhotoRef::new("a"));
        listing.append_photo(PhotoRef::new("b"));
        listing.append_photo(PhotoRef::new("a"));
        let refs: Vec<&str> = listing.photos().iter().map(PhotoRef::as_str).collect();
        assert_eq!(refs, vec!["a", "b", "a"]);
    }

    #[test]
    fn broker_handle_falls_back_to_creator() {
        let mut listing = draft();
        assert_eq!(listing.broker_handle(), "creator");
        listing.set_field(FieldKey::Broker, "agency_bob");
        assert_eq!(listing.broker_handle(), "agency_bob");
    }

    #[test]
    fn mark_published_sets_flag_and_reference_together() {
        let mut listing = draft();
        listing.mark_published(PublicationRef::new(-100, 555));
        assert!(listing.is_published());
        assert_eq!(listing.publication(), Some(&PublicationRef::new(-100, 555)));
    }

    #[test]
    fn from_parts_backfills_missing_field_keys() {
        let mut fields = BTreeMap::new();
        fields.insert(FieldKey::City, "Bratislava".to_string());
        let listing = Listing::from_parts(
            ListingId::from_i64(5),
            Timestamp::now(),
            ActorId::from_i64(1),
            ActorHandle::new("x"),
            fields,
            vec![],
            ListingStatus::Unknown,
            None,
        );
        assert_eq!(listing.field(FieldKey::City), "Bratislava");
        assert_eq!(listing.field(FieldKey::Street), "");
    }
}

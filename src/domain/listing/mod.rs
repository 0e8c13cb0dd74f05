//! Listing records, status workflow and the status event log.

mod events;
mod record;
mod status;

pub use events::StatusEvent;
pub use record::{Listing, PhotoRef, PublicationRef};
pub use status::{ListingStatus, UnknownStatus};

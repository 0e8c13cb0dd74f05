//! SQLite persistence adapter.

mod listing_store;

pub use listing_store::SqliteListingStore;

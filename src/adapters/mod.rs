//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory stores (tests, development, sessions)
//! - `sqlite` - Durable listing store on SQLite
//! - `gateway` - Channel gateway adapters and rendering
//! - `allowlist` - Config-fed access checker

mod allowlist;
pub mod gateway;
pub mod memory;
pub mod sqlite;

pub use allowlist::AllowList;
pub use gateway::RecordingGateway;
pub use memory::{InMemoryListingStore, InMemorySessionStore};
pub use sqlite::SqliteListingStore;

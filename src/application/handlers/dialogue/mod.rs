//! Dialogue command handlers.

mod handle_signal;
mod start_listing;

pub use handle_signal::{SignalCommand, SignalError, SignalHandler};
pub use start_listing::{StartListingCommand, StartListingError, StartListingHandler};

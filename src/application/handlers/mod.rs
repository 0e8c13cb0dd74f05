//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod dialogue;
pub mod stats;
pub mod status;

pub use dialogue::{
    SignalCommand, SignalError, SignalHandler, StartListingCommand, StartListingError,
    StartListingHandler,
};
pub use stats::{AggregateStatsHandler, AggregateStatsQuery, StatsError};
pub use status::{ChangeStatusCommand, ChangeStatusError, ChangeStatusHandler, ChangeStatusResult};

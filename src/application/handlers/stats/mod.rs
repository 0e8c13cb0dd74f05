//! Statistics query handlers.

mod aggregate_stats;

pub use aggregate_stats::{AggregateStatsHandler, AggregateStatsQuery, StatsError};

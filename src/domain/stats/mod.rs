//! Statistics Aggregator - windowed counts over the status event log.
//!
//! A pure read: the aggregator tallies a snapshot of status events into
//! day / month / year buckets, overall and per actor. No side effects.

mod report;
mod window;

pub use report::{StatsReport, StatusCounts, WindowStats};
pub use window::Window;

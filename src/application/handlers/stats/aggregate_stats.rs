//! AggregateStats query handler.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::foundation::Timestamp;
use crate::domain::stats::{StatsReport, Window};
use crate::ports::{ListingRepository, StoreError};

/// Query for the rolling day / month / year statistics anchored at `now`.
#[derive(Debug, Clone, Copy)]
pub struct AggregateStatsQuery {
    pub now: Timestamp,
}

/// Errors that can occur while aggregating.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Handler for [`AggregateStatsQuery`].
pub struct AggregateStatsHandler {
    listings: Arc<dyn ListingRepository>,
}

impl AggregateStatsHandler {
    /// Creates the handler over the listing store.
    pub fn new(listings: Arc<dyn ListingRepository>) -> Self {
        Self { listings }
    }

    /// Computes the report from one consistent event snapshot.
    ///
    /// The day and month windows are sub-ranges of the year window, so a
    /// single range read gives all three buckets the same snapshot even
    /// while writers keep appending.
    pub async fn handle(&self, query: AggregateStatsQuery) -> Result<StatsReport, StatsError> {
        let year = Window::year_containing(query.now);
        let events = self.listings.events_in_range(year.start, year.end).await?;
        Ok(StatsReport::over(query.now, &events))
    }
}

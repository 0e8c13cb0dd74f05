//! Half-open time windows for bucketing status events.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// A half-open interval `[start, end)`, anchored at a reference moment.
///
/// Exclusive at the end so an event falling exactly on a boundary is counted
/// in exactly one window. All windows use UTC, the single fixed zone the
/// event log is stamped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Window {
    /// The calendar day containing `now`: midnight to next midnight.
    pub fn day_containing(now: Timestamp) -> Self {
        let date = now.as_datetime().date_naive();
        let next = date + Days::new(1);
        Self::from_dates(date, next)
    }

    /// The calendar month containing `now`: first of month to first of next.
    pub fn month_containing(now: Timestamp) -> Self {
        let date = now.as_datetime().date_naive();
        let first = date.with_day(1).unwrap();
        let next = first + Months::new(1);
        Self::from_dates(first, next)
    }

    /// The calendar year containing `now`: Jan 1 to next Jan 1.
    pub fn year_containing(now: Timestamp) -> Self {
        let year = now.as_datetime().year();
        let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let next = NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap();
        Self::from_dates(first, next)
    }

    fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Timestamp::from_datetime(start.and_hms_opt(0, 0, 0).unwrap().and_utc()),
            end: Timestamp::from_datetime(end.and_hms_opt(0, 0, 0).unwrap().and_utc()),
        }
    }

    /// Returns true if the timestamp falls inside `[start, end)`.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at < self.end
    }
}

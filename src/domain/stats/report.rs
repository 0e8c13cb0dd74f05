//! Windowed aggregation of the status event log.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ActorHandle, Timestamp};
use crate::domain::listing::{ListingStatus, StatusEvent};

use super::Window;

/// Counts per status, zero-filled so consumers never branch on missing keys.
pub type StatusCounts = BTreeMap<ListingStatus, u64>;

fn zeroed_counts() -> StatusCounts {
    ListingStatus::all().iter().map(|s| (*s, 0)).collect()
}

// Actors without a usable handle are grouped under one bucket.
fn actor_key(handle: &ActorHandle) -> String {
    if handle.is_empty() {
        "(no handle)".to_string()
    } else {
        handle.as_str().to_string()
    }
}

/// Event counts for one window: overall by status, then per actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowStats {
    pub window: Window,
    pub totals_by_status: StatusCounts,
    pub by_actor: BTreeMap<String, StatusCounts>,
}

impl WindowStats {
    /// Counts the events falling inside the window.
    ///
    /// Pure: the caller supplies an event snapshot, so the tally is safe to
    /// run while writers append.
    pub fn tally(window: Window, events: &[StatusEvent]) -> Self {
        let mut totals = zeroed_counts();
        let mut by_actor: BTreeMap<String, StatusCounts> = BTreeMap::new();

        for event in events {
            if !window.contains(event.occurred_at) {
                continue;
            }
            *totals.entry(event.status).or_insert(0) += 1;
            let actor = by_actor
                .entry(actor_key(&event.actor_handle))
                .or_insert_with(zeroed_counts);
            *actor.entry(event.status).or_insert(0) += 1;
        }

        Self {
            window,
            totals_by_status: totals,
            by_actor,
        }
    }

    /// Total events counted in this window.
    pub fn total(&self) -> u64 {
        self.totals_by_status.values().sum()
    }
}

/// Aggregation result over the three rolling windows anchored at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub generated_at: Timestamp,
    pub day: WindowStats,
    pub month: WindowStats,
    pub year: WindowStats,
}

impl StatsReport {
    /// Builds the report from one consistent event snapshot.
    ///
    /// The snapshot must cover at least the year window; the day and month
    /// windows are sub-ranges of it, so a single read suffices.
    pub fn over(now: Timestamp, events: &[StatusEvent]) -> Self {
        Self {
            generated_at: now,
            day: WindowStats::tally(Window::day_containing(now), events),
            month: WindowStats::tally(Window::month_containing(now), events),
            year: WindowStats::tally(Window::year_containing(now), events),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ActorId, ListingId};
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, mo: u32, d: u32, h: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap())
    }

    fn event(status: ListingStatus, handle: &str, at: Timestamp) -> StatusEvent {
        StatusEvent::record(
            ListingId::from_i64(1),
            status,
            ActorId::from_i64(1),
            ActorHandle::new(handle),
            at,
        )
    }

    #[test]
    fn every_status_appears_with_zero_default() {
        let stats = WindowStats::tally(Window::day_containing(ts(2024, 5, 1, 12)), &[]);
        assert_eq!(stats.totals_by_status.len(), ListingStatus::all().len());
        assert!(stats.totals_by_status.values().all(|c| *c == 0));
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn events_outside_the_window_are_ignored() {
        let now = ts(2024, 5, 10, 12);
        let events = vec![
            event(ListingStatus::Active, "anna", ts(2024, 5, 10, 9)),
            event(ListingStatus::Active, "anna", ts(2024, 5, 9, 9)),
        ];
        let stats = WindowStats::tally(Window::day_containing(now), &events);
        assert_eq!(stats.totals_by_status[&ListingStatus::Active], 1);
    }

    #[test]
    fn event_exactly_at_window_end_is_excluded() {
        let now = ts(2024, 5, 10, 12);
        let events = vec![event(ListingStatus::Closed, "anna", ts(2024, 5, 11, 0))];
        let stats = WindowStats::tally(Window::day_containing(now), &events);
        assert_eq!(stats.totals_by_status[&ListingStatus::Closed], 0);
    }

    #[test]
    fn per_actor_maps_are_zero_filled_too() {
        let now = ts(2024, 5, 10, 12);
        let events = vec![event(ListingStatus::Reserved, "anna", now)];
        let stats = WindowStats::tally(Window::day_containing(now), &events);
        let anna = &stats.by_actor["anna"];
        assert_eq!(anna[&ListingStatus::Reserved], 1);
        assert_eq!(anna[&ListingStatus::Closed], 0);
        assert_eq!(anna.len(), ListingStatus::all().len());
    }

    #[test]
    fn missing_handles_group_under_one_bucket() {
        let now = ts(2024, 5, 10, 12);
        let events = vec![
            event(ListingStatus::Active, "", now),
            event(ListingStatus::Removed, "  ", now),
        ];
        let stats = WindowStats::tally(Window::day_containing(now), &events);
        let bucket = &stats.by_actor["(no handle)"];
        assert_eq!(bucket[&ListingStatus::Active], 1);
        assert_eq!(bucket[&ListingStatus::Removed], 1);
    }

    #[test]
    fn repeated_assignments_count_every_press() {
        let now = ts(2024, 5, 10, 12);
        let events = vec![
            event(ListingStatus::Reserved, "anna", now),
            event(ListingStatus::Reserved, "anna", now),
            event(ListingStatus::Reserved, "anna", now),
        ];
        let stats = WindowStats::tally(Window::day_containing(now), &events);
        assert_eq!(stats.totals_by_status[&ListingStatus::Reserved], 3);
    }

    #[test]
    fn report_buckets_by_window_breadth() {
        let now = ts(2024, 5, 10, 12);
        let events = vec![
            event(ListingStatus::Active, "anna", ts(2024, 5, 10, 9)), // today
            event(ListingStatus::Active, "anna", ts(2024, 5, 2, 9)),  // this month
            event(ListingStatus::Active, "anna", ts(2024, 2, 2, 9)),  // this year
        ];
        let report = StatsReport::over(now, &events);
        assert_eq!(report.day.totals_by_status[&ListingStatus::Active], 1);
        assert_eq!(report.month.totals_by_status[&ListingStatus::Active], 2);
        assert_eq!(report.year.totals_by_status[&ListingStatus::Active], 3);
    }
}

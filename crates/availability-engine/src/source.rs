//! Seams to the outside world: where events come from and what time it is.
//!
//! The engine never reads the wall clock or talks to a calendar service on its
//! own. Callers hand it an [`EventSource`] and a [`Clock`], and
//! [`free_busy_times`] runs the fetch → normalize → grid pipeline once.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::debug;

use crate::error::Result;
use crate::event::{normalize, RawEvent};
use crate::grid::{build_grid, AvailabilityGrid};
use crate::window::{local_datetime, SearchWindow};

/// Supplies the events of a calendar for a time range.
///
/// Returned events may extend past either end of the range and may be all-day
/// or timed.
pub trait EventSource {
    fn fetch_events(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<RawEvent>>;
}

/// An in-memory event list, e.g. loaded from an exported JSON file.
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<RawEvent>,
}

impl StaticEventSource {
    pub fn new(events: Vec<RawEvent>) -> Self {
        Self { events }
    }
}

impl EventSource for StaticEventSource {
    /// Returns the events overlapping `[start, end)`. Date-only endpoints are
    /// placed at midnight in the offset of `start`.
    fn fetch_events(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<RawEvent>> {
        let offset = *start.offset();
        Ok(self
            .events
            .iter()
            .filter(|event| event.start.resolve(offset) < end && start < event.end.resolve(offset))
            .cloned()
            .collect())
    }
}

/// Supplies the evaluation time used to drop past slots.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// The local date of [`now`](Self::now).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// The system clock, reported in a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    pub offset: FixedOffset,
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Fetch the window's events from `source` and classify its slots.
///
/// Events are requested from local midnight of `start_date` to local midnight
/// after the window's last day.
///
/// # Errors
/// Returns `AvailabilityError::InvalidWindow` before touching `source` if the
/// window is invalid, propagates any error from `source`, and otherwise fails
/// as [`build_grid`] does.
pub fn free_busy_times<S, C>(source: &S, clock: &C, window: &SearchWindow) -> Result<AvailabilityGrid>
where
    S: EventSource + ?Sized,
    C: Clock + ?Sized,
{
    window.validate()?;

    let range_start = local_datetime(window.start_date, 0, window.utc_offset);
    let range_end = local_datetime(window.last_day(), 24, window.utc_offset);
    let events = source.fetch_events(range_start, range_end)?;
    debug!(events = events.len(), %range_start, %range_end, "fetched calendar events");

    let intervals = normalize(&events, window.utc_offset);
    build_grid(&intervals, window, clock.now())
}

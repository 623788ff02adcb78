//! Raw calendar events and their reduction to busy intervals.
//!
//! Events arrive in the shape a calendar `events.list` item uses: each endpoint
//! carries either a `date` (all-day) or a `dateTime`. Only events whose start
//! *and* end are date-only are treated as all-day and dropped; everything else
//! becomes a half-open `[start, end)` busy interval.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AvailabilityError, Result};
use crate::window::local_datetime;

/// One endpoint of a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    /// A timed endpoint, e.g. `{"dateTime": "2024-01-01T10:00:00+09:00"}`.
    Timed {
        #[serde(rename = "dateTime")]
        date_time: DateTime<FixedOffset>,
    },
    /// A date-only endpoint, e.g. `{"date": "2024-01-01"}`.
    AllDay { date: NaiveDate },
}

impl EventTime {
    pub fn is_date_only(&self) -> bool {
        matches!(self, EventTime::AllDay { .. })
    }

    /// Resolve this endpoint to a timestamp.
    ///
    /// A date-only endpoint resolves to local midnight of that date in `offset`.
    pub fn resolve(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        match self {
            EventTime::Timed { date_time } => *date_time,
            EventTime::AllDay { date } => local_datetime(*date, 0, offset),
        }
    }
}

/// A calendar event as delivered by an event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl RawEvent {
    /// An event is all-day iff both endpoints are date-only.
    pub fn is_all_day(&self) -> bool {
        self.start.is_date_only() && self.end.is_date_only()
    }

    /// Parse a JSON document holding events.
    ///
    /// Accepts either a bare array of events or an object with an `items`
    /// array (a raw `events.list` response).
    pub fn parse_list(json: &str) -> Result<Vec<RawEvent>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Document {
            List(Vec<RawEvent>),
            Response { items: Vec<RawEvent> },
        }

        let document: Document = serde_json::from_str(json)?;
        Ok(match document {
            Document::List(events) => events,
            Document::Response { items } => items,
        })
    }
}

/// A half-open `[start, end)` period during which the subject is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl BusyInterval {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test. Touching endpoints do not overlap.
    pub fn overlaps(&self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> bool {
        start < self.end && self.start < end
    }

    /// # Errors
    /// Returns `AvailabilityError::InvalidInterval` unless `start < end`.
    pub fn validate(&self) -> Result<()> {
        if self.start < self.end {
            Ok(())
        } else {
            Err(AvailabilityError::InvalidInterval {
                start: self.start,
                end: self.end,
            })
        }
    }
}

/// Reduce raw events to busy intervals, dropping all-day events.
///
/// Events with a single date-only endpoint are kept; that endpoint resolves to
/// local midnight in `offset`. Output order follows input order.
pub fn normalize(events: &[RawEvent], offset: FixedOffset) -> Vec<BusyInterval> {
    let intervals: Vec<BusyInterval> = events
        .iter()
        .filter(|event| !event.is_all_day())
        .map(|event| BusyInterval::new(event.start.resolve(offset), event.end.resolve(offset)))
        .collect();

    debug!(
        received = events.len(),
        kept = intervals.len(),
        "normalized calendar events"
    );

    intervals
}

/// Render a one-line description of an event, with times shown in `offset`.
///
/// - all-day: `- [2024/01/01 終日] Holiday`
/// - same day: `- [2024/01/01 10:00-11:00] Standup`
/// - spanning days: `- [2024/01/01 22:00-2024/01/02 1:00] Release`
pub fn describe_event(event: &RawEvent, offset: FixedOffset) -> String {
    let description = if event.is_all_day() {
        format!("{} 終日", event.start.resolve(offset).format("%Y/%m/%d"))
    } else {
        let start = event.start.resolve(offset).with_timezone(&offset);
        let end = event.end.resolve(offset).with_timezone(&offset);
        if start.date_naive() == end.date_naive() {
            format!("{}-{}", start.format("%Y/%m/%d %-H:%M"), end.format("%-H:%M"))
        } else {
            format!(
                "{}-{}",
                start.format("%Y/%m/%d %-H:%M"),
                end.format("%Y/%m/%d %-H:%M")
            )
        }
    };

    match event.summary.as_deref() {
        Some(summary) if !summary.is_empty() => format!("- [{}] {}", description, summary),
        _ => format!("- [{}]", description),
    }
}

//! Per-day, per-slot free/busy classification.
//!
//! Every day of the search window gets an entry, in chronological order. Each
//! day holds its non-past hourly slots, in chronological order, each marked
//! free unless it overlaps at least one busy interval.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::{json, Map, Value};
use tracing::{debug, trace};

use crate::error::Result;
use crate::event::BusyInterval;
use crate::window::SearchWindow;

/// Classification of one hourly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub free: bool,
}

impl SlotStatus {
    /// The slot's key at minute precision, e.g. `2024-01-01 09:00`.
    pub fn key(&self) -> String {
        self.start.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// The slots of a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub slots: Vec<SlotStatus>,
}

impl DayAvailability {
    /// The day's key, e.g. `2024-01-01`.
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Chronologically ordered day → slot → free/busy mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AvailabilityGrid {
    pub days: Vec<DayAvailability>,
}

impl AvailabilityGrid {
    pub fn day(&self, date: NaiveDate) -> Option<&DayAvailability> {
        self.days.iter().find(|day| day.date == date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Nested JSON keyed by day then slot start, preserving chronological order:
    ///
    /// ```json
    /// {"2024-01-01": {"2024-01-01 09:00": {"free": true}}}
    /// ```
    pub fn to_json(&self) -> Value {
        let days: Map<String, Value> = self
            .days
            .iter()
            .map(|day| {
                let slots: Map<String, Value> = day
                    .slots
                    .iter()
                    .map(|slot| (slot.key(), json!({ "free": slot.free })))
                    .collect();
                (day.key(), Value::Object(slots))
            })
            .collect();
        Value::Object(days)
    }
}

/// Classify every non-past slot of `window` against `intervals`.
///
/// Slots starting before `now` are omitted, but their day still appears (with
/// an empty slot list if every slot is past). A slot is busy iff
/// `slot.start < interval.end && interval.start < slot.end` for some interval.
///
/// # Errors
/// Returns `AvailabilityError::InvalidWindow` if the window fails validation,
/// or `AvailabilityError::InvalidInterval` for the first interval with
/// `start >= end`. Nothing is computed in either case.
pub fn build_grid(
    intervals: &[BusyInterval],
    window: &SearchWindow,
    now: DateTime<FixedOffset>,
) -> Result<AvailabilityGrid> {
    window.validate()?;
    for interval in intervals {
        interval.validate()?;
    }

    debug!(
        start = %window.start_date,
        last = %window.last_day(),
        intervals = intervals.len(),
        "building availability grid"
    );

    let days = window
        .days()
        .map(|date| {
            let slots = window
                .slots(date)
                .filter(|slot| slot.start >= now)
                .map(|slot| {
                    let busy = intervals
                        .iter()
                        .any(|interval| interval.overlaps(slot.start, slot.end));
                    if busy {
                        trace!(slot = %slot.start, "slot overlaps a busy interval");
                    }
                    SlotStatus {
                        start: slot.start,
                        end: slot.end,
                        free: !busy,
                    }
                })
                .collect();
            DayAvailability { date, slots }
        })
        .collect();

    Ok(AvailabilityGrid { days })
}

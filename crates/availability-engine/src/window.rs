//! Search window configuration and hourly slot boundaries.

use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

pub const DEFAULT_START_HOUR: u32 = 9;
pub const DEFAULT_END_HOUR: u32 = 19;
pub const DEFAULT_MAX_DAYS: u32 = 100;
/// Days after today that the default window ends on.
pub const DEFAULT_LOOKAHEAD_DAYS: u64 = 30;

/// Slots are built in UTC+09:00 unless the window says otherwise.
pub const DEFAULT_UTC_OFFSET: FixedOffset = match FixedOffset::east_opt(9 * 3600) {
    Some(offset) => offset,
    None => panic!("UTC+09:00 is out of range"),
};

/// The date range, daily hour range and day-count cap bounding a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// First hour of the day a slot may start at.
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// Closing boundary of the last slot; never itself a slot start.
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    #[serde(default = "default_utc_offset", with = "offset_format")]
    pub utc_offset: FixedOffset,
}

/// One hourly candidate slot, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl SearchWindow {
    /// A window over `start_date..=end_date` with default hours, cap and offset.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            max_days: DEFAULT_MAX_DAYS,
            utc_offset: DEFAULT_UTC_OFFSET,
        }
    }

    /// The default window relative to `today`: tomorrow through today + 30 days.
    pub fn from_today(today: NaiveDate) -> Self {
        let start_date = today.checked_add_days(Days::new(1)).unwrap_or(today);
        let end_date = today
            .checked_add_days(Days::new(DEFAULT_LOOKAHEAD_DAYS))
            .unwrap_or(start_date);
        Self::new(start_date, end_date)
    }

    /// # Errors
    /// Returns `AvailabilityError::InvalidWindow` when the hour range is empty,
    /// inverted or past 24, when `max_days` is zero, or when `end_date` precedes
    /// `start_date`.
    pub fn validate(&self) -> Result<()> {
        if self.start_hour >= self.end_hour {
            return Err(AvailabilityError::InvalidWindow(format!(
                "start_hour {} must be before end_hour {}",
                self.start_hour, self.end_hour
            )));
        }
        if self.end_hour > 24 {
            return Err(AvailabilityError::InvalidWindow(format!(
                "end_hour {} is past the end of the day",
                self.end_hour
            )));
        }
        if self.max_days == 0 {
            return Err(AvailabilityError::InvalidWindow(
                "max_days must be at least 1".to_string(),
            ));
        }
        if self.end_date < self.start_date {
            return Err(AvailabilityError::InvalidWindow(format!(
                "end_date {} is before start_date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }

    /// `min(end_date, start_date + max_days - 1)`.
    pub fn last_day(&self) -> NaiveDate {
        let span = u64::from(self.max_days.saturating_sub(1));
        self.start_date
            .checked_add_days(Days::new(span))
            .map_or(self.end_date, |capped| capped.min(self.end_date))
    }

    /// Every day from `start_date` through [`last_day`](Self::last_day), in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day();
        self.start_date.iter_days().take_while(move |day| *day <= last)
    }

    /// The hourly slots of `day`: `(start_hour, start_hour + 1)` through
    /// `(end_hour - 1, end_hour)`.
    pub fn slots(&self, day: NaiveDate) -> impl Iterator<Item = Slot> {
        let offset = self.utc_offset;
        (self.start_hour..self.end_hour).map(move |hour| Slot {
            start: local_datetime(day, hour, offset),
            end: local_datetime(day, hour + 1, offset),
        })
    }
}

/// `day` at `hour:00` local time in `offset`. `hour` may be 24 (next midnight).
pub(crate) fn local_datetime(day: NaiveDate, hour: u32, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour));
    let utc = local - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(utc, offset)
}

fn default_start_hour() -> u32 {
    DEFAULT_START_HOUR
}

fn default_end_hour() -> u32 {
    DEFAULT_END_HOUR
}

fn default_max_days() -> u32 {
    DEFAULT_MAX_DAYS
}

fn default_utc_offset() -> FixedOffset {
    DEFAULT_UTC_OFFSET
}

/// Serialize a `FixedOffset` as `"+09:00"`.
mod offset_format {
    use chrono::FixedOffset;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(offset: &FixedOffset, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(offset)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FixedOffset, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::custom(format!("invalid UTC offset '{}'", raw)))
    }
}

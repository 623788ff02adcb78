//! Render an availability grid as one text line per day.
//!
//! ```text
//! 2024/01/01(月) 9:00-10:00, 13:00-15:00
//! 2024/01/02(火)
//! ```

use chrono::{DateTime, Datelike, FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

use crate::grid::{AvailabilityGrid, DayAvailability};

/// Weekday labels used after the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayStyle {
    /// `日 月 火 水 木 金 土`
    #[default]
    Japanese,
    /// `Sun Mon Tue Wed Thu Fri Sat`
    English,
}

impl WeekdayStyle {
    pub fn label(self, weekday: Weekday) -> &'static str {
        const JAPANESE: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];
        const ENGLISH: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let index = weekday.num_days_from_sunday() as usize;
        match self {
            WeekdayStyle::Japanese => JAPANESE[index],
            WeekdayStyle::English => ENGLISH[index],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Report free spans when true, busy spans when false.
    #[serde(default = "default_want_free")]
    pub want_free: bool,
    #[serde(default)]
    pub weekdays: WeekdayStyle,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            want_free: true,
            weekdays: WeekdayStyle::default(),
        }
    }
}

fn default_want_free() -> bool {
    true
}

/// Render `grid` with Japanese weekday labels, reporting free spans when
/// `want_free` is true and busy spans otherwise.
pub fn format_report(grid: &AvailabilityGrid, want_free: bool) -> String {
    format_report_with(
        grid,
        &ReportOptions {
            want_free,
            ..ReportOptions::default()
        },
    )
}

/// Render `grid`, one line per day in chronological order.
///
/// Spans use slot start times for both ends. A run closed by a slot of the
/// other status ends at that slot's start; a run still open at the end of the
/// day ends at the start of its own last slot, so a single-slot trailing run
/// is not printed at all.
pub fn format_report_with(grid: &AvailabilityGrid, options: &ReportOptions) -> String {
    grid.days
        .iter()
        .map(|day| format_day(day, options))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_day(day: &DayAvailability, options: &ReportOptions) -> String {
    let mut spans = Vec::new();
    let mut open: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> = None;

    for slot in &day.slots {
        let first = open.map_or(slot.start, |(first, _)| first);
        open = Some((first, slot.start));
        if slot.free == options.want_free {
            continue;
        }
        if let Some((first, last)) = open.take() {
            push_span(&mut spans, first, last);
        }
    }
    if let Some((first, last)) = open {
        push_span(&mut spans, first, last);
    }

    let header = format!(
        "{}({})",
        day.date.format("%Y/%m/%d"),
        options.weekdays.label(day.date.weekday())
    );
    if spans.is_empty() {
        header
    } else {
        format!("{} {}", header, spans.join(", "))
    }
}

fn push_span(spans: &mut Vec<String>, first: DateTime<FixedOffset>, last: DateTime<FixedOffset>) {
    if first < last {
        spans.push(format!("{}-{}", first.format("%-H:%M"), last.format("%-H:%M")));
    }
}

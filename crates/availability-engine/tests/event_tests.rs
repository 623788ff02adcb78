//! Tests for event normalization and event descriptions.

use availability_engine::{
    build_grid, describe_event, normalize, BusyInterval, EventTime, RawEvent, SearchWindow,
};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> DateTime<FixedOffset> {
    jst().with_ymd_and_hms(y, m, d, hour, min, 0).unwrap()
}

fn timed(summary: &str, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> RawEvent {
    RawEvent {
        summary: Some(summary.to_string()),
        start: EventTime::Timed { date_time: start },
        end: EventTime::Timed { date_time: end },
    }
}

fn all_day(summary: &str, start: NaiveDate, end: NaiveDate) -> RawEvent {
    RawEvent {
        summary: Some(summary.to_string()),
        start: EventTime::AllDay { date: start },
        end: EventTime::AllDay { date: end },
    }
}

// ── normalize ───────────────────────────────────────────────────────────────

#[test]
fn all_day_events_are_dropped() {
    let events = vec![
        all_day("Holiday", date(2024, 1, 1), date(2024, 1, 2)),
        timed("Standup", at(2024, 1, 1, 10, 0), at(2024, 1, 1, 10, 15)),
    ];

    let intervals = normalize(&events, jst());

    assert_eq!(
        intervals,
        vec![BusyInterval::new(at(2024, 1, 1, 10, 0), at(2024, 1, 1, 10, 15))]
    );
}

#[test]
fn input_order_is_kept() {
    let events = vec![
        timed("Late", at(2024, 1, 1, 15, 0), at(2024, 1, 1, 16, 0)),
        timed("Early", at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0)),
    ];

    let intervals = normalize(&events, jst());

    assert_eq!(intervals[0].start, at(2024, 1, 1, 15, 0));
    assert_eq!(intervals[1].start, at(2024, 1, 1, 9, 0));
}

#[test]
fn mixed_endpoint_event_is_kept_from_local_midnight() {
    let events = vec![RawEvent {
        summary: None,
        start: EventTime::AllDay {
            date: date(2024, 1, 1),
        },
        end: EventTime::Timed {
            date_time: at(2024, 1, 1, 10, 0),
        },
    }];

    let intervals = normalize(&events, jst());

    assert_eq!(
        intervals,
        vec![BusyInterval::new(at(2024, 1, 1, 0, 0), at(2024, 1, 1, 10, 0))]
    );
}

#[test]
fn empty_input_gives_no_intervals() {
    assert!(normalize(&[], jst()).is_empty());
}

#[test]
fn all_day_event_never_blocks_a_slot() {
    let day = date(2024, 1, 1);
    let events = vec![all_day("Offsite", day, date(2024, 1, 2))];
    let window = SearchWindow::new(day, day);

    let grid = build_grid(&normalize(&events, jst()), &window, at(2000, 1, 1, 0, 0)).unwrap();

    assert!(grid.days[0].slots.iter().all(|slot| slot.free));
}

#[test]
fn events_list_response_normalizes() {
    let json = r#"{"items":[
        {"summary":"Review","start":{"dateTime":"2024-01-01T13:00:00+09:00"},"end":{"dateTime":"2024-01-01T14:30:00+09:00"}},
        {"summary":"Holiday","start":{"date":"2024-01-01"},"end":{"date":"2024-01-02"}}
    ]}"#;

    let events = RawEvent::parse_list(json).unwrap();
    let intervals = normalize(&events, jst());

    assert_eq!(
        intervals,
        vec![BusyInterval::new(at(2024, 1, 1, 13, 0), at(2024, 1, 1, 14, 30))]
    );
}

// ── describe_event ──────────────────────────────────────────────────────────

#[test]
fn describes_all_day_event() {
    let event = all_day("Holiday", date(2024, 1, 1), date(2024, 1, 2));
    assert_eq!(describe_event(&event, jst()), "- [2024/01/01 終日] Holiday");
}

#[test]
fn describes_same_day_event() {
    let event = timed("Standup", at(2024, 1, 1, 9, 30), at(2024, 1, 1, 10, 0));
    assert_eq!(describe_event(&event, jst()), "- [2024/01/01 9:30-10:00] Standup");
}

#[test]
fn describes_multi_day_event() {
    let event = timed("Release", at(2024, 1, 1, 22, 0), at(2024, 1, 2, 1, 0));
    assert_eq!(
        describe_event(&event, jst()),
        "- [2024/01/01 22:00-2024/01/02 1:00] Release"
    );
}

#[test]
fn describes_untitled_event() {
    let mut event = timed("", at(2024, 1, 1, 9, 0), at(2024, 1, 1, 10, 0));
    event.summary = None;
    assert_eq!(describe_event(&event, jst()), "- [2024/01/01 9:00-10:00]");
}

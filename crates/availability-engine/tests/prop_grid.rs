//! Property-based tests for grid building and report formatting.
//!
//! These check invariants that hold for any busy interval, evaluation time and
//! window size, not just the hand-picked cases in `grid_tests.rs`.

use std::collections::BTreeSet;

use availability_engine::{build_grid, format_report, BusyInterval, SearchWindow};
use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, TimeZone};
use proptest::prelude::*;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Midnight local time at the start of `base_day`.
fn base_midnight() -> DateTime<FixedOffset> {
    jst().with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A busy interval somewhere within the first three days, 1 minute to 10 hours long.
fn arb_interval() -> impl Strategy<Value = BusyInterval> {
    (0i64..3 * 24 * 60, 1i64..=600).prop_map(|(start_min, len_min)| {
        let start = base_midnight() + Duration::minutes(start_min);
        BusyInterval::new(start, start + Duration::minutes(len_min))
    })
}

/// A valid `(start_hour, end_hour)` pair.
fn arb_hours() -> impl Strategy<Value = (u32, u32)> {
    (0u32..24).prop_flat_map(|start| (Just(start), (start + 1)..=24))
}

fn window(start_hour: u32, end_hour: u32, days: u64, max_days: u32) -> SearchWindow {
    let day = base_day();
    SearchWindow {
        start_hour,
        end_hour,
        max_days,
        ..SearchWindow::new(day, day.checked_add_days(Days::new(days)).unwrap())
    }
}

proptest! {
    #[test]
    fn busy_iff_overlapping_some_interval(
        intervals in prop::collection::vec(arb_interval(), 0..8),
        (start_hour, end_hour) in arb_hours(),
    ) {
        let grid = build_grid(&intervals, &window(start_hour, end_hour, 2, 100), base_midnight()).unwrap();

        for day in &grid.days {
            for slot in &day.slots {
                let overlapping = intervals
                    .iter()
                    .any(|i| slot.start < i.end && i.start < slot.end);
                prop_assert_eq!(slot.free, !overlapping, "slot {}", slot.key());
            }
        }
    }

    #[test]
    fn no_slot_starts_before_now(
        now_min in 0i64..3 * 24 * 60,
        (start_hour, end_hour) in arb_hours(),
    ) {
        let now = base_midnight() + Duration::minutes(now_min);
        let grid = build_grid(&[], &window(start_hour, end_hour, 2, 100), now).unwrap();

        let mut kept = 0usize;
        for day in &grid.days {
            for slot in &day.slots {
                prop_assert!(slot.start >= now);
                kept += 1;
            }
        }

        let expected = grid
            .days
            .iter()
            .flat_map(|day| {
                (start_hour..end_hour).map(move |h| {
                    jst().from_local_datetime(&day.date.and_hms_opt(0, 0, 0).unwrap()).unwrap()
                        + Duration::hours(i64::from(h))
                })
            })
            .filter(|start| *start >= now)
            .count();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn days_are_a_contiguous_capped_run(days in 0u64..60, max_days in 1u32..80) {
        let grid = build_grid(&[], &window(9, 19, days, max_days), base_midnight()).unwrap();

        let expected = (days + 1).min(u64::from(max_days)) as usize;
        prop_assert_eq!(grid.len(), expected);
        for (i, day) in grid.days.iter().enumerate() {
            prop_assert_eq!(day.date, base_day().checked_add_days(Days::new(i as u64)).unwrap());
        }
    }

    #[test]
    fn formatting_twice_is_identical(
        intervals in prop::collection::vec(arb_interval(), 0..8),
        want_free in any::<bool>(),
    ) {
        let grid = build_grid(&intervals, &window(9, 19, 2, 100), base_midnight()).unwrap();
        prop_assert_eq!(format_report(&grid, want_free), format_report(&grid, want_free));
    }

    #[test]
    fn report_has_one_line_per_day(
        intervals in prop::collection::vec(arb_interval(), 0..8),
        want_free in any::<bool>(),
    ) {
        let grid = build_grid(&intervals, &window(9, 19, 2, 100), base_midnight()).unwrap();
        prop_assert_eq!(format_report(&grid, want_free).lines().count(), grid.len());
    }
}

/// An hour-aligned busy interval inside `9..19` on one of the first three days.
fn arb_working_hours_interval() -> impl Strategy<Value = BusyInterval> {
    (0i64..3, 9i64..19)
        .prop_flat_map(|(day, start)| (Just(day), Just(start), (start + 1)..=19))
        .prop_map(|(day, start, end)| {
            let midnight = base_midnight() + Duration::days(day);
            BusyInterval::new(
                midnight + Duration::hours(start),
                midnight + Duration::hours(end),
            )
        })
}

proptest! {
    #[test]
    fn free_and_busy_slots_partition_each_day(
        intervals in prop::collection::vec(arb_working_hours_interval(), 0..6),
    ) {
        let grid = build_grid(&intervals, &window(9, 19, 2, 100), base_midnight()).unwrap();
        let free_lines: Vec<String> = format_report(&grid, true).lines().map(String::from).collect();
        let busy_lines: Vec<String> = format_report(&grid, false).lines().map(String::from).collect();

        for (i, day) in grid.days.iter().enumerate() {
            prop_assert_eq!(day.slots.len(), 10);

            let free: BTreeSet<String> =
                day.slots.iter().filter(|slot| slot.free).map(|slot| slot.key()).collect();
            let busy: BTreeSet<String> =
                day.slots.iter().filter(|slot| !slot.free).map(|slot| slot.key()).collect();
            let overlapping: BTreeSet<String> = day
                .slots
                .iter()
                .filter(|slot| intervals.iter().any(|interval| interval.overlaps(slot.start, slot.end)))
                .map(|slot| slot.key())
                .collect();

            prop_assert!(free.is_disjoint(&busy));
            prop_assert_eq!(free.len() + busy.len(), day.slots.len());
            prop_assert_eq!(&busy, &overlapping);

            if !free.is_empty() && !busy.is_empty() {
                prop_assert_ne!(&free_lines[i], &busy_lines[i]);
            } else {
                // Only one class: its report may have a span, the other never does.
                let header_only = if busy.is_empty() { &busy_lines[i] } else { &free_lines[i] };
                prop_assert!(!header_only.contains(' '), "unexpected span in {}", header_only);
            }
        }
    }
}

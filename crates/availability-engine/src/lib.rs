//! # availability-engine
//!
//! Hourly free/busy availability over a future date window.
//!
//! Busy intervals from a calendar are reconciled against a fixed per-day slot
//! grid (one slot per hour between a start and end hour), producing a per-day
//! free/busy classification that can be rendered as a compact text report of
//! free or busy spans.
//!
//! ## Modules
//!
//! - [`event`] — Raw calendar events → half-open busy intervals
//! - [`window`] — Search window configuration and hourly slot boundaries
//! - [`grid`] — Per-day, per-slot free/busy classification
//! - [`report`] — Collapse slot runs into `H:MM-H:MM` spans, one line per day
//! - [`source`] — Event source and clock seams, plus the fetch → grid pipeline
//! - [`error`] — Error types

pub mod error;
pub mod event;
pub mod grid;
pub mod report;
pub mod source;
pub mod window;

pub use error::{AvailabilityError, Result};
pub use event::{describe_event, normalize, BusyInterval, EventTime, RawEvent};
pub use grid::{build_grid, AvailabilityGrid, DayAvailability, SlotStatus};
pub use report::{format_report, format_report_with, ReportOptions, WeekdayStyle};
pub use source::{free_busy_times, Clock, EventSource, FixedClock, StaticEventSource, SystemClock};
pub use window::{SearchWindow, Slot};

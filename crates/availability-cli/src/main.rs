//! `avail` CLI — free/busy availability reports from exported calendar events.
//!
//! ## Usage
//!
//! ```sh
//! # Free spans for the default window (tomorrow .. +30 days, 9:00-19:00)
//! avail report -i events.json
//!
//! # Busy spans for one week, English weekday labels
//! avail report -i events.json --busy --weekdays en \
//!   --start-date 2024-01-01 --end-date 2024-01-07
//!
//! # Full slot grid as JSON
//! cat events.json | avail grid --start-hour 8 --end-hour 20
//!
//! # List the events themselves
//! avail events -i events.json
//! ```
//!
//! Every window flag can also be set through an `AVAIL_*` environment variable
//! (e.g. `AVAIL_MAX_DAYS=14`). Logs go to stderr; `RUST_LOG` overrides `-v`.

use anyhow::{Context, Result};
use availability_engine::window::{DEFAULT_END_HOUR, DEFAULT_MAX_DAYS, DEFAULT_START_HOUR};
use availability_engine::{
    describe_event, format_report_with, free_busy_times, AvailabilityGrid, Clock, FixedClock,
    RawEvent, ReportOptions, SearchWindow, StaticEventSource, SystemClock, WeekdayStyle,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "avail",
    version,
    about = "Free/busy availability reports from calendar events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one line per day listing free (or busy) spans
    Report {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Report busy spans instead of free spans
        #[arg(long, env = "AVAIL_BUSY")]
        busy: bool,
        /// Weekday labels printed after each date
        #[arg(long, value_enum, default_value_t = Weekdays::Ja, env = "AVAIL_WEEKDAYS")]
        weekdays: Weekdays,
    },
    /// Print the per-day, per-slot free/busy grid as JSON
    Grid {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// List the events, one per line
    Events {
        #[command(flatten)]
        io: IoArgs,
        /// UTC offset used to display event times
        #[arg(long, default_value = "+09:00", allow_hyphen_values = true, env = "AVAIL_UTC_OFFSET")]
        utc_offset: FixedOffset,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Events JSON file: an array of events or an events.list response (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct WindowArgs {
    /// First day to examine [default: tomorrow]
    #[arg(long, env = "AVAIL_START_DATE")]
    start_date: Option<NaiveDate>,
    /// Last day to examine [default: today + 30 days]
    #[arg(long, env = "AVAIL_END_DATE")]
    end_date: Option<NaiveDate>,
    /// First hour a slot may start at
    #[arg(long, default_value_t = DEFAULT_START_HOUR, env = "AVAIL_START_HOUR")]
    start_hour: u32,
    /// Hour the last slot ends at
    #[arg(long, default_value_t = DEFAULT_END_HOUR, env = "AVAIL_END_HOUR")]
    end_hour: u32,
    /// Maximum number of days to examine
    #[arg(long, alias = "max-date-count", default_value_t = DEFAULT_MAX_DAYS, env = "AVAIL_MAX_DAYS")]
    max_days: u32,
    /// UTC offset slots are laid out in
    #[arg(long, default_value = "+09:00", allow_hyphen_values = true, env = "AVAIL_UTC_OFFSET")]
    utc_offset: FixedOffset,
    /// Evaluation time (RFC 3339); slots starting earlier are skipped [default: now]
    #[arg(long, env = "AVAIL_NOW")]
    now: Option<DateTime<FixedOffset>>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Weekdays {
    Ja,
    En,
}

impl From<Weekdays> for WeekdayStyle {
    fn from(weekdays: Weekdays) -> Self {
        match weekdays {
            Weekdays::Ja => WeekdayStyle::Japanese,
            Weekdays::En => WeekdayStyle::English,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Report {
            io,
            window,
            busy,
            weekdays,
        } => {
            let grid = compute_grid(&io, &window)?;
            let options = ReportOptions {
                want_free: !busy,
                weekdays: weekdays.into(),
            };
            let mut report = format_report_with(&grid, &options);
            report.push('\n');
            write_output(io.output.as_deref(), &report)?;
        }
        Commands::Grid { io, window } => {
            let grid = compute_grid(&io, &window)?;
            let mut json = serde_json::to_string_pretty(&grid.to_json())?;
            json.push('\n');
            write_output(io.output.as_deref(), &json)?;
        }
        Commands::Events { io, utc_offset } => {
            let events = read_events(io.input.as_deref())?;
            let mut listing: String = events
                .iter()
                .map(|event| describe_event(event, utc_offset))
                .collect::<Vec<_>>()
                .join("\n");
            if !listing.is_empty() {
                listing.push('\n');
            }
            write_output(io.output.as_deref(), &listing)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn compute_grid(io: &IoArgs, args: &WindowArgs) -> Result<AvailabilityGrid> {
    let events = read_events(io.input.as_deref())?;
    let source = StaticEventSource::new(events);

    let clock: Box<dyn Clock> = match args.now {
        Some(now) => Box::new(FixedClock(now)),
        None => Box::new(SystemClock {
            offset: args.utc_offset,
        }),
    };
    let window = build_window(args, clock.as_ref());
    debug!(?window, "resolved search window");

    free_busy_times(&source, clock.as_ref(), &window).context("Failed to compute availability")
}

/// Fill the window from flags, taking unset dates from the clock's today.
fn build_window(args: &WindowArgs, clock: &dyn Clock) -> SearchWindow {
    let today = clock.now().with_timezone(&args.utc_offset).date_naive();
    let defaults = SearchWindow::from_today(today);
    SearchWindow {
        start_date: args.start_date.unwrap_or(defaults.start_date),
        end_date: args.end_date.unwrap_or(defaults.end_date),
        start_hour: args.start_hour,
        end_hour: args.end_hour,
        max_days: args.max_days,
        utc_offset: args.utc_offset,
    }
}

fn read_events(path: Option<&str>) -> Result<Vec<RawEvent>> {
    let json = read_input(path)?;
    RawEvent::parse_list(&json).context("Failed to parse events JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

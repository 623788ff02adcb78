//! WASM bindings for availability-engine.
//!
//! Exposes grid building, span reports and event descriptions to JavaScript
//! via `wasm-bindgen`. All complex values cross the boundary as JSON strings:
//! events use the calendar `events.list` shape (an array, or an object with an
//! `items` array) and the search window is a `SearchWindow` object, e.g.
//! `{"start_date":"2024-01-01","end_date":"2024-01-07","start_hour":9}`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/availability-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_wasm.wasm
//! ```

use availability_engine::{
    build_grid, describe_event, format_report_with, normalize, AvailabilityGrid, RawEvent,
    ReportOptions, SearchWindow,
};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers, kept free of JsValue so they run natively under `cargo test`
// ---------------------------------------------------------------------------

/// Parse an evaluation time.
///
/// Accepts RFC 3339 (e.g., "2024-01-01T09:00:00+09:00") or naive local time
/// (e.g., "2024-01-01T09:00:00"), which is interpreted in `offset`.
fn parse_now(s: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))?
        .and_local_timezone(offset)
        .single()
        .ok_or_else(|| format!("Invalid datetime '{}': not representable", s))
}

fn parse_window(json: &str) -> Result<SearchWindow, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid window JSON: {}", e))
}

fn parse_events(json: &str) -> Result<Vec<RawEvent>, String> {
    RawEvent::parse_list(json).map_err(|e| e.to_string())
}

fn compute(events_json: &str, window_json: &str, now: &str) -> Result<AvailabilityGrid, String> {
    let window = parse_window(window_json)?;
    let events = parse_events(events_json)?;
    let now = parse_now(now, window.utc_offset)?;
    let intervals = normalize(&events, window.utc_offset);
    build_grid(&intervals, &window, now).map_err(|e| e.to_string())
}

fn grid_json(events_json: &str, window_json: &str, now: &str) -> Result<String, String> {
    let grid = compute(events_json, window_json, now)?;
    serde_json::to_string(&grid.to_json()).map_err(|e| format!("Serialization error: {}", e))
}

fn report_text(
    events_json: &str,
    window_json: &str,
    now: &str,
    options_json: Option<&str>,
) -> Result<String, String> {
    let options: ReportOptions = match options_json {
        Some(json) => {
            serde_json::from_str(json).map_err(|e| format!("Invalid options JSON: {}", e))?
        }
        None => ReportOptions::default(),
    };
    let grid = compute(events_json, window_json, now)?;
    Ok(format_report_with(&grid, &options))
}

fn event_lines(events_json: &str, utc_offset: &str) -> Result<String, String> {
    let offset: FixedOffset = utc_offset
        .parse()
        .map_err(|_| format!("Invalid UTC offset '{}'", utc_offset))?;
    let lines: Vec<String> = parse_events(events_json)?
        .iter()
        .map(|event| describe_event(event, offset))
        .collect();
    serde_json::to_string(&lines).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Build the free/busy grid for a window.
///
/// Returns a JSON string shaped `{"YYYY-MM-DD": {"YYYY-MM-DD HH:MM": {"free": bool}}}`
/// with days and slots in chronological order.
///
/// # Arguments
/// - `events_json` -- Events array or `events.list` response
/// - `window_json` -- `SearchWindow` object; hours, `max_days` and `utc_offset` may be omitted
/// - `now` -- Evaluation time; slots starting earlier are left out
#[wasm_bindgen(js_name = "buildGrid")]
pub fn build_grid_js(events_json: &str, window_json: &str, now: &str) -> Result<String, JsValue> {
    grid_json(events_json, window_json, now).map_err(|e| JsValue::from_str(&e))
}

/// Render the span report, one line per day.
///
/// `options_json` is an optional `{"want_free": bool, "weekdays": "japanese" | "english"}`.
#[wasm_bindgen(js_name = "formatReport")]
pub fn format_report_js(
    events_json: &str,
    window_json: &str,
    now: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    report_text(events_json, window_json, now, options_json.as_deref())
        .map_err(|e| JsValue::from_str(&e))
}

/// Describe each event on one line. Returns a JSON array of strings.
#[wasm_bindgen(js_name = "describeEvents")]
pub fn describe_events_js(events_json: &str, utc_offset: &str) -> Result<String, JsValue> {
    event_lines(events_json, utc_offset).map_err(|e| JsValue::from_str(&e))
}

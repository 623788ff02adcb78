//! Error types for availability-engine operations.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid search window: {0}")]
    InvalidWindow(String),

    #[error("Invalid busy interval: start {start} is not before end {end}")]
    InvalidInterval {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },

    #[error("Event source error: {0}")]
    Source(String),

    #[error("Event JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;

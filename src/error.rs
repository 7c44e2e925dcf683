//! Error types for loading holding records

use std::io;
use thiserror::Error;

/// Result alias for loader operations
pub type PatrimonyResult<T> = Result<T, LoadError>;

/// Failures raised while turning raw records into holdings
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A date field could not be parsed
    #[error("Invalid date '{value}' for {label}")]
    InvalidDate { label: String, value: String },

    /// Anchor day outside 1..=31
    #[error("Invalid day of month {day} for {label} (expected 1-31)")]
    InvalidDayOfMonth { label: String, day: u32 },

    #[error("End date {end} is before start date {start} for {label}")]
    EndBeforeStart {
        label: String,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Missing field '{field}' for {label}")]
    MissingField { label: String, field: &'static str },

    /// File extension not recognised by the auto loader
    #[error("Unsupported data file format: {0}")]
    UnsupportedFormat(String),
}

//! Error types for schedule-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of events")]
    NotAnArray,

    /// A single record in an extraction or import payload was malformed.
    /// `index` is the 0-based position of the record in its source.
    #[error("Invalid event at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Event '{id}' ends before it starts")]
    InvertedInterval { id: String },

    #[error("Duplicate event id: {0}")]
    DuplicateId(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("No valid events found")]
    NoEvents,
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

//! Error types shared across the crate

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Everything that can go wrong while editing or rendering a countdown
#[derive(Debug, Error)]
pub enum CountdownError {
    /// The chosen target is at or before the moment it was validated
    #[error("target {target} is not in the future")]
    PastTarget { target: DateTime<Utc> },

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time '{0}', expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    /// The combined date and time falls into a local clock gap (DST)
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(String),

    /// An `in` offset too large for the calendar
    #[error("offset '{0}' is out of range")]
    OffsetOutOfRange(String),

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("failed to lock {0}")]
    StateLock(String),

    #[error("failed to render: {0}")]
    Render(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CountdownError>;

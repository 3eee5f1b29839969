//! # Time Utilities
//!
//! Utilities for UTC time and Unix timestamps using chrono.

use chrono::{DateTime, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as a Unix timestamp in seconds.
pub fn unix_now() -> i64 {
    now_utc().timestamp()
}

/// Convert a Unix timestamp in seconds to a UTC `DateTime`.
pub fn from_unix(secs: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp(secs, 0).ok_or(Error::OutOfRange(secs))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    OutOfRange(i64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

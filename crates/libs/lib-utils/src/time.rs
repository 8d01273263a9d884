//! # Time Utilities
//!
//! Utilities for time formatting using chrono.

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format time as an RFC3339 string with second precision.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

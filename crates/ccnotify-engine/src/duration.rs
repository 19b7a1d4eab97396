use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// Returned by [`elapsed`] when either timestamp cannot be parsed.
pub const UNKNOWN_DURATION: &str = "Unknown";

const OFFSET_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S%.f%:z"];
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// Timestamp did not match any accepted layout.
    Parse(String),
}

impl fmt::Display for DurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationError::Parse(input) => write!(f, "Invalid timestamp: {:?}", input),
        }
    }
}

impl std::error::Error for DurationError {}

/// Parse a ledger timestamp into UTC.
///
/// Accepts RFC 3339 (a trailing `Z` is rewritten to `+00:00` first), the same
/// with a space separator, and naive `YYYY-MM-DD HH:MM:SS[.fff]` which is
/// taken as UTC.
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>, DurationError> {
    let trimmed = ts.trim();
    let normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{}+00:00", rest),
        None => trimmed.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(DurationError::Parse(ts.to_string()))
}

/// Render whole seconds as `45s`, `2m5s`, `2m`, `1h1m` or `1h`.
///
/// Seconds are dropped once the span reaches an hour.
pub fn format_elapsed(total_seconds: i64) -> String {
    if total_seconds < 60 {
        format!("{}s", total_seconds)
    } else if total_seconds < 3600 {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        if seconds == 0 {
            format!("{}m", minutes)
        } else {
            format!("{}m{}s", minutes, seconds)
        }
    } else {
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h{}m", hours, minutes)
        }
    }
}

pub fn try_elapsed(start: &str, end: &str) -> Result<String, DurationError> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    Ok(format_elapsed(end.signed_duration_since(start).num_seconds()))
}

/// Human-readable time between two timestamps, or `"Unknown"`.
///
/// Parse failures are logged and never returned to the caller.
pub fn elapsed(start: &str, end: &str) -> String {
    match try_elapsed(start, end) {
        Ok(text) => text,
        Err(err) => {
            tracing::error!("Error calculating duration: {}", err);
            UNKNOWN_DURATION.to_string()
        }
    }
}

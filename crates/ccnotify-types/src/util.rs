use chrono::{DateTime, SecondsFormat, Utc};

/// Subtitle used when a notification has no working directory to name it after.
pub const DEFAULT_PROJECT_NAME: &str = "Claude Task";

/// Last path segment of `cwd`, or [`DEFAULT_PROJECT_NAME`] when empty.
///
/// Trailing separators are ignored, so `/work/app/` names `app`.
pub fn project_name(cwd: &str) -> String {
    cwd.trim()
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_PROJECT_NAME)
        .to_string()
}

/// Storage format for ledger timestamps: `2026-01-02T03:04:05.678Z`.
///
/// Fixed width, so lexical order matches chronological order.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

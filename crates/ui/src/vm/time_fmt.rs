use chrono::{DateTime, Utc};

/// Calendar date of a completion, e.g. `2023-11-14`.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Elapsed seconds as `m:ss`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

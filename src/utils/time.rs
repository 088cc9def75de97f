//! Time and timestamp utilities

use chrono::{DateTime, Utc};

/// Human-readable distance from `then` to `now`, e.g. "5 minutes ago"
///
/// Thresholds follow the usual relative-time conventions: under 45 seconds is
/// "a few seconds", 45 minutes rounds up to an hour, 22 hours to a day.
/// Timestamps ahead of `now` are treated as just now.
pub fn from_now(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);

    let minutes = round_div(secs, 60);
    let hours = round_div(secs, 3600);
    let days = round_div(secs, 86400);

    match secs {
        s if s < 45 => "a few seconds ago".to_string(),
        s if s < 90 => "a minute ago".to_string(),
        s if s < 45 * 60 => format!("{} minutes ago", minutes),
        s if s < 90 * 60 => "an hour ago".to_string(),
        s if s < 22 * 3600 => format!("{} hours ago", hours),
        s if s < 36 * 3600 => "a day ago".to_string(),
        _ => format!("{} days ago", days),
    }
}

fn round_div(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}

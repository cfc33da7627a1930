//! Human readable time formatting

use std::time::Duration;
use chrono::{DateTime, Local, TimeZone, Utc};

/// Format an elapsed duration as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Format how long ago `then` was, relative to `now` (`42s ago`, `3m ago`, `5h ago`, `2d ago`)
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    // Timestamps from the future read as "0s ago".
    let secs = (now - then).num_seconds().max(0);
    if secs < 60 {
        return format!("{}s ago", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m ago", mins);
    }
    let hours = mins / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

/// Format a completion time as `completed at HH.MM on DD/MM/YYYY` in the given zone
pub fn format_completed_at_in<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.with_timezone(tz)
        .format("completed at %H.%M on %d/%m/%Y")
        .to_string()
}

/// Format a completion time in the server's local zone
pub fn format_completed_at(at: DateTime<Utc>) -> String {
    format_completed_at_in(at, &Local)
}

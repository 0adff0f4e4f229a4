use chrono::{DateTime, Utc};

/// Compacts a counter for card badges: `950`, `1.2K`, `3.4M`.
///
/// # Example
/// ```
/// use catalog::format_number;
///
/// assert_eq!(format_number(950), "950");
/// assert_eq!(format_number(1_260), "1.3K");
/// assert_eq!(format_number(3_000_000), "3M");
/// ```
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        compact(value as f64 / 1_000_000.0, "M")
    } else if value >= 1_000 {
        compact(value as f64 / 1_000.0, "K")
    } else {
        value.to_string()
    }
}

fn compact(scaled: f64, suffix: &str) -> String {
    let text = format!("{scaled:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{suffix}")
}

/// Formats a duration in seconds as `m:ss`.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Describes how long ago `published_at` was relative to `now`.
///
/// Timestamps in the future read as "just now".
pub fn format_time_ago(published_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - published_at).num_seconds().max(0);

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    let (amount, unit) = match seconds {
        s if s < MINUTE => return String::from("just now"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < MONTH => (s / DAY, "day"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}

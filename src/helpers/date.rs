//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Z: TimeZone>(date: &DateTime<Z>, format: &str) -> String
where
    Z::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a stored UTC timestamp as a calendar date in the site timezone
///
/// An empty or unknown timezone name falls back to UTC.
pub fn display_date(date: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    match timezone.parse::<Tz>() {
        Ok(tz) => format_date(&date.with_timezone(&tz), format),
        Err(_) => {
            if !timezone.is_empty() {
                tracing::debug!("Unknown timezone {:?}, using UTC", timezone);
            }
            format_date(date, format)
        }
    }
}

/// Get relative time (like "2 hours ago")
pub fn relative_date(date: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(*date);

    if duration.num_seconds() < 0 {
        return "in the future".to_string();
    }

    let seconds = duration.num_seconds();
    let minutes = duration.num_minutes();
    let hours = duration.num_hours();
    let days = duration.num_days();

    if seconds < 60 {
        "a few seconds ago".to_string()
    } else if minutes == 1 {
        "a minute ago".to_string()
    } else if minutes < 60 {
        format!("{} minutes ago", minutes)
    } else if hours == 1 {
        "an hour ago".to_string()
    } else if hours < 24 {
        format!("{} hours ago", hours)
    } else if days == 1 {
        "yesterday".to_string()
    } else if days < 30 {
        format!("{} days ago", days)
    } else if days < 365 {
        let months = days / 30;
        if months == 1 {
            "a month ago".to_string()
        } else {
            format!("{} months ago", months)
        }
    } else {
        let years = days / 365;
        if years == 1 {
            "a year ago".to_string()
        } else {
            format!("{} years ago", years)
        }
    }
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("D", "%-d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

//! Header clock text.

use std::time::Duration;

use chrono::{DateTime, TimeZone};

/// How often the header clock is redrawn.
pub const CLOCK_TICK: Duration = Duration::from_secs(1);

/// US-style date and 12-hour time, e.g. `10/17/2026 3:04:05 PM`.
pub fn format_clock<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%-m/%-d/%Y %-I:%M:%S %p").to_string()
}

/// Clock text for the local time zone.
pub fn local_clock() -> String {
    format_clock(&chrono::Local::now())
}

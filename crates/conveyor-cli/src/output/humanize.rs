//! Human-readable durations and relative timestamps.

use chrono::{DateTime, Utc};
use conveyor_api_models::{STATUS_PENDING, STATUS_RUNNING};

/// Placeholder shown for resources that have not finished yet.
pub(crate) const IN_PROGRESS: &str = "...";

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 12 * MONTH;
const LONG_TIME: u64 = 37 * YEAR;

enum Magnitude {
    Now,
    Fixed(&'static str),
    Counted(&'static str, u64),
}

// Upper bounds are exclusive; the first bound greater than the delta wins.
const MAGNITUDES: [(u64, Magnitude); 17] = [
    (1, Magnitude::Now),
    (2, Magnitude::Fixed("1 second")),
    (MINUTE, Magnitude::Counted("seconds", 1)),
    (2 * MINUTE, Magnitude::Fixed("1 minute")),
    (HOUR, Magnitude::Counted("minutes", MINUTE)),
    (2 * HOUR, Magnitude::Fixed("1 hour")),
    (DAY, Magnitude::Counted("hours", HOUR)),
    (2 * DAY, Magnitude::Fixed("1 day")),
    (WEEK, Magnitude::Counted("days", DAY)),
    (2 * WEEK, Magnitude::Fixed("1 week")),
    (MONTH, Magnitude::Counted("weeks", WEEK)),
    (2 * MONTH, Magnitude::Fixed("1 month")),
    (YEAR, Magnitude::Counted("months", MONTH)),
    (18 * MONTH, Magnitude::Fixed("1 year")),
    (2 * YEAR, Magnitude::Fixed("2 years")),
    (LONG_TIME, Magnitude::Counted("years", YEAR)),
    (u64::MAX, Magnitude::Fixed("a long while")),
];

/// Elapsed time between two unix timestamps, or [`IN_PROGRESS`] while the
/// resource is still pending or running.
///
/// The delta is rendered as-is: a missing finish time yields a negative value.
pub(crate) fn duration(status: &str, started: i64, finished: i64) -> String {
    if status.eq_ignore_ascii_case(STATUS_PENDING) || status.eq_ignore_ascii_case(STATUS_RUNNING)
    {
        return IN_PROGRESS.to_string();
    }
    format_seconds(finished.saturating_sub(started))
}

/// Render whole seconds as `1h2m3s`, `1m30s`, `45s` or `0s`.
pub(crate) fn format_seconds(seconds: i64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }
    let sign = if seconds < 0 { "-" } else { "" };
    let total = seconds.unsigned_abs();
    let (hours, minutes, secs) = (total / HOUR, total % HOUR / MINUTE, total % MINUTE);
    if hours > 0 {
        format!("{sign}{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m{secs}s")
    } else {
        format!("{sign}{secs}s")
    }
}

/// Describe `unix` relative to `now`, e.g. `3 minutes ago` or `2 days from now`.
///
/// A zero timestamp means the server never set the field and always renders
/// as `a long while ago`.
pub(crate) fn relative_time(unix: i64, now: DateTime<Utc>) -> String {
    if unix == 0 {
        return "a long while ago".to_string();
    }
    let now = now.timestamp();
    let (delta, suffix) = if unix <= now {
        (now.abs_diff(unix), "ago")
    } else {
        (unix.abs_diff(now), "from now")
    };

    let magnitude = MAGNITUDES
        .iter()
        .find(|(bound, _)| delta < *bound)
        .map_or(&Magnitude::Fixed("a long while"), |(_, magnitude)| magnitude);

    match magnitude {
        Magnitude::Now => "now".to_string(),
        Magnitude::Fixed(label) => format!("{label} {suffix}"),
        Magnitude::Counted(unit, divisor) => format!("{} {unit} {suffix}", delta / divisor),
    }
}

//! Timestamp helpers: defensive parsing of server timestamps, local-time
//! input for reservation expiry, and display formatting.

use chrono::{
    DateTime, Duration, Local, NaiveDateTime, SecondsFormat, TimeZone, Timelike, Utc,
};

/// Layouts accepted for user-entered local date/times (`datetime-local` style
/// first).
const LOCAL_INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a server timestamp. Accepts RFC 3339 with an offset, or a naive
/// ISO-8601 date-time which is taken as UTC.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a server timestamp in local time. Falls back to the raw string when
/// it cannot be parsed.
pub fn format_local(raw: &str) -> String {
    format_in(raw, &Local)
}

pub fn format_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match parse(raw) {
        Some(at) => at.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => raw.to_string(),
    }
}

/// Parse a user-entered local date/time such as `2026-10-19T14:30`.
pub fn parse_local_input(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Resolve a local wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// do not exist in `tz` (DST spring-forward gap) yield `None`.
pub fn local_to_instant<Tz: TimeZone>(local: NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// ISO-8601 wire form with millisecond precision and a `Z` suffix.
pub fn to_iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Default expiry pre-filled in the reserve form: `hours` from `now`, truncated
/// to whole minutes. `None` when the result is outside chrono's range.
pub fn default_expiry(now: NaiveDateTime, hours: i64) -> Option<NaiveDateTime> {
    let at = now.checked_add_signed(Duration::try_hours(hours)?)?;
    Some(
        at.with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(at),
    )
}

/// Coarse relative description, e.g. "in 2 hours" or "5 minutes ago".
pub fn relative(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = at - now;
    let future = delta > Duration::zero();
    let secs = delta.num_seconds().unsigned_abs();

    let span = match secs {
        0..=44 => "less than a minute".to_string(),
        45..=2699 => plural((secs + 30) / 60, "minute"),
        2700..=86399 => plural((secs + 1800) / 3600, "hour"),
        _ => plural((secs + 43200) / 86400, "day"),
    };

    if future {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

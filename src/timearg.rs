//! Flexible date/time parsing for the `--from`/`--to` CLI arguments.
//!
//! Accepts absolute RFC-3339/ISO-8601 timestamps, naive datetimes and bare
//! dates (treated as UTC), the literal `now`, and relative durations such as
//! `15m` or `2h ago`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use humantime::parse_duration;

/// Parse a user-supplied time string into a UTC instant.
///
/// Used as a clap value parser, hence the `String` error type.
pub fn parse_time_arg(input: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(Utc::now());
    }

    // Relative durations, optionally suffixed with " ago".
    let clean = trimmed.strip_suffix(" ago").unwrap_or(trimmed);
    if let Ok(duration) = parse_duration(clean) {
        let target = std::time::SystemTime::now() - duration;
        return Ok(target.into());
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.with_timezone(&Utc));
    }

    // Naive forms are treated as UTC.
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        return Ok(Utc.from_utc_datetime(&midnight));
    }

    Err(format!("could not parse time: {}", input))
}

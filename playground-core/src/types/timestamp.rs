//! Parsing of the `messages_must_be_older_than` horizon sent by callers.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::PlaygroundError;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parses an RFC 3339 timestamp, an offset-suffixed `YYYY-MM-DD HH:MM:SS[.f]+HH:MM`, or a
/// naive `YYYY-MM-DD HH:MM:SS[.f]` (taken as UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, PlaygroundError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(PlaygroundError::InvalidRequest(format!(
        "unrecognised timestamp: {raw}"
    )))
}

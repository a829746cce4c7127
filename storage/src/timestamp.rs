//! ISO-8601 timestamp parsing shared by every record type.
//!
//! Accepted forms:
//! - RFC 3339 with `Z` or an offset: `2024-01-01T10:00:00Z`, `2024-01-01T10:00:00+02:00`
//! - naive date-time, read as UTC: `2024-01-01T10:00:00`, `2024-01-01T10:00:00.250`, `2024-01-01T10:00`
//! - bare date, midnight UTC: `2024-01-01`

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use errors::ValidationError;
use serde::{Deserialize, Deserializer, de};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ValidationError::invalid(
        "date",
        format!("'{raw}' is not an ISO-8601 timestamp")
    ))
}

/// `deserialize_with` adapter for required timestamps.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(de::Error::custom)
}

/// `deserialize_with` adapter for optional timestamps; pair with `#[serde(default)]`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_timestamp(&raw).map_err(de::Error::custom))
        .transpose()
}

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde::Serializer;

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Calendar year in UTC, the upper bound for title years.
pub fn current_year() -> i32 {
    Utc::now().year()
}

//! Fixed-width timestamp serialization for stored dates.
//!
//! Stores compare dates as strings, so every stored `DateTime<Utc>` is
//! written as RFC 3339 with exactly nine fractional digits and a `Z`
//! suffix. Deserialization accepts any RFC 3339 form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Format a timestamp the way it is stored.
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Serialize a timestamp in the stored form.
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(value))
}

/// Serialize an optional timestamp in the stored form.
pub fn serialize_option<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => serializer.serialize_some(&format(value)),
        None => serializer.serialize_none(),
    }
}

//! # UTC Date/Time Fields
//!
//! A [`UtcDateTime`] field deserializes to [`Value::DateTime`] from:
//!
//! - text in ISO 8601 / RFC 3339 form, with `T` or a space between date and
//!   time, with or without fractional seconds, with a `Z` suffix, a numeric
//!   offset, or no offset at all (taken as UTC). A bare date is midnight UTC;
//! - a POSIX timestamp (`Int` or `Float` seconds), rounded to microseconds;
//! - an existing date/time value, passed through.
//!
//! Every offset is converted to UTC. Serialization renders RFC 3339 with a
//! `Z` suffix and only as many sub-second digits as needed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use objective_core::{Environment, FieldKind, Invalid, Node, Value};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses a date/time string permissively, converting to UTC.
pub fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    let normalized = match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        Some(stripped) => format!("{stripped}+00:00"),
        None => text.to_string(),
    };
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::<FixedOffset>::parse_from_str(&normalized, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Interprets POSIX seconds as UTC, rounded to microseconds.
pub fn from_timestamp(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let micros = (seconds * 1e6).round();
    if micros < i64::MIN as f64 || micros >= i64::MAX as f64 {
        return None;
    }
    let micros = micros as i64;
    let secs = micros.div_euclid(1_000_000);
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok()?;
    DateTime::from_timestamp(secs, nanos)
}

/// Field kind producing UTC date/time values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcDateTime;

impl FieldKind for UtcDateTime {
    fn kind_name(&self) -> &'static str {
        "UtcDateTime"
    }

    fn deserialize(&self, node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        let parsed = match &value {
            Value::DateTime(dt) => Some(*dt),
            Value::Text(text) => parse_datetime(text),
            Value::Int(seconds) => DateTime::from_timestamp(*seconds, 0),
            Value::Float(seconds) => from_timestamp(*seconds),
            _ => None,
        };
        match parsed {
            Some(dt) => Ok(Value::DateTime(dt)),
            None => Err(Invalid::value(node, value).with_message("Invalid DateTime")),
        }
    }

    fn serialize(&self, _node: &Node, value: Value, _env: &Environment) -> Result<Value, Invalid> {
        match value {
            Value::DateTime(dt) => Ok(Value::Text(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    fn expected() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2013, 4, 1, 12, 30, 15).single().unwrap()
    }

    #[test]
    fn test_text_variants_agree() {
        let field = types::utc_datetime().instantiate().unwrap();
        for text in [
            "2013-04-01T12:30:15Z",
            "2013-04-01T12:30:15+00:00",
            "2013-04-01 12:30:15",
            "2013-04-01T12:30:15",
            "2013-04-01 14:30:15+02:00",
            "2013-04-01T12:30:15.000Z",
            "2013-04-01 12:30:15Z",
        ] {
            assert_eq!(
                field.deserialize(text).unwrap(),
                Value::DateTime(expected()),
                "parsing {text}"
            );
        }
    }

    #[test]
    fn test_timestamps() {
        let field = types::utc_datetime().instantiate().unwrap();
        let seconds = expected().timestamp();
        assert_eq!(field.deserialize(seconds).unwrap(), Value::DateTime(expected()));
        let fractional = field.deserialize(seconds as f64 + 0.25).unwrap();
        assert_eq!(
            fractional.as_datetime().map(|dt| dt.timestamp_subsec_micros()),
            Some(250_000)
        );
    }

    #[test]
    fn test_date_only_is_midnight() {
        let parsed = parse_datetime("2013-04-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2013, 4, 1, 0, 0, 0).single().unwrap());
    }

    #[test]
    fn test_invalid_inputs() {
        let field = types::utc_datetime().instantiate().unwrap();
        assert_eq!(field.deserialize("yesterday").unwrap_err().message(), "Invalid DateTime");
        assert_eq!(field.deserialize(true).unwrap_err().message(), "Invalid DateTime");
    }

    #[test]
    fn test_serialize_renders_rfc3339() {
        let field = types::utc_datetime().instantiate().unwrap();
        assert_eq!(
            field.serialize(expected()).unwrap(),
            Value::from("2013-04-01T12:30:15Z")
        );
    }
}

//! ISO-8601 timestamps as clients send them.
//!
//! Accepted forms, tried in order:
//! - RFC 3339 with an offset: `2030-05-17T09:30:00+02:00`, `2030-05-17T09:30:00Z`
//! - naive date-time, read as UTC: `2030-05-17T09:30:00`, `2030-05-17T09:30:00.250`
//! - date only, midnight UTC: `2030-05-17` (what an `<input type="date">` submits)

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

use super::patch::Patch;

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn from_raw<E: de::Error>(raw: String) -> Result<DateTime<Utc>, E> {
    parse_timestamp(&raw).ok_or_else(|| {
        E::custom(format!(
            "invalid timestamp `{}`, expected an ISO-8601 date or date-time",
            raw
        ))
    })
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    from_raw(String::deserialize(deserializer)?)
}

/// For `Option` fields; pair with `#[serde(default)]`.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(from_raw)
        .transpose()
}

/// For `Patch` fields; pair with `#[serde(default)]` so absent keys stay `Missing`.
pub fn deserialize_patch_timestamp<'de, D>(
    deserializer: D,
) -> Result<Patch<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => from_raw(raw).map(Patch::Value),
        None => Ok(Patch::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_rfc3339_with_offset() {
        assert_eq!(
            parse_timestamp("2030-05-17T09:30:00Z"),
            Some(utc(2030, 5, 17, 9, 30, 0))
        );
        assert_eq!(
            parse_timestamp("2030-05-17T11:30:00+02:00"),
            Some(utc(2030, 5, 17, 9, 30, 0))
        );
    }

    #[test]
    fn test_naive_date_time_is_utc() {
        assert_eq!(
            parse_timestamp("2030-05-17T09:30:00"),
            Some(utc(2030, 5, 17, 9, 30, 0))
        );

        let fractional = parse_timestamp("2030-05-17T09:30:00.250").unwrap();
        assert_eq!(fractional.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_date_only_is_midnight_utc() {
        assert_eq!(parse_timestamp("2030-05-17"), Some(utc(2030, 5, 17, 0, 0, 0)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        for raw in ["tomorrow", "", "2030-13-01", "17/05/2030"] {
            assert_eq!(parse_timestamp(raw), None, "{}", raw);
        }
    }

    #[test]
    fn test_deserialize_error_mentions_the_value() {
        #[derive(Debug, Deserialize)]
        struct Due {
            #[serde(deserialize_with = "deserialize_timestamp")]
            _at: DateTime<Utc>,
        }

        let err = serde_json::from_str::<Due>(r#"{"_at": "soon"}"#).unwrap_err();
        assert!(err.to_string().contains("soon"), "{}", err);
    }
}

//! Event time normalization.
//!
//! The calendar API distinguishes all-day events (a date with no
//! time-of-day) from timed events (an absolute instant plus a display
//! timezone) via two mutually exclusive wire fields; callers must never
//! populate both. [`normalize`] maps user input onto that split.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Offset applied to date-times that carry no timezone information.
/// Fixed at +09:00 (JST); this is documented behavior, not locale-derived.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 9 * 3600;

/// IANA zone name reported alongside the default offset.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";

const OFFSETLESS_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Start or end of an event, in one of the two forms the API accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTimeSpec {
    AllDay {
        date: NaiveDate,
    },
    Timed {
        #[serde(rename = "dateTime")]
        date_time: DateTime<FixedOffset>,
        #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
    },
}

/// Parse a user-supplied date or date-time string.
///
/// A string shaped exactly `YYYY-MM-DD` becomes an all-day date. Anything
/// else is parsed as a date-time: an explicit UTC offset (or `Z`) is kept
/// as-is, while an offset-less value is interpreted at
/// [`DEFAULT_UTC_OFFSET_SECS`] and tagged [`DEFAULT_TIME_ZONE`].
///
/// The all-day path does not adjust end dates; supplying a correctly
/// exclusive end date for ranges is the caller's responsibility.
pub fn normalize(text: &str) -> CliResult<EventTimeSpec> {
    if is_bare_date(text) {
        let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map_err(|_| CliError::InvalidTimeFormat(text.to_string()))?;
        return Ok(EventTimeSpec::AllDay { date });
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Ok(EventTimeSpec::Timed {
            date_time,
            time_zone: None,
        });
    }

    for format in OFFSETLESS_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap();
            return Ok(EventTimeSpec::Timed {
                date_time: naive.and_local_timezone(offset).unwrap(),
                time_zone: Some(DEFAULT_TIME_ZONE.to_string()),
            });
        }
    }

    Err(CliError::InvalidTimeFormat(text.to_string()))
}

/// Exactly `YYYY-MM-DD`: four digits, dash, two digits, dash, two digits.
fn is_bare_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| {
            if i == 4 || i == 7 {
                *b == b'-'
            } else {
                b.is_ascii_digit()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_date_becomes_all_day() {
        let spec = normalize("2025-03-20").unwrap();

        assert_eq!(
            spec,
            EventTimeSpec::AllDay {
                date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
            }
        );
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({ "date": "2025-03-20" })
        );
    }

    #[test]
    fn explicit_offset_is_preserved() {
        let spec = normalize("2025-01-15T10:00:00+05:00").unwrap();

        match spec {
            EventTimeSpec::Timed {
                date_time,
                time_zone,
            } => {
                assert_eq!(
                    date_time,
                    DateTime::parse_from_rfc3339("2025-01-15T10:00:00+05:00").unwrap()
                );
                assert_eq!(date_time.offset().local_minus_utc(), 5 * 3600);
                assert_eq!(time_zone, None);
            }
            other => panic!("expected timed spec, got {:?}", other),
        }
    }

    #[test]
    fn zulu_suffix_is_accepted() {
        let spec = normalize("2025-01-15T01:00:00Z").unwrap();

        match spec {
            EventTimeSpec::Timed {
                date_time,
                time_zone,
            } => {
                assert_eq!(date_time.offset().local_minus_utc(), 0);
                assert_eq!(
                    date_time,
                    DateTime::parse_from_rfc3339("2025-01-15T01:00:00+00:00").unwrap()
                );
                assert_eq!(time_zone, None);
            }
            other => panic!("expected timed spec, got {:?}", other),
        }
    }

    #[test]
    fn missing_offset_defaults_to_tokyo() {
        let expected = DateTime::parse_from_rfc3339("2025-01-15T10:00:00+09:00").unwrap();

        let spec = normalize("2025-01-15T10:00:00").unwrap();

        match spec {
            EventTimeSpec::Timed {
                date_time,
                time_zone,
            } => {
                assert_eq!(date_time, expected);
                assert_eq!(date_time.offset().local_minus_utc(), DEFAULT_UTC_OFFSET_SECS);
                assert_eq!(time_zone.as_deref(), Some(DEFAULT_TIME_ZONE));
            }
            other => panic!("expected timed spec, got {:?}", other),
        }
    }

    #[test]
    fn minute_precision_without_offset_is_accepted() {
        let spec = normalize("2025-01-15T10:00").unwrap();
        let expected = DateTime::parse_from_rfc3339("2025-01-15T10:00:00+09:00").unwrap();

        match spec {
            EventTimeSpec::Timed { date_time, .. } => assert_eq!(date_time, expected),
            other => panic!("expected timed spec, got {:?}", other),
        }
    }

    #[test]
    fn garbage_is_rejected_with_original_input() {
        match normalize("not-a-date") {
            Err(CliError::InvalidTimeFormat(input)) => assert_eq!(input, "not-a-date"),
            other => panic!("expected InvalidTimeFormat, got {:?}", other),
        }
    }

    #[test]
    fn bare_date_shape_with_trailing_time_is_not_all_day() {
        // One character past the date shape falls through to date-time parsing
        match normalize("2025-03-20x") {
            Err(CliError::InvalidTimeFormat(input)) => assert_eq!(input, "2025-03-20x"),
            other => panic!("expected InvalidTimeFormat, got {:?}", other),
        }
    }

    #[test]
    fn wire_form_is_mutually_exclusive() {
        let defaulted = serde_json::to_value(normalize("2025-01-15T10:00:00").unwrap()).unwrap();
        assert!(defaulted.get("date").is_none());
        assert_eq!(defaulted["dateTime"], "2025-01-15T10:00:00+09:00");
        assert_eq!(defaulted["timeZone"], "Asia/Tokyo");

        let explicit = serde_json::to_value(normalize("2025-01-15T10:00:00Z").unwrap()).unwrap();
        assert!(explicit.get("date").is_none());
        assert!(explicit.get("timeZone").is_none());

        let all_day = serde_json::to_value(normalize("2025-01-15").unwrap()).unwrap();
        assert!(all_day.get("dateTime").is_none());
        assert!(all_day.get("timeZone").is_none());
    }

    #[test]
    fn round_trip_preserves_explicit_instants() {
        let spec = normalize("2025-01-15T10:00:00+05:00").unwrap();

        let wire = serde_json::to_value(&spec).unwrap();
        let reparsed = normalize(wire["dateTime"].as_str().unwrap()).unwrap();

        assert_eq!(spec, reparsed);
    }
}

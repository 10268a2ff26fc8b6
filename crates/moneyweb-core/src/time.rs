//! Date helpers for the backend wire format and the URL codec
//!
//! The backend stores `LocalDateTime` values without an offset, so every
//! date crossing the wire is rendered as `YYYY-MM-DDTHH:MM:SS`.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Format used for dates in URL query parameters
pub const URL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format used for date-times sent to the backend
pub const WIRE_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SECONDS_PER_DAY: i64 = 86_400;

/// First instant of the day, 00:00:00
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last whole second of the day, 23:59:59
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// Render a date-time in the backend wire format
pub fn format_wire(date_time: NaiveDateTime) -> String {
    date_time.format(WIRE_DATE_TIME_FORMAT).to_string()
}

/// Render a date as it appears in the address bar
pub fn format_url_date(date: NaiveDate) -> String {
    date.format(URL_DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` query value
pub fn parse_url_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), URL_DATE_FORMAT).ok()
}

/// Parse a date coming from the backend.
///
/// Accepts plain dates, `LocalDateTime` values with or without fractional
/// seconds, and RFC 3339 timestamps.
pub fn parse_wire_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, URL_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date_time.date());
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(date_time.date());
    }
    chrono::DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.date_naive())
}

/// Whole days from `now` until the start of `target`, rounded up.
///
/// Negative when the target day has already begun in the past.
pub fn days_until(target: NaiveDate, now: NaiveDateTime) -> i64 {
    let seconds = (start_of_day(target) - now).num_seconds();
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    if seconds.rem_euclid(SECONDS_PER_DAY) != 0 {
        days + 1
    } else {
        days
    }
}

/// The `count` calendar months ending with the month of `today`, oldest first
pub fn trailing_months(today: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|offset| {
            let index = current - offset;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

/// Serde adapter for transaction dates.
///
/// Serializes as `YYYY-MM-DDT00:00:00` and deserializes any form accepted by
/// [`parse_wire_date`].
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_wire(super::start_of_day(*date)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_wire_date(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", value)))
    }
}

/// Serde adapter for goal target dates, sent as plain `YYYY-MM-DD`
pub mod plain_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_url_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_wire_date(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_full_day_span() {
        assert_eq!(format_wire(start_of_day(date(2024, 1, 1))), "2024-01-01T00:00:00");
        assert_eq!(format_wire(end_of_day(date(2024, 1, 31))), "2024-01-31T23:59:59");
    }

    #[test]
    fn test_parse_wire_date_variants() {
        assert_eq!(parse_wire_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_wire_date("2024-03-05T14:30:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_wire_date("2024-03-05T14:30:00.123"), Some(date(2024, 3, 5)));
        assert_eq!(parse_wire_date("2024-03-05T14:30"), Some(date(2024, 3, 5)));
        assert_eq!(parse_wire_date("2024-03-05T14:30:00Z"), Some(date(2024, 3, 5)));
        assert_eq!(parse_wire_date("05/03/2024"), None);
    }

    #[test]
    fn test_parse_url_date_rejects_garbage() {
        assert_eq!(parse_url_date("2024-02-30"), None);
        assert_eq!(parse_url_date("yesterday"), None);
        assert_eq!(parse_url_date(" 2024-02-29 "), Some(date(2024, 2, 29)));
    }

    #[test]
    fn test_days_until_rounds_up() {
        let now = date(2024, 5, 1).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(days_until(date(2024, 5, 2), now), 1);
        assert_eq!(days_until(date(2024, 5, 11), now), 10);
        assert_eq!(days_until(date(2024, 5, 1), now), 0);
        assert_eq!(days_until(date(2024, 4, 30), now), -1);
    }

    #[test]
    fn test_days_until_exact_midnight() {
        let now = start_of_day(date(2024, 5, 1));
        assert_eq!(days_until(date(2024, 5, 3), now), 2);
        assert_eq!(days_until(date(2024, 5, 1), now), 0);
    }

    #[test]
    fn test_trailing_months_crosses_year() {
        let months = trailing_months(date(2024, 2, 15), 4);
        assert_eq!(months, vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2)]);
    }
}

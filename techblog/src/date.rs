use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{DateError, DateResult};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Formats a timestamp as its UTC calendar date, e.g. `2024-03-05`.
///
/// Timestamps without an offset are taken to be UTC.
pub fn format_date(input: &str) -> DateResult<String> {
    parse_utc(input).map(|date| date.format("%Y-%m-%d").to_string())
}

fn parse_utc(input: &str) -> DateResult<DateTime<Utc>> {
    let s = input.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(s) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|date| date.and_utc())
        .ok_or_else(|| DateError::Invalid(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05").unwrap(), "2024-03-05");
        assert_eq!(format_date("2024-03-05T12:30:00Z").unwrap(), "2024-03-05");
        assert_eq!(format_date(" 2024-03-05T12:30:00.123 ").unwrap(), "2024-03-05");
        assert_eq!(format_date("2024-03-05T23:59").unwrap(), "2024-03-05");
        assert_eq!(format_date("2024-03-05 12:30").unwrap(), "2024-03-05");
        assert_eq!(format_date("2024-03-05 12:30:15").unwrap(), "2024-03-05");
        assert_eq!(
            format_date("Tue, 5 Mar 2024 10:00:00 +0000").unwrap(),
            "2024-03-05"
        );
    }

    #[test]
    fn test_offset_moves_to_utc() {
        assert_eq!(
            format_date("2024-03-06T01:30:00+09:00").unwrap(),
            "2024-03-05"
        );
        assert_eq!(
            format_date("2024-12-31T20:00:00-05:00").unwrap(),
            "2025-01-01"
        );
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(format_date("yesterday"), Err(DateError::Invalid(_))));
        assert!(format_date("2024-02-30").is_err());
        assert!(format_date("").is_err());
    }
}

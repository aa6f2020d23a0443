//! Timestamp parsing for provider payloads.
//!
//! The provider is inconsistent about timestamp precision: card transactions
//! usually carry full RFC 3339 instants, reimbursements often carry a bare
//! calendar date. Everything is normalised to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a provider timestamp into a UTC instant.
///
/// Accepts RFC 3339, zone-less date-times (interpreted as UTC) and bare
/// `YYYY-MM-DD` dates (midnight UTC). Returns `None` for anything else.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_instant("2025-03-01T18:30:00-08:00").unwrap();
        assert_eq!(parsed.day(), 2);
        assert_eq!(parsed.hour(), 2);
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let parsed = parse_instant("2025-03-02").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2025, 3, 2));
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn parses_zone_less_datetime() {
        let parsed = parse_instant("2025-03-02T09:15:00.250").unwrap();
        assert_eq!(parsed.minute(), 15);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("yesterday").is_none());
        assert!(parse_instant("2025-13-45").is_none());
    }
}

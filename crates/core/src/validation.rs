//! Client-side field validation for the booking form

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::{Error, Result};

/// Fixed slot time format
pub const TIME_FORMAT: &str = "%H:%M";

/// Calendar date format used on the wire and in the form
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .unwrap_or_else(|e| panic!("email pattern failed to compile: {}", e))
    })
}

/// Does the value look like a standard email address?
pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::Decode(format!("invalid date {:?}: {}", value, e)))
}

/// Parse an `HH:MM` slot time
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    // chrono accepts single-digit hours; the fixed format does not
    if trimmed.len() != 5 {
        return Err(Error::Decode(format!("invalid time {:?}: expected HH:MM", value)));
    }
    NaiveTime::parse_from_str(trimmed, TIME_FORMAT)
        .map_err(|e| Error::Decode(format!("invalid time {:?}: {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(is_valid_email("a+tag@mail.example.org"));
        assert!(!is_valid_email("jane"));
        assert!(!is_valid_email("jane@"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane doe@example.com"));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2026-11-03").unwrap(),
            NaiveDate::from_ymd_opt(2026, 11, 3).unwrap()
        );
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_date("03/11/2026").is_err());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert!(parse_time("9:30").is_err());
        assert!(parse_time("24:00").is_err());
        assert!(parse_time("10:00 AM").is_err());
    }
}

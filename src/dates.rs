//! Human date parsing for tool arguments
//!
//! Accepts `today`, `yesterday`, ISO `YYYY-MM-DD` and US `MM/DD/YYYY`.

use chrono::{Days, Local, NaiveDate};
use crate::{Error, Result};

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a date relative to today's local date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    parse_date_from(input, today())
}

/// Parse a date, resolving relative words against `today`.
pub fn parse_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => {
            return today
                .checked_sub_days(Days::new(1))
                .ok_or_else(|| Error::InvalidInput(format!("date out of range: {}", input)));
        }
        _ => {}
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%m/%d/%Y"))
        .map_err(|_| {
            Error::InvalidInput(format!(
                "unrecognized date '{}' (use YYYY-MM-DD, MM/DD/YYYY, today or yesterday)",
                input
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_relative_words() {
        let base = ymd(2024, 3, 1);
        assert_eq!(parse_date_from("today", base).unwrap(), base);
        assert_eq!(parse_date_from(" Yesterday ", base).unwrap(), ymd(2024, 2, 29));
    }

    #[test]
    fn test_iso_and_us_formats() {
        let base = ymd(2024, 1, 1);
        assert_eq!(parse_date_from("2023-11-05", base).unwrap(), ymd(2023, 11, 5));
        assert_eq!(parse_date_from("11/05/2023", base).unwrap(), ymd(2023, 11, 5));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = parse_date_from("next tuesday", ymd(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(parse_date_from("2023-13-40", ymd(2024, 1, 1)).is_err());
    }
}

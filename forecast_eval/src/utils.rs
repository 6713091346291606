//! Utility functions for the forecast_eval crate

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a calendar day from either a date or a date-time string.
/// Times are truncated to the day.
pub fn date_parser(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = s.parse::<NaiveDate>() {
        return Ok(date);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| ForecastError::DataError(format!("Unrecognised date '{}'", s)))
}

/// Parse a yes/no style flag; an empty field reads as `false`
pub fn parse_flag(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Ok(false),
        "1" | "true" | "yes" | "y" => Ok(true),
        other => Err(ForecastError::DataError(format!(
            "Unrecognised flag value '{}'",
            other
        ))),
    }
}

/// `n` consecutive days starting at `start`
pub fn daily_dates(start: NaiveDate, n: usize) -> Result<Vec<NaiveDate>> {
    (0..n as u64)
        .map(|offset| {
            start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ForecastError::InvalidParameter(format!(
                    "Date range of {} days from {} overflows",
                    n, start
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2023-11-23")]
    #[case(" 2023-11-23 ")]
    #[case("2023-11-23 18:45:00")]
    #[case("2023-11-23T08:00:00")]
    #[case("2023-11-23 08:00:00.250")]
    fn test_date_parser_accepts(#[case] input: &str) {
        assert_eq!(
            date_parser(input).unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 23).unwrap()
        );
    }

    #[test]
    fn test_date_parser_rejects_garbage() {
        assert!(date_parser("23/11/2023").is_err());
    }

    #[rstest]
    #[case("1", true)]
    #[case("TRUE", true)]
    #[case("y", true)]
    #[case("", false)]
    #[case("no", false)]
    fn test_parse_flag(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(parse_flag(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_flag_rejects_unknown() {
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_daily_dates() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 30).unwrap();
        let dates = daily_dates(start, 3).unwrap();
        assert_eq!(dates.last(), NaiveDate::from_ymd_opt(2024, 1, 1).as_ref());
        assert_eq!(dates.len(), 3);
    }
}

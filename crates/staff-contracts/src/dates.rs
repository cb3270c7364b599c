//! Date parameters
//!
//! Dates travel as `YYYY-MM-DD`. Anything else, including calendar-invalid
//! values such as `2024-02-30`, is rejected with the same message.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use staff_core::error::ValidationErrors;
use staff_core::types::{today, DATE_FORMAT};

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use YYYY-MM-DD";
pub const RANGE_REQUIRED_MESSAGE: &str = "startDate and endDate parameters are required";

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

fn invalid_date() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add_base(INVALID_DATE_MESSAGE);
    errors
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationErrors> {
    let raw = raw.trim();
    if !DATE_PATTERN.is_match(raw) {
        return Err(invalid_date());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid_date())
}

/// Optional `?date=`; absent or empty means today (UTC)
pub fn parse_date_or_today(raw: Option<&str>) -> Result<NaiveDate, ValidationErrors> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_date(raw),
        _ => Ok(today()),
    }
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Both bounds are required. A reversed window is accepted and simply
/// matches nothing.
pub fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<DateRange, ValidationErrors> {
    let (Some(start), Some(end)) = (
        start.filter(|s| !s.trim().is_empty()),
        end.filter(|s| !s.trim().is_empty()),
    ) else {
        let mut errors = ValidationErrors::new();
        errors.add_base(RANGE_REQUIRED_MESSAGE);
        return Err(errors);
    };

    Ok(DateRange {
        start: parse_date(start)?,
        end: parse_date(end)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert_eq!(
            parse_date(" 2024-06-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_other_shapes() {
        for raw in ["2024/06/01", "01-06-2024", "2024-6-1", "tomorrow", "", "2024-02-30"] {
            let errors = parse_date(raw).unwrap_err();
            assert_eq!(errors.full_messages(), vec![INVALID_DATE_MESSAGE.to_string()]);
        }
    }

    #[test]
    fn test_missing_date_defaults_to_today() {
        assert_eq!(parse_date_or_today(None).unwrap(), today());
        assert_eq!(parse_date_or_today(Some("")).unwrap(), today());
        assert!(parse_date_or_today(Some("nope")).is_err());
    }

    #[test]
    fn test_range_requires_both_bounds() {
        let errors = parse_date_range(Some("2024-06-01"), None).unwrap_err();
        assert_eq!(errors.full_messages(), vec![RANGE_REQUIRED_MESSAGE.to_string()]);
        assert!(parse_date_range(None, None).is_err());

        let errors = parse_date_range(Some("2024-06-01"), Some("june")).unwrap_err();
        assert_eq!(errors.full_messages(), vec![INVALID_DATE_MESSAGE.to_string()]);
    }

    #[test]
    fn test_range_keeps_both_bounds() {
        let range = parse_date_range(Some("2024-06-01"), Some("2024-06-30")).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
    }
}

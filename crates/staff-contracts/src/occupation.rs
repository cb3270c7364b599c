//! Occupation input contracts
//!
//! Two entry points write occupation records and they coerce rates
//! differently:
//! - today's occupation checks the raw number first, then truncates
//! - a dated record truncates first, then checks the integer

use chrono::NaiveDate;
use serde::Deserialize;
use staff_core::error::ValidationErrors;
use staff_models::{check_rate, truncate_rate, RATE_RANGE_MESSAGE};

use crate::dates::parse_date;

pub const RATE_REQUIRED_MESSAGE: &str = "Occupation rate is required";
pub const RECORD_FIELDS_REQUIRED_MESSAGE: &str = "Date and occupation rate are required";

fn base_error(message: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add_base(message);
    errors
}

/// Body of `PATCH /resources/{id}/occupation`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayOccupationInput {
    pub occupation_rate: Option<f64>,
}

impl TodayOccupationInput {
    /// Integer rate to record for today
    pub fn rate(&self) -> Result<i32, ValidationErrors> {
        let raw = self
            .occupation_rate
            .ok_or_else(|| base_error(RATE_REQUIRED_MESSAGE))?;
        check_rate(raw)?;
        Ok(truncate_rate(raw))
    }
}

/// Body of `POST /resources/{id}/occupation-records`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedOccupationInput {
    pub date: Option<String>,
    pub occupation_rate: Option<f64>,
}

impl DatedOccupationInput {
    pub fn parse(&self) -> Result<(NaiveDate, i32), ValidationErrors> {
        let (Some(raw_date), Some(raw_rate)) = (self.date.as_deref(), self.occupation_rate) else {
            return Err(base_error(RECORD_FIELDS_REQUIRED_MESSAGE));
        };

        let date = parse_date(raw_date)?;
        if raw_rate.is_nan() {
            return Err(base_error(RATE_RANGE_MESSAGE));
        }
        let rate = truncate_rate(raw_rate);
        check_rate(rate as f64)?;
        Ok((date, rate))
    }
}

//! Occupation records
//!
//! Table: occupation_records
//!
//! A record overrides a resource's default occupation rate for one calendar
//! day. Dates are `NaiveDate` in UTC, so two writes on the same day always
//! compare equal regardless of the time they were made.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use staff_core::error::ValidationErrors;
use staff_core::traits::{Entity, Id, Identifiable};
use staff_core::types::{wire_date, wire_timestamp};

pub const MIN_RATE: i32 = 0;
pub const MAX_RATE: i32 = 100;

/// Message used for every out-of-range rate
pub const RATE_RANGE_MESSAGE: &str = "Occupation rate must be between 0 and 100";

/// Range check shared by the default rate and dated records (inclusive bounds)
pub fn check_rate(rate: f64) -> Result<(), ValidationErrors> {
    if rate.is_nan() || rate < MIN_RATE as f64 || rate > MAX_RATE as f64 {
        let mut errors = ValidationErrors::new();
        errors.add_base(RATE_RANGE_MESSAGE);
        return Err(errors);
    }
    Ok(())
}

/// Integer view of a stored rate. Truncates toward zero, never rounds.
pub fn truncate_rate(rate: f64) -> i32 {
    rate.trunc() as i32
}

/// Rate for a day: the dated record if one exists, else the default.
pub fn effective_rate(record_rate: Option<i32>, default_rate: f64) -> i32 {
    record_rate.unwrap_or_else(|| truncate_rate(default_rate))
}

/// A dated occupation snapshot for one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationRecord {
    pub id: Option<Id>,

    pub resource_id: Id,

    #[serde(with = "wire_date")]
    pub date: NaiveDate,

    pub occupation_rate: i32,

    /// Project the occupation is booked against, if any
    pub project_id: Option<Id>,

    /// User who last wrote the record
    pub updated_by: Option<Id>,

    #[serde(with = "wire_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl OccupationRecord {
    pub fn new(
        resource_id: Id,
        date: NaiveDate,
        occupation_rate: i32,
        updated_by: Option<Id>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            resource_id,
            date,
            occupation_rate,
            project_id: None,
            updated_by,
            updated_at,
        }
    }

    /// Overwrite rate and audit fields in place
    pub fn overwrite(&mut self, occupation_rate: i32, updated_by: Option<Id>, now: DateTime<Utc>) {
        self.occupation_rate = occupation_rate;
        self.updated_by = updated_by;
        self.updated_at = now;
    }
}

impl Identifiable for OccupationRecord {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for OccupationRecord {
    const TYPE_NAME: &'static str = "OccupationRecord";
}

//! Occupation representers

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use staff_core::traits::Id;
use staff_core::types::{wire_date, wire_timestamp};
use staff_models::OccupationRecord;
use staff_services::OccupationEntry;

/// Response of the "record today" endpoint; `id` is the resource id
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayOccupationRepresentation {
    pub id: Id,
    pub occupation_rate: i32,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
}

impl From<&OccupationRecord> for TodayOccupationRepresentation {
    fn from(record: &OccupationRecord) -> Self {
        Self {
            id: record.resource_id,
            occupation_rate: record.occupation_rate,
            date: record.date,
        }
    }
}

/// A stored record with its writer's email
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationEntryRepresentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub resource_id: Id,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    pub occupation_rate: i32,
    #[serde(with = "wire_timestamp")]
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

impl OccupationEntryRepresentation {
    /// Listing rows carry no record id
    pub fn listing(entry: OccupationEntry) -> Self {
        Self {
            id: None,
            ..Self::from(entry)
        }
    }
}

impl From<OccupationEntry> for OccupationEntryRepresentation {
    fn from(entry: OccupationEntry) -> Self {
        let record = entry.record;
        Self {
            id: record.id,
            resource_id: record.resource_id,
            date: record.date,
            occupation_rate: record.occupation_rate,
            updated_at: record.updated_at,
            updated_by: entry.updated_by_email,
        }
    }
}

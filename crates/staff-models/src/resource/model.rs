//! Resource model
//!
//! Table: resources
//!
//! A resource is a staff member that can be assigned to projects. It carries
//! a default occupation rate and a date-ordered history of occupation
//! records that override the default for single days.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use staff_core::error::ValidationErrors;
use staff_core::traits::{Entity, Id, Identifiable};
use validator::Validate;

use super::occupation::{check_rate, effective_rate, truncate_rate, OccupationRecord, MAX_RATE};

/// Resource entity
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: Option<Id>,

    pub full_name: String,

    /// Job title
    pub position: Option<String>,

    pub skills: Vec<String>,

    /// Default occupation rate; only written through
    /// [`Resource::set_default_occupation_rate`]
    occupation_rate: f64,

    /// Always `100 - occupation_rate` after the setter ran
    availability_rate: f64,

    pub pole_id: Option<Id>,

    /// User responsible for staffing this resource
    pub project_manager_id: Option<Id>,

    /// Authoritative side of the resource <-> project association
    pub project_ids: BTreeSet<Id>,

    pub avatar: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,

    /// Sorted by date, at most one record per date
    occupation_records: Vec<OccupationRecord>,
}

impl Resource {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            id: None,
            full_name: full_name.into(),
            position: None,
            skills: Vec::new(),
            occupation_rate: 0.0,
            availability_rate: MAX_RATE as f64,
            pole_id: None,
            project_manager_id: None,
            project_ids: BTreeSet::new(),
            avatar: None,
            created_at: Utc::now(),
            updated_at: None,
            occupation_records: Vec::new(),
        }
    }

    /// Rebuild the stored rate pair when loading from storage.
    ///
    /// Storage is trusted as-is; use the setter for any write.
    pub fn with_stored_rates(mut self, occupation_rate: f64, availability_rate: f64) -> Self {
        self.occupation_rate = occupation_rate;
        self.availability_rate = availability_rate;
        self
    }

    /// Attach a loaded record history. Sorts by date; on duplicate dates the
    /// most recently updated record wins.
    pub fn with_occupation_records(mut self, mut records: Vec<OccupationRecord>) -> Self {
        records.sort_by(|a, b| a.date.cmp(&b.date).then(b.updated_at.cmp(&a.updated_at)));
        records.dedup_by_key(|r| r.date);
        self.occupation_records = records;
        self
    }

    pub fn occupation_rate(&self) -> f64 {
        self.occupation_rate
    }

    pub fn availability_rate(&self) -> f64 {
        self.availability_rate
    }

    /// Default rate as the integer used on the wire
    pub fn default_rate_percent(&self) -> i32 {
        truncate_rate(self.occupation_rate)
    }

    /// Set the default occupation rate and its complement together.
    ///
    /// Out-of-range input leaves the resource untouched.
    pub fn set_default_occupation_rate(&mut self, rate: f64) -> Result<(), ValidationErrors> {
        check_rate(rate)?;
        self.occupation_rate = rate;
        self.availability_rate = MAX_RATE as f64 - rate;
        self.touch();
        Ok(())
    }

    pub fn occupation_records(&self) -> &[OccupationRecord] {
        &self.occupation_records
    }

    pub fn record_for_date(&self, date: NaiveDate) -> Option<&OccupationRecord> {
        self.occupation_records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|idx| &self.occupation_records[idx])
    }

    /// Occupancy on `date`: the dated record, else the default rate
    pub fn occupation_rate_for_date(&self, date: NaiveDate) -> i32 {
        effective_rate(
            self.record_for_date(date).map(|r| r.occupation_rate),
            self.occupation_rate,
        )
    }

    /// Upsert the record for `date`. The default rate and availability are
    /// not affected.
    pub fn record_occupation_for_date(
        &mut self,
        date: NaiveDate,
        rate: i32,
        acting_user: Option<Id>,
        now: DateTime<Utc>,
    ) -> Result<&OccupationRecord, ValidationErrors> {
        check_rate(rate as f64)?;

        let idx = match self
            .occupation_records
            .binary_search_by_key(&date, |r| r.date)
        {
            Ok(idx) => {
                self.occupation_records[idx].overwrite(rate, acting_user, now);
                idx
            }
            Err(idx) => {
                let resource_id = self.id.unwrap_or_default();
                self.occupation_records.insert(
                    idx,
                    OccupationRecord::new(resource_id, date, rate, acting_user, now),
                );
                idx
            }
        };

        Ok(&self.occupation_records[idx])
    }

    pub fn add_skill(&mut self, skill: impl Into<String>) {
        let skill = skill.into();
        if !self.skills.contains(&skill) {
            self.skills.push(skill);
        }
    }

    /// Idempotent add; returns whether the set changed
    pub fn add_project(&mut self, project_id: Id) -> bool {
        self.project_ids.insert(project_id)
    }

    /// Idempotent remove; returns whether the set changed
    pub fn remove_project(&mut self, project_id: Id) -> bool {
        self.project_ids.remove(&project_id)
    }

    pub fn has_project(&self, project_id: Id) -> bool {
        self.project_ids.contains(&project_id)
    }

    /// Avatar URL, or the placeholder derived from the id
    pub fn avatar_or_placeholder(&self, placeholder_prefix: &str) -> String {
        match self.avatar.as_deref() {
            Some(avatar) if !avatar.is_empty() => avatar.to_string(),
            _ => format!("{}{}", placeholder_prefix, self.id.unwrap_or_default()),
        }
    }

    /// Apply the scalar attributes of an update. Pole and project changes
    /// need lookups and are handled by the caller.
    pub fn apply_changes(&mut self, changes: &ResourceChanges) -> Result<(), ValidationErrors> {
        if let Some(rate) = changes.occupation_rate {
            self.set_default_occupation_rate(rate)?;
        }
        if let Some(ref full_name) = changes.full_name {
            self.full_name = full_name.clone();
        }
        if let Some(ref position) = changes.position {
            self.position = Some(position.clone());
        }
        if let Some(ref avatar) = changes.avatar {
            self.avatar = Some(avatar.clone());
        }
        if let Some(ref skills) = changes.skills {
            self.skills = Vec::new();
            for skill in skills {
                self.add_skill(skill.clone());
            }
        }
        self.touch();
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl Identifiable for Resource {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Entity for Resource {
    const TYPE_NAME: &'static str = "Resource";
}

/// Resource creation parameters
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,

    #[validate(length(max = 255))]
    pub position: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub occupation_rate: Option<f64>,

    #[validate(length(max = 255))]
    pub avatar: Option<String>,

    pub pole_id: Option<Id>,

    #[serde(default)]
    pub project_ids: Vec<Id>,
}

/// Partial resource update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResourceChanges {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,

    #[validate(length(max = 255))]
    pub position: Option<String>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub occupation_rate: Option<f64>,

    #[validate(length(max = 255))]
    pub avatar: Option<String>,

    pub skills: Option<Vec<String>>,

    pub pole_id: Option<Id>,

    /// Replaces the whole project set when present
    pub project_ids: Option<Vec<Id>>,
}

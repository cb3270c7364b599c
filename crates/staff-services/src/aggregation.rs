//! Pole-grouped resource view
//!
//! One join-fetch from the store, then a pure grouping step: groups sorted
//! by pole name, resources by full name, pole-less resources under the
//! configured "Unassigned" name.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use staff_core::config::StaffingConfig;
use staff_core::result::StaffResult;
use staff_core::traits::Id;
use staff_core::types::format_date;
use staff_db::{ResourceSnapshot, ResourceStore};
use staff_models::effective_rate;

use crate::base::SharedStore;

/// One resource inside a pole group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: Id,
    pub name: String,
    pub title: Option<String>,
    pub avatar: String,
    /// Occupancy on the requested date
    pub occupation_rate: i32,
    /// Complement of the default rate; not date-specific
    pub availability_rate: f64,
    pub skills: Vec<String>,
    pub project_manager: Option<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoleGroup {
    pub name: String,
    pub employees: Vec<EmployeeView>,
}

fn employee(snapshot: ResourceSnapshot, config: &StaffingConfig) -> EmployeeView {
    let avatar = match snapshot.avatar {
        Some(avatar) if !avatar.is_empty() => avatar,
        _ => format!("{}{}", config.avatar_placeholder_url, snapshot.id),
    };

    EmployeeView {
        id: snapshot.id,
        name: snapshot.full_name,
        title: snapshot.position,
        avatar,
        occupation_rate: effective_rate(snapshot.dated_rate, snapshot.occupation_rate),
        availability_rate: snapshot.availability_rate,
        skills: snapshot.skills,
        project_manager: snapshot.project_manager_name,
        projects: snapshot.project_names,
    }
}

/// Group snapshots by pole name.
///
/// Ordering does not depend on the input order.
pub fn group_by_pole(snapshots: Vec<ResourceSnapshot>, config: &StaffingConfig) -> Vec<PoleGroup> {
    let mut groups: BTreeMap<String, Vec<EmployeeView>> = BTreeMap::new();

    for snapshot in snapshots {
        let pole = snapshot
            .pole_name
            .clone()
            .unwrap_or_else(|| config.unassigned_pole_name.clone());
        groups.entry(pole).or_default().push(employee(snapshot, config));
    }

    groups
        .into_iter()
        .map(|(name, mut employees)| {
            employees.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            PoleGroup { name, employees }
        })
        .collect()
}

#[derive(Clone)]
pub struct AggregationService {
    store: SharedStore,
    config: StaffingConfig,
}

impl AggregationService {
    pub fn new(store: SharedStore, config: StaffingConfig) -> Self {
        Self { store, config }
    }

    pub async fn grouped_by_pole(&self, date: NaiveDate) -> StaffResult<Vec<PoleGroup>> {
        let snapshots = self.store.snapshots_for_date(date).await?;
        let count = snapshots.len();
        let groups = group_by_pole(snapshots, &self.config);

        tracing::debug!(
            date = %format_date(date),
            resources = count,
            poles = groups.len(),
            "resources grouped by pole"
        );
        Ok(groups)
    }
}

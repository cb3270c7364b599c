//! Occupation service
//!
//! Writes go through the engine on [`Resource`] for validation and then
//! through the store's atomic upsert, so two writes for the same day always
//! leave exactly one record.

use chrono::{NaiveDate, Utc};
use staff_contracts::dates::DateRange;
use staff_core::result::StaffResult;
use staff_core::traits::Id;
use staff_core::types::{format_date, today};
use staff_db::{OccupationStore, ResourceStore, UserStore};
use staff_models::{OccupationRecord, Resource};

use crate::base::{require_resource, SharedStore};

/// Occupation record as reported by the range listing
#[derive(Debug, Clone, PartialEq)]
pub struct OccupationEntry {
    pub record: OccupationRecord,
    pub updated_by_email: Option<String>,
}

#[derive(Clone)]
pub struct OccupationService {
    store: SharedStore,
}

impl OccupationService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Set the default rate; availability follows as `100 - rate`
    pub async fn set_default_rate(&self, resource_id: Id, rate: f64) -> StaffResult<Resource> {
        let mut resource = require_resource(&*self.store, resource_id).await?;
        resource.set_default_occupation_rate(rate)?;
        self.store.save_resource(&resource).await?;

        tracing::info!(resource_id, rate, "default occupation rate updated");
        Ok(resource)
    }

    /// Upsert the record for (`resource_id`, `date`)
    pub async fn record_for_date(
        &self,
        resource_id: Id,
        date: NaiveDate,
        rate: i32,
        acting_user: Id,
    ) -> StaffResult<OccupationRecord> {
        let mut resource = require_resource(&*self.store, resource_id).await?;
        let record = resource
            .record_occupation_for_date(date, rate, Some(acting_user), Utc::now())?
            .clone();

        let stored = self.store.upsert_occupation(&record).await?;

        tracing::info!(
            resource_id,
            date = %format_date(date),
            rate,
            acting_user,
            "occupation recorded"
        );
        Ok(stored)
    }

    /// Like [`Self::record_for_date`], with the writer's email resolved for
    /// the response
    pub async fn record_entry_for_date(
        &self,
        resource_id: Id,
        date: NaiveDate,
        rate: i32,
        acting_user: Id,
    ) -> StaffResult<OccupationEntry> {
        let record = self
            .record_for_date(resource_id, date, rate, acting_user)
            .await?;
        let updated_by_email = match record.updated_by {
            Some(user_id) => self.store.find_user(user_id).await?.map(|u| u.email),
            None => None,
        };
        Ok(OccupationEntry {
            record,
            updated_by_email,
        })
    }

    /// Upsert today's record (UTC day)
    pub async fn record_today(
        &self,
        resource_id: Id,
        rate: i32,
        acting_user: Id,
    ) -> StaffResult<OccupationRecord> {
        self.record_for_date(resource_id, today(), rate, acting_user)
            .await
    }

    /// Occupancy on `date`: the dated record, else the default rate
    pub async fn rate_for_date(&self, resource_id: Id, date: NaiveDate) -> StaffResult<i32> {
        let resource = require_resource(&*self.store, resource_id).await?;
        let record = self.store.occupation_for_date(resource_id, date).await?;
        let resource = resource.with_occupation_records(record.into_iter().collect());
        Ok(resource.occupation_rate_for_date(date))
    }

    /// Records inside `range`. Records whose resource is gone are dropped.
    pub async fn records_between(&self, range: DateRange) -> StaffResult<Vec<OccupationEntry>> {
        let listings = self
            .store
            .occupation_between(range.start, range.end)
            .await?;

        let mut entries = Vec::with_capacity(listings.len());
        for listing in listings {
            if !listing.resource_found {
                tracing::warn!(
                    record_id = ?listing.record.id,
                    resource_id = listing.record.resource_id,
                    "occupation record has no associated resource, skipping"
                );
                continue;
            }
            entries.push(OccupationEntry {
                record: listing.record,
                updated_by_email: listing.updated_by_email,
            });
        }

        tracing::debug!(
            start = %format_date(range.start),
            end = %format_date(range.end),
            count = entries.len(),
            "occupation records listed"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use staff_core::error::StaffError;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_rate_for_date_scenario() {
        let store = fixtures::store();
        let user = fixtures::user(&store, "a@example.com", "User", "A").await;
        let rid = fixtures::resource(&store, "R", None, 30.0).await;
        let service = OccupationService::new(store.clone());

        assert_eq!(service.rate_for_date(rid, day(1)).await.unwrap(), 30);

        service.record_for_date(rid, day(1), 80, user).await.unwrap();
        assert_eq!(service.rate_for_date(rid, day(1)).await.unwrap(), 80);

        let resource = store.find_resource(rid).await.unwrap().unwrap();
        assert_eq!(resource.availability_rate(), 70.0);
        assert_eq!(resource.occupation_rate(), 30.0);
    }

    #[tokio::test]
    async fn test_second_write_same_day_overwrites() {
        let store = fixtures::store();
        let first_writer = fixtures::user(&store, "a@example.com", "User", "A").await;
        let second_writer = fixtures::user(&store, "b@example.com", "User", "B").await;
        let rid = fixtures::resource(&store, "R", None, 0.0).await;
        let service = OccupationService::new(store.clone());

        let first = service.record_for_date(rid, day(2), 20, first_writer).await.unwrap();
        let second = service.record_for_date(rid, day(2), 60, second_writer).await.unwrap();

        assert_eq!(first.id, second.id);
        let records = store.occupation_between(day(2), day(2)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.occupation_rate, 60);
        assert_eq!(records[0].record.updated_by, Some(second_writer));
    }

    #[tokio::test]
    async fn test_out_of_range_rate_changes_nothing() {
        let store = fixtures::store();
        let rid = fixtures::resource(&store, "R", None, 40.0).await;
        let service = OccupationService::new(store.clone());

        for rate in [-1, 101] {
            let err = service.record_for_date(rid, day(3), rate, 1).await.unwrap_err();
            assert!(matches!(err, StaffError::Validation(_)));
        }
        for rate in [-1.0, 101.0] {
            let err = service.set_default_rate(rid, rate).await.unwrap_err();
            assert_eq!(err.status_code(), 400);
        }

        let resource = store.find_resource(rid).await.unwrap().unwrap();
        assert_eq!(resource.occupation_rate(), 40.0);
        assert_eq!(resource.availability_rate(), 60.0);
        assert!(store.occupation_between(day(1), day(30)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_boundaries_accepted() {
        let store = fixtures::store();
        let user = fixtures::user(&store, "a@example.com", "User", "A").await;
        let rid = fixtures::resource(&store, "R", None, 0.0).await;
        let service = OccupationService::new(store);

        for rate in [0.0, 100.0] {
            let resource = service.set_default_rate(rid, rate).await.unwrap();
            assert_eq!(resource.availability_rate(), 100.0 - rate);
        }
        assert_eq!(service.record_for_date(rid, day(4), 0, user).await.unwrap().occupation_rate, 0);
        assert_eq!(service.record_for_date(rid, day(5), 100, user).await.unwrap().occupation_rate, 100);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let service = OccupationService::new(fixtures::store());
        let err = service.record_for_date(9, day(1), 10, 1).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(service.rate_for_date(9, day(1)).await.unwrap_err().status_code(), 404);
    }

    #[tokio::test]
    async fn test_record_today_upserts() {
        let store = fixtures::store();
        let user = fixtures::user(&store, "a@example.com", "User", "A").await;
        let rid = fixtures::resource(&store, "R", None, 0.0).await;
        let service = OccupationService::new(store.clone());

        service.record_today(rid, 10, user).await.unwrap();
        let record = service.record_today(rid, 55, user).await.unwrap();

        assert_eq!(record.date, today());
        assert_eq!(service.rate_for_date(rid, today()).await.unwrap(), 55);
        assert_eq!(store.occupation_between(today(), today()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_records_between_is_inclusive_and_reports_email() {
        let store = fixtures::store();
        let user = fixtures::user(&store, "pm@example.com", "P", "M").await;
        let rid = fixtures::resource(&store, "R", None, 0.0).await;
        let service = OccupationService::new(store);

        for d in [1, 5, 10, 11] {
            service.record_for_date(rid, day(d), 10, user).await.unwrap();
        }

        let entries = service
            .records_between(DateRange { start: day(5), end: day(10) })
            .await
            .unwrap();
        let dates: Vec<_> = entries.iter().map(|e| e.record.date).collect();
        assert_eq!(dates, vec![day(5), day(10)]);
        assert_eq!(entries[0].updated_by_email.as_deref(), Some("pm@example.com"));
    }

    #[tokio::test]
    async fn test_record_entry_resolves_writer_email() {
        let store = fixtures::store();
        let user = fixtures::user(&store, "pm@example.com", "Pat", "M").await;
        let rid = fixtures::resource(&store, "R", None, 0.0).await;
        let service = OccupationService::new(store);

        let entry = service
            .record_entry_for_date(rid, day(3), 40, user)
            .await
            .unwrap();
        assert_eq!(entry.record.occupation_rate, 40);
        assert_eq!(entry.updated_by_email.as_deref(), Some("pm@example.com"));

        let err = service
            .record_entry_for_date(rid, day(3), 50, 999)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(service.rate_for_date(rid, day(3)).await.unwrap(), 40);
    }
}

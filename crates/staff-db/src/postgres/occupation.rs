//! Occupation record queries

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use staff_core::traits::Id;
use staff_models::OccupationRecord;

use super::PgStore;
use crate::repository::RepositoryResult;
use crate::store::{OccupationListing, OccupationStore};

/// Occupation record database entity
#[derive(Debug, Clone, FromRow)]
pub struct OccupationRow {
    pub id: i64,
    pub resource_id: i64,
    pub date: NaiveDate,
    pub occupation_rate: i32,
    pub project_id: Option<i64>,
    pub updated_by: Option<i64>,
    pub updated_at: DateTime<Utc>,
}

impl From<OccupationRow> for OccupationRecord {
    fn from(row: OccupationRow) -> Self {
        OccupationRecord {
            id: Some(row.id),
            resource_id: row.resource_id,
            date: row.date,
            occupation_rate: row.occupation_rate,
            project_id: row.project_id,
            updated_by: row.updated_by,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    record: OccupationRow,
    resource_found: bool,
    updated_by_email: Option<String>,
}

#[async_trait]
impl OccupationStore for PgStore {
    async fn upsert_occupation(
        &self,
        record: &OccupationRecord,
    ) -> RepositoryResult<OccupationRecord> {
        let row = sqlx::query_as::<_, OccupationRow>(
            r#"
            INSERT INTO occupation_records
                (resource_id, date, occupation_rate, project_id, updated_by, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (resource_id, date) DO UPDATE SET
                occupation_rate = EXCLUDED.occupation_rate,
                project_id = COALESCE(EXCLUDED.project_id, occupation_records.project_id),
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING id, resource_id, date, occupation_rate, project_id, updated_by, updated_at
            "#,
        )
        .bind(record.resource_id)
        .bind(record.date)
        .bind(record.occupation_rate)
        .bind(record.project_id)
        .bind(record.updated_by)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn occupation_for_date(
        &self,
        resource_id: Id,
        date: NaiveDate,
    ) -> RepositoryResult<Option<OccupationRecord>> {
        let row = sqlx::query_as::<_, OccupationRow>(
            r#"
            SELECT id, resource_id, date, occupation_rate, project_id, updated_by, updated_at
            FROM occupation_records
            WHERE resource_id = $1 AND date = $2
            "#,
        )
        .bind(resource_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OccupationRecord::from))
    }

    async fn occupation_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<OccupationListing>> {
        let rows = sqlx::query_as::<_, ListingRow>(
            r#"
            SELECT
                o.id, o.resource_id, o.date, o.occupation_rate, o.project_id,
                o.updated_by, o.updated_at,
                (r.id IS NOT NULL) AS resource_found,
                u.email AS updated_by_email
            FROM occupation_records o
            LEFT JOIN resources r ON r.id = o.resource_id
            LEFT JOIN users u ON u.id = o.updated_by
            WHERE o.date BETWEEN $1 AND $2
            ORDER BY o.date ASC, o.resource_id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| OccupationListing {
                record: row.record.into(),
                resource_found: row.resource_found,
                updated_by_email: row.updated_by_email,
            })
            .collect())
    }
}

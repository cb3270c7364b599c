//! Resource queries
//!
//! Membership lives only in `resource_projects`; a resource row carries its
//! project ids through an array subquery.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, Postgres, Transaction};
use staff_core::traits::Id;
use staff_models::Resource;

use super::PgStore;
use crate::repository::{RepositoryError, RepositoryResult};
use crate::store::{ResourceSnapshot, ResourceStore};

const RESOURCE_COLUMNS: &str = r#"
    r.id, r.full_name, r.position, r.skills, r.occupation_rate, r.availability_rate,
    r.pole_id, r.project_manager_id, r.avatar, r.created_at, r.updated_at,
    ARRAY(
        SELECT rp.project_id FROM resource_projects rp
        WHERE rp.resource_id = r.id
        ORDER BY rp.project_id
    ) AS project_ids
"#;

/// Resource database entity
#[derive(Debug, Clone, FromRow)]
pub struct ResourceRow {
    pub id: i64,
    pub full_name: String,
    pub position: Option<String>,
    pub skills: Vec<String>,
    pub occupation_rate: f64,
    pub availability_rate: f64,
    pub pole_id: Option<i64>,
    pub project_manager_id: Option<i64>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub project_ids: Vec<i64>,
}

impl From<ResourceRow> for Resource {
    fn from(row: ResourceRow) -> Self {
        let mut resource = Resource::new(row.full_name)
            .with_stored_rates(row.occupation_rate, row.availability_rate);
        resource.id = Some(row.id);
        resource.position = row.position;
        resource.skills = row.skills;
        resource.pole_id = row.pole_id;
        resource.project_manager_id = row.project_manager_id;
        resource.avatar = row.avatar;
        resource.created_at = row.created_at;
        resource.updated_at = row.updated_at;
        resource.project_ids = row.project_ids.into_iter().collect();
        resource
    }
}

/// Make `resource_projects` for `resource_id` equal `project_ids`
async fn sync_projects(
    tx: &mut Transaction<'_, Postgres>,
    resource_id: Id,
    project_ids: &[Id],
) -> RepositoryResult<()> {
    sqlx::query(
        "DELETE FROM resource_projects WHERE resource_id = $1 AND NOT (project_id = ANY($2))",
    )
    .bind(resource_id)
    .bind(project_ids)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO resource_projects (resource_id, project_id)
        SELECT $1, UNNEST($2::bigint[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(resource_id)
    .bind(project_ids)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn list_resources(&self) -> RepositoryResult<Vec<Resource>> {
        let sql = format!("SELECT {RESOURCE_COLUMNS} FROM resources r ORDER BY r.full_name ASC");
        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Resource::from).collect())
    }

    async fn find_resource(&self, id: Id) -> RepositoryResult<Option<Resource>> {
        let sql = format!("SELECT {RESOURCE_COLUMNS} FROM resources r WHERE r.id = $1");
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Resource::from))
    }

    async fn resources_in_project(&self, project_id: Id) -> RepositoryResult<Vec<Resource>> {
        let sql = format!(
            r#"
            SELECT {RESOURCE_COLUMNS}
            FROM resources r
            JOIN resource_projects m ON m.resource_id = r.id
            WHERE m.project_id = $1
            ORDER BY r.full_name ASC
            "#
        );
        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Resource::from).collect())
    }

    async fn create_resource(&self, resource: Resource) -> RepositoryResult<Resource> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO resources (
                full_name, position, skills, occupation_rate, availability_rate,
                pole_id, project_manager_id, avatar, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&resource.full_name)
        .bind(resource.position.as_deref())
        .bind(&resource.skills)
        .bind(resource.occupation_rate())
        .bind(resource.availability_rate())
        .bind(resource.pole_id)
        .bind(resource.project_manager_id)
        .bind(resource.avatar.as_deref())
        .bind(resource.created_at)
        .bind(resource.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        let project_ids: Vec<Id> = resource.project_ids.iter().copied().collect();
        sync_projects(&mut tx, id, &project_ids).await?;
        tx.commit().await?;

        tracing::debug!(resource_id = id, "resource created");

        let mut created = resource.with_occupation_records(Vec::new());
        created.id = Some(id);
        Ok(created)
    }

    async fn save_resource(&self, resource: &Resource) -> RepositoryResult<()> {
        let id = resource
            .id
            .ok_or_else(|| RepositoryError::not_found("Resource", 0))?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE resources SET
                full_name = $2,
                position = $3,
                skills = $4,
                occupation_rate = $5,
                availability_rate = $6,
                pole_id = $7,
                project_manager_id = $8,
                avatar = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&resource.full_name)
        .bind(resource.position.as_deref())
        .bind(&resource.skills)
        .bind(resource.occupation_rate())
        .bind(resource.availability_rate())
        .bind(resource.pole_id)
        .bind(resource.project_manager_id)
        .bind(resource.avatar.as_deref())
        .bind(resource.updated_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Resource", id));
        }

        let project_ids: Vec<Id> = resource.project_ids.iter().copied().collect();
        sync_projects(&mut tx, id, &project_ids).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn delete_resource(&self, id: Id) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_membership(&self, resource_id: Id, project_id: Id) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO resource_projects (resource_id, project_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(resource_id)
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove_membership(&self, resource_id: Id, project_id: Id) -> RepositoryResult<bool> {
        let result = sqlx::query(
            "DELETE FROM resource_projects WHERE resource_id = $1 AND project_id = $2",
        )
        .bind(resource_id)
        .bind(project_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn snapshots_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<ResourceSnapshot>> {
        let rows = sqlx::query_as::<_, ResourceSnapshot>(
            r#"
            SELECT
                r.id, r.full_name, r.position, r.avatar,
                r.occupation_rate, r.availability_rate, r.skills,
                p.name::text AS pole_name,
                NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS project_manager_name,
                o.occupation_rate AS dated_rate,
                ARRAY(
                    SELECT pr.name::text
                    FROM resource_projects rp
                    JOIN projects pr ON pr.id = rp.project_id
                    WHERE rp.resource_id = r.id
                    ORDER BY pr.name
                ) AS project_names
            FROM resources r
            LEFT JOIN poles p ON p.id = r.pole_id
            LEFT JOIN users u ON u.id = r.project_manager_id
            LEFT JOIN occupation_records o ON o.resource_id = r.id AND o.date = $1
            ORDER BY p.name ASC NULLS LAST, r.full_name ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

//! User and access-grant queries

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Postgres, Transaction};
use staff_core::traits::Id;
use staff_core::types::UserStatus;
use staff_models::{ProjectAccess, User};

use super::PgStore;
use crate::repository::{RepositoryError, RepositoryResult};
use crate::store::UserStore;

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, status, is_active, position, skills, created_at";

/// User database entity
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: String,
    pub is_active: bool,
    pub position: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, project_access: Vec<ProjectAccess>) -> User {
        let status = self.status.parse().unwrap_or_else(|err| {
            tracing::warn!(user_id = self.id, "{err}; treating as pending");
            UserStatus::Pending
        });

        User {
            id: Some(self.id),
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            status,
            is_active: self.is_active,
            position: self.position,
            skills: self.skills,
            created_at: self.created_at,
            project_access,
        }
    }
}

/// Access grant database entity
#[derive(Debug, Clone, FromRow)]
pub struct GrantRow {
    pub user_id: i64,
    pub project_id: i64,
    pub can_edit: bool,
    pub can_consult: bool,
}

impl From<&GrantRow> for ProjectAccess {
    fn from(row: &GrantRow) -> Self {
        ProjectAccess::new(row.project_id, row.can_edit, row.can_consult)
    }
}

impl PgStore {
    async fn grants_for(&self, user_ids: &[Id]) -> RepositoryResult<BTreeMap<Id, Vec<ProjectAccess>>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT user_id, project_id, can_edit, can_consult
            FROM user_project_access
            WHERE user_id = ANY($1)
            ORDER BY user_id, project_id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grants: BTreeMap<Id, Vec<ProjectAccess>> = BTreeMap::new();
        for row in &rows {
            grants.entry(row.user_id).or_default().push(row.into());
        }
        Ok(grants)
    }
}

/// Make `user_project_access` for `user_id` equal `grants`
async fn sync_grants(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Id,
    grants: &[ProjectAccess],
) -> RepositoryResult<()> {
    let project_ids: Vec<Id> = grants.iter().map(|g| g.project_id).collect();
    let can_edit: Vec<bool> = grants.iter().map(|g| g.can_edit).collect();
    let can_consult: Vec<bool> = grants.iter().map(|g| g.can_consult).collect();

    sqlx::query(
        "DELETE FROM user_project_access WHERE user_id = $1 AND NOT (project_id = ANY($2))",
    )
    .bind(user_id)
    .bind(&project_ids)
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO user_project_access (user_id, project_id, can_edit, can_consult)
        SELECT $1, g.project_id, g.can_edit, g.can_consult
        FROM UNNEST($2::bigint[], $3::bool[], $4::bool[]) AS g(project_id, can_edit, can_consult)
        ON CONFLICT (user_id, project_id) DO UPDATE SET
            can_edit = EXCLUDED.can_edit,
            can_consult = EXCLUDED.can_consult
        "#,
    )
    .bind(user_id)
    .bind(&project_ids)
    .bind(&can_edit)
    .bind(&can_consult)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Id> = rows.iter().map(|r| r.id).collect();
        let mut grants = self.grants_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let access = grants.remove(&row.id).unwrap_or_default();
                row.into_user(access)
            })
            .collect())
    }

    async fn find_user(&self, id: Id) -> RepositoryResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let access = self.grants_for(&[id]).await?.remove(&id).unwrap_or_default();
        Ok(Some(row.into_user(access)))
    }

    async fn create_user(&self, user: User) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users
                (email, first_name, last_name, status, is_active, position, skills, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.status.as_str())
        .bind(user.is_active)
        .bind(user.position.as_deref())
        .bind(&user.skills)
        .bind(user.created_at)
        .fetch_one(&mut *tx)
        .await?;

        sync_grants(&mut tx, id, &user.project_access).await?;
        tx.commit().await?;

        Ok(User {
            id: Some(id),
            ..user
        })
    }

    async fn save_user(&self, user: &User) -> RepositoryResult<()> {
        let id = user.id.ok_or_else(|| RepositoryError::not_found("User", 0))?;

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE users SET
                first_name = $2,
                last_name = $3,
                status = $4,
                is_active = $5,
                position = $6,
                skills = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.status.as_str())
        .bind(user.is_active)
        .bind(user.position.as_deref())
        .bind(&user.skills)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("User", id));
        }

        sync_grants(&mut tx, id, &user.project_access).await?;
        tx.commit().await?;

        tracing::debug!(user_id = id, grants = user.project_access.len(), "user saved");
        Ok(())
    }

    async fn upsert_grant(&self, user_id: Id, access: ProjectAccess) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_project_access (user_id, project_id, can_edit, can_consult)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, project_id) DO UPDATE SET
                can_edit = EXCLUDED.can_edit,
                can_consult = EXCLUDED.can_consult
            "#,
        )
        .bind(user_id)
        .bind(access.project_id)
        .bind(access.can_edit)
        .bind(access.can_consult)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

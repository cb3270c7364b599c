//! Pole queries

use async_trait::async_trait;
use sqlx::FromRow;
use staff_core::traits::Id;
use staff_models::Pole;

use super::PgStore;
use crate::repository::RepositoryResult;
use crate::store::PoleStore;

#[derive(Debug, Clone, FromRow)]
pub struct PoleRow {
    pub id: i64,
    pub name: String,
}

impl From<PoleRow> for Pole {
    fn from(row: PoleRow) -> Self {
        Pole {
            id: Some(row.id),
            name: row.name,
        }
    }
}

#[async_trait]
impl PoleStore for PgStore {
    async fn list_poles(&self) -> RepositoryResult<Vec<Pole>> {
        let rows = sqlx::query_as::<_, PoleRow>("SELECT id, name FROM poles ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Pole::from).collect())
    }

    async fn find_pole(&self, id: Id) -> RepositoryResult<Option<Pole>> {
        let row = sqlx::query_as::<_, PoleRow>("SELECT id, name FROM poles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Pole::from))
    }

    async fn create_pole(&self, pole: Pole) -> RepositoryResult<Pole> {
        let row = sqlx::query_as::<_, PoleRow>(
            "INSERT INTO poles (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&pole.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

//! Project queries

use async_trait::async_trait;
use sqlx::FromRow;
use staff_core::traits::Id;
use staff_models::Project;

use super::PgStore;
use crate::repository::RepositoryResult;
use crate::store::ProjectStore;

/// Project database entity
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub required_skills: Vec<String>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: Some(row.id),
            code: row.code,
            name: row.name,
            required_skills: row.required_skills,
        }
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, code, name, required_skills FROM projects ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn find_project(&self, id: Id) -> RepositoryResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, code, name, required_skills FROM projects WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Project::from))
    }

    async fn find_projects(&self, ids: &[Id]) -> RepositoryResult<Vec<Project>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, code, name, required_skills
            FROM projects
            WHERE id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create_project(&self, project: Project) -> RepositoryResult<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (code, name, required_skills)
            VALUES ($1, $2, $3)
            RETURNING id, code, name, required_skills
            "#,
        )
        .bind(&project.code)
        .bind(&project.name)
        .bind(&project.required_skills)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}

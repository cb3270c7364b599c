//! PostgreSQL store
//!
//! Raw SQL with `sqlx::query_as`; one file per aggregate. Multi-table writes
//! run inside a transaction that is rolled back when dropped uncommitted.

mod occupation;
mod poles;
mod projects;
mod resources;
mod users;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::repository::RepositoryResult;
use crate::store::StaffingStore;

pub use occupation::OccupationRow;
pub use poles::PoleRow;
pub use projects::ProjectRow;
pub use resources::ResourceRow;
pub use users::{GrantRow, UserRow};

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StaffingStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

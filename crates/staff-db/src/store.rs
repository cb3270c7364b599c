//! Storage traits
//!
//! One trait per aggregate. Services depend on [`StaffingStore`] only, so the
//! PostgreSQL and in-memory backends are interchangeable.
//!
//! Loaded [`Resource`] values never carry their occupation history; dated
//! records are read through [`OccupationStore`].

use async_trait::async_trait;
use chrono::NaiveDate;
use staff_core::traits::Id;
use staff_models::{OccupationRecord, Pole, Project, ProjectAccess, Resource, User};

use crate::repository::RepositoryResult;

/// Flat per-resource row for the pole-grouped view, fetched in one query
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ResourceSnapshot {
    pub id: Id,
    pub full_name: String,
    pub position: Option<String>,
    pub avatar: Option<String>,
    pub occupation_rate: f64,
    pub availability_rate: f64,
    pub skills: Vec<String>,
    pub pole_name: Option<String>,
    pub project_manager_name: Option<String>,
    /// Rate of the record on the requested date, if any
    pub dated_rate: Option<i32>,
    pub project_names: Vec<String>,
}

/// Occupation record with the data needed to report it
#[derive(Debug, Clone, PartialEq)]
pub struct OccupationListing {
    pub record: OccupationRecord,
    /// False when the owning resource row is gone
    pub resource_found: bool,
    pub updated_by_email: Option<String>,
}

#[async_trait]
pub trait PoleStore: Send + Sync {
    async fn list_poles(&self) -> RepositoryResult<Vec<Pole>>;

    async fn find_pole(&self, id: Id) -> RepositoryResult<Option<Pole>>;

    async fn create_pole(&self, pole: Pole) -> RepositoryResult<Pole>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects(&self) -> RepositoryResult<Vec<Project>>;

    async fn find_project(&self, id: Id) -> RepositoryResult<Option<Project>>;

    /// Projects among `ids` that exist, ordered by id
    async fn find_projects(&self, ids: &[Id]) -> RepositoryResult<Vec<Project>>;

    async fn create_project(&self, project: Project) -> RepositoryResult<Project>;
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// All resources ordered by full name
    async fn list_resources(&self) -> RepositoryResult<Vec<Resource>>;

    async fn find_resource(&self, id: Id) -> RepositoryResult<Option<Resource>>;

    async fn resources_in_project(&self, project_id: Id) -> RepositoryResult<Vec<Resource>>;

    async fn create_resource(&self, resource: Resource) -> RepositoryResult<Resource>;

    /// Write scalar fields and replace the project set in one transaction
    async fn save_resource(&self, resource: &Resource) -> RepositoryResult<()>;

    /// Delete the resource with its memberships and occupation records.
    /// Returns false when nothing was deleted.
    async fn delete_resource(&self, id: Id) -> RepositoryResult<bool>;

    /// Returns false when the membership already existed
    async fn add_membership(&self, resource_id: Id, project_id: Id) -> RepositoryResult<bool>;

    /// Returns false when there was no membership to remove
    async fn remove_membership(&self, resource_id: Id, project_id: Id) -> RepositoryResult<bool>;

    /// Join-fetch for the pole-grouped view on `date`
    async fn snapshots_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<ResourceSnapshot>>;
}

#[async_trait]
pub trait OccupationStore: Send + Sync {
    /// Insert or overwrite the record keyed by (resource, date) in one atomic
    /// write. Returns the stored record.
    async fn upsert_occupation(&self, record: &OccupationRecord)
        -> RepositoryResult<OccupationRecord>;

    async fn occupation_for_date(
        &self,
        resource_id: Id,
        date: NaiveDate,
    ) -> RepositoryResult<Option<OccupationRecord>>;

    /// Records with `start <= date <= end`, ordered by date then resource
    async fn occupation_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<OccupationListing>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users with their grants, ordered by id
    async fn list_users(&self) -> RepositoryResult<Vec<User>>;

    async fn find_user(&self, id: Id) -> RepositoryResult<Option<User>>;

    async fn create_user(&self, user: User) -> RepositoryResult<User>;

    /// Write status, profile and the full grant set in one transaction
    async fn save_user(&self, user: &User) -> RepositoryResult<()>;

    /// Insert or overwrite a single grant
    async fn upsert_grant(&self, user_id: Id, access: ProjectAccess) -> RepositoryResult<()>;
}

/// Everything the services need from storage
#[async_trait]
pub trait StaffingStore:
    PoleStore + ProjectStore + ResourceStore + OccupationStore + UserStore
{
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> RepositoryResult<()>;
}

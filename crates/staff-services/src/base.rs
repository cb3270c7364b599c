//! Shared lookups

use std::sync::Arc;

use staff_core::error::StaffError;
use staff_core::result::StaffResult;
use staff_core::traits::Id;
use staff_db::{PoleStore, ProjectStore, ResourceStore, StaffingStore, UserStore};
use staff_models::{Entity, Pole, Project, Resource, User};

/// Store handle shared by every service
pub type SharedStore = Arc<dyn StaffingStore>;

pub(crate) async fn require_resource(store: &dyn StaffingStore, id: Id) -> StaffResult<Resource> {
    store
        .find_resource(id)
        .await?
        .ok_or_else(|| StaffError::not_found(Resource::TYPE_NAME, id))
}

pub(crate) async fn require_project(store: &dyn StaffingStore, id: Id) -> StaffResult<Project> {
    store
        .find_project(id)
        .await?
        .ok_or_else(|| StaffError::not_found(Project::TYPE_NAME, id))
}

pub(crate) async fn require_pole(store: &dyn StaffingStore, id: Id) -> StaffResult<Pole> {
    store
        .find_pole(id)
        .await?
        .ok_or_else(|| StaffError::not_found(Pole::TYPE_NAME, id))
}

pub(crate) async fn require_user(store: &dyn StaffingStore, id: Id) -> StaffResult<User> {
    store
        .find_user(id)
        .await?
        .ok_or_else(|| StaffError::not_found(User::TYPE_NAME, id))
}

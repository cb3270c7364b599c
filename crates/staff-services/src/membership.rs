//! Resource <-> project membership endpoints
//!
//! Explicit add/remove is strict: a no-op is reported as a conflict. The
//! store performs the check and the write atomically.

use staff_core::error::StaffError;
use staff_core::result::StaffResult;
use staff_core::traits::Id;
use staff_db::ResourceStore;

use crate::base::{require_project, require_resource, SharedStore};

#[derive(Clone)]
pub struct MembershipService {
    store: SharedStore,
}

impl MembershipService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn add(&self, project_id: Id, resource_id: Id) -> StaffResult<()> {
        require_project(&*self.store, project_id).await?;
        require_resource(&*self.store, resource_id).await?;

        if !self.store.add_membership(resource_id, project_id).await? {
            return Err(StaffError::conflict(format!(
                "Resource {resource_id} is already assigned to project {project_id}"
            )));
        }

        tracing::info!(project_id, resource_id, "resource assigned to project");
        Ok(())
    }

    pub async fn remove(&self, project_id: Id, resource_id: Id) -> StaffResult<()> {
        require_project(&*self.store, project_id).await?;
        require_resource(&*self.store, resource_id).await?;

        if !self.store.remove_membership(resource_id, project_id).await? {
            return Err(StaffError::conflict(format!(
                "Resource {resource_id} is not assigned to project {project_id}"
            )));
        }

        tracing::info!(project_id, resource_id, "resource removed from project");
        Ok(())
    }
}
